/// Single scalar width for the whole workspace. Everything steps in f32.
pub type Scalar = f32;
