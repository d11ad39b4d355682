use stride_core::Scalar;

/// Strength of the airborne vertical damping.
pub const AIR_DAMPING_FACTOR: Scalar = 0.1;

/// The policy applies only when airborne and outside the jump grace window.
#[inline]
pub fn should_damp(on_ground: bool, in_jump_grace: bool) -> bool {
    !on_ground && !in_jump_grace
}

/// One tick of vertical damping: v' = v * (1 - factor * dt).
#[inline]
pub fn damp_vertical(vy: Scalar, dt: Scalar) -> Scalar {
    vy * (1.0 - AIR_DAMPING_FACTOR * dt)
}
