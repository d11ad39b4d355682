use crate::StepHasher;

/// Fixed per-tick pipeline. Contact events produced in Narrowphase/Solve are
/// consumed by the Characters stage of the same tick, never a later one.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum StepStage {
    Integrate = 1,
    UpdateAabbs = 2,
    Narrowphase = 3,
    Solve = 4,
    Characters = 5,
}

pub fn schedule_digest(stages: &[StepStage]) -> [u8; 32] {
    let mut h = StepHasher::new();
    for s in stages { h.update_bytes(&[*s as u8]); }
    h.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_depends_on_stage_order() {
        let a = schedule_digest(&[StepStage::Integrate, StepStage::Solve]);
        let b = schedule_digest(&[StepStage::Solve, StepStage::Integrate]);
        assert_ne!(a, b);
    }
}
