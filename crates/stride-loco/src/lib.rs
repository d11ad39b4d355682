pub mod controls;
pub mod ground;
pub mod slope;
pub mod jump;
pub mod damping;
pub mod character;

pub use controls::{
    CTRL_BACK, CTRL_FORWARD, CTRL_JUMP, CTRL_LEFT, CTRL_PROWL, CTRL_RIGHT, CTRL_SPRINT,
    Controls, YAW_SENSITIVITY,
};
pub use ground::{ContactEvent, GROUND_GRACE, GroundState};
pub use slope::{GroundProbe, PROBE_DISTANCE, RayHit, SlopeSample};
pub use jump::{JUMP_FORCE, JUMP_GRACE, JumpCtrl, JumpPhase};
pub use character::{
    BodyHandle, CharacterCtrl, CharacterState, INAIR_MOVE_FORCE, MAX_DT, MOVE_FORCE,
    STICK_FORCE, TickOutcome,
};
