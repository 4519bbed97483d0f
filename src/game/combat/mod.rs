//! Unit combat: the Idle/Follow/Attack state machine and damage application.
//!
//! Target acquisition lives in the simulation driver, since it depends on the
//! proximity sensor; everything that happens once a unit has a target lives here.

mod damage;
mod machine;
mod state;

pub use damage::{apply_damage, DamageOutcome};
pub use machine::{CombatMachine, DEFAULT_FOLLOW_EPSILON};
pub use state::CombatState;
