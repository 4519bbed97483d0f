use std::fmt;

/// Engagement state of a single unit.
///
/// Only the owning unit's [`CombatMachine`](super::CombatMachine) changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CombatState {
    /// No target
    #[default]
    Idle,
    /// Target acquired but out of attack range
    Follow,
    /// Target in range; hits land on the attack cadence
    Attack,
}

impl CombatState {
    /// Edges the machine may take. Idle never jumps straight to Attack.
    pub fn can_transition_to(self, next: CombatState) -> bool {
        matches!(
            (self, next),
            (CombatState::Idle, CombatState::Follow)
                | (CombatState::Follow, CombatState::Idle)
                | (CombatState::Follow, CombatState::Attack)
                | (CombatState::Attack, CombatState::Follow)
                | (CombatState::Attack, CombatState::Idle)
        )
    }
}

impl fmt::Display for CombatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CombatState::Idle => "idle",
            CombatState::Follow => "follow",
            CombatState::Attack => "attack",
        };
        f.write_str(name)
    }
}
