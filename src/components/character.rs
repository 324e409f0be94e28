use crate::fsm::StateMachine;

/// Marker: this entity is the player.
pub struct Player;

// ---------------------------------------------------------------------------
// Dash state machine
// ---------------------------------------------------------------------------

/// Whether the one-shot dash is available.
///
/// Transition logic lives in `src/systems/player.rs`, where grounding and
/// horizontal speed are known, so that this file stays pure data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashState {
    /// Dash can be triggered.
    Ready,
    /// Dash was used; recharges once grounded at low horizontal speed.
    Spent,
}

impl DashState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Spent => "Spent",
        }
    }
}

/// FSM component attached to the player entity.
pub type PlayerFsm = StateMachine<DashState>;
