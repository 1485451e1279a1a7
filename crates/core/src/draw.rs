//! Pending draws and the draw phase state machine.
//!
//! A play cycle moves `Idle -> Pending -> Revealing -> Idle`. There is no
//! shortcut back to `Idle`, which is what keeps a window from being drawn
//! or credited twice.

use serde::{Deserialize, Serialize};

use crate::prize::{greeting_for, PrizeDefinition};

// ---------------------------------------------------------------------------
// PendingDraw
// ---------------------------------------------------------------------------

/// A selected but not yet revealed prize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingDraw {
    pub prize: PrizeDefinition,
    /// Greeting that will accompany the reveal.
    pub message: String,
}

impl PendingDraw {
    /// Hold `prize` with the greeting for its face value.
    pub fn new(prize: PrizeDefinition) -> Self {
        let message = greeting_for(prize.value).to_string();
        Self { prize, message }
    }
}

// ---------------------------------------------------------------------------
// DrawPhase
// ---------------------------------------------------------------------------

/// Where the current play cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPhase {
    /// No draw in progress.
    #[default]
    Idle,
    /// A prize has been drawn and awaits the reveal.
    Pending,
    /// The reveal was confirmed; the record exists and the cycle is settling.
    Revealing,
}

impl DrawPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            DrawPhase::Idle => "Idle",
            DrawPhase::Pending => "Pending",
            DrawPhase::Revealing => "Revealing",
        }
    }
}

impl std::fmt::Display for DrawPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub mod state_machine {
    use super::DrawPhase;

    /// Phases reachable from `from`.
    pub fn valid_transitions(from: DrawPhase) -> &'static [DrawPhase] {
        match from {
            // Idle -> Pending (start draw)
            DrawPhase::Idle => &[DrawPhase::Pending],
            // Pending -> Revealing (confirm reveal)
            DrawPhase::Pending => &[DrawPhase::Revealing],
            // Revealing -> Idle (settled)
            DrawPhase::Revealing => &[DrawPhase::Idle],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: DrawPhase, to: DrawPhase) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(from: DrawPhase, to: DrawPhase) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!("Invalid transition: {from} -> {to}"))
        }
    }
}
