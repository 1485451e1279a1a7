//! Prize definitions and the ordered prize table.
//!
//! The table is owned outside the engine (built in, or loaded from a JSON
//! file) and is read-only once validated. Its order is part of the draw
//! contract: the selector walks it front to back and falls back to the last
//! entry, so reordering changes the effective odds.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::selection::select_prize;
use crate::types::PrizeId;

// ---------------------------------------------------------------------------
// PrizeDefinition
// ---------------------------------------------------------------------------

/// One entry of the prize table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeDefinition {
    pub id: PrizeId,
    /// Display name.
    pub label: String,
    /// Face value of the prize.
    pub value: u32,
    /// Share of the draw weight, between 0 and 1.
    pub probability: f64,
}

impl PrizeDefinition {
    pub fn new(id: impl Into<PrizeId>, label: impl Into<String>, value: u32, probability: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
            probability,
        }
    }
}

// ---------------------------------------------------------------------------
// PrizeTable
// ---------------------------------------------------------------------------

/// Validated, ordered, non-empty list of prizes.
///
/// Probabilities do not have to sum to 1. Any residual mass falls to the
/// last entry at draw time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PrizeTable {
    prizes: Vec<PrizeDefinition>,
}

impl PrizeTable {
    /// Validate and wrap a list of prizes.
    ///
    /// Rejects empty tables, blank or duplicate ids, and probabilities that
    /// are not finite or fall outside `[0, 1]`.
    pub fn new(prizes: Vec<PrizeDefinition>) -> Result<Self, CoreError> {
        if prizes.is_empty() {
            return Err(CoreError::Validation("prize table is empty".into()));
        }

        let mut seen = HashSet::with_capacity(prizes.len());
        for prize in &prizes {
            if prize.id.trim().is_empty() {
                return Err(CoreError::Validation("prize id must not be blank".into()));
            }
            if !seen.insert(prize.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "duplicate prize id '{}'",
                    prize.id
                )));
            }
            if !prize.probability.is_finite() || !(0.0..=1.0).contains(&prize.probability) {
                return Err(CoreError::Validation(format!(
                    "prize '{}' has probability {} outside [0, 1]",
                    prize.id, prize.probability
                )));
            }
        }

        Ok(Self { prizes })
    }

    /// Parse a JSON array of prize definitions.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let prizes: Vec<PrizeDefinition> = serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("malformed prize table: {e}")))?;
        Self::new(prizes)
    }

    /// Read and parse a prize table file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!("cannot read prize table {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn prizes(&self) -> &[PrizeDefinition] {
        &self.prizes
    }

    pub fn get(&self, id: &str) -> Option<&PrizeDefinition> {
        self.prizes.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    /// Sum of all declared probabilities.
    pub fn total_probability(&self) -> f64 {
        self.prizes.iter().map(|p| p.probability).sum()
    }

    /// Probability mass no entry claims; it falls to the last prize.
    pub fn residual_probability(&self) -> f64 {
        (1.0 - self.total_probability()).max(0.0)
    }

    /// Select one prize with a single sample from `rng`.
    pub fn draw<F>(&self, rng: F) -> &PrizeDefinition
    where
        F: FnMut() -> f64,
    {
        match select_prize(&self.prizes, rng) {
            Some(prize) => prize,
            None => unreachable!("prize table is validated non-empty"),
        }
    }
}

impl Default for PrizeTable {
    /// The built-in lucky-money table, smallest prize first.
    fn default() -> Self {
        Self {
            prizes: vec![
                PrizeDefinition::new("lucky-8", "Lucky Money $8", 8, 0.45),
                PrizeDefinition::new("lucky-18", "Lucky Money $18", 18, 0.30),
                PrizeDefinition::new("lucky-38", "Lucky Money $38", 38, 0.15),
                PrizeDefinition::new("lucky-88", "Lucky Money $88", 88, 0.07),
                PrizeDefinition::new("lucky-168", "Lucky Money $168", 168, 0.025),
                PrizeDefinition::new("lucky-888", "Lucky Money $888", 888, 0.005),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Greetings
// ---------------------------------------------------------------------------

/// Greeting shown when the prize value has no dedicated message.
pub const FALLBACK_GREETING: &str = "Galloping to success! Wishing you luck all year long.";

/// Greeting per prize value.
const GREETINGS: &[(u32, &str)] = &[
    (8, "A lucky start! Small fortunes gallop in first."),
    (18, "Steady hooves, steady gains. May this year carry you far."),
    (38, "Fortune is racing your way. Keep the momentum!"),
    (88, "Double eight, double luck! Prosperity is at your gate."),
    (168, "All the way to riches! A splendid year awaits."),
    (888, "The grand prize! May wealth follow you like a swift horse."),
];

/// Greeting for a prize of the given face value.
pub fn greeting_for(value: u32) -> &'static str {
    GREETINGS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, greeting)| *greeting)
        .unwrap_or(FALLBACK_GREETING)
}
