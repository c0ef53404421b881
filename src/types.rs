//! Shared types for the FAIRWAY tracker.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the storage, handicap,
//! and API modules can depend on them without circular references.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A tracked golf player.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.id)
    }
}

/// Payload for creating a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// One completed round of golf by one player.
///
/// `course` and `tee` are free text — they are descriptive only and
/// are not validated against a reference list. `rating` is the course
/// rating (typically 60–80) and `slope` the slope rating on the
/// nominal 55–155 scale.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Round {
    pub id: String,
    pub player_id: String,
    /// Calendar date the round was played (no time component).
    pub date: NaiveDate,
    pub course: String,
    pub tee: String,
    pub rating: f64,
    pub slope: i64,
    /// Total strokes.
    pub score: i64,
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): {} strokes (rating {:.1}, slope {})",
            self.date, self.course, self.tee, self.score, self.rating, self.slope,
        )
    }
}

impl Round {
    /// Helper to build a test round with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        Round {
            id: "round-001".to_string(),
            player_id: "player-001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            course: "Pebble Creek".to_string(),
            tee: "White".to_string(),
            rating: 72.0,
            slope: 120,
            score: 90,
        }
    }
}

/// Payload for creating a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRound {
    pub player_id: String,
    pub date: NaiveDate,
    pub course: String,
    pub tee: String,
    pub rating: f64,
    pub slope: i64,
    pub score: i64,
}

impl NewRound {
    /// Boundary validation for data entry.
    ///
    /// The handicap engine itself is permissive and assumes well-formed
    /// input, so degenerate rounds are rejected here, before they reach
    /// storage. Slope range (55–155) is deliberately not enforced.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.slope == 0 {
            return Err(TrackerError::Validation(
                "slope must be non-zero".to_string(),
            ));
        }
        if self.score <= 0 {
            return Err(TrackerError::Validation(
                "score must be a positive number of strokes".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

/// One point of a player's handicap time series.
///
/// Derived, never persisted: `handicap` is the index computed over all
/// of the player's rounds up to and including the round played on
/// `date`, and `round_count` is how many rounds went into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandicapHistoryPoint {
    pub date: NaiveDate,
    pub handicap: f64,
    pub round_count: usize,
}

impl fmt::Display for HandicapHistoryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1} ({} rounds)",
            self.date, self.handicap, self.round_count,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for FAIRWAY.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Round not found: {0}")]
    RoundNotFound(String),

    #[error("Invalid round: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for TrackerError {
    fn from(e: sqlx::Error) -> Self {
        TrackerError::Storage(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
