//! Player entity, mutable-input DTOs, and client-side validation.
//!
//! Validation lives here so every mutation path (controller, HTTP handlers,
//! tooling) rejects bad input before a store call is made.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{PlayerId, Timestamp};

/// Inclusive upper bound for `accuracy`.
pub const MAX_ACCURACY: f64 = 100.0;

/// Maximum display name length, mirrored by the `players.name` column.
pub const MAX_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A leaderboard row as the store returns it.
///
/// `rank` is owned by the store's ranking trigger and is never written by
/// this crate's callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub rank: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a player, or replacing all editable fields of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub name: String,
    pub wpm: f64,
    pub accuracy: f64,
}

/// DTO for partially updating a player. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub wpm: Option<f64>,
    pub accuracy: Option<f64>,
}

impl PlayerInput {
    /// Validate every editable field.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        validate_wpm(self.wpm)?;
        validate_accuracy(self.accuracy)?;
        Ok(())
    }
}

impl PlayerPatch {
    /// Validate only the fields that are present.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(wpm) = self.wpm {
            validate_wpm(wpm)?;
        }
        if let Some(accuracy) = self.accuracy {
            validate_accuracy(accuracy)?;
        }
        Ok(())
    }

    /// `true` when no field would be changed.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.wpm.is_none() && self.accuracy.is_none()
    }
}

impl From<PlayerInput> for PlayerPatch {
    fn from(input: PlayerInput) -> Self {
        Self {
            name: Some(input.name),
            wpm: Some(input.wpm),
            accuracy: Some(input.accuracy),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a display name (non-blank, at most [`MAX_NAME_LENGTH`] chars).
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a words-per-minute value (finite, non-negative).
pub fn validate_wpm(wpm: f64) -> Result<(), CoreError> {
    if !wpm.is_finite() || wpm < 0.0 {
        return Err(CoreError::Validation(format!(
            "WPM must be a non-negative number, got {wpm}"
        )));
    }
    Ok(())
}

/// Validate an accuracy percentage (finite, within `0..=100`).
pub fn validate_accuracy(accuracy: f64) -> Result<(), CoreError> {
    if !accuracy.is_finite() || !(0.0..=MAX_ACCURACY).contains(&accuracy) {
        return Err(CoreError::Validation(format!(
            "Accuracy must be between 0 and {MAX_ACCURACY}, got {accuracy}"
        )));
    }
    Ok(())
}
