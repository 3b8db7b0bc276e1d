//! Game-specific error types.
//!
//! Placement and selection failures are ordinary control flow (`bool` /
//! `Option` returns) and never reach this module.  These types cover the
//! fatal-at-startup class: a malformed part catalog or an unsafe constant.

use std::fmt;

/// Top-level error enum for the sandbox.
#[derive(Debug)]
pub enum GameError {
    /// A catalog entry lacks a required physical property.  Raised once at
    /// load time; the catalog refuses to register the part.
    MissingPartField {
        /// Id of the offending part.
        part_id: String,
        /// Name of the missing or invalid field.
        field: &'static str,
    },

    /// A part id was referenced that the catalog does not contain.
    UnknownPart {
        /// The unresolved id.
        part_id: String,
    },

    /// A constant is outside its safe operating range.
    /// Returned by validation helpers; not triggered at runtime by default.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::MissingPartField { part_id, field } => write!(
                f,
                "part catalog entry '{}' is missing required field '{}'",
                part_id, field
            ),
            GameError::UnknownPart { part_id } => {
                write!(f, "unknown part id '{}'", part_id)
            }
            GameError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `gravity_const` is not strictly positive.
pub fn validate_gravity_const(value: f32) -> GameResult<()> {
    if value <= 0.0 {
        Err(GameError::UnsafeConstant {
            name: "GRAVITY_CONST",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if a snap multiplier would make the snap cell degenerate.
pub fn validate_snap_multiplier(value: f32) -> GameResult<()> {
    if value <= 0.0 {
        Err(GameError::UnsafeConstant {
            name: "min_snap_multiplier",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}
