//! Error types for the simulation, persistence and asset layers.
//!
//! Simulation calls return [`SimResult`] and callers propagate with `?`.
//! Persistence and asset failures are recoverable: the game logs them and keeps
//! running with an empty leaderboard or fallback drawing.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::sim::physics::BodyHandle;

/// Errors raised by the physics engine and the entities built on it.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A body handle was used after its body was removed, or never existed.
    InvalidHandle {
        handle: BodyHandle,
        /// Engine operation that rejected the handle.
        context: &'static str,
    },

    /// A dynamic body was requested with a mass that is not finite and positive.
    InvalidMass { mass: f32 },

    /// A body was requested with a non-positive or non-finite extent.
    InvalidShape { width: f32, height: f32 },

    /// A tuning value is outside the range the simulation can work with.
    InvalidSetting {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidHandle { handle, context } => {
                write!(f, "invalid body handle {} during '{}'", handle, context)
            }
            SimError::InvalidMass { mass } => write!(
                f,
                "dynamic body mass must be finite and positive, got {}",
                mass
            ),
            SimError::InvalidShape { width, height } => write!(
                f,
                "body extent must be finite and positive, got {}x{}",
                width, height
            ),
            SimError::InvalidSetting {
                name,
                value,
                expected,
            } => write!(f, "setting '{}' = {} is outside {}", name, value, expected),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

/// Failures while writing persisted files.
#[derive(Debug)]
pub enum PersistError {
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io { path, source } => {
                write!(f, "i/o error on '{}': {}", path.display(), source)
            }
            PersistError::Json(err) => write!(f, "json encoding failed: {}", err),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io { source, .. } => Some(source),
            PersistError::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError::Json(err)
    }
}

/// Texture loading failures. Callers fall back to colored rectangles.
#[derive(Debug)]
pub enum AssetError {
    Missing { path: PathBuf },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Missing { path } => write!(f, "asset '{}' not found", path.display()),
            AssetError::Io { path, source } => {
                write!(f, "failed to read asset '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            AssetError::Missing { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::InvalidMass { mass: 0.0 };
        assert!(err.to_string().contains("finite and positive"));

        let err = SimError::InvalidSetting {
            name: "min_gap",
            value: -1.0,
            expected: "[0, max_gap]",
        };
        assert_eq!(err.to_string(), "setting 'min_gap' = -1 is outside [0, max_gap]");

        let err = AssetError::Missing {
            path: PathBuf::from("sheet.png"),
        };
        assert_eq!(err.to_string(), "asset 'sheet.png' not found");
    }
}
