//! Errors surfaced while building a simulation
//!
//! Everything here is a data/config defect detected up front. Once a
//! `GameState` exists, ticking it cannot fail.

use std::fmt;

#[derive(Debug)]
pub enum SimError {
    UnknownSpecies { name: String },
    UnknownLaser { name: String },
    UnknownFootprint { name: String },
    InvalidFootprint { name: String, reason: String },
    InvalidConfig { reason: String },
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSpecies { name } => write!(f, "unknown enemy species: {name:?}"),
            Self::UnknownLaser { name } => write!(f, "unknown laser type: {name:?}"),
            Self::UnknownFootprint { name } => write!(f, "unknown footprint: {name:?}"),
            Self::InvalidFootprint { name, reason } => {
                write!(f, "invalid footprint {name:?}: {reason}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid config: {reason}"),
            Self::Json(err) => write!(f, "malformed json: {err}"),
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offender() {
        let err = SimError::UnknownSpecies {
            name: "kraken".to_string(),
        };
        assert_eq!(err.to_string(), "unknown enemy species: \"kraken\"");
    }

    #[test]
    fn test_json_error_keeps_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = SimError::from(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
