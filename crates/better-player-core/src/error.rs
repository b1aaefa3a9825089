//! Error types for Better Player Core
//!
//! Only integration mistakes surface as [`Error`]. Media failures at runtime
//! (unsupported source, missing resource) are delivered as
//! [`VideoError`](crate::video::VideoError) payloads on the event bus instead,
//! so the player stays alive and can offer a reload.

use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Player error types
#[derive(Error, Debug)]
pub enum Error {
    // Component wiring errors
    #[error("{component}: handler table references unknown selector `{selector}`")]
    UnknownSelector {
        component: &'static str,
        selector: &'static str,
    },

    #[error("{component}: template has no element matching `{selector}`")]
    InvalidTemplate {
        component: &'static str,
        selector: &'static str,
    },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    // Lifecycle errors
    #[error("Player has been destroyed")]
    Destroyed,
}

impl Error {
    /// Returns the error code reported to embedders
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::UnknownSelector { .. } => "UNKNOWN_SELECTOR",
            Error::InvalidTemplate { .. } => "INVALID_TEMPLATE",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::ConfigParse(_) => "CONFIG_PARSE",
            Error::Destroyed => "DESTROYED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::Destroyed.error_code(), "DESTROYED");
        assert_eq!(
            Error::InvalidConfig("seekTime".into()).error_code(),
            "INVALID_CONFIG"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::UnknownSelector {
            component: "controller",
            selector: "[data-missing]",
        };
        assert_eq!(
            err.to_string(),
            "controller: handler table references unknown selector `[data-missing]`"
        );
    }
}
