use thiserror::Error;

use crate::config::VALID_OUTPUT_FORMATS;

/// Failures that abort a run before any probe is dispatched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid network address {input:?}: {reason}")]
    InvalidNetworkAddress { input: String, reason: String },

    #[error("interface {0:?} not found")]
    InterfaceNotFound(String),

    #[error("interface {0:?} has no IPv4 network")]
    NoIPv4Address(String),

    #[error("invalid output format: {0:?} (valid: {valid})", valid = VALID_OUTPUT_FORMATS.join(", "))]
    InvalidOutputFormat(String),
}

impl ConfigError {
    pub(crate) fn invalid_network(input: &str, reason: impl ToString) -> Self {
        Self::InvalidNetworkAddress {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}
