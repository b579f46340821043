//! Error taxonomy for mix and charging-window requests.

use thiserror::Error;

use crate::source::SourceError;

/// Value-level failure of a request. No partial result accompanies it.
#[derive(Debug, Error)]
pub enum EnergyError {
    /// Caller-supplied parameter outside its contract.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The interval source failed or returned nothing usable.
    #[error("generation feed unavailable: {0}")]
    UpstreamUnavailable(#[from] SourceError),

    /// The feed returned data, but too little of it for the requested window.
    #[error("not enough intervals for the requested window: have {available}, need {required}")]
    InsufficientData { available: usize, required: usize },

    /// No candidate window existed despite the length check.
    #[error("could not find an optimal charging window")]
    NoWindowFound,
}
