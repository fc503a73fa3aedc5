//! Error types for the safety engine.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("sort key `{key}` is not supported for {variant} records")]
    InvalidKey {
        key: &'static str,
        variant: &'static str,
    },

    #[error("unknown facet: {0:?}")]
    UnknownFacet(String),

    #[error("unknown sort key: {0:?}")]
    UnknownSortKey(String),

    #[error("threshold table must contain at least one tier")]
    EmptyThresholds,

    #[error("threshold boundary for tier {tier:?} is not a finite number")]
    InvalidThreshold { tier: String },

    #[error("heat map radius must be a finite, non-negative number (got {0})")]
    InvalidRadius(f64),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
