use thiserror::Error;

use crate::prelude::{Epoch, SV};

/// Errors returned by an [Estimator](crate::prelude::Estimator) adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    /// Update or query attempted before initialization.
    #[error("estimator is not initialized")]
    Uninitialized,

    /// The external engine rejected the proposed observations.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The external engine converged to a non physical state
    /// (non finite baseline for example).
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Input format errors, for both the almanac and the epoch source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParsingError {
    #[error("line {line}: invalid \"{field}\" value")]
    InvalidField { line: usize, field: String },

    #[error("almanac entry is missing \"{0}\"")]
    MissingField(&'static str),

    #[error("duplicate almanac entry for PRN #{0}")]
    DuplicatePrn(u8),

    #[error("empty almanac")]
    EmptyAlmanac,

    #[error("invalid epoch \"{0}\"")]
    InvalidEpoch(String),

    #[error("invalid satellite \"{0}\"")]
    InvalidSatellite(String),

    #[error("unknown data key \"{0}\"")]
    UnknownDataKey(String),

    #[error("duplicate epoch {0}")]
    DuplicateEpoch(Epoch),
}

#[derive(Debug, Error)]
pub enum Error {
    /// Not enough satellites with both phase and pseudo range observations.
    /// Fatal at initialization, recorded as a non converged row otherwise.
    #[error("{epoch}: insufficient data, {found} usable satellite(s) ({required} required)")]
    InsufficientData {
        epoch: Epoch,
        found: usize,
        required: usize,
    },

    /// Satellite does not exist in the reference almanac.
    #[error("{0}({1}): unknown satellite (no almanac entry)")]
    UnknownSatellite(Epoch, SV),

    /// The estimator rejected an update or ended up in an invalid state.
    /// This aborts the run: subsequent epochs would not be meaningful.
    #[error("{epoch}: estimator error: {source}")]
    Estimator {
        epoch: Epoch,
        source: EstimatorError,
    },

    /// Time cannot be expressed as GPS week and time of week.
    #[error("{0}: invalid time (prior GPS origin)")]
    InvalidTime(Epoch),

    #[error("epoch source is empty")]
    EmptySource,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing error: {0}")]
    Parsing(#[from] ParsingError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
