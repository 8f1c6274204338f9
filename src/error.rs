//! Error taxonomy for capability analysis.
//!
//! Errors fall into two scopes:
//!
//! - **Batch-level**: [`AnalysisError::InvalidSpecLimits`] is raised before
//!   any series is touched and aborts the whole run.
//! - **Series-level**: every other variant is isolated to the series that
//!   produced it and recorded as an [`ErrorRecord`](crate::ErrorRecord);
//!   the batch carries on with the next series.
//!
//! All conditions are deterministic properties of the input data, so
//! nothing is ever retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised while validating limits or analyzing one series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Target/LSL/USL are not numeric, not finite, or `lsl >= usl`.
    #[error("invalid specification limits: {0}")]
    InvalidSpecLimits(String),

    /// The source does not expose the expected data column.
    #[error("column '{column}' does not exist in {source_id}")]
    MissingField { source_id: String, column: String },

    /// Fewer than two observations, so the sample standard deviation is
    /// undefined.
    #[error("{source_id}: at least 2 samples are required, found {count}")]
    InsufficientSamples { source_id: String, count: usize },

    /// Short- or long-term standard deviation is exactly zero; every
    /// capability ratio would divide by zero.
    #[error("{source_id}: standard deviation is zero, capability indices are undefined")]
    ZeroVariance { source_id: String },

    /// The source could not be read, or holds non-numeric or non-finite
    /// values.
    #[error("{source_id}: {reason}")]
    InvalidData { source_id: String, reason: String },
}

/// Machine-readable classification of an [`AnalysisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidSpecLimits,
    MissingField,
    InsufficientSamples,
    ZeroVariance,
    InvalidData,
}

impl AnalysisError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSpecLimits(_) => ErrorKind::InvalidSpecLimits,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::InsufficientSamples { .. } => ErrorKind::InsufficientSamples,
            Self::ZeroVariance { .. } => ErrorKind::ZeroVariance,
            Self::InvalidData { .. } => ErrorKind::InvalidData,
        }
    }

    /// Returns `true` if the error aborts a whole batch rather than a
    /// single series.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::InvalidSpecLimits(_))
    }

    pub(crate) fn invalid_data(source_id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            source_id: source_id.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidSpecLimits => "InvalidSpecLimits",
            Self::MissingField => "MissingField",
            Self::InsufficientSamples => "InsufficientSamples",
            Self::ZeroVariance => "ZeroVariance",
            Self::InvalidData => "InvalidData",
        };
        f.write_str(name)
    }
}
