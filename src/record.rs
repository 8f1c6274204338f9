//! Per-series records and the batch result handed to renderers.

use serde::{Deserialize, Serialize};

use crate::capability::{CapabilityReport, ControlLimits};
use crate::chart::{ControlChartSeries, HistogramData};
use crate::descriptive::DescriptiveStatistics;
use crate::error::{AnalysisError, ErrorKind};
use crate::spec::SpecLimits;

/// Everything computed for one successfully analyzed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub source_id: String,
    pub statistics: DescriptiveStatistics,
    pub capability: CapabilityReport,
    pub control_limits: ControlLimits,
    pub histogram: HistogramData,
    pub control_chart: ControlChartSeries,
}

/// A series that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub source_id: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorRecord {
    pub fn from_error(source_id: impl Into<String>, error: &AnalysisError) -> Self {
        Self {
            source_id: source_id.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Outcome for one input series: exactly one of the two record kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeriesRecord {
    Analyzed(Box<AnalysisRecord>),
    Failed(ErrorRecord),
}

impl SeriesRecord {
    pub fn source_id(&self) -> &str {
        match self {
            Self::Analyzed(record) => &record.source_id,
            Self::Failed(record) => &record.source_id,
        }
    }

    pub fn as_analysis(&self) -> Option<&AnalysisRecord> {
        match self {
            Self::Analyzed(record) => Some(&**record),
            Self::Failed(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Analyzed(_) => None,
            Self::Failed(record) => Some(record),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl From<AnalysisRecord> for SeriesRecord {
    fn from(record: AnalysisRecord) -> Self {
        Self::Analyzed(Box::new(record))
    }
}

impl From<ErrorRecord> for SeriesRecord {
    fn from(record: ErrorRecord) -> Self {
        Self::Failed(record)
    }
}

/// Ordered records of one batch run, one per input series.
///
/// Built once by the orchestrator and read once by a renderer; the engine
/// keeps no reference to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Limits the batch was run under.
    pub spec: SpecLimits,
    pub records: Vec<SeriesRecord>,
    /// Set when the run was cancelled before every source was processed.
    pub cancelled: bool,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesRecord> {
        self.records.iter()
    }

    pub fn analyses(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.records.iter().filter_map(SeriesRecord::as_analysis)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter().filter_map(SeriesRecord::as_error)
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a SeriesRecord;
    type IntoIter = std::slice::Iter<'a, SeriesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(id: &str) -> SeriesRecord {
        let err = AnalysisError::MissingField {
            source_id: id.into(),
            column: "samples".into(),
        };
        ErrorRecord::from_error(id, &err).into()
    }

    #[test]
    fn error_record_copies_kind_and_message() {
        let record = failed("b.csv");
        let err = record.as_error().unwrap();
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert_eq!(err.message, "column 'samples' does not exist in b.csv");
        assert_eq!(record.source_id(), "b.csv");
        assert!(record.is_error());
        assert!(record.as_analysis().is_none());
    }

    #[test]
    fn error_record_serializes_with_status_tag() {
        let json = serde_json::to_value(failed("b.csv")).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "missing_field");
        assert_eq!(json["source_id"], "b.csv");
    }

    #[test]
    fn batch_result_iterates_in_order() {
        let result = BatchResult {
            spec: SpecLimits::new(1.0, 0.0, 2.0),
            records: vec![failed("a"), failed("b")],
            cancelled: false,
        };
        let ids: Vec<_> = result.iter().map(SeriesRecord::source_id).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(result.errors().count(), 2);
        assert_eq!(result.analyses().count(), 0);
        assert_eq!((&result).into_iter().count(), 2);
    }
}
