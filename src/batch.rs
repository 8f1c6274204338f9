//! Batch orchestration.
//!
//! Runs the full analysis over an ordered collection of sources under one
//! set of specification limits. Limits are validated up front; after that
//! a failing source only ever produces an [`ErrorRecord`] and the batch
//! moves on to the next source.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::capability::CapabilityAnalysis;
use crate::chart::{ChartDataGenerator, ChartSettings};
use crate::descriptive::DescriptiveStatistics;
use crate::error::AnalysisError;
use crate::record::{AnalysisRecord, BatchResult, ErrorRecord, SeriesRecord};
use crate::series::{SeriesSource, DEFAULT_COLUMN};
use crate::spec::SpecLimits;

/// Validated configuration of a batch run.
///
/// # Examples
///
/// ```
/// use spc_capability::{BatchAnalyzer, ErrorKind, SpecLimits, Table};
///
/// let analyzer = BatchAnalyzer::new(SpecLimits::new(11.0, 8.0, 14.0)).unwrap();
///
/// let sources = vec![
///     Table::new("a.csv").with_column("samples", vec![10.0, 12.0, 11.0, 13.0, 9.0]),
///     Table::new("b.csv").with_column("muestras", vec![1.0, 2.0]),
/// ];
/// let result = analyzer.analyze(&sources);
///
/// assert_eq!(result.len(), 2);
/// assert!(result.records[0].as_analysis().is_some());
/// assert_eq!(result.records[1].as_error().unwrap().kind, ErrorKind::MissingField);
///
/// // inverted limits fail before any source is read
/// assert!(BatchAnalyzer::new(SpecLimits::new(7.0, 10.0, 5.0)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BatchAnalyzer {
    spec: SpecLimits,
    column: String,
    charts: ChartDataGenerator,
}

impl BatchAnalyzer {
    /// Creates an analyzer reading the `"samples"` column with default
    /// chart settings.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidSpecLimits`] if `spec` fails validation.
    pub fn new(spec: SpecLimits) -> Result<Self, AnalysisError> {
        spec.validate()?;
        Ok(Self {
            spec,
            column: DEFAULT_COLUMN.to_string(),
            charts: ChartDataGenerator::default(),
        })
    }

    /// Reads `column` from each source instead of `"samples"`.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn with_chart_settings(mut self, settings: ChartSettings) -> Self {
        self.charts = ChartDataGenerator::new(settings);
        self
    }

    pub fn spec(&self) -> &SpecLimits {
        &self.spec
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Analyzes every source in order.
    pub fn analyze<I>(&self, sources: I) -> BatchResult
    where
        I: IntoIterator,
        I::Item: SeriesSource,
    {
        self.run(sources, || false)
    }

    /// Like [`analyze`](Self::analyze), but checks `cancel` before each
    /// source. Once it is set the remaining sources are skipped and the
    /// result is marked as cancelled.
    pub fn analyze_until<I>(&self, sources: I, cancel: &AtomicBool) -> BatchResult
    where
        I: IntoIterator,
        I::Item: SeriesSource,
    {
        self.run(sources, || cancel.load(Ordering::Relaxed))
    }

    fn run<I, F>(&self, sources: I, mut cancelled: F) -> BatchResult
    where
        I: IntoIterator,
        I::Item: SeriesSource,
        F: FnMut() -> bool,
    {
        let mut result = BatchResult {
            spec: self.spec,
            records: Vec::new(),
            cancelled: false,
        };

        for source in sources {
            if cancelled() {
                tracing::info!(processed = result.len(), "batch cancelled");
                result.cancelled = true;
                break;
            }
            result.records.push(self.analyze_source(&source));
        }

        tracing::info!(
            records = result.len(),
            errors = result.errors().count(),
            "batch complete"
        );
        result
    }

    /// Produces the record of a single source. Never fails: errors are
    /// returned as [`SeriesRecord::Failed`].
    pub fn analyze_source<S: SeriesSource + ?Sized>(&self, source: &S) -> SeriesRecord {
        let source_id = source.source_id();
        tracing::debug!(source = source_id, column = %self.column, "analyzing source");

        match self.try_analyze(source) {
            Ok(record) => record.into(),
            Err(err) => {
                tracing::warn!(source = source_id, kind = %err.kind(), "{err}");
                ErrorRecord::from_error(source_id, &err).into()
            }
        }
    }

    fn try_analyze<S: SeriesSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<AnalysisRecord, AnalysisError> {
        let series = source.load(&self.column)?;
        let statistics = DescriptiveStatistics::compute(&series)?;
        let capability = CapabilityAnalysis::compute(&series, &self.spec)?;
        let charts = self.charts.generate(&series, &statistics, &self.spec)?;

        Ok(AnalysisRecord {
            source_id: series.source_id().to_string(),
            statistics,
            capability: capability.report,
            control_limits: capability.control_limits,
            histogram: charts.histogram,
            control_chart: charts.control_chart,
        })
    }
}

/// Validates `spec` and analyzes `sources` with default settings.
///
/// # Errors
///
/// [`AnalysisError::InvalidSpecLimits`] before any source is processed.
pub fn analyze_batch<I>(spec: SpecLimits, sources: I) -> Result<BatchResult, AnalysisError>
where
    I: IntoIterator,
    I::Item: SeriesSource,
{
    Ok(BatchAnalyzer::new(spec)?.analyze(sources))
}
