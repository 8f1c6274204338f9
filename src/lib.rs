//! # spc-capability
//!
//! Process capability analysis for batches of sample series.
//!
//! Each series is run through descriptive statistics, short- and
//! long-term capability indices (Cp, Cpl, Cpu, Cpk, Pp, Ppl, Ppu, Ppk),
//! 3-sigma control limits, and chart datasets. The results are collected
//! into an ordered [`BatchResult`] that renderers consume. A failing
//! series yields an [`ErrorRecord`] and never aborts the batch.
//!
//! ## Modules
//!
//! - [`descriptive`]: mean, standard deviation, median, range, quartiles
//! - [`capability`]: capability indices and control limits
//! - [`chart`]: histogram bins and control-chart series
//! - [`batch`]: batch orchestration with per-series failure isolation
//! - [`series`]: sample series, tabular sources, CSV loading
//! - [`report`]: plain-text report
//!
//! ## Example
//!
//! ```
//! use spc_capability::{analyze_batch, SampleSeries, SpecLimits};
//!
//! let spec = SpecLimits::parse("11", "8", "14").unwrap();
//! let series = SampleSeries::new("line1", vec![10.0, 12.0, 11.0, 13.0, 9.0]);
//!
//! let result = analyze_batch(spec, [series]).unwrap();
//! let record = result.analyses().next().unwrap();
//! assert!((record.capability.cpk - 0.6325).abs() < 1e-4);
//! ```

pub mod batch;
pub mod capability;
pub mod chart;
pub mod descriptive;
pub mod error;
pub mod record;
pub mod report;
pub mod series;
pub mod spec;

pub use batch::{analyze_batch, BatchAnalyzer};
pub use capability::{CapabilityAnalysis, CapabilityReport, ControlLimits};
pub use chart::{
    ChartData, ChartDataGenerator, ChartSettings, ControlChartSeries, ControlChartSource,
    HistogramData,
};
pub use descriptive::DescriptiveStatistics;
pub use error::{AnalysisError, ErrorKind};
pub use record::{AnalysisRecord, BatchResult, ErrorRecord, SeriesRecord};
pub use series::{FailedSource, SampleSeries, SeriesSource, Table, DEFAULT_COLUMN};
pub use spec::SpecLimits;
