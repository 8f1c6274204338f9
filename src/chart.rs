//! Chart datasets for an external plotting collaborator.
//!
//! Two independent datasets are produced per series; nothing here draws
//! or writes images.
//!
//! - [`HistogramData`]: equal-width bins over the observed range of the
//!   raw values.
//! - [`ControlChartSeries`]: a plotted series with horizontal reference
//!   lines at USL and LSL. By default the points are resampled from
//!   `Normal(mean, s)` with a fixed seed, so identical input always yields
//!   identical points. [`ControlChartSource::Observed`] plots the actual
//!   ordered samples instead.

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::descriptive::{DescriptiveStatistics, NON_FINITE};
use crate::error::AnalysisError;
use crate::series::SampleSeries;
use crate::spec::SpecLimits;

/// Where the control-chart points come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlChartSource {
    /// Synthetic draws from the normal distribution fitted to the series.
    #[default]
    Resampled,
    /// The series' own values in their original order.
    Observed,
}

/// Chart generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Number of histogram bins (at least 1).
    pub histogram_bins: usize,
    /// Number of resampled control-chart points.
    pub control_points: usize,
    /// Seed of the resampling generator.
    pub seed: u64,
    pub control_source: ControlChartSource,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            control_points: 100,
            seed: 0,
            control_source: ControlChartSource::Resampled,
        }
    }
}

/// Histogram of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramData {
    /// Bin edges, `counts.len() + 1` of them. The last bin is closed on
    /// the right.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub bin_width: f64,
}

impl HistogramData {
    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of binned observations.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Control-chart points with their reference lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlChartSeries {
    pub points: Vec<f64>,
    /// Horizontal reference line at the upper specification limit.
    pub usl: f64,
    /// Horizontal reference line at the lower specification limit.
    pub lsl: f64,
    pub source: ControlChartSource,
}

/// Both chart datasets of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub histogram: HistogramData,
    pub control_chart: ControlChartSeries,
}

/// Produces [`ChartData`] for series under fixed [`ChartSettings`].
///
/// # Examples
///
/// ```
/// use spc_capability::{ChartDataGenerator, DescriptiveStatistics, SampleSeries, SpecLimits};
///
/// let series = SampleSeries::new("s", vec![10.0, 12.0, 11.0, 13.0, 9.0]);
/// let stats = DescriptiveStatistics::compute(&series).unwrap();
/// let spec = SpecLimits::new(11.0, 8.0, 14.0);
///
/// let generator = ChartDataGenerator::default();
/// let charts = generator.generate(&series, &stats, &spec).unwrap();
/// assert_eq!(charts.histogram.n_bins(), 20);
/// assert_eq!(charts.histogram.total(), 5);
/// assert_eq!(charts.control_chart.points.len(), 100);
///
/// // fixed seed
/// assert_eq!(charts, generator.generate(&series, &stats, &spec).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartDataGenerator {
    settings: ChartSettings,
}

impl ChartDataGenerator {
    pub fn new(settings: ChartSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Builds the histogram and control-chart datasets of `series`.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InsufficientSamples`] if the series is empty.
    /// - [`AnalysisError::InvalidData`] if the series holds non-finite
    ///   values or `stats` cannot parameterize a normal distribution.
    pub fn generate(
        &self,
        series: &SampleSeries,
        stats: &DescriptiveStatistics,
        spec: &SpecLimits,
    ) -> Result<ChartData, AnalysisError> {
        let histogram = histogram(
            series.source_id(),
            series.values(),
            self.settings.histogram_bins,
        )?;

        let points = match self.settings.control_source {
            ControlChartSource::Resampled => resample_normal(
                series.source_id(),
                stats.mean,
                stats.sample_std_dev,
                self.settings.control_points,
                self.settings.seed,
            )?,
            ControlChartSource::Observed => series.values().to_vec(),
        };

        Ok(ChartData {
            histogram,
            control_chart: ControlChartSeries {
                points,
                usl: spec.usl,
                lsl: spec.lsl,
                source: self.settings.control_source,
            },
        })
    }
}

/// Bins `values` into `bins` equal-width bins over `[min, max]`.
///
/// A series whose values are all equal is binned over
/// `[value − 0.5, value + 0.5]`. Every value is counted in the bin `i`
/// with `edges[i] <= x < edges[i + 1]`, the last bin being closed.
pub fn histogram(
    source_id: &str,
    values: &[f64],
    bins: usize,
) -> Result<HistogramData, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::InsufficientSamples {
            source_id: source_id.to_string(),
            count: 0,
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::invalid_data(source_id, NON_FINITE));
    }

    let bins = bins.max(1);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let bin_width = (hi - lo) / bins as f64;

    let mut edges: Vec<f64> = (0..bins).map(|i| lo + i as f64 * bin_width).collect();
    edges.push(hi);

    let mut counts = vec![0_usize; bins];
    for &x in values {
        let mut bin = (((x - lo) / bin_width).floor() as usize).min(bins - 1);
        // The quotient can land one bin off the stored edges after rounding.
        if x < edges[bin] {
            bin -= 1;
        } else if bin + 1 < bins && x >= edges[bin + 1] {
            bin += 1;
        }
        counts[bin] += 1;
    }

    Ok(HistogramData {
        edges,
        counts,
        bin_width,
    })
}

/// Draws `n` points from `Normal(mean, std_dev)` with a generator seeded
/// by `seed`.
pub fn resample_normal(
    source_id: &str,
    mean: f64,
    std_dev: f64,
    n: usize,
    seed: u64,
) -> Result<Vec<f64>, AnalysisError> {
    let normal = Normal::new(mean, std_dev).map_err(|e| {
        AnalysisError::invalid_data(source_id, format!("cannot resample control chart: {e}"))
    })?;
    let mut rng = Pcg64::seed_from_u64(seed);
    Ok(normal.sample_iter(&mut rng).take(n).collect())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn counts_agree_with_edges(
            data in proptest::collection::vec(-1e4_f64..1e4, 1..=200),
            bins in 1_usize..40,
        ) {
            let h = histogram("p", &data, bins).unwrap();
            prop_assert_eq!(h.total(), data.len());
            prop_assert_eq!(&h.counts, &super::tests::counts_from_edges(&h, &data));
        }

        #[test]
        fn evenly_spaced_counts_agree_with_edges(
            start in -1e3_f64..1e3,
            step in 1e-4_f64..10.0,
            n in 2_usize..80,
        ) {
            let data: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            let h = histogram("p", &data, 20).unwrap();
            prop_assert_eq!(&h.counts, &super::tests::counts_from_edges(&h, &data));
        }
    }
}
