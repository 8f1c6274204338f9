//! Descriptive statistics of a sample series.
//!
//! Mean, Bessel-corrected standard deviation, range, and the quartiles
//! under linear interpolation between closest ranks (R-7, NumPy's default
//! percentile definition).

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use crate::error::AnalysisError;
use crate::series::SampleSeries;

/// Summary statistics of one series. `q2` always equals `median`.
///
/// # Examples
///
/// ```
/// use spc_capability::{DescriptiveStatistics, SampleSeries};
///
/// let series = SampleSeries::new("s", vec![10.0, 12.0, 11.0, 13.0, 9.0]);
/// let ds = DescriptiveStatistics::compute(&series).unwrap();
/// assert!((ds.mean - 11.0).abs() < 1e-12);
/// assert!((ds.sample_std_dev - 2.5_f64.sqrt()).abs() < 1e-12);
/// assert_eq!(ds.median, 11.0);
/// assert_eq!(ds.range, 4.0);
/// assert_eq!((ds.q1, ds.q3), (10.0, 12.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStatistics {
    pub mean: f64,
    /// Standard deviation with denominator `n − 1`.
    pub sample_std_dev: f64,
    pub median: f64,
    /// `max − min`.
    pub range: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl DescriptiveStatistics {
    /// Computes the statistics of `series`.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InsufficientSamples`] if the series has fewer
    ///   than 2 values.
    /// - [`AnalysisError::InvalidData`] if any value is NaN or infinite, or
    ///   a statistic overflows the `f64` range.
    pub fn compute(series: &SampleSeries) -> Result<Self, AnalysisError> {
        describe(series.source_id(), series.values())
    }
}

/// Computes [`DescriptiveStatistics`] for raw values; `source_id` is used
/// in error messages only.
pub fn describe(source_id: &str, values: &[f64]) -> Result<DescriptiveStatistics, AnalysisError> {
    check_samples(source_id, values)?;
    let non_finite = || AnalysisError::invalid_data(source_id, NON_FINITE);

    let mean = stats::mean(values).ok_or_else(non_finite)?;
    let sample_std_dev = stats::std_dev(values).ok_or_else(non_finite)?;
    let max = stats::max(values).ok_or_else(non_finite)?;
    let min = stats::min(values).ok_or_else(non_finite)?;
    let quartile = |p| stats::quantile(values, p).ok_or_else(non_finite);
    let (q1, median, q3) = (quartile(0.25)?, quartile(0.5)?, quartile(0.75)?);
    let range = max - min;

    // Finite input can still overflow the accumulators near f64::MAX.
    if ![mean, sample_std_dev, range, q1, median, q3].iter().all(|v| v.is_finite()) {
        return Err(AnalysisError::invalid_data(source_id, OVERFLOW));
    }

    Ok(DescriptiveStatistics {
        mean,
        sample_std_dev,
        median,
        range,
        q1,
        q2: median,
        q3,
    })
}

pub(crate) const NON_FINITE: &str = "series contains NaN or infinite values";
pub(crate) const OVERFLOW: &str = "series statistics overflow the floating-point range";

/// At least two values, all of them finite.
pub(crate) fn check_samples(source_id: &str, values: &[f64]) -> Result<(), AnalysisError> {
    if values.len() < 2 {
        return Err(AnalysisError::InsufficientSamples {
            source_id: source_id.to_string(),
            count: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::invalid_data(source_id, NON_FINITE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn odd_length_series() {
        let ds = describe("s", &[10.0, 12.0, 11.0, 13.0, 9.0]).unwrap();
        assert!((ds.mean - 11.0).abs() < 1e-12);
        assert!((ds.sample_std_dev - 1.581_138_830_084_19).abs() < 1e-10);
        assert_eq!(ds.median, 11.0);
        assert_eq!(ds.q2, ds.median);
        assert_eq!(ds.range, 4.0);
        assert_eq!(ds.q1, 10.0);
        assert_eq!(ds.q3, 12.0);
    }

    #[test]
    fn even_length_quartiles_interpolate() {
        // numpy.percentile([1, 2, 3, 4, 5, 6], [25, 50, 75]) == [2.25, 3.5, 4.75]
        let ds = describe("s", &[6.0, 1.0, 4.0, 2.0, 5.0, 3.0]).unwrap();
        assert!((ds.q1 - 2.25).abs() < 1e-12);
        assert!((ds.median - 3.5).abs() < 1e-12);
        assert!((ds.q3 - 4.75).abs() < 1e-12);
        assert_eq!(ds.range, 5.0);
    }

    #[test]
    fn two_points_is_the_minimum() {
        let ds = describe("s", &[1.0, 3.0]).unwrap();
        assert!((ds.sample_std_dev - 2.0_f64.sqrt()).abs() < 1e-12);

        let err = describe("s", &[1.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientSamples);
        assert_eq!(describe("s", &[]).unwrap_err().kind(), ErrorKind::InsufficientSamples);
    }

    #[test]
    fn constant_series_has_zero_spread() {
        let ds = describe("s", &[4.2; 6]).unwrap();
        assert_eq!(ds.sample_std_dev, 0.0);
        assert_eq!(ds.range, 0.0);
        assert!((ds.q1 - 4.2).abs() < 1e-12);
        assert!((ds.q3 - 4.2).abs() < 1e-12);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = describe("s", &[1.0, f64::NAN, 2.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(describe("s", &[1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn overflowing_statistics_are_rejected() {
        // finite values whose spread or sum exceeds f64::MAX
        for values in [vec![1e308, -1e308], vec![1.5e308, 1.6e308, 1.7e308]] {
            let err = describe("s", &values).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidData, "{values:?}");
        }
    }

    #[test]
    fn repeated_computation_is_bit_identical() {
        let series = SampleSeries::new("s", vec![0.1, 0.7, 0.3, 0.9, 0.2, 0.4]);
        let a = DescriptiveStatistics::compute(&series).unwrap();
        let b = DescriptiveStatistics::compute(&series).unwrap();
        assert_eq!(a.mean.to_bits(), b.mean.to_bits());
        assert_eq!(a.sample_std_dev.to_bits(), b.sample_std_dev.to_bits());
        assert_eq!(a, b);
    }
}
