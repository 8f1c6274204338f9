//! Capability indices (Cp, Cpl, Cpu, Cpk, Pp, Ppl, Ppu, Ppk).
//!
//! Both index families come from the same series and differ only in the
//! spread estimate: short-term indices divide by the sample standard
//! deviation (`n − 1`), long-term indices by the population standard
//! deviation (`n`). For small `n` the two diverge measurably:
//! `Cp / Pp == sqrt((n − 1) / n)`.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.
//! - Kane (1986), "Process Capability Indices", *Journal of Quality Technology*
//!   18(1), pp. 41--52.

use serde::{Deserialize, Serialize};
use u_numflow::stats;

use super::limits::ControlLimits;
use crate::descriptive::{check_samples, NON_FINITE, OVERFLOW};
use crate::error::AnalysisError;
use crate::series::SampleSeries;
use crate::spec::SpecLimits;

/// Computed capability indices of one series.
///
/// Every ratio is finite: a zero spread is reported as
/// [`AnalysisError::ZeroVariance`] and an overflowing one as
/// [`AnalysisError::InvalidData`] instead of a report.
///
/// # Index interpretation
///
/// | Index | Value | Interpretation |
/// |-------|-------|----------------|
/// | Cp/Pp | >= 1.33 | Spread fits the tolerance |
/// | Cpk/Ppk | >= 1.33 | Spread fits and the process is centered |
///
/// Reference: Montgomery (2019), Chapter 8, Table 8.5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityReport {
    /// Mean used by every index.
    pub mean_for_capability: f64,
    pub sample_count: usize,
    /// Sample standard deviation (denominator `n − 1`).
    pub std_dev_short_term: f64,
    /// Population standard deviation (denominator `n`).
    pub std_dev_long_term: f64,
    /// Cp = (USL − LSL) / (6·σ_short).
    pub cp: f64,
    /// Cpl = (mean − LSL) / (3·σ_short).
    pub cpl: f64,
    /// Cpu = (USL − mean) / (3·σ_short).
    pub cpu: f64,
    /// Cpk = min(Cpl, Cpu).
    pub cpk: f64,
    /// Pp = (USL − LSL) / (6·σ_long).
    pub pp: f64,
    /// Ppl = (mean − LSL) / (3·σ_long).
    pub ppl: f64,
    /// Ppu = (USL − mean) / (3·σ_long).
    pub ppu: f64,
    /// Ppk = min(Ppl, Ppu).
    pub ppk: f64,
}

/// Capability report plus the control limits derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityAnalysis {
    pub report: CapabilityReport,
    pub control_limits: ControlLimits,
}

impl CapabilityAnalysis {
    /// Analyzes `series` against `spec`.
    ///
    /// `spec.target` does not enter any formula.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InsufficientSamples`] if the series has fewer than
    ///   2 values.
    /// - [`AnalysisError::ZeroVariance`] if either standard deviation is 0.
    /// - [`AnalysisError::InvalidData`] if any value is NaN or infinite, or
    ///   the mean, a standard deviation, an index or a control limit
    ///   overflows the `f64` range.
    ///
    /// # Examples
    ///
    /// ```
    /// use spc_capability::{CapabilityAnalysis, SampleSeries, SpecLimits};
    ///
    /// let series = SampleSeries::new("s", vec![10.0, 12.0, 11.0, 13.0, 9.0]);
    /// let spec = SpecLimits::new(11.0, 8.0, 14.0);
    ///
    /// let analysis = CapabilityAnalysis::compute(&series, &spec).unwrap();
    /// let r = analysis.report;
    /// assert!((r.cp - 0.6325).abs() < 1e-4);
    /// assert_eq!(r.cpk, r.cpl.min(r.cpu));
    /// assert_eq!(r.ppk, r.ppl.min(r.ppu));
    /// let ucl = 11.0 + 3.0 * r.std_dev_short_term;
    /// assert!((analysis.control_limits.ucl - ucl).abs() < 1e-12);
    /// ```
    pub fn compute(series: &SampleSeries, spec: &SpecLimits) -> Result<Self, AnalysisError> {
        analyze(series.source_id(), series.values(), spec)
    }
}

/// Computes a [`CapabilityAnalysis`] for raw values; `source_id` is used in
/// error messages only.
pub fn analyze(
    source_id: &str,
    values: &[f64],
    spec: &SpecLimits,
) -> Result<CapabilityAnalysis, AnalysisError> {
    check_samples(source_id, values)?;
    let non_finite = || AnalysisError::invalid_data(source_id, NON_FINITE);
    let mean = stats::mean(values).ok_or_else(non_finite)?;
    let sigma_short = stats::std_dev(values).ok_or_else(non_finite)?;
    let sigma_long = stats::population_std_dev(values).ok_or_else(non_finite)?;

    if !mean.is_finite() || !sigma_short.is_finite() || !sigma_long.is_finite() {
        return Err(AnalysisError::invalid_data(source_id, OVERFLOW));
    }
    if sigma_short <= 0.0 || sigma_long <= 0.0 {
        return Err(AnalysisError::ZeroVariance {
            source_id: source_id.to_string(),
        });
    }

    let (cp, cpl, cpu, cpk) = indices(spec, mean, sigma_short);
    let (pp, ppl, ppu, ppk) = indices(spec, mean, sigma_long);
    let control_limits = ControlLimits::three_sigma(mean, sigma_short);

    // A tiny but non-zero sigma against a wide tolerance still overflows.
    let derived = [
        cp,
        cpl,
        cpu,
        pp,
        ppl,
        ppu,
        control_limits.ucl,
        control_limits.lcl,
    ];
    if !derived.iter().all(|v| v.is_finite()) {
        return Err(AnalysisError::invalid_data(
            source_id,
            "capability indices overflow the floating-point range",
        ));
    }

    let report = CapabilityReport {
        mean_for_capability: mean,
        sample_count: values.len(),
        std_dev_short_term: sigma_short,
        std_dev_long_term: sigma_long,
        cp,
        cpl,
        cpu,
        cpk,
        pp,
        ppl,
        ppu,
        ppk,
    };

    Ok(CapabilityAnalysis {
        report,
        control_limits,
    })
}

/// (ratio, lower, upper, min(lower, upper)) for one spread estimate.
fn indices(spec: &SpecLimits, mean: f64, sigma: f64) -> (f64, f64, f64, f64) {
    let ratio = (spec.usl - spec.lsl) / (6.0 * sigma);
    let lower = (mean - spec.lsl) / (3.0 * sigma);
    let upper = (spec.usl - mean) / (3.0 * sigma);
    (ratio, lower, upper, lower.min(upper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn spec() -> SpecLimits {
        SpecLimits::new(11.0, 8.0, 14.0)
    }

    // -----------------------------------------------------------------------
    // Known numerical examples
    // -----------------------------------------------------------------------

    /// values = [10, 12, 11, 13, 9], LSL = 8, USL = 14
    ///
    /// mean = 11, s = sqrt(2.5) = 1.5811, sigma_pop = sqrt(2) = 1.4142
    /// Cp = Cpl = Cpu = Cpk = 6 / (6 * 1.5811) = 0.6325
    /// Pp = Ppl = Ppu = Ppk = 6 / (6 * 1.4142) = 0.7071
    #[test]
    fn symmetric_process() {
        let a = analyze("s", &[10.0, 12.0, 11.0, 13.0, 9.0], &spec()).unwrap();
        let r = a.report;

        assert_eq!(r.mean_for_capability, 11.0);
        assert_eq!(r.sample_count, 5);
        assert!((r.std_dev_short_term - 1.5811).abs() < 1e-4);
        assert!((r.std_dev_long_term - 1.4142).abs() < 1e-4);

        for (name, value) in [("cp", r.cp), ("cpl", r.cpl), ("cpu", r.cpu), ("cpk", r.cpk)] {
            assert!((value - 0.6325).abs() < 1e-4, "{name}: expected ~0.6325, got {value}");
        }
        for (name, value) in [("pp", r.pp), ("ppl", r.ppl), ("ppu", r.ppu), ("ppk", r.ppk)] {
            assert!((value - 0.7071).abs() < 1e-4, "{name}: expected ~0.7071, got {value}");
        }
        assert_eq!(r.cpl, r.cpu);
        assert_eq!(r.cpk, r.cpl);
    }

    /// LSL = 0, USL = 10, data centered near 8 so the upper side dominates.
    #[test]
    fn off_center_process_takes_worse_side() {
        let data = [7.5, 8.0, 8.5, 7.0, 9.0, 8.0];
        let limits = SpecLimits::new(5.0, 0.0, 10.0);
        let r = analyze("s", &data, &limits).unwrap().report;

        assert!(r.cpu < r.cpl, "cpu ({}) should be < cpl ({})", r.cpu, r.cpl);
        assert_eq!(r.cpk, r.cpu);
        assert_eq!(r.ppk, r.ppu);
        assert!(r.cpk < r.cp);
    }

    #[test]
    fn mean_outside_limits_gives_negative_cpk() {
        let r = analyze("s", &[15.0, 16.0, 17.0], &spec()).unwrap().report;
        assert!(r.cpu < 0.0);
        assert!(r.cpk < 0.0);
        assert!(r.cp > 0.0);
    }

    #[test]
    fn short_and_long_term_use_different_denominators() {
        let data = [10.0, 12.0, 11.0, 13.0, 9.0];
        let r = analyze("s", &data, &spec()).unwrap().report;
        let n = data.len() as f64;

        let ratio = r.std_dev_short_term / r.std_dev_long_term;
        assert!((ratio - (n / (n - 1.0)).sqrt()).abs() < 1e-12, "ratio {ratio}");
        assert!((r.cp / r.pp - ((n - 1.0) / n).sqrt()).abs() < 1e-12);
        assert!(r.pp > r.cp, "small n: Pp should exceed Cp");
    }

    #[test]
    fn control_limits_use_short_term_sigma() {
        let a = analyze("s", &[10.0, 12.0, 11.0, 13.0, 9.0], &spec()).unwrap();
        let sigma = a.report.std_dev_short_term;
        assert!((a.control_limits.ucl - (11.0 + 3.0 * sigma)).abs() < 1e-12);
        assert!((a.control_limits.lcl - (11.0 - 3.0 * sigma)).abs() < 1e-12);
        assert_eq!(a.control_limits.cl, 11.0);
    }

    #[test]
    fn target_does_not_change_indices() {
        let data = [10.0, 12.0, 11.0, 13.0, 9.0];
        let a = analyze("s", &data, &SpecLimits::new(11.0, 8.0, 14.0)).unwrap();
        let b = analyze("s", &data, &SpecLimits::new(13.5, 8.0, 14.0)).unwrap();
        assert_eq!(a, b);
    }

    // -----------------------------------------------------------------------
    // Edge cases
    // -----------------------------------------------------------------------

    #[test]
    fn constant_series_is_zero_variance() {
        let err = analyze("flat.csv", &[5.0; 10], &spec()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroVariance);
        assert!(err.to_string().starts_with("flat.csv"));
    }

    #[test]
    fn fewer_than_two_values() {
        assert_eq!(
            analyze("s", &[5.0], &spec()).unwrap_err().kind(),
            ErrorKind::InsufficientSamples
        );
        assert_eq!(
            analyze("s", &[], &spec()).unwrap_err().kind(),
            ErrorKind::InsufficientSamples
        );
    }

    #[test]
    fn nan_data_is_invalid() {
        let err = analyze("s", &[4.0, f64::NAN, 6.0], &spec()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn overflowing_spread_is_invalid_data() {
        // delta overflows in the variance update
        let err = analyze("s", &[1e308, -1e308], &spec()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        // sum overflows in the mean
        let series = SampleSeries::new("s", vec![1.5e308, 1.6e308, 1.7e308]);
        let err = CapabilityAnalysis::compute(&series, &spec()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn overflowing_indices_are_invalid_data() {
        // sigma = 1e-150, tolerance = 2e160: Cp = 2e160 / 6e-150 is not representable
        let wide = SpecLimits::new(0.0, -1e160, 1e160);
        let err = analyze("s", &[0.0, 1e-150, 2e-150], &wide).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn repeated_analysis_is_bit_identical() {
        let series = SampleSeries::new("s", vec![9.7, 10.4, 10.1, 9.9, 10.3, 10.0]);
        let a = CapabilityAnalysis::compute(&series, &spec()).unwrap();
        let b = CapabilityAnalysis::compute(&series, &spec()).unwrap();
        assert_eq!(a.report.cpk.to_bits(), b.report.cpk.to_bits());
        assert_eq!(a.report.ppk.to_bits(), b.report.ppk.to_bits());
        assert_eq!(a, b);
    }
}
