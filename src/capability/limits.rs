//! Shewhart control limits.

use serde::{Deserialize, Serialize};

/// Control limits for a series.
///
/// # Invariants
///
/// - `lcl <= cl <= ucl`
/// - `ucl - cl == cl - lcl == 3 * sigma`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Upper control limit (CL + 3 sigma).
    pub ucl: f64,
    /// Center line (process mean).
    pub cl: f64,
    /// Lower control limit (CL − 3 sigma).
    pub lcl: f64,
}

impl ControlLimits {
    /// Limits at `center ± 3·sigma`.
    ///
    /// # Examples
    ///
    /// ```
    /// use spc_capability::ControlLimits;
    ///
    /// let limits = ControlLimits::three_sigma(25.0, 2.0);
    /// assert_eq!(limits.ucl, 31.0);
    /// assert_eq!(limits.lcl, 19.0);
    /// assert!(limits.contains(30.0));
    /// assert!(!limits.contains(31.5));
    /// ```
    pub fn three_sigma(center: f64, sigma: f64) -> Self {
        Self {
            ucl: center + 3.0 * sigma,
            cl: center,
            lcl: center - 3.0 * sigma,
        }
    }

    /// Returns `true` if `value` lies within `[lcl, ucl]`.
    pub fn contains(&self, value: f64) -> bool {
        (self.lcl..=self.ucl).contains(&value)
    }
}
