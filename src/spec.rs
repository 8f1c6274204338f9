//! Specification limits shared by every series of a batch.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Target value and lower/upper specification limits.
///
/// Created once before a batch starts and shared read-only across all
/// series. `target` is carried for reporting only; none of the capability
/// formulas use it.
///
/// # Examples
///
/// ```
/// use spc_capability::SpecLimits;
///
/// let spec = SpecLimits::new(11.0, 8.0, 14.0);
/// assert!(spec.validate().is_ok());
/// assert_eq!(spec.tolerance(), 6.0);
///
/// // Inverted limits are rejected
/// assert!(SpecLimits::new(7.0, 10.0, 5.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecLimits {
    pub target: f64,
    pub lsl: f64,
    pub usl: f64,
}

impl SpecLimits {
    pub fn new(target: f64, lsl: f64, usl: f64) -> Self {
        Self { target, lsl, usl }
    }

    /// Parses limits from user-entered text and validates them.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidSpecLimits`] if any field is not a number or
    /// [`validate`](Self::validate) fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use spc_capability::SpecLimits;
    ///
    /// let spec = SpecLimits::parse("11", " 8.0", "14 ").unwrap();
    /// assert_eq!(spec, SpecLimits::new(11.0, 8.0, 14.0));
    ///
    /// assert!(SpecLimits::parse("eleven", "8", "14").is_err());
    /// ```
    pub fn parse(target: &str, lsl: &str, usl: &str) -> Result<Self, AnalysisError> {
        let spec = Self {
            target: parse_field("target", target)?,
            lsl: parse_field("LSL", lsl)?,
            usl: parse_field("USL", usl)?,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks that all limits are finite and `lsl < usl`.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, value) in [("target", self.target), ("LSL", self.lsl), ("USL", self.usl)] {
            if !value.is_finite() {
                return Err(AnalysisError::InvalidSpecLimits(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.lsl >= self.usl {
            return Err(AnalysisError::InvalidSpecLimits(format!(
                "LSL ({}) must be less than USL ({})",
                self.lsl, self.usl
            )));
        }
        Ok(())
    }

    /// Width of the specification band, `usl - lsl`.
    pub fn tolerance(&self) -> f64 {
        self.usl - self.lsl
    }
}

fn parse_field(name: &str, text: &str) -> Result<f64, AnalysisError> {
    text.trim().parse::<f64>().map_err(|_| {
        AnalysisError::InvalidSpecLimits(format!("{name} is not a number: '{}'", text.trim()))
    })
}
