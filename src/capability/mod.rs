//! Process capability analysis.
//!
//! Computes the short-term and long-term capability indices of a series
//! against two-sided specification limits, together with the 3-sigma
//! control limits derived from the same spread estimate.
//!
//! # Indices
//!
//! - **Cp**, **Cpl**, **Cpu**, **Cpk**: short-term, sample standard
//!   deviation (denominator `n − 1`)
//! - **Pp**, **Ppl**, **Ppu**, **Ppk**: long-term, population standard
//!   deviation (denominator `n`)
//!
//! Cpk and Ppk are always the minimum of their one-sided indices.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.

mod indices;
mod limits;

pub use indices::{analyze, CapabilityAnalysis, CapabilityReport};
pub use limits::ControlLimits;
