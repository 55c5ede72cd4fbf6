//! Configuration errors

use core::fmt;

/// Errors reported when validating estimator configuration
///
/// The numeric pipeline itself never fails: degenerate inputs are absorbed by
/// keeping the last good value. These errors only come from the strict
/// configuration entry points ([`crate::EstimatorSettings::validate`],
/// [`crate::Estimator::try_with_settings`] and `Frame::try_from`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Low-pass coefficient outside `[0, 1]` or not a number
    AlphaOutOfRange {
        /// Rejected value
        alpha: f64,
    },
    /// FAMC pivot guard is negative or not finite
    InvalidPivotEpsilon {
        /// Rejected value
        epsilon: f64,
    },
    /// Coordinate frame index with no matching frame
    UnknownFrame {
        /// Rejected index
        index: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::AlphaOutOfRange { alpha } => {
                write!(f, "Low-pass alpha {} is outside [0, 1]", alpha)
            }
            ConfigError::InvalidPivotEpsilon { epsilon } => {
                write!(f, "Pivot epsilon {} must be finite and non-negative", epsilon)
            }
            ConfigError::UnknownFrame { index } => {
                write!(f, "Unknown coordinate frame index {}", index)
            }
        }
    }
}

impl core::error::Error for ConfigError {}
