//! Configuration and status types for the estimator

use crate::axes::Frame;
use crate::error::ConfigError;
use crate::famc::DEFAULT_PIVOT_EPSILON;
use crate::filter::DEFAULT_ALPHA;

/// Quaternion estimation algorithm
///
/// Chosen once when the estimator is built; the two variants share no state.
///
/// # Variants
/// - **AccelerometerOnly**: roll and pitch from gravity alone, heading is zero
/// - **Famc**: full attitude from gravity and the magnetic field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EstimateMethod {
    /// Closed-form tilt from the accelerometer
    AccelerometerOnly,
    /// Fast Accelerometer-Magnetometer Combination
    #[default]
    Famc,
}

/// What FAMC does when an elimination pivot fails the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PivotFallback {
    /// Keep the previous quaternion
    RetainPrevious,
    /// Use the accelerometer-only tilt for this estimate (heading drops to zero)
    #[default]
    AccelerometerOnly,
}

/// Estimator settings
///
/// # Example
/// ```
/// use accelmagiq::{EstimateMethod, EstimatorSettings, Frame, PivotFallback};
///
/// let settings = EstimatorSettings {
///     method: EstimateMethod::Famc,
///     frame: Frame::Tilt,
///     alpha: 0.2,                                // heavier smoothing
///     pivot_epsilon: 1e-6,
///     pivot_fallback: PivotFallback::RetainPrevious,
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimatorSettings {
    /// Algorithm variant, fixed for the estimator's lifetime
    pub method: EstimateMethod,
    /// Logical frame applied to both sensor streams
    pub frame: Frame,
    /// Low-pass coefficient in `[0, 1]`, shared by both sensor streams
    ///
    /// `1.0` disables smoothing. Lower values reject more noise but respond
    /// more slowly to real orientation changes.
    pub alpha: f64,
    /// Smallest accepted FAMC pivot magnitude
    pub pivot_epsilon: f64,
    /// Policy when a FAMC pivot is below `pivot_epsilon`
    pub pivot_fallback: PivotFallback,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            method: EstimateMethod::default(),
            frame: Frame::default(),
            alpha: DEFAULT_ALPHA,
            pivot_epsilon: DEFAULT_PIVOT_EPSILON,
            pivot_fallback: PivotFallback::default(),
        }
    }
}

impl EstimatorSettings {
    /// Check the numeric fields without modifying them
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::AlphaOutOfRange { alpha: self.alpha });
        }
        if !self.pivot_epsilon.is_finite() || self.pivot_epsilon < 0.0 {
            return Err(ConfigError::InvalidPivotEpsilon {
                epsilon: self.pivot_epsilon,
            });
        }
        Ok(())
    }
}

/// Result of the most recent [`crate::Estimator::estimate`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EstimateOutcome {
    /// The configured algorithm produced a new quaternion
    #[default]
    Updated,
    /// FAMC hit a singular pivot and the accelerometer-only tilt was used
    ///
    /// The tilt quaternion is negated to match the FAMC output's `w <= 0`
    /// sign, so streamed components do not flip when a pivot fails.
    FellBack,
    /// No valid candidate; the previous quaternion was kept
    Retained,
}
