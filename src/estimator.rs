//! Quaternion estimator driven by filtered accelerometer and magnetometer data

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::axes::Frame;
use crate::error::ConfigError;
use crate::famc::{DEFAULT_PIVOT_EPSILON, FamcError, famc_quaternion};
use crate::filter::AxisFilter;
use crate::logging::{log_debug, log_trace, log_warn};
use crate::math::QuaternionExt;
use crate::sensor::{Clock, Sensor, US_PER_MS};
use crate::tilt::tilt_quaternion;
use crate::types::{EstimateMethod, EstimateOutcome, EstimatorSettings, PivotFallback};

/// Orientation estimator
///
/// Owns one low-pass filter per sensor. Raw samples are consumed at the
/// sensor's reporting cadence through [`Estimator::sample_tick`] (or
/// [`Estimator::periodic_update`]); [`Estimator::estimate`] turns the current
/// filtered directions into a unit quaternion, which is cached until the next
/// estimate.
///
/// Every mutator takes `&mut self`, so sampling and estimating cannot overlap.
/// A host that calls them from preempting contexts keeps the estimator behind
/// its own mutex.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use accelmagiq::{EstimateMethod, Estimator, EstimatorSettings};
///
/// let mut estimator = Estimator::with_settings(EstimatorSettings {
///     method: EstimateMethod::AccelerometerOnly,
///     alpha: 1.0,
///     ..Default::default()
/// });
///
/// // 20 ms sampling period, raw accelerometer in mg
/// estimator.sample_tick(0, Vector3::new(0.0, 0.0, 1000.0), Vector3::new(300.0, 0.0, -400.0), 20_000);
/// estimator.estimate();
///
/// assert_eq!(estimator.components(), [1.0, 0.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Estimator {
    /// Active settings
    settings: EstimatorSettings,
    /// Acceleration filter
    accelerometer: AxisFilter,
    /// Magnetic field filter
    magnetometer: AxisFilter,
    /// Earliest time the next raw sample is consumed (µs)
    next_sample_time: u64,
    /// Last estimated orientation
    quaternion: UnitQuaternion<f64>,
    /// Result of the last estimate
    last_outcome: EstimateOutcome,
}

impl Estimator {
    /// Create an estimator with default settings
    pub fn new() -> Self {
        Self::with_settings(EstimatorSettings::default())
    }

    /// Create an estimator with the given settings
    ///
    /// An out-of-range alpha is clamped into `[0, 1]`. A negative or
    /// non-finite pivot guard is replaced by [`DEFAULT_PIVOT_EPSILON`]. Use
    /// [`Estimator::try_with_settings`] to reject both instead.
    pub fn with_settings(mut settings: EstimatorSettings) -> Self {
        if !settings.pivot_epsilon.is_finite() || settings.pivot_epsilon < 0.0 {
            log_warn!(
                "pivot epsilon {} invalid, using {}",
                settings.pivot_epsilon,
                DEFAULT_PIVOT_EPSILON
            );
            settings.pivot_epsilon = DEFAULT_PIVOT_EPSILON;
        }

        let mut estimator = Estimator {
            settings,
            accelerometer: AxisFilter::new(),
            magnetometer: AxisFilter::new(),
            next_sample_time: 0,
            quaternion: UnitQuaternion::identity(),
            last_outcome: EstimateOutcome::default(),
        };

        estimator.set_coordinate_system(settings.frame);
        estimator.set_low_pass_filter_alpha(settings.alpha);
        estimator
    }

    /// Create an estimator after validating the settings
    pub fn try_with_settings(settings: EstimatorSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::with_settings(settings))
    }

    /// Current settings, with the effective alpha
    pub fn settings(&self) -> EstimatorSettings {
        self.settings
    }

    /// Select the logical frame for both sensor streams
    pub fn set_coordinate_system(&mut self, frame: Frame) {
        self.accelerometer.set_frame(frame);
        self.magnetometer.set_frame(frame);
        self.settings.frame = frame;
    }

    /// Set the low-pass coefficient for both sensor streams
    ///
    /// Clamped into `[0, 1]`; NaN is ignored.
    pub fn set_low_pass_filter_alpha(&mut self, alpha: f64) {
        self.accelerometer.set_alpha(alpha);
        self.magnetometer.set_alpha(alpha);
        self.settings.alpha = self.accelerometer.alpha();
    }

    /// Consume one pair of raw samples if the sampling gate is open
    ///
    /// # Arguments
    /// * `now` - Monotonic time in microseconds
    /// * `accelerometer` - Raw accelerometer reading
    /// * `magnetometer` - Raw magnetometer reading
    /// * `sampling_period_us` - Sensor reporting period in microseconds
    ///
    /// # Returns
    /// `true` if the samples were consumed, `false` if `now` is still before
    /// the next scheduled sample time
    pub fn sample_tick(
        &mut self,
        now: u64,
        accelerometer: Vector3<f64>,
        magnetometer: Vector3<f64>,
        sampling_period_us: u64,
    ) -> bool {
        if now < self.next_sample_time {
            return false;
        }
        self.next_sample_time = now.saturating_add(sampling_period_us);

        self.accelerometer.update(accelerometer);
        self.magnetometer.update(magnetometer);
        true
    }

    /// Periodic hook for the host scheduler
    ///
    /// Reads the clock and, only when the sampling gate is open, both sensors.
    /// The cadence follows the accelerometer's sampling period.
    ///
    /// # Returns
    /// `true` if new samples were consumed
    pub fn periodic_update<C, A, M>(
        &mut self,
        clock: &mut C,
        accelerometer: &mut A,
        magnetometer: &mut M,
    ) -> bool
    where
        C: Clock,
        A: Sensor,
        M: Sensor,
    {
        let now = clock.now_us();
        if now < self.next_sample_time {
            return false;
        }

        let sampling_period_us = u64::from(accelerometer.sampling_period_ms()) * US_PER_MS;
        let raw_accelerometer = accelerometer.read();
        let raw_magnetometer = magnetometer.read();

        self.sample_tick(now, raw_accelerometer, raw_magnetometer, sampling_period_us)
    }

    /// Recompute the quaternion from the current filtered directions
    ///
    /// Without new samples in between, repeated calls give identical results.
    ///
    /// # Returns
    /// Whether the quaternion was updated, replaced by the tilt fallback, or
    /// kept from the previous estimate
    pub fn estimate(&mut self) -> EstimateOutcome {
        let accelerometer = self.accelerometer.coords();

        let outcome = match self.settings.method {
            EstimateMethod::AccelerometerOnly => {
                self.apply(tilt_quaternion(accelerometer), EstimateOutcome::Updated)
            }
            EstimateMethod::Famc => {
                let magnetometer = self.magnetometer.coords();
                match famc_quaternion(accelerometer, magnetometer, self.settings.pivot_epsilon) {
                    Ok(quaternion) => self.apply(Some(quaternion), EstimateOutcome::Updated),
                    Err(FamcError::SingularPivot { pivot, value }) => {
                        log_debug!("FAMC pivot {} singular ({})", pivot, value);
                        match self.settings.pivot_fallback {
                            PivotFallback::RetainPrevious => self.apply(None, EstimateOutcome::Retained),
                            PivotFallback::AccelerometerOnly => {
                                // Negated into the FAMC sign convention (w <= 0)
                                let tilt = tilt_quaternion(accelerometer).map(|q| -q);
                                self.apply(tilt, EstimateOutcome::FellBack)
                            }
                        }
                    }
                    Err(FamcError::Degenerate) => self.apply(None, EstimateOutcome::Retained),
                }
            }
        };

        self.last_outcome = outcome;
        outcome
    }

    /// Last estimated orientation
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        self.quaternion
    }

    /// W component of the last estimate
    pub fn w(&self) -> f64 {
        self.quaternion.w
    }

    /// X component of the last estimate
    pub fn x(&self) -> f64 {
        self.quaternion.i
    }

    /// Y component of the last estimate
    pub fn y(&self) -> f64 {
        self.quaternion.j
    }

    /// Z component of the last estimate
    pub fn z(&self) -> f64 {
        self.quaternion.k
    }

    /// Last estimate as `[w, x, y, z]`
    pub fn components(&self) -> [f64; 4] {
        [self.w(), self.x(), self.y(), self.z()]
    }

    /// Last estimate as Euler angles (roll, pitch, yaw) in degrees
    pub fn euler_angles_degrees(&self) -> Vector3<f64> {
        self.quaternion.to_euler_degrees()
    }

    /// Result of the last [`Estimator::estimate`] call
    pub fn last_outcome(&self) -> EstimateOutcome {
        self.last_outcome
    }

    /// Acceleration filter
    pub fn accelerometer(&self) -> &AxisFilter {
        &self.accelerometer
    }

    /// Magnetic field filter
    pub fn magnetometer(&self) -> &AxisFilter {
        &self.magnetometer
    }

    /// Earliest time (µs) the next raw sample will be consumed
    pub fn next_sample_time(&self) -> u64 {
        self.next_sample_time
    }

    /// Return filters, sampling gate and quaternion to their power-on state
    ///
    /// Settings are kept.
    pub fn reset(&mut self) {
        self.accelerometer.reset();
        self.magnetometer.reset();
        self.next_sample_time = 0;
        self.quaternion = UnitQuaternion::identity();
        self.last_outcome = EstimateOutcome::default();
    }

    /// Store a candidate, or keep the previous quaternion when there is none
    fn apply(&mut self, candidate: Option<Quaternion<f64>>, outcome: EstimateOutcome) -> EstimateOutcome {
        match candidate {
            Some(quaternion) => {
                // Candidates are normalized by the algorithms
                self.quaternion = UnitQuaternion::new_unchecked(quaternion);
                outcome
            }
            None => {
                log_trace!("no valid quaternion candidate, keeping previous estimate");
                EstimateOutcome::Retained
            }
        }
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new()
    }
}
