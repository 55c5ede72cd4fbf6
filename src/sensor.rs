//! Interfaces to the host's clock and sensor drivers
//!
//! The estimator never talks to hardware directly. A board support layer
//! implements these traits and hands them to
//! [`crate::Estimator::periodic_update`] from its scheduler or idle hook.

use nalgebra::Vector3;

/// Monotonic microsecond clock
///
/// Assumed to never wrap within the device's uptime.
pub trait Clock {
    /// Current time in microseconds
    fn now_us(&mut self) -> u64;
}

/// Three-axis sensor driver (accelerometer or magnetometer)
///
/// Readings may be in any unit as long as it is consistent across calls;
/// only the direction is used.
pub trait Sensor {
    /// Latest raw reading in physical sensor axes
    fn read(&mut self) -> Vector3<f64>;

    /// Interval between fresh readings, in milliseconds
    fn sampling_period_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now_us(&mut self) -> u64 {
        (**self).now_us()
    }
}

impl<S: Sensor + ?Sized> Sensor for &mut S {
    fn read(&mut self) -> Vector3<f64> {
        (**self).read()
    }

    fn sampling_period_ms(&self) -> u32 {
        (**self).sampling_period_ms()
    }
}

/// Microseconds in one millisecond
pub(crate) const US_PER_MS: u64 = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSensor(Vector3<f64>);

    impl Sensor for FixedSensor {
        fn read(&mut self) -> Vector3<f64> {
            self.0
        }

        fn sampling_period_ms(&self) -> u32 {
            20
        }
    }

    fn read_through<S: Sensor>(mut sensor: S) -> (Vector3<f64>, u32) {
        (sensor.read(), sensor.sampling_period_ms())
    }

    #[test]
    fn test_mutable_reference_forwards() {
        let mut sensor = FixedSensor(Vector3::new(1.0, 2.0, 3.0));
        let (reading, period) = read_through(&mut sensor);
        assert_eq!(reading, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(period, 20);
    }
}
