//! Accelerometer-only tilt estimate

use nalgebra::{ComplexField, Quaternion, Vector3};

use crate::math::normalize_quaternion;

/// Shortest rotation taking the measured gravity direction onto local up.
///
/// Closed-form square-root solution yielding roll and pitch only. The heading
/// component `z` is always zero.
///
/// # Arguments
/// * `accelerometer` - Unit acceleration vector in the logical frame
///
/// # Returns
/// The normalized quaternion `(w, x, y, z)`, or `None` when the candidate has
/// no finite positive norm. That happens at `az == -1` (device upside down),
/// where `w` is zero and the divisions are undefined.
///
/// # Example
/// ```
/// use nalgebra::{Quaternion, Vector3};
/// use accelmagiq::tilt::tilt_quaternion;
///
/// // Device flat, z up: no tilt
/// let q = tilt_quaternion(Vector3::new(0.0, 0.0, 1.0)).unwrap();
/// assert_eq!(q, Quaternion::new(1.0, 0.0, 0.0, 0.0));
///
/// // Upside down: undefined
/// assert!(tilt_quaternion(Vector3::new(0.0, 0.0, -1.0)).is_none());
/// ```
pub fn tilt_quaternion(accelerometer: Vector3<f64>) -> Option<Quaternion<f64>> {
    let ax = accelerometer.x;
    let ay = accelerometer.y;
    let az = accelerometer.z;

    let w = ComplexField::sqrt((az + 1.0) / 2.0);
    let x = ay / (2.0 * w);
    let y = -ax / (2.0 * w);
    let z = 0.0;

    normalize_quaternion(w, x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Unit, UnitQuaternion};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_level_is_identity() {
        let q = tilt_quaternion(Vector3::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(q, Quaternion::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_upside_down_is_rejected() {
        assert!(tilt_quaternion(Vector3::new(0.0, 0.0, -1.0)).is_none());
    }

    #[test]
    fn test_thirty_degree_roll() {
        // Gravity measured along +y and +z after a 30° roll about x
        let angle = 30f64.to_radians();
        let accel = Vector3::new(0.0, angle.sin(), angle.cos());

        let q = tilt_quaternion(accel).unwrap();

        assert!((q.w - (angle / 2.0).cos()).abs() < EPSILON);
        assert!((q.i - (angle / 2.0).sin()).abs() < EPSILON);
        assert!(q.j.abs() < EPSILON);
        assert_eq!(q.k, 0.0);
    }

    #[test]
    fn test_rotates_gravity_onto_up() {
        let samples = [
            Vector3::new(0.3, -0.2, 0.9),
            Vector3::new(-0.7, 0.1, 0.2),
            Vector3::new(0.5, 0.5, -0.6),
        ];

        for sample in samples {
            let accel = Unit::new_normalize(sample).into_inner();
            let q = UnitQuaternion::from_quaternion(tilt_quaternion(accel).unwrap());
            let up = q * accel;

            assert!(
                (up - Vector3::new(0.0, 0.0, 1.0)).norm() < EPSILON,
                "{:?} rotated to {:?}",
                accel,
                up
            );
        }
    }

    #[test]
    fn test_unit_norm() {
        let accel = Unit::new_normalize(Vector3::new(-0.2, 0.9, 0.1)).into_inner();
        let q = tilt_quaternion(accel).unwrap();
        assert!((q.norm() - 1.0).abs() < EPSILON);
    }
}
