//! Mathematical utilities and nalgebra extensions

use nalgebra::{ComplexField, Quaternion, UnitQuaternion, Vector3};

/// Mathematical constants
pub const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Normalize a vector, or `None` when its magnitude is zero or not finite
#[inline]
pub(crate) fn try_normalize(vector: Vector3<f64>) -> Option<Vector3<f64>> {
    let norm = vector.norm();
    if norm > 0.0 && norm.is_finite() {
        Some(vector / norm)
    } else {
        None
    }
}

/// Normalize a quaternion candidate given as `(w, x, y, z)`
///
/// Returns `None` when the norm is zero, NaN or infinite. NaN components make
/// the norm NaN, so an undefined intermediate never reaches the caller.
#[inline]
pub(crate) fn normalize_quaternion(w: f64, x: f64, y: f64, z: f64) -> Option<Quaternion<f64>> {
    let norm = ComplexField::sqrt(w * w + x * x + y * y + z * z);
    if norm > 0.0 && norm.is_finite() {
        let norm = 1.0 / norm;
        Some(Quaternion::new(w * norm, x * norm, y * norm, z * norm))
    } else {
        None
    }
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Convert degrees to radians
    fn deg_to_rad(&self) -> Vector3<f64>;

    /// Convert radians to degrees
    fn rad_to_deg(&self) -> Vector3<f64>;
}

impl Vector3Ext for Vector3<f64> {
    fn deg_to_rad(&self) -> Vector3<f64> {
        *self * DEG_TO_RAD
    }

    fn rad_to_deg(&self) -> Vector3<f64> {
        *self * RAD_TO_DEG
    }
}

/// Extension trait for UnitQuaternion operations
pub trait QuaternionExt {
    /// Convert quaternion to Euler angles (roll, pitch, yaw) in radians
    fn to_euler(&self) -> Vector3<f64>;

    /// Convert quaternion to Euler angles in degrees
    fn to_euler_degrees(&self) -> Vector3<f64>;

    /// Create quaternion from Euler angles in degrees
    fn from_euler_degrees(roll: f64, pitch: f64, yaw: f64) -> UnitQuaternion<f64>;
}

impl QuaternionExt for UnitQuaternion<f64> {
    fn to_euler(&self) -> Vector3<f64> {
        let (roll, pitch, yaw) = self.euler_angles();
        Vector3::new(roll, pitch, yaw)
    }

    fn to_euler_degrees(&self) -> Vector3<f64> {
        self.to_euler().rad_to_deg()
    }

    fn from_euler_degrees(roll: f64, pitch: f64, yaw: f64) -> UnitQuaternion<f64> {
        let euler_rad = Vector3::new(roll, pitch, yaw).deg_to_rad();
        UnitQuaternion::from_euler_angles(euler_rad.x, euler_rad.y, euler_rad.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_normalize() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        let normalized = try_normalize(v).unwrap();
        assert!((normalized.norm() - 1.0).abs() < 1e-12);
        assert!((normalized.x - 0.6).abs() < 1e-12);

        assert_eq!(try_normalize(Vector3::zeros()), None);
        assert_eq!(try_normalize(Vector3::new(f64::NAN, 0.0, 0.0)), None);
    }

    #[test]
    fn test_normalize_quaternion_rejects_undefined() {
        let q = normalize_quaternion(2.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(q, Quaternion::new(1.0, 0.0, 0.0, 0.0));

        assert!(normalize_quaternion(0.0, 0.0, 0.0, 0.0).is_none());
        assert!(normalize_quaternion(0.0, f64::NAN, f64::NAN, 0.0).is_none());
        assert!(normalize_quaternion(1.0, f64::INFINITY, 0.0, 0.0).is_none());
    }

    #[test]
    fn test_quaternion_euler_conversion() {
        let euler = Vector3::new(30.0, 45.0, 60.0);
        let quat = UnitQuaternion::from_euler_degrees(euler.x, euler.y, euler.z);
        let recovered = quat.to_euler_degrees();

        assert!((euler - recovered).norm() < 1e-9);
    }
}
