//! Fast Accelerometer-Magnetometer Combination (FAMC)
//!
//! Closed-form attitude from two reference observations, gravity and the
//! magnetic field, after Zhuohua Liu and Jin Wu, "A Simplified Analytic
//! Attitude Determination Algorithm Using Accelerometer and Magnetometer".
//! Reference implementation: <https://github.com/zarathustr/Analytic-AMC>
//!
//! The returned quaternion rotates body-frame observations onto the reference
//! frame: gravity onto `(0, 0, 1)` and the magnetic field onto `(m_N, 0, m_D)`,
//! so the horizontal field component defines the x axis. The solution fixes
//! `w = -1` before normalizing, so `w` is always negative; `q` and `-q` are the
//! same rotation.

use core::fmt;

use nalgebra::{ComplexField, Quaternion, Vector3};

use crate::math::normalize_quaternion;

/// Default magnitude below which a pivot is treated as singular
pub const DEFAULT_PIVOT_EPSILON: f64 = 1e-9;

/// Which elimination pivot failed the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pivot {
    P1,
    P2,
    P3,
}

/// Reasons a FAMC solution is not produced
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FamcError {
    /// An elimination pivot is too close to zero for the geometry, e.g.
    /// gravity and field (anti)parallel, or the device upside down
    SingularPivot {
        /// Failing pivot
        pivot: Pivot,
        /// Its value
        value: f64,
    },
    /// The final candidate has no finite positive norm
    Degenerate,
}

impl fmt::Display for FamcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamcError::SingularPivot { pivot, value } => {
                write!(f, "FAMC pivot {:?} is singular ({})", pivot, value)
            }
            FamcError::Degenerate => write!(f, "FAMC quaternion has no finite norm"),
        }
    }
}

impl core::error::Error for FamcError {}

#[inline]
fn check_pivot(pivot: Pivot, value: f64, epsilon: f64) -> Result<f64, FamcError> {
    // NaN fails the comparison too
    if value.abs() >= epsilon {
        Ok(value)
    } else {
        Err(FamcError::SingularPivot { pivot, value })
    }
}

/// Orientation from unit gravity and unit magnetic field observations.
///
/// # Arguments
/// * `accelerometer` - Unit acceleration vector in the logical frame
/// * `magnetometer` - Unit magnetic field vector in the logical frame
/// * `pivot_epsilon` - Smallest accepted pivot magnitude; `0.0` only rejects
///   exact zeros and NaN
///
/// # Returns
/// The normalized quaternion `(w, x, y, z)` or the reason none was produced
///
/// # Example
/// ```
/// use nalgebra::{UnitQuaternion, Vector3};
/// use accelmagiq::famc::{famc_quaternion, DEFAULT_PIVOT_EPSILON};
///
/// let accel = Vector3::new(0.0, 0.0, 1.0);
/// let mag = Vector3::new(0.0, 1.0, 0.0);
///
/// let q = famc_quaternion(accel, mag, DEFAULT_PIVOT_EPSILON).unwrap();
/// let rotation = UnitQuaternion::from_quaternion(q);
///
/// // The field is rotated onto the x axis, gravity stays up
/// assert!((rotation * mag - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-9);
/// assert!((rotation * accel - accel).norm() < 1e-9);
/// ```
pub fn famc_quaternion(
    accelerometer: Vector3<f64>,
    magnetometer: Vector3<f64>,
    pivot_epsilon: f64,
) -> Result<Quaternion<f64>, FamcError> {
    let ax = accelerometer.x;
    let ay = accelerometer.y;
    let az = accelerometer.z;
    let mx = magnetometer.x;
    let my = magnetometer.y;
    let mz = magnetometer.z;

    // Dynamic magnetometer reference: vertical and horizontal field components
    let m_d = ax * mx + ay * my + az * mz;
    let m_n = ComplexField::sqrt((1.0 - m_d * m_d).max(0.0));

    let b11 = (m_n * mx) / 2.0;
    let b13 = ax / 2.0 + (m_d * mx) / 2.0;
    let b21 = (m_n * my) / 2.0;
    let b23 = ay / 2.0 + (m_d * my) / 2.0;
    let b31 = (m_n * mz) / 2.0;
    let b33 = az / 2.0 + (m_d * mz) / 2.0;

    let tau = b13 + b31;

    // First row
    let p1 = check_pivot(Pivot::P1, b33 - b11 + 1.0, pivot_epsilon)?;
    let a11 = -1.0 / p1;
    let a12 = b21 / p1;
    let a13 = tau / p1;

    // Second row
    let p2 = check_pivot(Pivot::P2, -b21 * b21 / p1 + b11 + b33 + 1.0, pivot_epsilon)?;
    let a21 = -b21 / (p1 * p2);
    let a22 = -1.0 / p2;
    let a23 = (b23 + b21 * tau / p1) / p2;

    // Third row
    let p3 = check_pivot(
        Pivot::P3,
        p1 - 2.0 + tau * tau / p1 + a23 * a23 * p2,
        pivot_epsilon,
    )?;
    let a31 = (tau / p1 + b21 * a23 / p1) / p3;
    let a32 = a23 / p3;
    let a33 = 1.0 / p3;

    let w = -1.0;
    let x = b23 * (a11 + a12 * (a21 + a23 * a31) + a13 * a31)
        - (b13 - b31) * (a21 + a23 * a31)
        - a31 * b21;
    let y = b23 * (a12 * (a22 + a23 * a32) + a13 * a32) - (b13 - b31) * (a22 + a23 * a32) - a32 * b21;
    let z = b23 * (a13 * a33 + a12 * a23 * a33) - a33 * b21 - a23 * a33 * (b13 - b31);

    normalize_quaternion(w, x, y, z).ok_or(FamcError::Degenerate)
}
