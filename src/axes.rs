//! Logical coordinate frames for different device mountings
//!
//! The filters always work in physical sensor axes. A [`Frame`] selects a
//! fixed permutation and sign convention that is applied when the normalized
//! vector is read back, so the same estimator code serves devices held in
//! different physical orientations.
//!
//! # Example
//! ```
//! use nalgebra::Vector3;
//! use accelmagiq::{Frame, remap};
//!
//! let sensor = Vector3::new(1.0, 2.0, 3.0);
//!
//! let logical = remap(sensor, Frame::Basic);
//!
//! assert_eq!(logical.x, 2.0);   // Logical X = Sensor Y
//! assert_eq!(logical.y, 1.0);   // Logical Y = Sensor X
//! assert_eq!(logical.z, -3.0);  // Logical Z = -Sensor Z
//! ```

use nalgebra::Vector3;

use crate::error::ConfigError;
use crate::logging::log_warn;

/// Coordinate frame exposed by the axis accessors.
///
/// | frame | X | Y | Z |
/// |---|---|---|---|
/// | `Raw` | x | y | z |
/// | `Basic` | y | x | -z |
/// | `Tilt` | z | x | y |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frame {
    /// Physical sensor axes, unchanged (North: A-button, upside-down)
    #[default]
    Raw,
    /// Bearing without tilt compensation (North: logo mark)
    Basic,
    /// Tilt-compensated bearing (North: back side)
    Tilt,
}

impl Frame {
    /// Frame for a host-supplied integer selector.
    ///
    /// Indices 1 and 2 select [`Frame::Basic`] and [`Frame::Tilt`]. Anything
    /// else falls through to [`Frame::Raw`], which is what host scripts relying
    /// on the plain integer API expect. Use `Frame::try_from` to reject unknown
    /// selectors instead.
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => Frame::Raw,
            1 => Frame::Basic,
            2 => Frame::Tilt,
            _ => {
                log_warn!("unknown coordinate frame {}, using raw axes", index);
                Frame::Raw
            }
        }
    }

    /// Integer selector of this frame
    pub fn index(self) -> u8 {
        match self {
            Frame::Raw => 0,
            Frame::Basic => 1,
            Frame::Tilt => 2,
        }
    }
}

impl TryFrom<u8> for Frame {
    type Error = ConfigError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Frame::Raw),
            1 => Ok(Frame::Basic),
            2 => Ok(Frame::Tilt),
            _ => Err(ConfigError::UnknownFrame { index }),
        }
    }
}

/// Remaps a vector from physical sensor axes into a logical frame.
///
/// # Arguments
/// * `sensor` - Vector in physical sensor axes
/// * `frame` - Logical frame to express it in
///
/// # Returns
/// The same vector with its components permuted and sign-flipped per `frame`
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use accelmagiq::{Frame, remap};
///
/// let x = Vector3::new(1.0, 0.0, 0.0);
///
/// assert_eq!(remap(x, Frame::Raw), x);
/// assert_eq!(remap(x, Frame::Basic), Vector3::new(0.0, 1.0, 0.0));
/// assert_eq!(remap(x, Frame::Tilt), Vector3::new(0.0, 1.0, 0.0));
/// ```
#[inline]
pub fn remap(sensor: Vector3<f64>, frame: Frame) -> Vector3<f64> {
    match frame {
        Frame::Raw => sensor,
        Frame::Basic => Vector3::new(sensor.y, sensor.x, -sensor.z),
        Frame::Tilt => Vector3::new(sensor.z, sensor.x, sensor.y),
    }
}
