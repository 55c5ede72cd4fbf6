#![no_std]

//! AccelMagiQ - closed-form attitude estimation from an accelerometer and a magnetometer
//!
//! Estimates a device's orientation as a unit quaternion from streaming,
//! low-rate accelerometer and magnetometer samples, without a gyroscope. Aimed
//! at microcontrollers that need tilt- or heading-aware behaviour but cannot
//! afford a full AHRS.
//!
//! The pipeline:
//!
//! 1. each raw 3-axis stream passes through an exponential low-pass filter and
//!    is normalized ([`AxisFilter`]),
//! 2. the unit vectors are read back in a logical [`Frame`] matching how the
//!    device is mounted,
//! 3. an [`Estimator`] turns them into a quaternion with one of two closed-form
//!    algorithms ([`EstimateMethod`]): accelerometer-only tilt, or the Fast
//!    Accelerometer-Magnetometer Combination (FAMC).
//!
//! Degenerate inputs never produce NaN: a zero-magnitude sample keeps the
//! previous direction, and an undefined quaternion keeps the previous estimate.
//!
//! # Features
//!
//! - Two interchangeable closed-form estimators, chosen at construction
//! - Explicit FAMC pivot guard with a configurable fallback policy
//! - Runtime-selectable coordinate frames (RAW, BASIC, TILT)
//! - `#![no_std]`, no allocation, optional `defmt` logging and `serde` settings
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use accelmagiq::Estimator;
//!
//! let mut estimator = Estimator::new();
//!
//! // Raw readings, any consistent units
//! let accelerometer = Vector3::new(0.0, 0.0, 1024.0);  // mg
//! let magnetometer = Vector3::new(0.0, 21.0, -43.0);   // µT
//!
//! // Called from the host's periodic hook; samples every 20 ms
//! let now_us = 0;
//! estimator.sample_tick(now_us, accelerometer, magnetometer, 20_000);
//!
//! estimator.estimate();
//! let [w, x, y, z] = estimator.components();
//! let euler = estimator.euler_angles_degrees();
//! # let _ = (w, x, y, z, euler);
//! ```

mod logging;

mod axes;
mod error;
mod estimator;
pub mod famc;
mod filter;
mod math;
pub mod sensor;
pub mod tilt;
mod types;

pub use axes::{Frame, remap};
pub use error::ConfigError;
pub use estimator::Estimator;
pub use filter::{AxisFilter, DEFAULT_ALPHA};
pub use math::{DEG_TO_RAD, QuaternionExt, RAD_TO_DEG, Vector3Ext};
pub use sensor::{Clock, Sensor};
pub use types::*;
