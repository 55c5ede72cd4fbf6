//! Per-sensor low-pass filtering and normalization

use nalgebra::Vector3;

use crate::axes::{Frame, remap};
use crate::logging::log_warn;
use crate::math::try_normalize;

/// Default low-pass coefficient
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Exponential low-pass filter over one 3-axis sensor stream
///
/// Each call to [`AxisFilter::update`] blends the new sample into a running
/// average (in physical sensor axes) and re-derives a unit vector from it. The
/// unit vector is read back through the coordinate accessors, remapped into
/// the selected [`Frame`].
///
/// The unit vector is either the zero vector (nothing nonzero seen yet) or has
/// unit length. A zero-magnitude average never overwrites it.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use accelmagiq::{AxisFilter, Frame};
///
/// let mut filter = AxisFilter::new();
/// filter.set_alpha(1.0);
/// filter.set_frame(Frame::Basic);
///
/// filter.update(Vector3::new(0.0, 0.0, -1024.0));
///
/// assert_eq!(filter.coords(), Vector3::new(0.0, 0.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AxisFilter {
    /// Frame applied by the coordinate accessors
    frame: Frame,
    /// Smoothing coefficient shared by all three axes
    alpha: f64,
    /// Cached `1 - alpha`
    one_minus_alpha: f64,
    /// Running average, physical axes
    filtered: Vector3<f64>,
    /// Last good unit vector, physical axes
    normalized: Vector3<f64>,
}

impl AxisFilter {
    /// Create a filter with zero state, raw axes and the default coefficient
    pub fn new() -> Self {
        Self::with_initial(Vector3::zeros(), Frame::default(), DEFAULT_ALPHA)
    }

    /// Create a filter seeded with an initial sample
    ///
    /// The running average starts at `initial` and one update is applied with
    /// the same sample, so a nonzero seed yields a valid unit vector at once.
    ///
    /// # Arguments
    /// * `initial` - Seed sample in physical sensor axes
    /// * `frame` - Logical frame for the coordinate accessors
    /// * `alpha` - Low-pass coefficient, clamped into `[0, 1]`
    pub fn with_initial(initial: Vector3<f64>, frame: Frame, alpha: f64) -> Self {
        let mut filter = AxisFilter {
            frame,
            alpha: DEFAULT_ALPHA,
            one_minus_alpha: 1.0 - DEFAULT_ALPHA,
            filtered: initial,
            normalized: Vector3::zeros(),
        };
        filter.set_alpha(alpha);
        filter.update(initial);
        filter
    }

    /// Select the frame applied to future coordinate reads
    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    /// Current frame
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Set the smoothing coefficient for all three axes
    ///
    /// `1.0` passes samples through unfiltered, values near `0.0` smooth
    /// heavily. Values outside `[0, 1]` would make the average diverge or
    /// oscillate, so they are clamped. NaN is ignored and the previous
    /// coefficient stays in effect.
    pub fn set_alpha(&mut self, alpha: f64) {
        if alpha.is_nan() {
            log_warn!("ignoring NaN low-pass alpha");
            return;
        }

        let clamped = alpha.clamp(0.0, 1.0);
        if clamped != alpha {
            log_warn!("low-pass alpha {} clamped to {}", alpha, clamped);
        }

        self.alpha = clamped;
        self.one_minus_alpha = 1.0 - clamped;
    }

    /// Current smoothing coefficient
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Blend a raw sample into the running average and renormalize
    ///
    /// # Arguments
    /// * `sample` - Raw reading in physical sensor axes, any consistent unit
    pub fn update(&mut self, sample: Vector3<f64>) {
        self.filtered = sample * self.alpha + self.filtered * self.one_minus_alpha;

        // A zero average keeps the last good direction
        if let Some(normalized) = try_normalize(self.filtered) {
            self.normalized = normalized;
        }
    }

    /// Running average in physical sensor axes
    pub fn filtered(&self) -> Vector3<f64> {
        self.filtered
    }

    /// Last good unit vector in physical sensor axes
    pub fn normalized(&self) -> Vector3<f64> {
        self.normalized
    }

    /// Unit vector remapped into the current frame
    pub fn coords(&self) -> Vector3<f64> {
        remap(self.normalized, self.frame)
    }

    /// X component in the current frame
    pub fn coord_x(&self) -> f64 {
        self.coords().x
    }

    /// Y component in the current frame
    pub fn coord_y(&self) -> f64 {
        self.coords().y
    }

    /// Z component in the current frame
    pub fn coord_z(&self) -> f64 {
        self.coords().z
    }

    /// Clear the running average and unit vector, keeping frame and alpha
    pub fn reset(&mut self) {
        self.filtered = Vector3::zeros();
        self.normalized = Vector3::zeros();
    }
}

impl Default for AxisFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_new_filter() {
        let filter = AxisFilter::new();
        assert_eq!(filter.frame(), Frame::Raw);
        assert_eq!(filter.alpha(), DEFAULT_ALPHA);
        assert_eq!(filter.filtered(), Vector3::zeros());
        assert_eq!(filter.normalized(), Vector3::zeros());
    }

    #[test]
    fn test_first_update_scales_by_alpha() {
        let mut filter = AxisFilter::new();
        filter.set_alpha(0.5);
        filter.update(Vector3::new(1.0, 0.0, 0.0));

        assert_eq!(filter.filtered().x, 0.5);
        assert_eq!(filter.normalized(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_low_pass_converges_monotonically() {
        let mut filter = AxisFilter::new();
        filter.set_alpha(0.5);
        let target = Vector3::new(1.0, 0.0, 0.0);

        let mut previous_error = f64::MAX;
        for _ in 0..40 {
            filter.update(target);
            let error = (filter.filtered() - target).norm();
            assert!(error < previous_error, "error grew: {} -> {}", previous_error, error);
            previous_error = error;
        }
        assert!(previous_error < 1e-9);
    }

    #[test]
    fn test_unit_norm_for_nonzero_inputs() {
        let mut filter = AxisFilter::new();
        let samples = [
            Vector3::new(12.0, -340.0, 1020.0),
            Vector3::new(-0.001, 0.002, 0.0),
            Vector3::new(1.0e6, 1.0e6, -1.0e6),
            Vector3::new(0.0, 0.0, -1.0),
        ];

        for sample in samples {
            filter.update(sample);
            assert!(
                (filter.normalized().norm() - 1.0).abs() < EPSILON,
                "normalized {:?} is not unit length",
                filter.normalized()
            );
        }
    }

    #[test]
    fn test_zero_input_keeps_previous_direction() {
        let mut filter = AxisFilter::new();
        filter.set_alpha(1.0);
        filter.update(Vector3::new(0.0, 3.0, 4.0));
        let seeded = filter.normalized();

        filter.update(Vector3::zeros());

        assert_eq!(filter.filtered(), Vector3::zeros());
        assert_eq!(filter.normalized(), seeded);
    }

    #[test]
    fn test_zero_input_before_any_sample() {
        let mut filter = AxisFilter::new();
        filter.update(Vector3::zeros());
        assert_eq!(filter.normalized(), Vector3::zeros());
    }

    #[test]
    fn test_coordinate_accessors_follow_frame() {
        let mut filter = AxisFilter::new();
        filter.set_alpha(1.0);
        filter.update(Vector3::new(1.0, 0.0, 0.0));

        filter.set_frame(Frame::Basic);
        assert_eq!((filter.coord_x(), filter.coord_y(), filter.coord_z()), (0.0, 1.0, 0.0));

        filter.set_frame(Frame::Tilt);
        assert_eq!((filter.coord_x(), filter.coord_y(), filter.coord_z()), (0.0, 1.0, 0.0));

        filter.set_frame(Frame::Raw);
        assert_eq!((filter.coord_x(), filter.coord_y(), filter.coord_z()), (1.0, 0.0, 0.0));
    }

    #[test]
    fn test_alpha_is_clamped() {
        let mut filter = AxisFilter::new();

        filter.set_alpha(1.5);
        assert_eq!(filter.alpha(), 1.0);

        filter.set_alpha(-0.2);
        assert_eq!(filter.alpha(), 0.0);

        filter.set_alpha(0.25);
        filter.set_alpha(f64::NAN);
        assert_eq!(filter.alpha(), 0.25);
    }

    #[test]
    fn test_zero_alpha_freezes_average() {
        let mut filter = AxisFilter::new();
        filter.set_alpha(1.0);
        filter.update(Vector3::new(0.0, 1.0, 0.0));

        filter.set_alpha(0.0);
        filter.update(Vector3::new(1.0, 0.0, 0.0));

        assert_eq!(filter.normalized(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_with_initial_seeds_direction() {
        let filter = AxisFilter::with_initial(Vector3::new(0.0, 0.0, 2.0), Frame::Tilt, 0.3);

        // Average starts at the seed, one update with the same sample keeps it there
        assert!((filter.filtered() - Vector3::new(0.0, 0.0, 2.0)).norm() < EPSILON);
        assert_eq!(filter.normalized(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(filter.coords(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_reset_keeps_configuration() {
        let mut filter = AxisFilter::with_initial(Vector3::new(1.0, 1.0, 1.0), Frame::Basic, 0.8);
        filter.reset();

        assert_eq!(filter.filtered(), Vector3::zeros());
        assert_eq!(filter.normalized(), Vector3::zeros());
        assert_eq!(filter.frame(), Frame::Basic);
        assert_eq!(filter.alpha(), 0.8);
    }
}
