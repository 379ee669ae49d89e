//! Eased frame driver for scroll-synchronized playback.

/// Fraction of the remaining distance closed per tick.
pub const DEFAULT_EASE_FACTOR: f64 = 0.10;
/// Distance at or below which the driver stops moving and redrawing.
pub const DEFAULT_SETTLE_THRESHOLD: f64 = 0.05;

/// Exponential easing parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Easing {
    /// Fraction of the remaining distance closed per tick (0.0 - 1.0]
    pub factor: f64,
    /// Idle threshold in frames
    pub threshold: f64,
}

impl Default for Easing {
    fn default() -> Self {
        Self {
            factor: DEFAULT_EASE_FACTOR,
            threshold: DEFAULT_SETTLE_THRESHOLD,
        }
    }
}

impl Easing {
    /// Create easing parameters. The factor is clamped to (0.0, 1.0] so a
    /// step never overshoots; a negative threshold becomes 0.0. Non-finite
    /// values fall back to the defaults.
    pub fn new(factor: f64, threshold: f64) -> Self {
        let factor = if factor.is_finite() { factor } else { DEFAULT_EASE_FACTOR };
        let threshold = if threshold.is_finite() { threshold } else { DEFAULT_SETTLE_THRESHOLD };
        Self {
            factor: factor.clamp(f64::EPSILON, 1.0),
            threshold: threshold.max(0.0),
        }
    }
}

/// Platform-agnostic driver that eases a fractional frame toward a target.
///
/// The driver does not handle timing. The caller invokes `tick()` once per
/// display refresh and redraws when it returns a frame.
///
/// ## Example
///
/// ```rust
/// use frame_scroll_view::{AnimationDriver, Easing};
///
/// let mut driver = AnimationDriver::new(173, Easing::default());
/// driver.set_target(100);
///
/// // First tick closes 10% of the distance
/// assert_eq!(driver.tick(), Some(10));
/// assert!((driver.current() - 10.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    /// Eased, fractional frame position
    current: f64,
    /// Latest target from the scroll mapper
    target: usize,
    frame_count: usize,
    easing: Easing,
    running: bool,
}

impl AnimationDriver {
    pub fn new(frame_count: usize, easing: Easing) -> Self {
        Self {
            current: 0.0,
            target: 0,
            frame_count,
            easing,
            running: true,
        }
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    #[inline]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Overwrite the target. Only the latest value matters.
    ///
    /// The target is clamped to the valid frame range.
    pub fn set_target(&mut self, frame: usize) {
        self.target = frame.min(self.frame_count.saturating_sub(1));
    }

    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    /// The fractional eased position.
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// The eased position rounded to a drawable frame index.
    #[inline]
    pub fn current_frame(&self) -> usize {
        self.current.round().max(0.0) as usize
    }

    /// Remaining signed distance to the target.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.target as f64 - self.current
    }

    /// True when the remaining distance is within the idle threshold.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.distance().abs() <= self.easing.threshold
    }

    /// Advance one refresh.
    ///
    /// When the distance exceeds the threshold, closes `factor` of it and
    /// returns the rounded frame to draw. When settled, changes nothing and
    /// returns `None`. A stopped driver always returns `None`.
    pub fn tick(&mut self) -> Option<usize> {
        if !self.running || self.is_settled() {
            return None;
        }
        self.current += self.distance() * self.easing.factor;
        Some(self.current_frame())
    }

    /// Stop the driver permanently; later ticks do nothing.
    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }
}
