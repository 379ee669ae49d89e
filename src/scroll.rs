//! Scroll position to frame mapping and active-section tracking.

/// Scroll signals read from the host document.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current vertical scroll offset
    pub scroll_y: f64,
    /// Total document height
    pub document_height: f64,
    /// Visible viewport height
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_y: f64, document_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            document_height,
            viewport_height,
        }
    }

    /// Distance the document can scroll.
    #[inline]
    pub fn scrollable_height(&self) -> f64 {
        self.document_height - self.viewport_height
    }

    /// Scroll position as 0.0 - 1.0; 0.0 when nothing can scroll.
    pub fn progress(&self) -> f64 {
        let scrollable = self.scrollable_height();
        if scrollable <= 0.0 || !scrollable.is_finite() {
            return 0.0;
        }
        (self.scroll_y / scrollable).clamp(0.0, 1.0)
    }
}

/// Maps the document scroll position onto a frame index.
///
/// The mapping is stateless: every call recomputes the target from the
/// latest metrics. Smoothing belongs to the animation driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollMapper {
    frame_count: usize,
}

impl ScrollMapper {
    pub fn new(frame_count: usize) -> Self {
        Self { frame_count }
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// `round(scroll_y / scrollable_height * (frame_count - 1))`, within
    /// `0..frame_count`.
    ///
    /// ```rust
    /// use frame_scroll_view::{ScrollMapper, ScrollMetrics};
    ///
    /// let mapper = ScrollMapper::new(173);
    /// assert_eq!(mapper.target_frame(&ScrollMetrics::new(0.0, 5000.0, 1000.0)), 0);
    /// assert_eq!(mapper.target_frame(&ScrollMetrics::new(2000.0, 5000.0, 1000.0)), 86);
    /// assert_eq!(mapper.target_frame(&ScrollMetrics::new(4000.0, 5000.0, 1000.0)), 172);
    /// ```
    pub fn target_frame(&self, metrics: &ScrollMetrics) -> usize {
        if self.frame_count == 0 {
            return 0;
        }
        let max_idx = (self.frame_count - 1) as f64;
        ((metrics.progress() * max_idx).round() as usize).min(self.frame_count - 1)
    }
}

/// Fraction of viewport height the section top must be at or above.
pub const ACTIVE_BAND_TOP: f64 = 0.55;
/// Fraction of viewport height the section bottom must be at or below.
pub const ACTIVE_BAND_BOTTOM: f64 = 0.45;

/// A named content section used for navigation highlighting.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    /// Element id in the document
    pub id: String,
    /// Navigation label
    pub label: String,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Viewport-relative vertical bounds of a section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub bottom: f64,
}

impl SectionBounds {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// True when the section spans the vertical center band of the viewport.
    pub fn spans_center_band(&self, viewport_height: f64) -> bool {
        self.top <= viewport_height * ACTIVE_BAND_TOP && self.bottom >= viewport_height * ACTIVE_BAND_BOTTOM
    }
}

/// Tracks which section is active for navigation.
#[derive(Clone, Debug)]
pub struct SectionTracker {
    sections: Vec<Section>,
    active: usize,
}

impl SectionTracker {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections, active: 0 }
    }

    /// The landing page's sections, top to bottom.
    pub fn landing_page() -> Self {
        Self::new(
            [
                ("hero", "Home"),
                ("story", "Our Story"),
                ("awards", "Awards"),
                ("chef", "Chef"),
                ("dishes", "Menu"),
                ("wine", "Wine"),
                ("private", "Private"),
                ("press", "Press"),
                ("reservation", "Reserve"),
            ]
            .into_iter()
            .map(|(id, label)| Section::new(id, label))
            .collect(),
        )
    }

    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.sections.get(self.active)
    }

    pub fn active_label(&self) -> Option<&str> {
        self.active_section().map(|s| s.label.as_str())
    }

    /// Recompute the active section from per-section bounds.
    ///
    /// `bounds[i]` belongs to `sections()[i]`; `None` marks a section that is
    /// not in the document. The first section spanning the center band
    /// wins. When none does, the previous section stays active.
    pub fn update(&mut self, bounds: &[Option<SectionBounds>], viewport_height: f64) -> usize {
        let hit = bounds
            .iter()
            .take(self.sections.len())
            .position(|b| b.is_some_and(|b| b.spans_center_band(viewport_height)));
        if let Some(index) = hit {
            if index != self.active {
                log::trace!("active section -> {}", self.sections[index].id);
            }
            self.active = index;
        }
        self.active
    }
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::landing_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(scroll_y: f64) -> ScrollMetrics {
        ScrollMetrics::new(scroll_y, 10_000.0, 800.0)
    }

    #[test]
    fn test_target_frame_endpoints() {
        let mapper = ScrollMapper::new(173);
        let scrollable = metrics(0.0).scrollable_height();
        assert_eq!(mapper.target_frame(&metrics(0.0)), 0);
        assert_eq!(mapper.target_frame(&metrics(scrollable)), 172);
        assert_eq!(mapper.target_frame(&metrics(scrollable / 2.0)), 86);
    }

    #[test]
    fn test_target_frame_is_clamped() {
        let mapper = ScrollMapper::new(173);
        assert_eq!(mapper.target_frame(&metrics(-250.0)), 0);
        assert_eq!(mapper.target_frame(&metrics(50_000.0)), 172);
    }

    #[test]
    fn test_degenerate_scroll_domain() {
        let mapper = ScrollMapper::new(173);
        assert_eq!(mapper.target_frame(&ScrollMetrics::new(0.0, 800.0, 800.0)), 0);
        assert_eq!(mapper.target_frame(&ScrollMetrics::new(40.0, 600.0, 800.0)), 0);
        assert_eq!(ScrollMapper::new(0).target_frame(&metrics(100.0)), 0);
    }

    #[test]
    fn test_single_frame_sequence() {
        let mapper = ScrollMapper::new(1);
        assert_eq!(mapper.target_frame(&metrics(9_200.0)), 0);
    }

    #[test]
    fn test_center_band() {
        let vh = 1000.0;
        assert!(SectionBounds::new(-200.0, 900.0).spans_center_band(vh));
        assert!(SectionBounds::new(550.0, 450.0).spans_center_band(vh));
        assert!(!SectionBounds::new(560.0, 1500.0).spans_center_band(vh));
        assert!(!SectionBounds::new(-900.0, 440.0).spans_center_band(vh));
    }

    #[test]
    fn test_first_matching_section_wins() {
        let mut tracker = SectionTracker::landing_page();
        let vh = 1000.0;
        let mut bounds = vec![None; tracker.sections().len()];
        bounds[2] = Some(SectionBounds::new(100.0, 600.0));
        bounds[3] = Some(SectionBounds::new(500.0, 1400.0));

        assert_eq!(tracker.update(&bounds, vh), 2);
        assert_eq!(tracker.active_label(), Some("Awards"));
    }

    #[test]
    fn test_active_section_persists_without_match() {
        let mut tracker = SectionTracker::landing_page();
        let vh = 1000.0;
        let mut bounds = vec![None; tracker.sections().len()];
        bounds[4] = Some(SectionBounds::new(0.0, 1000.0));
        assert_eq!(tracker.update(&bounds, vh), 4);

        let gap = vec![Some(SectionBounds::new(2000.0, 3000.0)); tracker.sections().len()];
        assert_eq!(tracker.update(&gap, vh), 4);
        assert_eq!(tracker.active_section().map(|s| s.id.as_str()), Some("dishes"));
    }
}
