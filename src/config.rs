use crate::color::parse_color;
use crate::data::{DEFAULT_FRAME_END, DEFAULT_FRAME_START, DEFAULT_PAD_WIDTH, DEFAULT_PATH_TEMPLATE};
use crate::loader::TierPlan;
use crate::render::OverlayStyle;
use crate::scroll::{Section, SectionTracker};
use crate::{Easing, Error, FramePath, FrameSequence, Result};

/// Scene settings, typically read from a `scene.toml` file.
///
/// All fields are optional; anything missing falls back to the landing
/// page defaults (frames 72-244, hero tier of 49, 10% easing).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneConfig {
    pub frame_start: Option<u32>,
    pub frame_end: Option<u32>,
    pub path_template: Option<String>,
    pub pad_width: Option<usize>,
    pub hero_count: Option<usize>,
    pub ease_factor: Option<f64>,
    pub settle_threshold: Option<f64>,
    pub overlay_color: Option<String>,
    pub sections: Option<Vec<Section>>,
}

impl SceneConfig {
    /// Parse a scene TOML string into `SceneConfig`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// The frame range and path template.
    pub fn sequence(&self) -> Result<FrameSequence> {
        let paths = FramePath::new(
            self.path_template.as_deref().unwrap_or(DEFAULT_PATH_TEMPLATE),
            self.pad_width.unwrap_or(DEFAULT_PAD_WIDTH),
        )?;
        FrameSequence::new(
            self.frame_start.unwrap_or(DEFAULT_FRAME_START),
            self.frame_end.unwrap_or(DEFAULT_FRAME_END),
            paths,
        )
    }

    /// Tier split for a sequence of `total` frames.
    ///
    /// An explicit `hero_count` larger than the sequence is an error; the
    /// default hero count shrinks to fit.
    pub fn tier_plan(&self, total: usize) -> Result<TierPlan> {
        match self.hero_count {
            Some(hero) => TierPlan::new(total, hero),
            None => Ok(TierPlan::with_default_hero(total)),
        }
    }

    pub fn easing(&self) -> Easing {
        let defaults = Easing::default();
        Easing::new(
            self.ease_factor.unwrap_or(defaults.factor),
            self.settle_threshold.unwrap_or(defaults.threshold),
        )
    }

    /// Overlay style, with `overlay_color` replacing the default tint.
    pub fn overlays(&self) -> Result<OverlayStyle> {
        let mut style = OverlayStyle::default();
        if let Some(color) = self.overlay_color.as_deref() {
            style.tint = parse_color(color).ok_or_else(|| Error::InvalidColor(color.to_string()))?;
        }
        Ok(style)
    }

    pub fn sections(&self) -> SectionTracker {
        match &self.sections {
            Some(sections) => SectionTracker::new(sections.clone()),
            None => SectionTracker::landing_page(),
        }
    }
}
