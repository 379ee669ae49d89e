//! Core data structures for frame sequences.

use crate::{Error, Result};

/// Default filename template for the hero sequence.
pub const DEFAULT_PATH_TEMPLATE: &str = "/frames/frame_{frame}_delay-0.04s.webp";
/// Default zero-padding width of the frame number.
pub const DEFAULT_PAD_WIDTH: usize = 3;
/// First logical frame of the default sequence.
pub const DEFAULT_FRAME_START: u32 = 72;
/// Last logical frame of the default sequence (inclusive).
pub const DEFAULT_FRAME_END: u32 = 244;

/// Deterministic path generator for numbered frame resources.
///
/// The template contains a single `{frame}` placeholder which is replaced
/// with the logical frame number, zero-padded to `pad_width` digits.
///
/// ```rust
/// use frame_scroll_view::FramePath;
///
/// let paths = FramePath::new("/frames/frame_{frame}.webp", 3).unwrap();
/// assert_eq!(paths.path(72), "/frames/frame_072.webp");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePath {
    template: String,
    pad_width: usize,
}

impl FramePath {
    /// Placeholder substituted with the padded frame number.
    pub const PLACEHOLDER: &'static str = "{frame}";

    /// Create a path generator, rejecting templates without a placeholder.
    pub fn new(template: impl Into<String>, pad_width: usize) -> Result<Self> {
        let template = template.into();
        if !template.contains(Self::PLACEHOLDER) {
            return Err(Error::InvalidTemplate(template));
        }
        Ok(Self { template, pad_width })
    }

    /// Path of the resource for a logical frame number.
    pub fn path(&self, frame: u32) -> String {
        let padded = format!("{:0width$}", frame, width = self.pad_width);
        self.template.replace(Self::PLACEHOLDER, &padded)
    }

    #[inline]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[inline]
    pub fn pad_width(&self) -> usize {
        self.pad_width
    }
}

impl Default for FramePath {
    fn default() -> Self {
        Self {
            template: DEFAULT_PATH_TEMPLATE.to_string(),
            pad_width: DEFAULT_PAD_WIDTH,
        }
    }
}

/// An inclusive range of externally numbered frames plus their addressing.
///
/// Slot `i` always corresponds to logical frame `start + i`. The frame
/// count is fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    start: u32,
    end: u32,
    paths: FramePath,
}

impl FrameSequence {
    /// Create a sequence over `start..=end`.
    pub fn new(start: u32, end: u32, paths: FramePath) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end, paths })
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of frames in the sequence (`end - start + 1`).
    #[inline]
    pub fn total_frames(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// Logical frame number stored in `slot`.
    pub fn frame_number(&self, slot: usize) -> Option<u32> {
        if slot < self.total_frames() {
            Some(self.start + slot as u32)
        } else {
            None
        }
    }

    /// Slot holding logical frame `frame`.
    pub fn slot_of(&self, frame: u32) -> Option<usize> {
        if (self.start..=self.end).contains(&frame) {
            Some((frame - self.start) as usize)
        } else {
            None
        }
    }

    /// Resource path for the frame stored in `slot`.
    pub fn path_for_slot(&self, slot: usize) -> Option<String> {
        self.frame_number(slot).map(|n| self.paths.path(n))
    }

    /// All `(slot, path)` pairs in frame order.
    pub fn paths(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        (self.start..=self.end)
            .enumerate()
            .map(|(slot, n)| (slot, self.paths.path(n)))
    }

    #[inline]
    pub fn path_template(&self) -> &FramePath {
        &self.paths
    }
}

impl Default for FrameSequence {
    fn default() -> Self {
        Self {
            start: DEFAULT_FRAME_START,
            end: DEFAULT_FRAME_END,
            paths: FramePath::default(),
        }
    }
}

/// Natural pixel dimensions of a decoded image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (nothing drawable).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height. Only meaningful for non-empty sizes.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// A decoded frame image that can report its natural size.
pub trait FrameImage {
    fn natural_size(&self) -> ImageSize;
}

impl FrameImage for ImageSize {
    fn natural_size(&self) -> ImageSize {
        *self
    }
}
