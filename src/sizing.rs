//! Cover-fit calculations for drawing frames onto a viewport-sized surface.

use crate::ImageSize;

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Destination rectangle of a drawn image, in surface pixels.
///
/// Offsets may be negative: overflow beyond the surface is cropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Calculate the aspect-preserving rectangle that fully covers the surface.
///
/// When the image is wider than the surface (by aspect ratio) its height
/// fills the surface and the horizontal overflow is centered; otherwise its
/// width fills and the vertical overflow is centered.
///
/// ## Returns
///
/// `None` when either the image or the surface has no area.
///
/// ## Example
///
/// ```rust
/// use frame_scroll_view::{cover_fit, ImageSize, SurfaceSize};
///
/// let rect = cover_fit(ImageSize::new(4000, 2000), SurfaceSize::new(1920, 1080)).unwrap();
/// assert_eq!(rect.height, 1080.0);
/// assert_eq!(rect.width, 2160.0);
/// assert_eq!(rect.x, -120.0);
/// ```
pub fn cover_fit(image: ImageSize, surface: SurfaceSize) -> Option<DrawRect> {
    if image.is_empty() || surface.is_empty() {
        return None;
    }

    let image_ratio = image.aspect();
    let surface_w = surface.width as f64;
    let surface_h = surface.height as f64;

    let rect = if image_ratio > surface.aspect() {
        let width = surface_h * image_ratio;
        DrawRect {
            x: (surface_w - width) / 2.0,
            y: 0.0,
            width,
            height: surface_h,
        }
    } else {
        let height = surface_w / image_ratio;
        DrawRect {
            x: 0.0,
            y: (surface_h - height) / 2.0,
            width: surface_w,
            height,
        }
    };
    Some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_image_overflows_horizontally() {
        let rect = cover_fit(ImageSize::new(4000, 2000), SurfaceSize::new(1920, 1080)).unwrap();
        assert_eq!(rect.height, 1080.0);
        assert!(rect.width > 1920.0);
        assert_eq!(rect.y, 0.0);
        // Centered: equal crop on both sides
        assert!((rect.x + rect.width / 2.0 - 960.0).abs() < 1e-9);
    }

    #[test]
    fn test_tall_image_overflows_vertically() {
        let rect = cover_fit(ImageSize::new(1000, 2000), SurfaceSize::new(1920, 1080)).unwrap();
        assert_eq!(rect.width, 1920.0);
        assert_eq!(rect.height, 3840.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, -1380.0);
    }

    #[test]
    fn test_matching_aspect_fills_exactly() {
        let rect = cover_fit(ImageSize::new(3840, 2160), SurfaceSize::new(1920, 1080)).unwrap();
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.width, 1920.0);
        assert!((rect.height - 1080.0).abs() < 1e-9);
        assert!(rect.y.abs() < 1e-9);
    }

    #[test]
    fn test_portrait_surface() {
        let rect = cover_fit(ImageSize::new(1920, 1080), SurfaceSize::new(390, 844)).unwrap();
        assert_eq!(rect.height, 844.0);
        assert!(rect.width > 390.0);
        assert!(rect.x < 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(cover_fit(ImageSize::new(0, 100), SurfaceSize::new(800, 600)).is_none());
        assert!(cover_fit(ImageSize::new(100, 100), SurfaceSize::new(800, 0)).is_none());
    }
}
