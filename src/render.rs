//! Rendering logic for scroll-driven frames.
//!
//! A frame is painted as one cover-fitted image followed by three darkening
//! overlays. The geometry is computed here as a platform-agnostic
//! [`RenderPlan`]; a [`RenderSurface`] implementation turns it into pixels.

use crate::sizing::{cover_fit, DrawRect, SurfaceSize};
use crate::{FrameImage, FrameStore, Result, Rgba};

/// A gradient color stop, `offset` in 0.0 - 1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f64, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// A full-surface overlay pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Overlay {
    /// Flat translucent fill
    Fill(Rgba),
    /// Radial gradient between two concentric circles
    Radial {
        cx: f64,
        cy: f64,
        inner_radius: f64,
        outer_radius: f64,
        stops: [ColorStop; 2],
    },
    /// Linear gradient along the line (x0, y0) -> (x1, y1)
    Linear {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        stops: [ColorStop; 2],
    },
}

/// Colors and proportions of the three overlay passes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayStyle {
    /// Tint of the flat fill and the bottom gradient
    pub tint: (u8, u8, u8),
    /// Color of the vignette's outer stop
    pub vignette: (u8, u8, u8),
    pub flat_alpha: f64,
    /// Inner vignette radius as a fraction of half the surface width
    pub vignette_inner: f64,
    /// Outer vignette radius as a fraction of half the surface width
    pub vignette_outer: f64,
    pub vignette_alpha: f64,
    /// Where the bottom gradient starts, as a fraction of surface height
    pub floor_start: f64,
    pub floor_alpha: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            tint: (3, 1, 0),
            vignette: (0, 0, 0),
            flat_alpha: 0.62,
            vignette_inner: 0.2,
            vignette_outer: 0.9,
            vignette_alpha: 0.58,
            floor_start: 0.35,
            floor_alpha: 0.65,
        }
    }
}

impl OverlayStyle {
    /// Overlay passes for a surface, in paint order.
    pub fn overlays(&self, size: SurfaceSize) -> [Overlay; 3] {
        let w = size.width as f64;
        let h = size.height as f64;
        let half_w = w / 2.0;

        [
            Overlay::Fill(Rgba::from_rgb(self.tint, self.flat_alpha)),
            Overlay::Radial {
                cx: half_w,
                cy: h / 2.0,
                inner_radius: half_w * self.vignette_inner,
                outer_radius: half_w * self.vignette_outer,
                stops: [
                    ColorStop::new(0.0, Rgba::TRANSPARENT),
                    ColorStop::new(1.0, Rgba::from_rgb(self.vignette, self.vignette_alpha)),
                ],
            },
            Overlay::Linear {
                x0: 0.0,
                y0: h * self.floor_start,
                x1: 0.0,
                y1: h,
                stops: [
                    ColorStop::new(0.0, Rgba::TRANSPARENT),
                    ColorStop::new(1.0, Rgba::from_rgb(self.tint, self.floor_alpha)),
                ],
            },
        ]
    }
}

/// Everything needed to paint one frame.
///
/// Painting the same plan twice produces the same pixels: the surface is
/// cleared first and every pass covers it completely.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    /// Slot of the frame being drawn
    pub frame: usize,
    /// Surface size the plan was computed for
    pub size: SurfaceSize,
    /// Cover-fitted destination of the image
    pub image: DrawRect,
    /// Overlay passes in paint order
    pub overlays: [Overlay; 3],
}

/// Compute the render plan for an image on a surface.
///
/// Returns `None` when the image or surface has no area.
pub fn plan_frame(frame: usize, image: &impl FrameImage, size: SurfaceSize, style: &OverlayStyle) -> Option<RenderPlan> {
    let rect = cover_fit(image.natural_size(), size)?;
    Some(RenderPlan {
        frame,
        size,
        image: rect,
        overlays: style.overlays(size),
    })
}

/// A resizable 2D drawing target.
pub trait RenderSurface {
    type Image: FrameImage;

    /// Current pixel dimensions.
    fn size(&self) -> SurfaceSize;

    /// Change the pixel dimensions. Existing content may be discarded.
    fn resize(&mut self, size: SurfaceSize);

    /// Clear, draw `image` into `plan.image`, then composite the overlays.
    fn paint(&mut self, image: &Self::Image, plan: &RenderPlan) -> Result<()>;
}

/// Draw frame `frame` from `store` onto `surface`.
///
/// A frame that is missing, still pending, failed, or has zero natural size
/// leaves the surface untouched. Returns `true` when something was painted.
pub fn render_frame<S: RenderSurface>(surface: &mut S, store: &FrameStore<S::Image>, frame: usize, style: &OverlayStyle) -> bool {
    let Some(image) = store.get(frame) else {
        return false;
    };
    let Some(plan) = plan_frame(frame, image, surface.size(), style) else {
        return false;
    };
    match surface.paint(image, &plan) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("failed to paint frame {}: {}", frame, err);
            false
        }
    }
}

/// Web-specific rendering implementation.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use crate::{Error, ImageSize};
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    impl FrameImage for HtmlImageElement {
        fn natural_size(&self) -> ImageSize {
            if self.complete() {
                ImageSize::new(self.natural_width(), self.natural_height())
            } else {
                ImageSize::default()
            }
        }
    }

    /// A `<canvas>` element with its 2D context.
    #[derive(Clone, Debug)]
    pub struct CanvasSurface {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl CanvasSurface {
        pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
            let ctx = canvas
                .get_context("2d")
                .map_err(|_| Error::Surface("Failed to get 2d context".into()))?
                .ok_or_else(|| Error::Surface("No 2d context available".into()))?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| Error::Surface("Failed to cast to CanvasRenderingContext2d".into()))?;
            Ok(Self { canvas, ctx })
        }

        #[inline]
        pub fn canvas(&self) -> &HtmlCanvasElement {
            &self.canvas
        }

        fn fill_overlay(&self, overlay: &Overlay, w: f64, h: f64) -> Result<()> {
            match overlay {
                Overlay::Fill(color) => self.ctx.set_fill_style_str(&color.css()),
                Overlay::Radial { cx, cy, inner_radius, outer_radius, stops } => {
                    let gradient = self
                        .ctx
                        .create_radial_gradient(*cx, *cy, *inner_radius, *cx, *cy, *outer_radius)
                        .map_err(|_| Error::Surface("Failed to create radial gradient".into()))?;
                    add_stops(&gradient, stops)?;
                    self.ctx.set_fill_style_canvas_gradient(&gradient);
                }
                Overlay::Linear { x0, y0, x1, y1, stops } => {
                    let gradient = self.ctx.create_linear_gradient(*x0, *y0, *x1, *y1);
                    add_stops(&gradient, stops)?;
                    self.ctx.set_fill_style_canvas_gradient(&gradient);
                }
            }
            self.ctx.fill_rect(0.0, 0.0, w, h);
            Ok(())
        }
    }

    fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) -> Result<()> {
        for stop in stops {
            gradient
                .add_color_stop(stop.offset as f32, &stop.color.css())
                .map_err(|_| Error::Surface("Failed to add color stop".into()))?;
        }
        Ok(())
    }

    impl RenderSurface for CanvasSurface {
        type Image = HtmlImageElement;

        fn size(&self) -> SurfaceSize {
            SurfaceSize::new(self.canvas.width(), self.canvas.height())
        }

        fn resize(&mut self, size: SurfaceSize) {
            self.canvas.set_width(size.width);
            self.canvas.set_height(size.height);
        }

        fn paint(&mut self, image: &HtmlImageElement, plan: &RenderPlan) -> Result<()> {
            let w = plan.size.width as f64;
            let h = plan.size.height as f64;

            self.ctx.clear_rect(0.0, 0.0, w, h);
            self.ctx
                .draw_image_with_html_image_element_and_dw_and_dh(
                    image,
                    plan.image.x,
                    plan.image.y,
                    plan.image.width,
                    plan.image.height,
                )
                .map_err(|_| Error::Surface("Failed to draw frame image".into()))?;

            for overlay in &plan.overlays {
                self.fill_overlay(overlay, w, h)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{FramePath, FrameSequence, ImageSize};

    /// Records every plan it is asked to paint.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub size: SurfaceSize,
        pub painted: Vec<RenderPlan>,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                size: SurfaceSize::new(width, height),
                painted: Vec::new(),
            }
        }
    }

    impl RenderSurface for RecordingSurface {
        type Image = ImageSize;

        fn size(&self) -> SurfaceSize {
            self.size
        }

        fn resize(&mut self, size: SurfaceSize) {
            self.size = size;
        }

        fn paint(&mut self, _image: &ImageSize, plan: &RenderPlan) -> Result<()> {
            self.painted.push(plan.clone());
            Ok(())
        }
    }

    fn store() -> FrameStore<ImageSize> {
        let mut store = FrameStore::new(FrameSequence::new(1, 4, FramePath::default()).unwrap());
        store.settle(0, Ok(ImageSize::new(4000, 2000)));
        store.settle(1, Err("decode".into()));
        store.settle(2, Ok(ImageSize::new(0, 0)));
        store
    }

    #[test]
    fn test_overlay_order_and_geometry() {
        let overlays = OverlayStyle::default().overlays(SurfaceSize::new(1920, 1080));

        assert_eq!(overlays[0], Overlay::Fill(Rgba::new(3, 1, 0, 0.62)));
        match overlays[1] {
            Overlay::Radial { cx, cy, inner_radius, outer_radius, stops } => {
                assert_eq!((cx, cy), (960.0, 540.0));
                assert!((inner_radius - 192.0).abs() < 1e-9);
                assert!((outer_radius - 864.0).abs() < 1e-9);
                assert_eq!(stops[0].color, Rgba::TRANSPARENT);
                assert_eq!(stops[1].color, Rgba::new(0, 0, 0, 0.58));
            }
            other => panic!("expected radial overlay, got {:?}", other),
        }
        match overlays[2] {
            Overlay::Linear { x0, y0, x1, y1, stops } => {
                assert_eq!((x0, x1), (0.0, 0.0));
                assert!((y0 - 378.0).abs() < 1e-9);
                assert_eq!(y1, 1080.0);
                assert_eq!(stops[1].color, Rgba::new(3, 1, 0, 0.65));
            }
            other => panic!("expected linear overlay, got {:?}", other),
        }
    }

    #[test]
    fn test_render_cover_fit() {
        let store = store();
        let mut surface = RecordingSurface::new(1920, 1080);

        assert!(render_frame(&mut surface, &store, 0, &OverlayStyle::default()));
        let plan = &surface.painted[0];
        assert_eq!(plan.frame, 0);
        assert_eq!(plan.image.height, 1080.0);
        assert!(plan.image.width > 1920.0);
    }

    #[test]
    fn test_unavailable_frames_are_noops() {
        let store = store();
        let mut surface = RecordingSurface::new(1920, 1080);
        let style = OverlayStyle::default();

        assert!(!render_frame(&mut surface, &store, 1, &style)); // failed
        assert!(!render_frame(&mut surface, &store, 2, &style)); // zero size
        assert!(!render_frame(&mut surface, &store, 3, &style)); // pending
        assert!(!render_frame(&mut surface, &store, 99, &style)); // out of range
        assert!(surface.painted.is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let store = store();
        let mut surface = RecordingSurface::new(1280, 720);
        let style = OverlayStyle::default();

        render_frame(&mut surface, &store, 0, &style);
        render_frame(&mut surface, &store, 0, &style);
        assert_eq!(surface.painted.len(), 2);
        assert_eq!(surface.painted[0], surface.painted[1]);
    }

    #[test]
    fn test_empty_surface_is_noop() {
        let store = store();
        let mut surface = RecordingSurface::new(0, 0);
        assert!(!render_frame(&mut surface, &store, 0, &OverlayStyle::default()));
    }
}
