//! The owned scroll animator: frame store, easing driver, scroll mapping
//! and render surface bundled behind one lifecycle.

use crate::render::{render_frame, OverlayStyle, RenderSurface};
use crate::scroll::{ScrollMapper, ScrollMetrics, SectionBounds, SectionTracker};
use crate::sizing::SurfaceSize;
use crate::store::SharedStore;
use crate::{AnimationDriver, Easing, Result, SceneConfig};

/// Outcome of a scroll event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollUpdate {
    /// New target frame
    pub target: usize,
    /// Active section index after the update
    pub active_section: usize,
}

/// Scroll-synchronized frame animator.
///
/// All state that the page keeps between events lives here: the shared frame
/// store, the eased current frame, the latest target, the active section and
/// the surface. Create one at mount, feed it scroll/resize events and one
/// `tick()` per display refresh, and call `teardown()` on unmount.
pub struct Animator<S: RenderSurface> {
    store: SharedStore<S::Image>,
    surface: S,
    driver: AnimationDriver,
    mapper: ScrollMapper,
    sections: SectionTracker,
    style: OverlayStyle,
    active: bool,
}

impl<S: RenderSurface> Animator<S> {
    pub fn new(store: SharedStore<S::Image>, surface: S, easing: Easing, style: OverlayStyle, sections: SectionTracker) -> Self {
        let frame_count = store.borrow().total_frames();
        Self {
            store,
            surface,
            driver: AnimationDriver::new(frame_count, easing),
            mapper: ScrollMapper::new(frame_count),
            sections,
            style,
            active: true,
        }
    }

    /// Build an animator with easing, overlays and sections from `config`.
    pub fn from_config(store: SharedStore<S::Image>, surface: S, config: &SceneConfig) -> Result<Self> {
        Ok(Self::new(store, surface, config.easing(), config.overlays()?, config.sections()))
    }

    /// Map a scroll event to a new target and update the active section.
    ///
    /// `bounds[i]` are the viewport-relative bounds of `sections()[i]`.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics, bounds: &[Option<SectionBounds>]) -> ScrollUpdate {
        let target = self.mapper.target_frame(&metrics);
        self.driver.set_target(target);
        let active_section = self.sections.update(bounds, metrics.viewport_height);
        ScrollUpdate { target, active_section }
    }

    /// Match the surface to a new viewport and redraw the current frame.
    ///
    /// Returns `true` when a frame was painted.
    pub fn on_resize(&mut self, size: SurfaceSize) -> bool {
        if !self.active {
            return false;
        }
        self.surface.resize(size);
        log::debug!("surface resized to {}x{}", size.width, size.height);
        self.redraw()
    }

    /// Advance the easing by one refresh, painting only when it moved.
    ///
    /// Returns the frame that was requested for drawing, if any.
    pub fn tick(&mut self) -> Option<usize> {
        if !self.active {
            return None;
        }
        let frame = self.driver.tick()?;
        self.draw(frame);
        Some(frame)
    }

    /// Repaint the current eased frame.
    pub fn redraw(&mut self) -> bool {
        let frame = self.driver.current_frame();
        self.draw(frame)
    }

    fn draw(&mut self, frame: usize) -> bool {
        let store = self.store.borrow();
        render_frame(&mut self.surface, &store, frame, &self.style)
    }

    /// Stop reacting to ticks and resizes. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.active {
            log::debug!("animator torn down at frame {}", self.driver.current_frame());
        }
        self.active = false;
        self.driver.stop();
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    #[inline]
    pub fn sections(&self) -> &SectionTracker {
        &self.sections
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    pub fn store(&self) -> &SharedStore<S::Image> {
        &self.store
    }
}

/// Browser wiring: loads frames, listens to scroll/resize and runs the
/// animation-frame loop.
#[cfg(feature = "web")]
pub mod web {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::{AddEventListenerOptions, HtmlCanvasElement, HtmlImageElement, Window};

    use super::*;
    use crate::loader::{load_sequence, ImageElementSource, LoadingProgress};
    use crate::render::web::CanvasSurface;
    use crate::{Error, FrameStore};

    type SharedAnimator = Rc<RefCell<Animator<CanvasSurface>>>;
    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

    fn window() -> Result<Window> {
        web_sys::window().ok_or_else(|| Error::Surface("No window available".into()))
    }

    fn viewport_size(window: &Window) -> SurfaceSize {
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        SurfaceSize::new(width as u32, height as u32)
    }

    fn scroll_metrics(window: &Window) -> ScrollMetrics {
        let document_height = window
            .document()
            .and_then(|d| d.body())
            .map(|b| b.scroll_height() as f64)
            .unwrap_or(0.0);
        ScrollMetrics::new(
            window.scroll_y().unwrap_or(0.0),
            document_height,
            viewport_size(window).height as f64,
        )
    }

    fn section_bounds(window: &Window, tracker: &SectionTracker) -> Vec<Option<SectionBounds>> {
        let document = window.document();
        tracker
            .sections()
            .iter()
            .map(|section| {
                let el = document.as_ref()?.get_element_by_id(&section.id)?;
                let rect = el.get_bounding_client_rect();
                Some(SectionBounds::new(rect.top(), rect.bottom()))
            })
            .collect()
    }

    /// Handle to a mounted animator. Call [`MountHandle::teardown`] on unmount.
    pub struct MountHandle {
        window: Window,
        animator: SharedAnimator,
        frame_callback: FrameCallback,
        frame_id: Rc<Cell<Option<i32>>>,
        on_scroll: Closure<dyn FnMut()>,
        on_resize: Closure<dyn FnMut()>,
    }

    impl MountHandle {
        /// Index of the active navigation section.
        pub fn active_section(&self) -> usize {
            self.animator.borrow().sections().active()
        }

        /// Cancel the animation-frame loop and remove event listeners.
        pub fn teardown(self) {
            if let Some(id) = self.frame_id.take() {
                let _ = self.window.cancel_animation_frame(id);
            }
            // Breaks the self-referencing loop closure
            self.frame_callback.borrow_mut().take();

            let _ = self
                .window
                .remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
            self.animator.borrow_mut().teardown();
        }
    }

    /// Mount the animator on `canvas`.
    ///
    /// Starts the two-tier frame load in the background, sizes the canvas to
    /// the viewport and schedules the animation-frame loop. `on_progress`
    /// receives every loading update; `on_section` fires when the active
    /// navigation section changes.
    pub fn mount<P, N>(canvas: HtmlCanvasElement, config: &SceneConfig, on_progress: P, on_section: N) -> Result<MountHandle>
    where
        P: Fn(LoadingProgress) + 'static,
        N: Fn(usize) + 'static,
    {
        let window = window()?;
        let sequence = config.sequence()?;
        let plan = config.tier_plan(sequence.total_frames())?;
        let store = FrameStore::<HtmlImageElement>::new(sequence).shared();

        let surface = CanvasSurface::new(canvas)?;
        let animator: SharedAnimator = Rc::new(RefCell::new(Animator::from_config(store.clone(), surface, config)?));
        animator.borrow_mut().on_resize(viewport_size(&window));

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = load_sequence(&ImageElementSource, &*store, plan, on_progress).await {
                log::warn!("frame loading skipped: {}", err);
            }
        });

        let on_resize = {
            let animator = animator.clone();
            let window = window.clone();
            Closure::wrap(Box::new(move || {
                animator.borrow_mut().on_resize(viewport_size(&window));
            }) as Box<dyn FnMut()>)
        };
        window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            .map_err(|_| Error::Surface("Failed to add resize listener".into()))?;

        let on_scroll = {
            let animator = animator.clone();
            let window = window.clone();
            Closure::wrap(Box::new(move || {
                let mut animator = animator.borrow_mut();
                let previous = animator.sections().active();
                let bounds = section_bounds(&window, animator.sections());
                let update = animator.on_scroll(scroll_metrics(&window), &bounds);
                if update.active_section != previous {
                    on_section(update.active_section);
                }
            }) as Box<dyn FnMut()>)
        };
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                on_scroll.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|_| Error::Surface("Failed to add scroll listener".into()))?;

        // `frame_callback` holds the loop closure so it can reschedule itself.
        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let frame_id = Rc::new(Cell::new(None));
        {
            let callback = frame_callback.clone();
            let frame_id = frame_id.clone();
            let animator = animator.clone();
            let window = window.clone();
            *frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                if !animator.borrow().is_active() {
                    return;
                }
                animator.borrow_mut().tick();
                if let Some(cb) = callback.borrow().as_ref() {
                    frame_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
                }
            }) as Box<dyn FnMut()>));
        }
        if let Some(cb) = frame_callback.borrow().as_ref() {
            let id = window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .map_err(|_| Error::Surface("Failed to request animation frame".into()))?;
            frame_id.set(Some(id));
        }

        Ok(MountHandle {
            window,
            animator,
            frame_callback,
            frame_id,
            on_scroll,
            on_resize,
        })
    }
}
