//! # frame-scroll-view
//!
//! Scroll-synchronized image-sequence animation for canvas hero sections.
//!
//! This crate provides platform-agnostic data structures and logic for:
//! - Addressing and storing an ordered sequence of frame images
//! - Loading frames in two tiers (hero frames first, then the rest)
//! - Mapping document scroll position to a frame index
//! - Easing the displayed frame toward that index once per display refresh
//! - Cover-fitting frames to the viewport with darkening overlays
//! - Rendering to a canvas (with optional web support)
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for data structures
//! - `toml` - Parse [`SceneConfig`] from TOML
//! - `web` - Enable web/WASM canvas rendering, image loading and mounting
//!
//! ## Example
//!
//! ```rust,ignore
//! use frame_scroll_view::{Animator, FrameStore, SceneConfig, ScrollMetrics};
//!
//! let config = SceneConfig::default();
//! let store = FrameStore::new(config.sequence()?).shared();
//!
//! // Load frames in the background
//! let plan = config.tier_plan(store.borrow().total_frames())?;
//! spawn_local(async move {
//!     load_sequence(&source, &*store, plan, |p| show(p.message())).await.ok();
//! });
//!
//! // Drive the animation
//! let mut animator = Animator::from_config(store, surface, &config)?;
//! animator.on_scroll(ScrollMetrics::new(scroll_y, doc_height, vh), &bounds);
//! animator.tick(); // once per display refresh
//! ```

mod animation;
pub mod animator;
mod color;
mod config;
mod data;
mod error;
pub mod loader;
pub mod render;
pub mod reservation;
pub mod scroll;
mod sizing;
mod store;

pub use animation::{AnimationDriver, Easing, DEFAULT_EASE_FACTOR, DEFAULT_SETTLE_THRESHOLD};
pub use animator::{Animator, ScrollUpdate};
pub use color::{parse_color, Rgba};
pub use config::SceneConfig;
pub use data::{FrameImage, FramePath, FrameSequence, ImageSize};
pub use error::{Error, Result};
pub use loader::{load_sequence, FrameSource, LoadingPhase, LoadingProgress, TierBarrier, TierPlan};
pub use render::{render_frame, OverlayStyle, RenderPlan, RenderSurface};
pub use reservation::{Confirmation, Experience, ReservationForm};
pub use scroll::{ScrollMapper, ScrollMetrics, Section, SectionBounds, SectionTracker};
pub use sizing::{cover_fit, DrawRect, SurfaceSize};
pub use store::{FrameSlot, FrameStore, LoadResult, SettleEvent, SharedStore};

#[cfg(feature = "web")]
pub use animator::web::{mount, MountHandle};
#[cfg(feature = "web")]
pub use render::web::CanvasSurface;
