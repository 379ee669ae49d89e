//! Error type shared by configuration and construction paths.

use thiserror::Error;

use crate::reservation::ReservationError;

/// Errors raised while building a scene or handling the reservation form.
///
/// The animation loop itself never fails: missing frames, decode errors and
/// a degenerate scroll domain are absorbed and only degrade what is drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Frame range whose end precedes its start
    #[error("invalid frame range: end {end} precedes start {start}")]
    InvalidRange { start: u32, end: u32 },
    /// Hero tier larger than the whole sequence
    #[error("hero count {hero} exceeds total frame count {total}")]
    HeroCountOutOfRange { hero: usize, total: usize },
    /// Tier plan sized for a different number of frames than the store holds
    #[error("tier plan covers {planned} frames but the store holds {frames}")]
    PlanMismatch { planned: usize, frames: usize },
    /// Color string that is neither hex nor a known name
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    /// Path template without a `{frame}` placeholder
    #[error("path template {0:?} has no {{frame}} placeholder")]
    InvalidTemplate(String),
    /// Drawing surface rejected an operation
    #[error("surface error: {0}")]
    Surface(String),
    /// Reservation form rejected a change or submission
    #[error(transparent)]
    Reservation(#[from] ReservationError),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
