//! Frame storage and load-completion bookkeeping.

use std::cell::RefCell;
use std::rc::Rc;

use crate::FrameSequence;

/// Result type for a single frame fetch.
pub type LoadResult<T> = Result<T, String>;

/// Frame store shared between the loader and the animator.
///
/// Both run on one execution context; borrows are never held across an
/// `.await`.
pub type SharedStore<I> = Rc<RefCell<FrameStore<I>>>;

/// Load state of a single frame slot.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameSlot<I> {
    /// Requested or not yet requested; nothing to draw
    Pending,
    /// Decoded and drawable
    Ready(I),
    /// Decode failed; counted as loaded but never drawn
    Failed,
}

impl<I> FrameSlot<I> {
    #[inline]
    pub fn is_settled(&self) -> bool {
        !matches!(self, FrameSlot::Pending)
    }
}

/// What changed when a slot settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettleEvent {
    /// Slot that settled
    pub slot: usize,
    /// Loaded count after this event
    pub loaded: usize,
    /// Total number of frames
    pub total: usize,
    /// Rounded percentage (0-100)
    pub percent: u8,
    /// True only for the event that made the store ready
    pub became_ready: bool,
}

/// Ordered collection of frame resources with load progress.
///
/// Every slot settles exactly once, either decoded or failed. Both count
/// toward `loaded_count`; the store becomes ready when the count reaches
/// the total and never reverts.
#[derive(Clone, Debug)]
pub struct FrameStore<I> {
    sequence: FrameSequence,
    slots: Vec<FrameSlot<I>>,
    loaded: usize,
    ready: bool,
    failed: Vec<usize>,
}

impl<I> FrameStore<I> {
    /// Create a store with one pending slot per frame of `sequence`.
    pub fn new(sequence: FrameSequence) -> Self {
        let total = sequence.total_frames();
        let mut slots = Vec::with_capacity(total);
        slots.resize_with(total, || FrameSlot::Pending);
        Self {
            sequence,
            slots,
            loaded: 0,
            ready: false,
            failed: Vec::new(),
        }
    }

    /// Wrap the store for sharing between loader and animator.
    pub fn shared(self) -> SharedStore<I> {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    #[inline]
    pub fn total_frames(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// `round(loaded / total * 100)`.
    pub fn progress(&self) -> u8 {
        percent(self.loaded, self.total_frames())
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Record the outcome of fetching `slot`.
    ///
    /// Returns `None` when the slot is out of range or has already settled;
    /// such calls change nothing.
    pub fn settle(&mut self, slot: usize, result: LoadResult<I>) -> Option<SettleEvent> {
        let entry = self.slots.get_mut(slot)?;
        if entry.is_settled() {
            log::warn!("frame slot {} settled twice, ignoring", slot);
            return None;
        }

        match result {
            Ok(image) => *entry = FrameSlot::Ready(image),
            Err(err) => {
                *entry = FrameSlot::Failed;
                self.failed.push(slot);
                log::warn!(
                    "frame {} ({}) failed to load: {}",
                    self.sequence.frame_number(slot).unwrap_or_default(),
                    self.sequence.path_for_slot(slot).unwrap_or_default(),
                    err
                );
            }
        }

        self.loaded += 1;
        let total = self.total_frames();
        let became_ready = !self.ready && self.loaded == total;
        if became_ready {
            self.ready = true;
            log::info!("all {} frames settled ({} failed)", total, self.failed.len());
        }
        log::trace!("frame slot {} settled, {}/{}", slot, self.loaded, total);

        Some(SettleEvent {
            slot,
            loaded: self.loaded,
            total,
            percent: self.progress(),
            became_ready,
        })
    }

    /// Drawable image at `slot`, if decoded.
    pub fn get(&self, slot: usize) -> Option<&I> {
        match self.slots.get(slot) {
            Some(FrameSlot::Ready(image)) => Some(image),
            _ => None,
        }
    }

    /// Raw slot state.
    pub fn slot(&self, slot: usize) -> Option<&FrameSlot<I>> {
        self.slots.get(slot)
    }

    /// Slots whose decode failed, in settlement order. They stay blank.
    pub fn failed_frames(&self) -> &[usize] {
        &self.failed
    }
}

pub(crate) fn percent(loaded: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        ((loaded as f64 / total as f64) * 100.0).round() as u8
    }
}
