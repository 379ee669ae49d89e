//! Two-tier frame loading and progress reporting.
//!
//! Frames are requested in two phases:
//! 1. Hero tier (the first N frames) - enables the above-the-fold animation
//! 2. Remainder - requested only after every hero frame has settled
//!
//! Both tiers issue their requests concurrently. A failed fetch settles its
//! slot like a successful one so the loading screen never stalls.

use std::cell::RefCell;
use std::future::Future;
use std::ops::Range;

use futures::channel::oneshot;
use futures::future::join_all;

use crate::store::{percent, LoadResult, SettleEvent};
use crate::{Error, FrameStore, Result};

/// Default number of frames in the hero tier.
pub const DEFAULT_HERO_COUNT: usize = 49;

/// Loading phase indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingPhase {
    /// Not loading anything
    Idle,
    /// Loading the hero tier
    Hero,
    /// Hero tier settled, loading the remaining frames
    Remainder,
    /// Every frame settled
    Complete,
}

/// Progress snapshot reported to observers such as a loading screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadingProgress {
    pub phase: LoadingPhase,
    /// Frames settled so far (decoded or failed)
    pub loaded: usize,
    /// Total number of frames
    pub total: usize,
}

impl LoadingProgress {
    pub fn new(total: usize) -> Self {
        Self {
            phase: LoadingPhase::Idle,
            loaded: 0,
            total,
        }
    }

    /// Rounded loading percentage (0-100)
    pub fn percent(&self) -> u8 {
        percent(self.loaded, self.total)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.loaded >= self.total
    }

    /// Loading screen caption.
    pub fn message(&self) -> String {
        let pct = self.percent();
        if pct < 100 {
            format!("Preparing — {}%", pct)
        } else {
            "Welcome".to_string()
        }
    }

    fn apply(&mut self, event: &SettleEvent) {
        self.loaded = event.loaded;
        self.total = event.total;
        if event.became_ready {
            self.phase = LoadingPhase::Complete;
        }
    }
}

/// Split of a sequence into hero and remainder tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierPlan {
    total: usize,
    hero: usize,
}

impl TierPlan {
    /// Plan `total` frames with the first `hero` in the hero tier.
    pub fn new(total: usize, hero: usize) -> Result<Self> {
        if hero > total {
            return Err(Error::HeroCountOutOfRange { hero, total });
        }
        Ok(Self { total, hero })
    }

    /// Plan with the default hero count, shrunk to fit short sequences.
    pub fn with_default_hero(total: usize) -> Self {
        Self {
            total,
            hero: DEFAULT_HERO_COUNT.min(total),
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Slots of the hero tier.
    #[inline]
    pub fn hero(&self) -> Range<usize> {
        0..self.hero
    }

    /// Slots requested after the hero tier settles.
    #[inline]
    pub fn remainder(&self) -> Range<usize> {
        self.hero..self.total
    }
}

/// Join barrier over a set of slots.
///
/// Opens when every slot in the set has arrived. Duplicate or foreign
/// arrivals are ignored; opening happens exactly once.
#[derive(Clone, Debug)]
pub struct TierBarrier {
    slots: Range<usize>,
    arrived: Vec<bool>,
    remaining: usize,
}

impl TierBarrier {
    pub fn new(slots: Range<usize>) -> Self {
        let len = slots.len();
        Self {
            slots,
            arrived: vec![false; len],
            remaining: len,
        }
    }

    /// Record that `slot` settled. Returns `true` only for the arrival that
    /// opens the barrier.
    pub fn arrive(&mut self, slot: usize) -> bool {
        if !self.slots.contains(&slot) {
            return false;
        }
        let seen = &mut self.arrived[slot - self.slots.start];
        if *seen {
            return false;
        }
        *seen = true;
        self.remaining -= 1;
        self.remaining == 0
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

/// Trait for async frame image providers.
///
/// Implement this trait to fetch and decode frames through your specific
/// I/O mechanism (browser image elements, filesystem, test doubles, etc.)
///
/// No `Send` bounds — works in both native and WASM (single-threaded) contexts.
pub trait FrameSource {
    type Image;

    /// Fetch and decode the frame at `path`. Errors are described as text.
    fn fetch(&self, path: &str) -> impl Future<Output = LoadResult<Self::Image>>;
}

/// Load every frame of `store` in two tiers.
///
/// All hero slots are requested at once. The remainder is held behind a
/// [`TierBarrier`] over the hero slots and requested only once that barrier
/// opens. `on_progress` runs after every slot settles, outside any borrow of
/// the store.
///
/// Fails without requesting anything when `plan` does not cover exactly the
/// frames of `store`.
pub async fn load_sequence<S, F>(
    source: &S,
    store: &RefCell<FrameStore<S::Image>>,
    plan: TierPlan,
    on_progress: F,
) -> Result<()>
where
    S: FrameSource,
    F: Fn(LoadingProgress),
{
    let paths: Vec<String> = {
        let store = store.borrow();
        if plan.total() != store.total_frames() {
            return Err(Error::PlanMismatch {
                planned: plan.total(),
                frames: store.total_frames(),
            });
        }
        store.sequence().paths().map(|(_, path)| path).collect()
    };
    let progress = RefCell::new(LoadingProgress {
        phase: LoadingPhase::Hero,
        loaded: store.borrow().loaded_count(),
        total: plan.total(),
    });
    let barrier = RefCell::new(TierBarrier::new(plan.hero()));
    let (open_tx, open_rx) = oneshot::channel::<()>();
    let open_tx = RefCell::new(Some(open_tx));
    if barrier.borrow().is_open() {
        open_barrier(&open_tx);
    }

    let (paths, progress, barrier, open_tx, on_progress) = (&paths, &progress, &barrier, &open_tx, &on_progress);
    let load_slot = move |slot: usize| async move {
        let result = source.fetch(&paths[slot]).await;
        let event = store.borrow_mut().settle(slot, result);
        if barrier.borrow_mut().arrive(slot) {
            log::debug!("hero tier settled ({} frames)", plan.hero().len());
            open_barrier(open_tx);
        }
        if let Some(event) = event {
            let snapshot = {
                let mut progress = progress.borrow_mut();
                progress.apply(&event);
                *progress
            };
            on_progress(snapshot);
        }
    };

    let hero = async {
        log::debug!("requesting hero tier: {} frames", plan.hero().len());
        join_all(plan.hero().map(load_slot)).await;
        // Every hero slot has arrived by now; a sender still here means the
        // barrier never opened.
        open_tx.borrow_mut().take();
    };
    let remainder = async {
        if open_rx.await.is_err() {
            log::warn!("hero barrier never opened; remainder not requested");
            return;
        }
        if plan.remainder().is_empty() {
            return;
        }
        {
            let mut progress = progress.borrow_mut();
            if progress.phase != LoadingPhase::Complete {
                progress.phase = LoadingPhase::Remainder;
            }
        }
        log::debug!("requesting remainder tier: {} frames", plan.remainder().len());
        join_all(plan.remainder().map(load_slot)).await;
    };
    futures::join!(hero, remainder);
    Ok(())
}

fn open_barrier(open_tx: &RefCell<Option<oneshot::Sender<()>>>) {
    if let Some(tx) = open_tx.borrow_mut().take() {
        let _ = tx.send(());
    }
}

/// Fetches frames through browser image elements.
#[cfg(feature = "web")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageElementSource;

#[cfg(feature = "web")]
impl FrameSource for ImageElementSource {
    type Image = web_sys::HtmlImageElement;

    async fn fetch(&self, path: &str) -> LoadResult<Self::Image> {
        let image = web_sys::HtmlImageElement::new().map_err(|_| "Failed to create image element".to_string())?;
        image.set_src(path);
        wasm_bindgen_futures::JsFuture::from(image.decode()).await.map_err(|err| {
            use wasm_bindgen::JsCast;
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
                .unwrap_or_else(|| format!("{:?}", err))
        })?;
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FramePath, FrameSequence, ImageSize};
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::collections::HashMap;
    use std::rc::Rc;

    fn sequence(total: u32) -> FrameSequence {
        FrameSequence::new(1, total, FramePath::new("f_{frame}.png", 3).unwrap()).unwrap()
    }

    /// Resolves immediately; paths listed in `broken` fail.
    struct InstantSource {
        broken: Vec<String>,
    }

    impl FrameSource for InstantSource {
        type Image = ImageSize;

        async fn fetch(&self, path: &str) -> LoadResult<ImageSize> {
            if self.broken.iter().any(|p| p == path) {
                Err(format!("cannot decode {}", path))
            } else {
                Ok(ImageSize::new(16, 9))
            }
        }
    }

    /// Each fetch parks until the test resolves it by path.
    #[derive(Default)]
    struct ManualSource {
        issued: RefCell<Vec<String>>,
        pending: RefCell<HashMap<String, oneshot::Sender<LoadResult<ImageSize>>>>,
    }

    impl ManualSource {
        fn resolve(&self, path: &str, result: LoadResult<ImageSize>) {
            let sender = self.pending.borrow_mut().remove(path).expect("request not issued");
            sender.send(result).unwrap();
        }

        fn issued(&self) -> Vec<String> {
            self.issued.borrow().clone()
        }
    }

    impl FrameSource for ManualSource {
        type Image = ImageSize;

        async fn fetch(&self, path: &str) -> LoadResult<ImageSize> {
            let (tx, rx) = oneshot::channel();
            self.issued.borrow_mut().push(path.to_string());
            self.pending.borrow_mut().insert(path.to_string(), tx);
            rx.await.unwrap_or_else(|_| Err("dropped".to_string()))
        }
    }

    #[test]
    fn test_loading_progress_message() {
        let mut progress = LoadingProgress::new(173);
        assert_eq!(progress.message(), "Preparing — 0%");
        progress.loaded = 86;
        assert_eq!(progress.percent(), 50);
        assert_eq!(progress.message(), "Preparing — 50%");
        progress.loaded = 173;
        assert!(progress.is_complete());
        assert_eq!(progress.message(), "Welcome");
    }

    #[test]
    fn test_tier_plan() {
        let plan = TierPlan::new(173, 49).unwrap();
        assert_eq!(plan.hero(), 0..49);
        assert_eq!(plan.remainder(), 49..173);

        assert_eq!(
            TierPlan::new(10, 49),
            Err(Error::HeroCountOutOfRange { hero: 49, total: 10 })
        );
        assert_eq!(TierPlan::with_default_hero(10).hero(), 0..10);
    }

    #[test]
    fn test_barrier_opens_once() {
        let mut barrier = TierBarrier::new(0..3);
        assert!(!barrier.arrive(2));
        assert!(!barrier.arrive(2));
        assert!(!barrier.arrive(7));
        assert!(!barrier.arrive(0));
        assert_eq!(barrier.remaining(), 1);
        assert!(barrier.arrive(1));
        assert!(barrier.is_open());
        assert!(!barrier.arrive(1));

        assert!(TierBarrier::new(0..0).is_open());
    }

    #[test]
    fn test_load_sequence_settles_everything() {
        let store = RefCell::new(FrameStore::new(sequence(10)));
        let source = InstantSource {
            broken: vec!["f_004.png".into()],
        };
        let reports = RefCell::new(Vec::new());

        block_on(load_sequence(&source, &store, TierPlan::new(10, 4).unwrap(), |p| {
            reports.borrow_mut().push(p)
        }))
        .unwrap();

        let store = store.borrow();
        assert!(store.is_ready());
        assert_eq!(store.loaded_count(), 10);
        assert_eq!(store.failed_frames(), &[3]);

        let reports = reports.borrow();
        assert_eq!(reports.len(), 10);
        assert!(reports.windows(2).all(|w| w[0].loaded < w[1].loaded));
        assert_eq!(reports[3].phase, LoadingPhase::Hero);
        assert_eq!(reports[4].phase, LoadingPhase::Remainder);
        assert_eq!(reports[9].phase, LoadingPhase::Complete);
        assert_eq!(reports[9].percent(), 100);
    }

    #[test]
    fn test_remainder_waits_for_hero_barrier() {
        let source = Rc::new(ManualSource::default());
        let store = Rc::new(RefCell::new(FrameStore::new(sequence(6))));
        let mut pool = LocalPool::new();

        {
            let source = source.clone();
            let store = store.clone();
            pool.spawner()
                .spawn_local(async move {
                    load_sequence(&*source, &*store, TierPlan::new(6, 3).unwrap(), |_| {})
                        .await
                        .unwrap();
                })
                .unwrap();
        }

        pool.run_until_stalled();
        assert_eq!(source.issued(), vec!["f_001.png", "f_002.png", "f_003.png"]);

        // Settle hero frames out of order, one failing; nothing new may be issued
        // while any hero frame is pending.
        source.resolve("f_003.png", Ok(ImageSize::new(4, 4)));
        pool.run_until_stalled();
        source.resolve("f_001.png", Err("broken".into()));
        pool.run_until_stalled();
        assert_eq!(source.issued().len(), 3);
        assert_eq!(store.borrow().loaded_count(), 2);

        source.resolve("f_002.png", Ok(ImageSize::new(4, 4)));
        pool.run_until_stalled();
        assert_eq!(
            source.issued(),
            vec!["f_001.png", "f_002.png", "f_003.png", "f_004.png", "f_005.png", "f_006.png"]
        );
        assert!(!store.borrow().is_ready());

        for path in ["f_006.png", "f_004.png", "f_005.png"] {
            source.resolve(path, Ok(ImageSize::new(4, 4)));
        }
        pool.run_until_stalled();
        assert!(store.borrow().is_ready());
        assert_eq!(store.borrow().failed_frames(), &[0]);
        assert!(store.borrow().get(0).is_none());
        assert!(store.borrow().get(5).is_some());
    }

    #[test]
    fn test_hero_only_plan() {
        let store = RefCell::new(FrameStore::new(sequence(3)));
        let source = InstantSource { broken: Vec::new() };
        block_on(load_sequence(&source, &store, TierPlan::new(3, 3).unwrap(), |_| {})).unwrap();
        assert!(store.borrow().is_ready());
    }

    #[test]
    fn test_empty_hero_tier_opens_immediately() {
        let store = RefCell::new(FrameStore::new(sequence(5)));
        let source = InstantSource { broken: Vec::new() };
        let phases = RefCell::new(Vec::new());
        block_on(load_sequence(&source, &store, TierPlan::new(5, 0).unwrap(), |p| {
            phases.borrow_mut().push(p.phase)
        }))
        .unwrap();
        assert!(store.borrow().is_ready());
        assert_eq!(phases.borrow()[0], LoadingPhase::Remainder);
        assert_eq!(phases.borrow()[4], LoadingPhase::Complete);
    }

    #[test]
    fn test_plan_must_cover_store() {
        let source = Rc::new(ManualSource::default());
        let store = RefCell::new(FrameStore::new(sequence(10)));

        let short = block_on(load_sequence(&*source, &store, TierPlan::new(6, 3).unwrap(), |_| {}));
        assert_eq!(short, Err(Error::PlanMismatch { planned: 6, frames: 10 }));
        let long = block_on(load_sequence(&*source, &store, TierPlan::new(12, 3).unwrap(), |_| {}));
        assert_eq!(long, Err(Error::PlanMismatch { planned: 12, frames: 10 }));

        assert!(source.issued().is_empty());
        assert_eq!(store.borrow().loaded_count(), 0);

        let source = InstantSource { broken: Vec::new() };
        block_on(load_sequence(&source, &store, TierPlan::with_default_hero(10), |_| {})).unwrap();
        assert!(store.borrow().is_ready());
        assert_eq!(store.borrow().loaded_count(), 10);
    }
}
