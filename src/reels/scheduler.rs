//! Timed rotation of the reel preview strip.
//!
//! DESIGN
//! ======
//! The pool of candidate reels is shuffled and sliced into a display subset.
//! The subset and its selection time live in the session cache, so every
//! mount within one session reuses the same subset until the interval has
//! elapsed. A single tokio task drives rotations; it is aborted on reset and
//! on drop.
//!
//! TRADE-OFFS
//! ==========
//! Two schedulers sharing one cache may race on the two keys. The loser's
//! write simply wins the next read; nothing depends on the order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::ListingsApi;
use crate::models::{Reel, Viewer};
use crate::reels::cache::{SessionCache, DISPLAYED_REELS_KEY, REELS_TIMESTAMP_KEY};

pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_DISPLAY_COUNT: usize = 12;

/// Wall-clock source for selection timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationSettings {
    pub interval: Duration,
    pub display_count: usize,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_ROTATION_INTERVAL,
            display_count: DEFAULT_DISPLAY_COUNT,
        }
    }
}

/// Uniform-ish subset via shuffle-and-slice. Not for anything fairness-sensitive.
///
/// A pool no larger than `count` is returned whole, in its original order.
pub fn pick_random_subset<R: Rng + ?Sized>(pool: &[Reel], count: usize, rng: &mut R) -> Vec<Reel> {
    if pool.len() <= count {
        return pool.to_vec();
    }
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

struct RotationState {
    pool: Vec<Reel>,
    cache: Arc<dyn SessionCache>,
    rng: StdRng,
    settings: RotationSettings,
    clock: Clock,
}

impl RotationState {
    /// Subset and selection time left by an earlier mount, if still readable
    fn stored(&self, now: DateTime<Utc>) -> Option<(Vec<Reel>, DateTime<Utc>)> {
        let millis: i64 = self.cache.get(REELS_TIMESTAMP_KEY, now)?.parse().ok()?;
        let selected_at = DateTime::<Utc>::from_timestamp_millis(millis)?;
        let raw = self.cache.get(DISPLAYED_REELS_KEY, now)?;
        match serde_json::from_str(&raw) {
            Ok(reels) => Some((reels, selected_at)),
            Err(e) => {
                warn!("Discarding unreadable {}: {}", DISPLAYED_REELS_KEY, e);
                None
            }
        }
    }

    fn rotate_at(&mut self, now: DateTime<Utc>) -> Vec<Reel> {
        let subset = pick_random_subset(&self.pool, self.settings.display_count, &mut self.rng);
        self.persist(&subset, now);
        subset
    }

    fn persist(&self, subset: &[Reel], now: DateTime<Utc>) {
        let ttl = Some(self.settings.interval);
        match serde_json::to_string(subset) {
            Ok(json) => {
                self.cache.set(DISPLAYED_REELS_KEY, json, ttl, now);
                self.cache.set(
                    REELS_TIMESTAMP_KEY,
                    now.timestamp_millis().to_string(),
                    ttl,
                    now,
                );
            }
            Err(e) => warn!("Could not serialize reel subset: {}", e),
        }
    }

    fn clear_cache(&self) {
        self.cache.clear(DISPLAYED_REELS_KEY);
        self.cache.clear(REELS_TIMESTAMP_KEY);
    }
}

fn lock(state: &Mutex<RotationState>) -> MutexGuard<'_, RotationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps a bounded random subset of reels on display, rotating on a timer
pub struct ReelScheduler {
    state: Arc<Mutex<RotationState>>,
    displayed: Arc<watch::Sender<Vec<Reel>>>,
    timer: Option<JoinHandle<()>>,
}

impl ReelScheduler {
    pub fn new(cache: Arc<dyn SessionCache>, settings: RotationSettings) -> Self {
        Self::with_rng(cache, settings, StdRng::from_os_rng())
    }

    pub fn with_rng(cache: Arc<dyn SessionCache>, settings: RotationSettings, rng: StdRng) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            state: Arc::new(Mutex::new(RotationState {
                pool: Vec::new(),
                cache,
                rng,
                settings,
                clock: system_clock(),
            })),
            displayed: Arc::new(tx),
            timer: None,
        }
    }

    /// Replace the wall clock used by [`mount`](Self::mount) and the rotation timer
    pub fn with_clock(self, clock: Clock) -> Self {
        lock(&self.state).clock = clock;
        self
    }

    /// Receiver that observes every change of the displayed subset
    pub fn subscribe(&self) -> watch::Receiver<Vec<Reel>> {
        self.displayed.subscribe()
    }

    pub fn displayed(&self) -> Vec<Reel> {
        self.displayed.borrow().clone()
    }

    pub fn pool_len(&self) -> usize {
        lock(&self.state).pool.len()
    }

    pub fn is_scheduled(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    pub fn set_pool(&mut self, pool: Vec<Reel>) {
        debug!("Reel pool holds {} reels", pool.len());
        lock(&self.state).pool = pool;
    }

    /// Fetch the reel pool for `viewer`.
    ///
    /// Anonymous viewers get the general feed and signed-in users their
    /// personalised one. Agents get no pool and no request is sent. A failed
    /// fetch leaves an empty pool; no retry.
    pub async fn load_pool<A>(&mut self, api: &A, viewer: Viewer) -> usize
    where
        A: ListingsApi + ?Sized,
    {
        let fetched = match viewer {
            Viewer::Agent(_) => {
                debug!("Agents see no reels");
                Ok(Vec::new())
            }
            Viewer::User(user_id) => api.fetch_personalized_reels(user_id).await,
            Viewer::Anonymous => api.fetch_reels().await,
        };
        let pool = match fetched {
            Ok(reels) => reels,
            Err(e) => {
                warn!("Reel pool unavailable, showing none: {}", e);
                Vec::new()
            }
        };
        let len = pool.len();
        self.set_pool(pool);
        len
    }

    /// Load the pool and mount in one step
    pub async fn refresh<A>(&mut self, api: &A, viewer: Viewer) -> Vec<Reel>
    where
        A: ListingsApi + ?Sized,
    {
        self.load_pool(api, viewer).await;
        self.mount();
        self.displayed()
    }

    /// Viewer/auth context changed: drop everything and start over for the new viewer
    pub async fn change_viewer<A>(&mut self, api: &A, viewer: Viewer) -> Vec<Reel>
    where
        A: ListingsApi + ?Sized,
    {
        self.reset();
        self.refresh(api, viewer).await
    }

    pub fn mount(&mut self) -> Option<Duration> {
        let now = (lock(&self.state).clock)();
        self.mount_at(now)
    }

    /// Publish the subset for `now` and schedule the next rotation.
    ///
    /// Returns the delay until that rotation, or `None` when the pool is
    /// empty and nothing is scheduled. Outside a tokio runtime the subset
    /// is still chosen but no timer is started.
    pub fn mount_at(&mut self, now: DateTime<Utc>) -> Option<Duration> {
        self.cancel_timer();

        let (subset, delay) = {
            let mut state = lock(&self.state);
            if state.pool.is_empty() {
                drop(state);
                self.displayed.send_replace(Vec::new());
                return None;
            }

            let interval = state.settings.interval;
            let reused = state.stored(now).and_then(|(reels, selected_at)| {
                let age = (now - selected_at).to_std().ok()?;
                (age < interval).then(|| (reels, interval - age))
            });

            match reused {
                Some((reels, remaining)) => {
                    debug!("Reusing {} stored reels for {:?}", reels.len(), remaining);
                    (reels, remaining)
                }
                None => {
                    let reels = state.rotate_at(now);
                    info!("Selected {} of {} reels", reels.len(), state.pool.len());
                    (reels, interval)
                }
            }
        };

        self.displayed.send_replace(subset);
        self.schedule(delay);
        Some(delay)
    }

    /// Cancel the timer, forget the pool and the cached subset
    pub fn reset(&mut self) {
        self.cancel_timer();
        {
            let mut state = lock(&self.state);
            state.pool.clear();
            state.clear_cache();
        }
        self.displayed.send_replace(Vec::new());
        debug!("Reel scheduler reset");
    }

    fn schedule(&mut self, first_delay: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No tokio runtime, reel rotation timer not started");
            return;
        };

        let state = Arc::clone(&self.state);
        let displayed = Arc::clone(&self.displayed);

        self.timer = Some(handle.spawn(async move {
            let mut delay = first_delay;
            loop {
                tokio::time::sleep(delay).await;
                let (subset, interval) = {
                    let mut guard = lock(&state);
                    let now = (guard.clock)();
                    (guard.rotate_at(now), guard.settings.interval)
                };
                debug!("Rotated reels, {} on display", subset.len());
                displayed.send_replace(subset);
                delay = interval;
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for ReelScheduler {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
