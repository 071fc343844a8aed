//! Engine - the ticking heart of the sequencer.
//!
//! The engine owns the [`Session`] (graph plus drum rows) and a
//! [`StepScheduler`]. A ticker thread polls the scheduler every few
//! milliseconds; each tick resolves the combined pattern under the session
//! lock, releases it, then lets the scheduler decide whether a step fired.
//! Fired steps become [`BeatEvent`]s on a lock-free ring that the control
//! thread drains at its own pace.
//!
//! ```text
//!   ticker thread                         control thread
//!   ─────────────                         ──────────────
//!   lock session → combined pattern       with_session(|s| edit)
//!   scheduler.tick(pattern)               drain_events() → play hits
//!        │ on_beat(step)                          ▲
//!        └──► rtrb ring (bounded) ────────────────┘
//!             full? drop the event
//! ```
//!
//! The ring never blocks the ticker. If the control thread falls behind,
//! beats are dropped, not queued up and burst out later.

pub mod config;
pub mod rows;
pub mod transport;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use rtrb::{Consumer, RingBuffer};
use tracing::{debug, error, info, trace};

use crate::graph::{GraphError, PatternGraph};
use crate::sequencing::clock::{Clock, SystemClock};
use crate::sequencing::scheduler::StepScheduler;

pub use config::EngineConfig;
pub use rows::{DrumRow, DrumRows, Session, Trigger};
pub use transport::Transport;

/// A step that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatEvent {
    pub step: usize,
}

/// State shared with the ticker thread
struct Shared {
    session: Arc<Mutex<Session>>,
    scheduler: Mutex<StepScheduler>,
    playing: AtomicBool,
    shutdown: AtomicBool,
}

impl Shared {
    fn tick(&self) -> Option<usize> {
        if !self.playing.load(Ordering::Acquire) {
            return None;
        }
        // Session lock released before the scheduler is touched
        let pattern = lock(&self.session).combined_pattern();
        let mut scheduler = lock(&self.scheduler);
        // stop() may have landed while the pattern was resolving
        if !self.playing.load(Ordering::Acquire) {
            return None;
        }
        scheduler.tick(&pattern)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Engine {
    shared: Arc<Shared>,
    events: Consumer<BeatEvent>,
    dropped: Arc<AtomicU64>,
    ticker: Option<JoinHandle<()>>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let beat_length = config.clamp_beat_length(config.beat_length);
        let graph = PatternGraph::with_beat_length(beat_length).unwrap_or_default();

        let (mut producer, events) = RingBuffer::<BeatEvent>::new(config.event_capacity.max(1));
        let dropped = Arc::new(AtomicU64::new(0));

        let mut scheduler = StepScheduler::with_clock(config.bpm, clock);
        let counter = Arc::clone(&dropped);
        scheduler.on_beat(move |step| {
            if producer.push(BeatEvent { step }).is_err() {
                counter.fetch_add(1, Ordering::Relaxed);
                trace!(step, "beat event dropped, queue full");
            }
        });

        Self {
            shared: Arc::new(Shared {
                session: Arc::new(Mutex::new(Session::new(graph))),
                scheduler: Mutex::new(scheduler),
                playing: AtomicBool::new(false),
                shutdown: AtomicBool::new(false),
            }),
            events,
            dropped,
            ticker: None,
            config,
        }
    }

    /// Start the background ticker. Calling it again is a no-op.
    pub fn spawn(&mut self) -> std::io::Result<()> {
        if self.ticker.is_some() {
            return Ok(());
        }
        let shared = Arc::clone(&self.shared);
        let interval = self.config.tick_interval();
        let handle = thread::Builder::new()
            .name("tunkul-ticker".into())
            .spawn(move || {
                while !shared.shutdown.load(Ordering::Acquire) {
                    shared.tick();
                    thread::park_timeout(interval);
                }
            })?;
        debug!(?interval, "ticker started");
        self.ticker = Some(handle);
        Ok(())
    }

    /// Tick on the calling thread. Returns the step that fired, if any.
    pub fn tick_once(&self) -> Option<usize> {
        self.shared.tick()
    }

    /// Begin playing from step 0
    pub fn start(&self) {
        let bpm = {
            let mut scheduler = lock(&self.shared.scheduler);
            scheduler.reset();
            self.shared.playing.store(true, Ordering::Release);
            scheduler.bpm()
        };
        info!(bpm, "transport started");
    }

    /// Stop playing and rewind to step 0.
    ///
    /// The flag flips under the scheduler lock, so once this returns no
    /// further beat can be pushed until the next [`Engine::start`].
    pub fn stop(&self) {
        {
            let mut scheduler = lock(&self.shared.scheduler);
            self.shared.playing.store(false, Ordering::Release);
            scheduler.reset();
        }
        info!("transport stopped");
    }

    pub fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::Acquire)
    }

    pub fn set_bpm(&self, bpm: i32) {
        lock(&self.shared.scheduler).set_bpm(bpm);
        debug!(bpm, "tempo changed");
    }

    pub fn bpm(&self) -> i32 {
        lock(&self.shared.scheduler).bpm()
    }

    /// Fraction of the current beat interval elapsed, 0.0..=1.0
    pub fn progress(&self) -> f64 {
        lock(&self.shared.scheduler).progress()
    }

    pub fn current_step(&self) -> usize {
        lock(&self.shared.scheduler).current_step()
    }

    /// Shared handle to the graph and rows
    pub fn session(&self) -> Arc<Mutex<Session>> {
        Arc::clone(&self.shared.session)
    }

    /// Run `f` with the session locked
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut lock(&self.shared.session))
    }

    /// Run `f` with the graph locked
    pub fn with_graph<R>(&self, f: impl FnOnce(&mut PatternGraph) -> R) -> R {
        self.with_session(|session| f(&mut session.graph))
    }

    /// Set the beat length, clamped to the configured maximum.
    ///
    /// Returns the length actually applied.
    pub fn set_beat_length(&self, requested: usize) -> Result<usize, GraphError> {
        let len = self.config.clamp_beat_length(requested);
        self.with_graph(|graph| graph.set_beat_length(len))?;
        Ok(len)
    }

    /// Pop every pending beat event, oldest first
    pub fn drain_events(&mut self) -> impl Iterator<Item = BeatEvent> + '_ {
        std::iter::from_fn(move || self.events.pop().ok())
    }

    /// Beat events lost to a full queue since creation
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Stop and join the ticker thread
    pub fn shutdown(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.ticker.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                error!("ticker thread panicked");
            }
            debug!("ticker stopped");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
