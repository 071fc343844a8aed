//! Step scheduler - advances the pattern position in wall-clock time
//!
//! The scheduler is polled: call `tick` as often as you like (every frame,
//! every few milliseconds) and it moves forward at most one step per call,
//! once a full beat interval has passed. It never sleeps and never blocks.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::clock::{Clock, SystemClock};

/// Handler invoked with the step index each time an active step is reached.
pub type BeatCallback = Box<dyn FnMut(usize) + Send>;

/// Timing state machine that walks a beat pattern at a given tempo
pub struct StepScheduler {
    /// Tempo; zero or negative means "hold position"
    bpm: i32,
    /// Current index into the pattern
    step: usize,
    /// Clock time of the last advance (None until the first tick after a reset)
    last: Option<Duration>,
    clock: Arc<dyn Clock>,
    on_beat: Option<BeatCallback>,
}

impl StepScheduler {
    /// Create a scheduler reading the system clock
    pub fn new(bpm: i32) -> Self {
        Self::with_clock(bpm, Arc::new(SystemClock::new()))
    }

    /// Create a scheduler reading an injected clock
    pub fn with_clock(bpm: i32, clock: Arc<dyn Clock>) -> Self {
        Self {
            bpm,
            step: 0,
            last: None,
            clock,
            on_beat: None,
        }
    }

    /// Register the beat handler, replacing any previous one.
    ///
    /// The handler runs synchronously inside `tick`, so it should only hand
    /// work off (push to a queue, schedule a voice) and return.
    pub fn on_beat(&mut self, handler: impl FnMut(usize) + Send + 'static) {
        self.on_beat = Some(Box::new(handler));
    }

    /// Change tempo. Takes effect on the next tick; the step is kept.
    pub fn set_bpm(&mut self, bpm: i32) {
        self.bpm = bpm;
    }

    pub fn bpm(&self) -> i32 {
        self.bpm
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Seconds per beat as a duration, or None when the tempo is not positive
    pub fn beat_interval(&self) -> Option<Duration> {
        (self.bpm > 0).then(|| Duration::from_secs_f64(60.0 / self.bpm as f64))
    }

    /// Back to step 0; the next tick fires step 0 immediately
    pub fn reset(&mut self) {
        self.step = 0;
        self.last = None;
        debug!("scheduler reset");
    }

    /// Advance against `pattern` if a beat interval has elapsed.
    ///
    /// Returns the step that fired, if any.
    pub fn tick(&mut self, pattern: &[bool]) -> Option<usize> {
        let interval = self.beat_interval()?;
        if pattern.is_empty() {
            return None;
        }

        let now = self.clock.now();

        match self.last {
            None => {
                // First tick after a reset: evaluate step 0 right away
                self.step = 0;
                self.last = Some(now);
            }
            Some(last) => {
                if now.saturating_sub(last) < interval {
                    return None;
                }

                self.step = (self.step + 1) % pattern.len();

                // Keep a steady grid; after a stall resync instead of bursting
                let next = last + interval;
                self.last = Some(if now - next >= interval { now } else { next });
            }
        }

        let step = self.step;
        if !pattern[step] {
            return None;
        }

        if let Some(handler) = self.on_beat.as_mut() {
            handler(step);
        }
        Some(step)
    }

    /// Fraction of the current beat interval that has elapsed, in 0.0..=1.0.
    ///
    /// Zero before the first tick and whenever the tempo is not positive.
    pub fn progress(&self) -> f64 {
        let (Some(interval), Some(last)) = (self.beat_interval(), self.last) else {
            return 0.0;
        };
        let elapsed = self.clock.now().saturating_sub(last);
        (elapsed.as_secs_f64() / interval.as_secs_f64()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::clock::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn scheduler(bpm: i32) -> (StepScheduler, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (StepScheduler::with_clock(bpm, clock.clone()), clock)
    }

    fn counting(sched: &mut StepScheduler) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        sched.on_beat(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn first_tick_fires_immediately() {
        let (mut sched, _clock) = scheduler(60);
        let count = counting(&mut sched);

        assert_eq!(sched.tick(&[true, false, false, false]), Some(0));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn one_beat_per_elapsed_second_at_sixty_bpm() {
        let (mut sched, clock) = scheduler(60);
        let count = counting(&mut sched);
        let pattern = [true];

        sched.tick(&pattern);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        for _ in 0..5 {
            clock.advance(Duration::from_secs(1));
            sched.tick(&pattern);
        }
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn polling_faster_than_the_beat_does_not_substep() {
        let (mut sched, clock) = scheduler(120);
        let pattern = [true, true, true, true];

        assert_eq!(sched.tick(&pattern), Some(0));
        for _ in 0..31 {
            clock.advance(Duration::from_millis(16));
            sched.tick(&pattern);
        }
        // 31 * 16ms = 496ms, still short of the 500ms interval
        assert_eq!(sched.current_step(), 0);

        clock.advance(Duration::from_millis(16));
        assert_eq!(sched.tick(&pattern), Some(1));
    }

    #[test]
    fn inactive_steps_advance_silently() {
        let (mut sched, clock) = scheduler(60);
        let fired = Arc::new(Mutex::new(Vec::new()));
        let f = fired.clone();
        sched.on_beat(move |step| f.lock().unwrap().push(step));

        let pattern = [true, false, true, false];
        sched.tick(&pattern);
        for _ in 0..7 {
            clock.advance(Duration::from_secs(1));
            sched.tick(&pattern);
        }

        assert_eq!(*fired.lock().unwrap(), vec![0, 2, 0, 2]);
    }

    #[test]
    fn non_positive_bpm_never_fires() {
        for bpm in [0, -120] {
            let (mut sched, clock) = scheduler(bpm);
            let count = counting(&mut sched);
            for _ in 0..10 {
                sched.tick(&[true; 4]);
                clock.advance(Duration::from_secs(60));
            }
            assert_eq!(count.load(Ordering::SeqCst), 0);
            assert_eq!(sched.progress(), 0.0);
        }
    }

    #[test]
    fn empty_pattern_is_a_no_op() {
        let (mut sched, _clock) = scheduler(120);
        assert_eq!(sched.tick(&[]), None);
        assert_eq!(sched.progress(), 0.0);
    }

    #[test]
    fn reset_refires_step_zero() {
        let (mut sched, clock) = scheduler(60);
        let pattern = [true, true, true];

        sched.tick(&pattern);
        clock.advance(Duration::from_secs(1));
        sched.tick(&pattern);
        assert_eq!(sched.current_step(), 1);

        sched.reset();
        assert_eq!(sched.current_step(), 0);
        assert_eq!(sched.bpm(), 60);
        assert_eq!(sched.tick(&pattern), Some(0));
    }

    #[test]
    fn bpm_change_keeps_position() {
        let (mut sched, clock) = scheduler(60);
        let pattern = [true; 8];

        sched.tick(&pattern);
        clock.advance(Duration::from_secs(1));
        sched.tick(&pattern);
        assert_eq!(sched.current_step(), 1);

        sched.set_bpm(120);
        assert_eq!(sched.current_step(), 1);
        clock.advance(Duration::from_millis(500));
        assert_eq!(sched.tick(&pattern), Some(2));
    }

    #[test]
    fn shrinking_pattern_wraps_step() {
        let (mut sched, clock) = scheduler(60);
        let long = [true; 8];
        sched.tick(&long);
        for _ in 0..5 {
            clock.advance(Duration::from_secs(1));
            sched.tick(&long);
        }
        assert_eq!(sched.current_step(), 5);

        clock.advance(Duration::from_secs(1));
        assert_eq!(sched.tick(&[true, true, true, true]), Some(2));
    }

    #[test]
    fn stall_resyncs_instead_of_bursting() {
        let (mut sched, clock) = scheduler(60);
        let pattern = [true; 4];
        sched.tick(&pattern);

        clock.advance(Duration::from_secs(10));
        assert_eq!(sched.tick(&pattern), Some(1));
        // Resynced to now, so nothing is owed
        assert_eq!(sched.tick(&pattern), None);
        clock.advance(Duration::from_secs(1));
        assert_eq!(sched.tick(&pattern), Some(2));
    }

    #[test]
    fn no_drift_with_late_polls() {
        let (mut sched, clock) = scheduler(60);
        let pattern = [true; 4];
        sched.tick(&pattern);

        // Each poll lands 100ms late; the grid should stay on whole seconds
        clock.advance(Duration::from_millis(1100));
        assert_eq!(sched.tick(&pattern), Some(1));
        clock.advance(Duration::from_millis(900));
        assert_eq!(sched.tick(&pattern), Some(2));
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let (mut sched, clock) = scheduler(60);
        assert_eq!(sched.progress(), 0.0);

        sched.tick(&[true, true]);
        clock.advance(Duration::from_millis(250));
        assert!((sched.progress() - 0.25).abs() < 1e-9);

        clock.advance(Duration::from_secs(5));
        assert_eq!(sched.progress(), 1.0);
    }
}
