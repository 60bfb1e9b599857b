//! The drift-mode state machine: a timed scroll-to-bottom animation that
//! cedes control when it detects genuine user scrolling.
//!
//! The controller never reads the clock itself — every operation takes
//! `now` from the caller, so the event loop drives it with real time and
//! tests drive it with simulated time.

use std::time::{Duration, Instant};

use tracing::debug;

use super::easing::{ease_in_out_sine, lerp_offset, progress};

/// Tuning knobs for the drift animation and its interruption detector.
#[derive(Debug, Clone, Copy)]
pub struct DriftTuning {
    /// Full-traversal duration. Fixed — not scaled by distance.
    pub duration: Duration,
    /// Offset delta (rows) between two observed scroll events that counts
    /// as a deliberate user scroll.
    pub interrupt_threshold_rows: u64,
    /// Gap after which a previous scroll event no longer counts as part of
    /// an ongoing user gesture.
    pub quiet_window: Duration,
}

impl Default for DriftTuning {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(15_000),
            interrupt_threshold_rows: 50,
            quiet_window: Duration::from_millis(150),
        }
    }
}

/// One in-flight animation run. Exists only while drifting.
#[derive(Debug, Clone, Copy)]
struct ActiveAnimation {
    started: Instant,
    from: u64,
    to: u64,
    duration: Duration,
}

/// What a [`AutoScroll::tick`] wants the caller to do with the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing to animate this frame.
    Idle,
    /// Move the viewport to this row offset.
    MoveTo(u64),
    /// The run just reached its target; this is the final offset.
    Finished(u64),
}

/// Auto-scroll controller.
///
/// At most one animation is active at a time; starting a new run cancels
/// any prior one. Once the interruption detector fires, the run is over
/// for good — only a fresh `scroll_to_bottom` starts another.
#[derive(Debug)]
pub struct AutoScroll {
    tuning: DriftTuning,
    animation: Option<ActiveAnimation>,
    /// Terminal condition for the current run.
    user_scrolling: bool,
    /// Timestamp and offset of the last observed scroll event, compared
    /// pairwise against the next one. Reset when a run begins.
    last_event: Option<(Instant, u64)>,
}

impl AutoScroll {
    pub fn new(tuning: DriftTuning) -> Self {
        Self {
            tuning,
            animation: None,
            user_scrolling: false,
            last_event: None,
        }
    }

    /// True while an animation run is in flight.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.animation.is_some()
    }

    /// True once the current/most recent run was cancelled by the user.
    #[inline]
    pub fn interrupted(&self) -> bool {
        self.user_scrolling
    }

    /// Begin a run from `current` to `max_scroll` (the bottom). Cancels
    /// any prior run and resets the interruption tracker.
    ///
    /// `max_scroll == None` means the viewport metrics aren't known yet
    /// (nothing drawn, or nothing to scroll) — the call degrades to a
    /// no-op that leaves every flag untouched.
    pub fn scroll_to_bottom(&mut self, now: Instant, current: u64, max_scroll: Option<u64>) -> bool {
        let Some(max_scroll) = max_scroll else {
            debug!("drift requested but viewport metrics are unresolved; ignoring");
            return false;
        };

        self.stop();
        self.user_scrolling = false;
        self.last_event = None;

        if current >= max_scroll {
            debug!(current, max_scroll, "drift requested at the bottom; ignoring");
            return false;
        }

        self.animation = Some(ActiveAnimation {
            started: now,
            from: current,
            to: max_scroll,
            duration: self.tuning.duration,
        });
        debug!(from = current, to = max_scroll, "drift started");
        true
    }

    /// Cancel the in-flight run, if any. Idempotent.
    pub fn stop(&mut self) {
        self.animation = None;
    }

    /// Advance the animation to `now`. Call once per frame.
    pub fn tick(&mut self, now: Instant) -> Tick {
        // Cooperative cancellation: the interruption flag is checked before
        // any position is computed.
        if self.user_scrolling {
            self.stop();
            return Tick::Idle;
        }

        let Some(anim) = self.animation else {
            return Tick::Idle;
        };

        let t = progress(anim.started, now, anim.duration);
        if t >= 1.0 {
            self.animation = None;
            debug!(offset = anim.to, "drift finished");
            return Tick::Finished(anim.to);
        }

        Tick::MoveTo(lerp_offset(anim.from, anim.to, ease_in_out_sine(t)))
    }

    /// Feed an observed scroll event (wheel, drag, key scroll) at the
    /// viewport's resulting `offset`. Decides whether it was a deliberate
    /// user gesture and, if so, cancels the run.
    ///
    /// Does nothing unless a run is active.
    pub fn observe_scroll(&mut self, now: Instant, offset: u64) {
        if !self.is_active() {
            return;
        }

        if let Some((last_at, last_offset)) = self.last_event {
            if now.saturating_duration_since(last_at) > self.tuning.quiet_window {
                // Long pause since the previous event: whatever gesture was
                // in progress has ended.
                self.user_scrolling = false;
            }
            if offset.abs_diff(last_offset) > self.tuning.interrupt_threshold_rows {
                self.user_scrolling = true;
                debug!(offset, last_offset, "user scroll detected; drift cancelled");
                self.stop();
            }
        }

        self.last_event = Some((now, offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> AutoScroll {
        AutoScroll::new(DriftTuning::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn stop_is_idempotent_when_idle() {
        let mut drift = controller();
        drift.stop();
        drift.stop();
        assert!(!drift.is_active());
        assert!(!drift.interrupted());
        assert_eq!(drift.tick(Instant::now()), Tick::Idle);
    }

    #[test]
    fn missing_metrics_is_a_noop() {
        let mut drift = controller();
        assert!(!drift.scroll_to_bottom(Instant::now(), 0, None));
        assert!(!drift.is_active());
        assert_eq!(drift.tick(Instant::now()), Tick::Idle);
    }

    #[test]
    fn already_at_bottom_is_a_noop() {
        let mut drift = controller();
        assert!(!drift.scroll_to_bottom(Instant::now(), 200, Some(200)));
        assert!(!drift.is_active());
    }

    #[test]
    fn completes_at_exactly_max_scroll() {
        let mut drift = controller();
        let t0 = Instant::now();
        assert!(drift.scroll_to_bottom(t0, 0, Some(2000)));

        // A few intermediate frames never overshoot.
        for step in [1_000, 5_000, 10_000, 14_999] {
            match drift.tick(t0 + ms(step)) {
                Tick::MoveTo(offset) => assert!(offset <= 2000),
                other => panic!("expected MoveTo at {step}ms, got {other:?}"),
            }
        }

        assert_eq!(drift.tick(t0 + ms(15_000)), Tick::Finished(2000));
        assert!(!drift.is_active());
        assert_eq!(drift.tick(t0 + ms(15_100)), Tick::Idle);
    }

    #[test]
    fn temporal_midpoint_is_spatial_midpoint() {
        let mut drift = controller();
        let t0 = Instant::now();
        drift.scroll_to_bottom(t0, 0, Some(2000));

        match drift.tick(t0 + ms(7_500)) {
            Tick::MoveTo(offset) => {
                assert!((999..=1001).contains(&offset), "midpoint offset {offset}")
            }
            other => panic!("expected MoveTo, got {other:?}"),
        }
    }

    #[test]
    fn restart_follows_only_the_second_trajectory() {
        let mut drift = controller();
        let t0 = Instant::now();
        drift.scroll_to_bottom(t0, 0, Some(2000));
        drift.tick(t0 + ms(3_000));

        // Second run starts elsewhere; the first must not leak through.
        drift.scroll_to_bottom(t0 + ms(4_000), 500, Some(1000));
        assert!(drift.is_active());
        assert_eq!(
            drift.tick(t0 + ms(4_000) + ms(15_000)),
            Tick::Finished(1000)
        );
    }

    #[test]
    fn large_offset_jump_interrupts() {
        let mut drift = controller();
        let t0 = Instant::now();
        drift.scroll_to_bottom(t0, 0, Some(2000));

        // First event establishes the baseline, second one jumps 60 rows.
        drift.observe_scroll(t0 + ms(1_000), 130);
        drift.observe_scroll(t0 + ms(1_050), 190);

        assert!(drift.interrupted());
        assert!(!drift.is_active());
        // The animation must not move the viewport afterwards.
        assert_eq!(drift.tick(t0 + ms(2_000)), Tick::Idle);
        assert_eq!(drift.tick(t0 + ms(15_000)), Tick::Idle);
    }

    #[test]
    fn small_jitter_does_not_interrupt() {
        let mut drift = controller();
        let t0 = Instant::now();
        drift.scroll_to_bottom(t0, 0, Some(2000));

        drift.observe_scroll(t0 + ms(1_000), 130);
        drift.observe_scroll(t0 + ms(1_050), 160); // 30 rows < threshold

        assert!(!drift.interrupted());
        assert!(drift.is_active());
    }

    #[test]
    fn events_are_ignored_while_idle() {
        let mut drift = controller();
        let t0 = Instant::now();
        drift.observe_scroll(t0, 0);
        drift.observe_scroll(t0 + ms(10), 500);
        assert!(!drift.interrupted());
    }

    #[test]
    fn interruption_resets_on_next_run() {
        let mut drift = controller();
        let t0 = Instant::now();
        drift.scroll_to_bottom(t0, 0, Some(2000));
        drift.observe_scroll(t0 + ms(100), 0);
        drift.observe_scroll(t0 + ms(120), 100);
        assert!(drift.interrupted());

        assert!(drift.scroll_to_bottom(t0 + ms(5_000), 100, Some(2000)));
        assert!(!drift.interrupted());
        assert!(drift.is_active());
    }

    /// Full run: 3000 content rows in a 1000-row viewport, so the bottom
    /// sits at offset 2000. Halfway through the 15 s run the viewport is at
    /// the arithmetic midpoint; at the end it is at the bottom, idle.
    #[test]
    fn end_to_end_uninterrupted_run() {
        let mut drift = controller();
        let t0 = Instant::now();
        let max_scroll = 3000u64 - 1000;
        assert!(drift.scroll_to_bottom(t0, 0, Some(max_scroll)));

        let mut offset = 0u64;
        // 30 fps worth of frames up to the halfway mark.
        let mut now = t0;
        while now < t0 + ms(7_500) {
            now += ms(33);
            if let Tick::MoveTo(o) = drift.tick(now.min(t0 + ms(7_500))) {
                offset = o;
            }
        }
        if let Tick::MoveTo(o) = drift.tick(t0 + ms(7_500)) {
            offset = o;
        }
        assert!((999..=1001).contains(&offset), "offset at 50%: {offset}");

        assert_eq!(drift.tick(t0 + ms(15_000)), Tick::Finished(2000));
        assert!(!drift.is_active());
    }
}
