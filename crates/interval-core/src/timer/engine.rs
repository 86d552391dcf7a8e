//! Phase engine implementation.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads or clocks; the caller invokes `tick()` once per second while the
//! timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> [DelayStart ->] Work -> Pause -> ... -> Complete
//!            ^______________________|  (while cycle < cycles)
//! ```
//!
//! Every command and tick returns the events it produced, in order. An empty
//! vector means nothing changed.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = IntervalEngine::new(IntervalConfig::default());
//! engine.start();
//! // Once per second:
//! for event in engine.tick() { /* dispatch */ }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::IntervalConfig;
use crate::events::{CueKind, Event, WakeLockSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    DelayStart,
    Work,
    Pause,
    Complete,
}

impl Phase {
    /// DelayStart, Work and Pause count down; Idle and Complete do not.
    pub fn is_counting(self) -> bool {
        matches!(self, Phase::DelayStart | Phase::Work | Phase::Pause)
    }
}

/// Immutable copy of the engine state handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining_secs: u32,
    pub current_cycle: u32,
    pub running: bool,
}

impl TimerSnapshot {
    pub const IDLE: TimerSnapshot = TimerSnapshot {
        phase: Phase::Idle,
        remaining_secs: 0,
        current_cycle: 1,
        running: false,
    };
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Core phase engine.
#[derive(Debug, Clone)]
pub struct IntervalEngine {
    config: IntervalConfig,
    phase: Phase,
    remaining_secs: u32,
    current_cycle: u32,
    running: bool,
}

impl IntervalEngine {
    /// Create an idle engine for `config`.
    pub fn new(config: IntervalConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            remaining_secs: 0,
            current_cycle: 1,
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            current_cycle: self.current_cycle,
            running: self.running,
        }
    }

    fn is_pristine(&self) -> bool {
        self.snapshot() == TimerSnapshot::IDLE
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start from Idle, resume a paused phase, or restart after Complete.
    pub fn start(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        if self.running {
            return out;
        }
        match self.phase {
            Phase::Idle | Phase::Complete => {
                if self.phase == Phase::Complete {
                    self.clear();
                }
                self.running = true;
                out.push(Event::wake_lock(WakeLockSignal::Acquire));
                self.enter_cycle(&mut out);
            }
            Phase::DelayStart | Phase::Work | Phase::Pause => {
                debug!(phase = ?self.phase, remaining = self.remaining_secs, "resuming");
                self.running = true;
                out.push(Event::wake_lock(WakeLockSignal::Acquire));
            }
        }
        out.push(Event::state_changed(self.snapshot()));
        out
    }

    /// Freeze the countdown. No-op unless a phase is running.
    pub fn pause(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        debug!(phase = ?self.phase, remaining = self.remaining_secs, "pausing");
        self.running = false;
        vec![
            Event::wake_lock(WakeLockSignal::Release),
            Event::state_changed(self.snapshot()),
        ]
    }

    /// Start/pause button semantics: pause when running, otherwise start.
    pub fn toggle(&mut self) -> Vec<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Back to Idle, cycle 1. No-op when already pristine.
    pub fn reset(&mut self) -> Vec<Event> {
        if self.is_pristine() {
            return Vec::new();
        }
        debug!(phase = ?self.phase, cycle = self.current_cycle, "resetting");
        self.clear();
        vec![
            Event::wake_lock(WakeLockSignal::Release),
            Event::state_changed(self.snapshot()),
        ]
    }

    /// Replace the configuration. Always returns the engine to Idle.
    pub fn configure(&mut self, config: IntervalConfig) -> Vec<Event> {
        let mut out = self.reset();
        self.config = config;
        let at = chrono::Utc::now();
        out.insert(0, Event::Configured { config, at });
        if out.len() == 1 {
            out.push(Event::state_changed(self.snapshot()));
        }
        out
    }

    /// Advance one second.
    ///
    /// The warning cue is checked before the decrement, and a phase that
    /// reaches zero transitions within this same call, so no snapshot with
    /// a running phase at zero is ever published.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.running || !self.phase.is_counting() {
            return Vec::new();
        }
        debug_assert!(self.remaining_secs > 0, "counting phase at zero");

        let mut out = Vec::new();
        if self.remaining_secs == self.config.warning_secs() {
            out.push(Event::cue(CueKind::Warning));
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.transition(&mut out);
        }
        out.push(Event::state_changed(self.snapshot()));
        out
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn clear(&mut self) {
        self.phase = Phase::Idle;
        self.remaining_secs = 0;
        self.current_cycle = 1;
        self.running = false;
    }

    /// The single place where an exhausted phase moves on.
    fn transition(&mut self, out: &mut Vec<Event>) {
        match self.phase {
            Phase::DelayStart => self.enter(Phase::Work, out),
            Phase::Work => self.enter(Phase::Pause, out),
            Phase::Pause if self.current_cycle < self.config.cycles() => {
                self.current_cycle += 1;
                self.enter_cycle(out);
            }
            Phase::Pause => {
                debug!(cycles = self.config.cycles(), "workout complete");
                self.phase = Phase::Complete;
                self.remaining_secs = 0;
                self.running = false;
                out.push(Event::PhaseEntered {
                    phase: Phase::Complete,
                    cycle: self.current_cycle,
                    duration_secs: 0,
                    at: chrono::Utc::now(),
                });
                out.push(Event::cue(CueKind::Completion));
                out.push(Event::wake_lock(WakeLockSignal::Release));
            }
            Phase::Idle | Phase::Complete => {
                debug_assert!(false, "transition from non-counting phase {:?}", self.phase);
            }
        }
    }

    /// First phase of a cycle: the start delay if configured, else work.
    fn enter_cycle(&mut self, out: &mut Vec<Event>) {
        if self.config.delay_start_secs() > 0 {
            self.enter(Phase::DelayStart, out);
        } else {
            self.enter(Phase::Work, out);
        }
    }

    fn enter(&mut self, phase: Phase, out: &mut Vec<Event>) {
        let duration = match phase {
            Phase::DelayStart => self.config.delay_start_secs(),
            Phase::Work => self.config.work_secs(),
            Phase::Pause => self.config.pause_secs(),
            Phase::Idle | Phase::Complete => 0,
        };
        debug!(?phase, cycle = self.current_cycle, duration, "entering phase");
        self.phase = phase;
        self.remaining_secs = duration;
        out.push(Event::PhaseEntered {
            phase,
            cycle: self.current_cycle,
            duration_secs: duration,
            at: chrono::Utc::now(),
        });
        if matches!(phase, Phase::Work | Phase::Pause) {
            out.push(Event::cue(CueKind::PhaseStart));
        }
    }
}

impl Default for IntervalEngine {
    fn default() -> Self {
        Self::new(IntervalConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues(events: &[Event]) -> Vec<CueKind> {
        events.iter().filter_map(Event::cue_kind).collect()
    }

    fn signals(events: &[Event]) -> Vec<WakeLockSignal> {
        events.iter().filter_map(Event::wake_lock_signal).collect()
    }

    #[test]
    fn starts_idle() {
        let engine = IntervalEngine::default();
        assert_eq!(engine.snapshot(), TimerSnapshot::IDLE);
    }

    #[test]
    fn start_without_delay_enters_work_with_cue() {
        let mut engine = IntervalEngine::new(IntervalConfig::new(20, 10, 0, 3, 2));
        let events = engine.start();
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.remaining_secs(), 20);
        assert!(engine.is_running());
        assert_eq!(cues(&events), vec![CueKind::PhaseStart]);
        assert_eq!(signals(&events), vec![WakeLockSignal::Acquire]);
        assert!(events.last().and_then(Event::snapshot).is_some());
    }

    #[test]
    fn events_within_one_action_keep_their_order() {
        fn kind(e: &Event) -> &'static str {
            match e {
                Event::Configured { .. } => "configured",
                Event::WakeLock { signal: WakeLockSignal::Acquire, .. } => "acquire",
                Event::WakeLock { signal: WakeLockSignal::Release, .. } => "release",
                Event::PhaseEntered { .. } => "entered",
                Event::Cue { .. } => "cue",
                Event::StateChanged { .. } => "state",
                Event::MuteChanged { .. } => "mute",
            }
        }
        let mut engine = IntervalEngine::new(IntervalConfig::new(20, 10, 0, 3, 2));
        let started: Vec<_> = engine.start().iter().map(kind).collect();
        assert_eq!(started, vec!["acquire", "entered", "cue", "state"]);

        let configured: Vec<_> = engine
            .configure(IntervalConfig::default())
            .iter()
            .map(kind)
            .collect();
        assert_eq!(configured, vec!["configured", "release", "state"]);
    }

    #[test]
    fn start_with_delay_enters_delay_silently() {
        let mut engine = IntervalEngine::new(IntervalConfig::new(20, 10, 4, 3, 2));
        let events = engine.start();
        assert_eq!(engine.phase(), Phase::DelayStart);
        assert_eq!(engine.remaining_secs(), 4);
        assert!(cues(&events).is_empty());
    }

    #[test]
    fn delay_runs_into_work() {
        let mut engine = IntervalEngine::new(IntervalConfig::new(20, 10, 4, 3, 2));
        engine.start();
        for _ in 0..4 {
            engine.tick();
        }
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.remaining_secs(), 20);
    }

    #[test]
    fn zero_is_never_published_while_counting() {
        let mut engine = IntervalEngine::new(IntervalConfig::new(2, 2, 0, 1, 1));
        engine.start();
        while engine.phase() != Phase::Complete {
            for ev in engine.tick() {
                if let Some(s) = ev.snapshot() {
                    assert!(!(s.phase.is_counting() && s.remaining_secs == 0));
                }
            }
        }
    }

    #[test]
    fn warning_fires_before_decrement() {
        let mut engine = IntervalEngine::new(IntervalConfig::new(5, 5, 0, 3, 1));
        engine.start();
        assert!(cues(&engine.tick()).is_empty()); // 5 -> 4
        assert!(cues(&engine.tick()).is_empty()); // 4 -> 3
        assert_eq!(cues(&engine.tick()), vec![CueKind::Warning]); // 3 -> 2
        assert_eq!(engine.remaining_secs(), 2);
    }

    #[test]
    fn final_pause_completes_and_releases() {
        let mut engine = IntervalEngine::new(IntervalConfig::new(1, 1, 0, 5, 1));
        engine.start();
        engine.tick();
        assert_eq!(engine.phase(), Phase::Pause);
        let events = engine.tick();
        assert_eq!(engine.phase(), Phase::Complete);
        assert!(!engine.is_running());
        assert_eq!(cues(&events), vec![CueKind::Completion]);
        assert_eq!(signals(&events), vec![WakeLockSignal::Release]);
        assert!(engine.tick().is_empty());
    }

    #[test]
    fn pause_then_resume_keeps_remaining() {
        let mut engine = IntervalEngine::new(IntervalConfig::new(10, 5, 0, 3, 1));
        engine.start();
        engine.tick();
        let events = engine.pause();
        assert_eq!(signals(&events), vec![WakeLockSignal::Release]);
        assert!(engine.tick().is_empty());
        assert_eq!(engine.remaining_secs(), 9);

        let events = engine.start();
        assert_eq!(signals(&events), vec![WakeLockSignal::Acquire]);
        assert!(cues(&events).is_empty());
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.remaining_secs(), 9);
    }

    #[test]
    fn repeated_pause_and_reset_are_silent() {
        let mut engine = IntervalEngine::default();
        assert!(engine.reset().is_empty());
        assert!(engine.pause().is_empty());
        engine.start();
        assert!(!engine.pause().is_empty());
        assert!(engine.pause().is_empty());
        assert!(!engine.reset().is_empty());
        assert!(engine.reset().is_empty());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut engine = IntervalEngine::new(IntervalConfig::new(1, 1, 0, 1, 3));
        engine.start();
        engine.tick();
        engine.tick();
        assert_eq!(engine.current_cycle(), 2);
        engine.reset();
        assert_eq!(engine.snapshot(), TimerSnapshot::IDLE);
    }

    #[test]
    fn start_after_complete_restarts() {
        let mut engine = IntervalEngine::new(IntervalConfig::new(1, 1, 0, 1, 2));
        engine.start();
        for _ in 0..4 {
            engine.tick();
        }
        assert_eq!(engine.phase(), Phase::Complete);
        assert_eq!(engine.current_cycle(), 2);

        engine.toggle();
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.current_cycle(), 1);
        assert!(engine.is_running());
    }

    #[test]
    fn configure_resets_and_reports() {
        let mut engine = IntervalEngine::default();
        engine.start();
        let cfg = IntervalConfig::new(40, 20, 0, 5, 4);
        let events = engine.configure(cfg);
        assert!(matches!(events.first(), Some(Event::Configured { .. })));
        assert_eq!(engine.snapshot(), TimerSnapshot::IDLE);
        assert_eq!(engine.config(), &cfg);

        let events = engine.configure(IntervalConfig::default());
        assert_eq!(events.len(), 2);
        assert!(signals(&events).is_empty());
    }
}
