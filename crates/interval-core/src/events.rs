use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{IntervalConfig, Phase, TimerSnapshot};

/// Audible cue requested by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CueKind {
    /// Near the end of a phase, at `remaining == warning_secs`.
    Warning,
    /// Work or rest has just begun.
    PhaseStart,
    /// Last rest of the last cycle finished.
    Completion,
}

/// Keep-awake intent for the display collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WakeLockSignal {
    Acquire,
    Release,
}

/// Every state change in the timer produces one or more events.
///
/// Within a single intent or tick the events are ordered: `Configured`,
/// wake-lock `Acquire`, phase entry, cues, wake-lock `Release`, and
/// `StateChanged` last.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StateChanged {
        snapshot: TimerSnapshot,
        at: DateTime<Utc>,
    },
    PhaseEntered {
        phase: Phase,
        cycle: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    Cue {
        kind: CueKind,
        /// Mute state at the moment the cue fired, stamped by the scheduler.
        #[serde(default)]
        muted: bool,
        at: DateTime<Utc>,
    },
    WakeLock {
        signal: WakeLockSignal,
        at: DateTime<Utc>,
    },
    MuteChanged {
        muted: bool,
        at: DateTime<Utc>,
    },
    Configured {
        config: IntervalConfig,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn state_changed(snapshot: TimerSnapshot) -> Self {
        Event::StateChanged {
            snapshot,
            at: Utc::now(),
        }
    }

    pub fn cue(kind: CueKind) -> Self {
        Event::Cue {
            kind,
            muted: false,
            at: Utc::now(),
        }
    }

    pub fn wake_lock(signal: WakeLockSignal) -> Self {
        Event::WakeLock {
            signal,
            at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> Option<&TimerSnapshot> {
        match self {
            Event::StateChanged { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    pub fn cue_kind(&self) -> Option<CueKind> {
        match self {
            Event::Cue { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn wake_lock_signal(&self) -> Option<WakeLockSignal> {
        match self {
            Event::WakeLock { signal, .. } => Some(*signal),
            _ => None,
        }
    }
}
