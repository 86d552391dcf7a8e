//! # Interval Timer Core Library
//!
//! This library provides the core logic of a phase-based interval workout
//! timer: an optional start delay, a work phase and a rest phase, repeated
//! for a configured number of cycles, with audio cues at phase boundaries
//! and a warning cue shortly before each phase ends.
//!
//! ## Architecture
//!
//! - **Phase Engine**: a tick-driven state machine; every command returns the
//!   events it produced
//! - **Scheduler**: owns the engine, fans events out to listeners, tracks the
//!   mute flag and the settings form
//! - **Tick Driver**: a tokio task that feeds the scheduler one tick per
//!   second and cancels ticking synchronously on pause/reset
//! - **Collaborators**: cue playback and keep-awake, both driven by events
//!   and both tolerant of platform failures
//!
//! ## Key Components
//!
//! - [`IntervalEngine`]: Core phase state machine
//! - [`Scheduler`]: Listener plumbing around the engine
//! - [`TickDriver`] / [`TimerHandle`]: Async tick source and intent channel
//! - [`Settings`]: Read-only TOML settings

pub mod cues;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod simulation;
pub mod storage;
pub mod timer;
pub mod wake_lock;

pub use cues::{CueDispatcher, CuePlayer, SilentPlayer, TerminalBell, Tone};
pub use error::{ConfigError, CoreError, CueError, Result, WakeLockError};
pub use events::{CueKind, Event, WakeLockSignal};
pub use scheduler::{Intent, Listener, ListenerId, Scheduler, TickDriver, TimerHandle};
pub use simulation::PhasePlan;
pub use storage::Settings;
pub use timer::{IntervalConfig, IntervalEngine, Phase, Presentation, TimerSnapshot};
pub use wake_lock::{InhibitorWakeLock, NoopWakeLock, WakeLock, WakeLockListener};
