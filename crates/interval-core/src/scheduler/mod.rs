//! Phase scheduler.
//!
//! Wraps the [`IntervalEngine`] with the pieces a front end needs:
//! - Listener registration; every event the engine emits is fanned out
//! - The mute flag, stamped on every cue so the cue collaborator can honour it
//! - Settings-form bookkeeping (opening pauses, saving reconfigures)
//!
//! The scheduler is the only owner of timer state. Observers see copies.

mod driver;

pub use driver::{Intent, TickDriver, TimerHandle, TICK_PERIOD};

use tracing::trace;

use crate::events::Event;
use crate::timer::{IntervalConfig, IntervalEngine, Presentation, TimerSnapshot};

/// Receives every event the scheduler publishes.
pub trait Listener: Send {
    fn on_event(&mut self, event: &Event);
}

impl<F> Listener for F
where
    F: FnMut(&Event) + Send,
{
    fn on_event(&mut self, event: &Event) {
        self(event)
    }
}

/// Handle returned by [`Scheduler::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct Scheduler {
    engine: IntervalEngine,
    muted: bool,
    settings_open: bool,
    listeners: Vec<(ListenerId, Box<dyn Listener>)>,
    next_listener: u64,
}

impl Scheduler {
    pub fn new(config: IntervalConfig) -> Self {
        Self {
            engine: IntervalEngine::new(config),
            muted: false,
            settings_open: false,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: Listener + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    pub fn config(&self) -> &IntervalConfig {
        self.engine.config()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn presentation(&self) -> Presentation {
        Presentation::from_state(&self.snapshot(), self.config(), self.settings_open)
    }

    // ── Intents ──────────────────────────────────────────────────────
    //
    // Each returns whether anything was published.

    pub fn start(&mut self) -> bool {
        let events = self.engine.start();
        self.publish(events)
    }

    pub fn pause(&mut self) -> bool {
        let events = self.engine.pause();
        self.publish(events)
    }

    pub fn toggle(&mut self) -> bool {
        let events = self.engine.toggle();
        self.publish(events)
    }

    pub fn reset(&mut self) -> bool {
        let events = self.engine.reset();
        self.publish(events)
    }

    pub fn tick(&mut self) -> bool {
        let events = self.engine.tick();
        self.publish(events)
    }

    /// Apply a new configuration; the timer returns to Idle.
    pub fn configure(&mut self, config: IntervalConfig) -> bool {
        let events = self.engine.configure(config);
        self.publish(events)
    }

    pub fn set_muted(&mut self, muted: bool) -> bool {
        if self.muted == muted {
            return false;
        }
        self.muted = muted;
        self.publish(vec![Event::MuteChanged {
            muted,
            at: chrono::Utc::now(),
        }])
    }

    /// The settings form is shown; a running timer is paused.
    pub fn open_settings(&mut self) -> bool {
        self.settings_open = true;
        self.pause()
    }

    /// The settings form is dismissed without saving; the timer stays as is.
    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    /// The settings form is saved: close it and reconfigure.
    pub fn save_settings(&mut self, config: IntervalConfig) -> bool {
        self.settings_open = false;
        self.configure(config)
    }

    fn publish(&mut self, mut events: Vec<Event>) -> bool {
        for event in &mut events {
            if let Event::Cue { muted, .. } = event {
                *muted = self.muted;
            }
            trace!(?event, "publishing");
            for (_, listener) in &mut self.listeners {
                listener.on_event(event);
            }
        }
        !events.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(IntervalConfig::default())
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("engine", &self.engine)
            .field("muted", &self.muted)
            .field("settings_open", &self.settings_open)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
