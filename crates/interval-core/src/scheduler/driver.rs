//! One-second tick source for a [`Scheduler`].
//!
//! The driver owns the scheduler on a single task and `select!`s between
//! incoming intents and a tokio interval. The interval exists only while the
//! timer is running: it is armed (first tick one full period later) when
//! `running` turns true and dropped in the same loop turn that `running`
//! turns false, before the intent is acknowledged. A caller awaiting
//! `pause()` or `reset()` therefore never sees a trailing tick.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use super::Scheduler;
use crate::error::{CoreError, Result};
use crate::timer::{IntervalConfig, TimerSnapshot};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// User intents forwarded from a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
    Toggle,
    Reset,
    Configure(IntervalConfig),
    SetMuted(bool),
    OpenSettings,
    CloseSettings,
    SaveSettings(IntervalConfig),
    Shutdown,
}

struct Request {
    intent: Intent,
    reply: oneshot::Sender<TimerSnapshot>,
}

/// Cloneable sender side of a running [`TickDriver`].
#[derive(Clone)]
pub struct TimerHandle {
    tx: mpsc::UnboundedSender<Request>,
    state: watch::Receiver<TimerSnapshot>,
}

impl TimerHandle {
    /// Deliver `intent` and wait until the driver has applied it.
    pub async fn send(&self, intent: Intent) -> Result<TimerSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request { intent, reply })
            .map_err(|_| CoreError::DriverClosed)?;
        rx.await.map_err(|_| CoreError::DriverClosed)
    }

    pub async fn start(&self) -> Result<TimerSnapshot> {
        self.send(Intent::Start).await
    }

    pub async fn pause(&self) -> Result<TimerSnapshot> {
        self.send(Intent::Pause).await
    }

    pub async fn toggle(&self) -> Result<TimerSnapshot> {
        self.send(Intent::Toggle).await
    }

    pub async fn reset(&self) -> Result<TimerSnapshot> {
        self.send(Intent::Reset).await
    }

    pub async fn configure(&self, config: IntervalConfig) -> Result<TimerSnapshot> {
        self.send(Intent::Configure(config)).await
    }

    pub async fn set_muted(&self, muted: bool) -> Result<TimerSnapshot> {
        self.send(Intent::SetMuted(muted)).await
    }

    pub async fn open_settings(&self) -> Result<TimerSnapshot> {
        self.send(Intent::OpenSettings).await
    }

    pub async fn close_settings(&self) -> Result<TimerSnapshot> {
        self.send(Intent::CloseSettings).await
    }

    pub async fn save_settings(&self, config: IntervalConfig) -> Result<TimerSnapshot> {
        self.send(Intent::SaveSettings(config)).await
    }

    /// Stop the driver. A running timer is paused first so keep-awake is released.
    pub async fn shutdown(&self) -> Result<TimerSnapshot> {
        self.send(Intent::Shutdown).await
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        *self.state.borrow()
    }

    /// Receiver that wakes on every published snapshot.
    pub fn watch(&self) -> watch::Receiver<TimerSnapshot> {
        self.state.clone()
    }
}

pub struct TickDriver {
    scheduler: Scheduler,
    rx: mpsc::UnboundedReceiver<Request>,
    state: watch::Sender<TimerSnapshot>,
    period: Duration,
}

impl TickDriver {
    pub fn new(scheduler: Scheduler) -> (TimerHandle, TickDriver) {
        Self::with_period(scheduler, TICK_PERIOD)
    }

    pub fn with_period(scheduler: Scheduler, period: Duration) -> (TimerHandle, TickDriver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state, state_rx) = watch::channel(scheduler.snapshot());
        let handle = TimerHandle {
            tx,
            state: state_rx,
        };
        let driver = TickDriver {
            scheduler,
            rx,
            state,
            period,
        };
        (handle, driver)
    }

    /// Run until shutdown or until every handle is dropped.
    ///
    /// Returns the scheduler so its final state can be inspected.
    pub async fn run(mut self) -> Scheduler {
        let mut ticker: Option<Interval> = None;
        loop {
            tokio::select! {
                biased;
                request = self.rx.recv() => {
                    let Some(Request { intent, reply }) = request else {
                        self.scheduler.pause();
                        break;
                    };
                    if intent == Intent::Shutdown {
                        self.scheduler.pause();
                        let _ = reply.send(self.publish());
                        break;
                    }
                    self.apply(intent);
                    self.sync_ticker(&mut ticker);
                    let _ = reply.send(self.publish());
                }
                _ = next_tick(&mut ticker), if ticker.is_some() => {
                    self.scheduler.tick();
                    self.sync_ticker(&mut ticker);
                    self.publish();
                }
            }
        }
        debug!("tick driver stopped");
        self.scheduler
    }

    fn apply(&mut self, intent: Intent) {
        debug!(?intent, "applying intent");
        match intent {
            Intent::Start => {
                self.scheduler.start();
            }
            Intent::Pause => {
                self.scheduler.pause();
            }
            Intent::Toggle => {
                self.scheduler.toggle();
            }
            Intent::Reset => {
                self.scheduler.reset();
            }
            Intent::Configure(config) => {
                self.scheduler.configure(config);
            }
            Intent::SetMuted(muted) => {
                self.scheduler.set_muted(muted);
            }
            Intent::OpenSettings => {
                self.scheduler.open_settings();
            }
            Intent::CloseSettings => self.scheduler.close_settings(),
            Intent::SaveSettings(config) => {
                self.scheduler.save_settings(config);
            }
            Intent::Shutdown => {}
        }
    }

    fn sync_ticker(&self, ticker: &mut Option<Interval>) {
        let running = self.scheduler.snapshot().running;
        match (running, ticker.is_some()) {
            (true, false) => {
                let mut interval = interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                *ticker = Some(interval);
            }
            (false, true) => *ticker = None,
            _ => {}
        }
    }

    fn publish(&self) -> TimerSnapshot {
        let snapshot = self.scheduler.snapshot();
        self.state.send_replace(snapshot);
        snapshot
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
