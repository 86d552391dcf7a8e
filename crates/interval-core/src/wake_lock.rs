//! Keep-awake collaborator.
//!
//! The engine only signals intent. [`WakeLockListener`] turns those signals
//! into calls on a platform [`WakeLock`], tracks whether a lock is held so
//! repeated signals are harmless, and ignores every failure.

use std::process::{Child, Command, Stdio};

use tracing::{debug, info};

use crate::error::WakeLockError;
use crate::events::{Event, WakeLockSignal};
use crate::scheduler::Listener;

pub trait WakeLock: Send {
    fn acquire(&mut self) -> Result<(), WakeLockError>;
    fn release(&mut self) -> Result<(), WakeLockError>;
}

/// Does nothing; for platforms without a keep-awake mechanism.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&mut self) -> Result<(), WakeLockError> {
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        Ok(())
    }
}

/// Holds a `systemd-inhibit` child process for as long as the lock is held.
#[derive(Debug)]
pub struct InhibitorWakeLock {
    program: String,
    child: Option<Child>,
}

impl InhibitorWakeLock {
    pub fn new() -> Self {
        Self::with_program("systemd-inhibit")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            child: None,
        }
    }

    pub fn is_held(&self) -> bool {
        self.child.is_some()
    }
}

impl Default for InhibitorWakeLock {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeLock for InhibitorWakeLock {
    fn acquire(&mut self) -> Result<(), WakeLockError> {
        if self.child.is_some() {
            return Ok(());
        }
        let mut child = Command::new(&self.program)
            .args([
                "--what=idle:sleep",
                "--who=interval-timer",
                "--why=Interval workout in progress",
                "--mode=block",
                "sleep",
                "infinity",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(status) = child.try_wait()? {
            return Err(WakeLockError::Denied(format!(
                "{} exited with {status}",
                self.program
            )));
        }
        info!(pid = child.id(), "keep-awake inhibitor started");
        self.child = Some(child);
        Ok(())
    }

    fn release(&mut self) -> Result<(), WakeLockError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        child
            .kill()
            .map_err(|e| WakeLockError::ReleaseFailed(e.to_string()))?;
        let _ = child.wait();
        info!("keep-awake inhibitor stopped");
        Ok(())
    }
}

impl Drop for InhibitorWakeLock {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Listener that forwards wake-lock signals to a [`WakeLock`].
pub struct WakeLockListener<W> {
    lock: W,
    held: bool,
}

impl<W: WakeLock> WakeLockListener<W> {
    pub fn new(lock: W) -> Self {
        Self { lock, held: false }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn lock(&self) -> &W {
        &self.lock
    }
}

impl<W: WakeLock> Listener for WakeLockListener<W> {
    fn on_event(&mut self, event: &Event) {
        match event.wake_lock_signal() {
            Some(WakeLockSignal::Acquire) if !self.held => match self.lock.acquire() {
                Ok(()) => self.held = true,
                Err(e) => debug!(error = %e, "keep-awake unavailable, continuing without it"),
            },
            Some(WakeLockSignal::Release) if self.held => {
                self.held = false;
                if let Err(e) = self.lock.release() {
                    debug!(error = %e, "keep-awake release failed");
                }
            }
            _ => {}
        }
    }
}
