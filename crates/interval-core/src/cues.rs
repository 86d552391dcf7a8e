//! Audible cues.
//!
//! The engine emits [`CueKind`] events unconditionally and the scheduler
//! stamps each one with the mute state. [`CueDispatcher`] drops muted cues
//! and hands the tone pattern of the rest to a [`CuePlayer`]. Playback
//! errors are logged and never reach the timer.

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CueError;
use crate::events::{CueKind, Event};
use crate::scheduler::Listener;

/// One sine beep within a cue pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    /// Delay from the start of the pattern.
    pub offset_ms: u32,
    pub gain: f32,
}

impl Tone {
    const fn beep(frequency_hz: u32, offset_ms: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms: 100,
            offset_ms,
            gain: 0.5,
        }
    }
}

const PHASE_START: [Tone; 1] = [Tone::beep(800, 0)];
const WARNING: [Tone; 1] = [Tone::beep(700, 0)];
const COMPLETION: [Tone; 2] = [Tone::beep(880, 0), Tone::beep(880, 150)];

impl CueKind {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            CueKind::PhaseStart => &PHASE_START,
            CueKind::Warning => &WARNING,
            CueKind::Completion => &COMPLETION,
        }
    }
}

/// Something that can make noise.
pub trait CuePlayer: Send {
    fn play(&mut self, kind: CueKind, tones: &[Tone]) -> Result<(), CueError>;
}

/// Listener that turns cue events into playback.
pub struct CueDispatcher<P> {
    player: P,
}

impl<P: CuePlayer> CueDispatcher<P> {
    pub fn new(player: P) -> Self {
        Self { player }
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

impl<P: CuePlayer> Listener for CueDispatcher<P> {
    fn on_event(&mut self, event: &Event) {
        match event {
            Event::Cue { kind, muted: true, .. } => {
                debug!(?kind, "cue suppressed while muted");
            }
            Event::Cue { kind, .. } => {
                if let Err(e) = self.player.play(*kind, kind.tones()) {
                    warn!(?kind, error = %e, "cue playback failed");
                }
            }
            _ => {}
        }
    }
}

/// Rings the terminal bell once per tone.
///
/// Tones after the first are spaced by their `offset_ms`, blocking the
/// caller for the length of the pattern.
pub struct TerminalBell<W> {
    out: W,
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl TerminalBell<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> CuePlayer for TerminalBell<W> {
    fn play(&mut self, _kind: CueKind, tones: &[Tone]) -> Result<(), CueError> {
        let mut elapsed_ms = 0;
        for tone in tones {
            if tone.offset_ms > elapsed_ms {
                std::thread::sleep(Duration::from_millis(u64::from(tone.offset_ms - elapsed_ms)));
                elapsed_ms = tone.offset_ms;
            }
            self.out.write_all(b"\x07")?;
            self.out.flush()?;
        }
        Ok(())
    }
}

/// Player used when no audio output is wanted at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&mut self, _kind: CueKind, _tones: &[Tone]) -> Result<(), CueError> {
        Ok(())
    }
}
