//! Presentation values derived from a snapshot and its configuration.
//!
//! Everything here is a pure function. `previewing` is true while a settings
//! form is open over an idle timer; in that case the work duration is shown
//! as a preview instead of the idle readout.

use serde::Serialize;

use super::config::IntervalConfig;
use super::engine::{Phase, TimerSnapshot};

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Full length of the phase the snapshot is in; 0 for Idle and Complete.
pub fn phase_total_secs(phase: Phase, config: &IntervalConfig) -> u32 {
    match phase {
        Phase::DelayStart => config.delay_start_secs(),
        Phase::Work => config.work_secs(),
        Phase::Pause => config.pause_secs(),
        Phase::Idle | Phase::Complete => 0,
    }
}

pub fn display_time(snapshot: &TimerSnapshot, config: &IntervalConfig, previewing: bool) -> u32 {
    if previewing && snapshot.phase == Phase::Idle {
        config.work_secs()
    } else {
        snapshot.remaining_secs
    }
}

/// Elapsed share of the current phase in `0.0..=1.0`.
pub fn progress_fraction(snapshot: &TimerSnapshot, config: &IntervalConfig) -> f64 {
    let total = phase_total_secs(snapshot.phase, config);
    if total == 0 {
        return 0.0;
    }
    let remaining = snapshot.remaining_secs.min(total);
    f64::from(total - remaining) / f64::from(total)
}

pub fn phase_label(phase: Phase, previewing: bool) -> &'static str {
    if previewing && phase == Phase::Idle {
        return "Work Preview";
    }
    match phase {
        Phase::Idle => "Ready",
        Phase::DelayStart => "Get Ready",
        Phase::Work => "Work",
        Phase::Pause => "Rest",
        Phase::Complete => "Complete",
    }
}

/// Hex color token for the phase accent.
pub fn phase_color_token(phase: Phase, previewing: bool) -> &'static str {
    if previewing && phase == Phase::Idle {
        return "#ef4444";
    }
    match phase {
        Phase::DelayStart => "#f59e0b",
        Phase::Work => "#ef4444",
        Phase::Pause => "#3b82f6",
        Phase::Complete => "#10b981",
        Phase::Idle => "#6b7280",
    }
}

/// "Cycle 2 of 3" while counting, "Will run 3 cycles" in preview.
pub fn cycle_caption(
    snapshot: &TimerSnapshot,
    config: &IntervalConfig,
    previewing: bool,
) -> Option<String> {
    if previewing && snapshot.phase == Phase::Idle {
        let n = config.cycles();
        let plural = if n == 1 { "" } else { "s" };
        return Some(format!("Will run {n} cycle{plural}"));
    }
    if snapshot.phase.is_counting() {
        return Some(format!(
            "Cycle {} of {}",
            snapshot.current_cycle,
            config.cycles()
        ));
    }
    None
}

pub fn status_message(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::DelayStart => Some("Get ready for your work period!"),
        Phase::Work => Some("Focus on your exercise!"),
        Phase::Pause => Some("Take a rest. Next cycle starts soon."),
        Phase::Complete => Some("Workout complete! Great job!"),
        Phase::Idle => None,
    }
}

/// Label for the primary button.
pub fn primary_action(snapshot: &TimerSnapshot) -> &'static str {
    if snapshot.running {
        "Pause"
    } else if snapshot.phase == Phase::Complete {
        "Restart"
    } else {
        "Start"
    }
}

/// All presentation values for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub time_text: String,
    pub progress: f64,
    pub label: &'static str,
    pub color: &'static str,
    pub caption: Option<String>,
    pub status: Option<&'static str>,
    pub primary_action: &'static str,
}

impl Presentation {
    pub fn from_state(snapshot: &TimerSnapshot, config: &IntervalConfig, settings_open: bool) -> Self {
        let previewing = settings_open && snapshot.phase == Phase::Idle;
        Self {
            time_text: format_clock(display_time(snapshot, config, previewing)),
            progress: progress_fraction(snapshot, config),
            label: phase_label(snapshot.phase, previewing),
            color: phase_color_token(snapshot.phase, previewing),
            caption: cycle_caption(snapshot, config, previewing),
            status: status_message(snapshot.phase),
            primary_action: primary_action(snapshot),
        }
    }
}
