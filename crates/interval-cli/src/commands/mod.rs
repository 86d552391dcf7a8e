pub mod config;
pub mod plan;
pub mod timer;

use clap::Args;
use interval_core::IntervalConfig;

/// Per-run overrides for the `[timer]` settings.
///
/// Values are read like form input: non-numeric or too-small values clamp
/// to the field minimum instead of failing.
#[derive(Args, Debug, Default)]
pub struct IntervalArgs {
    /// Work phase length in seconds
    #[arg(long)]
    pub work: Option<String>,
    /// Rest phase length in seconds
    #[arg(long)]
    pub pause: Option<String>,
    /// Countdown before each work phase in seconds (0 disables it)
    #[arg(long)]
    pub delay: Option<String>,
    /// Seconds before the end of a phase at which the warning cue plays
    #[arg(long)]
    pub warning: Option<String>,
    /// Number of work/rest cycles
    #[arg(long)]
    pub cycles: Option<String>,
}

impl IntervalArgs {
    pub fn apply(&self, base: IntervalConfig) -> IntervalConfig {
        let field = |arg: &Option<String>, current: u32| {
            arg.clone().unwrap_or_else(|| current.to_string())
        };
        IntervalConfig::from_text(
            &field(&self.work, base.work_secs()),
            &field(&self.pause, base.pause_secs()),
            &field(&self.delay, base.delay_start_secs()),
            &field(&self.warning, base.warning_secs()),
            &field(&self.cycles, base.cycles()),
        )
    }
}
