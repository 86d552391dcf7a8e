use std::path::Path;

use clap::Args;
use interval_core::timer::display::{format_clock, phase_label};
use interval_core::{PhasePlan, Settings};

use super::IntervalArgs;

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub interval: IntervalArgs,
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PlanArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(config_path)?;
    let config = args.interval.apply(settings.timer);
    let plan = PhasePlan::for_config(config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for segment in &plan.segments {
        if !segment.phase.is_counting() {
            continue;
        }
        println!(
            "{}  cycle {}  {:<9} {}",
            format_clock(u32::try_from(segment.starts_at_secs).unwrap_or(u32::MAX)),
            segment.cycle,
            phase_label(segment.phase, false),
            format_clock(segment.duration_secs),
        );
    }
    println!(
        "total {}",
        format_clock(u32::try_from(plan.total_secs).unwrap_or(u32::MAX))
    );
    Ok(())
}
