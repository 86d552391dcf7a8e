use std::io::Write;
use std::path::Path;

use clap::Args;
use interval_core::{
    CueDispatcher, Event, InhibitorWakeLock, IntervalConfig, Listener, NoopWakeLock, Phase,
    Presentation, Scheduler, Settings, TerminalBell, TickDriver, TimerHandle, TimerSnapshot,
    WakeLockListener,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use super::IntervalArgs;

const BAR_WIDTH: usize = 20;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub interval: IntervalArgs,
    /// Start with cues muted
    #[arg(long)]
    pub mute: bool,
    /// Do not hold a keep-awake inhibitor while running
    #[arg(long)]
    pub no_keep_awake: bool,
    /// Print every event as a JSON line instead of the status line
    #[arg(long)]
    pub json: bool,
    /// Keep accepting commands after the workout completes
    #[arg(long)]
    pub stay: bool,
}

/// Status-line renderer.
struct TerminalRenderer<W> {
    out: W,
    config: IntervalConfig,
    last_phase: Phase,
}

impl<W: Write + Send> Listener for TerminalRenderer<W> {
    fn on_event(&mut self, event: &Event) {
        match event {
            Event::Configured { config, .. } => self.config = *config,
            Event::MuteChanged { muted, .. } => {
                let _ = writeln!(self.out, "\n[{}]", if *muted { "muted" } else { "sound on" });
            }
            Event::StateChanged { snapshot, .. } => {
                if snapshot.phase != self.last_phase {
                    let _ = writeln!(self.out);
                    self.last_phase = snapshot.phase;
                }
                let view = Presentation::from_state(snapshot, &self.config, false);
                let _ = write!(self.out, "\r{}", status_line(&view, snapshot));
                let _ = self.out.flush();
            }
            _ => {}
        }
    }
}

/// One event per line, for scripting.
struct JsonLines<W> {
    out: W,
}

impl<W: Write + Send> Listener for JsonLines<W> {
    fn on_event(&mut self, event: &Event) {
        match serde_json::to_string(event) {
            Ok(line) => {
                let _ = writeln!(self.out, "{line}");
            }
            Err(e) => warn!(error = %e, "failed to encode event"),
        }
    }
}

fn status_line(view: &Presentation, snapshot: &TimerSnapshot) -> String {
    let filled = (view.progress * BAR_WIDTH as f64).round() as usize;
    let bar: String = (0..BAR_WIDTH)
        .map(|i| if i < filled.min(BAR_WIDTH) { '#' } else { '.' })
        .collect();
    let mut line = format!("{} {:<8} [{bar}]", view.time_text, view.label);
    if let Some(caption) = &view.caption {
        line.push_str("  ");
        line.push_str(caption);
    }
    if !snapshot.running && snapshot.phase.is_counting() {
        line.push_str("  (paused)");
    }
    if let Some(status) = view.status {
        line.push_str("  ");
        line.push_str(status);
    }
    // Pad so a shorter line fully overwrites the previous one.
    format!("{line:<100}")
}

pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(config_path)?;
    let config = args.interval.apply(settings.timer);
    let muted = args.mute || settings.audio.muted;
    let keep_awake = settings.power.keep_awake && !args.no_keep_awake;
    debug!(?config, muted, keep_awake, "starting workout");

    let mut scheduler = Scheduler::new(config);
    scheduler.set_muted(muted);
    if args.json {
        scheduler.subscribe(JsonLines {
            out: std::io::stdout(),
        });
    } else {
        scheduler.subscribe(TerminalRenderer {
            out: std::io::stdout(),
            config,
            last_phase: Phase::Idle,
        });
        println!("p/enter: start-pause  r: reset  m: mute  q: quit");
    }
    scheduler.subscribe(CueDispatcher::new(TerminalBell::stderr()));
    if keep_awake {
        scheduler.subscribe(WakeLockListener::new(InhibitorWakeLock::new()));
    } else {
        scheduler.subscribe(WakeLockListener::new(NoopWakeLock));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(async {
        let (handle, driver) = TickDriver::new(scheduler);
        let task = tokio::spawn(driver.run());
        let outcome = drive(&handle, muted, args.stay).await;
        let _ = handle.shutdown().await;
        let _ = task.await;
        outcome
    });
    // Stdin is read on a blocking thread that cannot be interrupted.
    runtime.shutdown_background();
    if !args.json {
        println!();
    }
    result.map_err(Into::into)
}

async fn drive(
    handle: &TimerHandle,
    mut muted: bool,
    stay: bool,
) -> Result<(), interval_core::CoreError> {
    let mut state = handle.watch();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    handle.start().await?;
    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let phase = state.borrow_and_update().phase;
                if phase == Phase::Complete && !stay {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(cmd)) => match cmd.trim() {
                        "" | "p" => {
                            handle.toggle().await?;
                        }
                        "r" => {
                            handle.reset().await?;
                        }
                        "m" => {
                            muted = !muted;
                            handle.set_muted(muted).await?;
                        }
                        "q" => break,
                        other => warn!(command = other, "unknown command"),
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        debug!(error = %e, "stdin closed");
                        stdin_open = false;
                    }
                }
            }
        }
    }
    Ok(())
}
