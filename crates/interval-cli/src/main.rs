use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "interval-cli", version, about = "Interval workout timer")]
struct Cli {
    /// Settings file to read instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workout in the terminal
    Run(commands::timer::RunArgs),
    /// Print the phase plan a workout would follow
    Plan(commands::plan::PlanArgs),
    /// Inspect settings
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "interval_core=debug,interval_cli=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("INTERVAL_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run(args) => commands::timer::run(args, config),
        Commands::Plan(args) => commands::plan::run(args, config),
        Commands::Config { action } => commands::config::run(action, config),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "interval-cli",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
