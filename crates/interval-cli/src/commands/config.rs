use std::path::Path;

use clap::Subcommand;
use interval_core::timer::PRESETS;
use interval_core::Settings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Dot-separated key (e.g. "timer.work_secs", "audio.muted")
        key: String,
    },
    /// Show the effective settings as TOML
    Show,
    /// Print which settings file would be read
    Path,
    /// List the quick-pick values for each timer field
    Presets,
}

pub fn run(action: ConfigAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let settings = Settings::load(config_path)?;
            println!("{}", settings.get(&key)?);
        }
        ConfigAction::Show => {
            let settings = Settings::load(config_path)?;
            println!("{}", toml::to_string_pretty(&settings)?);
        }
        ConfigAction::Path => match Settings::resolve_path(config_path) {
            Some((path, _)) => println!("{}", path.display()),
            None => println!("(no config directory)"),
        },
        ConfigAction::Presets => {
            println!("{}", serde_json::to_string_pretty(&PRESETS)?);
        }
    }
    Ok(())
}
