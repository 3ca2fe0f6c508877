//! Command-line front end.
//!
//! Looks up addresses, shows suggestions, and manages the search history
//! and the settings file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use quickahj::config::ExportFormat;
use quickahj::export::{export_history, export_result, ExportFile, ExportOptions};
use quickahj::geocode::NominatimClient;
use quickahj::history::SearchHistory;
use quickahj::jurisdiction::{UNKNOWN_CITY, UNKNOWN_STATE};
use quickahj::models::{AhjResult, GeocodedAddress};
use quickahj::{ResolutionPipeline, Settings, SupportedState};

#[derive(Parser, Debug)]
#[command(name = "ahj")]
#[command(about = "Look up the building-permit authority for a US address")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long, default_value = "quickahj.toml", global = true)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geocode an address and print its jurisdiction report
    Lookup {
        address: String,

        /// Output format, defaults to the configured export format
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Write the report into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print address suggestions for partial input
    Suggest { text: String },

    /// Recent searches
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Settings file management
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List recent searches, newest first
    List,

    /// Re-run a recent search without geocoding it again
    Show {
        /// Position in the list, starting at 1
        index: usize,

        #[arg(short, long)]
        format: Option<ExportFormat>,
    },

    /// Export the history
    Export {
        #[arg(short, long)]
        format: Option<ExportFormat>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove all recent searches
    Clear,
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print the effective settings as TOML
    Show,

    /// Overwrite the settings file with defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Reset has to work even when the current file fails to load
    if let Command::Settings {
        action: SettingsAction::Reset,
    } = args.command
    {
        init_logging(false)?;
        return reset_settings(&args.settings);
    }

    let settings = Settings::load_or_default(&args.settings)?;
    init_logging(settings.debug_mode)?;

    match args.command {
        Command::Lookup {
            address,
            format,
            output,
        } => lookup(&settings, &address, format, output.as_deref()).await,
        Command::Suggest { text } => suggest(&settings, &text).await,
        Command::History { action } => history(&settings, action),
        Command::Settings { action } => manage_settings(&args.settings, &settings, action),
    }
}

fn init_logging(debug_mode: bool) -> Result<()> {
    let level = if debug_mode { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn lookup(
    settings: &Settings,
    query: &str,
    format: Option<ExportFormat>,
    output: Option<&Path>,
) -> Result<()> {
    let geocoder = NominatimClient::from_settings(settings)?;
    let address = geocoder
        .geocode(query)
        .await
        .with_context(|| format!("Failed to geocode '{}'", query))?;
    info!("Resolved '{}' to {}", query, address.display_name);

    let pipeline = ResolutionPipeline::from_settings(settings);
    let mut history = SearchHistory::load(&settings.history_path, settings.recent_searches_limit)?;

    match resolve_and_record(&pipeline, &mut history, &address) {
        Some(result) => {
            history.save(&settings.history_path)?;
            report(settings, &result, format, output)
        }
        None => {
            print!("{}", no_coverage_message(&address));
            Ok(())
        }
    }
}

/// Resolve an address, remembering it only when it has coverage.
fn resolve_and_record(
    pipeline: &ResolutionPipeline,
    history: &mut SearchHistory,
    address: &GeocodedAddress,
) -> Option<AhjResult> {
    let result = pipeline.resolve(address)?;
    history.add(address);
    Some(result)
}

fn report(
    settings: &Settings,
    result: &AhjResult,
    format: Option<ExportFormat>,
    output: Option<&Path>,
) -> Result<()> {
    let options = ExportOptions::from_settings(settings)
        .with_format(format.unwrap_or(settings.export_format));
    let file = export_result(result, &options)?;
    emit(&file, output)
}

fn no_coverage_message(address: &GeocodedAddress) -> String {
    let parts = &address.address;
    let city = parts
        .city
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(UNKNOWN_CITY);
    let state = parts
        .state
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNKNOWN_STATE);
    let covered: Vec<&str> = SupportedState::all().iter().map(|s| s.name()).collect();

    format!(
        "No jurisdiction data available for this location.\n\
         Address: {}\n\
         Location: {}, {}\n\
         Covered states: {}\n",
        address.display_name,
        city,
        state,
        covered.join(", ")
    )
}

async fn suggest(settings: &Settings, text: &str) -> Result<()> {
    let geocoder = NominatimClient::from_settings(settings)?;
    let suggestions = geocoder.suggest(text).await?;
    if suggestions.is_empty() {
        debug!("No suggestions for '{}'", text);
    }
    for suggestion in suggestions {
        println!("{}", suggestion.display_name);
    }
    Ok(())
}

fn history(settings: &Settings, action: HistoryAction) -> Result<()> {
    let mut history = SearchHistory::load(&settings.history_path, settings.recent_searches_limit)?;

    match action {
        HistoryAction::List => {
            if history.is_empty() {
                println!("No recent searches");
            }
            for (i, search) in history.entries().iter().enumerate() {
                println!(
                    "{:>2}. {}  ({})",
                    i + 1,
                    search.display_name,
                    search.timestamp.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }
        HistoryAction::Show { index, format } => {
            let search = index
                .checked_sub(1)
                .and_then(|i| history.get(i))
                .with_context(|| format!("No recent search at position {}", index))?;
            let address = search.to_address();
            match ResolutionPipeline::from_settings(settings).resolve(&address) {
                Some(result) => report(settings, &result, format, None),
                None => {
                    print!("{}", no_coverage_message(&address));
                    Ok(())
                }
            }
        }
        HistoryAction::Export { format, output } => {
            let options = ExportOptions::from_settings(settings)
                .with_format(format.unwrap_or(settings.export_format));
            let file = export_history(history.entries(), &options)?;
            emit(&file, output.as_deref())
        }
        HistoryAction::Clear => {
            let count = history.len();
            history.clear();
            history.save(&settings.history_path)?;
            println!("Cleared {} recent searches", count);
            Ok(())
        }
    }
}

fn manage_settings(path: &Path, settings: &Settings, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let content =
                toml::to_string_pretty(settings).context("Failed to serialize settings")?;
            print!("{}", content);
            Ok(())
        }
        SettingsAction::Reset => reset_settings(path),
    }
}

fn reset_settings(path: &Path) -> Result<()> {
    if path.exists() {
        warn!("Overwriting {}", path.display());
    }
    Settings::default().save_to_file(path)?;
    println!("Settings reset to defaults in {}", path.display());
    Ok(())
}

fn emit(file: &ExportFile, output: Option<&Path>) -> Result<()> {
    match output {
        Some(dir) => {
            let path = dir.join(&file.filename);
            fs::write(&path, &file.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", file.content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickahj::models::AddressParts;

    fn address(city: &str, state: &str, lat: f64, lon: f64) -> GeocodedAddress {
        GeocodedAddress::new(
            format!("{}, {}", city, state),
            lat,
            lon,
            AddressParts {
                city: Some(city.to_string()),
                state: Some(state.to_string()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_only_covered_lookups_enter_history() {
        let pipeline = ResolutionPipeline::new();
        let mut history = SearchHistory::new(10);

        let portland = address("Portland", "Oregon", 45.52, -122.68);
        assert!(resolve_and_record(&pipeline, &mut history, &portland).is_none());
        assert!(history.is_empty());

        let phoenix = address("Phoenix", "Arizona", 33.4484, -112.074);
        assert!(resolve_and_record(&pipeline, &mut history, &phoenix).is_some());
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].display_name, "Phoenix, Arizona");
    }

    #[test]
    fn test_no_coverage_message() {
        let message = no_coverage_message(&address("Portland", "Oregon", 45.52, -122.68));
        assert!(message.contains("No jurisdiction data available"));
        assert!(message.contains("Location: Portland, Oregon"));
        assert!(message.contains("Covered states: Arizona, Texas, Florida, Nevada"));

        let blank = GeocodedAddress::new("Nowhere", 0.0, 0.0, AddressParts::default());
        assert!(no_coverage_message(&blank).contains("Location: Unknown City, Unknown State"));
    }

    #[test]
    fn test_reset_repairs_invalid_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quickahj.toml");
        fs::write(&path, "recent_searches_limit = 0\nnominatim_url = \"nope\"\n").unwrap();
        assert!(Settings::load_or_default(&path).is_err());

        reset_settings(&path).unwrap();
        assert_eq!(Settings::load_from_file(&path).unwrap(), Settings::default());
    }
}
