//! # GamerGrip
//!
//! Shows connected game controllers as live SVG skins.
//!
//! Reads gamepads through evdev, renders one skinned instance per device and
//! keeps an HTML page on disk up to date for a browser or streaming overlay.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use gamergrip::app::App;
use gamergrip::config::{Config, LoggingConfig};
use gamergrip::controller::gamepad::EvdevGamepads;
use gamergrip::skin::catalog::SkinCatalog;
use gamergrip::skin::loader::fetcher_for;

/// Config file read when `--config` is not given and the file exists
const DEFAULT_CONFIG_PATH: &str = "gamergrip.toml";

#[derive(Parser, Debug)]
#[command(name = "gamergrip", version, about = "Live gamepad input display")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Startup fragment, e.g. "#!skin=nes_jp&deadzone=0.1"; overrides the
    /// fragment saved by the previous run
    #[arg(short, long)]
    fragment: Option<String>,

    /// Print the skin catalog and exit
    #[arg(long)]
    list_skins: bool,
}

/// Main entry point for GamerGrip
///
/// # Control Flow
///
/// 1. Parse arguments and load configuration
/// 2. Set up logging (stderr, or daily files when `logging.dir` is set)
/// 3. Open the evdev gamepad source and the skin fetcher
/// 4. Run the viewer loop until Ctrl+C or `quit`
///
/// # Errors
///
/// Returns error if:
/// - The configuration file cannot be read or is invalid
/// - `/dev/input` cannot be scanned
/// - The skin source is not a valid directory or URL
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_skins {
        for entry in SkinCatalog::builtin().selector_entries() {
            println!("{:<18} {}", entry.value, entry.label);
        }
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let _guard = init_logging(&config.logging);

    info!("GamerGrip v{} starting...", env!("CARGO_PKG_VERSION"));

    let source = if config.input.device_paths.is_empty() {
        EvdevGamepads::scan().context("Failed to scan for gamepads")?
    } else {
        EvdevGamepads::with_paths(config.input.device_paths.iter().map(PathBuf::from).collect())
    };
    let fetcher = fetcher_for(&config.skins.source)
        .with_context(|| format!("Invalid skin source '{}'", config.skins.source))?;
    info!("Loading skins from {}", config.skins.source);

    let app = App::new(&config, source, fetcher);
    let fragment = match args.fragment {
        Some(fragment) => fragment,
        None => app.startup_fragment(&config.viewer.fragment).await,
    };
    app.run(&fragment).await?;

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::load(DEFAULT_CONFIG_PATH)
                .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH))
        }
        None => Ok(Config::default()),
    }
}

/// Installs the tracing subscriber. The returned guard flushes the file
/// writer and must live until exit.
fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    if logging.dir.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&logging.dir, &logging.file_prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        assert!(DEFAULT_CONFIG_PATH.ends_with(".toml"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["gamergrip", "--config", "gg.toml", "-f", "#!skin=n64"]);
        assert_eq!(args.config, Some(PathBuf::from("gg.toml")));
        assert_eq!(args.fragment.as_deref(), Some("#!skin=n64"));
        assert!(!args.list_skins);

        let args = Args::parse_from(["gamergrip", "--list-skins"]);
        assert!(args.list_skins);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_load_config_explicit_missing_file() {
        assert!(load_config(Some(std::path::Path::new("/nonexistent/gg.toml"))).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gg.toml");
        std::fs::write(&path, "[viewer]\nskin = \"snes_eu\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.viewer.skin, "snes_eu");
    }
}
