//! # Application Runtime
//!
//! Runs the viewer on a single task. One `tokio::select!` loop multiplexes:
//!
//! | Branch | Action |
//! |--------|--------|
//! | Frame clock | redraw every instance |
//! | Rescan interval | hotplug detection |
//! | Skin loads | apply templates fetched by background tasks |
//! | Output interval | write the page snapshot and saved fragment |
//! | Console | `skin <id>`, `settings`, `skins`, `status`, `quit` |
//! | Ctrl+C | shut down |
//!
//! Template fetches run on spawned tasks and report back through a channel,
//! so the stylesheet swap of a skin change always lands before its template.
//!
//! The page reloads itself every `output.interval_ms` and carries the current
//! fragment. The fragment is also saved to `output.state_path` and read back
//! by [`App::startup_fragment`] on the next run.

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::Config;
use crate::controller::GamepadSource;
use crate::dom::document::Document;
use crate::error::Result;
use crate::options::Options;
use crate::page::Page;
use crate::skin::catalog::SkinCatalog;
use crate::skin::loader::{load_template, SkinFetcher, Template};
use crate::snapshot::{FragmentFile, SnapshotWriter};
use crate::viewer::{SkinChange, SkinRequest, Viewer};

/// A console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select a skin by composite id
    Skin(String),
    /// Toggle the settings panel
    Settings,
    /// List available skins
    Skins,
    /// Print viewer state
    Status,
    /// Exit
    Quit,
}

impl Command {
    /// Parses one console line. Blank lines and unknown commands yield `None`.
    ///
    /// ```
    /// use gamergrip::app::Command;
    ///
    /// assert_eq!(Command::parse("skin nes_jp"), Some(Command::Skin("nes_jp".to_string())));
    /// assert_eq!(Command::parse("  quit "), Some(Command::Quit));
    /// assert_eq!(Command::parse("skin"), None);
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "skin" => Command::Skin(words.next()?.to_string()),
            "settings" | "config" => Command::Settings,
            "skins" | "list" => Command::Skins,
            "status" => Command::Status,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Completion of a background template fetch.
#[derive(Debug)]
struct SkinLoaded {
    generation: u64,
    result: Result<Template>,
}

/// The viewer plus everything that drives it.
pub struct App<S: GamepadSource> {
    viewer: Viewer<Document, S>,
    fetcher: Arc<dyn SkinFetcher>,
    loads_tx: mpsc::UnboundedSender<SkinLoaded>,
    loads_rx: mpsc::UnboundedReceiver<SkinLoaded>,
    snapshot: SnapshotWriter,
    state: FragmentFile,
    rescan_period: Duration,
    output_period: Duration,
}

impl<S: GamepadSource> App<S> {
    /// Builds the runtime from configuration.
    pub fn new(config: &Config, source: S, fetcher: Arc<dyn SkinFetcher>) -> Self {
        let options = Options::new(config.viewer.skin.clone(), config.viewer.deadzone);
        let page = Document::new()
            .with_asset_base(asset_base(&config.skins.source))
            .with_refresh_interval(config.output.interval_ms);
        let viewer = Viewer::new(
            SkinCatalog::builtin(),
            options,
            page,
            source,
            config.render.frame_rate_hz,
        );
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();

        Self {
            viewer,
            fetcher,
            loads_tx,
            loads_rx,
            snapshot: SnapshotWriter::new(&config.output.path),
            state: FragmentFile::new(&config.output.state_path),
            rescan_period: Duration::from_millis(config.input.rescan_interval_ms),
            output_period: Duration::from_millis(config.output.interval_ms),
        }
    }

    #[must_use]
    pub fn viewer(&self) -> &Viewer<Document, S> {
        &self.viewer
    }

    /// Fragment to start with: the one saved by the previous run, else
    /// `configured`.
    pub async fn startup_fragment(&self, configured: &str) -> String {
        match self.state.load().await {
            Some(saved) => {
                info!("Restoring fragment {}", saved);
                saved
            }
            None => configured.to_string(),
        }
    }

    /// Writes the page snapshot and saves the current fragment.
    ///
    /// # Errors
    ///
    /// Returns `Io` if either file cannot be written.
    pub async fn persist(&mut self) -> Result<()> {
        let page = self.viewer.page();
        self.snapshot.write_if_changed(page.to_html()).await?;
        self.state.save_if_changed(&page.fragment()).await?;
        Ok(())
    }

    /// Applies the startup fragment, requests the first skin and attaches
    /// the devices already present.
    ///
    /// # Errors
    ///
    /// Returns `SkinNotFound` if the configured skin is not in the catalog.
    pub fn start(&mut self, fragment: &str) -> Result<()> {
        let request = self.viewer.start(fragment)?;
        self.spawn_load(request);
        self.viewer.rescan();
        Ok(())
    }

    /// Selects a skin and starts fetching its template.
    ///
    /// # Errors
    ///
    /// Returns `SkinNotFound` for identifiers outside the catalog.
    pub fn select_skin(&mut self, identifier: &str) -> Result<()> {
        let request = self.viewer.change_skin(identifier)?;
        self.spawn_load(request);
        Ok(())
    }

    fn spawn_load(&self, request: SkinRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.loads_tx.clone();
        tokio::spawn(async move {
            let result = load_template(fetcher.as_ref(), &request.id).await;
            // Receiver only closes on shutdown
            let _ = tx.send(SkinLoaded {
                generation: request.generation,
                result,
            });
        });
    }

    fn on_skin_loaded(&mut self, loaded: SkinLoaded) {
        match self.viewer.finish_skin_change(loaded.generation, loaded.result) {
            Ok(SkinChange::Applied { instances }) => {
                info!("Skin applied to {} gamepad(s)", instances);
            }
            Ok(SkinChange::Superseded) => {}
            Err(e) => warn!("Keeping previous skin: {}", e),
        }
    }

    /// Executes a console command. Returns false when the app should exit.
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Skin(identifier) => {
                if let Err(e) = self.select_skin(&identifier) {
                    warn!("{}", e);
                }
            }
            Command::Settings => {
                let visible = self.viewer.toggle_settings();
                info!("Settings panel {}", if visible { "shown" } else { "hidden" });
            }
            Command::Skins => {
                let current = self.viewer.options().skin();
                for entry in self.viewer.catalog().selector_entries() {
                    let marker = if entry.value == current { '*' } else { ' ' };
                    println!("{} {:<18} {}", marker, entry.value, entry.label);
                }
            }
            Command::Status => {
                println!("skin:      {}", self.viewer.options().skin());
                println!("deadzone:  {}", self.viewer.options().deadzone());
                println!("fragment:  {}", self.viewer.page().fragment());
                println!("gamepads:  {:?}", self.viewer.source().connected());
                println!("instances: {:?}", self.viewer.page().instance_ids());
                println!("frames:    {}", self.viewer.frame_clock().frames());
            }
            Command::Quit => return false,
        }
        true
    }

    /// Runs until Ctrl+C, `quit`, or a fatal error.
    ///
    /// # Errors
    ///
    /// Returns error if the startup skin is invalid.
    pub async fn run(mut self, fragment: &str) -> Result<()> {
        self.start(fragment)?;

        let mut rescan = interval(self.rescan_period);
        rescan.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut output = interval(self.output_period);
        output.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut console_open = true;

        info!("Writing page to {}", self.snapshot.path().display());
        info!("Press Ctrl+C or type 'quit' to exit");

        loop {
            tokio::select! {
                _ = self.viewer.frame_clock_mut().tick() => {
                    self.viewer.redraw();
                }

                _ = rescan.tick() => {
                    self.viewer.rescan();
                }

                Some(loaded) = self.loads_rx.recv() => {
                    self.on_skin_loaded(loaded);
                }

                _ = output.tick() => {
                    if let Err(e) = self.persist().await {
                        warn!("Failed to write page snapshot: {}", e);
                    }
                }

                line = lines.next_line(), if console_open => {
                    match line {
                        Ok(Some(line)) => match Command::parse(&line) {
                            Some(command) => {
                                if !self.handle_command(command) {
                                    break;
                                }
                            }
                            None if line.trim().is_empty() => {}
                            None => warn!("Unknown command: {}", line.trim()),
                        },
                        Ok(None) => console_open = false,
                        Err(e) => {
                            warn!("Console closed: {}", e);
                            console_open = false;
                        }
                    }
                }

                // Handle Ctrl+C for graceful shutdown
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down...");
                    break;
                }
            }
        }

        self.viewer.stop();
        self.persist().await?;
        info!(
            "Rendered {} frames, wrote {} snapshots",
            self.viewer.frame_clock().frames(),
            self.snapshot.writes()
        );
        Ok(())
    }
}

/// Asset prefix for the rendered page: URLs as given, directories made
/// absolute so the page works wherever it is written.
fn asset_base(source: &str) -> String {
    if source.starts_with("http://") || source.starts_with("https://") {
        return source.to_string();
    }
    std::fs::canonicalize(source)
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_else(|_| source.to_string())
}
