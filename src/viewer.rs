//! # Viewer
//!
//! Owns the page, the gamepad source and the active skin, and keeps them in
//! step:
//!
//! - skin selection rewrites the fragment and swaps the stylesheet at once,
//!   then the template arrives later through [`Viewer::finish_skin_change`]
//! - each connected device gets one instance of the active template
//! - every frame, each instance is redrawn from a fresh sample
//!
//! ## Usage
//!
//! ```no_run
//! use gamergrip::controller::gamepad::EvdevGamepads;
//! use gamergrip::dom::document::Document;
//! use gamergrip::options::Options;
//! use gamergrip::skin::catalog::SkinCatalog;
//! use gamergrip::skin::loader::{fetcher_for, load_template};
//! use gamergrip::viewer::Viewer;
//!
//! # async fn demo() -> gamergrip::error::Result<()> {
//! let pads = EvdevGamepads::scan()?;
//! let mut viewer = Viewer::new(SkinCatalog::builtin(), Options::default(), Document::new(), pads, 60);
//! let request = viewer.start("#!skin=nes_jp")?;
//!
//! let fetcher = fetcher_for(".")?;
//! let loaded = load_template(fetcher.as_ref(), &request.id).await;
//! viewer.finish_skin_change(request.generation, loaded)?;
//! viewer.rescan();
//! viewer.redraw();
//! # Ok(())
//! # }
//! ```

use tracing::{debug, info};

use crate::controller::{DeviceEvent, GamepadSource};
use crate::error::{GamerGripError, Result};
use crate::options::Options;
use crate::page::Page;
use crate::registry::{instance_id, DeviceRegistry};
use crate::render::frame_clock::FrameClock;
use crate::render::update::apply_update;
use crate::skin::catalog::SkinCatalog;
use crate::skin::loader::Template;
use crate::skin::SkinId;

/// A template load the caller must perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinRequest {
    /// Matches the request to its completion; older ones are dropped.
    pub generation: u64,
    pub id: SkinId,
}

/// Outcome of a completed template load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinChange {
    /// The template is active and `instances` were recreated.
    Applied { instances: usize },
    /// A newer skin was requested meanwhile; the result was discarded.
    Superseded,
}

/// Live controller view.
pub struct Viewer<P: Page, S: GamepadSource> {
    catalog: SkinCatalog,
    options: Options,
    page: P,
    source: S,
    registry: DeviceRegistry,
    template: Option<Template>,
    frames: FrameClock,
    skin_generation: u64,
}

impl<P: Page, S: GamepadSource> Viewer<P, S> {
    /// Creates a viewer with no template loaded and the render loop stopped.
    pub fn new(catalog: SkinCatalog, options: Options, page: P, source: S, frame_rate_hz: u32) -> Self {
        Self {
            catalog,
            options,
            page,
            source,
            registry: DeviceRegistry::new(),
            template: None,
            frames: FrameClock::new(frame_rate_hz),
            skin_generation: 0,
        }
    }

    /// Applies the startup fragment, fills the skin selector and requests the
    /// configured skin.
    ///
    /// # Errors
    ///
    /// Returns `SkinNotFound` if the configured skin is not in the catalog.
    pub fn start(&mut self, fragment: &str) -> Result<SkinRequest> {
        self.page.set_fragment(fragment);
        self.options.apply_fragment(fragment, &self.catalog);
        info!(
            "Starting with skin '{}', deadzone {}",
            self.options.skin(),
            self.options.deadzone()
        );

        self.page
            .populate_skin_selector(self.catalog.selector_entries(), self.options.skin());

        let skin = self.options.skin().to_string();
        self.change_skin(&skin)
    }

    /// Selects a skin: rewrites the fragment, swaps the stylesheet and returns
    /// the template load to perform.
    ///
    /// # Errors
    ///
    /// Returns `SkinNotFound` if the identifier is not in the catalog.
    pub fn change_skin(&mut self, identifier: &str) -> Result<SkinRequest> {
        if !self.catalog.accepts(identifier) {
            return Err(GamerGripError::SkinNotFound(identifier.to_string()));
        }

        let id = SkinId::parse(identifier);
        self.page.set_stylesheet(id.stylesheet_path().as_deref());

        let fragment = self.options.set_skin(identifier, &self.page.fragment());
        self.page.set_fragment(&fragment);
        self.page.select_skin(identifier);

        self.skin_generation += 1;
        info!("Skin changed to '{}', loading {}", identifier, id.template_path());
        Ok(SkinRequest {
            generation: self.skin_generation,
            id,
        })
    }

    /// Completes a template load started by [`Viewer::change_skin`].
    ///
    /// On success every instance is recreated from the new template. On
    /// failure nothing changes and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the load error unchanged.
    pub fn finish_skin_change(
        &mut self,
        generation: u64,
        loaded: Result<Template>,
    ) -> Result<SkinChange> {
        if generation != self.skin_generation {
            debug!(
                "Dropping template load {} (current is {})",
                generation, self.skin_generation
            );
            return Ok(SkinChange::Superseded);
        }

        let template = loaded?;
        info!("Template for '{}' loaded", template.skin());

        self.registry.remove_all(&mut self.page);
        let connected = self.source.connected();
        let instances = self
            .registry
            .add_all(&mut self.page, Some(&template), &connected);
        self.template = Some(template);

        if instances > 0 {
            self.frames.start();
        }
        Ok(SkinChange::Applied { instances })
    }

    /// Handles an attached device.
    pub fn on_connect(&mut self, index: usize) {
        self.page.set_placeholder_visible(false);
        if self
            .registry
            .connect(&mut self.page, self.template.as_ref(), index)
            && self.frames.start()
        {
            debug!("Render loop started");
        }
    }

    /// Handles a detached device.
    pub fn on_disconnect(&mut self, index: usize) {
        if self.registry.disconnect(&mut self.page, index) {
            debug!("Removed {}", instance_id(index));
        }
        if self.source.connected().is_empty() {
            self.page.set_placeholder_visible(true);
        }
        if self.registry.is_empty() && self.frames.stop() {
            debug!("Render loop stopped");
        }
    }

    pub fn handle_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::Connected(index) => self.on_connect(index),
            DeviceEvent::Disconnected(index) => self.on_disconnect(index),
        }
    }

    /// Polls the source for hotplug changes. Returns the number of events.
    pub fn rescan(&mut self) -> usize {
        let events = self.source.rescan();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    /// Redraws every instance from a fresh sample. Returns the number of
    /// attribute writes that landed.
    pub fn redraw(&mut self) -> usize {
        let deadzone = self.options.deadzone();
        self.source
            .snapshot()
            .iter()
            .filter(|sample| self.registry.contains(sample.index))
            .map(|sample| apply_update(&mut self.page, &instance_id(sample.index), sample, deadzone))
            .sum()
    }

    /// Shows or hides the settings panel.
    pub fn toggle_settings(&mut self) -> bool {
        self.page.toggle_settings()
    }

    /// Stops the render loop.
    pub fn stop(&mut self) {
        self.frames.stop();
    }

    #[must_use]
    pub fn catalog(&self) -> &SkinCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    #[must_use]
    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn frame_clock(&self) -> &FrameClock {
        &self.frames
    }

    pub fn frame_clock_mut(&mut self) -> &mut FrameClock {
        &mut self.frames
    }
}
