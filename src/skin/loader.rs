//! # Skin Loader
//!
//! Retrieves skin templates and turns them into reusable [`Template`]s.
//!
//! Assets are addressed by their relative path (`skins/nes.svg`). A
//! [`SkinFetcher`] resolves that path against a local directory
//! ([`DirSkinFetcher`]) or a base URL ([`HttpSkinFetcher`]).
//!
//! ## Limitations
//!
//! Templates are read without a DTD. A `<!DOCTYPE>` is skipped, so entities
//! declared in an internal subset (Illustrator exports use `&ns_svg;` and
//! friends) are unknown and the template is rejected. Expand such entities
//! before shipping the skin; browsers accept these files.
//!
//! ## Usage
//!
//! ```no_run
//! use gamergrip::skin::SkinId;
//! use gamergrip::skin::loader::{fetcher_for, load_template};
//!
//! # async fn demo() -> gamergrip::error::Result<()> {
//! let fetcher = fetcher_for("/usr/share/gamergrip")?;
//! let template = load_template(fetcher.as_ref(), &SkinId::parse("nes_jp")).await?;
//! assert_eq!(template.skin(), "nes");
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::SkinId;
use crate::dom::Element;
use crate::error::{GamerGripError, Result};

/// Class set on every template root.
pub const TEMPLATE_CLASS: &str = "gamepad";

/// Attribute on the template root naming the skin it was loaded from.
pub const SKIN_ATTRIBUTE: &str = "data-skin";

/// A parsed skin template, detached from any page.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    skin: String,
    root: Element,
}

impl Template {
    /// Builds a template from SVG markup.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTemplate` if the markup does not parse, uses entities
    /// other than the five predefined XML ones and character references, or
    /// its root is not an `<svg>` element.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamergrip::skin::loader::Template;
    ///
    /// let template = Template::from_svg("psx", "<svg><circle id=\"b0-hilight\"/></svg>")?;
    /// assert_eq!(template.root().attribute("class"), Some("gamepad"));
    /// # Ok::<(), gamergrip::error::GamerGripError>(())
    /// ```
    pub fn from_svg(skin: &str, markup: &str) -> Result<Self> {
        let mut root = Element::parse(markup)
            .map_err(|e| GamerGripError::InvalidTemplate(format!("{}: {}", skin, e)))?;

        let is_svg = root.name() == "svg" || root.name().ends_with(":svg");
        if !is_svg {
            return Err(GamerGripError::InvalidTemplate(format!(
                "{}: root element is <{}>, expected <svg>",
                skin,
                root.name()
            )));
        }

        root.set_attribute("class", TEMPLATE_CLASS);
        root.set_attribute(SKIN_ATTRIBUTE, skin);
        Ok(Self {
            skin: skin.to_string(),
            root,
        })
    }

    /// Skin id the template was loaded for.
    #[must_use]
    pub fn skin(&self) -> &str {
        &self.skin
    }

    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// A fresh copy of the template carrying the given element id.
    #[must_use]
    pub fn instantiate(&self, instance_id: &str) -> Element {
        let mut element = self.root.clone();
        element.set_attribute("id", instance_id);
        element
    }
}

/// Retrieves skin assets by relative path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkinFetcher: Send + Sync {
    /// Returns the text content of the asset at `path`.
    async fn fetch(&self, path: &str) -> Result<String>;
}

/// Reads assets below a local directory.
#[derive(Debug, Clone)]
pub struct DirSkinFetcher {
    root: PathBuf,
}

impl DirSkinFetcher {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SkinFetcher for DirSkinFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        debug!("Reading skin asset {}", full.display());
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| GamerGripError::SkinFetch {
                path: full.display().to_string(),
                reason: e.to_string(),
            })
    }
}

/// Downloads assets relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSkinFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpSkinFetcher {
    /// # Errors
    ///
    /// Returns `SkinFetch` if `base` is not a valid URL.
    pub fn new(base: &str) -> Result<Self> {
        let mut base = base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base).map_err(|e| GamerGripError::SkinFetch {
            path: base.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    /// Absolute URL of an asset.
    ///
    /// # Errors
    ///
    /// Returns `SkinFetch` if the path cannot be joined onto the base.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|e| GamerGripError::SkinFetch {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl SkinFetcher for HttpSkinFetcher {
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.url_for(path)?;
        debug!("Downloading skin asset {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Chooses a fetcher for a `skins.source` setting: `http(s)://` bases are
/// downloaded, anything else is a directory.
///
/// # Errors
///
/// Returns `SkinFetch` for a malformed URL.
pub fn fetcher_for(source: &str) -> Result<Arc<dyn SkinFetcher>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Arc::new(HttpSkinFetcher::new(source)?))
    } else {
        Ok(Arc::new(DirSkinFetcher::new(source)))
    }
}

/// Fetches and parses the template for a skin.
///
/// # Errors
///
/// - `SkinFetch` / `Http`: the asset could not be retrieved
/// - `InvalidTemplate`: the asset is not a usable SVG document
pub async fn load_template(fetcher: &dyn SkinFetcher, id: &SkinId) -> Result<Template> {
    let markup = fetcher.fetch(&id.template_path()).await?;
    Template::from_svg(id.skin(), &markup)
}
