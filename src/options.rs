//! # Viewer Options
//!
//! The runtime configuration store: the active skin identifier and the stick
//! dead-zone. Values come from `[viewer]` in the config file, are overridden
//! once at startup by the page fragment, and the skin is overwritten whenever
//! the user picks another one.
//!
//! ## Fragment format
//!
//! The fragment carries form-encoded parameters after a `#!` prefix:
//!
//! ```text
//! #!skin=nes_jp&deadzone=0.1
//! ```
//!
//! | Key | Value | Validation |
//! |-----|-------|------------|
//! | `skin` | `skin` or `skin_style` | must exist in the catalog |
//! | `deadzone` | float | finite, `0.0 <= v < 1.0` |
//!
//! Unknown keys are ignored and preserved when the fragment is rewritten.

use tracing::{debug, warn};
use url::form_urlencoded;

use crate::skin::catalog::SkinCatalog;

/// Skin shown when nothing else is configured.
pub const DEFAULT_SKIN: &str = "psx";

/// Default stick dead-zone.
pub const DEFAULT_DEADZONE: f32 = 0.25;

/// Prefix written in front of the fragment parameters.
pub const FRAGMENT_PREFIX: &str = "#!";

/// Active skin and dead-zone.
///
/// # Examples
///
/// ```
/// use gamergrip::options::Options;
/// use gamergrip::skin::catalog::SkinCatalog;
///
/// let mut options = Options::default();
/// options.apply_fragment("#!skin=snes_eu&deadzone=0.1", &SkinCatalog::builtin());
/// assert_eq!(options.skin(), "snes_eu");
/// assert_eq!(options.deadzone(), 0.1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    skin: String,
    deadzone: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            skin: DEFAULT_SKIN.to_string(),
            deadzone: DEFAULT_DEADZONE,
        }
    }
}

impl Options {
    /// Creates options with explicit starting values.
    #[must_use]
    pub fn new(skin: impl Into<String>, deadzone: f32) -> Self {
        Self {
            skin: skin.into(),
            deadzone,
        }
    }

    #[must_use]
    pub fn skin(&self) -> &str {
        &self.skin
    }

    #[must_use]
    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// Overrides values from a fragment. Invalid values are logged and ignored.
    pub fn apply_fragment(&mut self, fragment: &str, catalog: &SkinCatalog) {
        for (key, value) in fragment_params(fragment) {
            match key.as_str() {
                "skin" => {
                    if catalog.accepts(&value) {
                        debug!("Skin from fragment: {}", value);
                        self.skin = value;
                    } else {
                        warn!("Ignoring unknown skin '{}' from fragment", value);
                    }
                }
                "deadzone" => match parse_deadzone(&value) {
                    Some(deadzone) => {
                        debug!("Deadzone from fragment: {}", deadzone);
                        self.deadzone = deadzone;
                    }
                    None => warn!("Ignoring invalid deadzone '{}' from fragment", value),
                },
                _ => {}
            }
        }
    }

    /// Sets the active skin and returns `fragment` with its `skin` parameter
    /// rewritten to match.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamergrip::options::Options;
    ///
    /// let mut options = Options::default();
    /// let fragment = options.set_skin("nes_jp", "#!deadzone=0.2&skin=psx");
    /// assert_eq!(options.skin(), "nes_jp");
    /// assert_eq!(fragment, "#!deadzone=0.2&skin=nes_jp");
    /// ```
    pub fn set_skin(&mut self, identifier: &str, fragment: &str) -> String {
        self.skin = identifier.to_string();
        let mut params = fragment_params(fragment);
        set_param(&mut params, "skin", identifier);
        format!("{}{}", FRAGMENT_PREFIX, encode_params(&params))
    }
}

/// Decodes the parameters of a fragment, with or without its `#!` prefix.
#[must_use]
pub fn fragment_params(fragment: &str) -> Vec<(String, String)> {
    let query = fragment
        .strip_prefix(FRAGMENT_PREFIX)
        .or_else(|| fragment.strip_prefix('#'))
        .unwrap_or(fragment);

    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Sets a parameter the way `URLSearchParams.set` does: the first occurrence
/// takes the value, later duplicates are dropped, a missing key is appended.
fn set_param(params: &mut Vec<(String, String)>, key: &str, value: &str) {
    let mut seen = false;
    params.retain_mut(|(k, v)| {
        if k != key {
            return true;
        }
        if seen {
            return false;
        }
        seen = true;
        *v = value.to_string();
        true
    });
    if !seen {
        params.push((key.to_string(), value.to_string()));
    }
}

fn encode_params(params: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

fn parse_deadzone(value: &str) -> Option<f32> {
    let deadzone: f32 = value.trim().parse().ok()?;
    (deadzone.is_finite() && (0.0..1.0).contains(&deadzone)).then_some(deadzone)
}
