//! # Skin Module
//!
//! Controller skins: the static catalog, composite skin identifiers, and the
//! asynchronous template/stylesheet loader.
//!
//! ## Asset layout
//!
//! | Asset | Path |
//! |-------|------|
//! | Template | `skins/<skin>.svg` |
//! | Style variant | `skins/<skin>_<style>.css` |

pub mod catalog;
pub mod loader;

/// Directory prefix for all skin assets.
pub const SKIN_ASSET_DIR: &str = "skins";

/// Composite skin identifier split into skin and optional style.
///
/// ```
/// use gamergrip::skin::SkinId;
///
/// let id = SkinId::parse("nes_jp");
/// assert_eq!(id.skin(), "nes");
/// assert_eq!(id.style(), Some("jp"));
/// assert_eq!(id.template_path(), "skins/nes.svg");
/// assert_eq!(id.stylesheet_path().as_deref(), Some("skins/nes_jp.css"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinId {
    skin: String,
    style: Option<String>,
}

impl SkinId {
    /// Splits `skin` or `skin_style`. Anything after a second `_` is ignored.
    #[must_use]
    pub fn parse(identifier: &str) -> Self {
        let mut parts = identifier.split('_');
        let skin = parts.next().unwrap_or_default().to_string();
        let style = parts
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { skin, style }
    }

    #[must_use]
    pub fn skin(&self) -> &str {
        &self.skin
    }

    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Relative path of the SVG template.
    #[must_use]
    pub fn template_path(&self) -> String {
        format!("{}/{}.svg", SKIN_ASSET_DIR, self.skin)
    }

    /// Relative path of the style sheet, if a style is selected.
    #[must_use]
    pub fn stylesheet_path(&self) -> Option<String> {
        self.style
            .as_ref()
            .map(|style| format!("{}/{}_{}.css", SKIN_ASSET_DIR, self.skin, style))
    }
}

impl std::fmt::Display for SkinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.style {
            Some(style) => write!(f, "{}_{}", self.skin, style),
            None => f.write_str(&self.skin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_skin() {
        let id = SkinId::parse("psx");
        assert_eq!(id.skin(), "psx");
        assert_eq!(id.style(), None);
        assert_eq!(id.stylesheet_path(), None);
        assert_eq!(id.template_path(), "skins/psx.svg");
    }

    #[test]
    fn test_parse_trailing_underscore_has_no_style() {
        let id = SkinId::parse("psx_");
        assert_eq!(id.skin(), "psx");
        assert_eq!(id.style(), None);
    }

    #[test]
    fn test_parse_extra_segments_ignored() {
        let id = SkinId::parse("snes_eu_extra");
        assert_eq!(id.skin(), "snes");
        assert_eq!(id.style(), Some("eu"));
        assert_eq!(id.to_string(), "snes_eu");
    }
}
