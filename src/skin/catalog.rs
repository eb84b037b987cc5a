//! # Skin Catalog
//!
//! Static table of the controller skins shipped with GamerGrip.
//!
//! Each skin is a controller shape (one SVG template) with one or more style
//! variants (one stylesheet each). Selector entries are identified by a
//! composite id: `skin` for the bare template, `skin_style` for a variant.
//!
//! ```
//! use gamergrip::skin::catalog::SkinCatalog;
//!
//! let catalog = SkinCatalog::builtin();
//! assert!(catalog.contains("nes"));
//! assert!(catalog.contains_style("nes", "jp"));
//! assert!(!catalog.contains_style("psx", "jp"));
//! ```

/// A single skin family and its style variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinDescriptor {
    /// Identifier used in asset paths and the fragment (`psx`, `nes`, ...).
    pub id: &'static str,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Ordered `(style_id, display_name)` pairs.
    pub styles: &'static [(&'static str, &'static str)],
}

impl SkinDescriptor {
    /// Display name of a style, if the skin has it.
    #[must_use]
    pub fn style_name(&self, style: &str) -> Option<&'static str> {
        self.styles
            .iter()
            .find(|(id, _)| *id == style)
            .map(|(_, name)| *name)
    }
}

/// One row of the skin selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorEntry {
    /// Composite identifier, `skin` or `skin_style`.
    pub value: String,
    /// Label shown to the user, `Name` or `Name (Style)`.
    pub label: String,
}

const BUILTIN_SKINS: &[SkinDescriptor] = &[
    SkinDescriptor {
        id: "gamecube",
        display_name: "GameCube",
        styles: &[("indigo", "Indigo")],
    },
    SkinDescriptor {
        id: "genesis",
        display_name: "Genesis",
        styles: &[("na", "North America")],
    },
    SkinDescriptor {
        id: "n64",
        display_name: "N64",
        styles: &[("solidgrey", "Solid Grey")],
    },
    SkinDescriptor {
        id: "nes",
        display_name: "NES",
        styles: &[("na", "North America/Europe"), ("jp", "Japan")],
    },
    SkinDescriptor {
        id: "psx",
        display_name: "PlayStation",
        styles: &[("grey", "Grey")],
    },
    SkinDescriptor {
        id: "saturn",
        display_name: "Saturn",
        styles: &[("na", "North America")],
    },
    SkinDescriptor {
        id: "snes",
        display_name: "SNES",
        styles: &[("na", "North America"), ("eu", "Europe/Japan")],
    },
];

/// Read-only view over a table of skins.
#[derive(Debug, Clone, Copy)]
pub struct SkinCatalog {
    skins: &'static [SkinDescriptor],
}

impl SkinCatalog {
    /// The skins compiled into the binary.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            skins: BUILTIN_SKINS,
        }
    }

    /// Catalog over an arbitrary static table.
    #[must_use]
    pub const fn from_static(skins: &'static [SkinDescriptor]) -> Self {
        Self { skins }
    }

    /// Looks up a skin by id.
    #[must_use]
    pub fn get(&self, skin: &str) -> Option<&'static SkinDescriptor> {
        self.skins.iter().find(|s| s.id == skin)
    }

    /// Returns true if the skin exists.
    #[must_use]
    pub fn contains(&self, skin: &str) -> bool {
        self.get(skin).is_some()
    }

    /// Returns true if the skin exists and has the given style.
    #[must_use]
    pub fn contains_style(&self, skin: &str, style: &str) -> bool {
        self.get(skin)
            .is_some_and(|s| s.style_name(style).is_some())
    }

    /// Returns true if a composite identifier (`skin` or `skin_style`) is valid.
    #[must_use]
    pub fn accepts(&self, identifier: &str) -> bool {
        let id = super::SkinId::parse(identifier);
        match id.style() {
            None => self.contains(id.skin()),
            Some(style) => self.contains_style(id.skin(), style),
        }
    }

    /// All skins in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static SkinDescriptor> {
        self.skins.iter()
    }

    /// Selector rows: each skin followed by its styles.
    #[must_use]
    pub fn selector_entries(&self) -> Vec<SelectorEntry> {
        let mut entries = Vec::new();
        for skin in self.skins {
            entries.push(SelectorEntry {
                value: skin.id.to_string(),
                label: skin.display_name.to_string(),
            });
            for (style, name) in skin.styles {
                entries.push(SelectorEntry {
                    value: format!("{}_{}", skin.id, style),
                    label: format!("{} ({})", skin.display_name, name),
                });
            }
        }
        entries
    }
}

impl Default for SkinCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
