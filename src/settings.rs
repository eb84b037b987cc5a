//! # Settings Panel
//!
//! Visibility of the configuration panel and the state of the skin selector
//! it contains.

use crate::skin::catalog::SelectorEntry;

/// Button label while the panel is hidden.
pub const LABEL_SHOW: &str = "Config";
/// Button label while the panel is shown.
pub const LABEL_HIDE: &str = "X";

/// Show/hide toggle for the settings panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPanel {
    visible: bool,
}

impl SettingsPanel {
    /// Flips visibility and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Label for the toggle button in the current state.
    #[must_use]
    pub fn button_label(&self) -> &'static str {
        if self.visible {
            LABEL_HIDE
        } else {
            LABEL_SHOW
        }
    }
}

/// Options of the skin selector and which one is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkinSelector {
    entries: Vec<SelectorEntry>,
    selected: Option<usize>,
}

impl SkinSelector {
    /// Replaces the options and selects the entry whose value is `current`.
    pub fn populate(&mut self, entries: Vec<SelectorEntry>, current: &str) {
        self.selected = entries.iter().position(|e| e.value == current);
        self.entries = entries;
    }

    /// Selects the entry with the given value. Returns false if there is none.
    pub fn select(&mut self, value: &str) -> bool {
        match self.entries.iter().position(|e| e.value == value) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[SelectorEntry] {
        &self.entries
    }

    #[must_use]
    pub fn selected(&self) -> Option<&SelectorEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }
}
