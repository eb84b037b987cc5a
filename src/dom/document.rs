//! # In-Memory Page
//!
//! [`Document`] is the [`Page`] implementation used by the native viewer. It
//! keeps the visual instances as element trees and serializes the whole page
//! to HTML for display in a browser.
//!
//! ## Page elements
//!
//! | Id | Element |
//! |----|---------|
//! | `nocon` | "no controller" placeholder |
//! | `settingsButton` | settings toggle button |
//! | `settings` | settings panel |
//! | `skinSelector` | skin selector |
//! | `skinStylesheet` | skin style variant link |
//! | `permalink` | link carrying the current fragment |
//! | `gamepad-<index>` | visual instance of device `<index>` |

use quick_xml::escape::escape;

use super::Element;
use crate::page::Page;
use crate::settings::{SettingsPanel, SkinSelector};
use crate::skin::catalog::SelectorEntry;
use crate::skin::loader::Template;

pub const PLACEHOLDER_ID: &str = "nocon";
pub const SETTINGS_BUTTON_ID: &str = "settingsButton";
pub const SETTINGS_PANEL_ID: &str = "settings";
pub const SKIN_SELECTOR_ID: &str = "skinSelector";
pub const STYLESHEET_ID: &str = "skinStylesheet";
pub const PERMALINK_ID: &str = "permalink";

/// Reload period used until [`Document::with_refresh_interval`] sets one.
pub const DEFAULT_REFRESH_MS: u64 = 1000;

const PLACEHOLDER_TEXT: &str = "No controller detected. Connect one and press a button.";

/// Page held in memory and rendered as HTML.
#[derive(Debug, Clone)]
pub struct Document {
    asset_base: String,
    refresh_ms: u64,
    placeholder_visible: bool,
    settings: SettingsPanel,
    selector: SkinSelector,
    stylesheet: Option<String>,
    fragment: String,
    instances: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty page with the placeholder shown.
    #[must_use]
    pub fn new() -> Self {
        Self {
            asset_base: String::new(),
            refresh_ms: DEFAULT_REFRESH_MS,
            placeholder_visible: true,
            settings: SettingsPanel::default(),
            selector: SkinSelector::default(),
            stylesheet: None,
            fragment: String::new(),
            instances: Vec::new(),
        }
    }

    /// Prefix for asset links in the rendered HTML (a directory or base URL).
    #[must_use]
    pub fn with_asset_base(mut self, base: impl Into<String>) -> Self {
        self.asset_base = base.into();
        self
    }

    /// How often the rendered page reloads itself, in milliseconds.
    #[must_use]
    pub fn with_refresh_interval(mut self, refresh_ms: u64) -> Self {
        self.refresh_ms = refresh_ms.max(1);
        self
    }

    #[must_use]
    pub fn refresh_interval(&self) -> u64 {
        self.refresh_ms
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsPanel {
        &self.settings
    }

    #[must_use]
    pub fn selector(&self) -> &SkinSelector {
        &self.selector
    }

    /// Root element of an instance.
    #[must_use]
    pub fn instance(&self, instance_id: &str) -> Option<&Element> {
        self.instances.iter().find(|e| e.id() == Some(instance_id))
    }

    fn instance_mut(&mut self, instance_id: &str) -> Option<&mut Element> {
        self.instances.iter_mut().find(|e| e.id() == Some(instance_id))
    }

    fn asset_href(&self, path: &str) -> String {
        if self.asset_base.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.asset_base.trim_end_matches('/'), path)
        }
    }

    /// Serializes the page as a standalone HTML document.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        // Whole seconds only; the script below handles shorter periods
        out.push_str(&format!(
            "<noscript><meta http-equiv=\"refresh\" content=\"{}\"></noscript>\n",
            self.refresh_ms.div_ceil(1000)
        ));
        out.push_str("<title>GamerGrip</title>\n");
        if let Some(href) = &self.stylesheet {
            out.push_str(&format!(
                "<link id=\"{}\" rel=\"stylesheet\" type=\"text/css\" href=\"{}\">\n",
                STYLESHEET_ID,
                escape(self.asset_href(href).as_str())
            ));
        }
        out.push_str("</head>\n<body>\n");

        out.push_str(&format!(
            "<div id=\"{}\"{}>{}</div>\n",
            PLACEHOLDER_ID,
            display_style(self.placeholder_visible),
            PLACEHOLDER_TEXT
        ));
        out.push_str(&format!(
            "<button id=\"{}\">{}</button>\n",
            SETTINGS_BUTTON_ID,
            self.settings.button_label()
        ));
        out.push_str(&format!(
            "<div id=\"{}\"{}>\n<select id=\"{}\">\n",
            SETTINGS_PANEL_ID,
            display_style(self.settings.is_visible()),
            SKIN_SELECTOR_ID
        ));
        let selected = self.selector.selected().map(|e| e.value.as_str());
        for entry in self.selector.entries() {
            out.push_str(&format!(
                "<option value=\"{}\"{}>{}</option>\n",
                escape(entry.value.as_str()),
                if selected == Some(entry.value.as_str()) { " selected" } else { "" },
                escape(entry.label.as_str())
            ));
        }
        out.push_str("</select>\n");
        if !self.fragment.is_empty() {
            out.push_str(&format!(
                "<a id=\"{}\" href=\"{}\">Link to this view</a>\n",
                PERMALINK_ID,
                escape(self.fragment.as_str())
            ));
        }
        out.push_str("</div>\n");

        for instance in &self.instances {
            instance.write_markup(&mut out);
            out.push('\n');
        }

        out.push_str("<script>\n");
        if !self.fragment.is_empty() {
            out.push_str(&format!(
                "history.replaceState(null, \"\", {});\n",
                js_string(&self.fragment)
            ));
        }
        out.push_str(&format!(
            "setTimeout(function () {{ location.reload(); }}, {});\n",
            self.refresh_ms
        ));
        out.push_str("</script>\n");
        out.push_str("</body>\n</html>\n");
        out
    }
}

/// Double-quoted JavaScript string literal, safe inside `<script>`.
fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '<' => out.push_str("\\u003c"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn display_style(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        " style=\"display:none\""
    }
}

impl Page for Document {
    fn set_placeholder_visible(&mut self, visible: bool) {
        self.placeholder_visible = visible;
    }

    fn placeholder_visible(&self) -> bool {
        self.placeholder_visible
    }

    fn attach_instance(&mut self, instance_id: &str, template: &Template) {
        self.instances.push(template.instantiate(instance_id));
    }

    fn remove_instance(&mut self, instance_id: &str) -> bool {
        let before = self.instances.len();
        self.instances.retain(|e| e.id() != Some(instance_id));
        self.instances.len() != before
    }

    fn instance_ids(&self) -> Vec<String> {
        self.instances
            .iter()
            .filter_map(|e| e.id().map(str::to_string))
            .collect()
    }

    fn element_attribute(&self, instance_id: &str, element_id: &str, name: &str) -> Option<String> {
        self.instance(instance_id)?
            .find_by_id(element_id)?
            .attribute(name)
            .map(str::to_string)
    }

    fn set_element_attribute(
        &mut self,
        instance_id: &str,
        element_id: &str,
        name: &str,
        value: &str,
    ) -> bool {
        match self
            .instance_mut(instance_id)
            .and_then(|instance| instance.find_by_id_mut(element_id))
        {
            Some(element) => {
                element.set_attribute(name, value);
                true
            }
            None => false,
        }
    }

    fn set_stylesheet(&mut self, href: Option<&str>) {
        self.stylesheet = href.map(str::to_string);
    }

    fn stylesheet(&self) -> Option<String> {
        self.stylesheet.clone()
    }

    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, fragment: &str) {
        self.fragment = fragment.to_string();
    }

    fn populate_skin_selector(&mut self, entries: Vec<SelectorEntry>, current: &str) {
        self.selector.populate(entries, current);
    }

    fn select_skin(&mut self, value: &str) {
        self.selector.select(value);
    }

    fn toggle_settings(&mut self) -> bool {
        self.settings.toggle()
    }
}
