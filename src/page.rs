//! # Page Surface
//!
//! The host page the viewer draws into. The page owns:
//!
//! - a "no controller" placeholder
//! - one visual instance per connected device (a clone of the skin template)
//! - the skin stylesheet link
//! - the settings panel with its toggle button and skin selector
//! - the location fragment that persists the configuration
//!
//! Element lookups inside an instance never fail loudly: a write to a missing
//! element returns `false` and changes nothing.

use crate::skin::catalog::SelectorEntry;
use crate::skin::loader::Template;

/// Page operations used by the viewer.
pub trait Page {
    /// Shows or hides the "no controller" placeholder.
    fn set_placeholder_visible(&mut self, visible: bool);

    fn placeholder_visible(&self) -> bool;

    /// Clones `template`, gives the clone id `instance_id` and appends it.
    fn attach_instance(&mut self, instance_id: &str, template: &Template);

    /// Removes an instance. Returns false if there was none.
    fn remove_instance(&mut self, instance_id: &str) -> bool;

    /// Ids of all attached instances, in attach order.
    fn instance_ids(&self) -> Vec<String>;

    /// Reads an attribute of an element inside an instance.
    fn element_attribute(&self, instance_id: &str, element_id: &str, name: &str) -> Option<String>;

    /// Writes an attribute of an element inside an instance.
    /// Returns false if the instance or element does not exist.
    fn set_element_attribute(
        &mut self,
        instance_id: &str,
        element_id: &str,
        name: &str,
        value: &str,
    ) -> bool;

    /// Replaces the skin stylesheet link; `None` removes it.
    fn set_stylesheet(&mut self, href: Option<&str>);

    fn stylesheet(&self) -> Option<String>;

    /// Current location fragment, including its `#!` prefix.
    fn fragment(&self) -> String;

    fn set_fragment(&mut self, fragment: &str);

    /// Fills the skin selector and selects `current`.
    fn populate_skin_selector(&mut self, entries: Vec<SelectorEntry>, current: &str);

    /// Moves the skin selector to `value`.
    fn select_skin(&mut self, value: &str);

    /// Shows or hides the settings panel; returns the new visibility.
    fn toggle_settings(&mut self) -> bool;
}
