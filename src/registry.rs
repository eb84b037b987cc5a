//! # Device Registry
//!
//! Tracks which devices have a visual instance on the page and keeps it at
//! exactly one instance per connected slot.

use std::collections::BTreeSet;
use tracing::debug;

use crate::page::Page;
use crate::skin::loader::Template;

/// Element id of the visual instance for a device slot.
///
/// ```
/// assert_eq!(gamergrip::registry::instance_id(3), "gamepad-3");
/// ```
#[must_use]
pub fn instance_id(index: usize) -> String {
    format!("gamepad-{}", index)
}

/// Set of device slots that currently have an instance.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    instances: BTreeSet<usize>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the instance for a newly connected device.
    ///
    /// Without a template nothing is created; [`DeviceRegistry::add_all`] will
    /// create it once one is loaded. An existing instance for the slot is
    /// replaced. Returns true if an instance was attached.
    pub fn connect<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        template: Option<&Template>,
        index: usize,
    ) -> bool {
        let Some(template) = template else {
            debug!("No template yet, deferring instance for device {}", index);
            return false;
        };

        let id = instance_id(index);
        if self.instances.contains(&index) {
            page.remove_instance(&id);
        }
        page.attach_instance(&id, template);
        self.instances.insert(index);
        true
    }

    /// Removes a device's instance. Returns false if it had none.
    pub fn disconnect<P: Page + ?Sized>(&mut self, page: &mut P, index: usize) -> bool {
        let had = self.instances.remove(&index);
        let removed = page.remove_instance(&instance_id(index));
        had || removed
    }

    /// Removes every instance.
    pub fn remove_all<P: Page + ?Sized>(&mut self, page: &mut P) {
        for index in std::mem::take(&mut self.instances) {
            page.remove_instance(&instance_id(index));
        }
    }

    /// Creates instances for all connected slots.
    pub fn add_all<P: Page + ?Sized>(
        &mut self,
        page: &mut P,
        template: Option<&Template>,
        connected: &[usize],
    ) -> usize {
        connected
            .iter()
            .filter(|&&index| self.connect(page, template, index))
            .count()
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.instances.contains(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Slots with an instance, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.instances.iter().copied()
    }
}
