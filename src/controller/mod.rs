//! # Controller Input Module
//!
//! Reads connected gamepads and presents them as per-frame samples in the
//! standard layout (see [`layout`]).
//!
//! This module handles:
//! - Device discovery and hotplug via Linux evdev
//! - Slot index assignment (lowest free index on connect)
//! - Normalizing raw axis/key state into `[0,1]` buttons and `[-1,1]` axes

pub mod gamepad;
pub mod layout;

/// One frame of input from a connected device.
///
/// Samples are read fresh every frame and never retained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSample {
    /// Slot index; stable while the device stays connected.
    pub index: usize,
    /// Button pressures, `0.0..=1.0` (digital buttons report 0 or 1).
    pub buttons: Vec<f32>,
    /// Axis values, `-1.0..=1.0`.
    pub axes: Vec<f32>,
}

impl DeviceSample {
    /// Sample with all buttons released and sticks centered.
    #[must_use]
    pub fn idle(index: usize) -> Self {
        Self {
            index,
            buttons: vec![0.0; layout::BUTTON_COUNT],
            axes: vec![0.0; layout::AXIS_COUNT],
        }
    }
}

/// Attach/detach notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    Connected(usize),
    Disconnected(usize),
}

/// Source of gamepad samples and hotplug events.
pub trait GamepadSource {
    /// Slot indices of all connected devices, ascending.
    fn connected(&self) -> Vec<usize>;

    /// Current state of every connected device, ascending by index.
    fn snapshot(&mut self) -> Vec<DeviceSample>;

    /// Looks for attached and detached devices since the last call.
    fn rescan(&mut self) -> Vec<DeviceEvent>;
}
