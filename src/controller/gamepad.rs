//! # Evdev Gamepad Source
//!
//! Detects gamepads through the Linux evdev interface and reads their state on
//! demand, one snapshot per frame.
//!
//! ## Detection
//!
//! Every `/dev/input/event*` node is opened once; nodes exposing `BTN_SOUTH`
//! are treated as gamepads. Each new gamepad takes the lowest free slot
//! index, so a pad that reconnects usually gets its old index back.
//!
//! ## Axis Profiles
//!
//! | Profile | Left stick | Right stick | Triggers |
//! |---------|------------|-------------|----------|
//! | Xpad (default) | ABS_X / ABS_Y | ABS_RX / ABS_RY | ABS_Z / ABS_RZ |
//! | DualSense | ABS_X / ABS_Y | ABS_Z / ABS_RZ | ABS_RX / ABS_RY |
//!
//! The DualSense is identified by vendor 0x054c, product 0x0ce6. Hat switches
//! (ABS_HAT0X / ABS_HAT0Y) feed the d-pad buttons alongside `BTN_DPAD_*`.

use evdev::{AbsoluteAxisType, Device, Key};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::layout::BUTTON_COUNT;
use super::{DeviceEvent, DeviceSample, GamepadSource};
use crate::error::{GamerGripError, Result};

/// PS5 DualSense vendor ID (Sony)
const DUALSENSE_VENDOR_ID: u16 = 0x054c;

/// PS5 DualSense product ID (wired and Bluetooth)
const DUALSENSE_PRODUCT_ID: u16 = 0x0ce6;

/// Directory scanned for event nodes
const INPUT_DIR: &str = "/dev/input";

/// Digital buttons by standard layout index.
const BUTTON_KEYS: [(usize, Key); BUTTON_COUNT] = [
    (0, Key::BTN_SOUTH),
    (1, Key::BTN_EAST),
    (2, Key::BTN_WEST),
    (3, Key::BTN_NORTH),
    (4, Key::BTN_TL),
    (5, Key::BTN_TR),
    (6, Key::BTN_TL2),
    (7, Key::BTN_TR2),
    (8, Key::BTN_SELECT),
    (9, Key::BTN_START),
    (10, Key::BTN_THUMBL),
    (11, Key::BTN_THUMBR),
    (12, Key::BTN_DPAD_UP),
    (13, Key::BTN_DPAD_DOWN),
    (14, Key::BTN_DPAD_LEFT),
    (15, Key::BTN_DPAD_RIGHT),
    (16, Key::BTN_MODE),
];

/// Axis code assignment for a family of controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisProfile {
    Xpad,
    DualSense,
}

impl AxisProfile {
    /// Picks the profile for a vendor/product pair.
    #[must_use]
    pub fn detect(vendor: u16, product: u16) -> Self {
        if vendor == DUALSENSE_VENDOR_ID && product == DUALSENSE_PRODUCT_ID {
            AxisProfile::DualSense
        } else {
            AxisProfile::Xpad
        }
    }

    /// Stick axes in standard order: left x, left y, right x, right y.
    #[must_use]
    pub fn stick_axes(self) -> [AbsoluteAxisType; 4] {
        match self {
            AxisProfile::Xpad => [
                AbsoluteAxisType::ABS_X,
                AbsoluteAxisType::ABS_Y,
                AbsoluteAxisType::ABS_RX,
                AbsoluteAxisType::ABS_RY,
            ],
            AxisProfile::DualSense => [
                AbsoluteAxisType::ABS_X,
                AbsoluteAxisType::ABS_Y,
                AbsoluteAxisType::ABS_Z,
                AbsoluteAxisType::ABS_RZ,
            ],
        }
    }

    /// Analog trigger axes: left, right.
    #[must_use]
    pub fn trigger_axes(self) -> [AbsoluteAxisType; 2] {
        match self {
            AxisProfile::Xpad => [AbsoluteAxisType::ABS_Z, AbsoluteAxisType::ABS_RZ],
            AxisProfile::DualSense => [AbsoluteAxisType::ABS_RX, AbsoluteAxisType::ABS_RY],
        }
    }
}

/// Maps a raw stick value in `min..=max` to `-1.0..=1.0`.
#[must_use]
pub fn normalize_stick(value: i32, min: i32, max: i32) -> f32 {
    if max <= min {
        return 0.0;
    }
    let t = span_fraction(value, min, max);
    (t * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// Maps a raw trigger value in `min..=max` to `0.0..=1.0`.
#[must_use]
pub fn normalize_trigger(value: i32, min: i32, max: i32) -> f32 {
    if max <= min {
        return 0.0;
    }
    span_fraction(value, min, max).clamp(0.0, 1.0)
}

/// Position of `value` within `min..=max`, computed in i64 so full-range
/// absinfo cannot overflow.
fn span_fraction(value: i32, min: i32, max: i32) -> f32 {
    let offset = i64::from(value) - i64::from(min);
    let span = i64::from(max) - i64::from(min);
    (offset as f64 / span as f64) as f32
}

/// Raises a button to `pressure`. A digital press is never lowered by an
/// analog reading of the same button.
fn press(buttons: &mut [f32], slot: usize, pressure: f32) {
    if let Some(value) = buttons.get_mut(slot) {
        *value = value.max(pressure);
    }
}

/// Splits a hat value into `(negative, positive)` pressures.
#[must_use]
pub fn split_hat(value: i32) -> (f32, f32) {
    match value.signum() {
        -1 => (1.0, 0.0),
        1 => (0.0, 1.0),
        _ => (0.0, 0.0),
    }
}

/// Where to look for gamepads.
#[derive(Debug, Clone)]
enum Search {
    Scan(PathBuf),
    Fixed(Vec<PathBuf>),
}

/// An open gamepad occupying a slot.
struct Pad {
    path: PathBuf,
    device: Device,
    profile: AxisProfile,
    failed: bool,
}

/// Gamepads attached through evdev.
pub struct EvdevGamepads {
    search: Search,
    pads: BTreeMap<usize, Pad>,
    ignored: HashSet<PathBuf>,
}

impl std::fmt::Debug for EvdevGamepads {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevGamepads")
            .field("search", &self.search)
            .field("connected", &self.pads.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl EvdevGamepads {
    /// Source that scans `/dev/input` on every rescan.
    ///
    /// # Errors
    ///
    /// Returns `Controller` error if `/dev/input` does not exist.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamergrip::controller::gamepad::EvdevGamepads;
    /// use gamergrip::controller::GamepadSource;
    ///
    /// let mut pads = EvdevGamepads::scan()?;
    /// for event in pads.rescan() {
    ///     println!("{:?}", event);
    /// }
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn scan() -> Result<Self> {
        let input_dir = Path::new(INPUT_DIR);
        if !input_dir.exists() {
            return Err(GamerGripError::Controller(format!(
                "{} directory not found",
                INPUT_DIR
            )));
        }
        Ok(Self::with_search(Search::Scan(input_dir.to_path_buf())))
    }

    /// Source limited to the given event nodes.
    #[must_use]
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self::with_search(Search::Fixed(paths))
    }

    fn with_search(search: Search) -> Self {
        Self {
            search,
            pads: BTreeMap::new(),
            ignored: HashSet::new(),
        }
    }

    /// Event node path of the device in a slot.
    #[must_use]
    pub fn device_path(&self, index: usize) -> Option<&Path> {
        self.pads.get(&index).map(|pad| pad.path.as_path())
    }

    /// Lists candidate event nodes, sorted for deterministic slot assignment.
    fn candidates(&self) -> Vec<PathBuf> {
        match &self.search {
            Search::Fixed(paths) => paths.clone(),
            Search::Scan(dir) => {
                let entries = match std::fs::read_dir(dir) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!("Failed to read {}: {}", dir.display(), e);
                        return Vec::new();
                    }
                };
                let mut paths: Vec<PathBuf> = entries
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|path| {
                        path.file_name()
                            .is_some_and(|name| name.to_string_lossy().starts_with("event"))
                    })
                    .collect();
                paths.sort();
                paths
            }
        }
    }

    fn lowest_free_index(&self) -> usize {
        (0..).find(|i| !self.pads.contains_key(i)).unwrap_or_default()
    }

    fn read_sample(index: usize, pad: &Pad) -> std::io::Result<DeviceSample> {
        let keys = pad.device.get_key_state()?;
        let abs = pad.device.get_abs_state()?;
        let supported = pad.device.supported_absolute_axes();
        let has_axis = |axis: AbsoluteAxisType| supported.is_some_and(|set| set.contains(axis));
        let info = |axis: AbsoluteAxisType| abs.get(axis.0 as usize).filter(|_| has_axis(axis));

        let mut buttons = vec![0.0f32; BUTTON_COUNT];
        for (slot, key) in BUTTON_KEYS {
            if keys.contains(key) {
                press(&mut buttons, slot, 1.0);
            }
        }

        for (slot, axis) in [6, 7].into_iter().zip(pad.profile.trigger_axes()) {
            if let Some(info) = info(axis) {
                let pressure = normalize_trigger(info.value, info.minimum, info.maximum);
                press(&mut buttons, slot, pressure);
            }
        }

        for (slots, axis) in [
            ((12, 13), AbsoluteAxisType::ABS_HAT0Y),
            ((14, 15), AbsoluteAxisType::ABS_HAT0X),
        ] {
            if let Some(info) = info(axis) {
                let (negative, positive) = split_hat(info.value);
                press(&mut buttons, slots.0, negative);
                press(&mut buttons, slots.1, positive);
            }
        }

        let axes = pad
            .profile
            .stick_axes()
            .into_iter()
            .map(|axis| {
                info(axis).map_or(0.0, |info| {
                    normalize_stick(info.value, info.minimum, info.maximum)
                })
            })
            .collect();

        Ok(DeviceSample {
            index,
            buttons,
            axes,
        })
    }
}

impl GamepadSource for EvdevGamepads {
    fn connected(&self) -> Vec<usize> {
        self.pads.keys().copied().collect()
    }

    fn snapshot(&mut self) -> Vec<DeviceSample> {
        let mut samples = Vec::with_capacity(self.pads.len());
        for (&index, pad) in self.pads.iter_mut() {
            if pad.failed {
                continue;
            }
            match Self::read_sample(index, pad) {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    warn!("Lost gamepad {} at {}: {}", index, pad.path.display(), e);
                    pad.failed = true;
                }
            }
        }
        samples
    }

    fn rescan(&mut self) -> Vec<DeviceEvent> {
        let mut events = Vec::new();

        let gone: Vec<usize> = self
            .pads
            .iter()
            .filter(|(_, pad)| pad.failed || !pad.path.exists())
            .map(|(&index, _)| index)
            .collect();
        for index in gone {
            if let Some(pad) = self.pads.remove(&index) {
                info!("Gamepad {} disconnected ({})", index, pad.path.display());
                events.push(DeviceEvent::Disconnected(index));
            }
        }

        self.ignored.retain(|path| path.exists());

        for path in self.candidates() {
            if self.ignored.contains(&path) || self.pads.values().any(|pad| pad.path == path) {
                continue;
            }

            let device = match Device::open(&path) {
                Ok(device) => device,
                Err(e) => {
                    // Permission denied or node vanished - retry on next rescan
                    debug!("Could not open {}: {}", path.display(), e);
                    continue;
                }
            };

            let is_gamepad = device
                .supported_keys()
                .is_some_and(|keys| keys.contains(Key::BTN_SOUTH));
            if !is_gamepad {
                debug!("Skipping non-gamepad input device {}", path.display());
                self.ignored.insert(path);
                continue;
            }

            let id = device.input_id();
            let profile = AxisProfile::detect(id.vendor(), id.product());
            let index = self.lowest_free_index();
            info!(
                "Gamepad {} connected: {} at {} (vendor: 0x{:04x}, product: 0x{:04x}, {:?})",
                index,
                device.name().unwrap_or("unnamed"),
                path.display(),
                id.vendor(),
                id.product(),
                profile
            );

            self.pads.insert(
                index,
                Pad {
                    path,
                    device,
                    profile,
                    failed: false,
                },
            );
            events.push(DeviceEvent::Connected(index));
        }

        events
    }
}
