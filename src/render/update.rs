//! # Per-Device Visual Update
//!
//! Turns one [`DeviceSample`] into the attribute writes for its visual
//! instance.
//!
//! ## Pipeline
//!
//! 1. Axes below the dead-zone snap to exactly `0.0`.
//! 2. Axes pair into sticks (`ls` = axes 0/1, `rs` = axes 2/3).
//! 3. Each stick moves its `<stick>` group by `(x, y) * 0.75 * r`, `r` being
//!    the radius of `<stick>-hilight`, and lights that hilight by `|(x, y)|`.
//! 4. Stick components also press virtual direction buttons:
//!    `<stick>u`, `<stick>d`, `<stick>l`, `<stick>r`.
//! 5. Buttons light `<name>-hilight` by their pressure.
//!
//! Writes to elements the skin does not have are skipped one by one.
//!
//! ```
//! use gamergrip::controller::DeviceSample;
//! use gamergrip::render::update::plan_update;
//!
//! let mut sample = DeviceSample::idle(0);
//! sample.buttons[0] = 1.0;
//! sample.axes[0] = 0.1; // inside the dead-zone
//!
//! let writes = plan_update(&sample, 0.25, |_| Some(10.0));
//! assert!(writes.iter().any(|w| w.element == "b0-hilight" && w.value == "fill-opacity:1"));
//! assert!(writes.iter().any(|w| w.element == "ls" && w.value == "translate(0 0)"));
//! ```

use crate::controller::layout::{axis_mapping, button_name, Direction, Stick};
use crate::controller::DeviceSample;
use crate::page::Page;

/// Share of the hilight radius a fully deflected stick travels.
pub const STICK_TRAVEL: f32 = 0.75;

/// Suffix of the element lit by a button or direction.
pub const HILIGHT_SUFFIX: &str = "-hilight";

/// A single attribute assignment on an element inside an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeWrite {
    pub element: String,
    pub attribute: &'static str,
    pub value: String,
}

impl AttributeWrite {
    fn opacity(element: String, opacity: f32) -> Self {
        Self {
            element,
            attribute: "style",
            value: format!("fill-opacity:{}", opacity),
        }
    }

    fn translate(element: String, x: f32, y: f32) -> Self {
        Self {
            element,
            attribute: "transform",
            // + 0.0 turns -0 into 0
            value: format!("translate({} {})", x + 0.0, y + 0.0),
        }
    }
}

/// Processed position of one stick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickPosition {
    pub x: f32,
    pub y: f32,
}

impl StickPosition {
    /// Euclidean deflection. Diagonals can exceed 1.0.
    #[must_use]
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Pressures of the two virtual buttons an axis drives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisPressure {
    /// Up (y) or left (x).
    pub negative: f32,
    /// Down (y) or right (x).
    pub positive: f32,
}

impl AxisPressure {
    /// Splits a signed axis value; at most one side is nonzero.
    #[must_use]
    pub fn from_axis(value: f32) -> Self {
        Self {
            negative: if value < 0.0 { -value } else { 0.0 },
            positive: if value > 0.0 { value } else { 0.0 },
        }
    }
}

/// Snaps values inside `(-deadzone, deadzone)` to zero.
///
/// ```
/// use gamergrip::render::update::apply_deadzone;
///
/// assert_eq!(apply_deadzone(0.2, 0.25), 0.0);
/// assert_eq!(apply_deadzone(-0.3, 0.25), -0.3);
/// ```
#[must_use]
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        value
    }
}

/// Element lit by a button or direction.
#[must_use]
pub fn hilight_id(name: &str) -> String {
    format!("{}{}", name, HILIGHT_SUFFIX)
}

/// Computes every attribute write for a sample.
///
/// `hilight_radius` returns the radius of a stick's hilight element
/// (`ls-hilight`, `rs-hilight`), or `None` if it has no usable `r`. The
/// stick then stays centered, but its hilight is still lit.
pub fn plan_update<F>(sample: &DeviceSample, deadzone: f32, hilight_radius: F) -> Vec<AttributeWrite>
where
    F: Fn(&str) -> Option<f32>,
{
    let mut sticks = [StickPosition::default(); 2];
    let mut writes = Vec::new();

    for (name, pressure) in sample
        .buttons
        .iter()
        .enumerate()
        .filter_map(|(i, &pressure)| button_name(i).map(|name| (name, pressure)))
    {
        writes.push(AttributeWrite::opacity(hilight_id(name), pressure));
    }

    for (i, &raw) in sample.axes.iter().enumerate() {
        let Some((stick, direction)) = axis_mapping(i) else {
            continue;
        };
        let value = apply_deadzone(raw, deadzone);
        let position = &mut sticks[stick_slot(stick)];
        let pressure = AxisPressure::from_axis(value);
        let (negative, positive) = match direction {
            Direction::X => {
                position.x = value;
                ('l', 'r')
            }
            Direction::Y => {
                position.y = value;
                ('u', 'd')
            }
        };
        writes.push(AttributeWrite::opacity(
            hilight_id(&format!("{}{}", stick.prefix(), negative)),
            pressure.negative,
        ));
        writes.push(AttributeWrite::opacity(
            hilight_id(&format!("{}{}", stick.prefix(), positive)),
            pressure.positive,
        ));
    }

    for stick in Stick::ALL {
        let position = sticks[stick_slot(stick)];
        let hilight = hilight_id(stick.prefix());
        let travel = hilight_radius(&hilight).map_or(0.0, |radius| radius * STICK_TRAVEL);
        writes.push(AttributeWrite::opacity(hilight, position.magnitude()));
        writes.push(AttributeWrite::translate(
            stick.prefix().to_string(),
            position.x * travel,
            position.y * travel,
        ));
    }

    writes
}

/// Redraws one device's instance. Returns how many writes landed.
pub fn apply_update<P: Page + ?Sized>(
    page: &mut P,
    instance_id: &str,
    sample: &DeviceSample,
    deadzone: f32,
) -> usize {
    let writes = plan_update(sample, deadzone, |element| {
        page.element_attribute(instance_id, element, "r")
            .and_then(|r| parse_length(&r))
    });

    writes
        .iter()
        .filter(|write| {
            page.set_element_attribute(instance_id, &write.element, write.attribute, &write.value)
        })
        .count()
}

/// Reads an SVG length such as `12`, `12.5px` or ` 8 `. Units other than
/// `px` are not converted.
fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim_end()
        .parse()
        .ok()
        .filter(|r: &f32| r.is_finite())
}

fn stick_slot(stick: Stick) -> usize {
    match stick {
        Stick::Left => 0,
        Stick::Right => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::document::Document;
    use crate::skin::loader::Template;

    fn find<'a>(writes: &'a [AttributeWrite], element: &str) -> Option<&'a AttributeWrite> {
        writes.iter().find(|w| w.element == element)
    }

    #[test]
    fn test_deadzone_snaps_to_exact_zero() {
        for value in [-0.2499, -0.1, -0.0, 0.0, 0.1, 0.2499] {
            assert_eq!(apply_deadzone(value, 0.25), 0.0);
        }
    }

    #[test]
    fn test_deadzone_boundary_passes_through() {
        assert_eq!(apply_deadzone(0.25, 0.25), 0.25);
        assert_eq!(apply_deadzone(-1.0, 0.25), -1.0);
    }

    #[test]
    fn test_zero_deadzone_passes_everything() {
        assert_eq!(apply_deadzone(0.001, 0.0), 0.001);
    }

    #[test]
    fn test_axis_pressure_is_one_sided() {
        for value in [-1.0, -0.5, -0.01, 0.0, 0.01, 0.5, 1.0] {
            let p = AxisPressure::from_axis(value);
            assert!(p.negative == 0.0 || p.positive == 0.0, "both sides set for {}", value);
            assert_eq!(p.negative + p.positive, f32::abs(value));
        }
    }

    #[test]
    fn test_magnitude_is_unclamped_on_diagonal() {
        let position = StickPosition { x: 1.0, y: 1.0 };
        assert!((position.magnitude() - std::f32::consts::SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_buttons_drive_hilights() {
        let mut sample = DeviceSample::idle(0);
        sample.buttons[4] = 1.0;
        sample.buttons[7] = 0.5;

        let writes = plan_update(&sample, 0.25, |_| None);
        assert_eq!(find(&writes, "l1-hilight").unwrap().value, "fill-opacity:1");
        assert_eq!(find(&writes, "r2-hilight").unwrap().value, "fill-opacity:0.5");
        assert_eq!(find(&writes, "b0-hilight").unwrap().value, "fill-opacity:0");
    }

    #[test]
    fn test_extra_buttons_and_axes_are_ignored() {
        let sample = DeviceSample {
            index: 0,
            buttons: vec![1.0; 20],
            axes: vec![0.5; 6],
        };
        let writes = plan_update(&sample, 0.0, |_| None);
        // 17 buttons + 4 axes * 2 directions + 2 sticks * (hilight, translation)
        assert_eq!(writes.len(), 17 + 8 + 4);
    }

    #[test]
    fn test_stick_directions() {
        let mut sample = DeviceSample::idle(0);
        sample.axes = vec![-0.8, 0.6, 0.0, -1.0];

        let writes = plan_update(&sample, 0.25, |_| None);
        assert_eq!(find(&writes, "lsl-hilight").unwrap().value, "fill-opacity:0.8");
        assert_eq!(find(&writes, "lsr-hilight").unwrap().value, "fill-opacity:0");
        assert_eq!(find(&writes, "lsd-hilight").unwrap().value, "fill-opacity:0.6");
        assert_eq!(find(&writes, "lsu-hilight").unwrap().value, "fill-opacity:0");
        assert_eq!(find(&writes, "rsu-hilight").unwrap().value, "fill-opacity:1");
        assert_eq!(find(&writes, "rsd-hilight").unwrap().value, "fill-opacity:0");
    }

    #[test]
    fn test_stick_translation_uses_hilight_radius() {
        let mut sample = DeviceSample::idle(0);
        sample.axes = vec![1.0, -0.5, 0.0, 0.0];

        let writes = plan_update(&sample, 0.25, |id| (id == "ls-hilight").then_some(20.0));
        // 20 * 0.75 = 15
        assert_eq!(find(&writes, "ls").unwrap().value, "translate(15 -7.5)");
        assert_eq!(find(&writes, "rs").unwrap().value, "translate(0 0)");
        assert_eq!(find(&writes, "rs-hilight").unwrap().value, "fill-opacity:0");

        let magnitude = find(&writes, "ls-hilight").unwrap();
        assert_eq!(magnitude.attribute, "style");
        assert!(magnitude.value.starts_with("fill-opacity:1.118"));
    }

    #[test]
    fn test_unknown_radius_means_no_travel_but_still_lights() {
        let mut sample = DeviceSample::idle(0);
        sample.axes = vec![1.0, 0.0, 0.0, 1.0];

        let writes = plan_update(&sample, 0.0, |_| None);
        assert_eq!(find(&writes, "ls").unwrap().value, "translate(0 0)");
        assert_eq!(find(&writes, "rs").unwrap().value, "translate(0 0)");
        assert_eq!(find(&writes, "ls-hilight").unwrap().value, "fill-opacity:1");
        assert_eq!(find(&writes, "rs-hilight").unwrap().value, "fill-opacity:1");
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("12"), Some(12.0));
        assert_eq!(parse_length(" 12.5px "), Some(12.5));
        assert_eq!(parse_length("12 px"), Some(12.0));
        assert_eq!(parse_length("1em"), None);
        assert_eq!(parse_length("NaN"), None);
        assert_eq!(parse_length(""), None);
    }

    #[test]
    fn test_apply_update_lights_hilight_without_plain_radius() {
        let template = Template::from_svg(
            "psx",
            r#"<svg><g id="ls"/><circle id="ls-hilight" r="12px"/><g id="rs"/><ellipse id="rs-hilight" rx="5" ry="3"/></svg>"#,
        )
        .unwrap();
        let mut page = Document::new();
        page.attach_instance("gamepad-0", &template);

        let mut sample = DeviceSample::idle(0);
        sample.axes = vec![1.0, 0.0, 1.0, 0.0];
        apply_update(&mut page, "gamepad-0", &sample, 0.25);

        let attr = |element: &str, name: &str| page.element_attribute("gamepad-0", element, name);
        assert_eq!(attr("ls-hilight", "style").as_deref(), Some("fill-opacity:1"));
        assert_eq!(attr("rs-hilight", "style").as_deref(), Some("fill-opacity:1"));
        // 12 * 0.75 = 9
        assert_eq!(attr("ls", "transform").as_deref(), Some("translate(9 0)"));
        assert_eq!(attr("rs", "transform").as_deref(), Some("translate(0 0)"));
    }

    #[test]
    fn test_apply_update_skips_missing_elements() {
        let template = Template::from_svg("psx", r#"<svg><circle id="b0-hilight"/></svg>"#).unwrap();
        let mut page = Document::new();
        page.attach_instance("gamepad-0", &template);

        let landed = apply_update(&mut page, "gamepad-0", &DeviceSample::idle(0), 0.25);
        assert_eq!(landed, 1);
        assert_eq!(
            page.element_attribute("gamepad-0", "b0-hilight", "style").as_deref(),
            Some("fill-opacity:0")
        );
    }

    #[test]
    fn test_deadzone_applies_before_directions() {
        let mut sample = DeviceSample::idle(0);
        sample.axes = vec![0.2, -0.2, 0.0, 0.0];

        let writes = plan_update(&sample, 0.25, |_| Some(10.0));
        for id in ["lsl-hilight", "lsr-hilight", "lsu-hilight", "lsd-hilight", "ls-hilight"] {
            assert_eq!(find(&writes, id).unwrap().value, "fill-opacity:0", "{}", id);
        }
        assert_eq!(find(&writes, "ls").unwrap().value, "translate(0 0)");
    }

    #[test]
    fn test_no_axes_still_centers_sticks() {
        let sample = DeviceSample {
            index: 1,
            buttons: vec![],
            axes: vec![],
        };
        let writes = plan_update(&sample, 0.25, |_| None);
        assert_eq!(writes.len(), 4);
    }
}
