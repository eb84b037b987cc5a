//! # Standard Gamepad Layout
//!
//! Fixed index tables that tie sample slots to skin element names.
//!
//! ## Buttons
//!
//! | Index | Element | Typical button |
//! |-------|---------|----------------|
//! | 0-3 | `b0`-`b3` | Face buttons (bottom, right, left, top) |
//! | 4, 5 | `l1`, `r1` | Shoulders |
//! | 6, 7 | `l2`, `r2` | Triggers |
//! | 8, 9 | `select`, `start` | Menu buttons |
//! | 10, 11 | `l3`, `r3` | Stick clicks |
//! | 12-15 | `du`, `dd`, `dl`, `dr` | D-Pad |
//! | 16 | `vendor` | Home/PS/Guide |
//!
//! ## Axes
//!
//! | Index | Stick | Axis |
//! |-------|-------|------|
//! | 0 | `ls` | x |
//! | 1 | `ls` | y |
//! | 2 | `rs` | x |
//! | 3 | `rs` | y |

/// Element names for buttons, by sample index.
pub const BUTTON_NAMES: [&str; 17] = [
    "b0", "b1", "b2", "b3", "l1", "r1", "l2", "r2", "select", "start", "l3", "r3", "du", "dd",
    "dl", "dr", "vendor",
];

/// Number of buttons in the standard layout.
pub const BUTTON_COUNT: usize = BUTTON_NAMES.len();

/// Number of axes in the standard layout.
pub const AXIS_COUNT: usize = AXIS_MAP.len();

/// Analog sticks drawn by a skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stick {
    Left,
    Right,
}

impl Stick {
    /// Both sticks, in drawing order.
    pub const ALL: [Stick; 2] = [Stick::Left, Stick::Right];

    /// Element id prefix (`ls` / `rs`).
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Stick::Left => "ls",
            Stick::Right => "rs",
        }
    }
}

/// Component of a stick an axis drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    X,
    Y,
}

/// Axis index to `(stick, direction)`.
pub const AXIS_MAP: [(Stick, Direction); 4] = [
    (Stick::Left, Direction::X),
    (Stick::Left, Direction::Y),
    (Stick::Right, Direction::X),
    (Stick::Right, Direction::Y),
];

/// Element name for a button index, if it has one.
#[must_use]
pub fn button_name(index: usize) -> Option<&'static str> {
    BUTTON_NAMES.get(index).copied()
}

/// Stick component for an axis index, if it has one.
#[must_use]
pub fn axis_mapping(index: usize) -> Option<(Stick, Direction)> {
    AXIS_MAP.get(index).copied()
}
