//! # Render Module
//!
//! Per-frame redraw of visual instances.
//!
//! This module handles:
//! - Frame pacing with an explicit start/stop handle
//! - Mapping device samples onto skin element attributes

pub mod frame_clock;
pub mod update;
