//! # GamerGrip Library
//!
//! Live, skinnable view of connected game controllers.
//!
//! Each connected gamepad gets its own copy of an SVG controller template.
//! Every frame, button pressure and stick positions are written onto that
//! copy as opacity and translation attributes. Skins are chosen from a fixed
//! catalog and persisted in the page's `#!skin=..&deadzone=..` fragment.

pub mod app;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod options;
pub mod page;
pub mod registry;
pub mod render;
pub mod settings;
pub mod skin;
pub mod snapshot;
pub mod viewer;
