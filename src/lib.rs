//! Anchored popovers for terminal UIs.
//!
//! A popover is an [`overlay::Activation`] (open flag, target, preferred side)
//! rendered by an [`overlay::OverlaySurface`] that positions a floating panel
//! beside its target with [`geometry::compute_offset`], traps focus inside the
//! panel, locks background scrolling and lifts the target above the backdrop.
//! The surface talks to its environment only through the capability traits in
//! [`host`]; [`scene::Scene`] is the in-memory implementation used by the demo
//! binary and the tests.

pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod host;
pub mod keybindings;
pub mod overlay;
pub mod runner;
pub mod scene;
pub mod theme;
pub mod tour;
pub mod tracing_sub;
pub mod ui;

pub use error::{OverlayError, Result};
pub use geometry::{Offset, PreferredPosition, Rect, Spacing, Viewport, compute_offset};
