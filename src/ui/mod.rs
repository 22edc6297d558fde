//! # User Interface Module
//!
//! Dear ImGui overlay shown on top of the scene. The overlay mirrors the
//! keyboard controls with buttons and shows the animation state.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`panel`] - the animation control panel
//!
//! The overlay is optional; with it hidden the keyboard still drives the
//! animation.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{animation_panel, PanelStats};
