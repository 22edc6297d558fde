// src/lib.rs
//! Teapot Rig
//!
//! Two transform hierarchies sharing one mesh: an articulated figure whose
//! knee bends, and a ball that drops to the floor and then rolls along it.
//! The animation advances one step per input event; every frame the
//! hierarchies are evaluated depth-first and each node is drawn with its
//! global transform.

pub mod app;
pub mod config;
pub mod error;
pub mod frame;
pub mod gfx;
pub mod math;
pub mod scene;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::TeapotRigApp;
pub use config::{AppConfig, MeshSource};
pub use error::SetupError;

/// Runs the application with settings taken from the environment
pub fn run_default() -> Result<(), SetupError> {
    TeapotRigApp::new(AppConfig::from_env()).run()
}
