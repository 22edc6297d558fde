//! Application configuration
//!
//! Defaults reproduce the reference scene: an 800x600 window, grey
//! background, 90 degree field of view and the sphere mesh. The OBJ teapot
//! asset and the overlay can be selected through the environment.

use std::path::PathBuf;

use crate::scene::{AnimationConfig, CameraRig};

/// Path to the OBJ asset used as the shared mesh
pub const MESH_ENV: &str = "TEAPOT_RIG_MESH";
/// `0` or `false` hides the overlay
pub const OVERLAY_ENV: &str = "TEAPOT_RIG_OVERLAY";

/// Where the shared mesh comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshSource {
    /// Procedural UV sphere of the given radius
    Sphere { radius: f32 },
    /// Fixed triangle mesh loaded once at start-up
    Obj(PathBuf),
}

impl Default for MeshSource {
    fn default() -> Self {
        MeshSource::Sphere { radius: 3.0 }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f64; 4],
    pub camera: CameraRig,
    pub animation: AnimationConfig,
    pub mesh: MeshSource,
    pub show_overlay: bool,
    pub vsync: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Teapot Hierarchy".to_string(),
            width: 800,
            height: 600,
            clear_color: [0.5, 0.5, 0.5, 1.0],
            camera: CameraRig::default(),
            animation: AnimationConfig::default(),
            mesh: MeshSource::default(),
            show_overlay: true,
            vsync: true,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by [`MESH_ENV`] and [`OVERLAY_ENV`].
    pub fn from_env() -> Self {
        Self::default().with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(MESH_ENV).filter(|p| !p.trim().is_empty()) {
            self.mesh = MeshSource::Obj(PathBuf::from(path));
        }
        if let Some(flag) = lookup(OVERLAY_ENV) {
            self.show_overlay = !matches!(flag.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off");
        }
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_mesh(mut self, mesh: MeshSource) -> Self {
        self.mesh = mesh;
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_camera(mut self, camera: CameraRig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_overlay(mut self, show: bool) -> Self {
        self.show_overlay = show;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_clear_color(mut self, rgba: [f64; 4]) -> Self {
        self.clear_color = rgba;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.camera.fov_y, 90.0);
        assert_eq!(config.animation.resting_height, 20.0);
        assert!(matches!(config.mesh, MeshSource::Sphere { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default().with_env_lookup(|key| match key {
            MESH_ENV => Some("assets/teapot.obj".to_string()),
            OVERLAY_ENV => Some("Off".to_string()),
            _ => None,
        });
        assert_eq!(config.mesh, MeshSource::Obj(PathBuf::from("assets/teapot.obj")));
        assert!(!config.show_overlay);
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = AppConfig::default().with_env_lookup(|key| match key {
            MESH_ENV => Some("  ".to_string()),
            OVERLAY_ENV => Some("1".to_string()),
            _ => None,
        });
        assert_eq!(config.mesh, MeshSource::default());
        assert!(config.show_overlay);
    }

    #[test]
    fn test_size_never_zero() {
        let config = AppConfig::default().with_size(0, 0);
        assert_eq!((config.width, config.height), (1, 1));
    }
}
