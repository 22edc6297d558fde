//! Fixed camera: identity view and a fixed field-of-view perspective whose
//! aspect ratio follows the viewport.

use cgmath::Matrix4;

use crate::math::transform::{identity, perspective, to_array, OPENGL_TO_WGPU_MATRIX};

/// View and projection matrices as laid out in the shader's camera uniform.
///
/// MUST match the `Camera` struct in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view: to_array(identity()),
            proj: to_array(identity()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            fov_y: 90.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl CameraRig {
    pub fn view_matrix(&self) -> Matrix4<f32> {
        identity()
    }

    /// Projection for a `width` x `height` viewport, in OpenGL clip convention.
    ///
    /// Zero dimensions are treated as 1 so a minimised window never produces
    /// a degenerate aspect ratio.
    pub fn projection_matrix(&self, width: u32, height: u32) -> Matrix4<f32> {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        perspective(self.fov_y, aspect, self.znear, self.zfar)
    }

    /// Builds the uniform for the current viewport, remapped to wgpu depth.
    pub fn uniform(&self, width: u32, height: u32) -> CameraUniform {
        CameraUniform {
            view: to_array(self.view_matrix()),
            proj: to_array(OPENGL_TO_WGPU_MATRIX * self.projection_matrix(width, height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{assert_abs_diff_eq, Vector4};

    fn ndc(proj: Matrix4<f32>, point: Vector4<f32>) -> Vector4<f32> {
        let clip = proj * point;
        clip / clip.w
    }

    #[test]
    fn test_projection_tracks_aspect() {
        let rig = CameraRig::default();
        let wide = rig.projection_matrix(1600, 800);
        let square = rig.projection_matrix(800, 800);

        // x focal term is divided by the aspect ratio, y is not
        assert_abs_diff_eq!(wide.x.x * 2.0, square.x.x, epsilon = 1e-5);
        assert_abs_diff_eq!(wide.y.y, square.y.y, epsilon = 1e-6);
        // 90 degree fov gives a unit focal length
        assert_abs_diff_eq!(square.y.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_sized_viewport_is_safe() {
        let rig = CameraRig::default();
        let m = rig.projection_matrix(0, 0);
        assert!(m.x.x.is_finite());
        assert_eq!(m, rig.projection_matrix(1, 1));
    }

    #[test]
    fn test_uniform_uses_identity_view() {
        let uniform = CameraRig::default().uniform(800, 600);
        assert_eq!(uniform.view, to_array(identity()));
        assert_ne!(uniform.proj, to_array(identity()));
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
    }

    #[test]
    fn test_uniform_projection_lands_in_wgpu_depth_range() {
        let rig = CameraRig::default();
        let proj = Matrix4::from(rig.uniform(800, 600).proj);
        let gl_proj = rig.projection_matrix(800, 600);

        // The right arm's origin in the figure's rest pose
        let arm = Vector4::new(-30.0, 20.0, -80.0, 1.0);
        let wgpu_ndc = ndc(proj, arm);
        let gl_ndc = ndc(gl_proj, arm);

        assert_abs_diff_eq!(wgpu_ndc.x, gl_ndc.x, epsilon = 1e-5);
        assert_abs_diff_eq!(wgpu_ndc.y, gl_ndc.y, epsilon = 1e-5);
        assert!((0.0..=1.0).contains(&wgpu_ndc.z), "depth {} outside 0..1", wgpu_ndc.z);
        assert_abs_diff_eq!(wgpu_ndc.z, (gl_ndc.z + 1.0) * 0.5, epsilon = 1e-5);

        let near = ndc(proj, Vector4::new(0.0, 0.0, -rig.znear, 1.0));
        let far = ndc(proj, Vector4::new(0.0, 0.0, -rig.zfar, 1.0));
        assert_abs_diff_eq!(near.z, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-4);
    }
}
