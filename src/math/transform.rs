//! Rigid-body and similarity transform primitives
//!
//! All functions are pure. `compose(parent, child)` yields the transform that
//! applies `child` first and `parent` second, which is how a node's global
//! transform is built from its parent's global and its own local transform.

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

/// Remaps OpenGL clip-space depth (`-1..1`) to the `0..1` range wgpu expects.
///
/// `Matrix4::new` takes columns: `z' = 0.5 * z + 0.5 * w`, x, y and w untouched.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// The neutral transform.
pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

/// Counter-clockwise rotation about the Z axis, in degrees.
pub fn rotate_z(degrees: f32) -> Matrix4<f32> {
    Matrix4::from_angle_z(Deg(degrees))
}

pub fn translate(offset: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(offset)
}

/// Per-axis scale about the origin.
pub fn scale(factors: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(factors.x, factors.y, factors.z)
}

/// Right-handed perspective projection in OpenGL clip convention.
///
/// Preconditions (not checked here; cgmath asserts on some of them):
/// `0 < fov_y_degrees < 180`, `aspect > 0`, `0 < near < far`.
/// Multiply by [`OPENGL_TO_WGPU_MATRIX`] before handing the result to wgpu.
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    cgmath::perspective(Deg(fov_y_degrees), aspect, near, far)
}

/// Returns `parent * child`.
pub fn compose(parent: Matrix4<f32>, child: Matrix4<f32>) -> Matrix4<f32> {
    parent * child
}

/// Converts a matrix to the column-major array layout used by uniform buffers.
pub fn to_array(matrix: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{assert_abs_diff_eq, AbsDiffEq, Vector4, Zero};
    use rand::Rng;

    fn random_transform(rng: &mut impl Rng) -> Matrix4<f32> {
        let offset = Vector3::new(
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
        );
        let factors = Vector3::new(
            rng.random_range(0.25..2.0),
            rng.random_range(0.25..2.0),
            rng.random_range(0.25..2.0),
        );
        translate(offset) * rotate_z(rng.random_range(-360.0..360.0)) * scale(factors)
    }

    #[test]
    fn test_compose_is_associative() {
        let mut rng = rand::rng();
        for _ in 0..64 {
            let a = random_transform(&mut rng);
            let b = random_transform(&mut rng);
            let c = random_transform(&mut rng);

            let left = compose(compose(a, b), c);
            let right = compose(a, compose(b, c));
            assert_abs_diff_eq!(left, right, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_identity_is_neutral() {
        let mut rng = rand::rng();
        for _ in 0..32 {
            let a = random_transform(&mut rng);
            assert_abs_diff_eq!(compose(identity(), a), a, epsilon = 1e-6);
            assert_abs_diff_eq!(compose(a, identity()), a, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_compose_order_matters() {
        let t = translate(Vector3::new(10.0, 0.0, 0.0));
        let r = rotate_z(90.0);
        assert!(!compose(t, r).abs_diff_eq(&compose(r, t), 1e-3));

        // Parent translation applied after child rotation
        let p = compose(t, r) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(p, Vector4::new(10.0, 1.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let p = rotate_z(90.0) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(p, Vector4::new(0.0, 1.0, 0.0, 1.0), epsilon = 1e-6);
        assert_abs_diff_eq!(
            rotate_z(30.0),
            compose(rotate_z(10.0), rotate_z(20.0)),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_scale_and_translate() {
        let m = compose(
            translate(Vector3::new(1.0, 2.0, 3.0)),
            scale(Vector3::new(2.0, 3.0, 4.0)),
        );
        let p = m * Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(p, Vector4::new(3.0, 5.0, 7.0, 1.0));
    }

    #[test]
    fn test_perspective_depth_range() {
        let (near, far) = (0.1, 100.0);
        let proj = perspective(90.0, 800.0 / 600.0, near, far);

        let ndc_z = |m: Matrix4<f32>, z: f32| {
            let clip = m * Vector4::new(0.0, 0.0, z, 1.0);
            clip.z / clip.w
        };

        assert_abs_diff_eq!(ndc_z(proj, -near), -1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(ndc_z(proj, -far), 1.0, epsilon = 1e-4);

        let wgpu_proj = OPENGL_TO_WGPU_MATRIX * proj;
        assert_abs_diff_eq!(ndc_z(wgpu_proj, -near), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(ndc_z(wgpu_proj, -far), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_wgpu_remap_keeps_x_y_and_w() {
        let m = OPENGL_TO_WGPU_MATRIX;
        let p = m * Vector4::new(2.0, -3.0, -1.0, 1.0);
        assert_abs_diff_eq!(p, Vector4::new(2.0, -3.0, 0.0, 1.0), epsilon = 1e-6);
        let p = m * Vector4::new(0.0, 0.0, 4.0, 4.0);
        assert_abs_diff_eq!(p, Vector4::new(0.0, 0.0, 4.0, 4.0), epsilon = 1e-6);
    }

    #[test]
    fn test_to_array_is_column_major() {
        let m = translate(Vector3::new(4.0, 5.0, 6.0));
        let arr = to_array(m);
        assert_eq!(arr[3], [4.0, 5.0, 6.0, 1.0]);
        assert_eq!(to_array(Matrix4::zero())[0], [0.0; 4]);
    }
}
