//! Sphere instance state and its model transform.

use glam::{Mat4, Vec3};

/// Mouse-delta to radians factor for drag rotation.
pub const DRAG_SENSITIVITY: f32 = 0.01;

/// A single rendered sphere.
///
/// The model matrix is derived state: it is rebuilt from the angles on every
/// update and never persisted independently.
#[derive(Debug, Clone)]
pub struct Shape {
    /// World-space center, applied as a translation.
    pub center: Vec3,
    pub radius: f32,
    /// Rotation angle about the z axis, radians.
    pub theta: f32,
    /// Rotation angle about the y axis, radians.
    pub phi: f32,
    /// RGBA color in [0, 1], used by the solid-color shader path.
    pub color: [f32; 4],
    /// Derived modeling transform.
    pub model: Mat4,
}

impl Shape {
    pub fn new(center: Vec3, radius: f32, color: [f32; 4]) -> Self {
        let mut shape = Self {
            center,
            radius,
            theta: 0.0,
            phi: 0.0,
            color,
            model: Mat4::IDENTITY,
        };
        shape.advance(0.0);
        shape
    }

    /// Advances the auto-rotation by `dt` seconds and rebuilds the full
    /// model matrix: `translate · rotate_z(theta) · rotate_y(phi) · scale`.
    pub fn advance(&mut self, dt: f32) {
        self.theta += dt;
        self.model = Mat4::from_translation(self.center)
            * Mat4::from_rotation_z(self.theta)
            * Mat4::from_rotation_y(self.phi)
            * Mat4::from_scale(Vec3::splat(self.radius));
    }

    /// Applies a mouse drag of `(dx, dy)` pixels.
    ///
    /// Drag mode rebuilds the matrix from the rotations only: translation and
    /// scale are dropped so the sphere pivots in place regardless of its
    /// center or radius.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.theta += dx * DRAG_SENSITIVITY;
        self.phi += dy * DRAG_SENSITIVITY;
        self.model = Mat4::from_rotation_z(self.theta) * Mat4::from_rotation_y(self.phi);
    }
}

/// The scene: a single unit sphere at the origin.
pub fn create_shapes() -> Vec<Shape> {
    vec![Shape::new(Vec3::ZERO, 1.0, [1.0, 0.5, 0.5, 1.0])]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat4_eq(a: Mat4, b: Mat4) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn rest_pose_is_identity() {
        let shape = Shape::new(Vec3::ZERO, 1.0, [1.0, 1.0, 1.0, 1.0]);
        assert_mat4_eq(shape.model, Mat4::IDENTITY);
    }

    #[test]
    fn advance_adds_exactly_dt_to_theta() {
        let mut shape = Shape::new(Vec3::ZERO, 1.0, [1.0, 1.0, 1.0, 1.0]);
        shape.advance(0.25);
        shape.advance(0.5);
        assert_eq!(shape.theta, 0.75);
        assert_eq!(shape.phi, 0.0);
    }

    #[test]
    fn advance_rebuilds_full_transform() {
        let center = Vec3::new(0.5, -1.0, 2.0);
        let mut shape = Shape::new(center, 3.0, [1.0, 1.0, 1.0, 1.0]);
        shape.phi = 0.4;
        shape.advance(1.2);

        let expected = Mat4::from_translation(center)
            * Mat4::from_rotation_z(1.2)
            * Mat4::from_rotation_y(0.4)
            * Mat4::from_scale(Vec3::splat(3.0));
        assert_mat4_eq(shape.model, expected);
    }

    #[test]
    fn drag_matrix_is_rotation_only() {
        // Drag drops translation and scale, so two shapes with different
        // center/radius end up with the same matrix.
        let mut a = Shape::new(Vec3::ZERO, 1.0, [1.0, 1.0, 1.0, 1.0]);
        let mut b = Shape::new(Vec3::new(4.0, 5.0, 6.0), 9.0, [1.0, 1.0, 1.0, 1.0]);

        a.drag(30.0, -20.0);
        b.drag(30.0, -20.0);

        let expected = Mat4::from_rotation_z(30.0 * DRAG_SENSITIVITY)
            * Mat4::from_rotation_y(-20.0 * DRAG_SENSITIVITY);
        assert_mat4_eq(a.model, expected);
        assert_mat4_eq(b.model, expected);
    }

    #[test]
    fn drag_accumulates_from_previous_angles() {
        let mut shape = Shape::new(Vec3::ZERO, 1.0, [1.0, 1.0, 1.0, 1.0]);
        shape.drag(10.0, 0.0);
        shape.drag(5.0, 8.0);

        let expected = Mat4::from_rotation_z(15.0 * DRAG_SENSITIVITY)
            * Mat4::from_rotation_y(8.0 * DRAG_SENSITIVITY);
        assert_mat4_eq(shape.model, expected);
    }

    #[test]
    fn single_element_scene() {
        let shapes = create_shapes();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].radius, 1.0);
        assert_eq!(shapes[0].center, Vec3::ZERO);
    }
}
