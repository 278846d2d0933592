//! Fixed-aim perspective camera
//!
//! The camera is aimed once, at construction, by computing an orientation
//! basis from the initial eye position and look-at target. Per-frame position
//! updates translate the eye without re-aiming; the orientation never changes
//! after startup.

use cgmath::{perspective, InnerSpace, Matrix4, Rad, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vector3<f32>,
    /// Rotation-only part of the view matrix, frozen at construction.
    orientation: Matrix4<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera {
    /// Creates a camera at `eye` aimed at `target`, with a 45 degree vertical
    /// field of view and 0.1 / 1000.0 clip planes.
    pub fn new(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            eye,
            orientation: Self::aim(eye, target, Vector3::unit_y()),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update_uniform();
        camera
    }

    /// Rotation basis of a right-handed look-at view, without the translation.
    fn aim(eye: Vector3<f32>, target: Vector3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
        let forward = (target - eye).normalize();
        let right = forward.cross(up).normalize();
        let true_up = right.cross(forward);

        // Rows are (right, up, -forward); Matrix4::new takes columns.
        Matrix4::new(
            right.x, true_up.x, -forward.x, 0.0,
            right.y, true_up.y, -forward.y, 0.0,
            right.z, true_up.z, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Moves the eye. The orientation set at construction is kept as-is.
    pub fn set_position(&mut self, eye: Vector3<f32>) {
        self.eye = eye;
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.orientation * Matrix4::from_translation(-self.eye)
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let proj = OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * self.view_matrix()
    }

    /// Refreshes the GPU-facing uniform from the current eye and projection.
    pub fn update_uniform(&mut self) {
        self.uniform = CameraUniform {
            view_position: [self.eye.x, self.eye.y, self.eye.z, 1.0],
            view_proj: self.build_view_projection_matrix().into(),
        };
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// Eye position in homogeneous coordinates (16-byte alignment).
    pub view_position: [f32; 4],
    /// View-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{EuclideanSpace, Point3};

    #[test]
    fn view_matches_look_at_at_construction() {
        let eye = Vector3::new(0.0, 15.0, 55.0);
        let camera = Camera::new(eye, Vector3::new(0.0, 0.0, 0.0), 1.5);

        let expected = Matrix4::look_at_rh(
            Point3::from_vec(eye),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        );
        let view = camera.view_matrix();

        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    (view[col][row] - expected[col][row]).abs() < 1e-5,
                    "mismatch at [{col}][{row}]"
                );
            }
        }
    }

    #[test]
    fn moving_the_eye_does_not_re_aim() {
        let mut camera = Camera::new(
            Vector3::new(0.0, 15.0, 55.0),
            Vector3::new(0.0, 0.0, 0.0),
            1.5,
        );
        let before = camera.view_matrix();

        camera.set_position(Vector3::new(30.0, -10.0, 80.0));
        let after = camera.view_matrix();

        // The rotation block is unchanged; only the translation column moves.
        for col in 0..3 {
            for row in 0..3 {
                assert_eq!(before[col][row], after[col][row]);
            }
        }
        assert_ne!(before[3], after[3]);
    }
}
