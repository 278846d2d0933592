// src/ui/controls.rs
//! Control state for the robot and camera
//!
//! A fixed-shape record of every user-adjustable parameter, with an immutable
//! range table. Created once at startup (camera fields seeded from the
//! camera's constructed position), mutated only through the panel or the
//! clamping `set`, and read once per frame by the render loop.

use crate::gfx::camera::Camera;

/// Declarative slider binding: parameter name plus its allowed range.
pub struct ControlBinding {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
}

/// Every parameter the panel exposes, with the ranges the widgets enforce.
pub const CONTROL_BINDINGS: [ControlBinding; 11] = [
    ControlBinding { name: "cameraX", min: -90.0, max: 180.0 },
    ControlBinding { name: "cameraY", min: -90.0, max: 180.0 },
    ControlBinding { name: "cameraZ", min: 0.0, max: 280.0 },
    ControlBinding { name: "leftArm", min: 0.0, max: 3.0 },
    ControlBinding { name: "rightArm", min: 0.0, max: 3.0 },
    ControlBinding { name: "leftUnderArm", min: -2.0, max: 2.0 },
    ControlBinding { name: "rightUnderArm", min: -2.0, max: 2.0 },
    ControlBinding { name: "bodyXAxis", min: -20.0, max: 20.0 },
    ControlBinding { name: "bodyYAxis", min: -20.0, max: 20.0 },
    ControlBinding { name: "bodyZAxis", min: 0.0, max: 40.0 },
    ControlBinding { name: "robotRotateY", min: 0.0, max: 7.0 },
];

/// Live values for every bound parameter. All independent, no derived state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub camera_x: f32,
    pub camera_y: f32,
    pub camera_z: f32,
    pub left_arm: f32,
    pub right_arm: f32,
    pub left_under_arm: f32,
    pub right_under_arm: f32,
    pub body_x: f32,
    pub body_y: f32,
    pub body_z: f32,
    pub rotate_y: f32,
}

impl Controls {
    /// Initial control state. The camera parameters start at the camera's
    /// constructed position; the body starts where the rig placed it.
    pub fn new(camera: &Camera) -> Self {
        Self {
            camera_x: camera.eye.x,
            camera_y: camera.eye.y,
            camera_z: camera.eye.z,
            left_arm: 0.0,
            right_arm: 0.0,
            left_under_arm: 0.0,
            right_under_arm: 0.0,
            body_x: 0.0,
            body_y: 4.0,
            body_z: 20.0,
            rotate_y: 0.0,
        }
    }

    /// Declared (min, max) range of a parameter.
    pub fn range(name: &str) -> Option<(f32, f32)> {
        CONTROL_BINDINGS
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| (binding.min, binding.max))
    }

    /// Current value of a named parameter.
    pub fn get(&self, name: &str) -> Option<f32> {
        match name {
            "cameraX" => Some(self.camera_x),
            "cameraY" => Some(self.camera_y),
            "cameraZ" => Some(self.camera_z),
            "leftArm" => Some(self.left_arm),
            "rightArm" => Some(self.right_arm),
            "leftUnderArm" => Some(self.left_under_arm),
            "rightUnderArm" => Some(self.right_under_arm),
            "bodyXAxis" => Some(self.body_x),
            "bodyYAxis" => Some(self.body_y),
            "bodyZAxis" => Some(self.body_z),
            "robotRotateY" => Some(self.rotate_y),
            _ => None,
        }
    }

    /// Stores a new value for a named parameter, clamped into its range.
    /// Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: f32) {
        let Some((min, max)) = Self::range(name) else {
            return;
        };
        if let Some(field) = self.field_mut(name) {
            *field = value.clamp(min, max);
        }
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Option<&mut f32> {
        match name {
            "cameraX" => Some(&mut self.camera_x),
            "cameraY" => Some(&mut self.camera_y),
            "cameraZ" => Some(&mut self.camera_z),
            "leftArm" => Some(&mut self.left_arm),
            "rightArm" => Some(&mut self.right_arm),
            "leftUnderArm" => Some(&mut self.left_under_arm),
            "rightUnderArm" => Some(&mut self.right_under_arm),
            "bodyXAxis" => Some(&mut self.body_x),
            "bodyYAxis" => Some(&mut self.body_y),
            "bodyZAxis" => Some(&mut self.body_z),
            "robotRotateY" => Some(&mut self.rotate_y),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn controls() -> Controls {
        let camera = Camera::new(
            Vector3::new(0.0, 15.0, 55.0),
            Vector3::new(0.0, 0.0, 0.0),
            1.5,
        );
        Controls::new(&camera)
    }

    #[test]
    fn defaults_seed_camera_fields_from_camera() {
        let c = controls();
        assert_eq!(c.camera_x, 0.0);
        assert_eq!(c.camera_y, 15.0);
        assert_eq!(c.camera_z, 55.0);
        assert_eq!(c.body_y, 4.0);
        assert_eq!(c.body_z, 20.0);
    }

    #[test]
    fn set_clamps_into_declared_range() {
        let mut c = controls();

        c.set("leftArm", 99.0);
        assert_eq!(c.left_arm, 3.0);

        c.set("leftArm", -1.0);
        assert_eq!(c.left_arm, 0.0);

        c.set("leftUnderArm", -5.0);
        assert_eq!(c.left_under_arm, -2.0);
    }

    #[test]
    fn set_inside_range_is_identity() {
        let mut c = controls();
        c.set("bodyXAxis", 5.5);
        assert_eq!(c.body_x, 5.5);
        assert_eq!(c.get("bodyXAxis"), Some(5.5));
    }

    #[test]
    fn unknown_parameter_is_ignored() {
        let mut c = controls();
        let before = c;
        c.set("warpDrive", 1.0);
        assert_eq!(c, before);
        assert_eq!(c.get("warpDrive"), None);
    }

    #[test]
    fn every_binding_resolves_to_a_field() {
        let mut c = controls();
        for binding in CONTROL_BINDINGS {
            assert!(c.field_mut(binding.name).is_some(), "{}", binding.name);
            assert!(binding.min < binding.max);
        }
    }
}
