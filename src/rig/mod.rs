//! # Robot Rig
//!
//! Assembles the articulated humanoid from primitive nodes and applies the
//! control-panel values to it each frame. The rig is a fixed topology:
//!
//! ```text
//! body ─┬─ head ─┬─ left_eye
//!       │        ├─ right_eye
//!       │        └─ nose
//!       ├─ left_shoulder ── left_upper_arm ── left_elbow ── left_under_arm
//!       └─ right_shoulder ── right_upper_arm ── right_elbow ── right_under_arm
//! ```
//!
//! The two arm chains are built from the same code with mirrored X offsets,
//! so left and right stay exact mirror images. Shoulder and elbow joints are
//! pivot spheres: rotating one moves only its subtree.

use cgmath::Vector3;
use std::f32::consts::FRAC_PI_2;

use crate::{
    gfx::{
        camera::Camera,
        geometry::{generate_box, generate_cone, generate_plane, generate_sphere},
        resources::global_bindings::LightConfig,
        scene::{Mesh, Node, Scene},
    },
    ui::controls::Controls,
};

pub const GROUND: &str = "ground";
pub const BODY: &str = "body";
pub const HEAD: &str = "head";
pub const LEFT_EYE: &str = "left_eye";
pub const RIGHT_EYE: &str = "right_eye";
pub const NOSE: &str = "nose";
pub const LEFT_SHOULDER: &str = "left_shoulder";
pub const LEFT_UPPER_ARM: &str = "left_upper_arm";
pub const LEFT_ELBOW: &str = "left_elbow";
pub const LEFT_UNDER_ARM: &str = "left_under_arm";
pub const RIGHT_SHOULDER: &str = "right_shoulder";
pub const RIGHT_UPPER_ARM: &str = "right_upper_arm";
pub const RIGHT_ELBOW: &str = "right_elbow";
pub const RIGHT_UNDER_ARM: &str = "right_under_arm";

/// Circle resolution for spheres and cones.
const SEGMENTS: u32 = 32;

/// Radius of the shoulder and elbow pivot spheres.
const ARM_JOINT_RADIUS: f32 = 0.6;

/// Shape of a primitive node.
#[derive(Debug, Clone, Copy)]
pub enum ShapeKind {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Cone { radius: f32, height: f32 },
}

/// Everything needed to build one shaded, shadow-casting node.
///
/// Position and rotation default to zero; dimensions are taken as given and
/// must be positive.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveConfig<'a> {
    pub name: &'a str,
    pub shape: ShapeKind,
    pub material: &'a str,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

impl<'a> PrimitiveConfig<'a> {
    pub fn new(name: &'a str, shape: ShapeKind, material: &'a str) -> Self {
        Self {
            name,
            shape,
            material,
            position: [0.0; 3],
            rotation: [0.0; 3],
        }
    }

    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builds the node. Primitives cast shadows; none of them receive any.
    pub fn build(&self) -> Node {
        let geometry = match self.shape {
            ShapeKind::Box {
                width,
                height,
                depth,
            } => generate_box(width, height, depth),
            ShapeKind::Sphere { radius } => generate_sphere(radius, SEGMENTS, SEGMENTS),
            ShapeKind::Cone { radius, height } => generate_cone(radius, height, SEGMENTS),
        };

        Node::new(self.name)
            .with_mesh(Mesh::from_geometry(&geometry))
            .with_material(self.material)
            .with_position(self.position)
            .with_rotation(self.rotation)
            .with_cast_shadow(true)
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl Side {
    /// Mirror factor for X offsets.
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    fn shoulder(self) -> &'static str {
        match self {
            Side::Left => LEFT_SHOULDER,
            Side::Right => RIGHT_SHOULDER,
        }
    }

    fn upper_arm(self) -> &'static str {
        match self {
            Side::Left => LEFT_UPPER_ARM,
            Side::Right => RIGHT_UPPER_ARM,
        }
    }

    fn elbow(self) -> &'static str {
        match self {
            Side::Left => LEFT_ELBOW,
            Side::Right => RIGHT_ELBOW,
        }
    }

    fn under_arm(self) -> &'static str {
        match self {
            Side::Left => LEFT_UNDER_ARM,
            Side::Right => RIGHT_UNDER_ARM,
        }
    }
}

fn build_head() -> Node {
    let mut head = PrimitiveConfig::new(HEAD, ShapeKind::Sphere { radius: 1.3 }, "limb")
        .at([0.0, 5.3, 0.0])
        .build();

    head.add_child(
        PrimitiveConfig::new(LEFT_EYE, ShapeKind::Sphere { radius: 0.3 }, "face")
            .at([-0.4, 0.3, 1.0])
            .build(),
    );
    head.add_child(
        PrimitiveConfig::new(RIGHT_EYE, ShapeKind::Sphere { radius: 0.3 }, "face")
            .at([0.4, 0.3, 1.0])
            .build(),
    );
    head.add_child(
        PrimitiveConfig::new(
            NOSE,
            ShapeKind::Cone {
                radius: 0.5,
                height: 3.0,
            },
            "face",
        )
        .at([0.0, 0.0, 1.2])
        .rotated([FRAC_PI_2, 0.0, 0.0])
        .build(),
    );

    head
}

/// One shoulder chain: shoulder -> upper arm -> elbow -> under arm.
///
/// Only the shoulder's X offset is mirrored; every other offset is shared, so
/// the chains stay symmetric by construction.
fn build_arm_chain(side: Side) -> Node {
    let mut shoulder = PrimitiveConfig::new(
        side.shoulder(),
        ShapeKind::Sphere {
            radius: ARM_JOINT_RADIUS,
        },
        "limb",
    )
    .at([2.5 * side.sign(), 3.6, 0.0])
    .build();

    let mut upper_arm = PrimitiveConfig::new(
        side.upper_arm(),
        ShapeKind::Box {
            width: 1.0,
            height: 3.0,
            depth: 1.2,
        },
        "limb",
    )
    .at([0.0, -1.1, 0.0])
    .build();

    let mut elbow = PrimitiveConfig::new(
        side.elbow(),
        ShapeKind::Sphere {
            radius: ARM_JOINT_RADIUS,
        },
        "limb",
    )
    .at([0.0, -1.5, 0.0])
    .build();

    elbow.add_child(
        PrimitiveConfig::new(
            side.under_arm(),
            ShapeKind::Box {
                width: 1.0,
                height: 3.0,
                depth: 1.2,
            },
            "under_arm",
        )
        .at([0.0, -1.5, 0.0])
        .build(),
    );

    upper_arm.add_child(elbow);
    shoulder.add_child(upper_arm);
    shoulder
}

/// The full robot, rooted at the body box.
pub fn build_robot() -> Node {
    let mut body = PrimitiveConfig::new(
        BODY,
        ShapeKind::Box {
            width: 4.0,
            height: 8.0,
            depth: 1.2,
        },
        "body",
    )
    .at([0.0, 4.0, 20.0])
    .build();

    body.add_child(build_head());
    body.add_child(build_arm_chain(Side::Left));
    body.add_child(build_arm_chain(Side::Right));
    body
}

/// Ground plane: generated flat in XY, laid down by the -90 degree X rotation.
/// It receives the robot's shadow but casts none itself.
pub fn build_ground() -> Node {
    Node::new(GROUND)
        .with_mesh(Mesh::from_geometry(&generate_plane(40.0, 30.0)))
        .with_material("ground")
        .with_position([0.0, 0.0, 15.0])
        .with_rotation([-FRAC_PI_2, 0.0, 0.0])
        .with_receive_shadow(true)
}

/// The scene's light rig: one white shadow-casting spot above and in front of
/// the robot, plus a dim uniform ambient fill.
pub fn light() -> LightConfig {
    LightConfig {
        position: [10.0, 20.0, 50.0],
        color: [1.0, 1.0, 1.0],
        intensity: 1.0,
        ambient: [0.047, 0.047, 0.047],
    }
}

/// Camera placement: above and behind the ground plane, aimed at the origin.
pub fn default_camera(aspect: f32) -> Camera {
    Camera::new(
        Vector3::new(0.0, 15.0, 55.0),
        Vector3::new(0.0, 0.0, 0.0),
        aspect,
    )
}

fn register_materials(scene: &mut Scene) {
    scene.add_material_rgb("ground", 0.388, 0.506, 0.722);
    scene.add_material_rgb("body", 1.0, 0.0, 0.0);
    scene.add_material_rgb("limb", 0.467, 0.467, 1.0);
    scene.add_material_rgb("face", 0.145, 0.212, 0.333);
    scene.add_material_rgb("under_arm", 0.196, 0.659, 0.322);
}

/// Assembles the complete scene: materials, ground plane, and the robot.
/// Each call produces a fresh, independent graph.
pub fn build_scene(scene: &mut Scene) {
    register_materials(scene);
    scene.add_root(build_ground());
    scene.add_root(build_robot());
}

/// Copies the current control values into the scene.
///
/// Runs once per frame, before world transforms are recomputed. The left
/// chain takes negated rotation values (the mirroring convention); the camera
/// is translated without being re-aimed.
pub fn sync_controls(controls: &Controls, scene: &mut Scene) {
    if let Some(shoulder) = scene.node_mut(LEFT_SHOULDER) {
        shoulder.rotation[2] = -controls.left_arm;
    }
    if let Some(elbow) = scene.node_mut(LEFT_ELBOW) {
        elbow.rotation[2] = -controls.left_under_arm;
    }
    if let Some(shoulder) = scene.node_mut(RIGHT_SHOULDER) {
        shoulder.rotation[2] = controls.right_arm;
    }
    if let Some(elbow) = scene.node_mut(RIGHT_ELBOW) {
        elbow.rotation[2] = controls.right_under_arm;
    }

    if let Some(body) = scene.node_mut(BODY) {
        body.position = [controls.body_x, controls.body_y, controls.body_z];
        body.rotation[1] = controls.rotate_y;
    }

    scene.camera.set_position(Vector3::new(
        controls.camera_x,
        controls.camera_y,
        controls.camera_z,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_scene() -> Scene {
        let mut scene = Scene::new(default_camera(1.5));
        build_scene(&mut scene);
        scene
    }

    #[test]
    fn head_has_two_eyes_and_a_nose_and_nothing_deeper() {
        let scene = full_scene();
        let head = scene.node(HEAD).unwrap();

        assert_eq!(head.children.len(), 3);
        let names: Vec<&str> = head.children.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&LEFT_EYE));
        assert!(names.contains(&RIGHT_EYE));
        assert!(names.contains(&NOSE));
        for child in &head.children {
            assert!(child.children.is_empty(), "{} has children", child.name);
        }
    }

    #[test]
    fn arm_chains_have_depth_four() {
        let scene = full_scene();

        for (shoulder, upper, elbow, under) in [
            (LEFT_SHOULDER, LEFT_UPPER_ARM, LEFT_ELBOW, LEFT_UNDER_ARM),
            (RIGHT_SHOULDER, RIGHT_UPPER_ARM, RIGHT_ELBOW, RIGHT_UNDER_ARM),
        ] {
            let shoulder = scene.node(shoulder).unwrap();
            assert_eq!(shoulder.children.len(), 1);
            assert_eq!(shoulder.children[0].name, upper);

            let upper = &shoulder.children[0];
            assert_eq!(upper.children.len(), 1);
            assert_eq!(upper.children[0].name, elbow);

            let elbow = &upper.children[0];
            assert_eq!(elbow.children.len(), 1);
            assert_eq!(elbow.children[0].name, under);
            assert!(elbow.children[0].children.is_empty());
        }
    }

    #[test]
    fn chains_are_exact_x_mirrors() {
        let scene = full_scene();

        for (left, right) in [
            (LEFT_SHOULDER, RIGHT_SHOULDER),
            (LEFT_UPPER_ARM, RIGHT_UPPER_ARM),
            (LEFT_ELBOW, RIGHT_ELBOW),
            (LEFT_UNDER_ARM, RIGHT_UNDER_ARM),
            (LEFT_EYE, RIGHT_EYE),
        ] {
            let left = scene.node(left).unwrap();
            let right = scene.node(right).unwrap();

            assert_eq!(left.position[0], -right.position[0], "{}", left.name);
            assert_eq!(left.position[1], right.position[1], "{}", left.name);
            assert_eq!(left.position[2], right.position[2], "{}", left.name);

            // Same geometry on both sides
            let (lm, rm) = (left.mesh.as_ref().unwrap(), right.mesh.as_ref().unwrap());
            assert_eq!(lm.vertex_count, rm.vertex_count);
            assert_eq!(lm.index_count, rm.index_count);
        }
    }

    #[test]
    fn left_chain_rotations_are_negated() {
        let mut scene = full_scene();
        let mut controls = Controls::new(&scene.camera);

        controls.set("leftArm", 1.5);
        controls.set("rightArm", 1.5);
        controls.set("leftUnderArm", 0.75);
        controls.set("rightUnderArm", 0.75);
        sync_controls(&controls, &mut scene);

        assert_eq!(scene.node(LEFT_SHOULDER).unwrap().rotation[2], -1.5);
        assert_eq!(scene.node(RIGHT_SHOULDER).unwrap().rotation[2], 1.5);
        assert_eq!(scene.node(LEFT_ELBOW).unwrap().rotation[2], -0.75);
        assert_eq!(scene.node(RIGHT_ELBOW).unwrap().rotation[2], 0.75);
    }

    #[test]
    fn body_follows_position_and_rotation_controls() {
        let mut scene = full_scene();
        let mut controls = Controls::new(&scene.camera);

        controls.set("bodyXAxis", 5.0);
        controls.set("bodyYAxis", -3.0);
        controls.set("bodyZAxis", 10.0);
        controls.set("robotRotateY", 2.0);
        sync_controls(&controls, &mut scene);

        let body = scene.node(BODY).unwrap();
        assert_eq!(body.position, [5.0, -3.0, 10.0]);
        assert_eq!(body.rotation[1], 2.0);
    }

    #[test]
    fn default_controls_leave_camera_at_constructed_position() {
        let mut scene = full_scene();
        let controls = Controls::new(&scene.camera);

        sync_controls(&controls, &mut scene);
        scene.update();

        assert_eq!(scene.camera.eye, Vector3::new(0.0, 15.0, 55.0));
    }

    #[test]
    fn joint_rotation_moves_only_its_subtree() {
        let mut scene = full_scene();
        let mut controls = Controls::new(&scene.camera);
        controls.set("leftArm", 1.0);
        sync_controls(&controls, &mut scene);
        scene.update();

        // The elbow hangs off the rotated shoulder, so its world position
        // swings; the right chain and the head are untouched.
        let rotated_elbow = scene.node(LEFT_ELBOW).unwrap().world_transform();
        let still_elbow = scene.node(RIGHT_ELBOW).unwrap().world_transform();
        assert_ne!(rotated_elbow.w.x, -still_elbow.w.x);

        let head = scene.node(HEAD).unwrap().world_transform();
        assert_eq!(head.w.y, 4.0 + 5.3);
    }

    #[test]
    fn ground_receives_shadows_but_casts_none() {
        let scene = full_scene();

        let ground = scene.node(GROUND).unwrap();
        assert!(ground.receive_shadow);
        assert!(!ground.cast_shadow);

        let body = scene.node(BODY).unwrap();
        assert!(body.cast_shadow);
        assert!(!body.receive_shadow);
    }

    #[test]
    fn scene_builds_are_independent() {
        let mut first = full_scene();
        let second = full_scene();

        first.node_mut(BODY).unwrap().rotation[1] = 3.0;
        assert_eq!(second.node(BODY).unwrap().rotation[1], 0.0);
    }
}
