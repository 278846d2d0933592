use cgmath::{Matrix4, SquareMatrix};
use wgpu::Device;

use crate::gfx::{
    camera::Camera,
    resources::material::{Material, MaterialManager},
};

use super::node::Node;

/// Main scene: camera, material library, and the root nodes of the tree.
pub struct Scene {
    pub camera: Camera,
    pub roots: Vec<Node>,
    pub material_manager: MaterialManager,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            roots: Vec::new(),
            material_manager: MaterialManager::new(),
        }
    }

    pub fn add_root(&mut self, node: Node) {
        self.roots.push(node);
    }

    /// Finds a node by name anywhere in the scene.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.roots.iter().find_map(|root| root.find(name))
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.roots.iter_mut().find_map(|root| root.find_mut(name))
    }

    /// Refreshes the camera uniform and recomputes every world transform.
    pub fn update(&mut self) {
        self.camera.update_uniform();
        for root in &mut self.roots {
            root.update_world_transforms(Matrix4::identity());
        }
    }

    /// Registers a named material.
    pub fn add_material(
        &mut self,
        name: &str,
        base_color: [f32; 4],
        metallic: f32,
        roughness: f32,
    ) {
        self.material_manager
            .add_material(Material::new(name, base_color, metallic, roughness));
    }

    /// Convenience for opaque RGB materials.
    pub fn add_material_rgb(&mut self, name: &str, r: f32, g: f32, b: f32) {
        self.add_material(name, [r, g, b, 1.0], 0.0, 0.8);
    }

    /// Creates GPU resources for all nodes and materials.
    ///
    /// Must be called once the device exists and before the first frame.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for root in &mut self.roots {
            root.init_gpu_resources(device);
        }
        self.material_manager.update_all_gpu_resources(device, queue);
    }

    /// Uploads current world transforms to the GPU.
    pub fn write_transforms(&mut self, queue: &wgpu::Queue) {
        for root in &mut self.roots {
            root.write_transforms(queue);
        }
    }

    /// Material assigned to a node, or the default material.
    pub fn material_for_node(&self, node: &Node) -> &Material {
        self.material_manager
            .material_for(node.material_id.as_deref())
    }

    /// Visits every visible node in the scene, depth-first.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        for root in &self.roots {
            root.visit(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn test_scene() -> Scene {
        let camera = Camera::new(
            Vector3::new(0.0, 15.0, 55.0),
            Vector3::new(0.0, 0.0, 0.0),
            1.5,
        );
        Scene::new(camera)
    }

    #[test]
    fn node_lookup_spans_roots() {
        let mut scene = test_scene();
        scene.add_root(Node::new("ground"));
        let mut body = Node::new("body");
        body.add_child(Node::new("head"));
        scene.add_root(body);

        assert!(scene.node("ground").is_some());
        assert!(scene.node("head").is_some());
        assert!(scene.node_mut("body").is_some());
    }

    #[test]
    fn unknown_material_falls_back_to_default() {
        let mut scene = test_scene();
        scene.add_root(Node::new("orphan").with_material("nonexistent"));

        let node = scene.node("orphan").unwrap();
        assert_eq!(scene.material_for_node(node).name, "default");
    }
}
