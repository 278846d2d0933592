use std::ops::Range;

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};
use wgpu::Device;

use crate::{
    gfx::geometry::GeometryData,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::vertex::Vertex3D;

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        let vertex_count = vertices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
            vertex_count,
        }
    }

    pub fn from_geometry(data: &GeometryData) -> Self {
        Self::new(data.to_vertices(), data.indices.clone())
    }

    fn init_gpu_resources(&mut self, device: &Device) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }
}

/// Per-node uniform data. MUST match the `NodeUniform` struct in the shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    pub receives_shadow: f32,
    _padding: [f32; 3],
}

pub struct NodeGpuResources {
    uniform: UniformBuffer<NodeUniform>,
    bind_group: wgpu::BindGroup,
}

/// Bind group layout shared by every node (group 1 in both render pipelines).
pub fn node_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_vertex(binding_types::uniform())
        .create(device, "Node Bind Group Layout")
}

/// A transformable element of the scene tree.
///
/// Each node owns its children outright, so the graph is a tree by
/// construction. A node's world transform is its parent's world transform
/// composed with its own local translation, rotation and scale.
pub struct Node {
    pub name: String,
    /// Local translation relative to the parent.
    pub position: [f32; 3],
    /// Local Euler rotation in radians, applied X then Y then Z.
    pub rotation: [f32; 3],
    pub scale: f32,
    pub mesh: Option<Mesh>,
    pub material_id: Option<String>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Hiding a node hides its whole subtree.
    pub visible: bool,
    pub children: Vec<Node>,
    world_transform: Matrix4<f32>,
    gpu_resources: Option<NodeGpuResources>,
}

impl Node {
    /// Creates an empty grouping node with no mesh.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: 1.0,
            mesh: None,
            material_id: None,
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
            children: Vec::new(),
            world_transform: Matrix4::identity(),
            gpu_resources: None,
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_material(mut self, material_id: &str) -> Self {
        self.material_id = Some(material_id.to_string());
        self
    }

    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_cast_shadow(mut self, cast: bool) -> Self {
        self.cast_shadow = cast;
        self
    }

    pub fn with_receive_shadow(mut self, receive: bool) -> Self {
        self.receive_shadow = receive;
        self
    }

    /// Transfers ownership of `child` into this node.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Local transform: translate, then rotate X/Y/Z, then scale.
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::from(self.position))
            * Matrix4::from_angle_x(Rad(self.rotation[0]))
            * Matrix4::from_angle_y(Rad(self.rotation[1]))
            * Matrix4::from_angle_z(Rad(self.rotation[2]))
            * Matrix4::from_scale(self.scale)
    }

    pub fn world_transform(&self) -> Matrix4<f32> {
        self.world_transform
    }

    /// Recomputes world transforms for this node and its subtree.
    pub fn update_world_transforms(&mut self, parent: Matrix4<f32>) {
        self.world_transform = parent * self.local_matrix();
        for child in &mut self.children {
            child.update_world_transforms(self.world_transform);
        }
    }

    /// Finds a node by name in this subtree.
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Node> {
        if self.name == name {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(name))
    }

    /// Visits every visible node in this subtree, depth-first.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        if !self.visible {
            return;
        }
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Creates GPU buffers and bind groups for this subtree.
    pub fn init_gpu_resources(&mut self, device: &Device) {
        if let Some(mesh) = &mut self.mesh {
            mesh.init_gpu_resources(device);

            let uniform = UniformBuffer::new_with_data(device, &self.node_uniform());
            let layout = node_bind_group_layout(device);
            let bind_group = BindGroupBuilder::new(&layout)
                .resource(uniform.binding_resource())
                .create(device, "Node Bind Group");

            self.gpu_resources = Some(NodeGpuResources {
                uniform,
                bind_group,
            });
        }

        for child in &mut self.children {
            child.init_gpu_resources(device);
        }
    }

    /// Uploads the current world transforms of this subtree to the GPU.
    pub fn write_transforms(&mut self, queue: &wgpu::Queue) {
        let uniform = self.node_uniform();
        if let Some(gpu) = &mut self.gpu_resources {
            gpu.uniform.update_content(queue, uniform);
        }
        for child in &mut self.children {
            child.write_transforms(queue);
        }
    }

    fn node_uniform(&self) -> NodeUniform {
        NodeUniform {
            model: self.world_transform.into(),
            receives_shadow: if self.receive_shadow { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|gpu| &gpu.bind_group)
    }
}

pub trait DrawNode<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_node(&mut self, node: &'a Node);
}

impl<'a, 'b> DrawNode<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Not uploaded yet
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_node(&mut self, node: &'b Node) {
        if let Some(mesh) = &node.mesh {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;

    #[test]
    fn world_transform_composes_parent_translation() {
        let mut parent = Node::new("parent").with_position([0.0, 4.0, 20.0]);
        let child = Node::new("child").with_position([-2.5, 3.6, 0.0]);
        parent.add_child(child);

        parent.update_world_transforms(Matrix4::identity());

        let world = parent.children[0].world_transform();
        assert_eq!(world.w.x, -2.5);
        assert_eq!(world.w.y, 7.6);
        assert_eq!(world.w.z, 20.0);
    }

    #[test]
    fn find_reaches_nested_children() {
        let mut root = Node::new("root");
        let mut mid = Node::new("mid");
        mid.add_child(Node::new("leaf"));
        root.add_child(mid);

        assert!(root.find("leaf").is_some());
        assert!(root.find_mut("mid").is_some());
        assert!(root.find("missing").is_none());
    }

    #[test]
    fn hidden_nodes_hide_their_subtree() {
        let mut root = Node::new("root").with_mesh(Mesh::from_geometry(&generate_box(
            1.0, 1.0, 1.0,
        )));
        let mut hidden = Node::new("hidden");
        hidden.visible = false;
        hidden.add_child(Node::new("buried"));
        root.add_child(hidden);

        let mut seen = Vec::new();
        root.visit(&mut |node| seen.push(node.name.clone()));
        assert_eq!(seen, vec!["root".to_string()]);
    }
}
