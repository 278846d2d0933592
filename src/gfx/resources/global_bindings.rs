//! Global uniform bindings for camera and lighting
//!
//! One uniform buffer, bound at group 0 of every pipeline, carries the data
//! shared by all draws in a frame: camera matrices, the spot light used for
//! shadow casting, the ambient fill and the light's view-projection matrix.

use cgmath::{EuclideanSpace, Point3, Vector3};

use crate::{
    gfx::camera::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content. MUST match the `Globals` struct in the
/// shaders exactly, including padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    light_position: [f32; 3],
    light_intensity: f32,
    light_color: [f32; 3],
    _padding0: f32,
    ambient_color: [f32; 3],
    _padding1: f32,
    light_view_proj: [[f32; 4]; 4],
}

/// The scene's light rig: one shadow-casting spot plus a uniform ambient fill.
#[derive(Copy, Clone, Debug)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [10.0, 20.0, 50.0],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            ambient: [0.05, 0.05, 0.05],
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data.
///
/// The shadow projection is orthographic, aimed from the light at the scene
/// origin and sized to cover the ground plane and the robot's travel range.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: LightConfig,
) {
    let light_pos = Point3::from(light.position);
    let light_view = cgmath::Matrix4::look_at_rh(light_pos, Point3::origin(), Vector3::unit_y());
    let light_proj = cgmath::ortho(-35.0, 35.0, -35.0, 35.0, 1.0, 120.0);
    let light_view_proj = light_proj * light_view;

    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        light_position: light.position,
        light_intensity: light.intensity,
        light_color: light.color,
        _padding0: 0.0,
        ambient_color: light.ambient,
        _padding1: 0.0,
        light_view_proj: light_view_proj.into(),
    };

    ubo.update_content(queue, content);
}

/// Bind group layout and bind group for the global uniforms (group 0).
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Globals Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}
