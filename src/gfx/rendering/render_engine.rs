//! WGPU render engine
//!
//! Two-pass renderer: a depth-only shadow pass over every shadow-casting node,
//! then the main Lambert-lit pass over the scene tree, with an optional UI
//! overlay recorded into the same command encoder.

use anyhow::{Context, Result};
use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::{
    gfx::{
        camera::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig},
            material::MaterialBindings,
            texture_resource::TextureResource,
        },
        scene::{
            node::{node_bind_group_layout, DrawNode},
            scene::Scene,
        },
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder},
        binding_types,
    },
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SHADOW_MAP_SIZE: u32 = 2048;

/// Background color behind the scene, a light grey.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.741,
    g: 0.741,
    b: 0.741,
    a: 1.0,
};

/// Owns the surface, device, pipelines and shadow resources, and records
/// the per-frame passes.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    light_config: LightConfig,
}

impl RenderEngine {
    /// Creates a render engine for the given window.
    ///
    /// Any failure here is fatal: there is nothing transient about a missing
    /// adapter or an unusable surface, so errors carry context and abort
    /// initialization.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create rendering surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter found")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to acquire graphics device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");
        let shadow_map = TextureResource::create_shadow_map(&device, SHADOW_MAP_SIZE);

        // Shadow lookup bindings for the main pass (group 3)
        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::depth_texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Comparison))
            .create(&device, "Shadow Bind Group Layout");

        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let node_layout = node_bind_group_layout(&device);
        let material_bindings = MaterialBindings::new(&device);

        let device: Arc<Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device.clone());

        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow_pass.wgsl"));

        // Depth-only shadow pass; culling off so thin parts don't leak light
        pipeline_manager
            .register_pipeline(
                "Shadow",
                PipelineConfig::new("shadow")
                    .with_label("SHADOW")
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_cull_mode(None)
                    .with_vertex_only()
                    .with_bind_group_layouts(vec![
                        global_bindings.bind_group_layout().clone(),
                        node_layout.layout.clone(),
                    ]),
            )
            .context("failed to create shadow pipeline")?;

        pipeline_manager
            .register_pipeline(
                "Scene",
                PipelineConfig::new("scene")
                    .with_label("SCENE")
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_color_target(format)
                    .with_bind_group_layouts(vec![
                        global_bindings.bind_group_layout().clone(),
                        node_layout.layout.clone(),
                        material_bindings.bind_group_layout().clone(),
                        shadow_layout.layout.clone(),
                    ]),
            )
            .context("failed to create scene pipeline")?;

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            format,
            depth_texture,
            shadow_map,
            shadow_bind_group,
            pipeline_manager,
            global_ubo,
            global_bindings,
            light_config: LightConfig::default(),
        })
    }

    /// Renders one frame: shadow pass, main pass, then the UI overlay.
    pub fn render_frame_with_ui<F>(&mut self, scene: &Scene, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = self
            .surface
            .get_current_texture()
            .expect("Failed to acquire surface texture");

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: shadow map from the light's point of view
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.pipeline("Shadow") {
                shadow_pass.set_pipeline(pipeline);
                shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                scene.visit(&mut |node| {
                    if node.cast_shadow {
                        if let Some(bind_group) = node.bind_group() {
                            shadow_pass.set_bind_group(1, bind_group, &[]);
                            shadow_pass.draw_node(node);
                        }
                    }
                });
            }
        }

        // PASS 2: main scene
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.pipeline("Scene") {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

                scene.visit(&mut |node| {
                    let Some(node_bind_group) = node.bind_group() else {
                        return;
                    };
                    let material = scene.material_for_node(node);
                    let Some(material_bind_group) = material.bind_group() else {
                        log::debug!(
                            "skipping '{}': material '{}' has no GPU resources",
                            node.name,
                            material.name
                        );
                        return;
                    };

                    render_pass.set_bind_group(1, node_bind_group, &[]);
                    render_pass.set_bind_group(2, material_bind_group, &[]);
                    render_pass.draw_node(node);
                });
            }
        }

        // PASS 3: UI overlay
        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Renders a frame without any UI overlay.
    pub fn render_frame(&mut self, scene: &Scene) {
        self.render_frame_with_ui(
            scene,
            None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
        );
    }

    /// Updates the global uniforms from the camera and the current light rig.
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            camera_uniform,
            self.light_config,
        );
    }

    pub fn set_light(&mut self, light_config: LightConfig) {
        self.light_config = light_config;
    }

    pub fn light(&self) -> LightConfig {
        self.light_config
    }

    /// Reconfigures the surface and depth buffer after a window resize.
    /// The shadow map keeps its fixed resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
