//! Application shell and render loop
//!
//! `RigViewApp` owns the winit event loop; `AppState` is the
//! `ApplicationHandler` that carries the scene, the control state and the
//! GPU-side engine. The loop has two phases: before `resumed` runs there is
//! no window or device; afterwards every `RedrawRequested` performs one tick
//! (copy controls into the rig, recompute transforms, draw) until the window
//! closes.

use anyhow::{Context, Result};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    gfx::{rendering::render_engine::RenderEngine, scene::Scene},
    rig,
    ui::{controls::Controls, manager::UiManager, panel::controls_panel},
};

const WINDOW_WIDTH: u32 = 1200;
const WINDOW_HEIGHT: u32 = 800;

pub struct RigViewApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    controls: Controls,
}

impl RigViewApp {
    /// Builds the scene and control state. The window and GPU resources are
    /// created later, when winit delivers `resumed`.
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        let camera = rig::default_camera(WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32);
        let mut scene = Scene::new(camera);
        rig::build_scene(&mut scene);

        // Camera sliders start wherever the camera was constructed
        let controls = Controls::new(&scene.camera);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                controls,
            },
        })
    }

    /// Runs the event loop until the window is closed. Never returns on its
    /// own while the window lives.
    pub fn run(mut self) -> Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("rigview")
                    .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT)),
            )
            .expect("fatal: could not create window");
        let window = Arc::new(window);
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        self.scene.camera.resize_projection(width, height);

        // Startup failures here are fatal; report and bail out.
        let mut render_engine =
            pollster::block_on(RenderEngine::new(window.clone(), width, height)).unwrap_or_else(
                |err| {
                    log::error!("failed to initialize renderer: {err:#}");
                    std::process::exit(1);
                },
            );
        render_engine.set_light(rig::light());

        self.scene
            .init_gpu_resources(render_engine.device(), render_engine.queue());

        let ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(render_engine);
        log::info!("renderer ready ({width}x{height})");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // The panel gets first refusal on input; captured events stay between
        // frames and never interleave with a tick.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.camera.resize_projection(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                // One tick: controls -> rig -> world transforms -> GPU -> draw
                rig::sync_controls(&self.controls, &mut self.scene);
                self.scene.update();
                render_engine.update(self.scene.camera.uniform);
                self.scene.write_transforms(render_engine.queue());

                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    let window = window.clone();
                    let controls = &mut self.controls;
                    render_engine.render_frame_with_ui(
                        &self.scene,
                        Some(
                            |device: &wgpu::Device,
                             queue: &wgpu::Queue,
                             encoder: &mut wgpu::CommandEncoder,
                             color_attachment: &wgpu::TextureView| {
                                ui_manager.draw(
                                    device,
                                    queue,
                                    encoder,
                                    &window,
                                    color_attachment,
                                    |ui| controls_panel(ui, controls),
                                );
                            },
                        ),
                    );
                } else {
                    render_engine.render_frame(&self.scene);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
