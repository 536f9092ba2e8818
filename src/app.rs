//! Window and frame loop for the showcase.
//!
//! [`run`] opens a window, composes the scene once the GPU is up, and then
//! renders continuously. Each frame advances the animation, applies the
//! debug panel and orbit controls, draws the scene and draws the panel on
//! top.

use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::animation::animate;
use crate::clock::Clock;
use crate::composer::{Composition, SceneComposer};
use crate::config::ShowcaseConfig;
use crate::controls::OrbitControls;
use crate::gpu::{GpuContext, GpuError};
use crate::input::Input;
use crate::mesh::MeshCache;
use crate::mesh_pass::MeshPass;
use crate::overlay::PanelOverlay;
use crate::panel::CAMERA_RANGE;
use crate::viewport::{self, Viewport};

/// Errors that stop the showcase.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Run the showcase until its window is closed.
///
/// # Example
/// ```no_run
/// let config = vitrine::ShowcaseConfig::new().title("Showroom").size(1600, 900);
/// vitrine::run(config).unwrap();
/// ```
pub fn run(config: ShowcaseConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ShowcaseApp::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        ShowcaseApp::Exited { error: Some(e) } => Err(e),
        _ => Ok(()),
    }
}

enum ShowcaseApp {
    Pending { config: ShowcaseConfig },
    Running(Box<Showcase>),
    Exited { error: Option<AppError> },
}

impl ApplicationHandler for ShowcaseApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let ShowcaseApp::Pending { config } = self else {
            return;
        };
        let config = std::mem::take(config);

        *self = match Showcase::new(event_loop, config) {
            Ok(showcase) => ShowcaseApp::Running(Box::new(showcase)),
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                ShowcaseApp::Exited { error: Some(e) }
            }
        };
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let ShowcaseApp::Running(showcase) = self else {
            return;
        };

        showcase.handle_input(&event);

        match event {
            WindowEvent::CloseRequested => {
                *self = ShowcaseApp::Exited { error: None };
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let scale = showcase.window.scale_factor() as f32;
                showcase.resize(size.width, size.height, scale);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = showcase.window.inner_size();
                showcase.resize(size.width, size.height, scale_factor as f32);
            }
            WindowEvent::RedrawRequested => {
                if !showcase.frame() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

/// Everything that lives for the duration of the window.
struct Showcase {
    window: Arc<Window>,
    gpu: GpuContext,
    composition: Composition,
    meshes: MeshCache,
    mesh_pass: MeshPass,
    overlay: PanelOverlay,
    controls: OrbitControls,
    input: Input,
    clock: Clock,
    viewport: Viewport,
}

impl Showcase {
    fn new(event_loop: &ActiveEventLoop, config: ShowcaseConfig) -> Result<Self, AppError> {
        let attrs = WindowAttributes::default()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let scale = window.scale_factor() as f32;
        let size = window.inner_size();
        let viewport = Viewport::new(
            size.width as f32 / scale,
            size.height as f32 / scale,
            scale,
        );
        let (width, height) = viewport.surface_size();
        let gpu = GpuContext::new(window.clone(), width, height)?;

        let overlay = PanelOverlay::new(
            &gpu,
            &config.assets.panel_font,
            config.assets.panel_font_size,
        );

        let composition = SceneComposer::new(config)
            .aspect(viewport.aspect())
            .compose();

        let mesh_pass = MeshPass::new(&gpu, composition.scene.environment.as_ref());
        let mut meshes = MeshCache::new();
        meshes.sync(&gpu, composition.scene.geometries());

        window.request_redraw();

        Ok(Self {
            window,
            gpu,
            composition,
            meshes,
            mesh_pass,
            overlay,
            controls: OrbitControls::new()
                .damping(true)
                .distance_limits(0.0, CAMERA_RANGE),
            input: Input::new(),
            clock: Clock::new(),
            viewport,
        })
    }

    /// Feed a window event to the input state. Cursor positions are mapped
    /// from window pixels to surface pixels, which differ when the pixel
    /// ratio is capped.
    fn handle_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let window_width = self.window.inner_size().width.max(1) as f32;
                let scale = self.gpu.width() as f32 / window_width;
                let position = Vec2::new(position.x as f32, position.y as f32) * scale;
                self.input.move_to(position);
            }
            other => self.input.handle_event(other),
        }
    }

    fn resize(&mut self, physical_width: u32, physical_height: u32, scale: f32) {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let (width, height) = viewport::resize(
            &mut self.composition.scene,
            &mut self.viewport,
            physical_width as f32 / scale,
            physical_height as f32 / scale,
            scale,
        );
        self.gpu.resize(width, height);
        log::debug!("resized surface to {}x{}", width, height);
    }

    /// Advance and draw one frame. Returns false if rendering cannot
    /// continue.
    fn frame(&mut self) -> bool {
        let (elapsed, dt) = self.clock.tick();
        let Composition { scene, panel, .. } = &mut self.composition;
        let surface_width = self.gpu.width() as f32;

        animate(scene, elapsed);
        self.overlay
            .state
            .interact(panel, scene, &mut self.input, surface_width);
        self.controls.update(scene, &self.input, dt);
        self.meshes.sync(&self.gpu, scene.geometries());
        self.overlay.prepare(panel, scene, surface_width);

        let keep_running = match self.render() {
            Ok(()) => true,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                true
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                false
            }
            Err(e) => {
                log::warn!("dropped frame: {}", e);
                true
            }
        };

        self.input.end_frame();
        self.window.request_redraw();
        keep_running
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.mesh_pass.render(
            &self.gpu,
            &mut encoder,
            &view,
            &self.composition.scene,
            &self.meshes,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panel Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.overlay.render(&self.gpu, &mut render_pass);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
