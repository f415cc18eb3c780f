//! Kinetic Terrain - procedural terrain viewer
//!
//! An N×N patch of fractal-noise terrain regenerates in place as the offset
//! scrolls across an infinite height field; the camera flies free above it.

mod camera;
mod cli;
mod params;
mod rendering;
mod terrain;
mod texture;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::Vec2;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use camera::{Camera, CameraMovement};
use cli::Args;
use params::{CameraConfig, LightRig, RenderConfig};
use rendering::{RenderSystem, SceneUniforms};
use terrain::TerrainSystem;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation state
    terrain: TerrainSystem,
    camera: Camera,
    lights: LightRig,

    // Configuration
    render_config: RenderConfig,
    args: Args,

    // Input and timing
    pressed_keys: HashSet<KeyCode>,
    last_frame: Instant,
}

impl App {
    fn new(args: Args) -> Self {
        let terrain = TerrainSystem::new(args.terrain_params());
        let camera = Camera::new(&CameraConfig::default());

        Self {
            window: None,
            render_system: None,
            terrain,
            camera,
            lights: LightRig::default(),
            render_config: RenderConfig::default(),
            args,
            pressed_keys: HashSet::new(),
            last_frame: Instant::now(),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("3D Kinetic Terrain")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        // Capture the cursor for mouse look; Confined is the fallback on
        // platforms without locked grab.
        if window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
            .is_ok()
        {
            window.set_cursor_visible(false);
        }

        // Initialize rendering system
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.terrain.mesh,
            &self.lights,
            self.args.texture.as_deref(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                error!("failed to initialize rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        info!(
            "terrain patch ready: {}x{} vertices, {} indices",
            self.terrain.params.grid_n,
            self.terrain.params.grid_n,
            self.terrain.mesh.indices.len()
        );

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => match (code, state) {
                (KeyCode::Escape, ElementState::Pressed) => event_loop.exit(),
                (_, ElementState::Pressed) => {
                    self.pressed_keys.insert(code);
                }
                (_, ElementState::Released) => {
                    self.pressed_keys.remove(&code);
                }
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                };
                self.camera.process_scroll(lines);
            }
            WindowEvent::Resized(size) => {
                self.render_config.window_width = size.width;
                self.render_config.window_height = size.height;
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &winit::event_loop::ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.camera.process_mouse(dx as f32, dy as f32);
        }
    }
}

impl App {
    fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed_keys.contains(&code)
    }

    /// Apply held keys: WASD flies the camera and, together with the arrow
    /// keys, scrolls the terrain offset across the noise domain.
    fn process_input(&mut self, dt_s: f32) {
        let (w, a, s, d) = (
            self.is_pressed(KeyCode::KeyW),
            self.is_pressed(KeyCode::KeyA),
            self.is_pressed(KeyCode::KeyS),
            self.is_pressed(KeyCode::KeyD),
        );

        if w {
            self.camera.process_keyboard(CameraMovement::Forward, dt_s);
        }
        if s {
            self.camera.process_keyboard(CameraMovement::Backward, dt_s);
        }
        if a {
            self.camera.process_keyboard(CameraMovement::Left, dt_s);
        }
        if d {
            self.camera.process_keyboard(CameraMovement::Right, dt_s);
        }

        let step = self.terrain.params.scroll_speed() * dt_s;
        let mut scroll = Vec2::ZERO;
        if w || self.is_pressed(KeyCode::ArrowUp) {
            scroll.y -= step;
        }
        if s || self.is_pressed(KeyCode::ArrowDown) {
            scroll.y += step;
        }
        if a || self.is_pressed(KeyCode::ArrowLeft) {
            scroll.x -= step;
        }
        if d || self.is_pressed(KeyCode::ArrowRight) {
            scroll.x += step;
        }
        if scroll != Vec2::ZERO {
            self.terrain.scroll(scroll);
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        if self.render_system.is_none() {
            return;
        }

        let now = Instant::now();
        let dt_s = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.process_input(dt_s);

        // Rebuild and re-upload vertices only when the offset actually moved;
        // the index buffer stays put for the lifetime of the window.
        let needs_upload = self.terrain.update();

        let uniforms = SceneUniforms {
            view_proj: self
                .camera
                .view_proj_matrix(&self.render_config)
                .to_cols_array_2d(),
            view_pos: self.camera.position.to_array(),
            shininess: self.lights.material_shininess,
            material_diffuse: self.lights.material_diffuse,
            _pad0: 0.0,
            material_specular: self.lights.material_specular,
            _pad1: 0.0,
        };

        let result = {
            let Some(render_system) = self.render_system.as_ref() else {
                return;
            };
            if needs_upload {
                render_system.update_vertices(&self.terrain.mesh.vertices);
            }
            render_system.update_scene_uniforms(&uniforms);
            render_system.render()
        };

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = (
                    self.render_config.window_width,
                    self.render_config.window_height,
                );
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(width, height);
                }
            }
            Err(e) => error!("render error: {:?}", e),
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut app = App::new(args);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
