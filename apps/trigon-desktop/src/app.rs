use crate::gl_window::GlWindow;
use crate::timing::{FixedTimestep, FpsCounter};
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use trigon_input::{Camera, CaptureChange, MoveKey, PlayerController};
use trigon_render::{FrameUniforms, GlowContext, Projection, TriangleRenderer};
use trigon_shader::ReloadStatus;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

const TITLE: &str = "Trigon";
const FPS_INTERVAL: Duration = Duration::from_millis(500);

/// Startup settings, already validated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Vertex shader source, watched for edits.
    pub vertex: PathBuf,
    /// Fragment shader source, watched for edits.
    pub fragment: PathBuf,
    /// Initial inner window size in physical pixels.
    pub size: (u32, u32),
    /// Camera projection; the aspect ratio follows the window.
    pub projection: Projection,
    /// Wait for vblank when presenting.
    pub vsync: bool,
}

/// GPU-side state, created once the event loop resumes.
struct Graphics {
    renderer: TriangleRenderer,
    gpu: GlowContext,
    // Declared last so GL objects are released before the context goes away.
    window: GlWindow,
}

fn map_move_key(key: KeyCode) -> Option<MoveKey> {
    match key {
        KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::KeyS => Some(MoveKey::Back),
        KeyCode::KeyA => Some(MoveKey::Left),
        KeyCode::KeyD => Some(MoveKey::Right),
        _ => None,
    }
}

pub struct App {
    config: AppConfig,
    graphics: Option<Graphics>,
    camera: Camera,
    controller: PlayerController,
    timestep: FixedTimestep,
    fps: FpsCounter,
    started: Instant,
    last_frame: Instant,
    size: (u32, u32),
    failure: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let now = Instant::now();
        Self {
            size: config.size,
            config,
            graphics: None,
            camera: Camera::default(),
            controller: PlayerController::new(),
            timestep: FixedTimestep::default(),
            fps: FpsCounter::new(now, FPS_INTERVAL),
            started: now,
            last_frame: now,
            failure: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn into_result(self) -> Result<()> {
        self.failure.map_or(Ok(()), Err)
    }

    fn init_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let (width, height) = self.config.size;
        let attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(PhysicalSize::new(width, height));
        let (window, gpu) = GlWindow::create(event_loop, attributes, self.config.vsync)?;

        let info = gpu.driver_info();
        tracing::info!(
            version = %info.version,
            glsl = %info.shading_language,
            renderer = %info.renderer,
            vendor = %info.vendor,
            "OpenGL context ready"
        );

        let renderer = TriangleRenderer::new(&gpu, &self.config.vertex, &self.config.fragment)
            .context("failed to build the triangle shader")?;
        Ok(Graphics {
            renderer,
            gpu,
            window,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = (size.width, size.height);
        if let Some(graphics) = &self.graphics {
            graphics.window.resize(size.width, size.height);
            graphics.gpu.set_viewport(size.width, size.height);
        }
        tracing::debug!(width = size.width, height = size.height, "window resized");
    }

    fn apply_capture(&self, change: CaptureChange) {
        let Some(graphics) = &self.graphics else {
            return;
        };
        let window = &graphics.window.window;
        match change {
            CaptureChange::Captured => {
                let grabbed = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(err) = grabbed {
                    tracing::warn!("cursor grab unavailable: {err}");
                }
                window.set_cursor_visible(false);
            }
            CaptureChange::Released => {
                if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                    tracing::warn!("cursor release failed: {err}");
                }
                window.set_cursor_visible(true);
            }
        }
        tracing::info!(?change, "mouse capture");
    }

    fn simulate(&mut self, now: Instant) {
        let frame_time = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        let dt = self.timestep.step_seconds();
        for _ in 0..self.timestep.advance(frame_time) {
            if let Some(change) = self.controller.update(dt, &mut self.camera) {
                self.apply_capture(change);
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        self.simulate(now);

        let Some(graphics) = &mut self.graphics else {
            return;
        };
        let time = now.duration_since(self.started).as_secs_f32();
        let uniforms = FrameUniforms::new(&self.camera, &self.config.projection, self.size, time);
        if let ReloadStatus::Failed(err) = graphics.renderer.render(&graphics.gpu, &uniforms) {
            tracing::debug!(recoverable = err.is_recoverable(), "still drawing previous shader");
        }

        if let Err(err) = graphics.window.swap_buffers() {
            self.fail(event_loop, err);
            return;
        }
        if let Some(fps) = self.fps.frame(now) {
            graphics
                .window
                .window
                .set_title(&format!("{TITLE} | {fps:.0} FPS"));
        }
    }

    fn shutdown(&mut self) {
        if let Some(graphics) = self.graphics.take() {
            graphics.renderer.destroy(&graphics.gpu);
            tracing::info!("renderer shut down");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        match self.init_graphics(event_loop) {
            Ok(graphics) => {
                let size = graphics.window.window.inner_size();
                self.graphics = Some(graphics);
                self.resize(size);
                self.last_frame = Instant::now();
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::Focused(false) => self.controller.release_all(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if key == KeyCode::Escape && pressed {
                    event_loop.exit();
                } else if let Some(key) = map_move_key(key) {
                    self.controller.key(key, pressed);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state,
                ..
            } => self.controller.look_button(state == ElementState::Pressed),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.controller.mouse_motion(dx, dy);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_maps_to_move_keys() {
        assert_eq!(map_move_key(KeyCode::KeyW), Some(MoveKey::Forward));
        assert_eq!(map_move_key(KeyCode::KeyS), Some(MoveKey::Back));
        assert_eq!(map_move_key(KeyCode::KeyA), Some(MoveKey::Left));
        assert_eq!(map_move_key(KeyCode::KeyD), Some(MoveKey::Right));
        assert_eq!(map_move_key(KeyCode::Space), None);
    }

    #[test]
    fn app_without_window_succeeds() {
        let app = App::new(AppConfig {
            vertex: PathBuf::from("a.vert"),
            fragment: PathBuf::from("a.frag"),
            size: (640, 480),
            projection: Projection::default(),
            vsync: true,
        });
        assert!(app.into_result().is_ok());
    }
}
