mod app;
mod gl_window;
mod timing;

use anyhow::{Result, ensure};
use app::{App, AppConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use trigon_render::Projection;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser, Debug)]
#[command(
    name = "trigon-desktop",
    about = "Spinning triangle with a fly camera and hot-reloaded shaders"
)]
struct Cli {
    /// Vertex shader source
    #[arg(long, default_value = "assets/shaders/triangle.vert")]
    vertex: PathBuf,

    /// Fragment shader source
    #[arg(long, default_value = "assets/shaders/triangle.frag")]
    fragment: PathBuf,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f32,

    /// Near clip plane distance
    #[arg(long, default_value_t = 0.1)]
    near: f32,

    /// Far clip plane distance
    #[arg(long, default_value_t = 100.0)]
    far: f32,

    /// Present as fast as possible instead of waiting for vblank
    #[arg(long)]
    no_vsync: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig> {
        ensure!(
            (1.0..=179.0).contains(&self.fov),
            "--fov must be within [1, 179] degrees, got {}",
            self.fov
        );
        ensure!(self.near > 0.0, "--near must be positive, got {}", self.near);
        ensure!(
            self.far > self.near,
            "--far ({}) must be greater than --near ({})",
            self.far,
            self.near
        );
        Ok(AppConfig {
            vertex: self.vertex,
            fragment: self.fragment,
            size: (self.width, self.height),
            projection: Projection {
                fov_y_degrees: self.fov,
                near: self.near,
                far: self.far,
            },
            vsync: !self.no_vsync,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = cli.into_config()?;
    tracing::info!(
        vertex = %config.vertex.display(),
        fragment = %config.fragment.display(),
        "trigon-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    app.into_result()
}
