use anyhow::{Context as _, Result, anyhow};
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use std::num::NonZeroU32;
use trigon_render::GlowContext;
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::HasWindowHandle;
use winit::window::{Window, WindowAttributes};

/// A window with a current OpenGL 3.3 core context bound to it.
pub struct GlWindow {
    // Field order matters for drop: the context goes before the window.
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    /// The winit window the surface presents to.
    pub window: Window,
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .max_by_key(|config| (config.depth_size(), config.num_samples()))
        // DisplayBuilder reports an error before calling the picker with no configs.
        .expect("display offered at least one GL config")
}

impl GlWindow {
    pub fn create(
        event_loop: &ActiveEventLoop,
        attributes: WindowAttributes,
        vsync: bool,
    ) -> Result<(Self, GlowContext)> {
        let template = ConfigTemplateBuilder::new()
            .with_depth_size(24)
            .with_single_buffering(false);
        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes.clone()))
            .build(event_loop, template, pick_config)
            .map_err(|err| anyhow!("failed to choose a GL config: {err}"))?;

        let raw_handle = window
            .as_ref()
            .and_then(|window| window.window_handle().ok())
            .map(|handle| handle.as_raw());
        let display = config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(raw_handle);
        let not_current = unsafe { display.create_context(&config, &context_attributes) }
            .context("failed to create an OpenGL 3.3 core context")?;

        let window = match window {
            Some(window) => window,
            None => glutin_winit::finalize_window(event_loop, attributes, &config)
                .context("failed to create window")?,
        };
        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .context("window has no usable native handle")?;
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .context("failed to create window surface")?;
        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        let interval = if vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            tracing::warn!(vsync, "could not set swap interval: {err}");
        }

        let gl = unsafe { GlowContext::from_loader(|symbol| display.get_proc_address(symbol)) };
        tracing::info!(
            depth_bits = config.depth_size(),
            samples = config.num_samples(),
            "created GL window"
        );

        Ok((
            Self {
                context,
                surface,
                window,
            },
            gl,
        ))
    }

    /// Resizes the default framebuffer. Zero sizes (minimized) are ignored.
    pub fn resize(&self, width: u32, height: u32) {
        if let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, width, height);
        }
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to present frame")
    }
}
