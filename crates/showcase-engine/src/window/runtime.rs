use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::core::{AppControl, SurfaceRenderer};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction, WgpuDriver};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Close the window when Escape is pressed.
    pub exit_on_escape: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "primitive showcase".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            exit_on_escape: true,
        }
    }
}

/// Entry point for the runtime.
///
/// Hosts one window and drives a [`SurfaceRenderer`] through the surface
/// lifecycle: `surface_created` once the GPU is up, `surface_changed` with the
/// initial size and after every non-empty resize, then `draw_frame`
/// continuously until the window closes.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until exit.
    ///
    /// A failure inside a callback (GPU setup, renderer setup, a fatal surface
    /// error) stops the loop and is returned here.
    pub fn run<R>(config: RuntimeConfig, gpu_init: GpuInit, renderer: R) -> Result<()>
    where
        R: SurfaceRenderer + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut host = Host::new(config, gpu_init, renderer);

        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        match host.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Host<R>
where
    R: SurfaceRenderer + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    renderer: R,

    entry: Option<WindowEntry>,
    driver: Option<WgpuDriver>,
    clock: FrameClock,

    failure: Option<anyhow::Error>,
}

impl<R> Host<R>
where
    R: SurfaceRenderer + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, renderer: R) -> Self {
        Self {
            config,
            gpu_init,
            renderer,
            entry: None,
            driver: None,
            clock: FrameClock::new(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.failure.is_none() {
            self.failure = Some(err);
        }
        event_loop.exit();
    }

    /// Creates the window, the GPU context and the driver, then hands the
    /// surface to the renderer.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.as_str())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let mut driver = entry.with_gpu(|gpu| WgpuDriver::for_gpu(gpu));
        let size = entry.with_gpu(|gpu| gpu.size());

        self.renderer
            .surface_created(&mut driver)
            .context("renderer setup failed")?;
        self.renderer.surface_changed(&mut driver, Viewport::from(size));

        self.clock.reset();
        entry.with_window(|w| w.request_redraw());

        self.entry = Some(entry);
        self.driver = Some(driver);
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let (Some(entry), Some(driver)) = (self.entry.as_mut(), self.driver.as_mut()) else {
            return;
        };

        entry.with_gpu_mut(|gpu| gpu.resize(new_size));

        let viewport = Viewport::from(new_size);
        if viewport.is_valid() {
            self.renderer.surface_changed(driver, viewport);
        } else {
            log::debug!("surface hidden ({}x{})", new_size.width, new_size.height);
        }

        entry.with_window(|w| w.request_redraw());
    }

    /// Drives one frame: renderer records, driver encodes, GPU presents.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(entry), Some(driver)) = (self.entry.as_mut(), self.driver.as_mut()) else {
            return;
        };
        if !entry.with_gpu(|gpu| gpu.is_drawable()) {
            return;
        }

        let time = self.clock.tick();
        let control = self.renderer.draw_frame(driver, time);

        let action = entry.with_gpu_mut(|gpu| match gpu.begin_frame() {
            Ok(mut frame) => {
                let size = frame.size();
                driver.encode(&mut frame.encoder, &frame.view, size);
                gpu.submit(frame);
                None
            }
            Err(err) => {
                log::warn!("failed to acquire frame: {err}");
                Some(gpu.handle_surface_error(err))
            }
        });

        if action == Some(SurfaceErrorAction::Fatal) {
            self.fail(event_loop, anyhow::anyhow!("surface lost to a fatal error"));
            return;
        }

        if control == AppControl::Exit {
            event_loop.exit();
        }
    }
}

impl<R> ApplicationHandler for Host<R>
where
    R: SurfaceRenderer + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; presentation is paced by the present mode.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if self.config.exit_on_escape => event_loop.exit(),

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // The driver holds GPU resources created from the entry's device.
        self.driver = None;
        self.entry = None;
        log::debug!("runtime exiting");
    }
}
