use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::canvas::NullPresenter;
use crate::coords::Viewport;
use crate::device::{DeviceStatus, Gpu, GpuInit, SurfaceErrorAction};
use crate::engine::{EngineConfig, InkEngine};
use crate::input::platform::winit::translate_window_event;
use crate::input::PointerState;
use crate::render::{GpuPresenter, Renderers};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub engine: EngineConfig,
    pub gpu: GpuInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quill".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            engine: EngineConfig::default(),
            gpu: GpuInit::default(),
        }
    }
}

/// Entry point for the runtime.
///
/// Opens one window, feeds its pointer input to an [`InkEngine`] and presents
/// frames through the GPU. Between frames the loop sleeps until the engine's
/// next deadline.
pub struct Runtime;

impl Runtime {
    pub fn run(config: RuntimeConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    engine: InkEngine,
    pointer: PointerState,
    renderers: Renderers,
    device_status: DeviceStatus,

    window: Window,

    // `None` when the window has no usable GPU; input still reaches the engine.
    #[borrows(window)]
    #[covariant]
    gpu: Option<Gpu<'this>>,
}

struct AppState {
    config: RuntimeConfig,
    window: Option<WindowEntry>,
    exit_requested: bool,
}

impl AppState {
    fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            window: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let engine = InkEngine::new(self.config.engine.clone(), viewport_of(&window));
        let gpu_init = self.config.gpu.clone();
        let mut device_status = DeviceStatus::Ready;

        let mut entry = WindowEntryBuilder {
            engine,
            pointer: PointerState::default(),
            renderers: Renderers::new(),
            device_status: DeviceStatus::Ready,
            window,
            gpu_builder: |w| match pollster::block_on(Gpu::new(w, gpu_init)) {
                Ok(gpu) => Some(gpu),
                Err(e) => {
                    log::error!("GPU unavailable, running without display: {e:#}");
                    device_status = DeviceStatus::Unavailable(format!("{e:#}"));
                    None
                }
            },
        }
        .build();

        entry.with_device_status_mut(|s| *s = device_status);
        entry.with_window(|w| w.request_redraw());

        self.window = Some(entry);
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.request_exit(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.window.as_mut() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        let now = Instant::now();
        let deadline = entry.with_mut(|fields| {
            let deadline = fields.engine.next_deadline();
            let due = deadline.is_some_and(|d| d <= now);
            // While ticking, frames wait for the deadline.
            let requested = fields.engine.take_redraw_request() && deadline.is_none();
            if requested || due {
                fields.window.request_redraw();
            }
            deadline
        });

        // Idle until input arrives; while ink is in flight, wake at the next tick.
        match deadline {
            Some(d) if d > now => event_loop.set_control_flow(ControlFlow::WaitUntil(d)),
            _ => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.window.as_mut() else {
            return;
        };
        let now = Instant::now();

        match &event {
            WindowEvent::CloseRequested => {
                entry.with(|fields| {
                    log::info!(
                        "closing: {} strokes committed, device {:?}",
                        fields.engine.strokes().committed_len(),
                        fields.device_status
                    );
                });
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                entry.with_mut(|fields| {
                    let size = fields.window.inner_size();
                    if let Some(gpu) = fields.gpu.as_mut() {
                        gpu.resize(size);
                    }
                    fields.engine.resize(viewport_of(fields.window));
                    fields.engine.repaint_all(now);
                    fields.window.request_redraw();
                });
            }

            WindowEvent::RedrawRequested => {
                entry.with_mut(|fields| {
                    let engine = fields.engine;
                    let action = match fields.gpu.as_mut() {
                        Some(gpu) => {
                            let mut presenter =
                                GpuPresenter::new(gpu, fields.renderers, engine.viewport());
                            engine.redraw(now, &mut presenter);
                            presenter.action()
                        }
                        None => {
                            engine.redraw(now, &mut NullPresenter);
                            None
                        }
                    };

                    match action {
                        Some(SurfaceErrorAction::Unavailable) => {
                            log::error!("GPU can no longer present; continuing without display");
                            *fields.gpu = None;
                            *fields.device_status =
                                DeviceStatus::Unavailable("surface out of memory".to_string());
                        }
                        Some(SurfaceErrorAction::Reconfigured) => fields.window.request_redraw(),
                        Some(SurfaceErrorAction::SkipFrame) | None => {}
                    }
                });
            }

            _ => {
                entry.with_mut(|fields| {
                    let Some(pointer) =
                        translate_window_event(fields.window, fields.pointer, &event, now)
                    else {
                        return;
                    };
                    if let Some(stroke) = fields.pointer.apply_event(pointer) {
                        fields.engine.handle(stroke, now);
                    }
                });
            }
        }
    }
}

/// Logical drawable area of `window`.
fn viewport_of(window: &Window) -> Viewport {
    let scale = window.scale_factor();
    let size = window.inner_size().to_logical::<f64>(scale);
    Viewport::new(size.width as f32, size.height as f32, scale as f32)
}
