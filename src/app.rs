use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::config::{LifeConfig, MAX_TICKS_PER_FRAME};
use crate::error::{LifeError, Result};
use crate::gfx::rendering::life_renderer::fragment_cell;
use crate::gfx::{LifeRenderer, RenderEngine};
use crate::simulation::gpu::GpuLife;
use crate::simulation::grid::GridSize;

const WINDOW_SIZE: LogicalSize<u32> = LogicalSize::new(1280, 720);
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Fixed-rate tick accumulator
///
/// Frame time is banked and paid out in whole ticks. A backlog larger than
/// [`MAX_TICKS_PER_FRAME`] is dropped rather than run.
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: f32,
    accumulator: f32,
    paused: bool,
}

impl TickClock {
    /// `interval` is seconds per tick
    pub fn new(interval: f32, paused: bool) -> Self {
        Self {
            interval,
            accumulator: 0.0,
            paused,
        }
    }

    /// Ticks due after `dt` seconds
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.paused {
            return 0;
        }
        self.accumulator += dt;
        let due = (self.accumulator / self.interval).floor() as u32;
        if due > MAX_TICKS_PER_FRAME {
            log::debug!("Dropping {} ticks of backlog", due - MAX_TICKS_PER_FRAME);
            self.accumulator = 0.0;
            MAX_TICKS_PER_FRAME
        } else {
            self.accumulator -= due as f32 * self.interval;
            due
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.accumulator = 0.0;
        self.paused
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Cell under a cursor position, or `None` outside the surface
pub fn cursor_to_cell(
    position: PhysicalPosition<f64>,
    surface_size: (u32, u32),
    grid: GridSize,
) -> Option<(u32, u32)> {
    let (width, height) = surface_size;
    if width == 0 || height == 0 {
        return None;
    }
    let u = position.x / width as f64;
    let v = position.y / height as f64;
    if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
        return None;
    }
    Some(fragment_cell([u as f32, v as f32], grid))
}

pub struct LifeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct GpuState {
    render_engine: RenderEngine,
    life: GpuLife,
    renderer: LifeRenderer,
}

impl GpuState {
    fn build(window: Arc<Window>, config: &LifeConfig) -> Result<Self> {
        let (width, height) = window.inner_size().into();
        let render_engine = pollster::block_on(RenderEngine::new(window, width, height))?;
        let mut life = GpuLife::new(render_engine.context(), config)?;
        life.reset()?;
        let renderer =
            LifeRenderer::new(render_engine.device(), render_engine.surface_format(), &life)?;
        Ok(Self {
            render_engine,
            life,
            renderer,
        })
    }
}

struct AppState {
    config: LifeConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    clock: TickClock,
    cursor: Option<PhysicalPosition<f64>>,
    last_frame: Option<Instant>,
    last_report: Instant,
    fatal: Option<LifeError>,
}

impl LifeApp {
    pub fn new(config: LifeConfig) -> Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new()?;
        let clock = TickClock::new(config.tick_interval(), config.start_paused);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                gpu: None,
                clock,
                cursor: None,
                last_frame: None,
                last_report: Instant::now(),
                fatal: None,
            },
        })
    }

    /// Runs the event loop until the window closes or a fatal error occurs
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn rebuild_gpu(&mut self) -> Result<()> {
        let Some(window) = self.window.clone() else {
            return Ok(());
        };
        self.gpu = None;
        self.gpu = Some(GpuState::build(window, &self.config)?);
        self.clock.reset();
        self.last_frame = None;
        Ok(())
    }

    /// Device loss triggers a rebuild; anything else ends the run
    ///
    /// Any failure after the device-lost callback fired counts as device loss.
    fn handle_result(&mut self, event_loop: &ActiveEventLoop, result: Result<()>) {
        let lost = self.gpu.as_ref().is_some_and(|gpu| gpu.life.is_lost());
        let error = match result {
            Ok(()) => return,
            Err(error) if lost || matches!(error, LifeError::DeviceLost(_)) => {
                log::warn!("{error}, rebuilding and re-seeding");
                match self.rebuild_gpu() {
                    Ok(()) => return,
                    Err(error) => error,
                }
            }
            Err(error) => error,
        };
        log::error!("Fatal: {error}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key_code: KeyCode) -> Result<()> {
        match key_code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Space => {
                let paused = self.clock.toggle_pause();
                log::info!("{}", if paused { "Paused" } else { "Running" });
            }
            KeyCode::ArrowRight if self.clock.is_paused() => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.life.step()?;
                    log::debug!("Stepped to generation {}", gpu.life.generation());
                }
            }
            KeyCode::KeyR => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.life.reset()?;
                    log::info!("Reseeded with {:?}", self.config.pattern);
                }
                self.clock.reset();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_click(&mut self) -> Result<()> {
        let (Some(gpu), Some(cursor)) = (self.gpu.as_mut(), self.cursor) else {
            return Ok(());
        };
        let surface_size = gpu.render_engine.get_surface_size();
        if let Some(cell) = cursor_to_cell(cursor, surface_size, gpu.life.grid()) {
            gpu.life.set_alive(&[cell])?;
            log::debug!("Set cell {:?} alive", cell);
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };

        let ticks = self.clock.advance(dt);
        gpu.life.step_n(ticks)?;
        gpu.render_engine.render_frame(&gpu.life, &gpu.renderer)?;

        if now.duration_since(self.last_report) >= REPORT_INTERVAL {
            self.last_report = now;
            log::info!(
                "Generation {}: {} live cells",
                gpu.life.generation(),
                gpu.life.population()?
            );
        }
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(format!("Game of Life ({}x{})", self.config.width, self.config.height))
            .with_inner_size(WINDOW_SIZE);
        match event_loop.create_window(attributes) {
            Ok(window) => {
                self.window = Some(Arc::new(window));
                let result = self.rebuild_gpu();
                self.handle_result(event_loop, result);
            }
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let result = match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key_code),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
                Ok(())
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Ok(())
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.handle_click(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.render_engine.resize(width, height);
                }
                Ok(())
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => Ok(()),
        };
        self.handle_result(event_loop, result);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_pays_out_whole_ticks() {
        let mut clock = TickClock::new(0.25, false);
        assert_eq!(clock.advance(0.125), 0);
        assert_eq!(clock.advance(0.125), 1);
        assert_eq!(clock.advance(0.5), 2);
    }

    #[test]
    fn test_clock_follows_config_tick_rate() {
        let config = LifeConfig::default().with_tick_rate(20.0).with_start_paused(false);
        let mut clock = TickClock::new(config.tick_interval(), config.start_paused);
        assert_eq!(clock.advance(0.125), 2);
    }

    #[test]
    fn test_clock_caps_backlog() {
        let mut clock = TickClock::new(0.25, false);
        assert_eq!(clock.advance(60.0), MAX_TICKS_PER_FRAME);
        // Backlog was dropped, not carried over
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_paused_clock_never_ticks() {
        let mut clock = TickClock::new(0.25, true);
        assert_eq!(clock.advance(10.0), 0);
        assert!(!clock.toggle_pause());
        assert_eq!(clock.advance(0.25), 1);
    }

    #[test]
    fn test_cursor_to_cell() {
        let grid = GridSize::new(64, 36).unwrap();
        let surface = (1280, 720);
        assert_eq!(cursor_to_cell(PhysicalPosition::new(0.0, 0.0), surface, grid), Some((0, 0)));
        assert_eq!(cursor_to_cell(PhysicalPosition::new(1279.0, 719.0), surface, grid), Some((63, 35)));
        assert_eq!(cursor_to_cell(PhysicalPosition::new(640.0, 360.0), surface, grid), Some((32, 18)));
        assert_eq!(cursor_to_cell(PhysicalPosition::new(-1.0, 10.0), surface, grid), None);
        assert_eq!(cursor_to_cell(PhysicalPosition::new(10.0, 720.0), surface, grid), None);
    }
}
