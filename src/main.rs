use std::num::NonZeroU32;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result, anyhow};
use log::{debug, error, info, trace};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::canvas::Canvas;
use crate::caster::{RayHit, frame_rays};
use crate::config::{Config, MAX_RAY_DISTANCE, SCREEN_HEIGHT, SCREEN_WIDTH, TICK_RATE, Variant};
use crate::grid::Grid;
use crate::input::Controller;
use crate::player::Player;
use crate::projection::Projection;
use crate::renderer::ViewStyle;
use crate::scaler::Stretch;

mod canvas;
mod caster;
mod config;
mod grid;
mod input;
mod player;
mod projection;
mod renderer;
mod scaler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewKind {
    Map,
    Rays,
    View3d,
    Editor,
}

impl ViewKind {
    fn title(self, variant: Variant) -> &'static str {
        match (self, variant) {
            (ViewKind::Map, Variant::Fan | Variant::Rays) => "Main Game Window",
            (ViewKind::Map, _) => "Raycasting Game",
            (ViewKind::Rays, _) => "Raycasting Output",
            (ViewKind::View3d, _) => "3D View",
            (ViewKind::Editor, _) => "Map Editor",
        }
    }

    fn canvas_size(self, grid: &Grid) -> (usize, usize) {
        match self {
            ViewKind::Editor => {
                let [w, h] = grid.world_size();
                (w as usize, h as usize)
            }
            _ => (SCREEN_WIDTH, SCREEN_HEIGHT),
        }
    }
}

struct ViewWindow {
    kind: ViewKind,
    window: Rc<Window>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    canvas: Canvas,
    stretch: Stretch,
    cursor: Option<PhysicalPosition<f64>>,
}

impl ViewWindow {
    fn open(
        event_loop: &ActiveEventLoop,
        kind: ViewKind,
        variant: Variant,
        grid: &Grid,
    ) -> Result<Self> {
        let (w, h) = kind.canvas_size(grid);
        let attributes = Window::default_attributes()
            .with_title(kind.title(variant))
            .with_inner_size(LogicalSize::new(w as f64, h as f64));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .with_context(|| format!("creating {kind:?} window"))?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("{e}"))
            .context("softbuffer context")?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("{e}"))
            .context("softbuffer surface")?;

        Ok(Self {
            kind,
            window,
            surface,
            canvas: Canvas::new(w, h),
            stretch: Stretch::default(),
            cursor: None,
        })
    }

    /// Stretch the canvas to the window and show it.
    fn present(&mut self) -> Result<()> {
        let size = self.window.inner_size();
        let (dw, dh) = (size.width as usize, size.height as usize);
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // minimized
        };

        if !self.stretch.matches(dw, dh, self.canvas.width, self.canvas.height) {
            self.stretch = Stretch::new(dw, dh, self.canvas.width, self.canvas.height);
        }

        self.surface
            .resize(nw, nh)
            .map_err(|e| anyhow!("{e}"))
            .context("resizing surface")?;
        let mut buf = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow!("{e}"))
            .context("mapping surface buffer")?;
        self.stretch.blit(&mut buf, &self.canvas);
        buf.present()
            .map_err(|e| anyhow!("{e}"))
            .context("presenting surface")?;
        Ok(())
    }

    /// Cursor position in canvas pixels.
    fn cursor_on_canvas(&self) -> Option<(f32, f32)> {
        let pos = self.cursor?;
        let size = self.window.inner_size();
        Some(scaler::map_point(
            (pos.x, pos.y),
            (size.width as usize, size.height as usize),
            (self.canvas.width, self.canvas.height),
        ))
    }
}

struct App {
    config: Config,
    windows: Vec<ViewWindow>,
    init_error: Option<anyhow::Error>,

    grid: Grid,
    player: Player,
    controller: Controller,
    projection: Projection,
    rays: Vec<RayHit>,

    // Fixed-rate update
    last_tick: Instant,
    tick_accumulator: f32,

    frame_counter: u32,
    last_fps_print: Instant,
}

impl App {
    fn new(config: Config) -> Self {
        let [px, py] = config.player_start;
        let mut app = Self {
            windows: Vec::new(),
            init_error: None,

            grid: Grid::sample(),
            player: Player::new([px, py], 0.0),
            controller: Controller::new(
                config.movement,
                config.keys,
                config.turn_first,
                config.collide,
            ),
            projection: Projection {
                wall_height: config.wall_height,
                screen_height: SCREEN_HEIGHT,
                fade_distance: MAX_RAY_DISTANCE,
            },
            rays: Vec::new(),

            last_tick: Instant::now(),
            tick_accumulator: 0.0,

            frame_counter: 0,
            last_fps_print: Instant::now(),
            config,
        };
        app.recast();
        app
    }

    fn view_kinds(&self) -> Vec<ViewKind> {
        let views = self.config.views;
        [
            (views.map, ViewKind::Map),
            (views.ray_window, ViewKind::Rays),
            (views.view3d, ViewKind::View3d),
            (views.editor, ViewKind::Editor),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect()
    }

    fn open_windows(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        for kind in self.view_kinds() {
            let view = ViewWindow::open(event_loop, kind, self.config.variant, &self.grid)?;
            self.windows.push(view);
        }
        info!(
            "opened {} window(s) for variant `{}`, map {}x{} tiles",
            self.windows.len(),
            self.config.variant,
            self.grid.width(),
            self.grid.height()
        );
        Ok(())
    }

    fn update(&mut self) {
        // Cap dt so a stall does not replay seconds of held keys
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;

        let step = 1.0 / TICK_RATE;
        self.tick_accumulator += dt.as_secs_f32();
        while self.tick_accumulator >= step {
            let grid = self.config.uses_grid().then_some(&self.grid);
            self.controller.tick(&mut self.player, grid);
            self.tick_accumulator -= step;
        }

        self.recast();
    }

    /// Rays must be recast whenever the player or the grid changes, or the
    /// next redraw pairs old distances with the new pose.
    fn recast(&mut self) {
        self.rays = frame_rays(self.config.ray_range, &self.grid, &self.player);
    }

    fn key_input(&mut self, code: KeyCode, pressed: bool) {
        let grid = self.config.uses_grid().then_some(&self.grid);
        self.controller.key_event(code, pressed, &mut self.player, grid);
        if pressed {
            self.recast();
        }
    }

    /// Toggles the tile under a canvas point of the editor window.
    fn toggle_tile(&mut self, x: f32, y: f32) {
        match self.grid.toggle_at(x, y) {
            Some((col, row)) => {
                debug!("toggled tile ({col}, {row}) to {:?}", self.grid.cell(col, row));
                self.recast();
            }
            None => debug!("click at ({x:.0}, {y:.0}) is outside the grid"),
        }
    }

    fn draw(&mut self, id: WindowId) {
        let Some(view) = self.windows.iter_mut().find(|v| v.window.id() == id) else {
            return;
        };

        let buf = &mut view.canvas;
        match view.kind {
            ViewKind::Map if self.config.uses_grid() => {
                let views = self.config.views;
                let rays = views.map_rays.then_some(self.rays.as_slice());
                let marker = views.map_player.then_some(self.config.player_color);
                renderer::render_map(buf, &self.grid, &self.player, marker, rays);
            }
            ViewKind::Map => buf.clear(renderer::BLANK_MAP),
            ViewKind::Rays => renderer::render_fan(buf, &self.player, &self.rays),
            ViewKind::View3d => {
                let style = ViewStyle {
                    fill_ceiling_floor: self.config.fill_ceiling_floor,
                    overlay: self.config.overlay_on_view.then_some(self.config.player_color),
                };
                renderer::render_view(buf, &self.player, &self.rays, &self.projection, &style);
            }
            ViewKind::Editor => renderer::render_editor(buf, &self.grid),
        }

        if let Err(err) = view.present() {
            error!("{:?} window: {err:#}", view.kind);
        }
    }

    fn editor_click(&mut self, id: WindowId) {
        let Some(view) = self
            .windows
            .iter()
            .find(|v| v.window.id() == id && v.kind == ViewKind::Editor)
        else {
            return;
        };
        if let Some((x, y)) = view.cursor_on_canvas() {
            self.toggle_tile(x, y);
        }
    }

    fn count_frame(&mut self) {
        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            trace!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }
        if let Err(err) = self.open_windows(event_loop) {
            self.init_error = Some(err);
            event_loop.exit();
            return;
        }

        self.last_tick = Instant::now();
        self.update();
        for view in &self.windows {
            view.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window closed; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.key_input(code, state == ElementState::Pressed),

            WindowEvent::Focused(false) => self.controller.release_all(),

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(view) = self.windows.iter_mut().find(|v| v.window.id() == id) {
                    view.cursor = Some(position);
                }
            }

            WindowEvent::CursorLeft { .. } => {
                if let Some(view) = self.windows.iter_mut().find(|v| v.window.id() == id) {
                    view.cursor = None;
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.editor_click(id),

            WindowEvent::RedrawRequested => {
                self.draw(id);
                if self.windows.first().is_some_and(|v| v.window.id() == id) {
                    self.count_frame();
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.update();
        for view in &self.windows {
            view.window.request_redraw();
        }
    }
}

fn run(variant: Variant) -> Result<()> {
    let event_loop = EventLoop::new().context("initializing the windowing system")?;
    // Redraws are requested every time the loop goes idle, so Wait still
    // renders continuously without spinning when nothing is due.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(Config::for_variant(variant));
    event_loop.run_app(&mut app).context("running the event loop")?;

    match app.init_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let variant = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<Variant>() {
            Ok(v) => v,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Variant::default(),
    };
    info!("starting variant `{variant}`");

    match run(variant) {
        Ok(()) => {
            info!("shut down");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            println!("could not initialize graphics: {err:#}");
            ExitCode::FAILURE
        }
    }
}
