//! Starfolio - a 3D portfolio: a spaceship of hologram screens and rockets, warp travel to planets,
//! and a project detail view on each planet's surface.

mod camera_rig;
mod config;
mod director;
mod events;
mod layout;
mod render;
mod scenes;
mod selectable;
mod sequence;
mod state;
mod transitions;

use anyhow::Result;
use catalog::{t, Catalog};
use engine_core::Time;
use glam::Vec2;
use hecs::World;
use input::InputState;
use renderer::{Camera, Renderer};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorIcon, Fullscreen, Window, WindowId},
};

use config::PortfolioConfig;
use director::{SceneDirector, SceneEvent};
use layout::DeviceClass;
use render::DetailHit;
use scenes::SceneMount;
use state::SceneMode;

/// Everything alive while the window is open.
pub struct Portfolio {
    pub renderer: Renderer,
    pub camera: Camera,
    pub input: InputState,
    pub time: Time,
    pub world: World,
    pub director: SceneDirector,
    pub mount: SceneMount,
    pub config: PortfolioConfig,
    pub running: bool,
    fullscreen: bool,
    title: String,
}

impl Portfolio {
    async fn new(window: Arc<Window>, config: PortfolioConfig) -> Result<Self> {
        let catalog = Catalog::builtin()?;
        let glyphs = render::glyph_atlas(config.font_path.as_deref());
        let renderer = Renderer::new(window.clone(), config.vsync, glyphs).await?;

        let device = config
            .device
            .unwrap_or_else(|| DeviceClass::from_width(logical_width(&window)));
        log::info!("Device profile: {:?}", device);

        let director = SceneDirector::new(catalog, &config, device);
        let pose = director.camera_pose();
        let mut camera = Camera::new(pose.position, pose.look_at, director.fov());
        let (w, h) = renderer.dimensions();
        camera.set_aspect(w, h);

        let fullscreen = config.fullscreen;
        if fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let mut portfolio = Self {
            renderer,
            camera,
            input: InputState::new(),
            time: Time::new(),
            world: World::new(),
            director,
            mount: SceneMount::new(),
            config,
            running: true,
            fullscreen,
            title: String::new(),
        };
        portfolio.mount.sync(&mut portfolio.world, &portfolio.director);
        portfolio.refresh_title();
        Ok(portfolio)
    }

    /// One frame of input, orchestration and animation.
    fn update(&mut self) {
        self.time.update();
        let dt = self.time.delta_seconds();

        self.handle_keys();
        self.handle_pointer();

        self.director.update(dt);
        self.mount.sync(&mut self.world, &self.director);
        scenes::animate(&mut self.world, &self.director, dt, self.time.elapsed_seconds());

        let pose = self.director.camera_pose();
        self.camera.set_pose(pose.position, pose.look_at);
        self.camera.fov_degrees = self.director.fov();

        let pointer = self.director.hovered().is_some()
            && self.director.detail().is_none()
            && !self.director.has_sequence()
            && !self.director.transitions().any_active();
        self.renderer.window.set_cursor(if pointer {
            CursorIcon::Pointer
        } else {
            CursorIcon::Default
        });
        self.refresh_title();

        self.input.end_frame();
    }

    fn handle_keys(&mut self) {
        if self.input.is_escape_pressed() {
            self.director.reduce(SceneEvent::Escape);
        }
        if self.input.is_back_pressed() {
            self.director.reduce(SceneEvent::Back);
        }
        if self.input.is_confirm_pressed() {
            self.director.reduce(SceneEvent::ConfirmSelection);
        }
        if self.input.is_language_toggle_pressed() {
            self.director.toggle_language();
            self.config.language = self.director.language();
            self.config.save();
        }
        if self.input.is_fullscreen_toggle_pressed() {
            self.fullscreen = !self.fullscreen;
            self.renderer
                .window
                .set_fullscreen(self.fullscreen.then_some(Fullscreen::Borderless(None)));
        }
    }

    fn handle_pointer(&mut self) {
        let (w, h) = self.renderer.dimensions();
        let size = Vec2::new(w as f32, h as f32);

        if self.input.is_click_pressed() {
            if let (Some(project), Some(cursor)) = (self.director.detail(), self.input.cursor()) {
                match render::detail_hit(&render::detail_layout(size, project), cursor) {
                    DetailHit::Link(url) => open_link(&url),
                    DetailHit::Close | DetailHit::Backdrop => self.director.reduce(SceneEvent::CloseDetail),
                    DetailHit::Card => {}
                }
                return;
            }
        }

        self.director
            .orbit(self.input.drag_delta(), self.input.scroll(), size.y);

        let pick = self.input.cursor().and_then(|cursor| {
            let hits = selectable::screen_hits(&self.world, &self.camera, size.x, size.y);
            selectable::pick(&hits, cursor).cloned()
        });
        if let Some(event) = selectable::hover_change(pick.as_ref(), self.director.hovered()) {
            self.director.reduce(event);
        }

        if self.input.is_click_pressed() {
            if let Some(id) = pick {
                self.director.reduce(SceneEvent::Click(id));
            }
        }
    }

    /// Re-layout for the window's current logical width, unless the profile is pinned in config.
    fn refresh_device(&mut self) {
        if self.config.device.is_none() {
            let device = DeviceClass::from_width(logical_width(&self.renderer.window));
            self.director.set_device(device);
        }
    }

    fn refresh_title(&mut self) {
        let lang = self.director.language();
        let ship = t(lang, "우주선", "Spaceship");
        let location = match (self.director.mode(), self.director.current_planet()) {
            (SceneMode::Surface, Some(planet)) => planet.name.get(lang).to_string(),
            _ => match self
                .director
                .selected_planet_id()
                .and_then(|id| self.director.catalog().find_planet(id))
            {
                Some(planet) => format!("{} > {}", ship, planet.name.get(lang)),
                None => ship.to_string(),
            },
        };
        let title = format!("Starfolio | {}", location);
        if title != self.title {
            self.renderer.window.set_title(&title);
            self.title = title;
        }
    }

    fn render(&mut self) -> Result<()> {
        render::run(self)
    }
}

/// Hand a project link to the system browser.
fn open_link(url: &str) {
    log::info!("Opening {}", url);
    if let Err(e) = open::that_detached(url) {
        log::error!("Could not open {}: {}", url, e);
    }
}

fn logical_width(window: &Window) -> f32 {
    let scale = window.scale_factor().max(f64::EPSILON);
    (window.inner_size().width as f64 / scale) as f32
}

/// Application handler for winit.
struct App {
    state: Option<Portfolio>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = PortfolioConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Starfolio")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let state = pollster::block_on(Portfolio::new(window.clone(), config));
            match state {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                           Starfolio                              ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  CONTROLS:                                                       ║");
    println!("║    Mouse      - Hover / select │  Click again - Warp to planet   ║");
    println!("║    Drag/Wheel - Orbit / zoom on a planet surface                 ║");
    println!("║    Enter      - Warp to planet │  Backspace   - Back to ship     ║");
    println!("║    Escape     - Close / back / clear selection                   ║");
    println!("║    L          - Korean/English │  F11         - Fullscreen       ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    log::info!("Starting Starfolio");

    let event_loop = EventLoop::new()?;
    // Animations are frame-driven; keep redrawing continuously.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
