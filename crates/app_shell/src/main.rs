//! Window shell for the cube simulator.
//!
//! Frames are driven through the `CubeRenderer` contract using the CPU
//! `HeadlessRenderer`, which backs picking but presents nothing. The window
//! stays blank until a GPU backend implements the trait; input, picking,
//! wall turns and the mixer all work without one.

mod camera;
mod input;
mod session;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cube_render::HeadlessRenderer;
use session::Session;
use settings::{SettingsStore, UserSettings};
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

/// Frame pacing while a scramble is feeding steps.
const MIXER_FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let user_settings = match SettingsStore::new() {
        Ok(store) => load_settings(&store),
        Err(err) => {
            warn!("Using default settings (no settings store): {err}");
            UserSettings::default()
        }
    };

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = CubeApp::new(user_settings);
    event_loop.run_app(&mut app).context("event loop error")?;
    app.session.shutdown();
    Ok(())
}

/// Load the user's settings, writing the defaults out on first run so there
/// is a file to edit.
fn load_settings(store: &SettingsStore) -> UserSettings {
    let settings = store.load_or_default();
    if !store.path().exists() {
        match store.save(&settings) {
            Ok(()) => info!("Wrote default settings to {}", store.path().display()),
            Err(err) => warn!("Failed to write {}: {err}", store.path().display()),
        }
    }
    settings
}

struct CubeApp {
    session: Session,
    renderer: HeadlessRenderer,
    window: Option<Window>,
    window_id: Option<WindowId>,
    window_size: PhysicalSize<u32>,
    title: String,
}

impl CubeApp {
    fn new(user_settings: UserSettings) -> Self {
        let window_size = PhysicalSize::new(user_settings.window.width, user_settings.window.height);
        let title = user_settings.window.title.clone();
        Self {
            renderer: HeadlessRenderer::new(window_size.width, window_size.height),
            session: Session::new(user_settings),
            window: None,
            window_id: None,
            window_size,
            title,
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        self.session.tick();
        if let Err(err) = self.session.render(&mut self.renderer) {
            error!("frame failed: {err}");
        }
    }
}

impl ApplicationHandler for CubeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title(self.title.clone())
                .with_inner_size(self.window_size),
        ) {
            Ok(window) => window,
            Err(err) => {
                error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.session.handle_input(
            input::InputEvent::Resized {
                width: size.width,
                height: size.height,
            },
            &mut self.renderer,
        );
        info!("Window ready at {}x{}", size.width, size.height);
        self.window_id = Some(window.id());
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if Some(window_id) != self.window_id {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.session.shutdown();
                event_loop.exit();
                return;
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                return;
            }
            _ => {}
        }

        if let Some(input) = input::translate_window_event(&event) {
            if self.session.handle_input(input, &mut self.renderer) {
                self.request_redraw();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.mixer_running() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + MIXER_FRAME));
            self.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }
}
