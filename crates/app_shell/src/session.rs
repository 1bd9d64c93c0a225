use std::time::Duration;

use cube_core::{CubeAssembly, CubeError, RotationReport};
use cube_render::{pick, project, render_frame, unproject, CubeRenderer, FrameStats, RenderResult};
use glam::{Vec2, Vec3};
use mixer::{Mixer, MixerConfig};
use settings::{MixerSettings, UserSettings};
use tracing::{debug, info, warn};

use crate::{
    camera::CameraController,
    input::{InputEvent, Intent, PointerButton},
};

/// What applying an [`Intent`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome {
    Rotated(RotationReport),
    Refused(CubeError),
    Applied,
}

#[derive(Debug, Clone, Copy, Default)]
struct PointerState {
    position: Option<Vec2>,
    rotate_held: bool,
    translate_held: bool,
}

fn mixer_config(settings: &MixerSettings) -> MixerConfig {
    MixerConfig {
        min_steps: settings.min_steps,
        max_steps: settings.max_steps,
        step_delay: Duration::from_millis(settings.step_delay_ms),
        log_path: settings.log_path.clone(),
        seed: settings.seed,
    }
}

/// Everything one window interacts with: the cube, the camera, pointer
/// tracking and the scrambler run, if any.
pub struct Session {
    assembly: CubeAssembly,
    camera: CameraController,
    settings: UserSettings,
    pointer: PointerState,
    mixer: Option<Mixer>,
}

impl Session {
    pub fn new(settings: UserSettings) -> Self {
        let viewport = (settings.window.width, settings.window.height);
        Self {
            assembly: CubeAssembly::new(),
            camera: CameraController::new(&settings.camera, viewport),
            settings,
            pointer: PointerState::default(),
            mixer: None,
        }
    }

    pub fn assembly(&self) -> &CubeAssembly {
        &self.assembly
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn mixer_running(&self) -> bool {
        self.mixer.is_some()
    }

    /// The single path every wall turn takes, keyboard and mixer alike.
    pub fn apply_intent(&mut self, intent: Intent) -> IntentOutcome {
        match intent {
            Intent::RotateWall(wall) => match self.assembly.try_rotate_wall(wall) {
                Ok(report) => {
                    info!("{} wall rotated by {} degrees", wall, report.signed_degrees);
                    return IntentOutcome::Rotated(report);
                }
                Err(err) => {
                    info!("{err}");
                    return IntentOutcome::Refused(err);
                }
            },
            Intent::FlipDirection => {
                self.assembly.flip_rotation_direction();
            }
            Intent::HalveAngle => {
                self.assembly.halve_rotation_angle();
            }
            Intent::DoubleAngle => {
                self.assembly.double_rotation_angle();
            }
            Intent::TogglePicking => {
                self.assembly.toggle_picking_mode();
            }
            Intent::StartMixer => self.start_mixer(),
            Intent::CancelMixer => self.cancel_mixer(),
            Intent::Pan(direction) => {
                self.assembly
                    .pan(direction, self.settings.manipulation.arrow_pan_step);
            }
        }
        IntentOutcome::Applied
    }

    fn start_mixer(&mut self) {
        self.cancel_mixer();
        match Mixer::start(&mixer_config(&self.settings.mixer)) {
            Ok(mixer) => self.mixer = Some(mixer),
            Err(err) => warn!("Mixer aborted: {err}"),
        }
    }

    fn cancel_mixer(&mut self) {
        if let Some(mixer) = self.mixer.take() {
            mixer.cancel();
        }
    }

    /// Apply the mixer steps queued since the last frame. Returns how many
    /// were applied.
    pub fn tick(&mut self) -> usize {
        let Some(poll) = self.mixer.as_ref().map(Mixer::poll) else {
            return 0;
        };

        for step in &poll.steps {
            let angle = self.assembly.signed_angle();
            let blocked_by = match self.apply_intent(Intent::RotateWall(step.wall)) {
                IntentOutcome::Refused(CubeError::WallLocked { blocking, .. }) => Some(blocking),
                _ => None,
            };
            let Some(mixer) = self.mixer.as_mut() else {
                break;
            };
            if let Err(err) = mixer.record(step, angle, blocked_by) {
                warn!("Mixer stopped: {err}");
                self.cancel_mixer();
                return poll.steps.len();
            }
        }

        if poll.finished {
            if let Some(mixer) = self.mixer.take() {
                info!(
                    "Mixer actions have been written to {} ({} steps)",
                    mixer.log_path().display(),
                    mixer.recorded_steps()
                );
            }
        }
        poll.steps.len()
    }

    /// Returns whether the view needs a redraw.
    pub fn handle_input<R>(&mut self, event: InputEvent, renderer: &mut R) -> bool
    where
        R: CubeRenderer + ?Sized,
    {
        match event {
            InputEvent::Intent(intent) => {
                self.apply_intent(intent);
                true
            }
            InputEvent::PointerPressed { button } => self.pointer_pressed(button, renderer),
            InputEvent::PointerReleased { button } => {
                self.set_held(button, false);
                false
            }
            InputEvent::PointerMoved { position } => self.pointer_moved(position),
            InputEvent::Scrolled { lines } => {
                self.camera.zoom(lines, &self.settings.camera);
                true
            }
            InputEvent::Resized { width, height } => {
                let size = (width.max(1), height.max(1));
                self.camera.update_viewport(size);
                renderer.resize(size.0, size.1);
                true
            }
        }
    }

    fn set_held(&mut self, button: PointerButton, held: bool) {
        let manipulation = &self.settings.manipulation;
        if button == PointerButton::from(manipulation.rotate_button) {
            self.pointer.rotate_held = held;
        }
        if button == PointerButton::from(manipulation.translate_button) {
            self.pointer.translate_held = held;
        }
    }

    fn pointer_pressed<R>(&mut self, button: PointerButton, renderer: &mut R) -> bool
    where
        R: CubeRenderer + ?Sized,
    {
        self.set_held(button, true);
        let is_pick_button = button == PointerButton::from(self.settings.manipulation.translate_button);
        if !is_pick_button || !self.assembly.picking_mode() {
            return false;
        }
        let Some(position) = self.pointer.position else {
            return false;
        };
        self.pick_at(position, renderer);
        true
    }

    fn pick_at<R>(&mut self, position: Vec2, renderer: &mut R)
    where
        R: CubeRenderer + ?Sized,
    {
        if position.x < 0.0 || position.y < 0.0 {
            self.assembly.select(None);
            return;
        }
        let matrices = self.camera.matrices();
        let picked = match pick(renderer, &self.assembly, &matrices, position.x as u32, position.y as u32) {
            Ok(picked) => picked,
            Err(err) => {
                warn!("Pick failed: {err}");
                None
            }
        };
        if let Some(id) = picked {
            info!("Selected cube index: {}", id.get());
        }
        self.assembly.select(picked);
    }

    fn pointer_moved(&mut self, position: Vec2) -> bool {
        let previous = self.pointer.position.replace(position);
        let Some(previous) = previous else {
            return false;
        };
        let delta = previous - position;
        let selected = self.assembly.picking_mode() && self.assembly.selected().is_some();

        if self.pointer.rotate_held {
            let sensitivity = self.settings.manipulation.orbit_sensitivity;
            let (yaw, pitch) = (delta.x * sensitivity, delta.y * sensitivity);
            if selected {
                if let Err(err) = self.assembly.rotate_selected(yaw, pitch) {
                    debug!("{err}");
                }
            } else {
                self.assembly.orbit(yaw, pitch);
            }
            true
        } else if self.pointer.translate_held {
            if selected {
                self.drag_selected(previous, position);
            } else {
                self.camera.pan(delta, &self.settings.camera);
            }
            true
        } else {
            false
        }
    }

    /// Move the selected cube so it follows the cursor at its own depth.
    fn drag_selected(&mut self, from: Vec2, to: Vec2) {
        let Some(cube) = self.assembly.selected_cube() else {
            return;
        };
        let matrices = self.camera.matrices();
        let viewport = self.camera.viewport();
        let anchor = cube.model_matrix().transform_point3(Vec3::ZERO);
        let depth = project(anchor, matrices.view, matrices.projection, viewport).z;

        let height = viewport.height as f32;
        let to_window = |p: Vec2| Vec3::new(p.x, height - p.y, depth);
        let start = unproject(to_window(from), matrices.view, matrices.projection, viewport);
        let end = unproject(to_window(to), matrices.view, matrices.projection, viewport);
        if let (Some(start), Some(end)) = (start, end) {
            if let Err(err) = self.assembly.translate_selected_world(end - start) {
                debug!("{err}");
            }
        }
    }

    pub fn render<R>(&self, renderer: &mut R) -> RenderResult<FrameStats>
    where
        R: CubeRenderer + ?Sized,
    {
        render_frame(renderer, &self.assembly, &self.camera.matrices())
    }

    /// Cancel any scrambler run and wait for its thread.
    pub fn shutdown(&mut self) {
        self.cancel_mixer();
    }
}
