//! The session facade: one fluid instance bound to a display surface.
//!
//! Hosts construct a session, then drive `step(); render();` once per
//! animation frame and forward pointer and audio input between frames.
//! Dropping the session releases every field; there is no destroyed-but-alive
//! state to misuse.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::AudioFrame;
use crate::compositor::Compositor;
use crate::config::{SimulationConfig, SIM_RESOLUTION};
use crate::error::SessionError;
use crate::impulse;
use crate::palette;
use crate::particles;
use crate::solver;
use crate::store::FieldStore;

/// An interactive fluid simulation with a display-sized output frame.
#[derive(Debug)]
pub struct FluidSession {
    pub fields: FieldStore,
    config: SimulationConfig,
    display: Vec2,
    audio: AudioFrame,
    rng: StdRng,
    compositor: Compositor,
}

impl FluidSession {
    /// Creates a session at the default simulation resolution.
    pub fn new(
        config: SimulationConfig,
        display_width: usize,
        display_height: usize,
    ) -> Result<Self, SessionError> {
        Self::with_resolution(config, display_width, display_height, SIM_RESOLUTION)
    }

    /// Creates a session on a custom simulation grid. Construction either
    /// yields a fully initialized session or an error, never a partial one.
    pub fn with_resolution(
        config: SimulationConfig,
        display_width: usize,
        display_height: usize,
        resolution: usize,
    ) -> Result<Self, SessionError> {
        if display_width == 0 || display_height == 0 {
            return Err(SessionError::ZeroDisplay {
                width: display_width,
                height: display_height,
            });
        }
        let config = config.clamped();
        let display = Vec2::new(display_width as f32, display_height as f32);
        let mut fields = FieldStore::new(resolution, config.particle_count)?;
        let mut rng = StdRng::from_entropy();
        if let Some(particles) = fields.particles.as_mut() {
            particles::seed(particles, display, &mut rng);
        }
        log::info!(
            "fluid session: {resolution}x{resolution} grid, {display_width}x{display_height} \
             display, {} particles, palette {:?}",
            config.particle_count,
            config.palette
        );
        Ok(Self {
            fields,
            config,
            display,
            audio: AudioFrame::SILENT,
            rng,
            compositor: Compositor::new(display_width, display_height),
        })
    }

    /// Changes the viewport. The simulation grid and every field keep their
    /// dimensions; only impulse mapping, particle space, and the output
    /// frame follow the new extent.
    pub fn resize(&mut self, display_width: usize, display_height: usize) {
        if display_width == 0 || display_height == 0 {
            log::warn!("ignoring resize to {display_width}x{display_height}");
            return;
        }
        log::debug!("viewport resize to {display_width}x{display_height}");
        self.display = Vec2::new(display_width as f32, display_height as f32);
        self.compositor.resize(display_width, display_height);
    }

    /// Injects a velocity impulse from a pointer drag. `(x, y)` is the
    /// pointer position and `(dx, dy)` its frame-to-frame delta, all in
    /// display pixels. Positions outside the viewport simply land outside
    /// the splat radius.
    pub fn add_velocity(&mut self, x: f32, y: f32, dx: f32, dy: f32) {
        let point = self.to_sim(Vec2::new(x, y));
        impulse::splat_velocity(&mut self.fields.velocity, point, Vec2::new(dx, dy));
    }

    /// Injects a dye splat at a pointer position using one random stop of
    /// the named palette. Unknown names fall back to ocean.
    pub fn add_density(&mut self, x: f32, y: f32, palette_name: &str) {
        let point = self.to_sim(Vec2::new(x, y));
        let color = palette::by_name(palette_name).random_stop(&mut self.rng);
        impulse::splat_density(&mut self.fields.density, point, color);
    }

    /// Replaces the audio frame used by subsequent steps.
    pub fn update_with_audio(&mut self, frame: AudioFrame) {
        self.audio = frame;
    }

    /// Advances the simulation by one fixed time step.
    pub fn step(&mut self) {
        solver::step(
            &mut self.fields,
            &self.config,
            self.audio,
            self.display,
            &mut self.rng,
        );
    }

    /// Composes and returns the current RGBA8 frame at display resolution.
    pub fn render(&mut self) -> &[u8] {
        self.compositor.render(&mut self.fields, &self.config)
    }

    /// Applies new tunables between steps. The particle population is fixed
    /// for the session's lifetime; a differing count is ignored with a
    /// warning.
    pub fn set_config(&mut self, config: SimulationConfig) {
        let mut config = config.clamped();
        if config.particle_count != self.config.particle_count {
            log::warn!(
                "particle count is fixed per session ({} requested, keeping {})",
                config.particle_count,
                self.config.particle_count
            );
            config.particle_count = self.config.particle_count;
        }
        self.config = config;
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current viewport extent in pixels.
    pub fn display_size(&self) -> Vec2 {
        self.display
    }

    /// Simulation grid resolution.
    pub fn resolution(&self) -> usize {
        self.fields.resolution()
    }

    /// Samples the velocity field at a display position. Diagnostic probe;
    /// the hot path never calls it.
    pub fn velocity_at_display(&self, x: f32, y: f32) -> Vec2 {
        let uv = (Vec2::new(x, y) / self.display).clamp(Vec2::ZERO, Vec2::ONE);
        let v = self.fields.velocity.front().sample(uv);
        Vec2::new(v.x, v.y)
    }

    fn to_sim(&self, pos: Vec2) -> Vec2 {
        pos / self.display * self.fields.resolution() as f32
    }
}

impl Drop for FluidSession {
    fn drop(&mut self) {
        log::info!("fluid session released");
    }
}
