//! Simulation configuration and global constants.

use serde::{Deserialize, Serialize};

/// Fixed simulation time step. The solver never integrates wall-clock time.
pub const DT: f32 = 0.016;

/// Default simulation grid resolution (square).
pub const SIM_RESOLUTION: usize = 512;

/// Hard cap on the particle overlay.
pub const MAX_PARTICLES: usize = 5000;

/// Tunable parameters for a session.
///
/// Serializable so hosts can persist presets as opaque name -> config
/// records. Out-of-range values are clamped on entry; see [`Self::clamped`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Velocity diffusion rate, [0.0, 0.2]. Zero disables diffusion.
    pub viscosity: f32,
    /// Density diffusion rate, [0.0, 0.001].
    pub diffusion: f32,
    /// Pressure gradient scale applied during projection, [0.1, 1.0].
    pub pressure: f32,
    /// Vorticity confinement strength, [0.0, 0.5].
    pub vorticity: f32,
    /// Bloom contribution in the final composite, [0.0, 1.0].
    pub bloom_intensity: f32,
    /// Particle overlay population, [0, 5000]. Fixed for a session's lifetime.
    pub particle_count: usize,
    /// Constant downward body force when enabled.
    pub gravity: bool,
    /// Named color palette for density injection.
    pub palette: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            viscosity: 0.015,
            diffusion: 0.0001,
            pressure: 0.3,
            vorticity: 0.2,
            bloom_intensity: 0.6,
            particle_count: 1000,
            gravity: false,
            palette: "ocean".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Returns a copy with every tunable clamped into its documented range.
    pub fn clamped(&self) -> Self {
        Self {
            viscosity: self.viscosity.clamp(0.0, 0.2),
            diffusion: self.diffusion.clamp(0.0, 0.001),
            pressure: self.pressure.clamp(0.1, 1.0),
            vorticity: self.vorticity.clamp(0.0, 0.5),
            bloom_intensity: self.bloom_intensity.clamp(0.0, 1.0),
            particle_count: self.particle_count.min(MAX_PARTICLES),
            gravity: self.gravity,
            palette: self.palette.clone(),
        }
    }
}
