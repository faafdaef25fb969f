//! The full set of fields one session owns.

use crate::error::FieldError;
use crate::field::{Field, FieldPair};

/// Every field the solver and compositor touch, allocated once at session
/// construction and never resized.
///
/// Velocity is RG (x, y), density RGBA, pressure/divergence/vorticity scalar.
/// Bloom mips live at half and quarter simulation resolution. Particle state
/// is a count x 1 RGBA strip of (x, y, vx, vy) in display pixels; `None` when
/// the configured population is zero.
#[derive(Debug)]
pub struct FieldStore {
    pub velocity: FieldPair,
    pub density: FieldPair,
    pub pressure: FieldPair,
    pub divergence: Field,
    pub vorticity: Field,
    pub bloom_half: Field,
    pub bloom_quarter: Field,
    pub particles: Option<FieldPair>,
}

impl FieldStore {
    pub fn new(resolution: usize, particle_count: usize) -> Result<Self, FieldError> {
        let half = (resolution / 2).max(1);
        let quarter = (resolution / 4).max(1);
        let particles = if particle_count > 0 {
            Some(FieldPair::new(particle_count, 1, 4)?)
        } else {
            None
        };
        Ok(Self {
            velocity: FieldPair::new(resolution, resolution, 2)?,
            density: FieldPair::new(resolution, resolution, 4)?,
            pressure: FieldPair::new(resolution, resolution, 1)?,
            divergence: Field::new(resolution, resolution, 1)?,
            vorticity: Field::new(resolution, resolution, 1)?,
            bloom_half: Field::new(half, half, 4)?,
            bloom_quarter: Field::new(quarter, quarter, 4)?,
            particles,
        })
    }

    /// Simulation grid resolution (square).
    pub fn resolution(&self) -> usize {
        self.velocity.front().width()
    }
}
