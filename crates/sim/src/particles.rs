//! Particle overlay: a strip of tracers advected through the velocity field.
//!
//! State lives in a count x 1 RGBA field pair as (x, y, vx, vy) in display
//! pixels. Particles are seeded once, never destroyed, and wrap toroidally
//! at the display edges.

use glam::{Vec2, Vec4};
use rand::Rng;

use crate::config::DT;
use crate::field::{Field, FieldPair};
use crate::kernel::dispatch;

/// Velocity field sample scale applied when driving particles.
pub const VELOCITY_GAIN: f32 = 10.0;

/// Seeds uniformly random positions with zero velocity into the front strip.
pub fn seed<R: Rng>(particles: &mut FieldPair, display: Vec2, rng: &mut R) {
    let front = particles.front_mut();
    for i in 0..front.width() {
        let x = rng.gen::<f32>() * display.x;
        let y = rng.gen::<f32>() * display.y;
        front.set_texel(i, 0, Vec4::new(x, y, 0.0, 0.0));
    }
}

/// Advances every particle one time step through the velocity field.
///
/// Positions wrap into [0, extent) on both axes, so a particle leaving one
/// edge reappears at the opposite edge with its velocity intact.
pub fn integrate(particles: &mut FieldPair, velocity: &Field, display: Vec2) {
    let (src, dst) = particles.rw();
    dispatch(dst, |i, _| {
        let state = src.texel(i, 0);
        let mut pos = Vec2::new(state.x, state.y);

        let uv = (pos / display).clamp(Vec2::ZERO, Vec2::ONE);
        let sampled = velocity.sample(uv);
        let vel = Vec2::new(sampled.x, sampled.y) * VELOCITY_GAIN;

        pos += vel * DT;
        pos.x = pos.x.rem_euclid(display.x);
        pos.y = pos.y.rem_euclid(display.y);

        Vec4::new(pos.x, pos.y, vel.x, vel.y)
    });
    particles.swap();
}
