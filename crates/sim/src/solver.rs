//! The flow solver: one fixed-order kernel sequence per step.
//!
//! Stable-fluids on the simulation grid. Per step: external forces, audio
//! impulses, vorticity confinement, velocity diffusion, pressure projection,
//! semi-Lagrangian advection, particle integration. Every writing sub-step
//! flips its field pair before the next reader runs, so each kernel sees a
//! fully consistent front buffer.

use glam::{Vec2, Vec4};
use rand::Rng;

use crate::audio::{
    AudioFrame, BASS_GAIN, BASS_SPLATS, BASS_THRESHOLD, DENSITY_SPLATS, HIGH_THRESHOLD,
    MID_THRESHOLD,
};
use crate::config::{SimulationConfig, DT};
use crate::impulse;
use crate::kernel::dispatch;
use crate::palette;
use crate::particles;
use crate::store::FieldStore;

/// Downward acceleration applied per step when gravity is enabled.
pub const GRAVITY: f32 = 9.8 * 0.01;

const DIFFUSION_ITERATIONS: usize = 4;
const PRESSURE_ITERATIONS: usize = 20;
const VELOCITY_DISSIPATION: f32 = 0.99;
const DENSITY_DISSIPATION: f32 = 0.98;

/// Advances the simulation by one fixed time step.
///
/// `display` is the current viewport extent in pixels; it scales audio
/// impulse placement and particle motion but never the grid itself.
pub fn step<R: Rng>(
    store: &mut FieldStore,
    config: &SimulationConfig,
    audio: AudioFrame,
    display: Vec2,
    rng: &mut R,
) {
    if config.gravity {
        apply_gravity(store);
    }
    apply_audio(store, config, audio, display, rng);

    compute_vorticity(store);
    apply_confinement(store, config.vorticity);

    if config.viscosity > 0.0 {
        diffuse_velocity(store, config.viscosity);
    }

    compute_divergence(store);
    solve_pressure(store);
    project(store, config.pressure);

    advect_velocity(store);
    advect_density(store);

    if let Some(particles) = store.particles.as_mut() {
        particles::integrate(particles, store.velocity.front(), display);
    }
}

fn apply_gravity(store: &mut FieldStore) {
    let (src, dst) = store.velocity.rw();
    dispatch(dst, |x, y| {
        let mut v = src.texel(x, y);
        v.y -= GRAVITY;
        v
    });
    store.velocity.swap();
}

/// Reacts to the current audio frame. Bass injects turbulence, mids and
/// highs inject dye; both land at random display positions.
fn apply_audio<R: Rng>(
    store: &mut FieldStore,
    config: &SimulationConfig,
    audio: AudioFrame,
    display: Vec2,
    rng: &mut R,
) {
    if audio.volume <= 0.0 {
        return;
    }
    let resolution = store.resolution() as f32;
    let to_sim = |pos: Vec2| pos / display * resolution;

    if audio.low > BASS_THRESHOLD {
        for _ in 0..BASS_SPLATS {
            let pos = Vec2::new(rng.gen::<f32>() * display.x, rng.gen::<f32>() * display.y);
            let payload = Vec2::new(
                rng.gen_range(-1.0..1.0) * audio.low * BASS_GAIN,
                rng.gen_range(-1.0..1.0) * audio.low * BASS_GAIN,
            );
            impulse::splat_velocity(&mut store.velocity, to_sim(pos), payload);
        }
    }

    if audio.mid > MID_THRESHOLD || audio.high > HIGH_THRESHOLD {
        let palette = palette::by_name(&config.palette);
        for _ in 0..DENSITY_SPLATS {
            let pos = Vec2::new(rng.gen::<f32>() * display.x, rng.gen::<f32>() * display.y);
            let color = palette.random_stop(rng);
            impulse::splat_density(&mut store.density, to_sim(pos), color);
        }
    }
}

/// Curl of the velocity field into the scalar vorticity field.
fn compute_vorticity(store: &mut FieldStore) {
    let velocity = store.velocity.front();
    dispatch(&mut store.vorticity, |x, y| {
        let (x, y) = (x as i32, y as i32);
        let l = velocity.texel_clamped(x - 1, y).y;
        let r = velocity.texel_clamped(x + 1, y).y;
        let t = velocity.texel_clamped(x, y + 1).x;
        let b = velocity.texel_clamped(x, y - 1).x;
        Vec4::new((r - l - t + b) * 0.5, 0.0, 0.0, 0.0)
    });
}

/// Pushes velocity toward local curl maxima to restore fine swirls lost to
/// numerical dissipation.
fn apply_confinement(store: &mut FieldStore, confinement: f32) {
    let vorticity = &store.vorticity;
    let (src, dst) = store.velocity.rw();
    dispatch(dst, |x, y| {
        let (xi, yi) = (x as i32, y as i32);
        let l = vorticity.texel_clamped(xi - 1, yi).x.abs();
        let r = vorticity.texel_clamped(xi + 1, yi).x.abs();
        let t = vorticity.texel_clamped(xi, yi + 1).x.abs();
        let b = vorticity.texel_clamped(xi, yi - 1).x.abs();
        let c = vorticity.texel_clamped(xi, yi).x.abs();

        let mut force = Vec2::new(t - b, r - l);
        let length_squared = force.length_squared().max(0.0001);
        force *= length_squared.sqrt().recip();
        force *= confinement * c;
        force *= Vec2::new(1.0, -1.0);

        let v = src.texel(x, y);
        Vec4::new(v.x + force.x * DT, v.y + force.y * DT, 0.0, 0.0)
    });
    store.velocity.swap();
}

/// Jacobi relaxation of the viscous diffusion equation.
fn diffuse_velocity(store: &mut FieldStore, viscosity: f32) {
    let texel = store.velocity.front().texel_size();
    let alpha = texel.x * texel.y / (viscosity * DT);
    let beta = 1.0 / (4.0 + alpha);
    for _ in 0..DIFFUSION_ITERATIONS {
        let (src, dst) = store.velocity.rw();
        dispatch(dst, |x, y| {
            let (xi, yi) = (x as i32, y as i32);
            let l = src.texel_clamped(xi - 1, yi);
            let r = src.texel_clamped(xi + 1, yi);
            let t = src.texel_clamped(xi, yi + 1);
            let b = src.texel_clamped(xi, yi - 1);
            let c = src.texel(x, y);
            (l + r + b + t + c * alpha) * beta
        });
        store.velocity.swap();
    }
}

fn compute_divergence(store: &mut FieldStore) {
    let velocity = store.velocity.front();
    dispatch(&mut store.divergence, |x, y| {
        let (x, y) = (x as i32, y as i32);
        let l = velocity.texel_clamped(x - 1, y).x;
        let r = velocity.texel_clamped(x + 1, y).x;
        let t = velocity.texel_clamped(x, y + 1).y;
        let b = velocity.texel_clamped(x, y - 1).y;
        Vec4::new(0.5 * (r - l + t - b), 0.0, 0.0, 0.0)
    });
}

/// Clears pressure and runs the Jacobi solve against the divergence field.
fn solve_pressure(store: &mut FieldStore) {
    store.pressure.front_mut().fill(0.0);
    for _ in 0..PRESSURE_ITERATIONS {
        let divergence = &store.divergence;
        let (src, dst) = store.pressure.rw();
        dispatch(dst, |x, y| {
            let (xi, yi) = (x as i32, y as i32);
            let l = src.texel_clamped(xi - 1, yi).x;
            let r = src.texel_clamped(xi + 1, yi).x;
            let t = src.texel_clamped(xi, yi + 1).x;
            let b = src.texel_clamped(xi, yi - 1).x;
            let div = divergence.texel(x, y).x;
            Vec4::new((l + r + b + t - div) * 0.25, 0.0, 0.0, 0.0)
        });
        store.pressure.swap();
    }
}

/// Subtracts the scaled pressure gradient, removing the divergent component.
fn project(store: &mut FieldStore, scale: f32) {
    let pressure = store.pressure.front();
    let (src, dst) = store.velocity.rw();
    dispatch(dst, |x, y| {
        let (xi, yi) = (x as i32, y as i32);
        let l = pressure.texel_clamped(xi - 1, yi).x;
        let r = pressure.texel_clamped(xi + 1, yi).x;
        let t = pressure.texel_clamped(xi, yi + 1).x;
        let b = pressure.texel_clamped(xi, yi - 1).x;
        let v = src.texel(x, y);
        Vec4::new(v.x - scale * (r - l), v.y - scale * (t - b), 0.0, 0.0)
    });
    store.velocity.swap();
}

/// Semi-Lagrangian backtrace of the velocity field through itself.
fn advect_velocity(store: &mut FieldStore) {
    let texel = store.velocity.front().texel_size();
    let (src, dst) = store.velocity.rw();
    dispatch(dst, |x, y| {
        let uv = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * texel;
        let v = src.texel(x, y);
        let coord = uv - DT * Vec2::new(v.x, v.y) * texel;
        src.sample(coord) * VELOCITY_DISSIPATION
    });
    store.velocity.swap();
}

/// Carries density along the freshly advected velocity field.
fn advect_density(store: &mut FieldStore) {
    let velocity = store.velocity.front();
    let texel = velocity.texel_size();
    let (src, dst) = store.density.rw();
    dispatch(dst, |x, y| {
        let uv = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * texel;
        let v = velocity.texel(x, y);
        let coord = uv - DT * Vec2::new(v.x, v.y) * texel;
        src.sample(coord) * DENSITY_DISSIPATION
    });
    store.density.swap();
}
