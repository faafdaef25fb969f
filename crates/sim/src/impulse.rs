//! Impulse injection: radial velocity and density splats.
//!
//! Splat centers arrive in simulation texel coordinates (the session maps
//! display pixels by the resolution ratio before calling in). Each splat is
//! one kernel dispatch followed by an immediate buffer flip.

use glam::{Vec2, Vec4};

use crate::field::FieldPair;
use crate::kernel::{dispatch, smoothstep};

/// Velocity splat radius in simulation texels.
pub const VELOCITY_RADIUS: f32 = 50.0;
/// Density splat radius in simulation texels.
pub const DENSITY_RADIUS: f32 = 30.0;
/// Scale applied to pointer velocity payloads.
pub const POINTER_GAIN: f32 = 10.0;

/// Adds a radial velocity impulse around `point`.
///
/// The payload is a display-space pointer delta; it is scaled by the pointer
/// gain and has its Y flipped into field orientation here. Influence falls
/// off smoothly from 1 at the center to 0 at the radius.
pub fn splat_velocity(velocity: &mut FieldPair, point: Vec2, payload: Vec2) {
    let value = Vec2::new(payload.x, -payload.y) * POINTER_GAIN;
    let (src, dst) = velocity.rw();
    dispatch(dst, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        let mut v = src.texel(x, y);
        let dist = p.distance(point);
        if dist < VELOCITY_RADIUS {
            let influence = 1.0 - smoothstep(0.0, VELOCITY_RADIUS, dist);
            v.x += value.x * influence;
            v.y += value.y * influence;
        }
        v
    });
    velocity.swap();
}

/// Adds a radial dye splat around `point`, clamping every channel to 1.
pub fn splat_density(density: &mut FieldPair, point: Vec2, color: Vec4) {
    let value = Vec4::new(color.x, color.y, color.z, 1.0);
    let (src, dst) = density.rw();
    dispatch(dst, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        let mut d = src.texel(x, y);
        let dist = p.distance(point);
        if dist < DENSITY_RADIUS {
            let influence = 1.0 - smoothstep(0.0, DENSITY_RADIUS, dist);
            d += value * influence;
        }
        d.min(Vec4::ONE)
    });
    density.swap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_splat_peaks_at_center_and_misses_far_texels() {
        let mut pair = FieldPair::new(256, 256, 2).unwrap();
        splat_velocity(&mut pair, Vec2::new(128.5, 128.5), Vec2::new(3.0, 4.0));
        let center = pair.front().texel(128, 128);
        assert!((center.x - 30.0).abs() < 1e-4);
        assert!((center.y + 40.0).abs() < 1e-4);
        // Beyond the radius nothing changes.
        assert_eq!(pair.front().texel(0, 0).x, 0.0);
    }

    #[test]
    fn density_never_exceeds_one() {
        let mut pair = FieldPair::new(64, 64, 4).unwrap();
        let color = Vec4::new(0.9, 0.9, 0.9, 1.0);
        for _ in 0..50 {
            splat_density(&mut pair, Vec2::new(32.0, 32.0), color);
        }
        for value in pair.front().as_slice() {
            assert!(*value <= 1.0, "density channel escaped clamp: {value}");
        }
    }

    #[test]
    fn splat_flips_the_buffer() {
        let mut pair = FieldPair::new(64, 64, 2).unwrap();
        splat_velocity(&mut pair, Vec2::new(32.0, 32.0), Vec2::new(1.0, 0.0));
        let after_one = pair.front().texel(32, 32).x;
        splat_velocity(&mut pair, Vec2::new(32.0, 32.0), Vec2::new(1.0, 0.0));
        let after_two = pair.front().texel(32, 32).x;
        assert!(after_two > after_one, "second splat must accumulate");
    }
}
