//! Frame composition: bloom extraction and the final RGBA8 display image.
//!
//! Bloom is a two-stage box downsample of the density field with a soft-knee
//! brightness threshold; the knee applies on both stages. The composite adds
//! bloom to density, overlays particles as velocity-tinted soft circles,
//! applies gamma, and derives alpha from the brightest channel.

use glam::{Vec2, Vec3, Vec4};
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::field::Field;
use crate::kernel::{dispatch, smoothstep};
use crate::store::FieldStore;

/// Brightness knee for the bloom downsample.
pub const BLOOM_THRESHOLD: f32 = 0.6;
/// Gamma exponent applied to the composed frame.
pub const GAMMA: f32 = 0.8;
/// Particles drawn per frame regardless of population.
pub const PARTICLE_DRAW_CAP: usize = 1000;

const SPEED_SCALE: f32 = 0.01;
const PARTICLE_SLOW_COLOR: Vec3 = Vec3::new(0.2, 0.4, 1.0);
const PARTICLE_FAST_COLOR: Vec3 = Vec3::new(1.0, 0.4, 0.2);

/// Owns the display-sized output frame and its float scratch buffer.
#[derive(Debug)]
pub struct Compositor {
    width: usize,
    height: usize,
    scratch: Vec<Vec4>,
    frame: Vec<u8>,
}

impl Compositor {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            scratch: vec![Vec4::ZERO; width * height],
            frame: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocates the output frame for a new viewport. Simulation fields
    /// are untouched.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.scratch = vec![Vec4::ZERO; width * height];
        self.frame = vec![0; width * height * 4];
    }

    /// Composes the current fields into the RGBA8 frame and returns it.
    pub fn render(&mut self, store: &mut FieldStore, config: &SimulationConfig) -> &[u8] {
        bloom_downsample(store.density.front(), &mut store.bloom_half);
        bloom_downsample(&store.bloom_half, &mut store.bloom_quarter);

        self.compose_base(store.density.front(), &store.bloom_quarter, config);
        if let Some(particles) = store.particles.as_ref() {
            self.draw_particles(particles.front(), config.particle_count);
        }
        self.finish();
        &self.frame
    }

    /// density + bloom * intensity, sampled at display resolution.
    fn compose_base(&mut self, density: &Field, bloom: &Field, config: &SimulationConfig) {
        let width = self.width;
        let height = self.height;
        let intensity = config.bloom_intensity;
        self.scratch
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let v = (y as f32 + 0.5) / height as f32;
                for (x, out) in row.iter_mut().enumerate() {
                    let uv = Vec2::new((x as f32 + 0.5) / width as f32, v);
                    *out = density.sample(uv) + bloom.sample(uv) * intensity;
                }
            });
    }

    /// Rasterizes each particle's bounding box as a soft circle in viewport
    /// coordinates. Fast particles draw bigger, brighter, and warmer.
    fn draw_particles(&mut self, particles: &Field, count: usize) {
        let draw = count.min(particles.width()).min(PARTICLE_DRAW_CAP);
        let w = self.width as f32;
        let h = self.height as f32;
        for i in 0..draw {
            let state = particles.texel(i, 0);
            let center = Vec2::new(state.x / w, state.y / h);
            let vel = Vec2::new(state.z, state.w);

            let speed = vel.length() * SPEED_SCALE;
            let radius = mix(0.001, 0.003, speed);
            let brightness = mix(0.3, 1.0, speed);
            let color = PARTICLE_SLOW_COLOR.lerp(PARTICLE_FAST_COLOR, speed);
            let blur = radius * 0.5;

            let x0 = (((center.x - radius) * w).floor().max(0.0)) as usize;
            let x1 = (((center.x + radius) * w).ceil()).min(w) as usize;
            let y0 = (((center.y - radius) * h).floor().max(0.0)) as usize;
            let y1 = (((center.y + radius) * h).ceil()).min(h) as usize;

            for py in y0..y1 {
                for px in x0..x1 {
                    let uv = Vec2::new((px as f32 + 0.5) / w, (py as f32 + 0.5) / h);
                    let c = smoothstep(radius, radius - blur, uv.distance(center));
                    if c > 0.0 {
                        let cell = &mut self.scratch[py * self.width + px];
                        let t = c * brightness;
                        cell.x = mix(cell.x, color.x, t);
                        cell.y = mix(cell.y, color.y, t);
                        cell.z = mix(cell.z, color.z, t);
                    }
                }
            }
        }
    }

    /// Gamma, alpha from the brightest channel, quantize to RGBA8.
    fn finish(&mut self) {
        self.frame
            .par_chunks_mut(4)
            .zip(self.scratch.par_iter())
            .for_each(|(px, c)| {
                let r = c.x.max(0.0).powf(GAMMA);
                let g = c.y.max(0.0).powf(GAMMA);
                let b = c.z.max(0.0).powf(GAMMA);
                let a = r.max(g).max(b);
                px[0] = quantize(r);
                px[1] = quantize(g);
                px[2] = quantize(b);
                px[3] = quantize(a);
            });
    }
}

/// 9-tap box downsample with the soft-knee brightness threshold.
fn bloom_downsample(src: &Field, dst: &mut Field) {
    let offset = src.texel_size();
    let dst_texel = dst.texel_size();
    dispatch(dst, |x, y| {
        let uv = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * dst_texel;
        let mut sum = src.sample(uv);
        sum += src.sample(uv + Vec2::new(offset.x, 0.0));
        sum += src.sample(uv - Vec2::new(offset.x, 0.0));
        sum += src.sample(uv + Vec2::new(0.0, offset.y));
        sum += src.sample(uv - Vec2::new(0.0, offset.y));
        sum += src.sample(uv + offset);
        sum += src.sample(uv - offset);
        sum += src.sample(uv + Vec2::new(offset.x, -offset.y));
        sum += src.sample(uv + Vec2::new(-offset.x, offset.y));
        sum /= 9.0;

        let brightness = sum.x.max(sum.y).max(sum.z);
        let mut soft = brightness - (brightness - BLOOM_THRESHOLD).max(0.0);
        soft = soft * soft / (brightness + 1e-5);
        sum * soft
    });
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    #[test]
    fn bloom_knee_suppresses_dim_fields() {
        let mut src = Field::new(64, 64, 4).unwrap();
        let mut dst = Field::new(32, 32, 4).unwrap();

        src.fill(0.2);
        bloom_downsample(&src, &mut dst);
        // brightness 0.2 is under the knee: 0.2^2 / 0.2 = 0.2, so 0.2 * 0.2.
        let dim = dst.texel(16, 16).x;
        assert!(dim < 0.05, "dim field leaked through the knee: {dim}");

        src.fill(1.0);
        bloom_downsample(&src, &mut dst);
        let bright = dst.texel(16, 16).x;
        assert!(bright > 0.3, "bright field was over-suppressed: {bright}");
    }

    #[test]
    fn quantize_saturates() {
        assert_eq!(quantize(-1.0), 0);
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(4.5), 255);
    }

    #[test]
    fn resize_changes_only_the_frame() {
        let mut c = Compositor::new(100, 50);
        assert_eq!(c.frame.len(), 100 * 50 * 4);
        c.resize(30, 40);
        assert_eq!(c.width(), 30);
        assert_eq!(c.height(), 40);
        assert_eq!(c.frame.len(), 30 * 40 * 4);
    }
}
