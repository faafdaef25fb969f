//! Fixed-resolution float fields and double-buffered field pairs.
//!
//! Fields mirror the GPU textures they stand in for: row-major f32 storage
//! with 1, 2, or 4 channels, bilinear clamp-to-edge sampling by normalized
//! coordinate. Double buffering is an index flip, never a copy.

use glam::{Vec2, Vec4};

use crate::error::FieldError;

/// A single 2D field of f32 texels.
#[derive(Debug, Clone)]
pub struct Field {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Field {
    /// Allocates a zeroed field. Channel count must be 1, 2, or 4.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::ZeroExtent { width, height });
        }
        if !matches!(channels, 1 | 2 | 4) {
            return Err(FieldError::UnsupportedChannels(channels));
        }
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Size of one texel in normalized coordinates.
    pub fn texel_size(&self) -> Vec2 {
        Vec2::new(1.0 / self.width as f32, 1.0 / self.height as f32)
    }

    /// Sets every channel of every texel to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Reads the texel at (x, y). Missing channels read as zero.
    pub fn texel(&self, x: usize, y: usize) -> Vec4 {
        debug_assert!(x < self.width && y < self.height);
        let i = (y * self.width + x) * self.channels;
        let mut out = [0.0f32; 4];
        out[..self.channels].copy_from_slice(&self.data[i..i + self.channels]);
        Vec4::from_array(out)
    }

    /// Reads a texel with clamp-to-edge addressing.
    pub fn texel_clamped(&self, x: i32, y: i32) -> Vec4 {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        self.texel(x, y)
    }

    /// Writes the first `channels` components of `value` at (x, y).
    pub fn set_texel(&mut self, x: usize, y: usize, value: Vec4) {
        debug_assert!(x < self.width && y < self.height);
        let i = (y * self.width + x) * self.channels;
        let v = value.to_array();
        self.data[i..i + self.channels].copy_from_slice(&v[..self.channels]);
    }

    /// Bilinear sample at a normalized coordinate, clamp-to-edge.
    ///
    /// Texel centers sit at (i + 0.5) / extent, matching LINEAR filtering of
    /// the textures these fields replace.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let fx = uv.x * self.width as f32 - 0.5;
        let fy = uv.y * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let x0 = x0 as i32;
        let y0 = y0 as i32;

        let c00 = self.texel_clamped(x0, y0);
        let c10 = self.texel_clamped(x0 + 1, y0);
        let c01 = self.texel_clamped(x0, y0 + 1);
        let c11 = self.texel_clamped(x0 + 1, y0 + 1);

        let top = c00.lerp(c10, tx);
        let bottom = c01.lerp(c11, tx);
        top.lerp(bottom, ty)
    }
}

/// Two same-shaped fields with a front/back index flip.
#[derive(Debug, Clone)]
pub struct FieldPair {
    fields: [Field; 2],
    front: usize,
}

impl FieldPair {
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, FieldError> {
        let a = Field::new(width, height, channels)?;
        let b = a.clone();
        Ok(Self {
            fields: [a, b],
            front: 0,
        })
    }

    pub fn front(&self) -> &Field {
        &self.fields[self.front]
    }

    pub fn front_mut(&mut self) -> &mut Field {
        &mut self.fields[self.front]
    }

    /// Borrows the front for reading and the back for writing.
    pub fn rw(&mut self) -> (&Field, &mut Field) {
        let (a, b) = self.fields.split_at_mut(1);
        if self.front == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        }
    }

    /// O(1) buffer flip. Two swaps restore the original assignment.
    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_extent_and_bad_channels() {
        assert!(Field::new(0, 16, 2).is_err());
        assert!(Field::new(16, 0, 2).is_err());
        assert!(Field::new(16, 16, 3).is_err());
        assert!(Field::new(16, 16, 2).is_ok());
    }

    #[test]
    fn double_swap_restores_buffers() {
        let mut pair = FieldPair::new(4, 4, 1).unwrap();
        pair.front_mut().set_texel(0, 0, Vec4::splat(7.0));
        assert_eq!(pair.front().texel(0, 0).x, 7.0);
        pair.swap();
        assert_eq!(pair.front().texel(0, 0).x, 0.0);
        pair.swap();
        assert_eq!(pair.front().texel(0, 0).x, 7.0);
    }

    #[test]
    fn bilinear_sample_interpolates_between_texel_centers() {
        let mut f = Field::new(2, 1, 1).unwrap();
        f.set_texel(0, 0, Vec4::splat(0.0));
        f.set_texel(1, 0, Vec4::splat(1.0));
        // Midpoint between the two texel centers.
        let v = f.sample(Vec2::new(0.5, 0.5)).x;
        assert!((v - 0.5).abs() < 1e-6, "expected 0.5, got {v}");
        // At a texel center the sample is exact.
        let v = f.sample(Vec2::new(0.25, 0.5)).x;
        assert!(v.abs() < 1e-6);
    }

    #[test]
    fn sample_clamps_to_edge() {
        let mut f = Field::new(2, 2, 1).unwrap();
        f.fill(3.0);
        assert!((f.sample(Vec2::new(-1.0, -1.0)).x - 3.0).abs() < 1e-6);
        assert!((f.sample(Vec2::new(2.0, 2.0)).x - 3.0).abs() < 1e-6);
    }
}
