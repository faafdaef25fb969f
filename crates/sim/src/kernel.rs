//! Kernel dispatch: a parallel map over a destination field's index domain.
//!
//! A kernel is a pure function of (x, y) that reads any number of source
//! fields through shared borrows and returns the destination texel. Rows are
//! fanned out across the rayon pool; the dispatch joins before returning, so
//! callers see a strict submit-in-order dependency chain.

use glam::Vec4;
use rayon::prelude::*;

use crate::field::Field;

/// Runs `kernel` once per destination texel.
///
/// Sources must be borrowed immutably inside the kernel; the destination is
/// exclusively borrowed here, so a field can never read itself mid-write.
pub fn dispatch<K>(dst: &mut Field, kernel: K)
where
    K: Fn(usize, usize) -> Vec4 + Sync,
{
    let width = dst.width();
    let channels = dst.channels();
    dst.data_mut()
        .par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let v = kernel(x, y).to_array();
                row[x * channels..(x + 1) * channels].copy_from_slice(&v[..channels]);
            }
        });
}

/// Hermite smoothstep. Edges may be reversed (e1 < e0), which inverts the
/// ramp the same way the GLSL builtin does.
pub(crate) fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_writes_every_texel() {
        let mut f = Field::new(8, 8, 2).unwrap();
        dispatch(&mut f, |x, y| Vec4::new(x as f32, y as f32, 0.0, 0.0));
        assert_eq!(f.texel(3, 5), Vec4::new(3.0, 5.0, 0.0, 0.0));
        assert_eq!(f.texel(7, 0), Vec4::new(7.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn dispatch_reads_a_source_field() {
        let mut src = Field::new(4, 4, 1).unwrap();
        src.fill(2.0);
        let mut dst = Field::new(4, 4, 1).unwrap();
        dispatch(&mut dst, |x, y| src.texel(x, y) * 3.0);
        assert_eq!(dst.texel(2, 2).x, 6.0);
    }

    #[test]
    fn smoothstep_handles_reversed_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
        // Reversed: full value below the lower edge.
        assert_eq!(smoothstep(1.0, 0.0, 2.0), 0.0);
        assert_eq!(smoothstep(1.0, 0.0, -1.0), 1.0);
    }
}
