use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::canvas::Canvas;

/// For each destination index along one axis: the two source samples to
/// blend and the weight of the second one, in 1/256ths.
#[derive(Default)]
struct AxisMap {
    lo: Vec<usize>,
    hi: Vec<usize>,
    weight: Vec<u32>,
}

impl AxisMap {
    fn build(dst: usize, src: usize) -> Self {
        let ratio = src as f32 / dst as f32;
        let last = src.saturating_sub(1);
        let mut map = Self {
            lo: Vec::with_capacity(dst),
            hi: Vec::with_capacity(dst),
            weight: Vec::with_capacity(dst),
        };
        for d in 0..dst {
            let f = d as f32 * ratio;
            let lo = (f.floor() as usize).min(last);
            map.lo.push(lo);
            map.hi.push((lo + 1).min(last));
            map.weight.push(((f - lo as f32) * 256.0).round().clamp(0.0, 256.0) as u32);
        }
        map
    }
}

/// Precomputed bilinear mapping from a window's physical pixels back to a
/// canvas. Rebuilt when either size changes.
#[derive(Default)]
pub struct Stretch {
    dst: (usize, usize),
    src: (usize, usize),
    x: AxisMap,
    y: AxisMap,
}

impl Stretch {
    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        Self {
            dst: (dst_w, dst_h),
            src: (src_w, src_h),
            x: AxisMap::build(dst_w, src_w),
            y: AxisMap::build(dst_h, src_h),
        }
    }

    pub fn matches(&self, dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> bool {
        self.dst == (dst_w, dst_h) && self.src == (src_w, src_h)
    }

    /// Stretches `src` into `dst` (`dst_w` pixels per row). Rows run in parallel.
    pub fn blit(&self, dst: &mut [u32], src: &Canvas) {
        let dst_w = self.dst.0;
        if dst_w == 0 || src.width == 0 || src.height == 0 {
            return;
        }
        let sw = src.width;

        dst.par_chunks_mut(dst_w)
            .enumerate()
            .take(self.y.lo.len())
            .for_each(|(y, row)| {
                let upper = &src.pixels[self.y.lo[y] * sw..][..sw];
                let lower = &src.pixels[self.y.hi[y] * sw..][..sw];
                let wy = self.y.weight[y];

                for (x, out) in row.iter_mut().enumerate() {
                    let (l, h, wx) = (self.x.lo[x], self.x.hi[x], self.x.weight[x]);
                    let top = blend(upper[l], upper[h], wx);
                    let bottom = blend(lower[l], lower[h], wx);
                    *out = blend(top, bottom, wy);
                }
            });
    }
}

/// Rescales a point from a `from`-sized surface to a `to`-sized one, e.g. a
/// mouse position in window pixels to canvas pixels.
pub fn map_point(p: (f64, f64), from: (usize, usize), to: (usize, usize)) -> (f32, f32) {
    if from.0 == 0 || from.1 == 0 {
        return (p.0 as f32, p.1 as f32);
    }
    (
        (p.0 * to.0 as f64 / from.0 as f64) as f32,
        (p.1 * to.1 as f64 / from.1 as f64) as f32,
    )
}

#[inline]
fn blend(a: u32, b: u32, w: u32) -> u32 {
    // red and blue share one multiply (00RR00BB), green gets its own
    let inv = 256 - w;
    let rb = (((a & 0x00FF00FF) * inv + (b & 0x00FF00FF) * w) >> 8) & 0x00FF00FF;
    let g = (((a & 0x0000FF00) * inv + (b & 0x0000FF00) * w) >> 8) & 0x0000FF00;
    rb | g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_size_copies() {
        let mut src = Canvas::new(4, 3);
        for (i, p) in src.pixels.iter_mut().enumerate() {
            *p = (i as u32) * 0x010101;
        }
        let s = Stretch::new(4, 3, 4, 3);
        let mut dst = vec![0; 12];
        s.blit(&mut dst, &src);
        assert_eq!(dst, src.pixels);
    }

    #[test]
    fn doubling_keeps_solid_color() {
        let mut src = Canvas::new(3, 3);
        src.clear(0x00336699);
        let s = Stretch::new(6, 6, 3, 3);
        let mut dst = vec![0; 36];
        s.blit(&mut dst, &src);
        assert!(dst.iter().all(|&p| p == 0x00336699));
    }

    #[test]
    fn window_to_canvas_scales() {
        let s = Stretch::new(1280, 960, 640, 480);
        assert_eq!(map_point((200.0, 100.0), (1280, 960), (640, 480)), (100.0, 50.0));
        assert_eq!(map_point((7.0, 9.0), (0, 0), (640, 480)), (7.0, 9.0));
        assert!(s.matches(1280, 960, 640, 480));
        assert!(!s.matches(640, 480, 640, 480));
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0x00FF0000, 0x000000FF, 0), 0x00FF0000);
        assert_eq!(blend(0x00FF0000, 0x000000FF, 256), 0x000000FF);
    }
}
