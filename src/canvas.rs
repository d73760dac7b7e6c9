/// Software framebuffer of packed 0RGB pixels, one per window.
/// All drawing is clipped to the canvas bounds.
pub struct Canvas {
    pub pixels: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Vertical line from `y0` to `y1` inclusive in column `x`.
    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, color: u32) {
        if x < 0 || x as usize >= self.width || self.height == 0 {
            return;
        }
        let (mut y0, mut y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        y0 = y0.max(0);
        y1 = y1.min(self.height as i32 - 1);
        if y0 > y1 {
            return;
        }

        let mut idx = y0 as usize * self.width + x as usize;
        for _y in y0..=y1 {
            self.pixels[idx] = color;
            idx += self.width;
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i32);
        let y1 = y.saturating_add(h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for row in y0..y1 {
            let start = row as usize * self.width;
            self.pixels[start + x0 as usize..start + x1 as usize].fill(color);
        }
    }

    /// One-pixel outline of a rectangle.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.vline(x, y, y + h - 1, color);
        self.vline(x + w - 1, y, y + h - 1, color);
    }

    /// Bresenham line between two points, clipped per pixel.
    pub fn line(&mut self, from: [f32; 2], to: [f32; 2], color: u32) {
        let (mut x0, mut y0) = (from[0] as i32, from[1] as i32);
        let (x1, y1) = (to[0] as i32, to[1] as i32);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xFF0000;

    #[test]
    fn vline_clips_off_screen_strip() {
        let mut c = Canvas::new(4, 10);
        c.vline(1, -1000, 1000, RED);
        assert!((0..10).all(|y| c.get(1, y) == Some(RED)));
        assert!((0..10).all(|y| c.get(0, y) == Some(0)));
    }

    #[test]
    fn vline_outside_is_noop() {
        let mut c = Canvas::new(4, 4);
        c.vline(-1, 0, 3, RED);
        c.vline(4, 0, 3, RED);
        c.vline(2, 10, 20, RED);
        c.vline(2, -9, -3, RED);
        assert!(c.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn vline_accepts_reversed_ends() {
        let mut c = Canvas::new(2, 5);
        c.vline(0, 3, 1, RED);
        let col: Vec<u32> = (0..5).map(|y| c.get(0, y).unwrap()).collect();
        assert_eq!(col, vec![0, RED, RED, RED, 0]);
    }

    #[test]
    fn fill_rect_clips() {
        let mut c = Canvas::new(5, 5);
        c.fill_rect(3, 3, 10, 10, RED);
        assert_eq!(c.pixels.iter().filter(|&&p| p == RED).count(), 4);
        c.fill_rect(-10, -10, 5, 5, 1);
        assert!(!c.pixels.contains(&1));
    }

    #[test]
    fn stroke_rect_leaves_inside() {
        let mut c = Canvas::new(5, 5);
        c.stroke_rect(0, 0, 5, 5, RED);
        assert_eq!(c.get(2, 2), Some(0));
        assert_eq!(c.get(0, 2), Some(RED));
        assert_eq!(c.get(4, 4), Some(RED));
        assert_eq!(c.pixels.iter().filter(|&&p| p == RED).count(), 16);
    }

    #[test]
    fn line_covers_both_ends() {
        let mut c = Canvas::new(10, 10);
        c.line([1.0, 1.0], [8.0, 5.0], RED);
        assert_eq!(c.get(1, 1), Some(RED));
        assert_eq!(c.get(8, 5), Some(RED));
        // leaving the canvas does not panic
        c.line([5.0, 5.0], [-50.0, 90.0], RED);
    }
}
