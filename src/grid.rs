use crate::config::TILE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
}

impl Cell {
    #[inline]
    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }

    pub fn toggled(self) -> Self {
        match self {
            Cell::Empty => Cell::Wall,
            Cell::Wall => Cell::Empty,
        }
    }
}

/// Fixed-size tile map. Anything outside the grid counts as wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    tile_size: f32,
    cells: Vec<Cell>, // row-major
}

const SAMPLE_MAP: [[u8; 10]; 8] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 1, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

impl Grid {
    /// Empty grid of `width` x `height` tiles.
    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Builds a grid from rows of 0/1 markers; any non-zero value is a wall.
    /// Short rows are padded with empty cells.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R], tile_size: f32) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut grid = Self::new(width, height, tile_size);
        for (row, markers) in rows.iter().enumerate() {
            for (col, &m) in markers.as_ref().iter().enumerate() {
                if m != 0 {
                    grid.cells[row * width + col] = Cell::Wall;
                }
            }
        }
        grid
    }

    /// The 10x8 walled room used by every variant.
    pub fn sample() -> Self {
        Self::from_rows(&SAMPLE_MAP, TILE_SIZE)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Size of the whole map in world units.
    pub fn world_size(&self) -> [f32; 2] {
        [
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        ]
    }

    #[inline]
    fn index(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    pub fn cell(&self, col: i64, row: i64) -> Option<Cell> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Tile containing a world-space point. May lie outside the grid.
    #[inline]
    pub fn tile_of(&self, x: f32, y: f32) -> (i64, i64) {
        // floor, not truncation: -0.5 must land in tile -1
        (
            (x / self.tile_size).floor() as i64,
            (y / self.tile_size).floor() as i64,
        )
    }

    /// Point lookup used by rays and movement.
    #[inline]
    pub fn is_wall_at(&self, x: f32, y: f32) -> bool {
        let (col, row) = self.tile_of(x, y);
        self.cell(col, row).is_none_or(Cell::is_wall)
    }

    /// Flips a tile between wall and empty. Returns false if out of bounds.
    pub fn toggle(&mut self, col: i64, row: i64) -> bool {
        match self.index(col, row) {
            Some(i) => {
                self.cells[i] = self.cells[i].toggled();
                true
            }
            None => false,
        }
    }

    /// Toggle the tile under a world-space point (editor click).
    pub fn toggle_at(&mut self, x: f32, y: f32) -> Option<(i64, i64)> {
        let (col, row) = self.tile_of(x, y);
        self.toggle(col, row).then_some((col, row))
    }

    /// Iterates `(col, row, cell)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &c)| (i % self.width, i / self.width, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_matches_markers_for_every_point_in_each_tile() {
        let grid = Grid::sample();
        assert_eq!((grid.width(), grid.height()), (10, 8));

        let ts = grid.tile_size();
        // corners, centre and an inner sample of every tile
        let offsets = [0.0, 0.5, 1.0, ts / 2.0, ts - 1.0, ts - 0.01];
        for (row, markers) in SAMPLE_MAP.iter().enumerate() {
            for (col, &m) in markers.iter().enumerate() {
                for &ox in &offsets {
                    for &oy in &offsets {
                        let x = col as f32 * ts + ox;
                        let y = row as f32 * ts + oy;
                        let wall = grid.is_wall_at(x, y);
                        assert_eq!(wall, m == 1, "tile ({col}, {row}) at ({x}, {y})");
                    }
                }
            }
        }
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let grid = Grid::new(3, 3, 10.0);
        assert!(!grid.is_wall_at(15.0, 15.0));
        assert!(grid.is_wall_at(-0.5, 15.0));
        assert!(grid.is_wall_at(15.0, -0.5));
        assert!(grid.is_wall_at(30.0, 15.0));
        assert!(grid.is_wall_at(15.0, 30.0));
    }

    #[test]
    fn toggle_twice_restores() {
        let mut grid = Grid::sample();
        let before = grid.clone();
        assert!(grid.toggle(4, 4));
        assert_eq!(grid.cell(4, 4), Some(Cell::Wall));
        assert!(grid.toggle(4, 4));
        assert_eq!(grid, before);
    }

    #[test]
    fn toggle_outside_is_ignored() {
        let mut grid = Grid::sample();
        let before = grid.clone();
        assert!(!grid.toggle(10, 0));
        assert!(!grid.toggle(-1, 3));
        assert_eq!(grid.toggle_at(700.0, 10.0), None);
        assert_eq!(grid, before);
    }

    #[test]
    fn toggle_at_uses_tile_division() {
        let mut grid = Grid::sample();
        assert_eq!(grid.toggle_at(130.0, 200.0), Some((2, 3)));
        assert_eq!(grid.cell(2, 3), Some(Cell::Wall));
        assert_eq!(grid.toggle_at(191.9, 255.9), Some((2, 3)));
        assert_eq!(grid.cell(2, 3), Some(Cell::Empty));
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let grid = Grid::from_rows(&[vec![1u8, 0, 1], vec![1]], 1.0);
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.cell(2, 0), Some(Cell::Wall));
        assert_eq!(grid.cell(1, 1), Some(Cell::Empty));
        assert_eq!(grid.cells().filter(|(_, _, c)| c.is_wall()).count(), 3);
    }
}
