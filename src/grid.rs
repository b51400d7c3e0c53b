use anyhow::ensure;
use rand::Rng;

/// Smallest board side that leaves a meaningful interior.
pub const MIN_SIDE: u16 = 8;

/// A single board coordinate. x grows rightwards, y downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: i16,
    pub y: i16,
}

impl Cell {
    pub const fn new(x: i16, y: i16) -> Self {
        Cell { x, y }
    }
}

/// Fixed board extents in cells, set at startup. The outermost ring is
/// the border: it gets drawn and is lethal. Everything strictly inside
/// it is playable.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    width: i16,
    height: i16,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> anyhow::Result<Self> {
        ensure!(
            width >= MIN_SIDE && height >= MIN_SIDE,
            "board must be at least {}x{} cells, got {}x{}",
            MIN_SIDE,
            MIN_SIDE,
            width,
            height
        );
        ensure!(
            width <= i16::MAX as u16 && height <= i16::MAX as u16,
            "board size {}x{} out of range",
            width,
            height
        );
        Ok(Grid { width: width as i16, height: height as i16 })
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    /// Whether a cell lies strictly inside the border ring.
    pub fn interior_contains(&self, cell: Cell) -> bool {
        cell.x >= 1 && cell.x <= self.width - 2 && cell.y >= 1 && cell.y <= self.height - 2
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    /// Number of playable cells.
    pub fn interior_area(&self) -> usize {
        (self.width as usize - 2) * (self.height as usize - 2)
    }

    /// Uniformly random playable cell.
    pub fn random_interior_cell(&self, rng: &mut impl Rng) -> Cell {
        Cell::new(rng.gen_range(1..self.width - 1), rng.gen_range(1..self.height - 1))
    }
}
