use rand::Rng;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// A board position in surface units. Always a multiple of the block size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one block away in `direction`.
    pub fn offset(self, direction: Direction, block: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * block,
            y: self.y + dy * block,
        }
    }
}

/// Playfield bounds: `[0, width) x [0, height)`, tiled in `block` sized squares.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub block: i32,
}

impl Board {
    /// Builds a board from a surface size, dropping any partial block at the edges.
    pub fn new(width: i32, height: i32, block: i32) -> Self {
        let block = block.max(1);
        Self {
            width: (width / block).max(1) * block,
            height: (height / block).max(1) * block,
            block,
        }
    }

    pub fn columns(&self) -> i32 {
        self.width / self.block
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Centre of the surface snapped down onto the grid.
    pub fn center(&self) -> Cell {
        Cell {
            x: self.columns() / 2 * self.block,
            y: self.rows() / 2 * self.block,
        }
    }

    /// Uniform on-grid cell, x and y drawn independently.
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        Cell {
            x: rng.gen_range(0..self.columns()) * self.block,
            y: rng.gen_range(0..self.rows()) * self.block,
        }
    }
}
