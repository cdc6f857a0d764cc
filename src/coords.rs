use std::fmt;

use serde::{Deserialize, Serialize};

/// Offset hex coordinate. Odd rows are shifted half a hex to the right, so
/// diagonal adjacency depends on the parity of `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HexCoord {
    pub col: i32,
    pub row: i32,
}

impl HexCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn is_odd_row(self) -> bool {
        self.row.rem_euclid(2) != 0
    }

    pub fn distance_to(self, other: HexCoord) -> u64 {
        distance(self, other)
    }

    pub fn neighbors(self) -> [HexCoord; 6] {
        neighbors(self)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Number of hex steps between `a` and `b`. Widened to `u64` because the
/// span between the extreme `i32` coordinates does not fit in `u32`.
pub fn distance(a: HexCoord, b: HexCoord) -> u64 {
    let dx = u64::from(a.col.abs_diff(b.col));
    let dy = u64::from(a.row.abs_diff(b.row));
    let skew = if (a.col > b.col) ^ a.is_odd_row() {
        dy.div_ceil(2)
    } else {
        dy / 2
    };
    dx.saturating_sub(skew) + dy
}

/// The six adjacent coordinates: right, left, up, down, then the two
/// parity-dependent diagonals.
///
/// Offsets wrap at the `i32` edges. Wrapping keeps row parity, so adjacency
/// stays reciprocal across the seam.
pub fn neighbors(c: HexCoord) -> [HexCoord; 6] {
    let HexCoord { col, row } = c;
    let (right, left) = (col.wrapping_add(1), col.wrapping_sub(1));
    let (up, down) = (row.wrapping_add(1), row.wrapping_sub(1));
    let diag = if c.is_odd_row() { right } else { left };
    [
        HexCoord::new(right, row),
        HexCoord::new(left, row),
        HexCoord::new(col, up),
        HexCoord::new(col, down),
        HexCoord::new(diag, up),
        HexCoord::new(diag, down),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexBox {
    pub min: HexCoord, // inclusive
    pub max: HexCoord, // inclusive
}

impl HexBox {
    pub fn new(min: HexCoord, max: HexCoord) -> Self {
        assert!(min.col <= max.col && min.row <= max.row, "Invalid HexBox bounds");
        Self { min, max }
    }

    /// Box anchored at the origin spanning `cols` x `rows` hexes.
    pub fn sized(cols: i32, rows: i32) -> Self {
        Self::new(HexCoord::new(0, 0), HexCoord::new(cols - 1, rows - 1))
    }

    pub fn contains(&self, c: HexCoord) -> bool {
        c.col >= self.min.col && c.col <= self.max.col && c.row >= self.min.row && c.row <= self.max.row
    }

    pub fn width(&self) -> i32 {
        self.max.col - self.min.col + 1
    }

    pub fn height(&self) -> i32 {
        self.max.row - self.min.row + 1
    }

    pub fn len(&self) -> usize {
        (self.width() as usize) * (self.height() as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major iteration, rows outermost.
    pub fn iter_coords(&self) -> impl Iterator<Item = HexCoord> {
        let min = self.min;
        let max = self.max;
        (min.row..=max.row).flat_map(move |row| (min.col..=max.col).map(move |col| HexCoord { col, row }))
    }
}

/// A point in world space, as used by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
