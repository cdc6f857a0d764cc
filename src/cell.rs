use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::{HexCoord, distance};
use crate::placement::PlaceableId;

static GRID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`crate::Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(u64);

impl GridId {
    pub(crate) fn next() -> Self {
        Self(GRID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable handle to a cell. Only the owning grid mints these, and it mints
/// exactly one per coordinate, so equal handles mean the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    grid: GridId,
    index: u32,
}

impl CellId {
    pub(crate) fn new(grid: GridId, index: u32) -> Self {
        Self { grid, index }
    }

    pub fn grid(self) -> GridId {
        self.grid
    }

    pub(crate) fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.grid, self.index)
    }
}

/// An entry in a cell's occupant list. The fill flag never changes for a
/// given placeable, so it is recorded once at insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub id: PlaceableId,
    pub fills_up_cell: bool,
}

#[derive(Debug)]
pub struct Cell {
    id: CellId,
    coord: HexCoord,
    occupants: Vec<Occupant>,
}

impl Cell {
    pub(crate) fn new(id: CellId, coord: HexCoord) -> Self {
        Self {
            id,
            coord,
            occupants: Vec::new(),
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    /// The grid this cell belongs to.
    pub fn grid(&self) -> GridId {
        self.id.grid
    }

    pub fn coord(&self) -> HexCoord {
        self.coord
    }

    /// Current occupants in insertion order.
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn contains(&self, id: PlaceableId) -> bool {
        self.occupants.iter().any(|o| o.id == id)
    }

    /// `true` while no occupant fills up the cell, i.e. another filling
    /// placeable may still enter.
    pub fn is_empty(&self) -> bool {
        !self.occupants.iter().any(|o| o.fills_up_cell)
    }

    pub fn distance_to(&self, other: &Cell) -> u64 {
        distance(self.coord, other.coord)
    }

    pub(crate) fn insert(&mut self, occupant: Occupant) {
        if !self.contains(occupant.id) {
            self.occupants.push(occupant);
        }
    }

    pub(crate) fn remove(&mut self, id: PlaceableId) -> bool {
        let before = self.occupants.len();
        self.occupants.retain(|o| o.id != id);
        self.occupants.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(col: i32, row: i32) -> Cell {
        Cell::new(CellId::new(GridId::next(), 0), HexCoord::new(col, row))
    }

    #[test]
    fn empty_until_a_filling_occupant_arrives() {
        let mut c = cell(0, 0);
        assert!(c.is_empty());
        c.insert(Occupant { id: PlaceableId::next(), fills_up_cell: false });
        c.insert(Occupant { id: PlaceableId::next(), fills_up_cell: false });
        assert!(c.is_empty());
        c.insert(Occupant { id: PlaceableId::next(), fills_up_cell: true });
        assert!(!c.is_empty());
    }

    #[test]
    fn occupants_keep_insertion_order_without_duplicates() {
        let mut c = cell(0, 0);
        let a = Occupant { id: PlaceableId::next(), fills_up_cell: false };
        let b = Occupant { id: PlaceableId::next(), fills_up_cell: false };
        c.insert(a);
        c.insert(b);
        c.insert(a);
        assert_eq!(c.occupants(), &[a, b]);
        assert!(c.remove(a.id));
        assert!(!c.remove(a.id));
        assert_eq!(c.occupants(), &[b]);
    }

    #[test]
    fn distance_uses_coordinates() {
        assert_eq!(cell(0, 0).distance_to(&cell(2, 0)), 2);
        assert_eq!(cell(3, 3).distance_to(&cell(4, 4)), 1);
    }
}
