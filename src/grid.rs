use std::collections::HashMap;
use std::fmt;

use tracing::{trace, warn};

use crate::cell::{Cell, CellId, GridId, Occupant};
use crate::coords::{HexCoord, WorldPos};
use crate::error::GridError;
use crate::surface::{PointerSource, Surface};
use crate::tile::TileKind;

/// Lazily populated cell cache over a [`Surface`].
///
/// A cell is created the first time a coordinate the surface recognises is
/// looked up, and is kept for the lifetime of the grid. Every later lookup of
/// that coordinate yields the same [`CellId`] and the same [`Cell`].
pub struct Grid {
    id: GridId,
    surface: Box<dyn Surface>,
    cells: Vec<Cell>,
    index: HashMap<HexCoord, CellId>,
}

impl Grid {
    pub fn new(surface: impl Surface + 'static) -> Self {
        Self {
            id: GridId::next(),
            surface: Box::new(surface),
            cells: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// Number of cells created so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells created so far, in creation order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The cell at `coord`, creating it on first access. `None` when the
    /// surface has no tile there. This is the only place cells are created.
    pub fn try_get_cell(&mut self, coord: HexCoord) -> Option<CellId> {
        if let Some(&id) = self.index.get(&coord) {
            return Some(id);
        }
        if !self.surface.exists(coord) {
            return None;
        }
        let id = CellId::new(self.id, self.cells.len() as u32);
        self.cells.push(Cell::new(id, coord));
        self.index.insert(coord, id);
        trace!(grid = %self.id, col = coord.col, row = coord.row, "created cell");
        Some(id)
    }

    pub fn get_cell(&mut self, coord: HexCoord) -> Result<CellId, GridError> {
        self.try_get_cell(coord).ok_or(GridError::NotFound { coord })
    }

    /// Lookup without populating the cache.
    pub fn cached_cell(&self, coord: HexCoord) -> Option<CellId> {
        self.index.get(&coord).copied()
    }

    pub fn cell(&self, id: CellId) -> Result<&Cell, GridError> {
        let i = self.slot(id)?;
        Ok(&self.cells[i])
    }

    /// Adjacent cells of `id`, in [`crate::coords::neighbors`] order, skipping
    /// coordinates without a tile. Evaluated lazily: each step may create
    /// the neighbouring cell.
    pub fn neighbors(&mut self, id: CellId) -> Result<impl Iterator<Item = CellId> + '_, GridError> {
        let around = self.cell(id)?.coord().neighbors();
        Ok(around.into_iter().filter_map(move |c| self.try_get_cell(c)))
    }

    pub fn distance(&self, a: CellId, b: CellId) -> Result<u64, GridError> {
        Ok(self.cell(a)?.distance_to(self.cell(b)?))
    }

    pub fn tile(&self, id: CellId) -> Result<TileKind, GridError> {
        let coord = self.cell(id)?.coord();
        self.surface.tile(coord).ok_or(GridError::NotFound { coord })
    }

    pub fn set_tile(&mut self, id: CellId, kind: TileKind) -> Result<(), GridError> {
        let coord = self.cell(id)?.coord();
        if self.surface.set_tile(coord, kind) {
            Ok(())
        } else {
            Err(GridError::NotFound { coord })
        }
    }

    pub fn resolve_world_position(&self, position: WorldPos) -> HexCoord {
        self.surface.world_to_coord(position)
    }

    /// World position of the cell centre; anything placed in the cell sits here.
    pub fn cell_world_position(&self, id: CellId) -> Result<WorldPos, GridError> {
        let coord = self.cell(id)?.coord();
        Ok(self.surface.coord_to_world(coord))
    }

    pub fn has_cell_at(&self, position: WorldPos) -> bool {
        self.surface.exists(self.resolve_world_position(position))
    }

    pub fn cell_at_world_position(&mut self, position: WorldPos) -> Option<CellId> {
        let coord = self.resolve_world_position(position);
        self.try_get_cell(coord)
    }

    pub fn cell_under_pointer(&mut self, pointer: &dyn PointerSource) -> Option<CellId> {
        let position = pointer.pointer_world_position()?;
        self.cell_at_world_position(position)
    }

    /// Moves `occupant` from `from` (if any) into `to` as one step.
    ///
    /// Returns the target's world position on success and `Ok(None)` when the
    /// target is already filled. Nothing is mutated unless the move happens.
    pub(crate) fn transfer(
        &mut self,
        occupant: Occupant,
        from: Option<CellId>,
        to: CellId,
    ) -> Result<Option<WorldPos>, GridError> {
        let target = self.slot(to)?;
        let source = from.map(|f| self.slot(f)).transpose()?;
        if !self.cells[target].is_empty() {
            return Ok(None);
        }
        if let Some(source) = source.filter(|&s| s != target) {
            self.cells[source].remove(occupant.id);
        }
        self.cells[target].insert(occupant);
        Ok(Some(self.surface.coord_to_world(self.cells[target].coord())))
    }

    fn slot(&self, id: CellId) -> Result<usize, GridError> {
        if id.grid() != self.id || id.index() >= self.cells.len() {
            warn!(grid = %self.id, cell = %id, "rejected handle from another grid");
            return Err(GridError::ForeignCell { cell: id });
        }
        Ok(id.index())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("id", &self.id)
            .field("cells", &self.cells)
            .finish_non_exhaustive()
    }
}
