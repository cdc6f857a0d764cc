//! Placement and bounded movement of grid residents.
//!
//! Any entity that lives on a [`Grid`] embeds a [`Placement`] and implements
//! [`Placeable`]; the provided `try_place`/`try_move` methods keep the
//! entity's current cell and that cell's occupant list in agreement.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cell::{CellId, Occupant};
use crate::coords::WorldPos;
use crate::error::GridError;
use crate::grid::Grid;

static PLACEABLE_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaceableId(u64);

impl PlaceableId {
    /// Allocates an id never handed out before in this process.
    pub fn next() -> Self {
        Self(PLACEABLE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PlaceableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placement state shared by every placeable kind.
///
/// `current_cell` can only be changed by [`Placeable::try_place`] and
/// [`Placeable::try_move`]. A clone keeps the rules but gets a fresh id and
/// starts unplaced, since a cell lists each occupant id once.
#[derive(Debug, PartialEq, Eq)]
pub struct Placement {
    id: PlaceableId,
    fills_up_cell: bool,
    max_move_distance: Option<u32>,
    current_cell: Option<CellId>,
}

impl Placement {
    /// `max_move_distance` of `None` means movement is unbounded.
    pub fn new(fills_up_cell: bool, max_move_distance: Option<u32>) -> Self {
        Self {
            id: PlaceableId::next(),
            fills_up_cell,
            max_move_distance,
            current_cell: None,
        }
    }

    pub fn id(&self) -> PlaceableId {
        self.id
    }

    pub fn fills_up_cell(&self) -> bool {
        self.fills_up_cell
    }

    pub fn max_move_distance(&self) -> Option<u32> {
        self.max_move_distance
    }

    pub fn current_cell(&self) -> Option<CellId> {
        self.current_cell
    }

    pub fn can_reach(&self, distance: u64) -> bool {
        self.max_move_distance.is_none_or(|max| distance <= u64::from(max))
    }

    fn occupant(&self) -> Occupant {
        Occupant {
            id: self.id,
            fills_up_cell: self.fills_up_cell,
        }
    }
}

impl Clone for Placement {
    fn clone(&self) -> Self {
        Self::new(self.fills_up_cell, self.max_move_distance)
    }
}

pub trait Placeable {
    fn placement(&self) -> &Placement;

    fn placement_mut(&mut self) -> &mut Placement;

    /// Called after a successful placement with the world position of the
    /// new cell, so the entity's visual can follow.
    fn relocate(&mut self, position: WorldPos);

    fn id(&self) -> PlaceableId {
        self.placement().id()
    }

    /// Whether this entity keeps other filling entities out of its cell.
    fn fills_up_cell(&self) -> bool {
        self.placement().fills_up_cell()
    }

    fn max_move_distance(&self) -> Option<u32> {
        self.placement().max_move_distance()
    }

    fn current_cell(&self) -> Option<CellId> {
        self.placement().current_cell()
    }

    /// Puts the entity into `cell` if that cell is empty, leaving its previous
    /// cell. `Ok(false)` means the cell is full and nothing changed.
    ///
    /// Fails with [`GridError::ForeignCell`] when `cell` (or the entity's
    /// current cell) was not issued by `grid`.
    fn try_place(&mut self, grid: &mut Grid, cell: CellId) -> Result<bool, GridError> {
        let placement = self.placement();
        let id = placement.id();
        let Some(position) = grid.transfer(placement.occupant(), placement.current_cell(), cell)? else {
            debug!(placeable = %id, cell = %cell, "placement rejected, cell is full");
            return Ok(false);
        };
        self.placement_mut().current_cell = Some(cell);
        self.relocate(position);
        debug!(placeable = %id, cell = %cell, "placed");
        Ok(true)
    }

    /// Moves an already placed entity to `cell` if it lies within
    /// [`Placeable::max_move_distance`] and is empty.
    ///
    /// Moving an entity that was never placed is a caller bug and fails with
    /// [`GridError::NotPlaced`].
    fn try_move(&mut self, grid: &mut Grid, cell: CellId) -> Result<bool, GridError> {
        let id = self.id();
        let from = self.current_cell().ok_or(GridError::NotPlaced { placeable: id })?;
        let distance = grid.distance(from, cell)?;
        if !self.placement().can_reach(distance) {
            debug!(placeable = %id, distance, max = ?self.max_move_distance(), "move rejected, out of range");
            return Ok(false);
        }
        self.try_place(grid, cell)
    }
}
