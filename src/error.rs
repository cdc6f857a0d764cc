use thiserror::Error;

use crate::cell::CellId;
use crate::coords::HexCoord;
use crate::placement::PlaceableId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
	#[error("No cell at {coord}")]
	NotFound { coord: HexCoord },
	#[error("Placeable #{placeable} must be placed in a cell before it can move; use try_place instead")]
	NotPlaced { placeable: PlaceableId },
	#[error("Cell {cell} belongs to another grid")]
	ForeignCell { cell: CellId },
}
