use serde::{Deserialize, Serialize};

use crate::coords::WorldPos;
use crate::placement::{Placeable, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitStatus {
	Idle,
	Selected,
	Moved,
}

/// A solid grid resident: fills its cell and moves a bounded number of hexes.
#[derive(Debug, Clone)]
pub struct Unit {
	pub name: String,
	pub status: UnitStatus,
	pub position: WorldPos,
	placement: Placement,
}

impl Unit {
	pub fn new(name: impl Into<String>, max_move_distance: u32) -> Self {
		Self::with_rules(name, true, Some(max_move_distance))
	}

	pub fn with_rules(name: impl Into<String>, fills_up_cell: bool, max_move_distance: Option<u32>) -> Self {
		Self {
			name: name.into(),
			status: UnitStatus::Idle,
			position: WorldPos::default(),
			placement: Placement::new(fills_up_cell, max_move_distance),
		}
	}
}

impl Placeable for Unit {
	fn placement(&self) -> &Placement {
		&self.placement
	}

	fn placement_mut(&mut self) -> &mut Placement {
		&mut self.placement
	}

	fn relocate(&mut self, position: WorldPos) {
		self.position = position;
		self.status = UnitStatus::Moved;
	}
}

/// A non-blocking resident such as a flag or a dropped item. Any number of
/// markers can enter a cell that no unit fills yet.
#[derive(Debug, Clone)]
pub struct Marker {
	pub label: String,
	pub position: WorldPos,
	placement: Placement,
}

impl Marker {
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			position: WorldPos::default(),
			placement: Placement::new(false, None),
		}
	}
}

impl Placeable for Marker {
	fn placement(&self) -> &Placement {
		&self.placement
	}

	fn placement_mut(&mut self) -> &mut Placement {
		&mut self.placement
	}

	fn relocate(&mut self, position: WorldPos) {
		self.position = position;
	}
}
