use crate::cell::CellId;
use crate::grid::Grid;
use crate::placement::Placeable;
use crate::units::{Unit, UnitStatus};

fn range_label(max: Option<u32>) -> String {
	max.map(|m| m.to_string()).unwrap_or_else(|| "∞".to_string())
}

pub fn format_status(selected: Option<&Unit>, hovered: Option<CellId>, grid: &Grid) -> String {
	let cell = hovered
		.and_then(|id| grid.cell(id).ok())
		.map(|c| format!("({}, {})", c.coord().col, c.coord().row))
		.unwrap_or_else(|| "-".to_string());
	let unit = selected.map(|u| u.name.as_str()).unwrap_or("None");
	format!("Cell: {} | Selected: {} | Cells cached: {}", cell, unit, grid.len())
}

pub fn format_cell_panel(grid: &Grid, hovered: Option<CellId>, units: &[Unit]) -> Vec<String> {
	let mut out = Vec::new();
	out.push("[Cell]".to_string());
	match hovered.and_then(|id| grid.cell(id).ok()) {
		Some(cell) => {
			let tile = grid.tile(cell.id()).map(|k| k.label()).unwrap_or("?");
			let state = if cell.is_empty() { "Open" } else { "Filled" };
			out.push(format!("({}, {}) – {} – {}", cell.coord().col, cell.coord().row, tile, state));
			for u in units.iter().filter(|u| u.current_cell() == Some(cell.id())) {
				out.push(format!("  {}", u.name));
			}
		}
		None => out.push("No cell".to_string()),
	}
	out.push("[Units]".to_string());
	for u in units {
		let at = u
			.current_cell()
			.and_then(|id| grid.cell(id).ok())
			.map(|c| format!("({}, {})", c.coord().col, c.coord().row))
			.unwrap_or_else(|| "unplaced".to_string());
		let status = match u.status {
			UnitStatus::Idle => "Idle",
			UnitStatus::Selected => "Selected",
			UnitStatus::Moved => "Moved",
		};
		out.push(format!("{} – {} – range {} – {}", u.name, at, range_label(u.max_move_distance()), status));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::coords::{HexBox, HexCoord};
	use crate::surface::TileSurface;
	use crate::tile::TileKind;

	fn setup() -> (Grid, Vec<Unit>, CellId) {
		let mut grid = Grid::new(TileSurface::new(HexBox::sized(3, 3), 10.0, TileKind::Sand));
		let c = grid.get_cell(HexCoord::new(1, 2)).unwrap();
		let mut scout = Unit::new("Scout", 2);
		scout.try_place(&mut grid, c).unwrap();
		let idle = Unit::with_rules("Ghost", false, None);
		(grid, vec![scout, idle], c)
	}

	#[test]
	fn status_line() {
		let (grid, units, c) = setup();
		let s = format_status(Some(&units[0]), Some(c), &grid);
		assert!(s.contains("Cell: (1, 2)"));
		assert!(s.contains("Selected: Scout"));
		assert!(s.contains("Cells cached: 1"));
		assert!(format_status(None, None, &grid).contains("Selected: None"));
	}

	#[test]
	fn panel_lists_cell_and_units() {
		let (grid, units, c) = setup();
		let lines = format_cell_panel(&grid, Some(c), &units);
		assert_eq!(lines[0], "[Cell]");
		assert!(lines[1].contains("Sand"));
		assert!(lines[1].contains("Filled"));
		assert_eq!(lines[2], "  Scout");
		assert!(lines.iter().any(|l| l.contains("Scout – (1, 2) – range 2 – Moved")));
		assert!(lines.iter().any(|l| l.contains("Ghost – unplaced – range ∞ – Idle")));
	}

	#[test]
	fn panel_without_hovered_cell() {
		let (grid, units, _) = setup();
		let lines = format_cell_panel(&grid, None, &units);
		assert_eq!(lines[1], "No cell");
	}
}
