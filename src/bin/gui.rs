use bevy::log::{info, warn};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use hexmap::{
	CellId, Grid, GridConfig, GridError, HexBox, HexCoord, Placeable, PointerSource, TileKind, Unit, UnitStatus, WorldPos,
	distance, format_cell_panel, format_status,
};

// ---------- Constants ----------
const TILE_GAP: f32 = 0.92;
const UNIT_SCALE: f32 = 0.55;
const LOG_LIMIT: usize = 200;

// ---------- Components ----------
#[derive(Component)]
struct HexTile {
	coord: HexCoord,
}

#[derive(Component)]
struct TilesLayer; // Marker to despawn/rebuild the map

#[derive(Component)]
struct UnitSprite(usize);

// ---------- Resources ----------
#[derive(Resource)]
struct Board {
	grid: Grid,
	bounds: HexBox,
	hex_size: f32,
	units: Vec<Unit>,
}

impl Board {
	fn from_config(config: &GridConfig) -> (Self, Vec<String>) {
		let mut grid = Grid::new(config.build_surface());
		let mut log = Vec::new();
		let mut units = Vec::new();
		for start in &config.units {
			let mut unit = start.build();
			let outcome = match grid.try_get_cell(start.coord()) {
				Some(cell) => unit.try_place(&mut grid, cell),
				None => Ok(false),
			};
			log.push(deploy_report(&mut unit, start.coord(), outcome));
			units.push(unit);
		}
		let board = Self {
			grid,
			bounds: config.bounds(),
			hex_size: config.hex_size,
			units,
		};
		(board, log)
	}

	fn unit_at(&self, cell: CellId) -> Option<usize> {
		self.units.iter().position(|u| u.current_cell() == Some(cell))
	}
}

/// Log line for a start-of-game placement attempt.
fn deploy_report(unit: &mut Unit, at: HexCoord, outcome: Result<bool, GridError>) -> String {
	match outcome {
		Ok(true) => {
			unit.status = UnitStatus::Idle;
			format!("{} deployed at {}", unit.name, at)
		}
		Ok(false) => {
			warn!(unit = %unit.name, col = at.col, row = at.row, "start cell unavailable");
			format!("{} could not deploy at {}", unit.name, at)
		}
		Err(e) => {
			warn!(unit = %unit.name, col = at.col, row = at.row, error = %e, "deploy failed");
			format!("{} failed to deploy at {}: {}", unit.name, at, e)
		}
	}
}

#[derive(Resource, Default)]
struct UiState {
	log: Vec<String>,
	hovered: Option<CellId>,
	selected: Option<usize>,
	request_rebuild_tiles: bool,
}

impl UiState {
	fn push_log(&mut self, line: impl Into<String>) {
		self.log.push(line.into());
		if self.log.len() > LOG_LIMIT {
			let excess = self.log.len() - LOG_LIMIT;
			self.log.drain(..excess);
		}
	}
}

/// Cursor position in world space, refreshed every frame.
#[derive(Resource, Default)]
struct CursorWorld(Option<WorldPos>);

impl PointerSource for CursorWorld {
	fn pointer_world_position(&self) -> Option<WorldPos> {
		self.0
	}
}

// ---------- Entry ----------
fn main() {
	let config = match std::env::args().nth(1) {
		Some(path) => match GridConfig::load(&path) {
			Ok(c) => c,
			Err(e) => {
				eprintln!("{}: {}", path, e);
				std::process::exit(2);
			}
		},
		None => GridConfig::default(),
	};
	let (board, log) = Board::from_config(&config);

	App::new()
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(Window {
				title: "Hexmap".to_string(),
				resolution: (1280, 800).into(),
				..Default::default()
			}),
			..Default::default()
		}))
		.add_plugins(EguiPlugin::default())
		// Resources
		.insert_resource(UiState {
			log,
			request_rebuild_tiles: true,
			..Default::default()
		})
		.insert_resource(CursorWorld::default())
		.insert_resource(board)
		// Setup
		.add_systems(Startup, (setup_camera, spawn_units))
		// Frame systems
		.add_systems(
			Update,
			(
				track_pointer,
				handle_clicks,
				build_tiles_when_needed,
				update_tile_colors,
				sync_unit_transforms,
			)
				.chain(),
		)
		.add_systems(EguiPrimaryContextPass, draw_ui)
		.run();
}

// ---------- Setup ----------
fn setup_camera(mut commands: Commands, board: Res<Board>) {
	let centre = board.grid.surface().coord_to_world(HexCoord::new(
		(board.bounds.min.col + board.bounds.max.col) / 2,
		(board.bounds.min.row + board.bounds.max.row) / 2,
	));
	commands.spawn((Camera2d, Transform::from_xyz(centre.x, centre.y, 1000.0)));
}

fn spawn_units(mut commands: Commands, board: Res<Board>) {
	let side = board.hex_size * UNIT_SCALE * 2.0;
	for (i, unit) in board.units.iter().enumerate() {
		let color = if unit.fills_up_cell() {
			Color::srgb(0.85, 0.25, 0.2)
		} else {
			Color::srgb(0.9, 0.8, 0.3)
		};
		commands.spawn((
			Sprite::from_color(color, Vec2::splat(side)),
			Transform::from_xyz(unit.position.x, unit.position.y, 5.0),
			UnitSprite(i),
		));
	}
}

// ---------- Utilities ----------
fn tile_color_for_kind(k: TileKind) -> Color {
	match k {
		TileKind::Grass => Color::srgb(0.30, 0.55, 0.25),
		TileKind::Forest => Color::srgb(0.15, 0.35, 0.15),
		TileKind::Sand => Color::srgb(0.80, 0.72, 0.45),
		TileKind::Rock => Color::srgb(0.45, 0.45, 0.48),
	}
}

fn screen_to_world_2d(camera_q: &Query<(&Camera, &GlobalTransform)>, screen_pos: Vec2) -> Option<Vec2> {
	let (camera, camera_transform) = camera_q.single().ok()?;
	camera.viewport_to_world_2d(camera_transform, screen_pos).ok()
}

/// Selects the unit in `cell`, or orders the selected unit to move there.
fn apply_click(board: &mut Board, ui: &mut UiState, cell: CellId) {
	let clicked = board.unit_at(cell);
	let Board { grid, units, .. } = board;
	if let Some(i) = clicked {
		if let Some(prev) = ui.selected.replace(i) {
			units[prev].status = UnitStatus::Idle;
		}
		units[i].status = UnitStatus::Selected;
		ui.push_log(format!("Selected {}", units[i].name));
		return;
	}
	let Some(i) = ui.selected else {
		return;
	};
	let unit = &mut units[i];
	let target = grid.cell(cell).map(|c| c.coord()).unwrap_or_default();
	match unit.try_move(grid, cell) {
		Ok(true) => {
			info!(unit = %unit.name, col = target.col, row = target.row, "unit moved");
			ui.push_log(format!("{} moved to ({}, {})", unit.name, target.col, target.row));
			ui.selected = None;
		}
		Ok(false) => ui.push_log(format!("{} cannot reach ({}, {})", unit.name, target.col, target.row)),
		Err(e) => {
			warn!(unit = %unit.name, error = %e, "move failed");
			ui.push_log(format!("Error: {}", e));
		}
	}
}

// ---------- Systems: Pointer ----------
fn track_pointer(
	windows: Query<&Window, With<PrimaryWindow>>,
	q_cam: Query<(&Camera, &GlobalTransform)>,
	mut cursor: ResMut<CursorWorld>,
	mut board: ResMut<Board>,
	mut ui: ResMut<UiState>,
) {
	cursor.0 = windows
		.single()
		.ok()
		.and_then(|w| w.cursor_position())
		.and_then(|p| screen_to_world_2d(&q_cam, p))
		.map(|p| WorldPos::new(p.x, p.y));
	ui.hovered = board.grid.cell_under_pointer(&*cursor);
}

fn handle_clicks(
	mouse_buttons: Res<ButtonInput<MouseButton>>,
	keys: Res<ButtonInput<KeyCode>>,
	mut board: ResMut<Board>,
	mut ui: ResMut<UiState>,
) {
	if mouse_buttons.just_pressed(MouseButton::Right) || keys.just_pressed(KeyCode::Escape) {
		if let Some(i) = ui.selected.take() {
			board.units[i].status = UnitStatus::Idle;
		}
		return;
	}
	if !mouse_buttons.just_pressed(MouseButton::Left) {
		return;
	}
	if let Some(cell) = ui.hovered {
		apply_click(&mut board, &mut ui, cell);
	}
}

// ---------- Systems: Map Rendering ----------
fn build_tiles_when_needed(
	mut commands: Commands,
	mut ui: ResMut<UiState>,
	board: Res<Board>,
	existing_layers: Query<Entity, With<TilesLayer>>,
) {
	if !ui.request_rebuild_tiles {
		return;
	}
	for e in &existing_layers {
		commands.entity(e).despawn();
	}
	let size = Vec2::new(board.hex_size * 1.732 * TILE_GAP, board.hex_size * 1.5 * TILE_GAP);
	let surface = board.grid.surface();
	for coord in board.bounds.iter_coords() {
		let Some(kind) = surface.tile(coord) else {
			continue;
		};
		let p = surface.coord_to_world(coord);
		commands.spawn((
			Sprite::from_color(tile_color_for_kind(kind), size),
			Transform::from_xyz(p.x, p.y, 0.0),
			Visibility::Visible,
			HexTile { coord },
			TilesLayer,
		));
	}
	ui.request_rebuild_tiles = false;
}

fn update_tile_colors(board: Res<Board>, ui: Res<UiState>, mut q: Query<(&HexTile, &mut Sprite)>) {
	let hovered = ui.hovered.and_then(|id| board.grid.cell(id).ok()).map(|c| c.coord());
	let selected = ui.selected.map(|i| &board.units[i]);
	let origin = selected
		.and_then(|u| u.current_cell())
		.and_then(|id| board.grid.cell(id).ok())
		.map(|c| c.coord());
	for (tile, mut sprite) in &mut q {
		let Some(kind) = board.grid.surface().tile(tile.coord) else {
			continue;
		};
		let mut color = tile_color_for_kind(kind).to_srgba();
		let reachable = match (selected, origin) {
			(Some(u), Some(o)) => u.placement().can_reach(distance(o, tile.coord)),
			_ => false,
		};
		if reachable {
			color.blue = (color.blue + 0.25).min(1.0);
		}
		if hovered == Some(tile.coord) {
			color.red = (color.red + 0.2).min(1.0);
			color.green = (color.green + 0.2).min(1.0);
			color.blue = (color.blue + 0.2).min(1.0);
		}
		sprite.color = Color::Srgba(color);
	}
}

fn sync_unit_transforms(board: Res<Board>, mut q: Query<(&UnitSprite, &mut Transform)>) {
	for (sprite, mut transform) in &mut q {
		if let Some(unit) = board.units.get(sprite.0) {
			transform.translation.x = unit.position.x;
			transform.translation.y = unit.position.y;
		}
	}
}

// ---------- Systems: UI ----------
fn draw_ui(mut egui_ctx: EguiContexts, mut ui: ResMut<UiState>, board: Res<Board>) {
	let Ok(ctx) = egui_ctx.ctx_mut() else {
		return;
	};

	egui::TopBottomPanel::top("top_hud").show(&*ctx, |ui_top| {
		let selected = ui.selected.and_then(|i| board.units.get(i));
		ui_top.label(format_status(selected, ui.hovered, &board.grid));
	});

	egui::SidePanel::right("right_panel")
		.resizable(true)
		.default_width(280.0)
		.show(&*ctx, |ui_right| {
			egui::ScrollArea::vertical().show(ui_right, |ui_scroll| {
				for line in format_cell_panel(&board.grid, ui.hovered, &board.units) {
					if line.starts_with('[') {
						ui_scroll.heading(line.trim_matches(['[', ']']));
					} else {
						ui_scroll.label(line);
					}
				}
			});
		});

	egui::TopBottomPanel::bottom("bottom_log").resizable(true).show(&*ctx, |ui_bottom| {
		ui_bottom.horizontal(|ui_row| {
			if ui_row.button("Clear log").clicked() {
				ui.log.clear();
			}
			if ui_row.button("Redraw map").clicked() {
				ui.request_rebuild_tiles = true;
			}
		});
		ui_bottom.separator();
		egui::ScrollArea::vertical().stick_to_bottom(true).show(ui_bottom, |ui_logs| {
			for line in &ui.log {
				ui_logs.label(line);
			}
		});
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use bevy::prelude::{MinimalPlugins, TransformPlugin};
	use hexmap::UnitConfig;

	fn config() -> GridConfig {
		GridConfig {
			cols: 4,
			rows: 3,
			seed: None,
			units: vec![
				UnitConfig { name: "A".into(), col: 0, row: 0, fills_up_cell: true, max_move_distance: Some(1) },
				UnitConfig { name: "B".into(), col: 0, row: 0, fills_up_cell: true, max_move_distance: Some(1) },
			],
			..Default::default()
		}
	}

	#[test]
	fn second_unit_on_a_filled_start_cell_stays_unplaced() {
		let (board, log) = Board::from_config(&config());
		assert!(board.units[0].current_cell().is_some());
		assert!(board.units[1].current_cell().is_none());
		assert!(log[1].contains("could not deploy"));
	}

	#[test]
	fn deploy_errors_are_reported_not_swallowed() {
		let mut unit = Unit::new("C", 1);
		let mut other = Grid::new(config().build_surface());
		let foreign = other.get_cell(HexCoord::new(1, 1)).unwrap();
		let err = GridError::ForeignCell { cell: foreign };
		let line = deploy_report(&mut unit, HexCoord::new(1, 1), Err(err.clone()));
		assert_eq!(line, format!("C failed to deploy at (1, 1): {}", err));
		assert!(unit.current_cell().is_none());

		let line = deploy_report(&mut unit, HexCoord::new(2, 0), Ok(false));
		assert_eq!(line, "C could not deploy at (2, 0)");
	}

	#[test]
	fn clicks_select_then_move_within_range() {
		let (mut board, _) = Board::from_config(&config());
		let mut ui = UiState::default();
		let start = board.grid.get_cell(HexCoord::new(0, 0)).unwrap();
		let far = board.grid.get_cell(HexCoord::new(3, 0)).unwrap();
		let near = board.grid.get_cell(HexCoord::new(1, 0)).unwrap();

		apply_click(&mut board, &mut ui, start);
		assert_eq!(ui.selected, Some(0));
		assert_eq!(board.units[0].status, UnitStatus::Selected);

		apply_click(&mut board, &mut ui, far);
		assert_eq!(board.units[0].current_cell(), Some(start));
		assert!(ui.log.last().unwrap().contains("cannot reach"));

		apply_click(&mut board, &mut ui, near);
		assert_eq!(board.unit_at(near), Some(0));
		assert_eq!(ui.selected, None);
	}

	#[test]
	fn tiles_and_units_are_spawned_at_cell_positions() {
		let mut app = App::new();
		app.add_plugins((MinimalPlugins, TransformPlugin));

		let (board, log) = Board::from_config(&config());
		let expected = board.units[0].position;
		app.insert_resource(board);
		app.insert_resource(UiState { log, request_rebuild_tiles: true, ..Default::default() });
		app.add_systems(Startup, (setup_camera, spawn_units));
		app.add_systems(Update, (build_tiles_when_needed, sync_unit_transforms).chain());

		app.update();
		app.update();

		let world = app.world_mut();
		let tiles = world.query::<&HexTile>().iter(world).count();
		assert_eq!(tiles, 12);

		let mut units = world.query::<(&UnitSprite, &Transform)>();
		let (_, transform) = units
			.iter(world)
			.find(|(s, _)| s.0 == 0)
			.expect("unit sprite spawned");
		assert_eq!(transform.translation.x, expected.x);
		assert_eq!(transform.translation.y, expected.y);
	}
}
