#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum TileKind {
	#[default]
	Grass,
	Forest,
	Sand,
	Rock,
}

impl TileKind {
	pub const ALL: [TileKind; 4] = [TileKind::Grass, TileKind::Forest, TileKind::Sand, TileKind::Rock];

	pub fn label(self) -> &'static str {
		match self {
			TileKind::Grass => "Grass",
			TileKind::Forest => "Forest",
			TileKind::Sand => "Sand",
			TileKind::Rock => "Rock",
		}
	}
}
