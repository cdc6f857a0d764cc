pub mod cell;
pub mod config;
pub mod coords;
pub mod error;
pub mod grid;
pub mod hud;
pub mod placement;
pub mod surface;
pub mod tile;
pub mod units;

// Re-exports for convenience in tests and integration users.
pub use cell::{Cell, CellId, GridId, Occupant};
pub use config::{ConfigError, GridConfig, UnitConfig};
pub use coords::{HexBox, HexCoord, WorldPos, distance, neighbors};
pub use error::GridError;
pub use grid::Grid;
pub use hud::{format_cell_panel, format_status};
pub use placement::{Placeable, PlaceableId, Placement};
pub use surface::{PointerSource, Surface, TileSurface};
pub use tile::TileKind;
pub use units::{Marker, Unit, UnitStatus};
