use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::{HexBox, HexCoord};
use crate::surface::TileSurface;
use crate::tile::TileKind;
use crate::units::Unit;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Starting position and movement rules of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConfig {
    pub name: String,
    pub col: i32,
    pub row: i32,
    #[serde(default = "default_fills_up_cell")]
    pub fills_up_cell: bool,
    #[serde(default)]
    pub max_move_distance: Option<u32>,
}

impl UnitConfig {
    pub fn coord(&self) -> HexCoord {
        HexCoord::new(self.col, self.row)
    }

    pub fn build(&self) -> Unit {
        Unit::with_rules(self.name.clone(), self.fills_up_cell, self.max_move_distance)
    }
}

fn default_fills_up_cell() -> bool {
    true
}

/// Shape of the playable area and the units that start on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cols: i32,
    pub rows: i32,
    pub hex_size: f32,
    /// Seeded terrain with holes; `None` gives a solid field of `fill`.
    pub seed: Option<u64>,
    pub hole_ratio: f32,
    pub fill: TileKind,
    pub units: Vec<UnitConfig>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 24,
            rows: 18,
            hex_size: 24.0,
            seed: Some(42),
            hole_ratio: 0.12,
            fill: TileKind::Grass,
            units: vec![
                UnitConfig {
                    name: "Scout".to_string(),
                    col: 2,
                    row: 2,
                    fills_up_cell: true,
                    max_move_distance: Some(3),
                },
                UnitConfig {
                    name: "Tank".to_string(),
                    col: 4,
                    row: 3,
                    fills_up_cell: true,
                    max_move_distance: Some(1),
                },
            ],
        }
    }
}

impl GridConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols <= 0 || self.rows <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one cell, got {}x{}",
                self.cols, self.rows
            )));
        }
        if !(self.hex_size.is_finite() && self.hex_size > 0.0) {
            return Err(ConfigError::Invalid(format!("hex_size must be positive, got {}", self.hex_size)));
        }
        if !(0.0..1.0).contains(&self.hole_ratio) {
            return Err(ConfigError::Invalid(format!("hole_ratio must be in [0, 1), got {}", self.hole_ratio)));
        }
        let bounds = self.bounds();
        if let Some(u) = self.units.iter().find(|u| !bounds.contains(u.coord())) {
            return Err(ConfigError::Invalid(format!("unit {} starts outside the grid", u.name)));
        }
        Ok(())
    }

    pub fn bounds(&self) -> HexBox {
        HexBox::sized(self.cols, self.rows)
    }

    pub fn build_surface(&self) -> TileSurface {
        match self.seed {
            Some(seed) => TileSurface::from_seed(self.bounds(), self.hex_size, seed, self.hole_ratio),
            None => TileSurface::new(self.bounds(), self.hex_size, self.fill),
        }
    }
}
