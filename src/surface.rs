use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::coords::{HexBox, HexCoord, WorldPos};
use crate::tile::TileKind;

const SQRT_3: f32 = 1.732_050_8;

/// The drawable area a grid lives on: which coordinates carry a tile and how
/// coordinates map to world space.
pub trait Surface: Send + Sync {
    fn tile(&self, c: HexCoord) -> Option<TileKind>;

    /// Repaints an existing tile. Returns `false` (and changes nothing) when
    /// no tile exists at `c`; a surface never grows or shrinks through here.
    fn set_tile(&mut self, c: HexCoord, kind: TileKind) -> bool;

    fn exists(&self, c: HexCoord) -> bool {
        self.tile(c).is_some()
    }

    fn world_to_coord(&self, p: WorldPos) -> HexCoord;

    fn coord_to_world(&self, c: HexCoord) -> WorldPos;
}

/// Where the pointer currently is, in world space. `None` while it is
/// outside the viewport.
pub trait PointerSource {
    fn pointer_world_position(&self) -> Option<WorldPos>;
}

impl PointerSource for WorldPos {
    fn pointer_world_position(&self) -> Option<WorldPos> {
        Some(*self)
    }
}

impl PointerSource for Option<WorldPos> {
    fn pointer_world_position(&self) -> Option<WorldPos> {
        *self
    }
}

/// Rectangular tile storage with pointy-top hexes, odd rows shifted right.
/// Holes (`None`) are coordinates inside the bounds that have no cell.
#[derive(Debug, Clone)]
pub struct TileSurface {
    bounds: HexBox,
    hex_size: f32,
    tiles: Vec<Option<TileKind>>,
}

impl TileSurface {
    pub fn new(bounds: HexBox, hex_size: f32, fill: TileKind) -> Self {
        Self {
            bounds,
            hex_size,
            tiles: vec![Some(fill); bounds.len()],
        }
    }

    pub fn from_seed(bounds: HexBox, hex_size: f32, seed: u64, hole_ratio: f32) -> Self {
        let mut surface = Self::new(bounds, hex_size, TileKind::Grass);
        let mut rng = StdRng::seed_from_u64(seed);
        for c in bounds.iter_coords() {
            let roll: f32 = rng.r#gen();
            if roll < hole_ratio {
                surface.clear_tile(c);
                continue;
            }
            let roll: f32 = rng.r#gen();
            let kind = if roll < 0.10 {
                TileKind::Rock
            } else if roll < 0.30 {
                TileKind::Sand
            } else if roll < 0.55 {
                TileKind::Forest
            } else {
                TileKind::Grass
            };
            surface.set_tile(c, kind);
        }
        surface
    }

    pub fn bounds(&self) -> HexBox {
        self.bounds
    }

    pub fn hex_size(&self) -> f32 {
        self.hex_size
    }

    /// Punches a hole at `c`. Only available on an owned surface, before it is
    /// handed to a [`crate::Grid`].
    pub fn clear_tile(&mut self, c: HexCoord) {
        if let Some(i) = self.index(c) {
            self.tiles[i] = None;
        }
    }

    pub fn iter_tiles(&self) -> impl Iterator<Item = (HexCoord, TileKind)> + '_ {
        self.bounds
            .iter_coords()
            .filter_map(move |c| self.tile(c).map(|k| (c, k)))
    }

    fn index(&self, c: HexCoord) -> Option<usize> {
        if !self.bounds.contains(c) {
            return None;
        }
        let col = c.col - self.bounds.min.col;
        let row = c.row - self.bounds.min.row;
        Some((row * self.bounds.width() + col) as usize)
    }
}

impl Surface for TileSurface {
    fn tile(&self, c: HexCoord) -> Option<TileKind> {
        self.index(c).and_then(|i| self.tiles[i])
    }

    fn set_tile(&mut self, c: HexCoord, kind: TileKind) -> bool {
        match self.index(c) {
            Some(i) if self.tiles[i].is_some() => {
                self.tiles[i] = Some(kind);
                true
            }
            _ => false,
        }
    }

    fn world_to_coord(&self, p: WorldPos) -> HexCoord {
        let q = (SQRT_3 / 3.0 * p.x - p.y / 3.0) / self.hex_size;
        let r = (2.0 / 3.0 * p.y) / self.hex_size;
        let (q, r) = cube_round(q, r);
        HexCoord::new(q + (r - (r & 1)) / 2, r)
    }

    fn coord_to_world(&self, c: HexCoord) -> WorldPos {
        let shift = if c.is_odd_row() { 0.5 } else { 0.0 };
        WorldPos::new(
            self.hex_size * SQRT_3 * (c.col as f32 + shift),
            self.hex_size * 1.5 * c.row as f32,
        )
    }
}

/// Rounds fractional axial coordinates to the containing hex.
fn cube_round(fq: f32, fr: f32) -> (i32, i32) {
    let fs = -fq - fr;
    let mut q = fq.round();
    let mut r = fr.round();
    let s = fs.round();

    let dq = (q - fq).abs();
    let dr = (r - fr).abs();
    let ds = (s - fs).abs();
    if dq > dr && dq > ds {
        q = -r - s;
    } else if dr > ds {
        r = -q - s;
    }
    (q as i32, r as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> TileSurface {
        TileSurface::new(HexBox::sized(4, 3), 10.0, TileKind::Grass)
    }

    #[test]
    fn bounds_decide_existence() {
        let s = surface();
        assert!(s.exists(HexCoord::new(0, 0)));
        assert!(s.exists(HexCoord::new(3, 2)));
        assert!(!s.exists(HexCoord::new(-1, 0)));
        assert!(!s.exists(HexCoord::new(0, 3)));
    }

    #[test]
    fn holes_do_not_exist_and_cannot_be_painted() {
        let mut s = surface();
        let c = HexCoord::new(1, 1);
        s.clear_tile(c);
        assert!(!s.exists(c));
        assert!(!s.set_tile(c, TileKind::Rock));
        assert_eq!(s.tile(c), None);
        assert!(s.set_tile(HexCoord::new(2, 1), TileKind::Rock));
        assert_eq!(s.tile(HexCoord::new(2, 1)), Some(TileKind::Rock));
    }

    #[test]
    fn hex_centres_round_trip() {
        let s = TileSurface::new(HexBox::new(HexCoord::new(-5, -5), HexCoord::new(5, 5)), 16.0, TileKind::Grass);
        for c in s.bounds().iter_coords() {
            assert_eq!(s.world_to_coord(s.coord_to_world(c)), c);
        }
    }

    #[test]
    fn points_near_a_centre_resolve_to_that_hex() {
        let s = surface();
        let c = HexCoord::new(2, 1);
        let p = s.coord_to_world(c);
        let nudged = WorldPos::new(p.x + 3.0, p.y - 3.0);
        assert_eq!(s.world_to_coord(nudged), c);
    }

    #[test]
    fn odd_rows_are_shifted_right() {
        let s = surface();
        let even = s.coord_to_world(HexCoord::new(1, 0));
        let odd = s.coord_to_world(HexCoord::new(1, 1));
        assert!(odd.x > even.x);
        assert!(odd.y > even.y);
    }

    #[test]
    fn seeded_surfaces_are_reproducible() {
        let b = HexBox::sized(8, 8);
        let a: Vec<_> = TileSurface::from_seed(b, 10.0, 7, 0.2).iter_tiles().collect();
        let c: Vec<_> = TileSurface::from_seed(b, 10.0, 7, 0.2).iter_tiles().collect();
        assert_eq!(a, c);
        assert!(a.len() < b.len());
    }
}
