//! Immutable terrain grids.

use serde::{Deserialize, Serialize};

use crate::ecs::Point;
use crate::error::ContentError;

/// Edge length of one tile, in pixels.
pub const TILE_SIZE: f32 = 32.0;

/// Centre of the tile at `(col, row)`.
pub const fn tile_to_pixel(col: u32, row: u32) -> Point {
    Point {
        x: col as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        y: row as f32 * TILE_SIZE + TILE_SIZE / 2.0,
    }
}

/// Terrain kinds, keyed by their single-character map symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Terrain {
    Grass,
    Path,
    Flagstone,
    Bridge,
    Water,
    Mountain,
    Tree,
    Stone,
    River,
}

impl Terrain {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            'g' => Self::Grass,
            'p' => Self::Path,
            'h' => Self::Flagstone,
            'b' => Self::Bridge,
            'w' => Self::Water,
            'm' => Self::Mountain,
            't' => Self::Tree,
            's' => Self::Stone,
            'r' => Self::River,
            _ => return None,
        })
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Grass => 'g',
            Self::Path => 'p',
            Self::Flagstone => 'h',
            Self::Bridge => 'b',
            Self::Water => 'w',
            Self::Mountain => 'm',
            Self::Tree => 't',
            Self::Stone => 's',
            Self::River => 'r',
        }
    }

    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Water | Self::Mountain | Self::Tree)
    }

    /// Name shown in the exploration panel.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Path => "Path",
            Self::Grass => "Meadow",
            Self::Stone => "Cold stone",
            Self::River => "River ford",
            Self::Bridge => "Bridge",
            Self::Flagstone => "Flagstones",
            Self::Water | Self::Mountain | Self::Tree => "Terrain",
        }
    }
}

/// A rectangular, immutable grid of terrain cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    cols: usize,
    cells: Vec<Terrain>,
}

impl TileGrid {
    /// Build a grid from map rows. Whitespace inside a row is ignored so maps
    /// can be written as `"m g g m"`.
    ///
    /// # Errors
    /// Fails on an empty map, ragged rows, or an unknown symbol.
    pub fn from_rows(rows: &[&str]) -> Result<Self, ContentError> {
        let mut cols = None;
        let mut cells = Vec::new();
        for (row_index, row) in rows.iter().enumerate() {
            let before = cells.len();
            for symbol in row.chars().filter(|c| !c.is_whitespace()) {
                let terrain = Terrain::from_symbol(symbol).ok_or_else(|| {
                    ContentError::MalformedTileMap(format!(
                        "unknown symbol `{symbol}` in row {row_index}"
                    ))
                })?;
                cells.push(terrain);
            }
            let width = cells.len() - before;
            match cols {
                None => cols = Some(width),
                Some(expected) if expected != width => {
                    return Err(ContentError::MalformedTileMap(format!(
                        "row {row_index} has {width} cells, expected {expected}"
                    )));
                }
                Some(_) => {}
            }
        }
        match cols {
            Some(cols) if cols > 0 => Ok(Self { cols, cells }),
            _ => Err(ContentError::MalformedTileMap("map is empty".to_owned())),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.cells.len() / self.cols
    }

    /// Map width in pixels.
    pub fn width(&self) -> f32 {
        self.cols as f32 * TILE_SIZE
    }

    /// Map height in pixels.
    pub fn height(&self) -> f32 {
        self.rows() as f32 * TILE_SIZE
    }

    /// Terrain of a cell. Anything outside the grid reads as mountain.
    pub fn cell(&self, col: i64, row: i64) -> Terrain {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows() as i64 {
            return Terrain::Mountain;
        }
        self.cells
            .get(row as usize * self.cols + col as usize)
            .copied()
            .unwrap_or(Terrain::Mountain)
    }

    pub fn is_solid(&self, col: i64, row: i64) -> bool {
        self.cell(col, row).is_solid()
    }

    /// Terrain under a pixel position.
    pub fn terrain_at(&self, x: f32, y: f32) -> Terrain {
        let col = (x / TILE_SIZE).floor() as i64;
        let row = (y / TILE_SIZE).floor() as i64;
        self.cell(col, row)
    }

    /// Row-major iterator over `(col, row, terrain)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Terrain)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, t)| (i % self.cols, i / self.cols, *t))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
