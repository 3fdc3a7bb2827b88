//! Exploration geometry: terrain grids, authored maps, and movement.

pub mod maps;
pub mod movement;
pub mod tiles;

pub use movement::{HeldKeys, PLAYER_SIZE, is_walkable, resolve};
pub use tiles::{TILE_SIZE, Terrain, TileGrid, tile_to_pixel};
