//! Collision-aware movement over a [`TileGrid`].

use crate::ecs::Point;
use crate::world::tiles::TileGrid;

/// Side of the player's square collision box, in pixels.
pub const PLAYER_SIZE: f32 = 28.0;

/// Inset of the collision probes from the box corners.
pub const PLAYER_COLLISION_PADDING: f32 = 3.0;

const PROBES: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

/// Whether a player box centred on `position` overlaps no solid cell.
pub fn is_walkable(grid: &TileGrid, position: Point) -> bool {
    let half = PLAYER_SIZE / 2.0 - PLAYER_COLLISION_PADDING;
    PROBES.iter().all(|(dx, dy)| {
        !grid
            .terrain_at(position.x + dx * half, position.y + dy * half)
            .is_solid()
    })
}

fn clamp_to_bounds(grid: &TileGrid, position: Point) -> Point {
    let min = PLAYER_SIZE / 2.0;
    let max_x = (grid.width() - min).max(min);
    let max_y = (grid.height() - min).max(min);
    Point {
        x: position.x.clamp(min, max_x),
        y: position.y.clamp(min, max_y),
    }
}

/// Move `position` along `intent` for `speed * dt` pixels.
///
/// The intent is normalized, so diagonals are not faster than axial moves.
/// A blocked diagonal slides along whichever axis is open; a fully blocked
/// move leaves the position where it was. The result is always inside the
/// map's pixel bounds.
pub fn resolve(grid: &TileGrid, position: Point, intent: (f32, f32), speed: f32, dt: f32) -> Point {
    let (vx, vy) = intent;
    let length = vx.hypot(vy);
    if length == 0.0 || !length.is_finite() {
        return clamp_to_bounds(grid, position);
    }

    let step = speed * dt;
    let proposed = clamp_to_bounds(
        grid,
        Point {
            x: position.x + vx / length * step,
            y: position.y + vy / length * step,
        },
    );

    if is_walkable(grid, proposed) {
        return proposed;
    }

    let mut resolved = position;
    let horizontal = Point::new(proposed.x, resolved.y);
    if is_walkable(grid, horizontal) {
        resolved.x = proposed.x;
    }
    let vertical = Point::new(resolved.x, proposed.y);
    if is_walkable(grid, vertical) {
        resolved.y = proposed.y;
    }
    clamp_to_bounds(grid, resolved)
}

/// Which movement keys are currently held. Keys are non-exclusive, so
/// opposite directions cancel and diagonals combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Raw (unnormalized) intent vector, screen-space (`+y` is down).
    pub fn intent(self) -> (f32, f32) {
        let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        (axis(self.left, self.right), axis(self.up, self.down))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
