//! Authored terrain for every scene.
//!
//! See [`Terrain::from_symbol`](super::tiles::Terrain::from_symbol) for the
//! symbol legend.

pub const STARTER: &[&str] = &[
    "m m m m m m m m m m m m m m m m m m m m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m g h h h h h h h h h h h h h h h h g m",
    "m g h h h h h h h h h h h h h h h h g m",
    "m g h h h h h h h g g g g g h h h h g m",
    "m g g g g g g g g g p p p p p p p p g m",
    "m g g g t t g g g g p b b b b b b p p p",
    "m g g g g g g g g g p p p p p p p p g m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m m m m m m m m m m m m m m m m m m m m",
];

pub const VILLAGE: &[&str] = &[
    "m m m m m m m m m m m m m m m m m m m m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m g h h h g g t g g g g t g g h h h g m",
    "m g h h h g g g g g g g g g g h h h g m",
    "m g g p g g g g g g g g g g g g p g g m",
    "m g g p p p p p p p p p p p p p p g g m",
    "m p p p g g g g g p g g g g g g p p p p",
    "m g g g g w w g g p g g w w g g g g g m",
    "m g g g g w w g g p g g w w g g g g g m",
    "m g g g g g g g g p g g g g g g g g g m",
    "m g g g g g g g g p p g g g g g g g g m",
    "m m m m m m m m m p p m m m m m m m m m",
];

pub const TRAINING: &[&str] = &[
    "m m m m m m m m m m m m m m m m m m m m",
    "m h h h h h h h h h h h h h h h h h h m",
    "m h g g g g g g g g g g g g g g g g h m",
    "m h g g g g g g g h g g g g g g g g h m",
    "m h g g g g g g g g g g g g g g g g h m",
    "m h g g g g g g g g g g g g g g g g h m",
    "p p g g g g g g g g g g g g g g g g h m",
    "m h g g g g g g g g g g g g g g g g h m",
    "m h g g t g g g g g g g g g g t g g h m",
    "m h g g g g g g g g g g g g g g g g h m",
    "m h h h h h h h h h h h h h h h h h h m",
    "m m m m m m m m m m m m m m m m m m m m",
];

pub const WILD_CLEARING: &[&str] = &[
    "m m m m m m m m m p p m m m m m m m m m",
    "m g g g g g g g g p p g g g g g g g g m",
    "m g g g g g g g g p g g g g g t t g g m",
    "m g s s g g g g g p g g g g g g g g g m",
    "m g s s g g t t g p g g g g g g g g g m",
    "m g g g g g t t g p g g g g g g g g g m",
    "m g g g g g g g g p p p p p p p p p p p",
    "m g g g g g g g g g g g g g g g g g g m",
    "m g g w w g g g g g g g g g g t t g g m",
    "m g g w w g g g g g g g g g g g g g g m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m m m m m m m m m m m m m m m m m m m m",
];

pub const WILD_GORGE: &[&str] = &[
    "m m m m m m m m m m m m m m m m m m m m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m g g g g r r r g g g g g r r r g g g m",
    "m g g g g r r r g g g g g r r r g g g m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m g g g g g g g w w w w g g g g g g g m",
    "p p p p p p p p b b b b p p p p g g g m",
    "m g g g g g g g w w w w g g g g g g g m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m g t t g g g g g g g g g g g g t t g m",
    "m g g g g g g g g g g g g g g g g g g m",
    "m m m m m m m m m m m m m m m m m m m m",
];

/// Backdrop for the title screen; never walked on.
pub const TITLE: &[&str] = &[
    "m m m m m m m m m m",
    "m g g g g g g g g m",
    "m g t g g g g t g m",
    "m g g g g g g g g m",
    "m m m m m m m m m m",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tiles::TileGrid;

    #[test]
    fn every_map_parses() {
        for rows in [STARTER, VILLAGE, TRAINING, WILD_CLEARING, WILD_GORGE, TITLE] {
            TileGrid::from_rows(rows).expect("authored map is well-formed");
        }
    }
}
