//! The scene interface, scene ids, and edge transitions.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::{BattleEngine, DeferredTask, Scheduler};
use crate::config::EngineConfig;
use crate::creatures::SpeciesRegistry;
use crate::ecs::Point;
use crate::error::ContentError;
use crate::game::state::GameState;
use crate::input::Key;
use crate::render::RenderModel;
use crate::world::{TILE_SIZE, TileGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneId {
    Title,
    Starter,
    Village,
    Training,
    WildClearing,
    WildGorge,
}

impl SceneId {
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Starter,
        Self::Village,
        Self::Training,
        Self::WildClearing,
        Self::WildGorge,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Title => "Sylva",
            Self::Starter => "Sanctuary",
            Self::Village => "Willowmere Village",
            Self::Training => "Training Dojo",
            Self::WildClearing => "Ember Clearing",
            Self::WildGorge => "Azure Gorge",
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Distance from a map edge at which a transition fires.
pub const EDGE_THRESHOLD: f32 = TILE_SIZE * 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Whether `position` lies inside this edge's trigger band.
    pub fn reached(self, position: Point, grid: &TileGrid) -> bool {
        match self {
            Self::Left => position.x <= EDGE_THRESHOLD,
            Self::Right => position.x >= grid.width() - EDGE_THRESHOLD,
            Self::Top => position.y <= EDGE_THRESHOLD,
            Self::Bottom => position.y >= grid.height() - EDGE_THRESHOLD,
        }
    }
}

/// A map edge leading to another scene, optionally gated by an unlock.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub edge: Edge,
    pub target: SceneId,
    /// Where the player appears in `target`.
    pub spawn: Point,
    /// Required entry of the unlocked-scene set.
    pub unlock: Option<SceneId>,
    /// Logged when the transition is refused.
    pub locked_message: &'static str,
}

impl Transition {
    pub const fn open(edge: Edge, target: SceneId, spawn: Point) -> Self {
        Self {
            edge,
            target,
            spawn,
            unlock: None,
            locked_message: "",
        }
    }

    pub const fn gated(
        edge: Edge,
        target: SceneId,
        spawn: Point,
        unlock: SceneId,
        locked_message: &'static str,
    ) -> Self {
        Self {
            edge,
            target,
            spawn,
            unlock: Some(unlock),
            locked_message,
        }
    }
}

// ---------------------------------------------------------------------------
// Scene interface
// ---------------------------------------------------------------------------

/// What the engine should do after a scene callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneFlow {
    Stay,
    /// Activate `target`; `None` uses the target's own default spawn.
    Switch { target: SceneId, spawn: Option<Point> },
    /// Discard all progress and start over in the starter room.
    NewGame,
    /// Resume the scene stored in the game state.
    Continue,
}

/// Everything a scene may touch during a callback.
pub struct SceneContext<'a> {
    pub state: &'a mut GameState,
    pub registry: &'a SpeciesRegistry,
    pub config: &'a EngineConfig,
    pub scheduler: &'a mut Scheduler,
    pub rng: &'a mut ChaCha8Rng,
}

/// Key event sink of a scene.
pub trait KeyHandler {
    /// # Errors
    /// Propagates content errors raised while reacting to the key.
    fn key_down(&mut self, ctx: &mut SceneContext<'_>, key: Key) -> Result<SceneFlow, ContentError>;

    fn key_up(&mut self, _ctx: &mut SceneContext<'_>, _key: Key) {}
}

pub trait Scene {
    fn id(&self) -> SceneId;

    /// Called when the scene becomes active. `spawn` overrides the default
    /// player position.
    fn enter(&mut self, ctx: &mut SceneContext<'_>, spawn: Option<Point>);

    /// # Errors
    /// Propagates content errors, e.g. a battle against an unknown species.
    fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) -> Result<SceneFlow, ContentError>;

    fn render_data(&self, state: &GameState, registry: &SpeciesRegistry) -> RenderModel;

    /// Scenes that ignore keys keep the default.
    fn key_handler(&mut self) -> Option<&mut dyn KeyHandler> {
        None
    }

    /// Called before another scene becomes active.
    fn exit(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// A deferred task came due while this scene is active.
    ///
    /// # Errors
    /// Propagates content errors raised while settling a battle.
    fn on_deferred(
        &mut self,
        _ctx: &mut SceneContext<'_>,
        _task: &DeferredTask,
    ) -> Result<(), ContentError> {
        Ok(())
    }

    /// The battle currently running in this scene, if any.
    fn battle(&self) -> Option<&BattleEngine> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> TileGrid {
        TileGrid::from_rows(&["g g g g g g g g g g"; 6]).expect("valid map")
    }

    #[test]
    fn edge_bands_follow_threshold() {
        let grid = grid();
        assert!(Edge::Left.reached(Point::new(5.0, 100.0), &grid));
        assert!(!Edge::Left.reached(Point::new(EDGE_THRESHOLD + 0.1, 100.0), &grid));
        assert!(Edge::Right.reached(Point::new(grid.width() - 5.0, 100.0), &grid));
        assert!(Edge::Top.reached(Point::new(100.0, 0.0), &grid));
        assert!(Edge::Bottom.reached(Point::new(100.0, grid.height() - 20.0), &grid));
        assert!(!Edge::Bottom.reached(Point::new(100.0, 100.0), &grid));
    }

    #[test]
    fn scene_ids_serialize_kebab_case() {
        let json = serde_json::to_string(&SceneId::WildGorge).expect("serializable");
        assert_eq!(json, "\"wild-gorge\"");
        assert_eq!(SceneId::ALL.len(), 6);
    }
}
