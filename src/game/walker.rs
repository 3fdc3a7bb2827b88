//! Walking shared by every scene with a map: held keys, collision, and edge
//! transitions.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::ecs::{Facing, Point};
use crate::game::scene::{Edge, SceneFlow, Transition};
use crate::game::state::GameState;
use crate::input::Key;
use crate::world::{HeldKeys, TileGrid, resolve};

#[derive(Debug, Clone)]
pub struct Walker {
    grid: Arc<TileGrid>,
    held: HeldKeys,
    transitions: Vec<Transition>,
    /// Edge whose refusal was already logged; cleared once the player leaves
    /// every edge band.
    refused: Option<Edge>,
    default_spawn: Point,
}

impl Walker {
    pub fn new(grid: TileGrid, transitions: Vec<Transition>, default_spawn: Point) -> Self {
        Self {
            grid: Arc::new(grid),
            held: HeldKeys::default(),
            transitions,
            refused: None,
            default_spawn,
        }
    }

    pub fn grid(&self) -> &Arc<TileGrid> {
        &self.grid
    }

    pub fn default_spawn(&self) -> Point {
        self.default_spawn
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Put the player into this scene.
    pub fn place(&mut self, state: &mut GameState, spawn: Option<Point>) {
        state.player.position = spawn.unwrap_or(self.default_spawn);
        self.held.clear();
        self.refused = None;
    }

    /// Record a movement key. Returns `false` for non-movement keys.
    pub fn key(&mut self, key: Key, pressed: bool) -> bool {
        key.apply_to(&mut self.held, pressed);
        key.is_movement()
    }

    /// Release every held key, e.g. when a menu or battle takes over.
    pub fn halt(&mut self) {
        self.held.clear();
    }

    /// Move the player along the held-key intent.
    pub fn step(&self, state: &mut GameState, config: &EngineConfig, dt: f32) {
        let intent = self.held.intent();
        let Some(facing) = Facing::from_intent(intent.0, intent.1) else {
            return;
        };
        let player = &mut state.player;
        player.facing = facing;
        player.position = resolve(&self.grid, player.position, intent, config.walk_speed, dt);
    }

    /// Check the edge bands. A reachable open transition yields a switch; a
    /// gated one logs its message once and keeps the player where they are.
    pub fn check_transitions(&mut self, state: &mut GameState) -> Option<SceneFlow> {
        let position = state.player.position;
        let mut on_edge = false;
        for transition in &self.transitions {
            if !transition.edge.reached(position, &self.grid) {
                continue;
            }
            on_edge = true;
            if let Some(unlock) = transition.unlock
                && !state.is_unlocked(unlock)
            {
                if self.refused != Some(transition.edge) {
                    self.refused = Some(transition.edge);
                    log::debug!("transition to {:?} refused", transition.target);
                    state.log.push(transition.locked_message);
                }
                continue;
            }
            return Some(SceneFlow::Switch {
                target: transition.target,
                spawn: Some(transition.spawn),
            });
        }
        if !on_edge {
            self.refused = None;
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::scene::SceneId;
    use crate::game::state::create_initial_state;
    use crate::world::tile_to_pixel;

    fn open_grid() -> TileGrid {
        TileGrid::from_rows(&["g g g g g g g g g g"; 6]).expect("valid map")
    }

    fn walker(unlock: Option<SceneId>) -> Walker {
        let mut transitions = vec![Transition::open(
            Edge::Left,
            SceneId::Village,
            tile_to_pixel(18, 6),
        )];
        transitions.push(match unlock {
            Some(scene) => Transition::gated(
                Edge::Right,
                scene,
                tile_to_pixel(1, 6),
                scene,
                "The way east is closed.",
            ),
            None => Transition::open(Edge::Right, SceneId::Training, tile_to_pixel(1, 6)),
        });
        Walker::new(open_grid(), transitions, tile_to_pixel(4, 3))
    }

    // -- step ----------------------------------------------------------------

    #[test]
    fn idle_step_leaves_position_untouched() {
        let config = EngineConfig::default();
        let mut state = create_initial_state(&config);
        state.player.position = Point::new(5.0, 100.0);
        walker(None).step(&mut state, &config, 0.1);
        assert_eq!(state.player.position, Point::new(5.0, 100.0));
    }

    #[test]
    fn held_keys_move_and_turn_player() {
        let config = EngineConfig::default();
        let mut state = create_initial_state(&config);
        let mut walker = walker(None);
        walker.place(&mut state, None);
        let start = state.player.position;
        assert!(walker.key(Key::Left, true));
        assert!(!walker.key(Key::Confirm, true));
        walker.step(&mut state, &config, 0.1);
        assert_eq!(state.player.facing, Facing::Left);
        assert!((start.x - state.player.position.x - 12.0).abs() < 1e-4);

        walker.halt();
        let here = state.player.position;
        walker.step(&mut state, &config, 0.1);
        assert_eq!(state.player.position, here);
    }

    // -- transitions ---------------------------------------------------------

    #[test]
    fn open_edge_switches_with_spawn() {
        let config = EngineConfig::default();
        let mut state = create_initial_state(&config);
        let mut walker = walker(None);
        state.player.position = Point::new(5.0, 100.0);
        assert_eq!(
            walker.check_transitions(&mut state),
            Some(SceneFlow::Switch {
                target: SceneId::Village,
                spawn: Some(tile_to_pixel(18, 6)),
            })
        );
    }

    #[test]
    fn gated_edge_refuses_and_logs_once() {
        let config = EngineConfig::default();
        let mut state = create_initial_state(&config);
        let mut walker = walker(Some(SceneId::WildGorge));
        let position = Point::new(open_grid().width() - 5.0, 100.0);
        state.player.position = position;

        assert_eq!(walker.check_transitions(&mut state), None);
        walker.step(&mut state, &config, 0.1);
        assert_eq!(walker.check_transitions(&mut state), None);
        assert_eq!(state.player.position, position);
        assert_eq!(state.log.len(), 1);
        assert_eq!(state.log.lines().last(), Some("The way east is closed."));

        // Leaving the band re-arms the message.
        state.player.position = Point::new(200.0, 100.0);
        assert_eq!(walker.check_transitions(&mut state), None);
        state.player.position = position;
        walker.check_transitions(&mut state);
        assert_eq!(state.log.len(), 2);
    }

    #[test]
    fn gated_edge_at_x_five_keeps_position() {
        let config = EngineConfig::default();
        let mut state = create_initial_state(&config);
        let mut walker = Walker::new(
            open_grid(),
            vec![Transition::gated(
                Edge::Left,
                SceneId::Starter,
                tile_to_pixel(18, 6),
                SceneId::Village,
                "Something blocks the path.",
            )],
            tile_to_pixel(4, 3),
        );
        state.player.position = Point::new(5.0, 100.0);
        walker.step(&mut state, &config, 0.016);
        assert_eq!(walker.check_transitions(&mut state), None);
        assert_eq!(state.player.position, Point::new(5.0, 100.0));
        assert_eq!(state.log.lines().last(), Some("Something blocks the path."));
    }

    #[test]
    fn gated_edge_opens_after_unlock() {
        let config = EngineConfig::default();
        let mut state = create_initial_state(&config);
        let mut walker = walker(Some(SceneId::WildGorge));
        state.player.position = Point::new(open_grid().width() - 5.0, 100.0);
        state.unlocked_scenes.insert(SceneId::WildGorge);
        assert!(matches!(
            walker.check_transitions(&mut state),
            Some(SceneFlow::Switch {
                target: SceneId::WildGorge,
                ..
            })
        ));
    }
}
