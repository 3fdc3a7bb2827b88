//! The scene manager: owns every scene, the deferred-task scheduler and the
//! engine RNG, and routes ticks and keys to the one active scene.
//!
//! The [`GameState`] is never owned here. Every call borrows it, so the host
//! decides where it lives and when it is saved.

use std::fmt;

use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

use crate::battle::{BattleEngine, Scheduler};
use crate::config::EngineConfig;
use crate::creatures::SpeciesRegistry;
use crate::ecs::Point;
use crate::error::ContentError;
use crate::game::content;
use crate::game::scene::{Scene, SceneContext, SceneFlow, SceneId};
use crate::game::state::{GameState, reset_state};
use crate::input::Key;
use crate::render::RenderModel;

pub struct Engine {
    config: EngineConfig,
    registry: SpeciesRegistry,
    scheduler: Scheduler,
    rng: ChaCha8Rng,
    scenes: Vec<Box<dyn Scene>>,
    active: usize,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("active", &self.active_scene())
            .field("scenes", &self.scenes.len())
            .field("pending", &self.scheduler.pending())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Build and validate all content. The title scene starts out active;
    /// call [`Engine::start`] once the state is available.
    ///
    /// # Errors
    /// Any content bug: unknown species, item or quest ids, or a malformed map.
    pub fn new(config: EngineConfig) -> Result<Self, ContentError> {
        let registry = SpeciesRegistry::builtin()?;
        content::validate(&registry)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let scenes = content::build_scenes(&mut rng)?;
        log::info!("engine ready: {} scenes, seed {:#x}", scenes.len(), config.seed);
        Ok(Self {
            active: title_index(&scenes),
            config,
            registry,
            scheduler: Scheduler::new(),
            rng,
            scenes,
        })
    }

    /// Enter the active scene for the first time.
    pub fn start(&mut self, state: &mut GameState) {
        if let Some((scene, mut ctx)) = self.split(state) {
            scene.enter(&mut ctx, None);
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn active_scene(&self) -> SceneId {
        self.scenes
            .get(self.active)
            .map_or(SceneId::Title, |scene| scene.id())
    }

    /// The battle running in the active scene, if any.
    pub fn battle(&self) -> Option<&BattleEngine> {
        self.scenes.get(self.active).and_then(|scene| scene.battle())
    }

    pub fn render(&self, state: &GameState) -> Option<RenderModel> {
        self.scenes
            .get(self.active)
            .map(|scene| scene.render_data(state, &self.registry))
    }

    fn split<'a>(
        &'a mut self,
        state: &'a mut GameState,
    ) -> Option<(&'a mut dyn Scene, SceneContext<'a>)> {
        let Self {
            config,
            registry,
            scheduler,
            rng,
            scenes,
            active,
        } = self;
        let scene = scenes.get_mut(*active)?;
        Some((
            scene.as_mut(),
            SceneContext {
                state,
                registry,
                config,
                scheduler,
                rng,
            },
        ))
    }

    // -- ticking -------------------------------------------------------------

    /// One frame. `dt` is clamped to `[0, max_dt]`. Due deferred tasks run
    /// before the scene's own update.
    ///
    /// # Errors
    /// Propagates content errors raised by the active scene.
    pub fn update(&mut self, state: &mut GameState, dt: f32) -> Result<(), ContentError> {
        let dt = dt.min(self.config.max_dt).max(0.0);
        let due = self.scheduler.advance(dt);
        let flow = {
            let Some((scene, mut ctx)) = self.split(state) else {
                return Ok(());
            };
            for task in &due {
                scene.on_deferred(&mut ctx, task)?;
            }
            scene.update(&mut ctx, dt)?
        };
        self.apply(state, flow)
    }

    // -- input ---------------------------------------------------------------

    /// # Errors
    /// Propagates content errors raised while the scene reacts to the key.
    pub fn key_down(&mut self, state: &mut GameState, key: Key) -> Result<(), ContentError> {
        let flow = {
            let Some((scene, mut ctx)) = self.split(state) else {
                return Ok(());
            };
            match scene.key_handler() {
                Some(handler) => handler.key_down(&mut ctx, key)?,
                None => SceneFlow::Stay,
            }
        };
        self.apply(state, flow)
    }

    pub fn key_up(&mut self, state: &mut GameState, key: Key) {
        if let Some((scene, mut ctx)) = self.split(state)
            && let Some(handler) = scene.key_handler()
        {
            handler.key_up(&mut ctx, key);
        }
    }

    // -- scene flow ----------------------------------------------------------

    fn apply(&mut self, state: &mut GameState, flow: SceneFlow) -> Result<(), ContentError> {
        match flow {
            SceneFlow::Stay => {}
            SceneFlow::Switch { target, spawn } => {
                self.switch_scene(state, target, spawn);
            }
            SceneFlow::NewGame => self.new_game(state)?,
            SceneFlow::Continue => self.continue_game(state),
        }
        Ok(())
    }

    /// Make `target` the active scene. The outgoing scene is exited first and
    /// every outstanding deferred task is dropped. Returns `false` when no
    /// scene has that id.
    pub fn switch_scene(
        &mut self,
        state: &mut GameState,
        target: SceneId,
        spawn: Option<Point>,
    ) -> bool {
        let Some(next) = self.scenes.iter().position(|scene| scene.id() == target) else {
            log::warn!("no scene {target:?} to switch to");
            return false;
        };
        if let Some((scene, mut ctx)) = self.split(state) {
            scene.exit(&mut ctx);
        }
        self.scheduler.cancel_all();

        log::info!("scene {:?} -> {target:?}", self.active_scene());
        self.active = next;
        if target != SceneId::Title {
            state.scene = target;
        }
        if let Some((scene, mut ctx)) = self.split(state) {
            scene.enter(&mut ctx, spawn);
        }
        true
    }

    /// Throw away all progress and every scene's local state, then start in
    /// the starter room.
    ///
    /// # Errors
    /// Rebuilding the scenes hit a content bug; the state is left untouched.
    pub fn new_game(&mut self, state: &mut GameState) -> Result<(), ContentError> {
        let scenes = content::build_scenes(&mut self.rng)?;
        self.scheduler.cancel_all();
        reset_state(state, &self.config);
        self.active = title_index(&scenes);
        self.scenes = scenes;
        log::info!("new game");
        self.switch_scene(state, SceneId::Starter, None);
        Ok(())
    }

    /// Resume the stored scene at the stored position. Ignored when there is
    /// nothing to continue.
    pub fn continue_game(&mut self, state: &mut GameState) {
        if !state.can_continue() {
            return;
        }
        let target = match state.scene {
            SceneId::Title => SceneId::Starter,
            scene => scene,
        };
        let spawn = Some(state.player.position);
        self.switch_scene(state, target, spawn);
    }
}

fn title_index(scenes: &[Box<dyn Scene>]) -> usize {
    scenes
        .iter()
        .position(|scene| scene.id() == SceneId::Title)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattlePhase;
    use crate::creatures::MonsterInstance;
    use crate::ecs::EncounterStatus;
    use crate::game::state::{INITIAL_POSITION, create_initial_state};
    use crate::render::RenderMode;
    use crate::world::tile_to_pixel;

    fn engine() -> (Engine, GameState) {
        let config = EngineConfig::default();
        let mut engine = Engine::new(config.clone()).expect("content validates");
        let mut state = create_initial_state(&config);
        engine.start(&mut state);
        (engine, state)
    }

    fn tick(engine: &mut Engine, state: &mut GameState, frames: usize) {
        for _ in 0..frames {
            engine.update(state, 0.1).expect("tick");
        }
    }

    /// New game, starter chosen, standing in the ember clearing.
    fn in_clearing() -> (Engine, GameState) {
        let (mut engine, mut state) = engine();
        engine.key_down(&mut state, Key::Confirm).expect("new game");
        state.player.companion =
            Some(MonsterInstance::new(engine.registry(), "sproutle").expect("starter"));
        state.unlocked_scenes.insert(SceneId::WildClearing);
        assert!(engine.switch_scene(&mut state, SceneId::WildClearing, None));
        (engine, state)
    }

    /// Walk onto the first wild creature and wait out the intro.
    fn start_battle(engine: &mut Engine, state: &mut GameState) -> Point {
        engine.update(state, 0.0).expect("nothing in reach");
        let target = engine
            .render(state)
            .and_then(|model| model.encounters.first().map(|e| e.position))
            .expect("creatures in the clearing");
        state.player.position = target;
        engine.update(state, 0.0).expect("battle starts");
        assert!(engine.battle().is_some());
        tick(engine, state, 11);
        assert_eq!(engine.battle().map(BattleEngine::phase), Some(BattlePhase::PlayerTurn));
        target
    }

    // -- title ---------------------------------------------------------------

    #[test]
    fn new_game_lands_in_the_starter_room() {
        let (mut engine, mut state) = engine();
        assert_eq!(engine.active_scene(), SceneId::Title);
        assert_eq!(
            engine.render(&state).map(|m| m.mode()),
            Some(RenderMode::Title)
        );

        engine.key_down(&mut state, Key::Confirm).expect("new game");
        assert_eq!(engine.active_scene(), SceneId::Starter);
        assert_eq!(state.scene, SceneId::Starter);
        assert_eq!(state.player.position, INITIAL_POSITION);
    }

    #[test]
    fn continue_resumes_saved_scene_and_position() {
        let (mut engine, mut state) = in_clearing();
        state.player.position = tile_to_pixel(10, 4);
        let saved = serde_json::to_string(&state).expect("serializable");

        let (mut engine2, _) = self::engine();
        let mut restored: GameState = serde_json::from_str(&saved).expect("round trip");
        engine2.start(&mut restored);
        engine2.key_down(&mut restored, Key::Confirm).expect("continue");
        assert_eq!(engine2.active_scene(), SceneId::WildClearing);
        assert_eq!(restored.player.position, tile_to_pixel(10, 4));

        // A fresh state has nothing to continue.
        let mut fresh = create_initial_state(engine.config());
        engine.continue_game(&mut fresh);
        assert_eq!(engine.active_scene(), SceneId::WildClearing);
    }

    // -- ticking -------------------------------------------------------------

    #[test]
    fn long_frames_are_clamped() {
        let (mut engine, mut state) = engine();
        engine.key_down(&mut state, Key::Confirm).expect("new game");
        engine.key_down(&mut state, Key::Right).expect("walk");
        engine.update(&mut state, 5.0).expect("tick");
        let moved = state.player.position.x - INITIAL_POSITION.x;
        let expected = engine.config().walk_speed * engine.config().max_dt;
        assert!((moved - expected).abs() < 1e-3, "moved {moved}");

        engine.key_up(&mut state, Key::Right);
        let here = state.player.position;
        engine.update(&mut state, 0.1).expect("tick");
        assert_eq!(state.player.position, here);
    }

    // -- transitions ---------------------------------------------------------

    #[test]
    fn starter_exit_is_gated_until_unlocked() {
        let (mut engine, mut state) = engine();
        engine.key_down(&mut state, Key::Confirm).expect("new game");
        let exit = tile_to_pixel(19, 6);
        state.player.position = exit;

        engine.update(&mut state, 0.0).expect("tick");
        assert_eq!(engine.active_scene(), SceneId::Starter);
        assert_eq!(state.player.position, exit);
        let refusals = state
            .log
            .lines()
            .filter(|l| l.starts_with("You should not travel alone"))
            .count();
        assert_eq!(refusals, 1);

        // Standing still does not repeat the message.
        engine.update(&mut state, 0.0).expect("tick");
        assert_eq!(
            state.log.lines().last(),
            Some("You should not travel alone. Choose a companion first.")
        );

        state.unlocked_scenes.insert(SceneId::Village);
        engine.update(&mut state, 0.0).expect("tick");
        assert_eq!(engine.active_scene(), SceneId::Village);
        assert_eq!(state.scene, SceneId::Village);
        assert_eq!(state.player.position, tile_to_pixel(1, 6));
    }

    // -- battles -------------------------------------------------------------

    #[test]
    fn stale_enemy_turn_after_retreat_changes_nothing() {
        let (mut engine, mut state) = in_clearing();
        let start = start_battle(&mut engine, &mut state);

        engine.key_down(&mut state, Key::Confirm).expect("attack");
        assert_eq!(engine.battle().map(BattleEngine::phase), Some(BattlePhase::EnemyTurn));
        assert_eq!(engine.scheduler().pending(), 1);

        engine.key_down(&mut state, Key::Cancel).expect("retreat");
        assert_eq!(engine.battle().map(BattleEngine::phase), Some(BattlePhase::Escape));
        let hp = engine.battle().map(|b| b.player_snapshot().hp);

        // The enemy turn falls due while the result is still on screen.
        tick(&mut engine, &mut state, 5);
        assert_eq!(engine.scheduler().pending(), 0);
        assert_eq!(engine.battle().map(BattleEngine::phase), Some(BattlePhase::Escape));
        assert_eq!(engine.battle().map(|b| b.player_snapshot().hp), hp);

        tick(&mut engine, &mut state, 6);
        assert!(engine.battle().is_none());
        assert_eq!(state.player.position, start);

        // Still on top of the creature, but it is cooling down.
        engine.update(&mut state, 0.0).expect("tick");
        assert!(engine.battle().is_none());
        assert!(state.log.lines().any(|l| l == "You got away safely."));
    }

    #[test]
    fn leaving_mid_battle_cancels_the_enemy_turn() {
        let (mut engine, mut state) = in_clearing();
        start_battle(&mut engine, &mut state);
        engine.key_down(&mut state, Key::Confirm).expect("attack");
        assert_eq!(engine.scheduler().pending(), 1);
        let hp = state.player.companion.as_ref().map(MonsterInstance::max_hp);

        assert!(engine.switch_scene(&mut state, SceneId::Village, None));
        assert_eq!(engine.scheduler().pending(), 0);
        assert!(engine.battle().is_none());
        assert_eq!(state.player.companion.as_ref().map(MonsterInstance::max_hp), hp);

        // Coming back, the creature is free again.
        assert!(engine.switch_scene(&mut state, SceneId::WildClearing, None));
        let statuses: Vec<_> = engine
            .render(&state)
            .map(|m| m.encounters.iter().map(|e| e.status).collect())
            .unwrap_or_default();
        assert!(statuses.iter().all(|s| *s == EncounterStatus::Idle));
    }

    #[test]
    fn unknown_switch_target_is_refused() {
        let (mut engine, mut state) = engine();
        engine.scenes.retain(|scene| scene.id() != SceneId::WildGorge);
        assert!(!engine.switch_scene(&mut state, SceneId::WildGorge, None));
        assert_eq!(engine.active_scene(), SceneId::Title);
    }
}
