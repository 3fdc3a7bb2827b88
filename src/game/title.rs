//! Title screen: start over or continue a saved run.

use crate::creatures::SpeciesRegistry;
use crate::ecs::Point;
use crate::error::ContentError;
use crate::game::scene::{KeyHandler, Scene, SceneContext, SceneFlow, SceneId};
use crate::game::state::GameState;
use crate::input::Key;
use crate::render::{Panel, RenderModel, TitleView};

const NEW_GAME: usize = 0;
const CONTINUE: usize = 1;
const OPTIONS: [&str; 2] = ["New game", "Continue"];

#[derive(Debug, Default)]
pub struct TitleScene {
    cursor: usize,
}

impl TitleScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for TitleScene {
    fn id(&self) -> SceneId {
        SceneId::Title
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>, _spawn: Option<Point>) {
        self.cursor = if ctx.state.can_continue() { CONTINUE } else { NEW_GAME };
    }

    fn update(&mut self, _ctx: &mut SceneContext<'_>, _dt: f32) -> Result<SceneFlow, ContentError> {
        Ok(SceneFlow::Stay)
    }

    fn render_data(&self, state: &GameState, _registry: &SpeciesRegistry) -> RenderModel {
        RenderModel {
            scene: SceneId::Title,
            grid: None,
            player: None,
            encounters: Vec::new(),
            markers: Vec::new(),
            panel: Panel::Title(TitleView {
                options: OPTIONS.iter().map(|s| (*s).to_owned()).collect(),
                cursor: self.cursor,
                can_continue: state.can_continue(),
            }),
        }
    }

    fn key_handler(&mut self) -> Option<&mut dyn KeyHandler> {
        Some(self)
    }
}

impl KeyHandler for TitleScene {
    fn key_down(
        &mut self,
        ctx: &mut SceneContext<'_>,
        key: Key,
    ) -> Result<SceneFlow, ContentError> {
        Ok(match key {
            Key::Up | Key::Down => {
                self.cursor = (self.cursor + 1) % OPTIONS.len();
                SceneFlow::Stay
            }
            Key::Confirm if self.cursor == NEW_GAME => SceneFlow::NewGame,
            Key::Confirm if ctx.state.can_continue() => SceneFlow::Continue,
            _ => SceneFlow::Stay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::Scheduler;
    use crate::config::EngineConfig;
    use crate::game::state::create_initial_state;
    use rand::SeedableRng as _;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn continue_requires_progress() {
        let config = EngineConfig::default();
        let registry = SpeciesRegistry::new();
        let mut state = create_initial_state(&config);
        let mut scheduler = Scheduler::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut ctx = SceneContext {
            state: &mut state,
            registry: &registry,
            config: &config,
            scheduler: &mut scheduler,
            rng: &mut rng,
        };
        let mut title = TitleScene::new();
        title.enter(&mut ctx, None);
        title.key_down(&mut ctx, Key::Down).expect("no content involved");
        assert_eq!(title.key_down(&mut ctx, Key::Confirm), Ok(SceneFlow::Stay));

        ctx.state.unlocked_scenes.insert(SceneId::Village);
        assert_eq!(title.key_down(&mut ctx, Key::Confirm), Ok(SceneFlow::Continue));
        title.key_down(&mut ctx, Key::Up).expect("no content involved");
        assert_eq!(title.key_down(&mut ctx, Key::Confirm), Ok(SceneFlow::NewGame));
    }
}
