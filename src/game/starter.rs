//! The sanctuary where the player picks a companion.

use crate::creatures::{MonsterInstance, SpeciesRegistry};
use crate::ecs::Point;
use crate::error::ContentError;
use crate::game::scene::{KeyHandler, Scene, SceneContext, SceneFlow, SceneId};
use crate::game::state::GameState;
use crate::game::walker::Walker;
use crate::input::Key;
use crate::needs;
use crate::render::{ExplorationView, MarkerKind, MarkerView, Panel, PlayerView, RenderModel};

/// Items handed out together with the companion.
pub const PROVISIONS: [(&str, u32); 2] = [("meat", 2), ("fruit", 1)];

/// Areas that open once a companion is chosen.
pub const UNLOCKED_BY_STARTER: [SceneId; 3] =
    [SceneId::Village, SceneId::Training, SceneId::WildClearing];

#[derive(Debug, Clone, PartialEq)]
pub struct Pedestal {
    pub species: &'static str,
    pub position: Point,
}

#[derive(Debug)]
pub struct StarterScene {
    walker: Walker,
    pedestals: Vec<Pedestal>,
}

impl StarterScene {
    pub fn new(walker: Walker, pedestals: Vec<Pedestal>) -> Self {
        Self { walker, pedestals }
    }

    fn nearest_pedestal(&self, player: Point, radius: f32) -> Option<&Pedestal> {
        self.pedestals
            .iter()
            .filter(|p| p.position.distance(player) <= radius)
            .min_by(|a, b| {
                a.position
                    .distance(player)
                    .total_cmp(&b.position.distance(player))
            })
    }

    /// Take the companion on the pedestal in reach. Ignored when nothing is
    /// in reach or a companion was already chosen.
    fn choose(&self, ctx: &mut SceneContext<'_>) -> Result<(), ContentError> {
        if ctx.state.player.companion.is_some() {
            return Ok(());
        }
        let Some(pedestal) =
            self.nearest_pedestal(ctx.state.player.position, ctx.config.interact_radius)
        else {
            return Ok(());
        };
        let companion = MonsterInstance::new(ctx.registry, pedestal.species)?;
        let name = companion.name(ctx.registry).to_owned();
        let state = &mut *ctx.state;
        state.player.companion = Some(companion);
        for (item, amount) in PROVISIONS {
            state.player.inventory.add(item, amount);
        }
        state.unlocked_scenes.extend(UNLOCKED_BY_STARTER);
        log::info!("starter chosen: {}", pedestal.species);
        state.log.push(format!("{name} joins you!"));
        state
            .log
            .push("The elder left you some provisions. The path east is open.");
        Ok(())
    }
}

impl Scene for StarterScene {
    fn id(&self) -> SceneId {
        SceneId::Starter
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>, spawn: Option<Point>) {
        self.walker.place(ctx.state, spawn);
        if ctx.state.player.companion.is_none() {
            ctx.state
                .log
                .push("Three young creatures wait on their pedestals. Press confirm to choose.");
        }
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) -> Result<SceneFlow, ContentError> {
        needs::update_needs(ctx.state, dt, ctx.config);
        self.walker.step(ctx.state, ctx.config, dt);
        Ok(self
            .walker
            .check_transitions(ctx.state)
            .unwrap_or(SceneFlow::Stay))
    }

    fn render_data(&self, state: &GameState, registry: &SpeciesRegistry) -> RenderModel {
        let mut panel =
            ExplorationView::from_state(SceneId::Starter, self.walker.grid(), state, registry);
        if state.player.companion.is_none() {
            panel.hint = Some("Walk up to a pedestal and press confirm.".to_owned());
        }
        RenderModel {
            scene: SceneId::Starter,
            grid: Some(self.walker.grid().clone()),
            player: Some(PlayerView {
                position: state.player.position,
                facing: state.player.facing,
            }),
            encounters: Vec::new(),
            markers: self
                .pedestals
                .iter()
                .map(|pedestal| {
                    let species = registry.get(pedestal.species);
                    MarkerView {
                        kind: MarkerKind::Pedestal,
                        label: species.map_or(pedestal.species, |s| s.name).to_owned(),
                        position: pedestal.position,
                        color: species.map(|s| s.color.to_owned()),
                    }
                })
                .collect(),
            panel: Panel::Exploration(panel),
        }
    }

    fn key_handler(&mut self) -> Option<&mut dyn KeyHandler> {
        Some(self)
    }

    fn exit(&mut self, _ctx: &mut SceneContext<'_>) {
        self.walker.halt();
    }
}

impl KeyHandler for StarterScene {
    fn key_down(
        &mut self,
        ctx: &mut SceneContext<'_>,
        key: Key,
    ) -> Result<SceneFlow, ContentError> {
        if !self.walker.key(key, true) && key == Key::Confirm {
            self.choose(ctx)?;
        }
        Ok(SceneFlow::Stay)
    }

    fn key_up(&mut self, _ctx: &mut SceneContext<'_>, key: Key) {
        self.walker.key(key, false);
    }
}
