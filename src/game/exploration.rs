//! Walkable scenes with NPCs, training stations and wild creatures.
//!
//! While a battle runs, the scene hands every tick and key to the
//! [`BattleEngine`]. The battle reports its outcome through `on_complete`;
//! the scene applies the consequences once, keeps the result on screen for
//! the settle delay, then resumes exploration.

use std::cell::Cell;
use std::rc::Rc;

use rand::RngCore as _;

use crate::battle::{BattleEngine, BattleOutcome, BattleTiming, DeferredTask};
use crate::creatures::{SpeciesRegistry, StatKind};
use crate::ecs::{EncounterRoster, EncounterStatus, EntityID, Point};
use crate::error::ContentError;
use crate::game::scene::{KeyHandler, Scene, SceneContext, SceneFlow, SceneId};
use crate::game::state::GameState;
use crate::game::walker::Walker;
use crate::input::Key;
use crate::quests::{self, QuestGoal, QuestStatus};
use crate::render::{
    BattleView, DialogView, EncounterView, ExplorationView, InventoryLine, InventoryView,
    MarkerKind, MarkerView, Panel, PlayerView, RenderModel,
};
use crate::{items, needs, progression};

/// Experience for beating a wild creature.
pub const XP_WILD: u32 = 2;
/// Experience for beating a boss.
pub const XP_BOSS: u32 = 4;
/// Reach for challenging a creature with confirm.
pub const CHALLENGE_RADIUS: f32 = 36.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    pub name: &'static str,
    pub position: Point,
    pub lines: &'static [&'static str],
    /// Quest this NPC gives out and takes in.
    pub quest: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub label: &'static str,
    pub position: Point,
    pub stat: StatKind,
    pub amount: u32,
    pub hunger_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Dialog {
    speaker: &'static str,
    lines: Vec<String>,
    index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Overlay {
    None,
    Inventory { cursor: usize },
    Dialog(Dialog),
}

#[derive(Debug)]
struct ActiveBattle {
    engine: BattleEngine,
    encounter: EntityID,
    return_position: Point,
    outcome: Rc<Cell<Option<BattleOutcome>>>,
    /// Set once the outcome is applied; counts down to the end of the battle.
    linger: Option<f32>,
}

#[derive(Debug)]
pub struct ExplorationScene {
    id: SceneId,
    walker: Walker,
    roster: EncounterRoster,
    npcs: Vec<Npc>,
    stations: Vec<Station>,
    overlay: Overlay,
    battle: Option<ActiveBattle>,
}

/// Index of the point closest to `from`, if any lies within `radius`.
fn nearest(points: impl Iterator<Item = Point>, from: Point, radius: f32) -> Option<usize> {
    points
        .map(|p| p.distance(from))
        .enumerate()
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

impl ExplorationScene {
    pub fn new(
        id: SceneId,
        walker: Walker,
        roster: EncounterRoster,
        npcs: Vec<Npc>,
        stations: Vec<Station>,
    ) -> Self {
        Self {
            id,
            walker,
            roster,
            npcs,
            stations,
            overlay: Overlay::None,
            battle: None,
        }
    }

    pub fn roster(&self) -> &EncounterRoster {
        &self.roster
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn walker(&self) -> &Walker {
        &self.walker
    }

    // -- battles -------------------------------------------------------------

    fn start_battle(
        &mut self,
        ctx: &mut SceneContext<'_>,
        id: EntityID,
    ) -> Result<(), ContentError> {
        let Some(companion) = ctx.state.player.companion.clone() else {
            return Ok(());
        };
        let Some(entity) = self.roster.get(id).filter(|e| e.is_available()) else {
            return Ok(());
        };
        let mut engine = BattleEngine::new(
            ctx.scheduler.issue_battle_id(),
            companion,
            &entity.species,
            ctx.registry,
            BattleTiming::from_config(ctx.config),
            ctx.rng.next_u64(),
        )?;
        self.roster.begin_battle(id);

        let outcome = Rc::new(Cell::new(None));
        let sink = Rc::clone(&outcome);
        engine.on_complete(move |result| sink.set(Some(result)));

        log::info!("{:?}: battle {:?} against {id:?}", self.id, engine.id());
        self.walker.halt();
        self.overlay = Overlay::None;
        self.battle = Some(ActiveBattle {
            engine,
            encounter: id,
            return_position: ctx.state.player.position,
            outcome,
            linger: None,
        });
        Ok(())
    }

    fn update_battle(&mut self, ctx: &mut SceneContext<'_>, dt: f32) {
        let Some(active) = self.battle.as_mut() else {
            return;
        };
        active.engine.update(dt);
        let finished = match active.linger.as_mut() {
            Some(linger) => {
                *linger -= dt;
                *linger <= 0.0
            }
            None => false,
        };
        if finished {
            self.end_battle(ctx);
        }
    }

    /// Apply the battle's outcome if it has just been reported.
    fn settle(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), ContentError> {
        let Some(active) = self.battle.as_mut() else {
            return Ok(());
        };
        let Some(outcome) = active.outcome.take() else {
            return Ok(());
        };
        active.linger = Some(ctx.config.battle_settle_delay);
        let encounter = active.encounter;
        let return_position = active.return_position;

        match outcome {
            BattleOutcome::Victory => self.reward_victory(ctx, encounter)?,
            BattleOutcome::Escape => {
                self.roster.release(encounter, ctx.config.escape_cooldown);
                ctx.state.player.position = return_position;
                ctx.state.log.push("You got away safely.");
            }
            BattleOutcome::Defeat => {
                self.roster.release(encounter, ctx.config.escape_cooldown);
                ctx.state.player.position = self.walker.default_spawn();
                ctx.state
                    .log
                    .push("Your companion is exhausted. You fall back to rest.");
            }
        }
        Ok(())
    }

    fn reward_victory(
        &mut self,
        ctx: &mut SceneContext<'_>,
        encounter: EntityID,
    ) -> Result<(), ContentError> {
        if !self.roster.mark_defeated(encounter) {
            return Ok(());
        }
        let Some(entity) = self.roster.get(encounter) else {
            return Ok(());
        };
        let species = entity.species.clone();
        let loot = entity.loot.clone();
        let quest = entity.quest.clone();
        let boss = entity.boss;

        let state = &mut *ctx.state;
        let enemy = ctx.registry.get(&species).map_or(species.as_str(), |s| s.name);
        state.log.push(format!("You defeated {enemy}!"));

        if let Some(companion) = state.player.companion.as_mut() {
            let xp = if boss { XP_BOSS } else { XP_WILD };
            let messages = progression::apply_experience(
                companion,
                xp,
                ctx.registry,
                ctx.config.evolution_policy,
            )?;
            for message in messages {
                state.log.push(message);
            }
        }
        for item in &loot {
            state.player.inventory.add(item, 1);
            state
                .log
                .push(format!("You found {}.", items::display_name(item)));
        }
        if boss {
            state.defeated_bosses.insert(species.clone());
        }
        if let Some(quest) = quest {
            quests::mark_boss_defeated(state, &quest, &species)?;
        }
        Ok(())
    }

    /// Drop the battle. A battle torn down before it finished hands the
    /// creature back as if the player had escaped.
    fn end_battle(&mut self, ctx: &mut SceneContext<'_>) {
        let Some(active) = self.battle.take() else {
            return;
        };
        ctx.scheduler.cancel(active.engine.id());
        if active.engine.outcome().is_none() {
            self.roster
                .release(active.encounter, ctx.config.escape_cooldown);
            ctx.state.player.position = active.return_position;
        }
        log::debug!("{:?}: battle {:?} closed", self.id, active.engine.id());
    }

    // -- exploration ---------------------------------------------------------

    /// Confirm while walking: talk, train, or challenge, by priority.
    /// Confirm with nothing in reach is ignored.
    fn interact(&mut self, ctx: &mut SceneContext<'_>) -> Result<(), ContentError> {
        let player = ctx.state.player.position;
        let reach = ctx.config.interact_radius;

        if let Some(index) = nearest(self.npcs.iter().map(|n| n.position), player, reach) {
            return self.talk(ctx, index);
        }
        if let Some(station) = nearest(self.stations.iter().map(|s| s.position), player, reach)
            .and_then(|index| self.stations.get(index))
        {
            needs::train(ctx.state, station.stat, station.amount, station.hunger_cost);
            return Ok(());
        }
        if ctx.state.player.companion.is_some()
            && let Some(id) = self.roster.find_trigger(player, CHALLENGE_RADIUS)
        {
            self.start_battle(ctx, id)?;
        }
        Ok(())
    }

    fn talk(&mut self, ctx: &mut SceneContext<'_>, index: usize) -> Result<(), ContentError> {
        let Some(npc) = self.npcs.get(index) else {
            return Ok(());
        };
        let mut lines: Vec<String> = npc.lines.iter().map(|l| (*l).to_owned()).collect();
        if let Some(quest) = npc.quest {
            lines.push(quest_reaction(ctx.state, quest)?);
        }
        if let Some(first) = lines.first() {
            ctx.state.log.push(format!("{}: {first}", npc.name));
        }
        self.walker.halt();
        self.overlay = Overlay::Dialog(Dialog {
            speaker: npc.name,
            lines,
            index: 0,
        });
        Ok(())
    }

    fn dialog_key(&mut self, ctx: &mut SceneContext<'_>, key: Key) {
        let Overlay::Dialog(dialog) = &mut self.overlay else {
            return;
        };
        match key {
            Key::Confirm => {
                dialog.index += 1;
                let speaker = dialog.speaker;
                match dialog.lines.get(dialog.index).cloned() {
                    Some(line) => ctx.state.log.push(format!("{speaker}: {line}")),
                    None => self.overlay = Overlay::None,
                }
            }
            Key::Cancel => self.overlay = Overlay::None,
            _ => {}
        }
    }

    fn inventory_key(&mut self, ctx: &mut SceneContext<'_>, key: Key) {
        let Overlay::Inventory { cursor } = &mut self.overlay else {
            return;
        };
        let len = ctx.state.player.inventory.len();
        match key {
            Key::Up | Key::Left if len > 0 => *cursor = (*cursor + len - 1) % len,
            Key::Down | Key::Right if len > 0 => *cursor = (*cursor + 1) % len,
            Key::Confirm => {
                if let Some(entry) = ctx.state.player.inventory.get(*cursor) {
                    let item = entry.item_id.clone();
                    items::use_item(ctx.state, &item);
                    *cursor = (*cursor).min(ctx.state.player.inventory.len().saturating_sub(1));
                }
            }
            Key::Cancel | Key::ToggleInventory => self.overlay = Overlay::None,
            _ => {}
        }
    }

    fn panel(&self, state: &GameState, registry: &SpeciesRegistry) -> Panel {
        if let Some(active) = &self.battle {
            let engine = &active.engine;
            return Panel::Battle(BattleView {
                phase: engine.phase(),
                player: engine.player_snapshot(),
                enemy: engine.enemy_snapshot(),
                menu: engine.menu_options(),
                cursor: engine.cursor(),
                log: engine.log().to_vec(),
            });
        }
        match &self.overlay {
            Overlay::None => {
                let mut view =
                    ExplorationView::from_state(self.id, self.walker.grid(), state, registry);
                if state.player.companion.is_some() && state.player.needs.is_critical() {
                    view.hint =
                        Some("Your companion is hungry. Open the bag to feed it.".to_owned());
                }
                Panel::Exploration(view)
            }
            Overlay::Inventory { cursor } => Panel::Inventory(InventoryView {
                entries: state
                    .player
                    .inventory
                    .entries()
                    .iter()
                    .map(|entry| InventoryLine {
                        name: items::display_name(&entry.item_id).to_owned(),
                        description: items::find(&entry.item_id)
                            .map_or("", |item| item.description)
                            .to_owned(),
                        quantity: entry.quantity,
                    })
                    .collect(),
                cursor: *cursor,
                log: state.log.to_vec(),
            }),
            Overlay::Dialog(dialog) => Panel::Dialog(DialogView {
                speaker: dialog.speaker.to_owned(),
                line: dialog.lines.get(dialog.index).cloned().unwrap_or_default(),
                remaining: dialog.lines.len().saturating_sub(dialog.index + 1),
            }),
        }
    }
}

/// Run an NPC's quest bookkeeping and return what they say about it.
fn quest_reaction(state: &mut GameState, id: &str) -> Result<String, ContentError> {
    let quest = quests::definition(id).ok_or_else(|| ContentError::UnknownQuest(id.to_owned()))?;
    if quests::status(state, id) == QuestStatus::Available {
        quests::activate_quest(state, id)?;
    }
    if matches!(quest.goal, QuestGoal::Deliver(_))
        && quests::status(state, id) == QuestStatus::Active
    {
        quests::deliver_item(state, id)?;
    }
    Ok(match quests::status(state, id) {
        QuestStatus::Available => quest.description.to_owned(),
        QuestStatus::Active => format!("Remember: {}", quest.description),
        QuestStatus::Completed => "Thank you again. The valley is calmer for it.".to_owned(),
    })
}

impl Scene for ExplorationScene {
    fn id(&self) -> SceneId {
        self.id
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>, spawn: Option<Point>) {
        self.walker.place(ctx.state, spawn);
        self.overlay = Overlay::None;
        let beaten: Vec<String> = self
            .roster
            .iter()
            .filter(|e| e.boss && ctx.state.defeated_bosses.contains(&e.species))
            .map(|e| e.species.clone())
            .collect();
        for species in beaten {
            self.roster.retire_boss(&species);
        }
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) -> Result<SceneFlow, ContentError> {
        if self.battle.is_some() {
            self.update_battle(ctx, dt);
            return Ok(SceneFlow::Stay);
        }
        self.roster.animate(dt);
        if self.overlay != Overlay::None {
            return Ok(SceneFlow::Stay);
        }

        needs::update_needs(ctx.state, dt, ctx.config);
        self.walker.step(ctx.state, ctx.config, dt);
        if ctx.state.player.companion.is_some()
            && let Some(id) = self
                .roster
                .find_trigger(ctx.state.player.position, ctx.config.encounter_radius)
        {
            self.start_battle(ctx, id)?;
            return Ok(SceneFlow::Stay);
        }
        Ok(self
            .walker
            .check_transitions(ctx.state)
            .unwrap_or(SceneFlow::Stay))
    }

    fn render_data(&self, state: &GameState, registry: &SpeciesRegistry) -> RenderModel {
        let npcs = self.npcs.iter().map(|npc| MarkerView {
            kind: MarkerKind::Npc,
            label: npc.name.to_owned(),
            position: npc.position,
            color: None,
        });
        let stations = self.stations.iter().map(|station| MarkerView {
            kind: MarkerKind::Station,
            label: station.label.to_owned(),
            position: station.position,
            color: None,
        });
        RenderModel {
            scene: self.id,
            grid: Some(self.walker.grid().clone()),
            player: Some(PlayerView {
                position: state.player.position,
                facing: state.player.facing,
            }),
            encounters: self
                .roster
                .iter()
                .filter(|e| e.status != EncounterStatus::Defeated)
                .map(|e| EncounterView::new(e, registry))
                .collect(),
            markers: npcs.chain(stations).collect(),
            panel: self.panel(state, registry),
        }
    }

    fn key_handler(&mut self) -> Option<&mut dyn KeyHandler> {
        Some(self)
    }

    fn exit(&mut self, ctx: &mut SceneContext<'_>) {
        self.end_battle(ctx);
        self.overlay = Overlay::None;
        self.walker.halt();
    }

    fn on_deferred(
        &mut self,
        ctx: &mut SceneContext<'_>,
        task: &DeferredTask,
    ) -> Result<(), ContentError> {
        let Some(active) = self.battle.as_mut() else {
            log::debug!("{:?}: no battle for {task:?}", self.id);
            return Ok(());
        };
        if active.engine.resolve_enemy_turn(task) {
            self.settle(ctx)?;
        }
        Ok(())
    }

    fn battle(&self) -> Option<&BattleEngine> {
        self.battle.as_ref().map(|active| &active.engine)
    }
}

impl KeyHandler for ExplorationScene {
    fn key_down(
        &mut self,
        ctx: &mut SceneContext<'_>,
        key: Key,
    ) -> Result<SceneFlow, ContentError> {
        if let Some(active) = self.battle.as_mut() {
            if active.linger.is_some() {
                if key == Key::Confirm {
                    self.end_battle(ctx);
                }
            } else {
                active.engine.handle_input(key, ctx.scheduler);
                self.settle(ctx)?;
            }
            return Ok(SceneFlow::Stay);
        }

        match self.overlay {
            Overlay::Inventory { .. } => self.inventory_key(ctx, key),
            Overlay::Dialog(_) => self.dialog_key(ctx, key),
            Overlay::None => {
                if self.walker.key(key, true) {
                    return Ok(SceneFlow::Stay);
                }
                match key {
                    Key::ToggleInventory => {
                        self.walker.halt();
                        self.overlay = Overlay::Inventory { cursor: 0 };
                    }
                    Key::Confirm => self.interact(ctx)?,
                    _ => {}
                }
            }
        }
        Ok(SceneFlow::Stay)
    }

    fn key_up(&mut self, _ctx: &mut SceneContext<'_>, key: Key) {
        self.walker.key(key, false);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattlePhase;
    use crate::game::content;
    use crate::game::testing::Fixture;
    use crate::render::RenderMode;

    fn scene(fx: &mut Fixture, id: SceneId) -> ExplorationScene {
        let mut scene = content::exploration_scene(id, &mut fx.rng).expect("authored content");
        scene.enter(&mut fx.ctx(), None);
        scene
    }

    fn npc_position(scene: &ExplorationScene, name: &str) -> Point {
        scene
            .npcs()
            .iter()
            .find(|n| n.name == name)
            .expect("npc exists")
            .position
    }

    // -- interaction ---------------------------------------------------------

    #[test]
    fn confirm_with_nothing_in_reach_is_ignored() {
        let mut fx = Fixture::with_companion("sproutle");
        let mut scene = scene(&mut fx, SceneId::Village);
        let before = fx.state.clone();
        scene.key_down(&mut fx.ctx(), Key::Confirm).expect("no content involved");
        assert_eq!(fx.state, before);
        assert_eq!(scene.overlay, Overlay::None);
    }

    #[test]
    fn talking_opens_dialog_and_accepts_quest() {
        let mut fx = Fixture::with_companion("sproutle");
        let mut scene = scene(&mut fx, SceneId::Village);
        fx.state.player.position = npc_position(&scene, "Elder Lysa");
        scene.key_down(&mut fx.ctx(), Key::Confirm).expect("known quest");
        assert_eq!(quests::status(&fx.state, "emberGuardian"), QuestStatus::Active);
        assert_eq!(
            scene.render_data(&fx.state, &fx.registry).mode(),
            RenderMode::Dialog
        );

        // Walking keys do not move the player while talking.
        let here = fx.state.player.position;
        scene.key_down(&mut fx.ctx(), Key::Left).expect("no content involved");
        scene.update(&mut fx.ctx(), 0.1).expect("no content involved");
        assert_eq!(fx.state.player.position, here);

        for _ in 0..10 {
            if scene.overlay == Overlay::None {
                break;
            }
            scene.key_down(&mut fx.ctx(), Key::Confirm).expect("no content involved");
        }
        assert_eq!(scene.overlay, Overlay::None);
        assert_eq!(quests::status(&fx.state, "emberGuardian"), QuestStatus::Active);
    }

    #[test]
    fn delivering_completes_on_talk() {
        let mut fx = Fixture::with_companion("tidebble");
        let mut scene = scene(&mut fx, SceneId::Village);
        fx.state.player.inventory.add("dewPetal", 1);
        fx.state.player.position = npc_position(&scene, "Mira");
        scene.key_down(&mut fx.ctx(), Key::Confirm).expect("known quest");
        assert_eq!(quests::status(&fx.state, "riverOffering"), QuestStatus::Completed);
        assert!(!fx.state.player.inventory.contains("dewPetal"));
        assert_eq!(fx.state.player.gold, 20);
    }

    #[test]
    fn station_trains_a_stat() {
        let mut fx = Fixture::with_companion("flaruba");
        let mut scene = scene(&mut fx, SceneId::Training);
        let station = scene.stations().first().cloned().expect("stations");
        let stat = |state: &GameState| {
            state.player.companion.as_ref().map(|c| {
                let mut stats = c.stats;
                *stats.get_mut(station.stat)
            })
        };
        let before = stat(&fx.state);
        fx.state.player.position = station.position;
        scene.key_down(&mut fx.ctx(), Key::Confirm).expect("no content involved");
        assert_eq!(stat(&fx.state), before.map(|v| v + station.amount));
        assert_eq!(fx.state.player.needs.hunger, 100 - station.hunger_cost);
    }

    // -- inventory overlay ---------------------------------------------------

    #[test]
    fn inventory_overlay_feeds_companion() {
        let mut fx = Fixture::with_companion("sproutle");
        let mut scene = scene(&mut fx, SceneId::Village);
        fx.state.player.needs.hunger = 50;
        fx.state.player.inventory.add("tonic", 1);
        fx.state.player.inventory.add("meat", 1);

        scene.key_down(&mut fx.ctx(), Key::ToggleInventory).expect("no content involved");
        scene.key_down(&mut fx.ctx(), Key::Down).expect("no content involved");
        scene.key_down(&mut fx.ctx(), Key::Confirm).expect("no content involved");
        assert_eq!(fx.state.player.needs.hunger, 85);
        assert_eq!(scene.overlay, Overlay::Inventory { cursor: 0 });
        assert_eq!(
            scene.render_data(&fx.state, &fx.registry).mode(),
            RenderMode::Inventory
        );

        scene.key_down(&mut fx.ctx(), Key::Cancel).expect("no content involved");
        assert_eq!(scene.overlay, Overlay::None);
    }

    // -- battles -------------------------------------------------------------

    fn walk_into_first_creature(fx: &mut Fixture, scene: &mut ExplorationScene) -> EntityID {
        // Settle roaming positions first.
        scene.update(&mut fx.ctx(), 0.0).expect("nothing in reach");
        let target = scene.roster().iter().next().expect("creatures").clone();
        fx.state.player.position = target.position;
        scene.update(&mut fx.ctx(), 0.0).expect("known species");
        assert!(scene.battle().is_some(), "battle started");
        target.id
    }

    #[test]
    fn no_encounters_without_companion() {
        let mut fx = Fixture::new();
        let mut scene = scene(&mut fx, SceneId::WildClearing);
        let target = scene.roster().iter().next().expect("creatures").position;
        fx.state.player.position = target;
        scene.update(&mut fx.ctx(), 0.0).expect("known species");
        assert!(scene.battle().is_none());
    }

    #[test]
    fn retreat_restores_position_and_sets_cooldown() {
        let mut fx = Fixture::with_companion("sproutle");
        let mut scene = scene(&mut fx, SceneId::WildClearing);
        let id = walk_into_first_creature(&mut fx, &mut scene);
        let before = fx.state.player.position;

        scene.update(&mut fx.ctx(), 1.0).expect("intro");
        scene.key_down(&mut fx.ctx(), Key::Cancel).expect("retreat");
        assert_eq!(scene.battle().map(BattleEngine::phase), Some(BattlePhase::Escape));
        let entity = scene.roster().get(id).expect("exists");
        assert_eq!(entity.status, EncounterStatus::Idle);
        assert!(entity.cooldown > 0.0);
        assert_eq!(fx.state.player.position, before);

        // The result lingers, then exploration resumes without re-triggering.
        scene.update(&mut fx.ctx(), 0.6).expect("linger");
        scene.update(&mut fx.ctx(), 0.6).expect("linger");
        assert!(scene.battle().is_none());
        fx.state.player.position = scene.roster().get(id).expect("exists").position;
        scene.update(&mut fx.ctx(), 0.0).expect("cooldown");
        assert!(scene.battle().is_none());
    }

    #[test]
    fn victory_rewards_once() {
        let mut fx = Fixture::with_titan();
        let mut scene = scene(&mut fx, SceneId::WildClearing);
        let id = walk_into_first_creature(&mut fx, &mut scene);
        scene.update(&mut fx.ctx(), 1.0).expect("intro");

        scene.key_down(&mut fx.ctx(), Key::Confirm).expect("attack");
        assert_eq!(scene.battle().map(BattleEngine::phase), Some(BattlePhase::Victory));
        assert_eq!(
            scene.roster().get(id).expect("exists").status,
            EncounterStatus::Defeated
        );
        let level = fx.state.player.companion.as_ref().map(|c| c.stats.level);
        assert_eq!(level, Some(1 + XP_WILD));
        assert_eq!(fx.scheduler.pending(), 0);

        scene.update(&mut fx.ctx(), 0.5).expect("linger");
        scene.key_down(&mut fx.ctx(), Key::Confirm).expect("dismiss");
        assert!(scene.battle().is_none());
        let level = fx.state.player.companion.as_ref().map(|c| c.stats.level);
        assert_eq!(level, Some(1 + XP_WILD), "experience applied once");
        assert!(fx.state.log.lines().any(|l| l == "You defeated Sproutle!"));
    }
}
