//! Plain-data snapshot of what is on screen.
//!
//! Scenes build a [`RenderModel`] on request; the presentation layer only
//! ever reads it. Nothing in here knows about pixels or widgets.

use std::sync::Arc;

use crate::battle::{BattlePhase, CombatantSnapshot, MenuOption};
use crate::creatures::{MonsterInstance, SpeciesRegistry, Stats};
use crate::ecs::{EncounterEntity, EncounterStatus, EntityID, Facing, Point};
use crate::game::scene::SceneId;
use crate::game::state::GameState;
use crate::quests::{self, QuestStatus};
use crate::world::TileGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    Title,
    Exploration,
    Inventory,
    Dialog,
    Battle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub scene: SceneId,
    pub grid: Option<Arc<TileGrid>>,
    pub player: Option<PlayerView>,
    pub encounters: Vec<EncounterView>,
    pub markers: Vec<MarkerView>,
    pub panel: Panel,
}

impl RenderModel {
    pub fn mode(&self) -> RenderMode {
        match self.panel {
            Panel::Title(_) => RenderMode::Title,
            Panel::Exploration(_) => RenderMode::Exploration,
            Panel::Inventory(_) => RenderMode::Inventory,
            Panel::Dialog(_) => RenderMode::Dialog,
            Panel::Battle(_) => RenderMode::Battle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub position: Point,
    pub facing: Facing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncounterView {
    pub id: EntityID,
    pub name: String,
    pub color: String,
    pub position: Point,
    pub status: EncounterStatus,
    pub boss: bool,
}

impl EncounterView {
    pub fn new(entity: &EncounterEntity, registry: &SpeciesRegistry) -> Self {
        let species = registry.get(&entity.species);
        Self {
            id: entity.id,
            name: species.map_or_else(|| entity.species.clone(), |s| s.name.to_owned()),
            color: species.map_or("#888888", |s| s.color).to_owned(),
            position: entity.position,
            status: entity.status,
            boss: entity.boss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Npc,
    Station,
    Pedestal,
}

/// A fixed, labelled point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub kind: MarkerKind,
    pub label: String,
    pub position: Point,
    pub color: Option<String>,
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Title(TitleView),
    Exploration(ExplorationView),
    Inventory(InventoryView),
    Dialog(DialogView),
    Battle(BattleView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleView {
    pub options: Vec<String>,
    pub cursor: usize,
    pub can_continue: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanionView {
    pub name: String,
    pub stats: Stats,
    pub max_hp: u32,
}

impl CompanionView {
    pub fn new(instance: &MonsterInstance, registry: &SpeciesRegistry) -> Self {
        Self {
            name: instance.name(registry).to_owned(),
            stats: instance.stats,
            max_hp: instance.max_hp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLine {
    pub title: String,
    pub status: QuestStatus,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorationView {
    pub title: String,
    pub terrain: String,
    pub companion: Option<CompanionView>,
    pub hunger: u32,
    pub gold: u32,
    pub quests: Vec<QuestLine>,
    pub log: Vec<String>,
    pub hint: Option<String>,
}

impl ExplorationView {
    /// The exploration panel as far as the shared state can fill it.
    pub fn from_state(
        scene: SceneId,
        grid: &TileGrid,
        state: &GameState,
        registry: &SpeciesRegistry,
    ) -> Self {
        let position = state.player.position;
        Self {
            title: scene.title().to_owned(),
            terrain: grid
                .terrain_at(position.x, position.y)
                .display_name()
                .to_owned(),
            companion: state
                .player
                .companion
                .as_ref()
                .map(|c| CompanionView::new(c, registry)),
            hunger: state.player.needs.hunger,
            gold: state.player.gold,
            quests: state
                .quests
                .iter()
                .filter_map(|progress| {
                    let quest = quests::definition(&progress.id)?;
                    Some(QuestLine {
                        title: quest.title.to_owned(),
                        status: progress.status,
                        description: quest.description.to_owned(),
                    })
                })
                .collect(),
            log: state.log.to_vec(),
            hint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLine {
    pub name: String,
    pub description: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryView {
    pub entries: Vec<InventoryLine>,
    pub cursor: usize,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub speaker: String,
    pub line: String,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleView {
    pub phase: BattlePhase,
    pub player: CombatantSnapshot,
    pub enemy: CombatantSnapshot,
    pub menu: Vec<MenuOption>,
    pub cursor: usize,
    pub log: Vec<String>,
}
