//! Authored scene content and its validation.

use std::f32::consts::TAU;

use rand::Rng as _;
use rand_chacha::ChaCha8Rng;

use crate::creatures::bestiary::STARTERS;
use crate::creatures::{SpeciesRegistry, StatKind};
use crate::ecs::{EncounterRoster, EncounterSpec, EntityGenerator, Point};
use crate::error::ContentError;
use crate::game::exploration::{ExplorationScene, Npc, Station};
use crate::game::scene::{Edge, Scene, SceneId, Transition};
use crate::game::starter::{Pedestal, StarterScene};
use crate::game::state::INITIAL_POSITION;
use crate::game::title::TitleScene;
use crate::game::walker::Walker;
use crate::items;
use crate::quests::{self, QuestGoal};
use crate::world::{TileGrid, maps, tile_to_pixel};

struct Layout {
    map: &'static [&'static str],
    default_spawn: Point,
    transitions: Vec<Transition>,
    encounters: Vec<EncounterSpec>,
    npcs: Vec<Npc>,
    stations: Vec<Station>,
}

fn starter_layout() -> Layout {
    Layout {
        map: maps::STARTER,
        default_spawn: INITIAL_POSITION,
        transitions: vec![Transition::gated(
            Edge::Right,
            SceneId::Village,
            tile_to_pixel(1, 6),
            SceneId::Village,
            "You should not travel alone. Choose a companion first.",
        )],
        encounters: Vec::new(),
        npcs: Vec::new(),
        stations: Vec::new(),
    }
}

fn pedestals() -> Vec<Pedestal> {
    STARTERS
        .into_iter()
        .zip([6, 8, 10])
        .map(|(species, col)| Pedestal {
            species,
            position: tile_to_pixel(col, 8),
        })
        .collect()
}

fn layout(id: SceneId) -> Option<Layout> {
    Some(match id {
        SceneId::Title | SceneId::Starter => return None,
        SceneId::Village => Layout {
            map: maps::VILLAGE,
            default_spawn: tile_to_pixel(9, 9),
            transitions: vec![
                Transition::open(Edge::Right, SceneId::Training, tile_to_pixel(2, 6)),
                Transition::open(Edge::Bottom, SceneId::WildClearing, tile_to_pixel(10, 2)),
            ],
            encounters: Vec::new(),
            npcs: vec![
                Npc {
                    name: "Elder Lysa",
                    position: tile_to_pixel(3, 3),
                    lines: &[
                        "Welcome to Willowmere, young keeper.",
                        "A fiery beast has taken the clearing south of here.",
                    ],
                    quest: Some("emberGuardian"),
                },
                Npc {
                    name: "Mira",
                    position: tile_to_pixel(13, 9),
                    lines: &["The river spirits have gone quiet lately."],
                    quest: Some("riverOffering"),
                },
                Npc {
                    name: "Guildmaster Aros",
                    position: tile_to_pixel(16, 3),
                    lines: &[
                        "Two pack leaders prowl the azure gorge.",
                        "Only a seasoned keeper should face them.",
                    ],
                    quest: Some("twinFangs"),
                },
            ],
            stations: Vec::new(),
        },
        SceneId::Training => Layout {
            map: maps::TRAINING,
            default_spawn: tile_to_pixel(2, 6),
            transitions: vec![Transition::open(
                Edge::Left,
                SceneId::Village,
                tile_to_pixel(18, 6),
            )],
            encounters: Vec::new(),
            npcs: vec![Npc {
                name: "Master Oren",
                position: tile_to_pixel(9, 2),
                lines: &[
                    "Every drill costs energy. Keep your partner fed.",
                    "Strength post, guard dummy, sprint track. Pick your focus.",
                ],
                quest: None,
            }],
            stations: vec![
                Station {
                    label: "Strength post",
                    position: tile_to_pixel(5, 5),
                    stat: StatKind::Power,
                    amount: 2,
                    hunger_cost: 8,
                },
                Station {
                    label: "Guard dummy",
                    position: tile_to_pixel(9, 8),
                    stat: StatKind::Defense,
                    amount: 2,
                    hunger_cost: 8,
                },
                Station {
                    label: "Sprint track",
                    position: tile_to_pixel(14, 5),
                    stat: StatKind::Speed,
                    amount: 2,
                    hunger_cost: 8,
                },
            ],
        },
        SceneId::WildClearing => Layout {
            map: maps::WILD_CLEARING,
            default_spawn: tile_to_pixel(10, 2),
            transitions: vec![
                Transition::open(Edge::Top, SceneId::Village, tile_to_pixel(10, 9)),
                Transition::gated(
                    Edge::Right,
                    SceneId::WildGorge,
                    tile_to_pixel(2, 6),
                    SceneId::WildGorge,
                    "A wall of embers bars the way east. Perhaps the elder knows more.",
                ),
            ],
            encounters: vec![
                EncounterSpec::wild("sproutle", tile_to_pixel(13, 3), 40.0),
                EncounterSpec::wild("flaruba", tile_to_pixel(6, 9), 32.0),
                EncounterSpec::boss("brasemire", tile_to_pixel(2, 7), &[], Some("emberGuardian")),
                EncounterSpec::boss("embermaw", tile_to_pixel(16, 9), &["emberCore"], None),
            ],
            npcs: Vec::new(),
            stations: Vec::new(),
        },
        SceneId::WildGorge => Layout {
            map: maps::WILD_GORGE,
            default_spawn: tile_to_pixel(2, 6),
            transitions: vec![Transition::open(
                Edge::Left,
                SceneId::WildClearing,
                tile_to_pixel(18, 6),
            )],
            encounters: vec![
                EncounterSpec::wild("tidebble", tile_to_pixel(5, 9), 28.0).with_loot(&["dewPetal"]),
                EncounterSpec::wild("mistgale", tile_to_pixel(13, 4), 40.0),
                EncounterSpec::boss("azureAlpha", tile_to_pixel(17, 2), &[], Some("twinFangs")),
                EncounterSpec::boss("azureOmega", tile_to_pixel(18, 8), &[], Some("twinFangs")),
            ],
            npcs: Vec::new(),
            stations: Vec::new(),
        },
    })
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

fn walker(layout: &mut Layout) -> Result<Walker, ContentError> {
    Ok(Walker::new(
        TileGrid::from_rows(layout.map)?,
        std::mem::take(&mut layout.transitions),
        layout.default_spawn,
    ))
}

/// # Errors
/// The starter map is malformed.
pub fn starter_scene() -> Result<StarterScene, ContentError> {
    let mut layout = starter_layout();
    Ok(StarterScene::new(walker(&mut layout)?, pedestals()))
}

fn build_exploration(
    id: SceneId,
    mut layout: Layout,
    entity_gen: &mut EntityGenerator,
    rng: &mut ChaCha8Rng,
) -> Result<ExplorationScene, ContentError> {
    let walker = walker(&mut layout)?;
    let roster = EncounterRoster::new(&layout.encounters, entity_gen, || rng.gen_range(0.0..TAU));
    Ok(ExplorationScene::new(id, walker, roster, layout.npcs, layout.stations))
}

/// A single exploration scene with fresh creatures.
///
/// # Errors
/// `id` has no walkable layout, or its map is malformed.
pub fn exploration_scene(
    id: SceneId,
    rng: &mut ChaCha8Rng,
) -> Result<ExplorationScene, ContentError> {
    let layout = layout(id).ok_or_else(|| {
        ContentError::MalformedTileMap(format!("{id:?} has no exploration layout"))
    })?;
    build_exploration(id, layout, &mut EntityGenerator::default(), rng)
}

/// Every scene, title first.
///
/// # Errors
/// Any authored map is malformed.
pub fn build_scenes(rng: &mut ChaCha8Rng) -> Result<Vec<Box<dyn Scene>>, ContentError> {
    let mut entity_gen = EntityGenerator::default();
    let mut scenes: Vec<Box<dyn Scene>> =
        vec![Box::new(TitleScene::new()), Box::new(starter_scene()?)];
    for id in SceneId::ALL {
        if let Some(layout) = layout(id) {
            scenes.push(Box::new(build_exploration(id, layout, &mut entity_gen, rng)?));
        }
    }
    Ok(scenes)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn require_item(id: &str) -> Result<(), ContentError> {
    items::find(id)
        .map(|_| ())
        .ok_or_else(|| ContentError::UnknownItem(id.to_owned()))
}

fn require_quest(id: &str) -> Result<(), ContentError> {
    quests::definition(id)
        .map(|_| ())
        .ok_or_else(|| ContentError::UnknownQuest(id.to_owned()))
}

/// Check every cross reference in the authored content: species, items,
/// quests, and maps.
///
/// # Errors
/// The first dangling reference or malformed map found.
pub fn validate(registry: &SpeciesRegistry) -> Result<(), ContentError> {
    registry.validate()?;
    for species in STARTERS {
        registry.require(species)?;
    }

    for quest in &quests::CATALOG {
        match quest.goal {
            QuestGoal::Defeat(targets) => {
                for target in targets {
                    registry.require(target)?;
                }
            }
            QuestGoal::Deliver(item) => require_item(item)?,
        }
        if let Some(item) = quest.reward.item {
            require_item(item)?;
        }
    }

    let layouts = SceneId::ALL
        .into_iter()
        .filter_map(layout)
        .chain(std::iter::once(starter_layout()));
    for layout in layouts {
        TileGrid::from_rows(layout.map)?;
        for spec in &layout.encounters {
            registry.require(spec.species)?;
            for item in spec.loot {
                require_item(item)?;
            }
            if let Some(quest) = spec.quest {
                require_quest(quest)?;
            }
        }
        for npc in &layout.npcs {
            if let Some(quest) = npc.quest {
                require_quest(quest)?;
            }
        }
    }
    Ok(())
}
