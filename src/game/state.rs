//! The single mutable world state shared by every scene.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::creatures::MonsterInstance;
use crate::ecs::{Facing, Point};
use crate::game::scene::SceneId;
use crate::items::Inventory;
use crate::needs::Needs;
use crate::quests::QuestProgress;

/// Where a brand new player stands.
pub const INITIAL_POSITION: Point = Point::new(160.0, 160.0);

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Bounded, player-facing message log. The oldest line drops first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredLog")]
pub struct LogBuffer {
    capacity: usize,
    lines: VecDeque<String>,
}

/// Saved shape of a [`LogBuffer`], re-bounded on load.
#[derive(Deserialize)]
struct StoredLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl From<StoredLog> for LogBuffer {
    fn from(stored: StoredLog) -> Self {
        let mut log = Self::new(stored.capacity);
        for line in stored.lines {
            log.push(line);
        }
        log
    }
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        while self.lines.len() >= self.capacity {
            if self.lines.pop_front().is_none() {
                break;
            }
        }
        self.lines.push_back(line.into());
    }

    /// Oldest first.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Point,
    pub facing: Facing,
    /// `None` until a starter has been chosen.
    pub companion: Option<MonsterInstance>,
    pub inventory: Inventory,
    pub gold: u32,
    pub needs: Needs,
}

/// Everything that survives a scene switch, in a flat serializable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub quests: Vec<QuestProgress>,
    pub unlocked_scenes: FxHashSet<SceneId>,
    /// Species ids of bosses beaten at least once.
    pub defeated_bosses: FxHashSet<String>,
    pub log: LogBuffer,
    /// Scene to resume on "continue".
    pub scene: SceneId,
}

impl GameState {
    pub fn is_unlocked(&self, scene: SceneId) -> bool {
        self.unlocked_scenes.contains(&scene)
    }

    /// A saved game worth continuing has progressed past the starter room.
    pub fn can_continue(&self) -> bool {
        self.unlocked_scenes.len() > 1
    }
}

pub fn create_initial_state(config: &EngineConfig) -> GameState {
    let mut unlocked_scenes = FxHashSet::default();
    unlocked_scenes.insert(SceneId::Starter);
    GameState {
        player: Player {
            position: INITIAL_POSITION,
            facing: Facing::default(),
            companion: None,
            inventory: Inventory::new(),
            gold: 0,
            needs: Needs::default(),
        },
        quests: Vec::new(),
        unlocked_scenes,
        defeated_bosses: FxHashSet::default(),
        log: LogBuffer::new(config.log_capacity),
        scene: SceneId::Starter,
    }
}

/// Throw away all progress in place.
pub fn reset_state(state: &mut GameState, config: &EngineConfig) {
    *state = create_initial_state(config);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
