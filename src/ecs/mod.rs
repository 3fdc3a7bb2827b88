//! Entity storage and core value types.
//!
//! This module owns the data layout for world-bound creatures and the small
//! geometric primitives everything else shares. It is intentionally free of
//! battle, quest, and rendering concerns.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Core value types
// ---------------------------------------------------------------------------

/// Unique identifier for an entity in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityID(pub u32);

/// Monotonically increasing generator for [`EntityID`] values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityGenerator(u32);

impl EntityGenerator {
    pub fn next(&mut self) -> EntityID {
        self.0 += 1;
        EntityID(self.0)
    }
}

/// A world-space pixel coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Direction the player sprite faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Facing implied by a movement intent, or `None` when standing still.
    /// The dominant axis wins; ties go to the vertical axis.
    pub fn from_intent(vx: f32, vy: f32) -> Option<Self> {
        if vx == 0.0 && vy == 0.0 {
            return None;
        }
        Some(if vx.abs() > vy.abs() {
            if vx > 0.0 { Self::Right } else { Self::Left }
        } else if vy > 0.0 {
            Self::Down
        } else {
            Self::Up
        })
    }
}

// ---------------------------------------------------------------------------
// Encounters
// ---------------------------------------------------------------------------

/// Lifecycle of a wild creature: `Idle → Battle → {Idle | Defeated}`,
/// and `Defeated → Idle` only through respawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncounterStatus {
    Idle,
    Battle,
    Defeated,
}

/// Authoring data for one wild creature.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterSpec {
    pub species: &'static str,
    pub spawn: Point,
    pub roam_radius: f32,
    /// `None` means the creature never comes back once defeated (bosses).
    pub respawn_time: Option<f32>,
    pub boss: bool,
    pub loot: &'static [&'static str],
    pub quest: Option<&'static str>,
}

impl EncounterSpec {
    /// A roaming wild creature that respawns.
    pub const fn wild(species: &'static str, spawn: Point, roam_radius: f32) -> Self {
        Self {
            species,
            spawn,
            roam_radius,
            respawn_time: Some(45.0),
            boss: false,
            loot: &[],
            quest: None,
        }
    }

    pub const fn with_loot(mut self, loot: &'static [&'static str]) -> Self {
        self.loot = loot;
        self
    }

    /// A stationary boss that stays down once beaten.
    pub const fn boss(
        species: &'static str,
        spawn: Point,
        loot: &'static [&'static str],
        quest: Option<&'static str>,
    ) -> Self {
        Self {
            species,
            spawn,
            roam_radius: 0.0,
            respawn_time: None,
            boss: true,
            loot,
            quest,
        }
    }
}

/// A creature living in a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterEntity {
    pub id: EntityID,
    pub species: String,
    pub spawn: Point,
    pub position: Point,
    pub roam_radius: f32,
    pub respawn_time: Option<f32>,
    pub status: EncounterStatus,
    pub cooldown: f32,
    pub boss: bool,
    pub loot: Vec<String>,
    pub quest: Option<String>,
    oscillation: f32,
}

impl EncounterEntity {
    /// Whether the creature may start a battle right now.
    pub fn is_available(&self) -> bool {
        self.status == EncounterStatus::Idle && self.cooldown <= 0.0
    }
}

/// All creatures of one scene, in authoring order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterRoster {
    entities: Vec<EncounterEntity>,
}

impl EncounterRoster {
    /// Build a roster. `phases` supplies the starting roam phase of each
    /// creature so that callers control the randomness.
    pub fn new(
        specs: &[EncounterSpec],
        entity_gen: &mut EntityGenerator,
        mut phases: impl FnMut() -> f32,
    ) -> Self {
        let entities = specs
            .iter()
            .map(|spec| EncounterEntity {
                id: entity_gen.next(),
                species: spec.species.to_owned(),
                spawn: spec.spawn,
                position: spec.spawn,
                roam_radius: spec.roam_radius,
                respawn_time: spec.respawn_time,
                status: EncounterStatus::Idle,
                cooldown: 0.0,
                boss: spec.boss,
                loot: spec.loot.iter().map(|s| (*s).to_owned()).collect(),
                quest: spec.quest.map(str::to_owned),
                oscillation: phases(),
            })
            .collect();
        Self { entities }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EncounterEntity> {
        self.entities.iter()
    }

    pub fn get(&self, id: EntityID) -> Option<&EncounterEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: EntityID) -> Option<&mut EncounterEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Advance roaming motion and cooldown/respawn timers.
    pub fn animate(&mut self, dt: f32) {
        for entity in &mut self.entities {
            match entity.status {
                EncounterStatus::Battle => {}
                EncounterStatus::Defeated => {
                    entity.cooldown = (entity.cooldown - dt).max(0.0);
                    if entity.cooldown <= 0.0 && entity.respawn_time.is_some() {
                        entity.position = entity.spawn;
                        entity.status = EncounterStatus::Idle;
                        log::debug!("{} {:?} respawned", entity.species, entity.id);
                    }
                }
                EncounterStatus::Idle => {
                    entity.cooldown = (entity.cooldown - dt).max(0.0);
                    entity.oscillation += dt;
                    let radius = entity.roam_radius;
                    entity.position = Point {
                        x: entity.spawn.x + entity.oscillation.sin() * radius,
                        y: entity.spawn.y + (entity.oscillation * 0.5).cos() * radius * 0.6,
                    };
                }
            }
        }
    }

    /// First available creature closer than `radius` to `player`.
    pub fn find_trigger(&self, player: Point, radius: f32) -> Option<EntityID> {
        self.entities
            .iter()
            .find(|e| e.is_available() && e.position.distance(player) < radius)
            .map(|e| e.id)
    }

    /// `Idle → Battle`. Returns `false` (no mutation) for any other state.
    pub fn begin_battle(&mut self, id: EntityID) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.is_available() => {
                entity.status = EncounterStatus::Battle;
                true
            }
            _ => false,
        }
    }

    /// `Battle → Defeated`, starting the respawn timer.
    pub fn mark_defeated(&mut self, id: EntityID) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.status == EncounterStatus::Battle => {
                entity.status = EncounterStatus::Defeated;
                entity.cooldown = entity.respawn_time.unwrap_or(0.0);
                true
            }
            _ => false,
        }
    }

    /// Put idle bosses of `species` straight into `Defeated`. Used when a
    /// resumed game already remembers them as beaten.
    pub fn retire_boss(&mut self, species: &str) -> usize {
        let mut retired = 0;
        for entity in &mut self.entities {
            if entity.boss && entity.species == species && entity.status == EncounterStatus::Idle {
                entity.status = EncounterStatus::Defeated;
                entity.cooldown = 0.0;
                retired += 1;
            }
        }
        retired
    }

    /// `Battle → Idle` with a cooldown that blocks an immediate re-trigger.
    pub fn release(&mut self, id: EntityID, cooldown: f32) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.status == EncounterStatus::Battle => {
                entity.status = EncounterStatus::Idle;
                entity.cooldown = cooldown.max(0.0);
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
