//! Species templates, the species registry, and creature instances.
//!
//! Species form a directed graph through their evolution rules. The graph is
//! stored flat: every edge names its target by id and is resolved through the
//! [`SpeciesRegistry`] when an evolution actually happens, so forward
//! references and cycles need no special handling.

pub mod bestiary;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub level: u32,
    pub power: u32,
    pub defense: u32,
    pub speed: u32,
    pub morale: u32,
}

impl Stats {
    pub const fn new(level: u32, power: u32, defense: u32, speed: u32, morale: u32) -> Self {
        Self {
            level,
            power,
            defense,
            speed,
            morale,
        }
    }

    /// Derived from defense every time so it follows evolutions and boosts.
    pub const fn max_hp(&self) -> u32 {
        self.defense.saturating_mul(2).saturating_add(12)
    }

    /// Mutable access to one trainable stat.
    pub fn get_mut(&mut self, stat: StatKind) -> &mut u32 {
        match stat {
            StatKind::Power => &mut self.power,
            StatKind::Defense => &mut self.defense,
            StatKind::Speed => &mut self.speed,
            StatKind::Morale => &mut self.morale,
        }
    }
}

/// The four stats that items, training and rewards can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    Power,
    Defense,
    Speed,
    Morale,
}

impl StatKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Defense => "defense",
            Self::Speed => "speed",
            Self::Morale => "morale",
        }
    }
}

// ---------------------------------------------------------------------------
// Attacks
// ---------------------------------------------------------------------------

/// Shape of the one-shot effect a renderer plays for an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationEffect {
    Slash,
    Burst,
    Beam,
    Ring,
    Wave,
    Thorn,
    Dash,
    Spark,
    Quake,
    Wind,
    Pulse,
    Meteor,
}

/// Cosmetic description of an attack. The simulation never reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDescriptor {
    pub effect: AnimationEffect,
    /// `#rrggbb`
    pub color: &'static str,
    pub secondary: &'static str,
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub damage: u32,
    /// Probability in `[0, 1]` that the attack lands.
    pub success_rate: f64,
    pub description: &'static str,
    pub animation: AnimationDescriptor,
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// One outgoing edge of the evolution graph.
#[derive(Debug, Clone)]
pub struct EvolutionRule {
    pub target: &'static str,
    pub requirement: fn(&Stats) -> bool,
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct SpeciesDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Body colour, `#rrggbb`.
    pub color: &'static str,
    pub base_stats: Stats,
    pub attacks: Vec<AttackDefinition>,
    /// Checked in declaration order.
    pub evolutions: Vec<EvolutionRule>,
}

impl SpeciesDefinition {
    /// First evolution rule whose requirement holds for `stats`.
    pub fn first_evolution(&self, stats: &Stats) -> Option<&EvolutionRule> {
        self.evolutions.iter().find(|rule| (rule.requirement)(stats))
    }
}

/// Read-only table of species keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SpeciesRegistry {
    species: Vec<SpeciesDefinition>,
    index: FxHashMap<&'static str, usize>,
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in bestiary, already validated.
    ///
    /// # Errors
    /// Returns the first content problem found in the bestiary.
    pub fn builtin() -> Result<Self, ContentError> {
        let mut registry = Self::new();
        for species in bestiary::all() {
            registry.register(species);
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Add or replace a species. Evolution targets may name species that
    /// are registered later; [`validate`](Self::validate) checks them.
    pub fn register(&mut self, species: SpeciesDefinition) {
        match self.index.get(species.id) {
            Some(&slot) => {
                if let Some(existing) = self.species.get_mut(slot) {
                    *existing = species;
                }
            }
            None => {
                self.index.insert(species.id, self.species.len());
                self.species.push(species);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&SpeciesDefinition> {
        self.index.get(id).and_then(|&slot| self.species.get(slot))
    }

    /// Like [`get`](Self::get) but an unknown id is a content error.
    ///
    /// # Errors
    /// [`ContentError::UnknownSpecies`] when `id` is not registered.
    pub fn require(&self, id: &str) -> Result<&SpeciesDefinition, ContentError> {
        self.get(id)
            .ok_or_else(|| ContentError::UnknownSpecies(id.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesDefinition> {
        self.species.iter()
    }

    /// Check that every evolution target resolves and every attack is usable.
    ///
    /// # Errors
    /// The first problem found, in registration order.
    pub fn validate(&self) -> Result<(), ContentError> {
        for species in &self.species {
            if species.attacks.is_empty() {
                return Err(ContentError::NoAttacks(species.id.to_owned()));
            }
            for attack in &species.attacks {
                if !(0.0..=1.0).contains(&attack.success_rate) {
                    return Err(ContentError::InvalidSuccessRate {
                        attack: attack.id.to_owned(),
                        rate: attack.success_rate.to_string(),
                    });
                }
            }
            for rule in &species.evolutions {
                if self.get(rule.target).is_none() {
                    return Err(ContentError::UnknownEvolutionTarget {
                        species: species.id.to_owned(),
                        target: rule.target.to_owned(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

/// A creature in play. Holds its species by id and owns its stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterInstance {
    pub species: String,
    pub stats: Stats,
}

impl MonsterInstance {
    /// A fresh instance at the species' base stats.
    ///
    /// # Errors
    /// [`ContentError::UnknownSpecies`] when `species` is not registered.
    pub fn new(registry: &SpeciesRegistry, species: &str) -> Result<Self, ContentError> {
        let definition = registry.require(species)?;
        Ok(Self {
            species: definition.id.to_owned(),
            stats: definition.base_stats,
        })
    }

    pub const fn max_hp(&self) -> u32 {
        self.stats.max_hp()
    }

    pub fn definition<'r>(&self, registry: &'r SpeciesRegistry) -> Option<&'r SpeciesDefinition> {
        registry.get(&self.species)
    }

    /// Display name, falling back to the raw id for unknown species.
    pub fn name<'a>(&'a self, registry: &'a SpeciesRegistry) -> &'a str {
        self.definition(registry)
            .map_or(self.species.as_str(), |definition| definition.name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
