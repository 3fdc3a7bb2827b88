//! Experience, stat growth and evolution.

use crate::config::EvolutionPolicy;
use crate::creatures::{MonsterInstance, SpeciesRegistry, Stats};
use crate::error::ContentError;

/// Growth per point of experience, in tenths, rounded up per stat.
const POWER_GROWTH: u32 = 8;
const DEFENSE_GROWTH: u32 = 6;
const SPEED_GROWTH: u32 = 7;
const MORALE_GROWTH: u32 = 9;

fn growth(xp: u32, tenths: u32) -> u32 {
    let grown = (u64::from(xp) * u64::from(tenths)).div_ceil(10);
    u32::try_from(grown).unwrap_or(u32::MAX)
}

fn grow(stats: &mut Stats, xp: u32) {
    stats.level = stats.level.saturating_add(xp);
    stats.power = stats.power.saturating_add(growth(xp, POWER_GROWTH));
    stats.defense = stats.defense.saturating_add(growth(xp, DEFENSE_GROWTH));
    stats.speed = stats.speed.saturating_add(growth(xp, SPEED_GROWTH));
    stats.morale = stats.morale.saturating_add(growth(xp, MORALE_GROWTH));
}

/// Grant `xp` to `instance`, then evolve it according to `policy`.
///
/// Stats grow first, then the current species' evolution rules are checked
/// in declaration order. An evolution swaps the species id and re-bases the
/// stats on the new species while keeping the accumulated level. Under
/// [`EvolutionPolicy::Fixpoint`] the check repeats against each new species
/// until nothing matches or a species would be visited twice.
///
/// Returns the lines to show the player. The instance is only written once
/// everything has resolved.
///
/// # Errors
/// A species or evolution target missing from `registry`. The instance is
/// left untouched in that case.
pub fn apply_experience(
    instance: &mut MonsterInstance,
    xp: u32,
    registry: &SpeciesRegistry,
    policy: EvolutionPolicy,
) -> Result<Vec<String>, ContentError> {
    let mut next = instance.clone();
    let current = registry.require(&next.species)?;
    let mut messages = vec![format!("{} gains {xp} experience!", current.name)];
    grow(&mut next.stats, xp);

    let mut visited = vec![current.id];
    loop {
        let definition = registry.require(&next.species)?;
        let Some(rule) = definition.first_evolution(&next.stats) else {
            break;
        };
        let target = registry
            .get(rule.target)
            .ok_or_else(|| ContentError::UnknownEvolutionTarget {
                species: definition.id.to_owned(),
                target: rule.target.to_owned(),
            })?;

        log::debug!("{} evolves into {}", definition.id, target.id);
        next.species = target.id.to_owned();
        next.stats = Stats {
            level: next.stats.level,
            ..target.base_stats
        };
        messages.push(format!("Evolution! {} joins your team.", target.name));

        if policy == EvolutionPolicy::Once || visited.contains(&target.id) {
            break;
        }
        visited.push(target.id);
    }

    *instance = next;
    Ok(messages)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creatures::{
        AnimationDescriptor, AnimationEffect, AttackDefinition, EvolutionRule, SpeciesDefinition,
    };

    fn species(id: &'static str, base: Stats, evolutions: Vec<EvolutionRule>) -> SpeciesDefinition {
        SpeciesDefinition {
            id,
            name: id,
            description: "",
            color: "#ffffff",
            base_stats: base,
            attacks: vec![AttackDefinition {
                id: "tap",
                name: "Tap",
                damage: 1,
                success_rate: 1.0,
                description: "",
                animation: AnimationDescriptor {
                    effect: AnimationEffect::Pulse,
                    color: "#ffffff",
                    secondary: "#ffffff",
                    duration: 0.1,
                },
            }],
            evolutions,
        }
    }

    fn rule(target: &'static str, requirement: fn(&Stats) -> bool) -> EvolutionRule {
        EvolutionRule {
            target,
            requirement,
            description: "",
        }
    }

    /// `egg → chick → hen`, each step gated on level 3.
    fn chain() -> SpeciesRegistry {
        let mut registry = SpeciesRegistry::new();
        let grown = |s: &Stats| s.level >= 3;
        registry.register(species("egg", Stats::new(1, 1, 1, 1, 1), vec![rule("chick", grown)]));
        registry.register(species("chick", Stats::new(1, 2, 2, 2, 2), vec![rule("hen", grown)]));
        registry.register(species("hen", Stats::new(1, 3, 3, 3, 3), Vec::new()));
        registry
    }

    // -- growth --------------------------------------------------------------

    #[test]
    fn growth_is_ceiling_rounded_per_stat() {
        let registry = SpeciesRegistry::builtin().expect("bestiary validates");
        let mut sproutle = MonsterInstance::new(&registry, "sproutle").expect("known");
        assert_eq!(sproutle.max_hp(), 20);

        let messages = apply_experience(&mut sproutle, 2, &registry, EvolutionPolicy::Once)
            .expect("valid content");
        assert_eq!(sproutle.species, "sproutle");
        assert_eq!(sproutle.stats, Stats::new(3, 8, 6, 7, 7));
        assert_eq!(sproutle.max_hp(), 24);
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn huge_grants_grow_fully_then_saturate() {
        let registry = chain();
        let mut hen = MonsterInstance::new(&registry, "hen").expect("known");
        apply_experience(&mut hen, u32::MAX, &registry, EvolutionPolicy::Once)
            .expect("valid content");
        assert_eq!(hen.stats.power, 3 + 3_435_973_836);
        assert_eq!(hen.stats.defense, 3 + 2_576_980_377);

        apply_experience(&mut hen, u32::MAX, &registry, EvolutionPolicy::Once)
            .expect("valid content");
        assert_eq!(hen.stats, Stats::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX, u32::MAX));
        assert_eq!(hen.max_hp(), u32::MAX);
    }

    #[test]
    fn zero_experience_changes_nothing() {
        let registry = SpeciesRegistry::builtin().expect("bestiary validates");
        let mut tidebble = MonsterInstance::new(&registry, "tidebble").expect("known");
        let before = tidebble.clone();
        apply_experience(&mut tidebble, 0, &registry, EvolutionPolicy::Once)
            .expect("valid content");
        assert_eq!(tidebble, before);
    }

    // -- evolution -----------------------------------------------------------

    #[test]
    fn first_matching_rule_wins_and_level_carries() {
        let registry = SpeciesRegistry::builtin().expect("bestiary validates");
        let mut sproutle = MonsterInstance::new(&registry, "sproutle").expect("known");
        // Both power and speed thresholds will be crossed; power is declared first.
        sproutle.stats.power = 11;
        sproutle.stats.speed = 11;
        let messages = apply_experience(&mut sproutle, 2, &registry, EvolutionPolicy::Once)
            .expect("valid content");
        assert_eq!(sproutle.species, "bloomtail");
        assert_eq!(
            sproutle.stats,
            Stats {
                level: 3,
                ..Stats::new(5, 13, 9, 12, 8)
            }
        );
        assert_eq!(sproutle.max_hp(), 12 + 9 * 2);
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn once_policy_evolves_a_single_step() {
        let registry = chain();
        let mut egg = MonsterInstance::new(&registry, "egg").expect("known");
        apply_experience(&mut egg, 2, &registry, EvolutionPolicy::Once).expect("valid content");
        assert_eq!(egg.species, "chick");
        assert_eq!(egg.stats.level, 3);
    }

    #[test]
    fn fixpoint_policy_follows_the_chain() {
        let registry = chain();
        let mut egg = MonsterInstance::new(&registry, "egg").expect("known");
        let messages = apply_experience(&mut egg, 2, &registry, EvolutionPolicy::Fixpoint)
            .expect("valid content");
        assert_eq!(egg.species, "hen");
        assert_eq!(egg.stats, Stats::new(3, 3, 3, 3, 3));
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn fixpoint_terminates_on_cycles() {
        let mut registry = SpeciesRegistry::new();
        registry.register(species("day", Stats::new(1, 1, 1, 1, 1), vec![rule("night", |_| true)]));
        registry.register(species("night", Stats::new(1, 1, 1, 1, 1), vec![rule("day", |_| true)]));
        let mut day = MonsterInstance::new(&registry, "day").expect("known");
        apply_experience(&mut day, 1, &registry, EvolutionPolicy::Fixpoint).expect("valid content");
        assert_eq!(day.species, "day");
    }

    #[test]
    fn missing_target_leaves_instance_untouched() {
        let mut registry = SpeciesRegistry::new();
        let definition = species("orphan", Stats::new(1, 1, 1, 1, 1), vec![rule("ghost", |_| true)]);
        registry.register(definition);
        let mut orphan = MonsterInstance::new(&registry, "orphan").expect("known");
        let before = orphan.clone();
        let err = apply_experience(&mut orphan, 5, &registry, EvolutionPolicy::Once)
            .expect_err("target missing");
        assert!(matches!(err, ContentError::UnknownEvolutionTarget { .. }));
        assert_eq!(orphan, before);
    }
}
