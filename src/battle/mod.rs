//! Turn-based combat.
//!
//! A [`BattleEngine`] is built per encounter and owns everything about the
//! fight: the phase machine, the menu cursor, both combatants' HP, and the
//! animation counters a renderer polls. Phases run
//!
//! ```text
//! intro → player-turn → (enemy-turn → player-turn)* → victory | defeat | escape
//! ```
//!
//! The three terminal phases are absorbing. Reaching one sets the `resolved`
//! latch; nothing mutates the battle after that, including enemy turns that
//! were scheduled earlier and fire late.

pub mod deferred;

use std::fmt;

use rand::{Rng as _, SeedableRng as _};
use rand_chacha::ChaCha8Rng;

use crate::config::EngineConfig;
use crate::creatures::{AnimationDescriptor, AttackDefinition, MonsterInstance, SpeciesRegistry};
use crate::error::ContentError;
use crate::input::Key;

pub use deferred::{BattleId, DeferredAction, DeferredTask, Scheduler};

// ---------------------------------------------------------------------------
// Phases and outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattlePhase {
    Intro,
    PlayerTurn,
    EnemyTurn,
    Victory,
    Defeat,
    Escape,
}

impl BattlePhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Escape)
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Escape,
}

impl BattleOutcome {
    const fn phase(self) -> BattlePhase {
        match self {
            Self::Victory => BattlePhase::Victory,
            Self::Defeat => BattlePhase::Defeat,
            Self::Escape => BattlePhase::Escape,
        }
    }
}

/// Battle pacing, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleTiming {
    pub settle_delay: f32,
    pub enemy_turn_delay: f32,
}

impl Default for BattleTiming {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl BattleTiming {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            settle_delay: config.battle_settle_delay,
            enemy_turn_delay: config.enemy_turn_delay,
        }
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Attack(usize),
    Retreat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuOption {
    pub label: String,
    pub detail: String,
    pub action: MenuAction,
}

// ---------------------------------------------------------------------------
// Combatants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Combatant {
    instance: MonsterInstance,
    name: &'static str,
    attacks: Vec<AttackDefinition>,
    hp: u32,
    attacks_launched: u64,
    hits_landed: u64,
    last_animation: Option<AnimationDescriptor>,
}

impl Combatant {
    fn new(instance: MonsterInstance, registry: &SpeciesRegistry) -> Result<Self, ContentError> {
        let species = registry.require(&instance.species)?;
        if species.attacks.is_empty() {
            return Err(ContentError::NoAttacks(species.id.to_owned()));
        }
        if let Some(bad) = species
            .attacks
            .iter()
            .find(|a| !(0.0..=1.0).contains(&a.success_rate))
        {
            return Err(ContentError::InvalidSuccessRate {
                attack: bad.id.to_owned(),
                rate: bad.success_rate.to_string(),
            });
        }
        Ok(Self {
            hp: instance.max_hp(),
            name: species.name,
            attacks: species.attacks.clone(),
            instance,
            attacks_launched: 0,
            hits_landed: 0,
            last_animation: None,
        })
    }

    fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            species: self.instance.species.clone(),
            name: self.name.to_owned(),
            level: self.instance.stats.level,
            hp: self.hp,
            max_hp: self.instance.max_hp(),
            attacks_launched: self.attacks_launched,
            hits_landed: self.hits_landed,
            last_animation: self.last_animation,
        }
    }
}

/// Read-only view of one side of the fight.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatantSnapshot {
    pub species: String,
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    /// Increments every time this side attacks, hit or miss.
    pub attacks_launched: u64,
    /// Increments every time one of this side's attacks lands.
    pub hits_landed: u64,
    pub last_animation: Option<AnimationDescriptor>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

type CompletionCallback = Box<dyn FnOnce(BattleOutcome)>;

pub struct BattleEngine {
    id: BattleId,
    phase: BattlePhase,
    player: Combatant,
    enemy: Combatant,
    cursor: usize,
    intro_remaining: f32,
    timing: BattleTiming,
    rng: ChaCha8Rng,
    log: Vec<String>,
    resolved: bool,
    outcome: Option<BattleOutcome>,
    outcome_taken: bool,
    on_complete: Option<CompletionCallback>,
    completion_fired: bool,
}

impl fmt::Debug for BattleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleEngine")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("player", &self.player.snapshot())
            .field("enemy", &self.enemy.snapshot())
            .field("resolved", &self.resolved)
            .finish_non_exhaustive()
    }
}

impl BattleEngine {
    /// Start a battle between the player's companion and a fresh instance of
    /// `enemy_species`. Both sides begin at full HP.
    ///
    /// # Errors
    /// Either species is unknown, has no attacks, or has an attack whose
    /// success rate is outside `[0, 1]`.
    pub fn new(
        id: BattleId,
        player: MonsterInstance,
        enemy_species: &str,
        registry: &SpeciesRegistry,
        timing: BattleTiming,
        seed: u64,
    ) -> Result<Self, ContentError> {
        let enemy = Combatant::new(MonsterInstance::new(registry, enemy_species)?, registry)?;
        let player = Combatant::new(player, registry)?;
        log::debug!("battle {id:?}: {} vs {}", player.name, enemy.name);
        let opening = format!("A wild {} appears!", enemy.name);
        Ok(Self {
            id,
            phase: BattlePhase::Intro,
            player,
            enemy,
            cursor: 0,
            intro_remaining: timing.settle_delay,
            timing,
            rng: ChaCha8Rng::seed_from_u64(seed),
            log: vec![opening],
            resolved: false,
            outcome: None,
            outcome_taken: false,
            on_complete: None,
            completion_fired: false,
        })
    }

    pub fn id(&self) -> BattleId {
        self.id
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn player_snapshot(&self) -> CombatantSnapshot {
        self.player.snapshot()
    }

    pub fn enemy_snapshot(&self) -> CombatantSnapshot {
        self.enemy.snapshot()
    }

    /// The player's companion as it stands in this battle.
    pub fn player_instance(&self) -> &MonsterInstance {
        &self.player.instance
    }

    /// One entry per attack, then "Retreat".
    pub fn menu_options(&self) -> Vec<MenuOption> {
        let mut options: Vec<MenuOption> = self
            .player
            .attacks
            .iter()
            .enumerate()
            .map(|(index, attack)| MenuOption {
                label: attack.name.to_owned(),
                detail: format!(
                    "{} dmg, {:.0}% hit",
                    attack.damage,
                    attack.success_rate * 100.0
                ),
                action: MenuAction::Attack(index),
            })
            .collect();
        options.push(MenuOption {
            label: "Retreat".to_owned(),
            detail: "Leave the fight".to_owned(),
            action: MenuAction::Retreat,
        });
        options
    }

    fn menu_len(&self) -> usize {
        self.player.attacks.len() + 1
    }

    /// Register the completion callback. At most one callback ever runs: the
    /// one registered when the battle first reaches a terminal phase, or one
    /// registered afterwards if none has run yet. Registering again replaces
    /// a callback that has not run.
    pub fn on_complete(&mut self, callback: impl FnOnce(BattleOutcome) + 'static) {
        match self.outcome {
            Some(outcome) => {
                if !self.completion_fired {
                    self.completion_fired = true;
                    callback(outcome);
                }
            }
            None => self.on_complete = Some(Box::new(callback)),
        }
    }

    /// How the battle ended, once it has.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    /// The terminal outcome, handed out exactly once.
    pub fn take_outcome(&mut self) -> Option<BattleOutcome> {
        if self.outcome_taken {
            return None;
        }
        self.outcome_taken = self.outcome.is_some();
        self.outcome
    }

    /// Advance the intro settle timer.
    pub fn update(&mut self, dt: f32) {
        if self.phase != BattlePhase::Intro {
            return;
        }
        self.intro_remaining -= dt;
        if self.intro_remaining <= 0.0 {
            self.phase = BattlePhase::PlayerTurn;
            log::debug!("battle {:?}: player turn", self.id);
            self.log
                .push(format!("What will {} do?", self.player.name));
        }
    }

    /// Menu input. Anything outside the player's turn is ignored, except
    /// `Cancel` during the enemy's turn, which retreats before the enemy acts.
    pub fn handle_input(&mut self, key: Key, scheduler: &mut Scheduler) {
        match (self.phase, key) {
            (BattlePhase::PlayerTurn, Key::Up | Key::Left) => {
                let len = self.menu_len();
                self.cursor = (self.cursor + len - 1) % len;
            }
            (BattlePhase::PlayerTurn, Key::Down | Key::Right) => {
                self.cursor = (self.cursor + 1) % self.menu_len();
            }
            (BattlePhase::PlayerTurn, Key::Confirm) => self.select(self.cursor, scheduler),
            (BattlePhase::PlayerTurn | BattlePhase::EnemyTurn, Key::Cancel) => self.retreat(),
            _ => {}
        }
    }

    /// Choose the menu entry at `index` directly.
    pub fn select(&mut self, index: usize, scheduler: &mut Scheduler) {
        if self.phase != BattlePhase::PlayerTurn {
            return;
        }
        let action = if index < self.player.attacks.len() {
            MenuAction::Attack(index)
        } else if index == self.player.attacks.len() {
            MenuAction::Retreat
        } else {
            return;
        };
        self.cursor = index;

        match action {
            MenuAction::Retreat => self.retreat(),
            MenuAction::Attack(index) => {
                let Some(attack) = self.player.attacks.get(index).cloned() else {
                    return;
                };
                strike(
                    &mut self.rng,
                    &mut self.log,
                    &mut self.player,
                    &mut self.enemy,
                    &attack,
                );
                if self.enemy.hp == 0 {
                    self.finish(BattleOutcome::Victory);
                } else {
                    self.phase = BattlePhase::EnemyTurn;
                    let delay = self.timing.enemy_turn_delay;
                    scheduler.schedule(self.id, DeferredAction::EnemyTurn, delay);
                }
            }
        }
    }

    fn retreat(&mut self) {
        if self.resolved {
            return;
        }
        self.log.push(format!("{} retreats.", self.player.name));
        self.finish(BattleOutcome::Escape);
    }

    /// Run a deferred enemy turn. Returns `false` without touching anything
    /// when the task belongs to another battle, this battle is already
    /// resolved, or it is not the enemy's turn.
    pub fn resolve_enemy_turn(&mut self, task: &DeferredTask) -> bool {
        if task.owner != self.id
            || task.action != DeferredAction::EnemyTurn
            || self.resolved
            || self.phase != BattlePhase::EnemyTurn
        {
            log::debug!("battle {:?}: ignoring stale {task:?}", self.id);
            return false;
        }

        let index = self.rng.gen_range(0..self.enemy.attacks.len());
        let Some(attack) = self.enemy.attacks.get(index).cloned() else {
            return false;
        };
        strike(
            &mut self.rng,
            &mut self.log,
            &mut self.enemy,
            &mut self.player,
            &attack,
        );
        if self.player.hp == 0 {
            self.finish(BattleOutcome::Defeat);
        } else {
            self.phase = BattlePhase::PlayerTurn;
        }
        true
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        if self.resolved {
            return;
        }
        self.resolved = true;
        self.phase = outcome.phase();
        self.outcome = Some(outcome);
        self.log.push(
            match outcome {
                BattleOutcome::Victory => format!("{} is defeated!", self.enemy.name),
                BattleOutcome::Defeat => format!("{} can no longer fight.", self.player.name),
                BattleOutcome::Escape => "You got away safely.".to_owned(),
            },
        );
        log::info!("battle {:?} ended: {outcome:?}", self.id);
        if let Some(callback) = self.on_complete.take() {
            self.completion_fired = true;
            callback(outcome);
        }
    }
}

/// One attack: a Bernoulli roll, then damage floored at zero on a hit.
fn strike(
    rng: &mut ChaCha8Rng,
    log: &mut Vec<String>,
    attacker: &mut Combatant,
    defender: &mut Combatant,
    attack: &AttackDefinition,
) {
    attacker.attacks_launched += 1;
    attacker.last_animation = Some(attack.animation);
    if rng.gen_bool(attack.success_rate) {
        defender.hp = defender.hp.saturating_sub(attack.damage);
        attacker.hits_landed += 1;
        log.push(format!(
            "{} uses {} and deals {} damage.",
            attacker.name, attack.name, attack.damage
        ));
    } else {
        log.push(format!("{} uses {}, but it misses.", attacker.name, attack.name));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
