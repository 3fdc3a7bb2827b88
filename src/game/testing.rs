//! Shared fixture for scene tests.

use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;

use crate::battle::Scheduler;
use crate::config::EngineConfig;
use crate::creatures::{
    AnimationDescriptor, AnimationEffect, AttackDefinition, MonsterInstance, SpeciesDefinition,
    SpeciesRegistry, Stats,
};
use crate::game::scene::SceneContext;
use crate::game::state::{GameState, create_initial_state};

pub struct Fixture {
    pub config: EngineConfig,
    pub registry: SpeciesRegistry,
    pub state: GameState,
    pub scheduler: Scheduler,
    pub rng: ChaCha8Rng,
}

impl Fixture {
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self {
            registry: SpeciesRegistry::builtin().expect("bestiary validates"),
            state: create_initial_state(&config),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            scheduler: Scheduler::new(),
        }
    }

    pub fn with_companion(species: &str) -> Self {
        let mut fixture = Self::new();
        fixture.state.player.companion =
            Some(MonsterInstance::new(&fixture.registry, species).expect("known species"));
        fixture
    }

    /// Companion `titan` (level 1, no evolutions) whose only attack always
    /// lands for 500 damage.
    pub fn with_titan() -> Self {
        let mut fixture = Self::new();
        fixture.registry.register(SpeciesDefinition {
            id: "titan",
            name: "Titan",
            description: "",
            color: "#ffffff",
            base_stats: Stats::new(1, 9, 20, 9, 9),
            attacks: vec![AttackDefinition {
                id: "quake",
                name: "Quake",
                damage: 500,
                success_rate: 1.0,
                description: "",
                animation: AnimationDescriptor {
                    effect: AnimationEffect::Burst,
                    color: "#ffffff",
                    secondary: "#ffffff",
                    duration: 0.3,
                },
            }],
            evolutions: Vec::new(),
        });
        fixture.state.player.companion =
            Some(MonsterInstance::new(&fixture.registry, "titan").expect("just registered"));
        fixture
    }

    pub fn ctx(&mut self) -> SceneContext<'_> {
        SceneContext {
            state: &mut self.state,
            registry: &self.registry,
            config: &self.config,
            scheduler: &mut self.scheduler,
            rng: &mut self.rng,
        }
    }
}
