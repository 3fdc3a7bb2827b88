//! Companion hunger.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::creatures::StatKind;
use crate::game::state::GameState;
use crate::items::{self, ItemKind};

pub const MAX_HUNGER: u32 = 100;

/// At or below this the companion starts asking for food.
pub const CRITICAL_HUNGER: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub hunger: u32,
    #[serde(default)]
    timer: f32,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            hunger: MAX_HUNGER,
            timer: 0.0,
        }
    }
}

impl Needs {
    pub fn restore(&mut self, amount: u32) {
        self.hunger = self.hunger.saturating_add(amount).min(MAX_HUNGER);
    }

    pub fn is_critical(&self) -> bool {
        self.hunger <= CRITICAL_HUNGER
    }
}

/// Let hunger decay with time. Does nothing before a companion is chosen.
pub fn update_needs(state: &mut GameState, dt: f32, config: &EngineConfig) {
    if state.player.companion.is_none() {
        return;
    }
    let needs = &mut state.player.needs;
    needs.timer += dt;
    if needs.timer < config.hunger_interval {
        return;
    }
    needs.timer = 0.0;
    needs.hunger = needs.hunger.saturating_sub(config.hunger_decrease);
    if needs.hunger == 0 {
        state.log.push("Your companion is starving and out of energy!");
    } else if needs.is_critical() {
        state.log.push("Your companion is asking for food.");
    }
}

/// Feed one of a food item from the inventory.
pub fn feed(state: &mut GameState, item_id: &str) -> bool {
    let Some(item) = items::find(item_id) else {
        return false;
    };
    let ItemKind::Food { hunger_restore } = item.kind else {
        return false;
    };
    if !state.player.inventory.remove(item_id, 1) {
        state.log.push(format!("You have no {} left.", item.name));
        return false;
    }
    state.player.needs.restore(hunger_restore);
    state
        .log
        .push(format!("{} eases your companion's hunger.", item.name));
    true
}

/// Spend hunger to raise one companion stat.
pub fn train(state: &mut GameState, stat: StatKind, amount: u32, hunger_cost: u32) -> bool {
    let Some(companion) = state.player.companion.as_mut() else {
        state.log.push("You need a companion to train.");
        return false;
    };
    if state.player.needs.hunger < hunger_cost {
        state.log.push("Your companion is too hungry to keep going.");
        return false;
    }
    state.player.needs.hunger -= hunger_cost;
    let value = companion.stats.get_mut(stat);
    *value = value.saturating_add(amount);
    let total = *value;
    state
        .log
        .push(format!("Training pays off: {} is now {total}.", stat.label()));
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
