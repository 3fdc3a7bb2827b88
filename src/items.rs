//! Item catalog and the player's inventory ledger.

use serde::{Deserialize, Serialize};

use crate::creatures::StatKind;
use crate::game::state::GameState;
use crate::needs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Restores hunger when used.
    Food { hunger_restore: u32 },
    /// Permanently raises one companion stat when used.
    Boost { stat: StatKind, amount: u32 },
    /// Only meaningful to a quest; cannot be used.
    Quest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ItemKind,
}

pub const CATALOG: [ItemDefinition; 5] = [
    ItemDefinition {
        id: "meat",
        name: "Hearty Meat",
        description: "A filling meal for your companion.",
        kind: ItemKind::Food { hunger_restore: 35 },
    },
    ItemDefinition {
        id: "fruit",
        name: "Lumina Fruit",
        description: "A bright fruit with a restorative tang.",
        kind: ItemKind::Food { hunger_restore: 20 },
    },
    ItemDefinition {
        id: "tonic",
        name: "Sparkling Tonic",
        description: "Quickens your companion a little.",
        kind: ItemKind::Boost {
            stat: StatKind::Speed,
            amount: 1,
        },
    },
    ItemDefinition {
        id: "emberCore",
        name: "Ember Core",
        description: "A smouldering core, still warm to the touch.",
        kind: ItemKind::Quest,
    },
    ItemDefinition {
        id: "dewPetal",
        name: "Dew Petal",
        description: "A translucent petal soaked in morning magic.",
        kind: ItemKind::Quest,
    },
];

pub fn find(id: &str) -> Option<&'static ItemDefinition> {
    CATALOG.iter().find(|item| item.id == id)
}

/// Display name, falling back to the raw id.
pub fn display_name(id: &str) -> &str {
    find(id).map_or(id, |item| item.name)
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub item_id: String,
    pub quantity: u32,
}

/// Ordered item stacks. Every stored quantity is positive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<InventoryEntry>", into = "Vec<InventoryEntry>")]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
}

/// Loaded stacks are merged by id and empty ones dropped.
impl From<Vec<InventoryEntry>> for Inventory {
    fn from(entries: Vec<InventoryEntry>) -> Self {
        let mut inventory = Self::new();
        for entry in entries {
            inventory.add(&entry.item_id, entry.quantity);
        }
        inventory
    }
}

impl From<Inventory> for Vec<InventoryEntry> {
    fn from(inventory: Inventory) -> Self {
        inventory.entries
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` of an item, stacking onto an existing entry.
    pub fn add(&mut self, item_id: &str, amount: u32) {
        if amount == 0 {
            return;
        }
        match self.entries.iter_mut().find(|e| e.item_id == item_id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(amount),
            None => self.entries.push(InventoryEntry {
                item_id: item_id.to_owned(),
                quantity: amount,
            }),
        }
    }

    /// Remove `amount` of an item. Returns `false` and changes nothing when
    /// fewer than `amount` are held.
    pub fn remove(&mut self, item_id: &str, amount: u32) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.item_id == item_id) else {
            return false;
        };
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        if entry.quantity < amount {
            return false;
        }
        entry.quantity -= amount;
        if entry.quantity == 0 {
            self.entries.remove(index);
        }
        true
    }

    pub fn quantity(&self, item_id: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.item_id == item_id)
            .map_or(0, |e| e.quantity)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.quantity(item_id) > 0
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&InventoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Using items
// ---------------------------------------------------------------------------

/// Use one of an item from the inventory. Food feeds the companion, boosts
/// raise a stat, quest items are refused. Returns whether anything happened;
/// a line explaining the result is logged either way.
pub fn use_item(state: &mut GameState, item_id: &str) -> bool {
    let Some(item) = find(item_id) else {
        log::warn!("tried to use unknown item `{item_id}`");
        state.log.push("Nothing happens.");
        return false;
    };
    if !state.player.inventory.contains(item_id) {
        state.log.push(format!("You have no {} left.", item.name));
        return false;
    }

    match item.kind {
        ItemKind::Food { .. } => needs::feed(state, item_id),
        ItemKind::Boost { stat, amount } => {
            let Some(companion) = state.player.companion.as_mut() else {
                state.log.push("You need a companion to use that.");
                return false;
            };
            if !state.player.inventory.remove(item_id, 1) {
                return false;
            }
            let value = companion.stats.get_mut(stat);
            *value = value.saturating_add(amount);
            state
                .log
                .push(format!("{} raises {} by {amount}.", item.name, stat.label()));
            true
        }
        ItemKind::Quest => {
            state
                .log
                .push(format!("{} is meant for someone else.", item.name));
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::creatures::{MonsterInstance, SpeciesRegistry};
    use crate::game::state::create_initial_state;

    // -- inventory -----------------------------------------------------------

    #[test]
    fn add_stacks_in_insertion_order() {
        let mut inventory = Inventory::new();
        inventory.add("meat", 1);
        inventory.add("fruit", 2);
        inventory.add("meat", 2);
        inventory.add("tonic", 0);
        let ids: Vec<_> = inventory.entries().iter().map(|e| e.item_id.as_str()).collect();
        assert_eq!(ids, ["meat", "fruit"]);
        assert_eq!(inventory.quantity("meat"), 3);
        assert!(!inventory.contains("tonic"));
    }

    #[test]
    fn remove_drops_empty_entries() {
        let mut inventory = Inventory::new();
        inventory.add("meat", 2);
        assert!(inventory.remove("meat", 2));
        assert!(inventory.is_empty());
    }

    #[test]
    fn insufficient_remove_is_a_noop() {
        let mut inventory = Inventory::new();
        inventory.add("meat", 1);
        let before = inventory.clone();
        assert!(!inventory.remove("meat", 2));
        assert!(!inventory.remove("fruit", 1));
        assert_eq!(inventory, before);
    }

    #[test]
    fn loaded_inventory_drops_empty_stacks() {
        let json = r#"[
            {"item_id":"meat","quantity":0},
            {"item_id":"fruit","quantity":2},
            {"item_id":"fruit","quantity":1}
        ]"#;
        let inventory: Inventory = serde_json::from_str(json).expect("deserializable");
        assert_eq!(
            inventory.entries(),
            [InventoryEntry {
                item_id: "fruit".to_owned(),
                quantity: 3,
            }]
        );
        assert_eq!(
            serde_json::to_string(&inventory).expect("serializable"),
            r#"[{"item_id":"fruit","quantity":3}]"#
        );
    }

    // -- use_item ------------------------------------------------------------

    fn state_with_companion() -> GameState {
        let registry = SpeciesRegistry::builtin().expect("bestiary validates");
        let mut state = create_initial_state(&EngineConfig::default());
        state.player.companion = Some(MonsterInstance::new(&registry, "sproutle").expect("known"));
        state
    }

    #[test]
    fn boost_raises_stat_and_consumes_item() {
        let mut state = state_with_companion();
        state.player.inventory.add("tonic", 1);
        assert!(use_item(&mut state, "tonic"));
        assert_eq!(state.player.companion.as_ref().map(|c| c.stats.speed), Some(6));
        assert!(!state.player.inventory.contains("tonic"));
    }

    #[test]
    fn quest_items_are_refused() {
        let mut state = state_with_companion();
        state.player.inventory.add("emberCore", 1);
        assert!(!use_item(&mut state, "emberCore"));
        assert_eq!(state.player.inventory.quantity("emberCore"), 1);
        assert!(state.log.lines().last().is_some_and(|l| l.contains("someone else")));
    }

    #[test]
    fn boost_without_companion_keeps_item() {
        let mut state = create_initial_state(&EngineConfig::default());
        state.player.inventory.add("tonic", 1);
        assert!(!use_item(&mut state, "tonic"));
        assert_eq!(state.player.inventory.quantity("tonic"), 1);
    }
}
