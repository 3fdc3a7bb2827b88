//! Quest catalog and progress bookkeeping.
//!
//! Status only ever moves forward: `Available → Active → Completed`.
//! Completion pays the reward in the same call that flips the status, and a
//! quest that is already completed never pays again.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::creatures::StatKind;
use crate::error::ContentError;
use crate::game::scene::SceneId;
use crate::game::state::GameState;
use crate::items;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestStatus {
    Available,
    Active,
    Completed,
}

impl QuestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Active => "in progress",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestGoal {
    /// Defeat every listed boss species.
    Defeat(&'static [&'static str]),
    /// Hand over one of an item.
    Deliver(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuestReward {
    pub item: Option<&'static str>,
    pub gold: u32,
    pub hunger: u32,
    pub stats: &'static [(StatKind, u32)],
    pub unlock: Option<SceneId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub goal: QuestGoal,
    pub reward: QuestReward,
}

pub const CATALOG: [QuestDefinition; 3] = [
    QuestDefinition {
        id: "emberGuardian",
        title: "Ember Guardian",
        description: "Defeat Brasemire in the ember clearing.",
        goal: QuestGoal::Defeat(&["brasemire"]),
        reward: QuestReward {
            item: Some("tonic"),
            gold: 30,
            hunger: 0,
            stats: &[(StatKind::Morale, 1)],
            unlock: Some(SceneId::WildGorge),
        },
    },
    QuestDefinition {
        id: "twinFangs",
        title: "Twin Fangs",
        description: "Defeat both pack leaders of the azure gorge.",
        goal: QuestGoal::Defeat(&["azureAlpha", "azureOmega"]),
        reward: QuestReward {
            item: Some("meat"),
            gold: 60,
            hunger: 0,
            stats: &[(StatKind::Power, 1), (StatKind::Defense, 1)],
            unlock: None,
        },
    },
    QuestDefinition {
        id: "riverOffering",
        title: "River Offering",
        description: "Bring a dew petal to Mira.",
        goal: QuestGoal::Deliver("dewPetal"),
        reward: QuestReward {
            item: None,
            gold: 20,
            hunger: 50,
            stats: &[],
            unlock: None,
        },
    },
];

pub fn definition(id: &str) -> Option<&'static QuestDefinition> {
    CATALOG.iter().find(|quest| quest.id == id)
}

fn require(id: &str) -> Result<&'static QuestDefinition, ContentError> {
    definition(id).ok_or_else(|| ContentError::UnknownQuest(id.to_owned()))
}

/// Mutable completion record of one quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub id: String,
    pub status: QuestStatus,
    /// Boss targets already defeated, recorded even before activation.
    #[serde(default)]
    pub completed_targets: BTreeSet<String>,
    /// Whether a delivery goal has been handed over.
    #[serde(default)]
    pub delivered: bool,
}

impl QuestProgress {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            status: QuestStatus::Available,
            completed_targets: BTreeSet::new(),
            delivered: false,
        }
    }

    fn requirement_met(&self, goal: QuestGoal) -> bool {
        match goal {
            QuestGoal::Defeat(targets) => targets
                .iter()
                .all(|target| self.completed_targets.contains(*target)),
            QuestGoal::Deliver(_) => self.delivered,
        }
    }
}

/// Status of a quest; untracked quests are available.
pub fn status(state: &GameState, id: &str) -> QuestStatus {
    progress(state, id).map_or(QuestStatus::Available, |p| p.status)
}

pub fn progress<'a>(state: &'a GameState, id: &str) -> Option<&'a QuestProgress> {
    state.quests.iter().find(|p| p.id == id)
}

#[expect(clippy::indexing_slicing, reason = "index was just found or pushed")]
fn progress_mut<'a>(state: &'a mut GameState, id: &str) -> &'a mut QuestProgress {
    let index = match state.quests.iter().position(|p| p.id == id) {
        Some(index) => index,
        None => {
            state.quests.push(QuestProgress::new(id));
            state.quests.len() - 1
        }
    };
    &mut state.quests[index]
}

/// Accept a quest. Completes it on the spot if its requirement is already
/// met. Returns `true` if the quest was newly activated.
///
/// # Errors
/// [`ContentError::UnknownQuest`] for an id missing from the catalog.
pub fn activate_quest(state: &mut GameState, id: &str) -> Result<bool, ContentError> {
    let quest = require(id)?;
    let progress = progress_mut(state, id);
    if progress.status != QuestStatus::Available {
        return Ok(false);
    }
    progress.status = QuestStatus::Active;
    let ready = progress.requirement_met(quest.goal);
    log::debug!("quest {id} activated");
    state.log.push(format!("Quest accepted: {}", quest.title));
    if ready {
        complete_quest(state, id)?;
    }
    Ok(true)
}

/// Complete a quest and pay its reward. Returns `false` without paying when
/// the quest was already completed.
///
/// # Errors
/// [`ContentError::UnknownQuest`] for an id missing from the catalog.
pub fn complete_quest(state: &mut GameState, id: &str) -> Result<bool, ContentError> {
    let quest = require(id)?;
    let progress = progress_mut(state, id);
    if progress.status == QuestStatus::Completed {
        return Ok(false);
    }
    progress.status = QuestStatus::Completed;
    log::info!("quest {id} completed");
    state.log.push(format!("Quest complete: {}", quest.title));
    pay_reward(state, &quest.reward);
    Ok(true)
}

fn pay_reward(state: &mut GameState, reward: &QuestReward) {
    if let Some(item) = reward.item {
        state.player.inventory.add(item, 1);
        state
            .log
            .push(format!("{} added to your bag.", items::display_name(item)));
    }
    if reward.gold > 0 {
        state.player.gold = state.player.gold.saturating_add(reward.gold);
        state.log.push(format!("You receive {} gold.", reward.gold));
    }
    if reward.hunger > 0 {
        state.player.needs.restore(reward.hunger);
        state.log.push("Your companion feels refreshed.");
    }
    if !reward.stats.is_empty()
        && let Some(companion) = state.player.companion.as_mut()
    {
        for &(stat, amount) in reward.stats {
            let value = companion.stats.get_mut(stat);
            *value = value.saturating_add(amount);
        }
        state.log.push("Your companion grows stronger.");
    }
    if let Some(scene) = reward.unlock
        && state.unlocked_scenes.insert(scene)
    {
        state.log.push(format!("New area unlocked: {}.", scene.title()));
    }
}

/// Record `target` as defeated for a multi-target defeat quest. The quest
/// completes once it is active and every required target is recorded.
/// Returns `true` if this call completed the quest.
///
/// # Errors
/// [`ContentError::UnknownQuest`] for an id missing from the catalog.
pub fn mark_boss_defeated(
    state: &mut GameState,
    quest_id: &str,
    target: &str,
) -> Result<bool, ContentError> {
    let quest = require(quest_id)?;
    let QuestGoal::Defeat(targets) = quest.goal else {
        return Ok(false);
    };
    if !targets.contains(&target) {
        log::warn!("{target} is not a target of quest {quest_id}");
        return Ok(false);
    }
    let progress = progress_mut(state, quest_id);
    if progress.status == QuestStatus::Completed {
        return Ok(false);
    }
    progress.completed_targets.insert(target.to_owned());
    if progress.status == QuestStatus::Active && progress.requirement_met(quest.goal) {
        return complete_quest(state, quest_id);
    }
    Ok(false)
}

/// Hand over the item a delivery quest asks for. On success the requirement
/// is recorded and an active quest completes. Returns `false` and changes
/// nothing when the item is missing or the quest is not a pending delivery.
///
/// # Errors
/// [`ContentError::UnknownQuest`] for an id missing from the catalog.
pub fn deliver_item(state: &mut GameState, quest_id: &str) -> Result<bool, ContentError> {
    let quest = require(quest_id)?;
    let QuestGoal::Deliver(item) = quest.goal else {
        return Ok(false);
    };
    let pending = progress(state, quest_id)
        .is_none_or(|p| p.status != QuestStatus::Completed && !p.delivered);
    if !pending || !state.player.inventory.remove(item, 1) {
        return Ok(false);
    }
    let progress = progress_mut(state, quest_id);
    progress.delivered = true;
    let active = progress.status == QuestStatus::Active;
    state
        .log
        .push(format!("{} handed over.", items::display_name(item)));
    if active {
        complete_quest(state, quest_id)?;
    }
    Ok(true)
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

    fn state() -> GameState {
        let registry = SpeciesRegistry::builtin().expect("bestiary validates");
        let mut state = create_initial_state(&EngineConfig::default());
        state.player.companion = Some(MonsterInstance::new(&registry, "sproutle").expect("known"));
        state
    }

    // -- activate_quest ------------------------------------------------------

    #[test]
    fn activation_is_idempotent() {
        let mut state = state();
        assert_eq!(activate_quest(&mut state, "twinFangs"), Ok(true));
        assert_eq!(activate_quest(&mut state, "twinFangs"), Ok(false));
        assert_eq!(status(&state, "twinFangs"), QuestStatus::Active);
        assert_eq!(state.quests.len(), 1);
    }

    #[test]
    fn unknown_quest_is_a_content_error() {
        let mut state = state();
        assert_eq!(
            activate_quest(&mut state, "nope"),
            Err(ContentError::UnknownQuest("nope".to_owned()))
        );
        assert!(state.quests.is_empty());
    }

    // -- complete_quest ------------------------------------------------------

    #[test]
    fn completing_twice_pays_once() {
        let mut state = state();
        activate_quest(&mut state, "emberGuardian").expect("known quest");
        assert_eq!(complete_quest(&mut state, "emberGuardian"), Ok(true));
        assert_eq!(complete_quest(&mut state, "emberGuardian"), Ok(false));
        assert_eq!(state.player.inventory.quantity("tonic"), 1);
        assert_eq!(state.player.gold, 30);
        assert_eq!(state.player.companion.as_ref().map(|c| c.stats.morale), Some(6));
        assert!(state.unlocked_scenes.contains(&SceneId::WildGorge));
    }

    #[test]
    fn completed_quest_never_regresses() {
        let mut state = state();
        complete_quest(&mut state, "riverOffering").expect("known quest");
        assert_eq!(activate_quest(&mut state, "riverOffering"), Ok(false));
        assert_eq!(status(&state, "riverOffering"), QuestStatus::Completed);
    }

    // -- mark_boss_defeated --------------------------------------------------

    #[test]
    fn multi_target_quest_needs_every_target() {
        let mut state = state();
        activate_quest(&mut state, "twinFangs").expect("known quest");
        assert_eq!(mark_boss_defeated(&mut state, "twinFangs", "azureAlpha"), Ok(false));
        assert_eq!(status(&state, "twinFangs"), QuestStatus::Active);
        // Defeating the same target again does not count twice.
        assert_eq!(mark_boss_defeated(&mut state, "twinFangs", "azureAlpha"), Ok(false));
        assert_eq!(status(&state, "twinFangs"), QuestStatus::Active);
        assert_eq!(mark_boss_defeated(&mut state, "twinFangs", "azureOmega"), Ok(true));
        assert_eq!(status(&state, "twinFangs"), QuestStatus::Completed);
        assert_eq!(state.player.gold, 60);
    }

    #[test]
    fn targets_beaten_before_accepting_complete_on_activation() {
        let mut state = state();
        assert_eq!(mark_boss_defeated(&mut state, "emberGuardian", "brasemire"), Ok(false));
        assert_eq!(status(&state, "emberGuardian"), QuestStatus::Available);
        assert_eq!(activate_quest(&mut state, "emberGuardian"), Ok(true));
        assert_eq!(status(&state, "emberGuardian"), QuestStatus::Completed);
    }

    #[test]
    fn foreign_targets_are_ignored() {
        let mut state = state();
        activate_quest(&mut state, "emberGuardian").expect("known quest");
        assert_eq!(mark_boss_defeated(&mut state, "emberGuardian", "azureAlpha"), Ok(false));
        assert!(
            progress(&state, "emberGuardian").is_some_and(|p| p.completed_targets.is_empty())
        );
    }

    // -- deliver_item --------------------------------------------------------

    #[test]
    fn failed_delivery_changes_nothing() {
        let mut state = state();
        activate_quest(&mut state, "riverOffering").expect("known quest");
        let before = state.clone();
        assert_eq!(deliver_item(&mut state, "riverOffering"), Ok(false));
        assert_eq!(state, before);
    }

    #[test]
    fn delivery_consumes_item_and_completes() {
        let mut state = state();
        state.player.needs.hunger = 30;
        state.player.inventory.add("dewPetal", 1);
        activate_quest(&mut state, "riverOffering").expect("known quest");
        assert_eq!(deliver_item(&mut state, "riverOffering"), Ok(true));
        assert!(!state.player.inventory.contains("dewPetal"));
        assert_eq!(status(&state, "riverOffering"), QuestStatus::Completed);
        assert_eq!(state.player.needs.hunger, 80);
        assert_eq!(deliver_item(&mut state, "riverOffering"), Ok(false));
    }
}
