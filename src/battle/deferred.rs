//! Delayed, cancellable battle work.
//!
//! The enemy turn does not resolve on the frame it starts. The battle
//! schedules a [`DeferredTask`] that carries the [`BattleId`] of the battle
//! that created it. Due tasks are handed back by [`Scheduler::advance`]; the
//! receiver must check that the owning battle is still the active one and
//! still unresolved before acting on it.

use serde::{Deserialize, Serialize};

/// Identity of one battle instance. Never reused within a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BattleId(pub u64);

/// What a deferred task does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredAction {
    EnemyTurn,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeferredTask {
    pub owner: BattleId,
    pub action: DeferredAction,
    remaining: f32,
}

impl DeferredTask {
    /// Seconds until the task is due.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// Pending deferred tasks, advanced by the frame clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: Vec<DeferredTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh battle identity.
    pub fn issue_battle_id(&mut self) -> BattleId {
        self.next_id += 1;
        BattleId(self.next_id)
    }

    pub fn schedule(&mut self, owner: BattleId, action: DeferredAction, delay: f32) {
        log::debug!("scheduled {action:?} for {owner:?} in {delay}s");
        self.pending.push(DeferredTask {
            owner,
            action,
            remaining: delay.max(0.0),
        });
    }

    /// Count down every pending task and return the ones that fell due,
    /// in the order they were scheduled.
    pub fn advance(&mut self, dt: f32) -> Vec<DeferredTask> {
        for task in &mut self.pending {
            task.remaining -= dt;
        }
        let (due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|task| task.remaining <= 0.0);
        self.pending = pending;
        due
    }

    /// Drop every task owned by `owner`. Returns how many were dropped.
    pub fn cancel(&mut self, owner: BattleId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|task| task.owner != owner);
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("cancelled {} deferred task(s)", self.pending.len());
        }
        self.pending.clear();
    }

    /// Return every pending task as if its delay had elapsed.
    pub fn flush(&mut self) -> Vec<DeferredTask> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self, owner: BattleId) -> bool {
        self.pending.iter().any(|task| task.owner == owner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battle_ids_are_unique() {
        let mut scheduler = Scheduler::new();
        assert_ne!(scheduler.issue_battle_id(), scheduler.issue_battle_id());
    }

    #[test]
    fn tasks_fire_after_their_delay() {
        let mut scheduler = Scheduler::new();
        let owner = scheduler.issue_battle_id();
        scheduler.schedule(owner, DeferredAction::EnemyTurn, 0.4);
        assert!(scheduler.advance(0.3).is_empty());
        assert!(scheduler.has_pending(owner));
        let due = scheduler.advance(0.15);
        assert_eq!(due.len(), 1);
        assert_eq!(due.first().map(|t| t.owner), Some(owner));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn cancel_only_drops_the_owner() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.issue_battle_id();
        let b = scheduler.issue_battle_id();
        scheduler.schedule(a, DeferredAction::EnemyTurn, 1.0);
        scheduler.schedule(b, DeferredAction::EnemyTurn, 1.0);
        assert_eq!(scheduler.cancel(a), 1);
        assert!(!scheduler.has_pending(a));
        assert!(scheduler.has_pending(b));
        scheduler.cancel_all();
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn flush_returns_everything_immediately() {
        let mut scheduler = Scheduler::new();
        let owner = scheduler.issue_battle_id();
        scheduler.schedule(owner, DeferredAction::EnemyTurn, 10.0);
        assert_eq!(scheduler.flush().len(), 1);
        assert!(scheduler.advance(100.0).is_empty());
    }
}
