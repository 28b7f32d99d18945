//! Per-match participant state

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::payoff::Action;
use crate::strategy::Strategy;

static NEXT_PLAYER: AtomicU64 = AtomicU64::new(0);

/// A strategy bound to the history and score of one match
///
/// Built fresh for every match; the tournament keeps per-strategy totals
/// separately, keyed on [`Player::id`].
#[derive(Clone, Debug)]
pub struct Player {
    id: String,
    strategy: Strategy,
    actions: Vec<Action>,
    score: f64,
}

impl Player {
    /// Player with an id derived from the strategy name, unique within the process
    pub fn new(strategy: Strategy) -> Self {
        let n = NEXT_PLAYER.fetch_add(1, Ordering::Relaxed);
        Self::with_id(strategy, format!("{}-{}", strategy.name(), n))
    }

    pub fn with_id(strategy: Strategy, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            strategy,
            actions: Vec::new(),
            score: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Ask the strategy for the next action; does not record it
    pub fn make_move<R: Rng + ?Sized>(&self, opponent_history: &[Action], rng: &mut R) -> Action {
        self.strategy.decide(&self.actions, opponent_history, rng)
    }

    pub fn record_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn record_score(&mut self, points: f64) {
        self.score += points;
    }

    /// Clear history and score. The id is kept
    pub fn reset(&mut self) {
        self.actions.clear();
        self.score = 0.0;
    }

    /// Fraction of recorded actions that were Cooperate (0 with no history)
    pub fn cooperation_rate(&self) -> f64 {
        if self.actions.is_empty() {
            return 0.0;
        }
        let cooperations = self
            .actions
            .iter()
            .filter(|a| **a == Action::Cooperate)
            .count();
        cooperations as f64 / self.actions.len() as f64
    }
}
