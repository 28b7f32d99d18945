//! Run configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::payoff::Payoffs;
use crate::strategy::Strategy;

/// Everything a caller supplies to set up a tournament
///
/// Every field has a default, so a partial JSON document is a complete config:
///
/// ```json
/// { "turns": 100, "noise": 0.02, "strategies": ["TitForTat", "Grudger"] }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Rounds per match
    pub turns: u32,
    /// Per-action flip probability, in [0, 1)
    pub noise: f64,
    /// Whether each player also meets itself
    pub self_plays: bool,
    /// Seed for every match RNG; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Keep round-by-round action logs in match results
    pub record_history: bool,
    pub payoffs: Payoffs,
    /// Roster, in registration order
    pub strategies: Vec<Strategy>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            turns: 200,
            noise: 0.0,
            self_plays: true,
            seed: None,
            record_history: false,
            payoffs: Payoffs::default(),
            strategies: Vec::new(),
        }
    }
}

impl TournamentConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = turns;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_self_plays(mut self, self_plays: bool) -> Self {
        self.self_plays = self_plays;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_history(mut self, record_history: bool) -> Self {
        self.record_history = record_history;
        self
    }

    pub fn with_payoffs(mut self, payoffs: Payoffs) -> Self {
        self.payoffs = payoffs;
        self
    }
}
