//! Payoff model for the one-shot Prisoner's Dilemma

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A move in the Prisoner's Dilemma
///
/// Serialized as its single-character code, `"C"` or `"D"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "C")]
    Cooperate,
    #[serde(rename = "D")]
    Defect,
}

impl Action {
    /// The opposite action
    pub fn flip(self) -> Self {
        match self {
            Action::Cooperate => Action::Defect,
            Action::Defect => Action::Cooperate,
        }
    }

    pub fn code(self) -> char {
        match self {
            Action::Cooperate => 'C',
            Action::Defect => 'D',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(Action::Cooperate),
            'D' => Some(Action::Defect),
            _ => None,
        }
    }
}

/// Snapshot of the four payoff values
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payoffs {
    /// Reward: both cooperate
    #[serde(rename = "R")]
    pub reward: f64,
    /// Temptation: defect against a cooperator
    #[serde(rename = "T")]
    pub temptation: f64,
    /// Punishment: both defect
    #[serde(rename = "P")]
    pub punishment: f64,
    /// Sucker: cooperate against a defector
    #[serde(rename = "S")]
    pub sucker: f64,
}

impl Default for Payoffs {
    /// The classic Axelrod payoffs: R=3, T=5, P=1, S=0
    fn default() -> Self {
        Self {
            reward: 3.0,
            temptation: 5.0,
            punishment: 1.0,
            sucker: 0.0,
        }
    }
}

impl Payoffs {
    /// Check all four are finite, then `T > R > P > S` and `2R > T + S`,
    /// naming the first link that fails
    pub fn validate(&self) -> Result<()> {
        let Payoffs { reward: r, temptation: t, punishment: p, sucker: s } = *self;

        let inequality = if ![r, t, p, s].iter().all(|v| v.is_finite()) {
            Some("|R|, |T|, |P|, |S| < inf")
        } else if !(t > r) {
            Some("T > R")
        } else if !(r > p) {
            Some("R > P")
        } else if !(p > s) {
            Some("P > S")
        } else if !(2.0 * r > t + s) {
            Some("2R > T + S")
        } else {
            None
        };

        match inequality {
            Some(inequality) => Err(Error::InvalidPayoffs { inequality }),
            None => Ok(()),
        }
    }
}

/// The Prisoner's Dilemma with validated payoffs
///
/// Immutable once built; a tournament shares one `Game` by reference across
/// every match it runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    payoffs: Payoffs,
}

impl Game {
    pub fn new(payoffs: Payoffs) -> Result<Self> {
        payoffs.validate()?;
        Ok(Self { payoffs })
    }

    pub fn payoffs(&self) -> Payoffs {
        self.payoffs
    }

    /// Score one round. Returns (score_a, score_b)
    pub fn score(&self, a: Action, b: Action) -> (f64, f64) {
        let Payoffs { reward, temptation, punishment, sucker } = self.payoffs;
        match (a, b) {
            (Action::Cooperate, Action::Cooperate) => (reward, reward),
            (Action::Cooperate, Action::Defect) => (sucker, temptation),
            (Action::Defect, Action::Cooperate) => (temptation, sucker),
            (Action::Defect, Action::Defect) => (punishment, punishment),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self { payoffs: Payoffs::default() }
    }
}
