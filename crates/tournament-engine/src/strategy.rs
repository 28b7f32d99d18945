//! Strategy definitions and decision functions

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::payoff::Action;

/// Built-in strategies
///
/// Every variant is stateless: the next action is a function of the two
/// action histories (and, for the random variants, the injected RNG).
/// Histories are chronological and of equal length when a decision is made.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Always cooperate, never defect.
    AlwaysCooperate,
    /// Always defect, never cooperate.
    AlwaysDefect,
    /// Copy opponent's last move. Start with cooperate.
    TitForTat,
    /// Cooperate until opponent defects once, then always defect.
    Grudger,
    /// Cooperate with a fixed probability each round.
    Random { cooperation_probability: f64 },
    /// Fair coin each round.
    PureRandom,
    /// Win-stay, lose-shift.
    Pavlov,
    /// Tit-for-Tat but start with defect.
    SuspiciousTitForTat,
    /// Defect only if opponent defected twice in a row.
    TitForTwoTats,
    /// Retaliate with increasing defection streaks, then forgive.
    Gradual,
}

impl Strategy {
    /// Unbiased `Random`
    pub fn random() -> Self {
        Strategy::Random { cooperation_probability: 0.5 }
    }

    pub fn biased_random(cooperation_probability: f64) -> Self {
        Strategy::Random { cooperation_probability }
    }

    /// The roster of the classic simulation run
    pub fn classic_roster() -> Vec<Strategy> {
        vec![
            Strategy::TitForTat,
            Strategy::AlwaysCooperate,
            Strategy::AlwaysDefect,
            Strategy::biased_random(0.7),
            Strategy::PureRandom,
            Strategy::Grudger,
            Strategy::Pavlov,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::AlwaysCooperate => "AlwaysCooperate",
            Strategy::AlwaysDefect => "AlwaysDefect",
            Strategy::TitForTat => "TitForTat",
            Strategy::Grudger => "Grudger",
            Strategy::Random { .. } => "Random",
            Strategy::PureRandom => "PureRandom",
            Strategy::Pavlov => "Pavlov",
            Strategy::SuspiciousTitForTat => "SuspiciousTitForTat",
            Strategy::TitForTwoTats => "TitForTwoTats",
            Strategy::Gradual => "Gradual",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        match self {
            Strategy::AlwaysCooperate => "Never defects. Always cooperates.".to_string(),
            Strategy::AlwaysDefect => "Never cooperates. Always defects.".to_string(),
            Strategy::TitForTat => {
                "Copies opponent's last move. Starts by cooperating.".to_string()
            }
            Strategy::Grudger => "Cooperates until betrayed, then always defects.".to_string(),
            Strategy::Random { cooperation_probability } => format!(
                "Cooperates {:.0}% of the time at random.",
                cooperation_probability * 100.0
            ),
            Strategy::PureRandom => "Cooperates or defects on a fair coin flip.".to_string(),
            Strategy::Pavlov => {
                "Repeats its move after R or T, switches after P or S.".to_string()
            }
            Strategy::SuspiciousTitForTat => {
                "Like Tit-for-Tat, but starts with defect.".to_string()
            }
            Strategy::TitForTwoTats => {
                "Only retaliates after two consecutive defections.".to_string()
            }
            Strategy::Gradual => {
                "Retaliates with increasing severity, then forgives.".to_string()
            }
        }
    }

    /// Reject parameters no decision function can honour
    pub fn validate(&self) -> Result<()> {
        match *self {
            Strategy::Random { cooperation_probability }
                if !(0.0..=1.0).contains(&cooperation_probability) =>
            {
                Err(Error::InvalidProbability {
                    probability: cooperation_probability,
                })
            }
            _ => Ok(()),
        }
    }

    /// Choose the next action
    ///
    /// # Arguments
    /// * `own_history` - Our past actions
    /// * `opponent_history` - Opponent's past actions
    /// * `rng` - Random source for the randomized variants
    pub fn decide<R: Rng + ?Sized>(
        &self,
        own_history: &[Action],
        opponent_history: &[Action],
        rng: &mut R,
    ) -> Action {
        match *self {
            Strategy::AlwaysCooperate => Action::Cooperate,
            Strategy::AlwaysDefect => Action::Defect,
            Strategy::TitForTat => decide_tit_for_tat(opponent_history, Action::Cooperate),
            Strategy::Grudger => decide_grudger(opponent_history),
            Strategy::Random { cooperation_probability } => {
                decide_random(cooperation_probability, rng)
            }
            Strategy::PureRandom => {
                if rng.gen::<bool>() {
                    Action::Cooperate
                } else {
                    Action::Defect
                }
            }
            Strategy::Pavlov => decide_pavlov(own_history, opponent_history),
            Strategy::SuspiciousTitForTat => decide_tit_for_tat(opponent_history, Action::Defect),
            Strategy::TitForTwoTats => decide_tit_for_two_tats(opponent_history),
            Strategy::Gradual => decide_gradual(own_history, opponent_history),
        }
    }
}

/// Copy the opponent's last move, `opening` on the first round
fn decide_tit_for_tat(opponent_history: &[Action], opening: Action) -> Action {
    opponent_history.last().copied().unwrap_or(opening)
}

fn decide_grudger(opponent_history: &[Action]) -> Action {
    if opponent_history.contains(&Action::Defect) {
        Action::Defect
    } else {
        Action::Cooperate
    }
}

/// A probability of 1 or more always cooperates, 0 or less always defects
fn decide_random<R: Rng + ?Sized>(cooperation_probability: f64, rng: &mut R) -> Action {
    if rng.gen::<f64>() < cooperation_probability {
        Action::Cooperate
    } else {
        Action::Defect
    }
}

/// Pavlov: Win-stay, lose-shift
/// - Last round paid R or T (opponent cooperated): repeat our move
/// - Last round paid P or S (opponent defected): switch
fn decide_pavlov(own_history: &[Action], opponent_history: &[Action]) -> Action {
    match (own_history.last(), opponent_history.last()) {
        (Some(&mine), Some(Action::Cooperate)) => mine,
        (Some(&mine), Some(Action::Defect)) => mine.flip(),
        _ => Action::Cooperate,
    }
}

fn decide_tit_for_two_tats(opponent_history: &[Action]) -> Action {
    match opponent_history {
        [.., Action::Defect, Action::Defect] => Action::Defect,
        _ => Action::Cooperate,
    }
}

/// Gradual: Escalating retaliation
/// After N opponent defections, we should have made N(N+1)/2 total defections
fn decide_gradual(own_history: &[Action], opponent_history: &[Action]) -> Action {
    let their_defections = count_defections(opponent_history);
    let my_defections = count_defections(own_history);
    let expected = their_defections * (their_defections + 1) / 2;

    if my_defections < expected {
        Action::Defect
    } else {
        Action::Cooperate
    }
}

fn count_defections(history: &[Action]) -> usize {
    history.iter().filter(|a| **a == Action::Defect).count()
}
