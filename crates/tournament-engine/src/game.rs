//! Match execution engine

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::payoff::{Action, Game, Payoffs};
use crate::player::Player;

/// Match outcome from player 1's perspective
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

/// One side of a finished match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub cooperation_rate: f64,
}

/// Result of a complete match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player1: PlayerRecord,
    pub player2: PlayerRecord,
    pub turns: u32,
    pub total_score: f64,
    pub outcome: Outcome,
    pub noise: f64,
    pub payoffs: Payoffs,
    /// Recorded (post-noise) actions per round, if the match kept them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<(Action, Action)>>,
}

impl MatchResult {
    /// Did a strategy with this name take part?
    pub fn involves(&self, name: &str) -> bool {
        self.player1.name == name || self.player2.name == name
    }

    /// Was this a match between the two named strategies, in either seat order?
    pub fn is_between(&self, first: &str, second: &str) -> bool {
        let (a, b) = (self.player1.name.as_str(), self.player2.name.as_str());
        (a == first && b == second) || (a == second && b == first)
    }
}

/// A fixed-length iterated game between two players
///
/// `play` consumes the match, so each match runs exactly once.
#[derive(Debug)]
pub struct Match<'g> {
    player1: Player,
    player2: Player,
    game: &'g Game,
    turns: u32,
    noise: f64,
    record_history: bool,
}

impl<'g> Match<'g> {
    /// Set up a match. Both players are reset before any move is made
    ///
    /// # Arguments
    /// * `noise` - Probability in [0, 1) that each intended action is flipped
    pub fn new(
        mut player1: Player,
        mut player2: Player,
        game: &'g Game,
        turns: u32,
        noise: f64,
    ) -> Result<Self> {
        validate_noise(noise)?;
        player1.reset();
        player2.reset();

        Ok(Self {
            player1,
            player2,
            game,
            turns,
            noise,
            record_history: false,
        })
    }

    /// Keep the round-by-round action log in the result
    pub fn with_history(mut self, record_history: bool) -> Self {
        self.record_history = record_history;
        self
    }

    /// Play every round and compile the result
    pub fn play<R: Rng + ?Sized>(mut self, rng: &mut R) -> MatchResult {
        let mut history: Option<Vec<(Action, Action)>> = self
            .record_history
            .then(|| Vec::with_capacity(self.turns as usize));

        for round in 0..self.turns {
            // Simultaneous moves: neither side sees the other's move this round
            let intended_a = self.player1.make_move(self.player2.actions(), rng);
            let intended_b = self.player2.make_move(self.player1.actions(), rng);

            let (move_a, move_b) = if self.noise > 0.0 {
                (
                    apply_noise(intended_a, self.noise, rng),
                    apply_noise(intended_b, self.noise, rng),
                )
            } else {
                (intended_a, intended_b)
            };

            self.player1.record_action(move_a);
            self.player2.record_action(move_b);
            if let Some(history) = history.as_mut() {
                history.push((move_a, move_b));
            }

            let (score_a, score_b) = self.game.score(move_a, move_b);
            self.player1.record_score(score_a);
            self.player2.record_score(score_b);

            trace!(
                "round {}: {} {} -> {} {}",
                round,
                move_a.code(),
                move_b.code(),
                score_a,
                score_b
            );
        }

        self.compile(history)
    }

    fn compile(self, history: Option<Vec<(Action, Action)>>) -> MatchResult {
        let score_a = self.player1.score();
        let score_b = self.player2.score();

        let outcome = if score_a > score_b {
            Outcome::Win
        } else if score_a < score_b {
            Outcome::Loss
        } else {
            Outcome::Tie
        };

        debug!(
            "{} vs {}: {} - {} ({:?})",
            self.player1.id(),
            self.player2.id(),
            score_a,
            score_b,
            outcome
        );

        MatchResult {
            player1: record(&self.player1),
            player2: record(&self.player2),
            turns: self.turns,
            total_score: score_a + score_b,
            outcome,
            noise: self.noise,
            payoffs: self.game.payoffs(),
            history,
        }
    }
}

/// Noise must lie in [0, 1)
pub(crate) fn validate_noise(noise: f64) -> Result<()> {
    if (0.0..1.0).contains(&noise) {
        Ok(())
    } else {
        Err(Error::InvalidNoise { noise })
    }
}

/// Flip the intended action with probability `noise`
fn apply_noise<R: Rng + ?Sized>(intended: Action, noise: f64, rng: &mut R) -> Action {
    if rng.gen::<f64>() < noise {
        intended.flip()
    } else {
        intended
    }
}

fn record(player: &Player) -> PlayerRecord {
    PlayerRecord {
        id: player.id().to_string(),
        name: player.name().to_string(),
        score: player.score(),
        cooperation_rate: player.cooperation_rate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::match_rng;
    use crate::strategy::Strategy;

    fn play(a: Strategy, b: Strategy, turns: u32, noise: f64, seed: u64) -> MatchResult {
        let game = Game::default();
        Match::new(Player::new(a), Player::new(b), &game, turns, noise)
            .unwrap()
            .with_history(true)
            .play(&mut match_rng(seed, 0))
    }

    #[test]
    fn test_cooperate_vs_defect() {
        let result = play(Strategy::AlwaysCooperate, Strategy::AlwaysDefect, 10, 0.0, 42);

        assert_eq!(result.player1.score, 0.0);
        assert_eq!(result.player2.score, 50.0);
        assert_eq!(result.player1.cooperation_rate, 1.0);
        assert_eq!(result.player2.cooperation_rate, 0.0);
        assert_eq!(result.outcome, Outcome::Loss);
        assert_eq!(result.total_score, 50.0);
        assert_eq!(result.turns, 10);
    }

    #[test]
    fn test_tft_vs_always_defect() {
        let result = play(Strategy::TitForTat, Strategy::AlwaysDefect, 10, 0.0, 42);

        assert_eq!(result.player1.score, 9.0);
        assert_eq!(result.player2.score, 14.0);
        assert!((result.player1.cooperation_rate - 0.1).abs() < 1e-12);

        let history = result.history.unwrap();
        // Round 0: TFT cooperates, AD defects
        assert_eq!(history[0], (Action::Cooperate, Action::Defect));
        // Round 1+: TFT retaliates, both defect
        for round in history.iter().skip(1) {
            assert_eq!(*round, (Action::Defect, Action::Defect));
        }
    }

    #[test]
    fn test_tft_vs_tft_ties() {
        let result = play(Strategy::TitForTat, Strategy::TitForTat, 20, 0.0, 42);
        assert_eq!(result.outcome, Outcome::Tie);
        assert_eq!(result.player1.score, 60.0);
        assert_eq!(result.total_score, 120.0);
    }

    #[test]
    fn test_defector_wins() {
        let result = play(Strategy::AlwaysDefect, Strategy::Grudger, 5, 0.0, 42);
        assert_eq!(result.outcome, Outcome::Win);
        assert_eq!(result.player1.score, 5.0 + 4.0);
        assert_eq!(result.player2.score, 4.0);
    }

    #[test]
    fn test_noise_flips_actions() {
        let result = play(Strategy::AlwaysCooperate, Strategy::AlwaysCooperate, 50, 0.3, 7);
        let history = result.history.unwrap();
        assert!(history
            .iter()
            .any(|(a, b)| *a == Action::Defect || *b == Action::Defect));
        assert!(result.player1.cooperation_rate < 1.0 || result.player2.cooperation_rate < 1.0);
    }

    #[test]
    fn test_scores_follow_recorded_actions() {
        let game = Game::default();
        let result = play(Strategy::PureRandom, Strategy::Pavlov, 100, 0.2, 11);
        let history = result.history.unwrap();

        let (mut a, mut b) = (0.0, 0.0);
        for (move_a, move_b) in &history {
            let (sa, sb) = game.score(*move_a, *move_b);
            a += sa;
            b += sb;
        }
        assert_eq!(result.player1.score, a);
        assert_eq!(result.player2.score, b);
    }

    #[test]
    fn test_match_determinism() {
        let first = play(Strategy::TitForTat, Strategy::random(), 50, 0.1, 99);
        let second = play(Strategy::TitForTat, Strategy::random(), 50, 0.1, 99);

        assert_eq!(first.history, second.history);
        assert_eq!(first.player1.score, second.player1.score);
        assert_eq!(first.player2.score, second.player2.score);
    }

    #[test]
    fn test_invalid_noise() {
        let game = Game::default();
        for noise in [1.0, -0.1, 1.5, f64::NAN] {
            let result = Match::new(
                Player::new(Strategy::TitForTat),
                Player::new(Strategy::TitForTat),
                &game,
                10,
                noise,
            );
            assert!(matches!(result, Err(Error::InvalidNoise { .. })));
        }
    }

    #[test]
    fn test_zero_turns() {
        let result = play(Strategy::AlwaysCooperate, Strategy::AlwaysDefect, 0, 0.0, 1);
        assert_eq!(result.player1.cooperation_rate, 0.0);
        assert_eq!(result.player2.cooperation_rate, 0.0);
        assert_eq!(result.outcome, Outcome::Tie);
        assert_eq!(result.history, Some(Vec::new()));
    }

    #[test]
    fn test_players_reset_before_play() {
        let game = Game::default();
        let mut stale = Player::with_id(Strategy::TitForTat, "stale");
        stale.record_action(Action::Defect);
        stale.record_score(100.0);

        let result = Match::new(stale, Player::new(Strategy::AlwaysCooperate), &game, 3, 0.0)
            .unwrap()
            .play(&mut match_rng(1, 0));
        assert_eq!(result.player1.score, 9.0);
        assert_eq!(result.player1.cooperation_rate, 1.0);
        assert_eq!(result.player1.id, "stale");
    }

    #[test]
    fn test_result_json_shape() {
        let game = Game::default();
        let result = Match::new(
            Player::with_id(Strategy::AlwaysCooperate, "a"),
            Player::with_id(Strategy::AlwaysDefect, "b"),
            &game,
            2,
            0.0,
        )
        .unwrap()
        .play(&mut match_rng(1, 0));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "loss");
        assert_eq!(json["player1"]["name"], "AlwaysCooperate");
        assert_eq!(json["payoffs"]["T"], 5.0);
        assert!(json.get("history").is_none());

        let with_history = play(Strategy::AlwaysCooperate, Strategy::AlwaysDefect, 2, 0.0, 1);
        let json = serde_json::to_value(&with_history).unwrap();
        assert_eq!(json["history"], serde_json::json!([["C", "D"], ["C", "D"]]));
    }

    #[test]
    fn test_history_only_when_requested() {
        let game = Game::default();
        let run = |record: Option<bool>| {
            let m = Match::new(
                Player::with_id(Strategy::TitForTat, "a"),
                Player::with_id(Strategy::AlwaysDefect, "b"),
                &game,
                10,
                0.0,
            )
            .unwrap();
            let m = match record {
                Some(record) => m.with_history(record),
                None => m,
            };
            m.play(&mut match_rng(3, 0))
        };

        let default = run(None);
        let disabled = run(Some(false));
        let enabled = run(Some(true));

        assert!(default.history.is_none());
        assert_eq!(default, disabled);
        assert_eq!(enabled.history.as_ref().map(Vec::len), Some(10));
        assert_eq!(enabled.player1.score, disabled.player1.score);
    }

    #[test]
    fn test_name_filters() {
        let result = play(Strategy::TitForTat, Strategy::Grudger, 1, 0.0, 1);
        assert!(result.involves("Grudger"));
        assert!(!result.involves("Pavlov"));
        assert!(result.is_between("Grudger", "TitForTat"));
        assert!(!result.is_between("Grudger", "Grudger"));
    }
}
