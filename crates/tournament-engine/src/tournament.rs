//! Round-robin tournament scheduler
//!
//! A run plays every pairing from [`generate_all_pairings`], each as a fresh
//! [`Match`] between fresh [`Player`]s, then folds the match results into one
//! [`Standing`] per roster entry. Per-strategy totals live only in the
//! standings, so no player state is shared between matches.

use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::TournamentConfig;
use crate::error::{Error, Result};
use crate::game::{validate_noise, Match, MatchResult, Outcome, PlayerRecord};
use crate::pairing::generate_all_pairings;
use crate::payoff::{Game, Payoffs};
use crate::player::Player;
use crate::random::{entropy_seed, match_rng};
use crate::strategy::Strategy;

/// Aggregated performance of one roster entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    pub avg_score: f64,
    pub total_score: f64,
    pub avg_cooperation_rate: f64,
    pub wins: u32,
    /// 1-indexed position in the avg_score ordering
    pub rank: usize,
}

/// Settings a run was played with
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentMeta {
    pub turns: u32,
    pub noise: f64,
    pub self_plays: bool,
    pub num_strategies: usize,
    pub num_matches: usize,
    pub payoffs: Payoffs,
    /// Replaying with this seed reproduces the run
    pub seed: u64,
}

/// Everything a completed run produced
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentResult {
    /// Sorted by `avg_score`, best first
    pub players: Vec<PlayerSummary>,
    /// In pairing order
    pub matches: Vec<MatchResult>,
    #[serde(rename = "tournament_config")]
    pub config: TournamentMeta,
    /// Wall-clock seconds
    pub duration: f64,
}

impl TournamentResult {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Serialize)
    }
}

/// Running totals for one roster entry
#[derive(Debug)]
struct Standing {
    id: String,
    name: &'static str,
    total_score: f64,
    cooperation_rates: Vec<f64>,
    wins: u32,
    /// Seats taken; a self-play match counts twice
    appearances: usize,
}

impl Standing {
    fn new(id: String, name: &'static str) -> Self {
        Self {
            id,
            name,
            total_score: 0.0,
            cooperation_rates: Vec::new(),
            wins: 0,
            appearances: 0,
        }
    }

    fn credit(&mut self, record: &PlayerRecord) {
        self.total_score += record.score;
        self.cooperation_rates.push(record.cooperation_rate);
        self.appearances += 1;
    }

    /// Average over pairings: each opponent is met once per seat order, so
    /// half the seats taken is the number of opponents faced
    fn summarize(self) -> PlayerSummary {
        let avg_score = if self.appearances == 0 {
            0.0
        } else {
            self.total_score / (self.appearances as f64 / 2.0)
        };
        let avg_cooperation_rate = if self.cooperation_rates.is_empty() {
            0.0
        } else {
            self.cooperation_rates.iter().sum::<f64>() / self.cooperation_rates.len() as f64
        };

        PlayerSummary {
            id: self.id,
            name: self.name.to_string(),
            avg_score,
            total_score: self.total_score,
            avg_cooperation_rate,
            wins: self.wins,
            rank: 0,
        }
    }
}

/// A round-robin tournament over a roster of strategies
#[derive(Debug)]
pub struct Tournament {
    config: TournamentConfig,
    game: Game,
    results: Option<TournamentResult>,
}

impl Tournament {
    /// Build a tournament; fails if the configured payoffs are not a Prisoner's Dilemma
    pub fn new(config: TournamentConfig) -> Result<Self> {
        let game = Game::new(config.payoffs)?;
        Ok(Self {
            config,
            game,
            results: None,
        })
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.config.strategies
    }

    /// Register another strategy. Results of an earlier run are discarded
    pub fn add_strategy(&mut self, strategy: Strategy) {
        self.config.strategies.push(strategy);
        self.results = None;
    }

    /// Play every pairing and rank the roster
    pub fn run(&mut self) -> Result<&TournamentResult> {
        let strategies = &self.config.strategies;
        if strategies.is_empty() {
            return Err(Error::EmptyRoster);
        }
        validate_noise(self.config.noise)?;
        for strategy in strategies {
            strategy.validate()?;
        }

        let start = Instant::now();
        let seed = self.config.seed.unwrap_or_else(entropy_seed);
        let pairings = generate_all_pairings(strategies.len(), self.config.self_plays);

        info!(
            "Running tournament: {} strategies, {} matches, {} turns, noise {}, seed {}",
            strategies.len(),
            pairings.len(),
            self.config.turns,
            self.config.noise,
            seed
        );

        let ids = roster_ids(strategies);
        let matches = self.play_all(&pairings, &ids, seed)?;
        let players = rank_players(strategies, &ids, &pairings, &matches);

        let duration = start.elapsed().as_secs_f64();
        info!(
            "Tournament completed in {:.3}s, leader: {}",
            duration,
            players.first().map(|p| p.name.as_str()).unwrap_or("-")
        );

        let result = TournamentResult {
            players,
            config: TournamentMeta {
                turns: self.config.turns,
                noise: self.config.noise,
                self_plays: self.config.self_plays,
                num_strategies: strategies.len(),
                num_matches: matches.len(),
                payoffs: self.game.payoffs(),
                seed,
            },
            matches,
            duration,
        };

        Ok(&*self.results.insert(result))
    }

    fn play_all(
        &self,
        pairings: &[(usize, usize)],
        ids: &[String],
        seed: u64,
    ) -> Result<Vec<MatchResult>> {
        #[cfg(feature = "parallel")]
        return self.play_parallel(pairings, ids, seed);

        #[cfg(not(feature = "parallel"))]
        return self.play_sequential(pairings, ids, seed);
    }

    #[cfg_attr(feature = "parallel", allow(dead_code))]
    fn play_sequential(
        &self,
        pairings: &[(usize, usize)],
        ids: &[String],
        seed: u64,
    ) -> Result<Vec<MatchResult>> {
        pairings
            .iter()
            .enumerate()
            .map(|(index, &(a, b))| self.play_pairing(index, a, b, ids, seed))
            .collect()
    }

    /// Order-preserving: the collected results are in pairing order
    #[cfg(feature = "parallel")]
    fn play_parallel(
        &self,
        pairings: &[(usize, usize)],
        ids: &[String],
        seed: u64,
    ) -> Result<Vec<MatchResult>> {
        use rayon::prelude::*;

        pairings
            .par_iter()
            .enumerate()
            .map(|(index, &(a, b))| self.play_pairing(index, a, b, ids, seed))
            .collect()
    }

    /// One match with its own RNG, so results do not depend on execution order
    fn play_pairing(
        &self,
        index: usize,
        a: usize,
        b: usize,
        ids: &[String],
        seed: u64,
    ) -> Result<MatchResult> {
        let strategies = &self.config.strategies;
        let player1 = Player::with_id(strategies[a], ids[a].as_str());
        let player2 = Player::with_id(strategies[b], ids[b].as_str());
        let mut rng = match_rng(seed, index as u64);

        let result = Match::new(
            player1,
            player2,
            &self.game,
            self.config.turns,
            self.config.noise,
        )?
        .with_history(self.config.record_history)
        .play(&mut rng);

        Ok(result)
    }

    /// Results of the last run
    pub fn results(&self) -> Result<&TournamentResult> {
        self.results.as_ref().ok_or(Error::NotRun)
    }

    /// Player summaries, best first
    pub fn rankings(&self) -> Result<&[PlayerSummary]> {
        Ok(&self.results()?.players)
    }

    /// All matches a strategy with this name played in, either seat
    pub fn strategy_match_results(&self, name: &str) -> Result<Vec<&MatchResult>> {
        Ok(self
            .results()?
            .matches
            .iter()
            .filter(|m| m.involves(name))
            .collect())
    }

    /// 1-indexed rank of the best-placed strategy with this name
    pub fn strategy_ranking(&self, name: &str) -> Result<usize> {
        self.rankings()?
            .iter()
            .position(|p| p.name == name)
            .map(|i| i + 1)
            .ok_or_else(|| Error::StrategyNotFound {
                name: name.to_string(),
            })
    }

    /// Direct matches between two named strategies, in either seat order
    pub fn head_to_head_results(&self, first: &str, second: &str) -> Result<Vec<&MatchResult>> {
        let matches: Vec<&MatchResult> = self
            .results()?
            .matches
            .iter()
            .filter(|m| m.is_between(first, second))
            .collect();

        if matches.is_empty() {
            return Err(Error::NoHeadToHead {
                first: first.to_string(),
                second: second.to_string(),
            });
        }
        Ok(matches)
    }
}

/// Ids stable per run: the roster position disambiguates equal strategies
fn roster_ids(strategies: &[Strategy]) -> Vec<String> {
    strategies
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}-{}", s.name(), i))
        .collect()
}

/// Fold match results into ranked summaries, in pairing order
fn rank_players(
    strategies: &[Strategy],
    ids: &[String],
    pairings: &[(usize, usize)],
    matches: &[MatchResult],
) -> Vec<PlayerSummary> {
    let mut standings: Vec<Standing> = strategies
        .iter()
        .zip(ids)
        .map(|(s, id)| Standing::new(id.clone(), s.name()))
        .collect();

    for (result, &(a, b)) in matches.iter().zip(pairings) {
        standings[a].credit(&result.player1);
        standings[b].credit(&result.player2);
        match result.outcome {
            Outcome::Win => standings[a].wins += 1,
            Outcome::Loss => standings[b].wins += 1,
            Outcome::Tie => {}
        }
    }

    let mut players: Vec<PlayerSummary> =
        standings.into_iter().map(Standing::summarize).collect();
    // Stable: equal averages keep registration order
    players.sort_by(|x, y| y.avg_score.total_cmp(&x.avg_score));
    for (i, player) in players.iter_mut().enumerate() {
        player.rank = i + 1;
    }
    players
}
