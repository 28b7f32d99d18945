//! Tournament engine for the Iterated Prisoner's Dilemma
//!
//! Plays round-robin tournaments between built-in strategies, with optional
//! noise, and produces a serializable result for persistence and export
//! layers to consume.
//!
//! ```no_run
//! use tournament_engine::{Strategy, Tournament, TournamentConfig};
//!
//! let config = TournamentConfig::default()
//!     .with_strategies(Strategy::classic_roster())
//!     .with_noise(0.02)
//!     .with_seed(7);
//! let mut tournament = Tournament::new(config)?;
//! let result = tournament.run()?;
//! println!("{}", result.to_json()?);
//! # Ok::<(), tournament_engine::Error>(())
//! ```

mod config;
mod error;
mod game;
mod pairing;
mod payoff;
mod player;
mod random;
mod strategy;
mod tournament;

pub use config::TournamentConfig;
pub use error::{Error, Result};
pub use game::{Match, MatchResult, Outcome, PlayerRecord};
pub use pairing::{calculate_match_count, generate_all_pairings, matches_per_player};
pub use payoff::{Action, Game, Payoffs};
pub use player::Player;
pub use random::{entropy_seed, match_rng};
pub use strategy::Strategy;
pub use tournament::{PlayerSummary, Tournament, TournamentMeta, TournamentResult};
