//! Error types for the tournament engine

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while configuring, running or querying a tournament
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid payoffs: {inequality} does not hold")]
    InvalidPayoffs { inequality: &'static str },

    #[error("noise must be in [0, 1), got {noise}")]
    InvalidNoise { noise: f64 },

    #[error("cooperation probability must be in [0, 1], got {probability}")]
    InvalidProbability { probability: f64 },

    #[error("no strategies in tournament")]
    EmptyRoster,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize result: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("tournament has not been run yet")]
    NotRun,

    #[error("strategy '{name}' not found in tournament")]
    StrategyNotFound { name: String },

    #[error("no matches found between '{first}' and '{second}'")]
    NoHeadToHead { first: String, second: String },
}

impl Error {
    /// Invalid payoffs, noise, probabilities, roster or config document
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidPayoffs { .. }
                | Error::InvalidNoise { .. }
                | Error::InvalidProbability { .. }
                | Error::EmptyRoster
                | Error::Json(_)
        )
    }

    /// A query named a strategy (or pair) that never played
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::StrategyNotFound { .. } | Error::NoHeadToHead { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(Error::EmptyRoster.is_configuration());
        assert!(Error::InvalidNoise { noise: 1.0 }.is_configuration());
        assert!(!Error::NotRun.is_configuration());
        assert!(!Error::NotRun.is_not_found());

        let missing = Error::StrategyNotFound { name: "Tester".into() };
        assert!(missing.is_not_found());
        assert!(!missing.is_configuration());
    }

    #[test]
    fn test_serialize_failure_is_not_configuration() {
        let cause = || serde_json::from_str::<u32>("oops").unwrap_err();
        assert!(Error::Json(cause()).is_configuration());

        let err = Error::Serialize(cause());
        assert!(!err.is_configuration());
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("failed to serialize result"));
    }

    #[test]
    fn test_messages_name_the_problem() {
        let err = Error::InvalidPayoffs { inequality: "2R > T + S" };
        assert_eq!(err.to_string(), "invalid payoffs: 2R > T + S does not hold");

        let err = Error::NoHeadToHead {
            first: "TitForTat".into(),
            second: "Grudger".into(),
        };
        assert_eq!(
            err.to_string(),
            "no matches found between 'TitForTat' and 'Grudger'"
        );
    }
}
