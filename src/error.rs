use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingError {
    #[error("unknown sort key '{0}' (expected win-rate, volume, signals or members)")]
    UnknownSortKey(String),
}
