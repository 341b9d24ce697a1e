// Domain-level errors for arena operations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("player {0} is already in the arena")]
    DuplicatePlayer(u64),
    #[error("player {0} is not in the arena")]
    UnknownPlayer(u64),
    #[error("player {0} is AI-controlled and cannot be removed")]
    AiPlayer(u64),
    #[error("unknown ship type {0:?}")]
    UnknownShipType(String),
    #[error("unknown intent token {0:?}")]
    UnknownIntent(String),
    #[error("no free cell found after {attempts} spawn attempts")]
    NoSpawnPoint { attempts: usize },
    #[error("invalid arena config: {0}")]
    InvalidConfig(String),
}
