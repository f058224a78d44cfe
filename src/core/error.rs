use thiserror::Error;

use crate::core::types::{AgentId, ObjectId, Tile, ZoneId};

#[derive(Error, Debug)]
pub enum StewardError {
    #[error("Zone not found: {0}")]
    UnknownZone(ZoneId),

    #[error("Agent not found: {0}")]
    UnknownAgent(AgentId),

    #[error("Spawn {spawn:?} rejected request: {reason}")]
    SpawnRejected { spawn: ObjectId, reason: String },

    #[error("Move of {agent} to {to} rejected: {reason}")]
    MoveRejected {
        agent: AgentId,
        to: Tile,
        reason: String,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StewardError>;
