pub mod config;
pub mod error;
pub mod types;

pub use config::{MarketConfig, MovementConfig, PopulationConfig, StewardConfig};
pub use error::{Result, StewardError};
pub use types::{AgentId, Direction, ObjectId, Step, Tile, ZoneId};
