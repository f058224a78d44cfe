//! Movement: path search, per-agent path caches, and once-per-step conflict resolution

pub mod coordinator;
pub mod path_cache;
pub mod pathfinding;

pub use coordinator::{Backoff, MoveCommand, MoveIntent, MovementCoordinator, Resolution};
pub use path_cache::{MovementState, PathFingerprint};
pub use pathfinding::{find_path, path_cost};
