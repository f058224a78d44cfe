//! Task market: per-zone job boards rebuilt every step

pub mod affinity;
pub mod board;
pub mod job;
pub mod publish;

pub use affinity::{qualifies, role_affinity};
pub use board::TaskMarket;
pub use job::{Job, JobRef, JobType, TargetRef};
pub use publish::{JobPublisher, ZonePublisher};
