pub mod engine;
pub mod extract;
pub mod follow;
pub mod following;
pub mod pipeline;

pub use crate::domain::model::{FollowOutcome, MigrationSummary, SourceUser};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
