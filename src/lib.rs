pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::storage::LocalStorage;
pub use adapters::twitter::TwitterClient;
pub use config::CliConfig;
pub use core::engine::{MigrationEngine, RunOptions, RunReport};
pub use core::pipeline::MigrationPipeline;
pub use utils::error::{MigrateError, Result};
