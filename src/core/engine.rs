use crate::domain::model::MigrationSummary;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// File with a JSON array of pre-resolved handles, bypassing the
    /// Twitter fetch and handle extraction entirely.
    pub to_follow: Option<String>,
    /// Print the resolved handles instead of following them.
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum RunReport {
    DryRun(Vec<String>),
    Migrated(MigrationSummary),
}

pub struct MigrationEngine<P: Pipeline> {
    pipeline: P,
    options: RunOptions,
}

impl<P: Pipeline> MigrationEngine<P> {
    pub fn new(pipeline: P, options: RunOptions) -> Self {
        Self { pipeline, options }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let handles = match &self.options.to_follow {
            Some(path) => {
                tracing::info!("Loading Mastodon handles from {}", path);
                let data = std::fs::read(path)?;
                serde_json::from_slice(&data)?
            }
            None => {
                tracing::info!("Fetching Twitter following list...");
                let users = self.pipeline.extract().await?;
                tracing::info!("Fetched {} Twitter users", users.len());

                let handles = self.pipeline.transform(users).await?;
                tracing::info!("Found {} embedded Mastodon handles", handles.len());
                handles
            }
        };

        if self.options.dry_run {
            return Ok(RunReport::DryRun(handles));
        }

        let summary = self.pipeline.load(handles).await?;
        tracing::info!("Migration finished: {}", summary);
        Ok(RunReport::Migrated(summary))
    }
}
