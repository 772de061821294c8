//! Sync command - runs one reconciliation pass and exits

use tracing::info;

use super::{bootstrap, GlobalArgs};
use crate::infrastructure::services::SyncService;

/// Run a single pass. Any failure turns into a non-zero exit code.
pub async fn run(global: &GlobalArgs) -> anyhow::Result<()> {
    let config = bootstrap(global)?;
    let service = SyncService::from_config(&config)?;

    let report = service.run().await?;

    info!(
        orgs = report.orgs().len(),
        teams_converged = report.teams_converged(),
        teams_created = report.teams_created(),
        "Sync finished"
    );

    Ok(())
}
