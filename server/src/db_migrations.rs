use std::path::Path;

use sqlx_core::migrate::{MigrateError, Migrator};
use tracing::info;

const WORKSPACE_MIGRATIONS_DIR: &str = "server/migrations";
const CRATE_MIGRATIONS_DIR: &str = "./migrations";

/// Resolve the migrations directory whether launched from the workspace root or the crate.
fn migrations_path() -> &'static Path {
    let workspace_path = Path::new(WORKSPACE_MIGRATIONS_DIR);
    if workspace_path.is_dir() {
        return workspace_path;
    }
    Path::new(CRATE_MIGRATIONS_DIR)
}

pub async fn run(pool: &sqlx::PgPool) -> Result<(), MigrateError> {
    let path = migrations_path();
    let migrator = Migrator::new(path).await?;
    info!(
        path = %path.display(),
        migrations = migrator.iter().count(),
        "applying profile store migrations"
    );
    migrator.run(pool).await
}
