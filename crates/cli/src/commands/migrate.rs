//! Run document-table migrations against the postgres backend.

use tracing::info;

use pampa_backend::postgres;

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = pampa_backend::database_url_from_env()?;
    let pool = postgres::create_pool(&database_url).await?;
    info!("Connected to database");

    postgres::run_migrations(&pool).await?;
    info!("Migrations applied");

    Ok(())
}
