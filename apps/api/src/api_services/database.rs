use catalog_core::AppError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::ApiConfig;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../crates/infrastructure/migrations");

/// Opens the product database pool and applies pending migrations.
pub async fn connect_and_migrate(config: &ApiConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.database_acquire_timeout)
        .connect(config.database_url.as_str())
        .await
        .map_err(|error| AppError::Unavailable(format!("failed to connect to database: {error}")))?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;
    info!(
        migrations = MIGRATOR.iter().count(),
        max_connections = config.database_max_connections,
        "product database ready"
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::MIGRATOR;

    #[test]
    fn products_migration_is_embedded() {
        assert!(
            MIGRATOR
                .iter()
                .any(|migration| migration.version == 1
                    && migration.description == "create products")
        );
    }
}
