use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, error, info, trace};

use crate::config::{redact_credentials, Settings};

/// Apply all pending migrations to the configured database.
pub async fn init_database(database_url: Option<String>) -> Result<()> {
    trace!("Entering init_database function");
    let mut settings = Settings::load()?;
    if let Some(url) = database_url {
        settings.database_url = url;
    }
    let display_url = redact_credentials(&settings.database_url);
    info!("Initializing database");
    debug!("Database URL: {}", display_url);

    let db: DatabaseConnection = match Database::connect(&settings.database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", display_url, e);
            return Err(e.into());
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }

    info!("Database initialization completed successfully!");
    Ok(())
}
