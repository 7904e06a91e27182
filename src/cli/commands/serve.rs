use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace, warn};

use crate::auth::SeaOrmSessionStore;
use crate::config::{initialize_app_state, Settings};
use crate::router::create_router;

pub async fn serve(database_url: Option<String>, bind_address: Option<String>) -> Result<()> {
    trace!("Entering serve function");
    let mut settings = Settings::load()?;
    if let Some(url) = database_url {
        settings.database_url = url;
    }
    if let Some(address) = bind_address {
        settings.bind_address = address;
    }
    info!("Work-study job board starting up ({})", settings.app_env);
    debug!("Bind address: {}", settings.bind_address);

    let state = match initialize_app_state(&settings).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    trace!("Applying pending migrations");
    Migrator::up(&state.db, None).await?;

    match SeaOrmSessionStore::new(state.db.clone()).delete_expired().await {
        Ok(removed) => debug!("Pruned {} expired sessions", removed),
        Err(e) => warn!("Failed to prune expired sessions: {}", e),
    }

    tokio::fs::create_dir_all(&state.upload_dir).await?;
    debug!("Upload directory: {}", state.upload_dir.display());

    let app = create_router(state, &settings)?;
    debug!("Router created successfully");

    let listener = match TcpListener::bind(&settings.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", settings.bind_address, e);
            return Err(e.into());
        }
    };

    info!("Job board API running on http://{}", settings.bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", settings.bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
