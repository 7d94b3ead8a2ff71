use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::load_dotenv;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::run_migrations;
use migration::Migrator;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation so startup failures get a full report
    install_color_eyre();

    load_dotenv();
    let config = Config::from_env()?;

    init_tracing(&config.environment);
    info!(
        app = config.app.name,
        version = config.app.version,
        environment = ?config.environment,
        "Starting up"
    );

    let postgres_future = async {
        database::postgres::connect_from_config_with_retry(config.postgres.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };

    let redis_future = async {
        database::redis::connect_from_config_with_retry(config.redis.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
    };

    let (db, redis) = tokio::try_join!(postgres_future, redis_future)?;

    run_migrations::<Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("{}", e))?;

    let state = AppState { config, db, redis };

    let api_routes = api::routes(&state);

    // /health: liveness, /ready: dependency checks
    let app = create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?
        .merge(health_router())
        .merge(api::ready_router(state.clone()));

    let server_config = state.config.server.clone();

    create_production_app(app, &server_config, async move {
        info!("Shutting down: closing connections");

        tokio::join!(
            async {
                match state.db.close().await {
                    Ok(_) => info!("PostgreSQL connection closed"),
                    Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                }
            },
            async {
                // ConnectionManager closes on drop
                drop(state.redis);
                info!("Redis connection closed");
            }
        );
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shutdown complete");
    Ok(())
}
