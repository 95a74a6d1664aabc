use std::sync::Arc;

use todo_service::{
    create_router,
    db::{create_pool, run_migrations},
    task::{MemoryTaskStore, PgTaskStore, TaskStore},
    user::{MemoryUserStore, PgUserStore, UserStore},
    AppState, Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (tasks, users): (Arc<dyn TaskStore>, Arc<dyn UserStore>) = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let db = create_pool(database_url, config.database_max_connections).await?;

            tracing::info!("Running migrations...");
            run_migrations(&db).await?;

            (
                Arc::new(PgTaskStore::new(db.clone())),
                Arc::new(PgUserStore::new(db)),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, tasks and users are kept in memory only");
            (
                Arc::new(MemoryTaskStore::new()),
                Arc::new(MemoryUserStore::new()),
            )
        }
    };

    let state = AppState::new(&config, tasks, users);
    let app = create_router(state);

    let addr = config.bind_addr();
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
