//! Level Up Back binary entrypoint wiring configuration, storage and the REST layer.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use levelup_back::{
    config::AppConfig,
    dao::store::memory::MemoryStore,
    routes,
    services::directory_service::seed_directories,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new();

    match env::var("MONGO_URI").ok().filter(|uri| !uri.trim().is_empty()) {
        Some(uri) => spawn_mongo_supervisor(app_state.clone(), config, uri).await?,
        None => {
            info!("MONGO_URI not set; using in-memory storage");
            install_memory_store(&app_state, &config).await?;
        }
    }

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

async fn install_memory_store(state: &SharedState, config: &AppConfig) -> anyhow::Result<()> {
    let store = MemoryStore::new();
    seed_directories(&store, config)
        .await
        .context("seeding in-memory directories")?;
    state.set_store(Arc::new(store)).await;
    Ok(())
}

/// Hand the MongoDB connection over to the storage supervisor, which seeds the directories
/// on every successful connect.
#[cfg(feature = "mongo-store")]
async fn spawn_mongo_supervisor(
    state: SharedState,
    config: AppConfig,
    uri: String,
) -> anyhow::Result<()> {
    use levelup_back::{
        dao::{
            storage::StorageError,
            store::{
                LevelUpStore,
                mongodb::{MongoConfig, MongoStore},
            },
        },
        services::storage_supervisor,
    };

    let db_name = env::var("MONGO_DB").ok();
    let mongo_config = MongoConfig::from_uri(&uri, db_name.as_deref())
        .await
        .context("parsing MONGO_URI")?;
    info!(database = %mongo_config.database_name, "using MongoDB storage");

    tokio::spawn(storage_supervisor::run(state, move || {
        let mongo_config = mongo_config.clone();
        let config = config.clone();
        async move {
            let store = MongoStore::connect(mongo_config).await?;
            seed_directories(&store, &config).await?;
            Ok::<_, StorageError>(Arc::new(store) as Arc<dyn LevelUpStore>)
        }
    }));

    Ok(())
}

#[cfg(not(feature = "mongo-store"))]
async fn spawn_mongo_supervisor(
    state: SharedState,
    config: AppConfig,
    _uri: String,
) -> anyhow::Result<()> {
    tracing::warn!(
        "MONGO_URI is set but the mongo-store feature is disabled; using in-memory storage"
    );
    install_memory_store(&state, &config).await
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
