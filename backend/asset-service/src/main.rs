/// Asset Service - HTTP Server
///
/// Accepts thumbnail and video uploads for existing video records.
use actix_web::{middleware as actix_middleware, App, HttpServer};
use asset_service::db::PgVideoRepository;
use asset_service::middleware::MetricsMiddleware;
use asset_service::services::storage::{build_store, LocalAssetStore, S3AssetStore};
use asset_service::services::FfmpegProcessor;
use asset_service::{routes, AppState, Config};
use crypto_core::jwt::JwtValidator;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn other_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{context}: {err}"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Missing .env is fine outside local development
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env().map_err(|e| other_error("Invalid configuration", e))?;
    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    tracing::info!(
        env = %config.app.env,
        thumbnails = %config.storage.thumbnails,
        videos = %config.storage.videos,
        "asset-service starting on {}",
        bind_address
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| other_error("Failed to connect to database", e))?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| other_error("Failed to run migrations", e))?;

    if config.uses_local_storage() {
        LocalAssetStore::new(config.storage.assets_root.clone(), &config.app.public_base_url)
            .ensure_root()
            .await
            .map_err(|e| other_error("Failed to prepare assets root", e))?;
    }

    let s3_store = if config.uses_s3() {
        let store = Arc::new(S3AssetStore::connect(&config.s3).await);
        // Uploads surface S3 failures per request; startup only warns
        if let Err(e) = store.health_check().await {
            tracing::warn!(error = %e, "S3 health check failed");
        }
        Some(store)
    } else {
        None
    };

    let thumbnail_store = build_store(config.storage.thumbnails, &config, s3_store.as_ref())
        .map_err(|e| other_error("Failed to build thumbnail store", e))?;
    let video_store = build_store(config.storage.videos, &config, s3_store.as_ref())
        .map_err(|e| other_error("Failed to build video store", e))?;

    let jwt = JwtValidator::new(&config.auth.jwt_secret, &config.auth.jwt_issuer)
        .map_err(|e| other_error("Failed to initialize JWT validation", e))?;

    let state = AppState {
        media: Arc::new(FfmpegProcessor::from_config(&config.media)),
        videos: Arc::new(PgVideoRepository::new(db_pool)),
        thumbnail_store,
        video_store,
        jwt: Arc::new(jwt),
        config: Arc::new(config),
    };

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(MetricsMiddleware)
            .wrap(actix_middleware::Logger::default())
            .configure(move |cfg| routes::configure(cfg, &state))
    })
    .bind(&bind_address)?
    .run()
    .await
}
