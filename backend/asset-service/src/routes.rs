/// Route table for asset-service
use actix_web::{web, HttpResponse};

use crate::handlers;
use crate::metrics::metrics_handler;
use crate::middleware::JwtAuthMiddleware;
use crate::state::AppState;

/// Register every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    let auth = JwtAuthMiddleware::new(state.jwt.clone());

    cfg.app_data(web::Data::new(state.clone()))
        .route(
            "/api/v1/health",
            web::get()
                .to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
        )
        .route(
            "/api/v1/health/ready",
            web::get().to(|| async { HttpResponse::Ok().finish() }),
        )
        .route(
            "/api/v1/health/live",
            web::get().to(|| async { HttpResponse::Ok().finish() }),
        )
        .route("/metrics", web::get().to(metrics_handler))
        .route("/assets/{path:.*}", web::get().to(handlers::serve_asset))
        .service(
            web::scope("/api")
                .wrap(auth)
                .route(
                    "/thumbnail_upload/{video_id}",
                    web::post().to(handlers::upload_thumbnail),
                )
                .route(
                    "/video_upload/{video_id}",
                    web::post().to(handlers::upload_video),
                )
                .route("/videos/{video_id}", web::get().to(handlers::get_video)),
        );
}
