mod cors;

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use logdesk_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let client_routes = Router::new()
        .route("/api/logs", get(handlers::logs::list_logs_handler))
        .route("/api/logs/upload", post(handlers::logs::upload_logs_handler))
        .route("/api/logs/grouped", get(handlers::logs::grouped_logs_handler))
        .route("/api/logs/stats", get(handlers::logs::log_stats_handler))
        .route(
            "/api/logs/{cabinet_name}/{log_id}/state",
            put(handlers::logs::update_log_state_handler),
        )
        .route(
            "/api/view/show-processed",
            put(handlers::view::set_show_processed_handler),
        )
        .route("/api/view/refresh", post(handlers::view::refresh_handler))
        .route("/api/cabinets", get(handlers::cabinets::list_cabinets_handler))
        .route(
            "/api/cabinets/sessions",
            get(handlers::cabinets::list_work_sessions_handler),
        )
        .route(
            "/api/cabinets/{cabinet_name}/work",
            post(handlers::cabinets::start_work_handler)
                .delete(handlers::cabinets::end_work_handler),
        )
        .layer(from_fn(middleware::resolve_client));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(client_routes)
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
