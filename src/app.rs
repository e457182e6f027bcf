use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::json;

use crate::{
    app_state::AppState,
    middleware::observability_middleware,
    modules::{
        enrollments::routes::enrollment_routes, grades::routes::grade_routes,
        me::routes::me_routes,
    },
    telemetry::telemetry_health_check,
};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/enrollments", enrollment_routes())
        .nest("/grades", grade_routes())
        .nest("/me", me_routes());

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(observability_middleware))
        .with_state(state)
}

async fn hello(State(state): State<AppState>) -> String {
    format!("{} says hello!\n", state.env.app.name)
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.env.app.environment.as_str(),
        "services": {
            "database": db_status,
            "telemetry": telemetry_health_check(&state.env.telemetry),
        }
    }))
}
