use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{HealthDependencyStatus, HealthResponse};
use crate::state::AppState;

mod checks;

use checks::{check_postgres, check_redis};

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let postgres = check_postgres(state.postgres_pool.clone()).await;
    let redis = check_redis(state.redis_client.clone()).await;

    let ready = is_healthy(&postgres) && is_healthy(&redis);
    let status = if ready { "ok" } else { "degraded" };
    let http_status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            ready,
            postgres,
            redis,
        }),
    )
}

fn is_healthy(dependency: &HealthDependencyStatus) -> bool {
    dependency.status == "ok"
}
