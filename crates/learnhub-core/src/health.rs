use axum::http::StatusCode;

/// Handler for `GET /healthz`. Liveness only; services supply their own `readyz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
