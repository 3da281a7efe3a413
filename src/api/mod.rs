pub mod emergency_contacts;
pub mod extract;
pub mod health;
pub mod help_requests;
pub mod middleware;
pub mod relief_supplies;
pub mod rescue_operations;
pub mod volunteers;

use axum::{http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::auth::Identity;

/// Fills the request span with what the handler is doing.
pub(crate) fn trace_action(
    table: &str,
    action: &str,
    record_id: Option<i32>,
    identity: Option<&Extension<Identity>>,
) {
    let span = tracing::Span::current();
    span.record("table", table).record("action", action);
    if let Some(id) = record_id {
        span.record("record_id", id);
    }
    if let Some(Extension(identity)) = identity {
        span.record("user_id", identity.subject.as_str());
    }
}

pub(crate) fn deleted(label: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "message": format!("{label} deleted successfully") })),
    )
}
