use actix_web::{http::StatusCode, HttpResponse};
use ecocity_snake_core::StoreError;

pub(crate) fn json_error_with_code(
    status: StatusCode,
    message: impl Into<String>,
    error_code: Option<&str>,
) -> HttpResponse {
    let mut body = serde_json::json!({
        "success": false,
        "error": message.into(),
    });
    if let Some(code) = error_code {
        body["error_code"] = serde_json::Value::String(code.to_string());
    }
    HttpResponse::build(status).json(body)
}

/// Log a store failure and answer with a generic 500; details stay in the log.
pub(crate) fn store_error(context: &str, err: &StoreError) -> HttpResponse {
    tracing::error!("{context} failed: {err}");
    json_error_with_code(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store error",
        Some("internal_error"),
    )
}
