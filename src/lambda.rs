//! Serverless handler
//!
//! Converts an API Gateway / function-URL proxy event into an HTTP request,
//! runs it through the same summarize route the long-running service uses,
//! and converts the response back into the proxy response shape. Every event
//! is routed to summarize regardless of its path.

use axum::body::{to_bytes, Body};
use axum::http::{HeaderName, HeaderValue, Method, Request};
use axum::response::Response;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::{json, Map, Value};
use tower::ServiceExt;
use tracing::{error, info};

use crate::models::AppState;
use crate::routes::summarize::{self, SUMMARIZE_PATH};
use crate::types::AppError;

/// Router for the single-invocation entry point.
pub fn function_router(state: AppState) -> Router {
    summarize::router(state)
}

#[tracing::instrument(level = "info", skip_all, fields(request_id = %event.context.request_id))]
pub async fn function_handler(app: Router, event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(handle_event(app, event.payload).await)
}

/// Runs one proxy event through `app` and returns the proxy response.
pub async fn handle_event(app: Router, payload: Value) -> Value {
    let request = match into_request(&payload) {
        Ok(request) => request,
        Err(e) => {
            error!("Could not convert event into a request: {}", e);
            return err_response(&e);
        }
    };
    info!(method = %request.method(), "Invocation received");

    let response = match app.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    match into_proxy_response(response).await {
        Ok(value) => value,
        Err(e) => err_response(&e),
    }
}

fn into_request(payload: &Value) -> Result<Request<Body>, AppError> {
    let method = payload
        .pointer("/requestContext/http/method")
        .or_else(|| payload.get("httpMethod"))
        .and_then(Value::as_str)
        .and_then(|m| Method::from_bytes(m.as_bytes()).ok())
        .ok_or(AppError::MethodNotAllowed)?;

    let mut builder = Request::builder().method(method).uri(SUMMARIZE_PATH);

    if let Some(headers) = payload.get("headers").and_then(Value::as_object) {
        for (name, value) in headers {
            let (Ok(name), Some(Ok(value))) = (
                HeaderName::from_bytes(name.as_bytes()),
                value.as_str().map(HeaderValue::from_str),
            ) else {
                continue;
            };
            builder = builder.header(name, value);
        }
    }

    let raw_body = payload.get("body").and_then(Value::as_str).unwrap_or("");
    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let body = if is_base64 {
        STANDARD
            .decode(raw_body)
            .map_err(|e| AppError::Upload(format!("body is not valid base64: {}", e)))?
    } else {
        raw_body.as_bytes().to_vec()
    };

    builder
        .body(Body::from(body))
        .map_err(|e| AppError::Internal(format!("could not build request: {}", e)))
}

async fn into_proxy_response(response: Response) -> Result<Value, AppError> {
    let status = response.status().as_u16();

    let mut headers = Map::new();
    for (name, value) in response.headers() {
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str().to_string(), Value::String(value.to_string()));
        }
    }

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| AppError::Internal(format!("could not read response body: {}", e)))?;

    Ok(json!({
        "statusCode": status,
        "headers": headers,
        "body": String::from_utf8_lossy(&bytes),
        "isBase64Encoded": false,
    }))
}

fn err_response(err: &AppError) -> Value {
    json!({
        "statusCode": err.status_code().as_u16(),
        "headers": { "content-type": "application/json" },
        "body": json!({ "error": err.to_string() }).to_string(),
        "isBase64Encoded": false,
    })
}
