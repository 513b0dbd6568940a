use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::error::{ApiError, ErrorBody};

/// Logs failed requests and rewrites error responses produced outside the handlers
/// (method mismatch, unmatched path, extractor rejections) into the JSON envelope.
pub async fn json_error_envelope(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    } else {
        return response;
    }

    if is_json(&response) {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut envelope = match ApiError::from_status(status) {
        Some(error) => error.into_response(),
        None => (status, Json(ErrorBody::for_status(status))).into_response(),
    };
    if let Some(allow) = allow {
        envelope.headers_mut().insert(header::ALLOW, allow);
    }
    envelope
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    async fn teapot_handler() -> StatusCode {
        StatusCode::IM_A_TEAPOT
    }

    async fn enveloped_handler() -> ApiError {
        ApiError::Unprocessable
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(ok_handler))
            .route("/teapot", get(teapot_handler))
            .route("/enveloped", get(enveloped_handler))
            .layer(axum::middleware::from_fn(json_error_envelope))
    }

    async fn call(method: &str, uri: &str) -> (StatusCode, Response) {
        let request = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = create_test_router().oneshot(request).await.unwrap();
        (response.status(), response)
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ok_response_is_untouched() {
        let (status, response) = call("GET", "/ok").await;
        assert_eq!(status, StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn method_mismatch_gets_envelope_and_allow_header() {
        let (status, response) = call("POST", "/ok").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(header::ALLOW));
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 405);
        assert_eq!(body["message"], "method not allowed");
    }

    #[tokio::test]
    async fn unmatched_path_gets_not_found_envelope() {
        let (status, response) = call("GET", "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["message"], "resource not found");
    }

    #[tokio::test]
    async fn unknown_status_keeps_its_code() {
        let (status, response) = call("GET", "/teapot").await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
        assert_eq!(json_body(response).await["error"], 418);
    }

    #[tokio::test]
    async fn handler_envelopes_pass_through() {
        let (status, response) = call("GET", "/enveloped").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["message"], "unprocessable");
    }
}
