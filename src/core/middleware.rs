//! 核心中间件模块

use std::time::Instant;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::{debug, info};

/// JSON 请求体的最大缓冲字节数
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

/// JSON 中间件对请求体的处理结果，作为请求扩展传给下游
#[derive(Debug, Clone, PartialEq)]
pub enum JsonBody {
    Parsed(Value),
    Empty,
    Malformed,
    TooLarge,
}

impl JsonBody {
    pub fn value(&self) -> Option<&Value> {
        match self {
            JsonBody::Parsed(value) => Some(value),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JsonBody::Parsed(_) => "parsed",
            JsonBody::Empty => "empty",
            JsonBody::Malformed => "malformed",
            JsonBody::TooLarge => "too_large",
        }
    }
}

/// 请求日志中间件，需放在 [`json_body_middleware`] 内层以读取 [`JsonBody`]
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let json_body = req
        .extensions()
        .get::<JsonBody>()
        .map(JsonBody::label)
        .unwrap_or("none");

    let response = next.run(req).await;

    info!(
        %method,
        path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        json_body,
        "请求完成"
    );

    response
}

/// 宽松的 JSON 请求体中间件
///
/// 仅处理声明了 `application/json` 的请求。解析失败只记录 debug 日志，
/// 请求照常进入处理器。
pub async fn json_body_middleware(req: Request, next: Next) -> Response {
    if !is_json(req.headers()) {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();

    let (body, outcome) = match to_bytes(body, JSON_BODY_LIMIT).await {
        Ok(bytes) => {
            let outcome = parse_json(&bytes);
            (Body::from(bytes), outcome)
        }
        Err(err) => {
            debug!(error = %err, "读取 JSON 请求体失败，已忽略");
            (Body::empty(), JsonBody::TooLarge)
        }
    };

    parts.extensions.insert(outcome);
    next.run(Request::from_parts(parts, body)).await
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

fn parse_json(bytes: &Bytes) -> JsonBody {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return JsonBody::Empty;
    }

    match serde_json::from_slice(bytes) {
        Ok(value) => JsonBody::Parsed(value),
        Err(err) => {
            debug!(error = %err, "JSON 请求体格式错误，已忽略");
            JsonBody::Malformed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header::HeaderValue, Request, StatusCode},
        middleware,
        routing::post,
        Extension, Json, Router,
    };
    use serde_json::json;
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use tower::ServiceExt;

    async fn inspect(outcome: Option<Extension<JsonBody>>, body: Bytes) -> Json<Value> {
        let (label, value) = match outcome {
            None => ("absent", Value::Null),
            Some(Extension(outcome)) => (
                outcome.label(),
                outcome.value().cloned().unwrap_or_default(),
            ),
        };
        Json(json!({ "outcome": label, "value": value, "body_len": body.len() }))
    }

    fn app() -> Router {
        Router::new()
            .route("/", post(inspect))
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(middleware::from_fn(json_body_middleware))
    }

    async fn send(content_type: Option<&str>, body: impl Into<Body>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let response = app()
            .oneshot(builder.body(body.into()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn test_valid_json_is_parsed_and_body_preserved() {
        let (status, body) = send(Some("application/json"), r#"{"a":1}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "parsed");
        assert_eq!(body["value"], json!({"a": 1}));
        assert_eq!(body["body_len"], 7);
    }

    #[tokio::test]
    async fn test_malformed_json_is_ignored() {
        let (status, body) = send(Some("application/json; charset=utf-8"), "{not json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "malformed");
        assert_eq!(body["value"], Value::Null);
        assert_eq!(body["body_len"], 9);
    }

    #[tokio::test]
    async fn test_empty_json_body_is_ignored() {
        let (status, body) = send(Some("application/json"), Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "empty");

        let (_, body) = send(Some("application/json"), "  \n").await;
        assert_eq!(body["outcome"], "empty");
    }

    #[tokio::test]
    async fn test_oversized_body_is_dropped() {
        let big = vec![b' '; JSON_BODY_LIMIT + 1];
        let (status, body) = send(Some("application/json"), big).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "too_large");
        assert_eq!(body["body_len"], 0);
    }

    #[tokio::test]
    async fn test_non_json_requests_pass_through() {
        let (status, body) = send(Some("text/plain"), "{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "absent");

        let (_, body) = send(None, "{}").await;
        assert_eq!(body["outcome"], "absent");
    }

    #[tokio::test]
    async fn test_request_log_records_json_body_outcome() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        send(Some("application/json"), "{broken").await;
        send(None, "{}").await;

        let output = logs.contents();
        assert!(output.contains("请求完成"), "{output}");
        assert!(output.contains("malformed"), "{output}");
        assert!(output.contains("none"), "{output}");
        assert!(output.contains("status=200"), "{output}");
    }

    #[test]
    fn test_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("Application/JSON"));
        assert!(is_json(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/jsonp"));
        assert!(!is_json(&headers));
    }
}
