use std::convert::Infallible;

use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::routing::any;
use axum::Router;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, Method, Request};
use http_body_util::{BodyExt, Full};
use pretty_assertions::assert_eq;
use restless_core::{DecodeError, LogicalRequest};
use restless_tower::{Translate, TranslateConfig, TranslateError, TranslatedBody};
use tower::{BoxError, Layer, Service, ServiceBuilder, ServiceExt, service_fn};

const BOUNDARY: &str = "restless-test-boundary";

/// What the inner service got to see.
#[derive(Debug)]
struct Seen {
    method: Method,
    headers: HeaderMap,
    body: Bytes,
    decoded: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn echo() -> impl Service<
    Request<TranslatedBody<Full<Bytes>>>,
    Response = Seen,
    Error = Infallible,
    Future: Send,
> + Clone
+ Send
+ 'static {
    service_fn(|req: Request<TranslatedBody<Full<Bytes>>>| async move {
        let decoded = req.body().is_decoded();
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok::<_, Infallible>(Seen {
            method: parts.method,
            headers: parts.headers,
            body,
            decoded,
        })
    })
}

fn multipart(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn carrier(fields: &[(&str, &str)]) -> Request<Full<Bytes>> {
    let body = multipart(fields);
    Request::post("http://h/r/42")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(CONTENT_LENGTH, body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

async fn translate(config: TranslateConfig, request: Request<Full<Bytes>>) -> Result<Seen, BoxError> {
    Translate::new(config).layer(echo()).oneshot(request).await
}

fn rejection(error: &BoxError) -> &TranslateError {
    error.downcast_ref::<TranslateError>().unwrap()
}

#[tokio::test]
async fn tunneled_get_with_authorization() {
    let envelope = LogicalRequest::get("http://h/r/42")
        .header("Authorization", "Bearer T")
        .to_envelope()
        .unwrap();
    let config = TranslateConfig {
        lowercase_headers: true,
        ..Default::default()
    };

    let seen = translate(config, carrier(&envelope.fields())).await.unwrap();

    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.headers[AUTHORIZATION], "Bearer T");
    assert!(seen.headers.get(CONTENT_LENGTH).is_none());
    assert!(seen.decoded);
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn round_trip_preserves_method_headers_and_body() {
    init_tracing();

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::HEAD] {
        let carries_body = method == Method::POST || method == Method::PUT;
        let envelope = LogicalRequest::new(method.clone(), "http://h/r/42")
            .header("X-Test", "a: b")
            .header("Content-Type", "application/json")
            .body(serde_json::json!({"n": 1}))
            .to_envelope()
            .unwrap();

        let seen = translate(TranslateConfig::default(), carrier(&envelope.fields()))
            .await
            .unwrap();

        assert_eq!(seen.method, method);
        assert_eq!(seen.headers["x-test"], "a: b");
        assert_eq!(seen.headers[CONTENT_TYPE], "application/json");
        if carries_body {
            assert_eq!(seen.body, Bytes::from_static(br#"{"n":1}"#));
            assert_eq!(seen.headers[CONTENT_LENGTH], "7");
        } else {
            assert!(seen.body.is_empty(), "{method} must not carry a body");
            assert!(seen.headers.get(CONTENT_LENGTH).is_none());
        }
    }
}

#[tokio::test]
async fn tunneled_header_overrides_carrier_header() {
    let mut request = carrier(&[("method", "GET"), ("header", "Authorization: Bearer T")]);
    request
        .headers_mut()
        .insert(AUTHORIZATION, "Bearer carrier".parse().unwrap());

    let seen = translate(TranslateConfig::default(), request).await.unwrap();

    let values: Vec<_> = seen.headers.get_all(AUTHORIZATION).iter().collect();
    assert_eq!(values, vec!["Bearer T"]);
}

#[tokio::test]
async fn repeated_header_fields_last_one_wins() {
    let request = carrier(&[
        ("header", "X-Trace: one"),
        ("method", "DELETE"),
        ("header", "X-Trace: two"),
    ]);

    let seen = translate(TranslateConfig::default(), request).await.unwrap();

    assert_eq!(seen.method, Method::DELETE);
    assert_eq!(seen.headers["x-trace"], "two");
}

#[tokio::test]
async fn plain_json_post_passes_through() {
    let request = Request::post("http://h/items")
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(br#"{"a":1}"#)))
        .unwrap();

    let seen = translate(TranslateConfig::default(), request).await.unwrap();

    assert_eq!(seen.method, Method::POST);
    assert!(!seen.decoded);
    assert_eq!(seen.body, Bytes::from_static(br#"{"a":1}"#));
}

#[tokio::test]
async fn multipart_put_is_not_a_tunnel() {
    let mut request = carrier(&[("method", "GET")]);
    *request.method_mut() = Method::PUT;

    let seen = translate(TranslateConfig::default(), request).await.unwrap();

    assert_eq!(seen.method, Method::PUT);
    assert!(!seen.decoded);
}

#[tokio::test]
async fn missing_method_is_rejected() {
    let request = carrier(&[("header", "Authorization: Bearer T")]);

    let error = translate(TranslateConfig::default(), request).await.unwrap_err();

    assert!(matches!(
        rejection(&error),
        TranslateError::Decode(DecodeError::MissingMethod)
    ));
    assert_eq!(rejection(&error).status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_boundary_is_rejected() {
    let request = Request::post("http://h/r")
        .header(CONTENT_TYPE, "multipart/form-data")
        .body(Full::new(Bytes::from(multipart(&[("method", "GET")]))))
        .unwrap();

    let error = translate(TranslateConfig::default(), request).await.unwrap_err();

    assert!(matches!(rejection(&error), TranslateError::MissingBoundary));
}

#[tokio::test]
async fn malformed_multipart_is_rejected() {
    let request = Request::post("http://h/r")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Full::new(Bytes::from_static(b"definitely not a form")))
        .unwrap();

    let error = translate(TranslateConfig::default(), request).await.unwrap_err();

    assert!(matches!(rejection(&error), TranslateError::Multipart(_)));
    assert_eq!(rejection(&error).status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_form_is_rejected() {
    let config = TranslateConfig {
        max_form_bytes: Some(16),
        ..Default::default()
    };
    let request = carrier(&[("method", "POST"), ("body", &"x".repeat(256))]);

    let error = translate(config, request).await.unwrap_err();

    assert_eq!(rejection(&error).status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[test]
fn config_from_yaml() {
    let config: TranslateConfig = serde_saphyr::from_str("lowercase_headers: true").unwrap();
    assert_eq!(
        config,
        TranslateConfig {
            lowercase_headers: true,
            max_form_bytes: None,
        }
    );

    let config: TranslateConfig = serde_saphyr::from_str("{}").unwrap();
    assert_eq!(config, TranslateConfig::default());
}

mod axum_app {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn handle_rejection(error: BoxError) -> (StatusCode, String) {
        match error.downcast_ref::<TranslateError>() {
            Some(error) => (error.status_code(), error.to_string()),
            None => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
        }
    }

    async fn describe(method: Method, headers: HeaderMap, body: String) -> String {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        format!("{method} {authorization} {body}")
    }

    fn app() -> Router {
        Router::new().route("/r/{id}", any(describe)).layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_rejection))
                .layer(Translate::new(TranslateConfig::default())),
        )
    }

    async fn send(request: Request<Body>) -> (StatusCode, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn form(fields: &[(&str, &str)]) -> Request<Body> {
        Request::post("/r/42")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart(fields)))
            .unwrap()
    }

    #[tokio::test]
    async fn handler_sees_the_tunneled_request() {
        let (status, body) = send(form(&[
            ("method", "PUT"),
            ("header", "Authorization: Bearer T"),
            ("body", r#"{"done":true}"#),
        ]))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"PUT Bearer T {"done":true}"#);
    }

    #[tokio::test]
    async fn rejection_becomes_bad_request() {
        let (status, body) = send(form(&[("header", "Authorization: Bearer T")])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "tunneled request has no `method` field");
    }

    #[tokio::test]
    async fn ordinary_requests_are_untouched() {
        let request = Request::get("/r/42")
            .header(AUTHORIZATION, "Bearer plain")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "GET Bearer plain ");
    }
}
