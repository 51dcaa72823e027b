//! Security response headers

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Adds hardening headers to every response
///
/// Served images get an image-friendly policy and stay cacheable; API
/// responses are never cached.
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let is_static = request.uri().path().starts_with("/images");
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    let csp = if is_static {
        "default-src 'none'; img-src 'self'; frame-ancestors 'none'"
    } else {
        "default-src 'none'; frame-ancestors 'none'"
    };
    headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static(csp));

    if !is_static && !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/user/getAll", get(|| async { "ok" }))
            .route("/images/a.png", get(|| async { "png" }))
            .layer(middleware::from_fn(security_headers_middleware))
    }

    async fn headers_for(path: &str) -> axum::http::HeaderMap {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().headers().clone()
    }

    #[tokio::test]
    async fn test_api_headers() {
        let headers = headers_for("/user/getAll").await;

        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[header::CONTENT_SECURITY_POLICY], "default-src 'none'; frame-ancestors 'none'");
        assert!(headers.contains_key(header::CACHE_CONTROL));
    }

    #[tokio::test]
    async fn test_image_headers() {
        let headers = headers_for("/images/a.png").await;

        assert!(headers[header::CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap()
            .contains("img-src 'self'"));
        assert!(!headers.contains_key(header::CACHE_CONTROL));
    }
}
