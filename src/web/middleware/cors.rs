//! CORS middleware configuration.

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use super::auth::AUTH_HEADER;

/// Create a CORS layer from configuration.
///
/// With no configured origins every origin is allowed, without credentials.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let parsed_origins: Vec<HeaderValue> =
        origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(Any)
            .allow_origin(Any)
    } else {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([
                HeaderName::from_static(AUTH_HEADER),
                CONTENT_TYPE,
                ACCEPT,
            ])
            .allow_credentials(true)
            .allow_origin(parsed_origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    fn server(origins: &[String]) -> TestServer {
        let app = Router::new()
            .route("/", get(|| async { "OK" }))
            .layer(create_cors_layer(origins));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_any_origin_when_unconfigured() {
        let response = server(&[])
            .get("/")
            .add_header(ORIGIN, "http://example.com")
            .await;

        assert_eq!(
            response.header(ACCESS_CONTROL_ALLOW_ORIGIN),
            HeaderValue::from_static("*")
        );
    }

    #[tokio::test]
    async fn test_configured_origin() {
        let response = server(&["http://localhost:3000".to_string()])
            .get("/")
            .add_header(ORIGIN, "http://localhost:3000")
            .await;

        assert_eq!(
            response.header(ACCESS_CONTROL_ALLOW_ORIGIN),
            HeaderValue::from_static("http://localhost:3000")
        );
    }
}
