//! HTTP server.
//!
//! Two routes, each doing one fresh fetch of the collection per request:
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | listing page, always 200 (empty state included) |
//! | `GET /moment/{id}` | detail page (200) or not-found page (404) |
//! | anything else | not-found page (404) |
//!
//! Requests share only immutable state: the config and the content source.
//! Every response carries a `Content-Security-Policy` restricting images to
//! the content source and the configured remote origins.

use crate::config::SiteConfig;
use crate::detail::resolve_detail;
use crate::listing::resolve_listing;
use crate::render::{render_detail, render_listing, render_not_found};
use crate::source::{ContentSource, HttpContentSource, SourceError};
use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, Uri, header},
    response::Html,
    routing::get,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Content source error: {0}")]
    Source(#[from] SourceError),
    #[error("Invalid Content-Security-Policy header: {0}")]
    Header(#[from] header::InvalidHeaderValue),
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<SiteConfig>,
    source: Arc<dyn ContentSource>,
}

impl AppState {
    pub fn new(config: SiteConfig, source: Arc<dyn ContentSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }
}

/// `Content-Security-Policy` value for the configured image origins.
pub fn content_security_policy(config: &SiteConfig) -> String {
    let mut img_src = vec!["'self'".to_string(), "data:".to_string()];
    img_src.extend(config.image_origins());
    format!(
        "default-src 'self'; img-src {}; style-src 'unsafe-inline'",
        img_src.join(" ")
    )
}

/// Build the application router.
pub fn router(state: AppState) -> Result<Router, ServeError> {
    let csp = HeaderValue::from_str(&content_security_policy(&state.config))?;

    Ok(Router::new()
        .route("/", get(listing))
        .route("/moment/:id", get(detail))
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Run the server until interrupted.
pub async fn serve(config: SiteConfig, addr: &str) -> Result<(), ServeError> {
    let source = HttpContentSource::new(
        config.base_url(),
        Duration::from_secs(config.fetch.timeout_secs),
    )?;
    tracing::info!("Reading moments from {}", source.url());

    let app = router(AppState::new(config, Arc::new(source)))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    tracing::info!("Serving moments on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServeError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

// ============================================================================
// Handlers
// ============================================================================

async fn listing(State(state): State<AppState>) -> Html<String> {
    let cards = resolve_listing(state.source.as_ref(), state.config.base_url()).await;
    Html(render_listing(&cards, &state.config).into_string())
}

async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Html<String>) {
    match resolve_detail(state.source.as_ref(), state.config.base_url(), &id).await {
        Some(detail) => (
            StatusCode::OK,
            Html(render_detail(&detail, &state.config).into_string()),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Html(render_not_found(&id, &state.config).into_string()),
        ),
    }
}

async fn not_found(State(state): State<AppState>, uri: Uri) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(render_not_found(uri.path(), &state.config).into_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(source: StubSource) -> Router {
        router(AppState::new(SiteConfig::default(), Arc::new(source))).unwrap()
    }

    async fn get_page(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn collection() -> Vec<crate::types::Moment> {
        vec![
            moment(1, "Nothing yet", vec![]),
            moment(2, "Lake", vec![image("/uploads/lake.jpg", None)]),
            moment(7, "Kites", vec![image("/uploads/kite.jpg", None)]),
        ]
    }

    #[tokio::test]
    async fn listing_shows_cards_for_moments_with_images() {
        let (status, body) = get_page(app(StubSource::ok(collection())), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches(r#"class="moment-card""#).count(), 2);
        assert!(!body.contains("/moment/1"));
        assert!(body.contains("/moment/2"));
    }

    #[tokio::test]
    async fn listing_on_upstream_error_is_empty_state() {
        let (status, body) = get_page(app(StubSource::status(500)), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(&SiteConfig::default().site.empty_message));
    }

    #[tokio::test]
    async fn detail_renders_matching_moment() {
        let (status, body) = get_page(app(StubSource::ok(collection())), "/moment/7").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Kites</h1>"));
        assert!(body.contains(r#"alt="Kites - 1""#));
    }

    #[tokio::test]
    async fn detail_id_with_trailing_text_uses_leading_digits() {
        let (status, body) = get_page(app(StubSource::ok(collection())), "/moment/7abc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Kites</h1>"));
    }

    #[tokio::test]
    async fn unknown_detail_is_404_quoting_id() {
        let (status, body) = get_page(app(StubSource::ok(collection())), "/moment/abc").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("<code>abc</code>"));
    }

    #[tokio::test]
    async fn detail_on_upstream_error_is_404() {
        let (status, _) = get_page(app(StubSource::status(503)), "/moment/7").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unrouted_path_is_404() {
        let (status, body) = get_page(app(StubSource::ok(vec![])), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Oops! (404)"));
    }

    #[tokio::test]
    async fn responses_carry_image_policy() {
        let response = app(StubSource::ok(vec![]))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let csp = response.headers()[header::CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap();
        assert!(csp.contains("img-src 'self' data: http://127.0.0.1:1337"));
    }

    #[test]
    fn policy_lists_remote_origins() {
        let mut config = SiteConfig::default();
        config.images.remote_origins = vec!["https://pub-bucket.r2.dev".to_string()];
        let csp = content_security_policy(&config);
        assert!(csp.contains("http://127.0.0.1:1337 https://pub-bucket.r2.dev;"));
    }
}
