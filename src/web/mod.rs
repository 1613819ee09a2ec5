//! HTTP surface.
//!
//! ```text
//! GET  /                 landing form            ┐
//! POST /                 link → 303 /video/{id}  │ behind require_access
//! GET  /video/:id        session page            ┘
//! GET  /access           gate page
//! POST /access           check code → cookie + 303 /
//! GET  /api/transcript   filtered transcript JSON
//! GET  /api/health       liveness
//! ```

pub mod handlers;
pub mod pages;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::access::{require_access, AccessGate};
use crate::config::AppConfig;
use crate::transcript::TranscriptBridge;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gate: Arc<AccessGate>,
    pub bridge: TranscriptBridge,
}

impl AppState {
    pub fn new(config: AppConfig, bridge: TranscriptBridge) -> Self {
        let gate = Arc::new(AccessGate::from_config(&config.access));
        Self {
            config: Arc::new(config),
            gate,
            bridge,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::landing).post(handlers::submit_link))
        .route(
            "/access",
            get(handlers::access_page).post(handlers::submit_access),
        )
        .route("/video/:id", get(handlers::video_page))
        .route("/api/transcript", get(handlers::transcript))
        .route("/api/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.gate),
            require_access,
        ))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{MockTranscriptProvider, TranscriptError};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    const MARKER: &str = "hasAccess=true";

    fn app_with(provider: Arc<MockTranscriptProvider>) -> Router {
        let config = AppConfig::default();
        let bridge = TranscriptBridge::new(provider, &config.transcript.language);
        build_router(AppState::new(config, bridge))
    }

    fn app() -> Router {
        app_with(Arc::new(MockTranscriptProvider::ok(&[Some("hello")])))
    }

    async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    // ---- gate --------------------------------------------------------------

    #[tokio::test]
    async fn correct_code_sets_cookie_and_redirects_home() {
        let res = send(app(), post_form("/access", "access_code=cc%40Demo2025", None)).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");
        assert_eq!(
            res.headers()[header::SET_COOKIE],
            "hasAccess=true; Path=/; Max-Age=86400"
        );
    }

    #[tokio::test]
    async fn wrong_code_rerenders_gate_without_cookie() {
        let res = send(app(), post_form("/access", "access_code=wrong", None)).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
        assert!(body_string(res).await.contains("Invalid access code"));
    }

    #[tokio::test]
    async fn pages_need_the_marker() {
        for uri in ["/", "/video/XYZ?name=Ann"] {
            let res = send(app(), get(uri, None)).await;
            assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(res.headers()[header::LOCATION], "/access");
        }
        let res = send(app(), get("/", Some(MARKER))).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn gate_and_api_are_open() {
        assert_eq!(send(app(), get("/access", None)).await.status(), StatusCode::OK);
        let res = send(app(), get("/api/health", None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!({"status": "ok"}));
    }

    // ---- landing / session -------------------------------------------------

    #[tokio::test]
    async fn landing_redirects_to_session_route() {
        let body = "link=https%3A%2F%2Fyoutu.be%2FXYZ&name=Ann";
        let res = send(app(), post_form("/", body, Some(MARKER))).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/video/XYZ?name=Ann");
    }

    #[tokio::test]
    async fn landing_defaults_blank_name() {
        let body = "link=https%3A%2F%2Fyoutu.be%2FXYZ&name=";
        let res = send(app(), post_form("/", body, Some(MARKER))).await;
        assert_eq!(res.headers()[header::LOCATION], "/video/XYZ?name=Guest");
    }

    #[tokio::test]
    async fn landing_rejects_bad_link_inline() {
        let res = send(app(), post_form("/", "link=nonsense&name=Ann", Some(MARKER))).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_string(res).await.contains("Invalid YouTube URL"));
    }

    #[tokio::test]
    async fn session_page_renders_identity() {
        let res = send(app(), get("/video/XYZ?name=Ann%20Lee", Some(MARKER))).await;

        assert_eq!(res.status(), StatusCode::OK);
        let html = body_string(res).await;
        assert!(html.contains("Hi Ann Lee!"));
        assert!(html.contains("https://www.youtube.com/embed/XYZ?"));
    }

    #[tokio::test]
    async fn session_route_decodes_name_with_query_extractor() {
        let res = send(app(), get("/video/XYZ?name=Jos%C3%A9+M", Some(MARKER))).await;
        assert!(body_string(res).await.contains("Hi José M!"));

        let res = send(app(), get("/video/XYZ?name=Ann+%26+Bob%3F", Some(MARKER))).await;
        assert!(body_string(res).await.contains("Hi Ann &amp; Bob?!"));
    }

    #[tokio::test]
    async fn session_route_falls_back_to_guest() {
        for uri in ["/video/XYZ", "/video/XYZ?name=", "/video/XYZ?name=a&name=b"] {
            let res = send(app(), get(uri, Some(MARKER))).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
            assert!(body_string(res).await.contains("Hi Guest!"), "{uri}");
        }
    }

    #[tokio::test]
    async fn panel_data_source_serves_the_transcript() {
        let provider = Arc::new(MockTranscriptProvider::ok(&[Some("hello"), Some(" ")]));
        let app = app_with(provider);

        let html = body_string(send(app.clone(), get("/video/XYZ?name=Ann", Some(MARKER))).await).await;
        let source = pages::panel_source_in(&html).expect("panel has a data source");

        let res = send(app, get(source, None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!([{"text": "hello"}]));
    }

    // ---- transcript endpoint -----------------------------------------------

    #[tokio::test]
    async fn transcript_requires_video_id() {
        for uri in ["/api/transcript", "/api/transcript?videoId="] {
            let res = send(app(), get(uri, None)).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(
                body_json(res).await,
                serde_json::json!({"error": "Video ID is required"})
            );
        }
    }

    #[tokio::test]
    async fn unreadable_transcript_query_is_a_json_400() {
        let res = send(app(), get("/api/transcript?videoId=a&videoId=b", None)).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"error": "Video ID is required"})
        );
    }

    #[tokio::test]
    async fn transcript_filters_blank_segments() {
        let provider = Arc::new(MockTranscriptProvider::ok(&[
            Some("hello"),
            Some(""),
            Some("world"),
        ]));
        let res = send(app_with(provider.clone()), get("/api/transcript?videoId=XYZ", None)).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            serde_json::json!([{"text": "hello"}, {"text": "world"}])
        );
        assert_eq!(provider.last_lang().as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn transcript_lang_can_be_overridden() {
        let provider = Arc::new(MockTranscriptProvider::ok(&[Some("hola")]));
        let res = send(
            app_with(provider.clone()),
            get("/api/transcript?videoId=XYZ&lang=es", None),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(provider.last_lang().as_deref(), Some("es"));
    }

    #[tokio::test]
    async fn provider_failure_is_an_empty_transcript() {
        let provider = Arc::new(MockTranscriptProvider::err(TranscriptError::Timeout));
        let res = send(app_with(provider), get("/api/transcript?videoId=XYZ", None)).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn aborted_provider_is_a_server_error() {
        let provider = Arc::new(MockTranscriptProvider::panicking());
        let res = send(app_with(provider), get("/api/transcript?videoId=XYZ", None)).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"error": "Failed to fetch transcript"})
        );
    }
}
