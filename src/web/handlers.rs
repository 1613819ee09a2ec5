//! Route handlers.

use std::time::SystemTime;

use axum::{
    extract::{rejection::QueryRejection, Form, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::access::{AccessDecision, AccessGate};
use crate::session::SessionIdentity;
use crate::transcript::TranscriptItem;
use crate::web::{pages, AppState};

/// 400 body text when `videoId` is missing or empty.
pub const VIDEO_ID_REQUIRED: &str = "Video ID is required";

/// 500 body text when the provider call aborts.
pub const TRANSCRIPT_FAILED: &str = "Failed to fetch transcript";

// ---------------------------------------------------------------------------
// Access gate
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AccessForm {
    #[serde(default)]
    pub access_code: String,
}

pub async fn access_page() -> Html<String> {
    Html(pages::access_page(None))
}

pub async fn submit_access(
    State(state): State<AppState>,
    Form(form): Form<AccessForm>,
) -> Response {
    match state.gate.check_access(&form.access_code, SystemTime::now()) {
        AccessDecision::Granted(_) => (
            [(header::SET_COOKIE, state.gate.set_cookie_header())],
            Redirect::to(AccessGate::DEFAULT_ROUTE),
        )
            .into_response(),
        AccessDecision::Denied => {
            Html(pages::access_page(Some(AccessGate::DENIED_MESSAGE))).into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Landing and session pages
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LinkForm {
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub name: String,
}

pub async fn landing() -> Html<String> {
    Html(pages::landing_page(None, "", ""))
}

pub async fn submit_link(State(state): State<AppState>, Form(form): Form<LinkForm>) -> Response {
    match SessionIdentity::from_landing(
        &form.link,
        &form.name,
        &state.config.page.default_display_name,
    ) {
        Ok(identity) => Redirect::to(&identity.route()).into_response(),
        Err(e) => {
            log::debug!("session: rejected link {:?}: {e}", form.link);
            Html(pages::landing_page(Some(&e.to_string()), &form.link, &form.name)).into_response()
        }
    }
}

/// Query of the session route.
#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    pub name: Option<String>,
}

/// `GET /video/:id?name=..`.  An unreadable query falls back to the
/// default display name.
pub async fn video_page(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Html<String> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(e) => {
            log::debug!("session: unreadable route query: {e}");
            SessionQuery::default()
        }
    };
    let identity = SessionIdentity::from_route(
        &video_id,
        query.name.as_deref(),
        &state.config.page.default_display_name,
    );
    Html(pages::session_page(&identity, &state.config.page))
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    pub lang: Option<String>,
}

/// `GET /api/transcript?videoId=..[&lang=..]`
///
/// The bridge never fails, so provider errors come back as `200 []`.  Only a
/// provider call that aborts (panics) yields a 500.  A missing, empty or
/// unreadable `videoId` is a JSON 400.
pub async fn transcript(
    State(state): State<AppState>,
    query: Result<Query<TranscriptQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(e) => {
            log::debug!("transcript: rejected query: {e}");
            return video_id_required();
        }
    };
    let Some(video_id) = query.video_id.filter(|id| !id.is_empty()) else {
        return video_id_required();
    };
    let lang = query
        .lang
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| state.bridge.default_language().to_string());

    let bridge = state.bridge.clone();
    let task = tokio::spawn(async move { bridge.fetch_transcript(&video_id, &lang).await });

    match task.await {
        Ok(segments) => {
            let items: Vec<TranscriptItem> =
                segments.into_iter().map(TranscriptItem::from).collect();
            Json(items).into_response()
        }
        Err(e) => {
            log::error!("transcript: provider task aborted: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": TRANSCRIPT_FAILED })),
            )
                .into_response()
        }
    }
}

fn video_id_required() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": VIDEO_ID_REQUIRED })),
    )
        .into_response()
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
