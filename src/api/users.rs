use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::server::AppState;
use crate::api::session;
use crate::client::placeholder::FetchError;
use crate::directory::models::User;
use crate::directory::search;
use crate::directory::validate::{self, FieldError};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Search needle; empty or absent means no filtering.
    pub q: Option<String>,
    /// Comma-separated columns to search ("name,email").
    pub fields: Option<String>,
}

#[derive(Serialize)]
pub struct DirectoryResponse {
    pub users: Vec<User>,
    /// Unfiltered size of the session's directory.
    pub total: usize,
    /// How many rows survived the search filter.
    pub matched: usize,
}

#[derive(Deserialize)]
pub struct NewUserPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
pub struct ValidationResponse {
    pub errors: Vec<FieldError>,
}

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
    pub kind: &'static str,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Response {
    let (id, set_cookie) = match resolve_session(&state, &headers).await {
        Ok(session) => session,
        Err(err) => return fetch_failure(err),
    };

    let directory = state.sessions.snapshot(id).await.unwrap_or_default();
    let needle = query.q.unwrap_or_default();
    let fields = search::parse_fields(query.fields.as_deref());
    let users: Vec<User> = search::filter(directory.users(), &needle, &fields)
        .into_iter()
        .cloned()
        .collect();

    let body = DirectoryResponse {
        total: directory.len(),
        matched: users.len(),
        users,
    };

    with_session_cookie((StatusCode::OK, Json(body)).into_response(), id, set_cookie)
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<NewUserPayload>,
) -> Response {
    let (id, set_cookie) = match resolve_session(&state, &headers).await {
        Ok(session) => session,
        Err(err) => return fetch_failure(err),
    };

    if let Err(errors) = validate::validate_new_user(&payload.name, &payload.email) {
        let body = ValidationResponse { errors };
        let response = (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
        return with_session_cookie(response, id, set_cookie);
    }

    let user = User::from_form(payload.name, payload.email);
    state.sessions.add_user(id, user.clone()).await;
    tracing::info!(session = %id, name = %user.name, "user added to directory");

    with_session_cookie((StatusCode::CREATED, Json(user)).into_response(), id, set_cookie)
}

/// Finds the request's session, seeding a new one from the upstream user
/// source when needed. The bool says whether the response must set the
/// session cookie.
async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(Uuid, bool), FetchError> {
    let existing = session::session_from_headers(headers);
    if let Some(id) = existing
        && state.sessions.contains(id).await
    {
        return Ok((id, false));
    }

    // Unknown session: one synchronous fetch seeds its list copy. A cookie
    // that outlived a restart keeps its id but starts from a fresh fetch.
    let id = existing.unwrap_or_else(Uuid::new_v4);
    let users = state.upstream.fetch_users().await?;
    tracing::info!(session = %id, users = users.len(), "session seeded from user source");
    state.sessions.seed(id, users).await;

    Ok((id, existing.is_none()))
}

fn fetch_failure(err: FetchError) -> Response {
    tracing::error!(error = %err, "user source fetch failed");
    let body = ApiError {
        error: err.to_string(),
        kind: err.kind(),
    };
    (StatusCode::BAD_GATEWAY, Json(body)).into_response()
}

fn with_session_cookie(mut response: Response, id: Uuid, set_cookie: bool) -> Response {
    if set_cookie {
        response
            .headers_mut()
            .append(header::SET_COOKIE, session::session_cookie(id));
    }
    response
}
