use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::pages;
use crate::api::users;
use crate::client::placeholder::UserApiClient;
use crate::directory::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub upstream: UserApiClient,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(|| async { "OK" }))
        .route("/api/users", get(users::list_users).post(users::add_user))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(bind_addr: &str, users_endpoint: &str) {
    let state = Arc::new(AppState {
        sessions: SessionStore::new(),
        upstream: UserApiClient::new(users_endpoint),
    });

    let app = app(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::session::SESSION_COOKIE;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    const FIXTURE: &str = r#"[
        {"id": 1, "name": "Leanne Graham", "username": "Bret", "email": "Sincere@april.biz"},
        {"id": 2, "name": "Ervin Howell", "username": "Antonette", "email": "Shanna@melissa.tv"}
    ]"#;

    async fn stub_upstream(body: &'static str) -> String {
        let app = Router::new().route("/users", get(move || async move { body }));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/users", addr)
    }

    async fn test_app(upstream_body: &'static str) -> Router {
        let endpoint = stub_upstream(upstream_body).await;
        app(Arc::new(AppState {
            sessions: SessionStore::new(),
            upstream: UserApiClient::new(endpoint),
        }))
    }

    fn cookie_from(response: &axum::response::Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("response should set the session cookie")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with(SESSION_COOKIE));
        // "udir_session=<uuid>; Path=/; ..."
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_users(cookie: Option<&str>, query: &str) -> Request<Body> {
        let mut builder = Request::builder().uri(format!("/api/users{}", query));
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_user(cookie: Option<&str>, payload: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(payload.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_first_request_lists_fetched_users_in_order() {
        let app = test_app(FIXTURE).await;

        let response = app.oneshot(get_users(None, "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        cookie_from(&response);

        let body = json_body(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["matched"], 2);
        assert_eq!(body["users"][0]["name"], "Leanne Graham");
        assert_eq!(body["users"][1]["name"], "Ervin Howell");
    }

    #[tokio::test]
    async fn test_add_user_appends_at_end() {
        let app = test_app(FIXTURE).await;

        let response = app
            .clone()
            .oneshot(post_user(
                None,
                r#"{"name": "Carol Danvers", "email": "carol@example.com"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let cookie = cookie_from(&response);

        let body = json_body(response).await;
        assert_eq!(body["name"], "Carol Danvers");
        assert!(body.get("id").is_none());

        let response = app.oneshot(get_users(Some(&cookie), "")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["users"][0]["name"], "Leanne Graham");
        assert_eq!(body["users"][2]["name"], "Carol Danvers");
    }

    #[tokio::test]
    async fn test_invalid_submission_is_a_noop() {
        let app = test_app(FIXTURE).await;

        let response = app
            .clone()
            .oneshot(post_user(None, r#"{"name": "", "email": "nope"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let cookie = cookie_from(&response);

        let body = json_body(response).await;
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "name");

        let response = app.oneshot(get_users(Some(&cookie), "")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn test_search_filters_without_losing_total() {
        let app = test_app(FIXTURE).await;

        let response = app.clone().oneshot(get_users(None, "")).await.unwrap();
        let cookie = cookie_from(&response);

        let response = app
            .oneshot(get_users(Some(&cookie), "?q=ervin&fields=name"))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["matched"], 1);
        assert_eq!(body["users"][0]["name"], "Ervin Howell");
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_appends() {
        let app = test_app(FIXTURE).await;

        let response = app
            .clone()
            .oneshot(post_user(
                None,
                r#"{"name": "Carol Danvers", "email": "carol@example.com"}"#,
            ))
            .await
            .unwrap();
        let first_session = cookie_from(&response);

        // A different browser (no cookie) gets its own fresh copy
        let response = app.clone().oneshot(get_users(None, "")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 2);

        let response = app
            .oneshot(get_users(Some(&first_session), ""))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 3);
    }

    #[tokio::test]
    async fn test_malformed_upstream_surfaces_as_error_state() {
        let app = test_app("<html>service is down</html>").await;

        let response = app.clone().oneshot(get_users(None, "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "parse");

        // The process keeps serving
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_serves_the_ui() {
        let app = test_app(FIXTURE).await;
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("User Directory"));
    }
}
