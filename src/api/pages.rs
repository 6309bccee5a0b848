use axum::response::Html;

/// The directory UI, embedded at build time so the binary is the whole
/// deployment.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
