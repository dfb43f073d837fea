use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../ui/index.html");

/// The settings page.
pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
