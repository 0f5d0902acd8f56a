use axum::response::Html;
use axum::Json;
use serde::Serialize;
use volume_core::Version;

pub async fn greet_handler() -> Html<&'static str> {
    Html("<h1>Nice to meet you!</h1>")
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: Version,
}

/// Build version of the serving binary, for deploy checks. The page's own
/// build stamp travels page to worker and never through this endpoint.
pub async fn version_handler() -> Json<VersionResponse> {
    let version = Version::new(env!("CARGO_PKG_VERSION")).unwrap();
    Json(VersionResponse { version })
}
