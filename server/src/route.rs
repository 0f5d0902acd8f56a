use axum::{
    body::Body,
    http::{
        header::{self, HeaderValue},
        Request,
    },
    routing::get,
    Router,
};
use std::path::Path;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    compression::{
        predicate::{NotForContentType, Predicate, SizeAbove},
        CompressionLayer,
    },
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Level;

use crate::handlers;

pub fn router(static_dir: &Path) -> Router {
    let compression_predicate = SizeAbove::new(1024)
        // images and woff files are already compressed
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::const_new("font/woff"))
        .and(NotForContentType::const_new("font/woff2"));

    let api = Router::new()
        .route("/greet", get(handlers::greet_handler))
        .route("/version", get(handlers::version_handler));

    Router::new()
        .nest("/api", api)
        // everything else is the built pwa; its own worker decides what to
        // cache, hence no-store below
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CookieManagerLayer::new())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::span!(
                    Level::DEBUG,
                    "request",
                    method = tracing::field::display(request.method()),
                    uri = tracing::field::display(request.uri()),
                    version = tracing::field::debug(request.version()),
                    request_id = tracing::field::display(ulid::Ulid::new()),
                )
            }),
        )
        .layer(CompressionLayer::new().compress_when(compression_predicate))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
