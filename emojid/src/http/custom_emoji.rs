use axum::{
    body::Body,
    extract::State,
    response::{IntoResponse, Response},
    routing, Router,
};
use emoji_error::{Error, Result};
use emoji_storage::{AnyStorageBackend, StorageBackend};
use http::{header::CONTENT_TYPE, Uri};
use tower_http::services::ServeDir;

async fn get(State(storage): State<AnyStorageBackend>, uri: Uri) -> Result<Response> {
    let path = uri.path();
    let key = path.strip_prefix('/').unwrap_or(path);

    let stream = storage.get(key).await.map_err(Error::from_boxed)?;
    let content_type = mime_guess::from_path(key).first_or_octet_stream();

    Ok((
        [(CONTENT_TYPE, content_type.essence_str().to_owned())],
        Body::from_stream(stream),
    )
        .into_response())
}

/// Handler serving uploaded custom emoji images
///
/// Filesystem storages are served directly from their root directory.
/// Every other storage is read through the storage API, keyed by the request path.
pub fn routes(storage: AnyStorageBackend) -> Router {
    match storage {
        AnyStorageBackend::Fs(ref fs) => Router::new().fallback_service(ServeDir::new(fs.root())),
        storage => Router::new()
            .route("/{*key}", routing::get(get))
            .with_state(storage),
    }
}
