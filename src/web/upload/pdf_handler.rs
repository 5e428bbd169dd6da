//! # Chapter Handlers
//!
//! - `GET  /PDF/{username}/{slug}/{chapter}` serves a stored chapter as
//!   `application/pdf`, or `404 Not Found`.
//! - `POST /PDF/{username}/{slug}/{chapter}` stores the raw request body as
//!   that chapter and answers `201 Created`.
//!
//! Both sit behind [`require_csrf`](crate::web::middleware::require_csrf);
//! by the time `upload_chapter` runs, one use of the caller's token budget
//! has been spent.
//!
//! Storage calls block, so they run on tokio's blocking pool.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use super::chapter::ChapterPath;
use super::storage::FileStorage;
use crate::error::entity::NotFoundError;
use crate::web::state::AppState;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

fn bad_path(username: &str, slug: &str, chapter: u32) -> Result<ChapterPath, Response> {
    ChapterPath::new(username, slug, chapter).map_err(|e| {
        (StatusCode::BAD_REQUEST, format!("400 Bad Request: {e}")).into_response()
    })
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error").into_response()
}

async fn blocking<T, F>(storage: Arc<dyn FileStorage>, f: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn FileStorage) -> anyhow::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(storage.as_ref())).await?
}

pub async fn download_chapter(
    State(state): State<AppState>,
    Path((username, slug, chapter)): Path<(String, String, u32)>,
) -> Response {
    let path = match bad_path(&username, &slug, chapter) {
        Ok(p) => p,
        Err(res) => return res,
    };

    let key = path.storage_key();
    match blocking(state.storage.clone(), move |s| s.load(&key)).await {
        Ok(bytes) => (
            [(CONTENT_TYPE, HeaderValue::from_static(PDF_CONTENT_TYPE))],
            bytes,
        )
            .into_response(),
        Err(e) if e.downcast_ref::<NotFoundError>().is_some() => {
            (StatusCode::NOT_FOUND, "404 Not Found").into_response()
        }
        Err(e) => {
            error!(chapter = %path, error = ?e, "failed to read chapter");
            internal_error()
        }
    }
}

pub async fn upload_chapter(
    State(state): State<AppState>,
    Path((username, slug, chapter)): Path<(String, String, u32)>,
    body: Bytes,
) -> Response {
    let path = match bad_path(&username, &slug, chapter) {
        Ok(p) => p,
        Err(res) => return res,
    };

    let key = path.storage_key();
    let size = body.len();
    match blocking(state.storage.clone(), move |s| s.save(&key, &body)).await {
        Ok(_) => {
            info!(chapter = %path, bytes = size, "chapter stored");
            (StatusCode::CREATED, "201 Created").into_response()
        }
        Err(e) => {
            error!(chapter = %path, error = ?e, "failed to store chapter");
            internal_error()
        }
    }
}
