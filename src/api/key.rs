//! IndexNow key verification file.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::error::{AppError, Result};
use crate::server::AppState;

/// GET /{key}.txt - lets IndexNow confirm we own the submitted host
pub async fn indexnow_key_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse> {
    let key = state
        .settings
        .indexnow
        .key()
        .ok_or_else(|| AppError::NotFound(file_name.clone()))?;

    match file_name.strip_suffix(".txt") {
        Some(requested) if requested == key => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            key.to_string(),
        )),
        _ => Err(AppError::NotFound(file_name)),
    }
}
