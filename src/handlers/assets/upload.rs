// handlers/assets/upload.rs - POST /api/upload-asset handler

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
};

use crate::error::ApiError;
use crate::services::{UploadPart, UploadResponse};
use crate::state::AppState;

/**
 * POST /api/upload-asset - Forward one file to the asset host
 *
 * Expected Input: multipart/form-data; only the first part is read.
 *
 * Expected Output (Success):
 * ```json
 * { "url": "https://res.cloudinary.com/..." }
 * ```
 *
 * Errors:
 * - 400 Bad Request: no part, or an empty part (no remote call is made)
 * - 500 Internal Server Error: the asset host rejected or failed the upload
 */
pub async fn upload_asset(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let part = match multipart {
        Ok(mut multipart) => first_part(&mut multipart).await?,
        Err(rejection) => {
            tracing::debug!("Upload without a multipart body: {}", rejection);
            None
        }
    };

    let response = state.ingress.ingest(part).await?;
    Ok(Json(response))
}

/// Read the first part of the body. Later parts are never read.
async fn first_part(multipart: &mut Multipart) -> Result<Option<UploadPart>, ApiError> {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return Ok(None),
        Err(e) => {
            // An unreadable first part counts as no file at all
            tracing::debug!("Could not read first multipart part: {}", e);
            return Ok(None);
        }
    };

    let name = field.name().map(str::to_string);
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?;

    Ok(Some(UploadPart {
        name,
        file_name,
        content_type,
        data,
    }))
}
