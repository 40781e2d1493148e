//! Multipart upload reading.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::StatusCode;
use jpegify_models::InputItem;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

const INVALID_MULTIPART: &str = "Некорректный multipart запрос";

/// Read every file field of a multipart body, in upload order.
///
/// Fields without a filename (plain form values) are ignored.
pub async fn read_uploads(
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Vec<InputItem>> {
    let mut multipart = multipart
        .map_err(|e| ApiError::bad_request(format!("{}: {}", INVALID_MULTIPART, e.body_text())))?;

    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                debug!(field = ?field.name(), "Ignoring multipart field without filename");
                continue;
            }
        };

        let data = field.bytes().await.map_err(multipart_error)?;
        debug!(file = %file_name, bytes = data.len(), "Received upload");
        uploads.push(InputItem::new(file_name, Vec::from(data)));
    }

    if uploads.is_empty() {
        return Err(ApiError::bad_request(format!(
            "{}: файлы не переданы",
            INVALID_MULTIPART
        )));
    }

    Ok(uploads)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Размер запроса превышает допустимый".to_string())
    } else {
        ApiError::bad_request(format!("{}: {}", INVALID_MULTIPART, e.body_text()))
    }
}
