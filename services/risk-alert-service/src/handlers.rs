use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::hazards;
use crate::models::{ErrorResponse, HazardReport, StatusResponse, UploadedImage};

pub const FILE_FIELD: &str = "file";

pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Risk Alert is running!",
    })
}

pub async fn upload(mut multipart: Multipart) -> Result<Json<HazardReport>, UploadError> {
    let upload = read_file_field(&mut multipart).await?;
    tracing::info!(
        file_name = upload.file_name.as_deref().unwrap_or(""),
        size_bytes = upload.bytes.len(),
        "upload received"
    );

    // The labels do not depend on the decoded image.
    hazards::decode_and_discard(upload).await;

    Ok(Json(hazards::placeholder_report()))
}

/// Returns the first `file` field, skipping any others.
async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedImage, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await?;
        return Ok(UploadedImage { file_name, bytes });
    }
    Err(UploadError::MissingFile)
}

#[derive(Debug)]
pub enum UploadError {
    MissingFile,
    Multipart(MultipartError),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err)
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::MissingFile => {
                tracing::info!("upload rejected: missing file field");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ErrorResponse {
                        code: "missing_file",
                        message: "file field is required",
                    }),
                )
                    .into_response()
            }
            UploadError::Multipart(err) => {
                tracing::info!(error = %err, "upload rejected: malformed multipart body");
                (err.status(), err.body_text()).into_response()
            }
        }
    }
}
