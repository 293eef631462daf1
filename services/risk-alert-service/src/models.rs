use axum::body::Bytes;
use serde::Serialize;

#[derive(Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct HazardReport {
    pub hazards: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
}

/// Bytes of the `file` field; lives only for the request.
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}
