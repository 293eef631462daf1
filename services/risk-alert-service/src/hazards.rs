use image::{ImageResult, RgbImage};

use crate::models::{HazardReport, UploadedImage};

/// Labels returned for every upload; nothing is derived from the image yet.
pub const PLACEHOLDER_HAZARDS: [&str; 2] = ["Missing safety gear", "Potential fire hazard"];

pub fn placeholder_report() -> HazardReport {
    HazardReport {
        hazards: PLACEHOLDER_HAZARDS.iter().map(|label| label.to_string()).collect(),
    }
}

/// Decodes whatever format the bytes carry into an 8-bit RGB buffer.
pub fn decode_color(bytes: &[u8]) -> ImageResult<RgbImage> {
    image::load_from_memory(bytes).map(|image| image.to_rgb8())
}

/// Decodes the upload off the async workers and drops the result. The outcome
/// only reaches the logs.
pub async fn decode_and_discard(upload: UploadedImage) {
    let file_name = upload.file_name.unwrap_or_default();
    let size_bytes = upload.bytes.len();
    let bytes = upload.bytes;

    match tokio::task::spawn_blocking(move || decode_color(&bytes)).await {
        Ok(Ok(image)) => tracing::debug!(
            file_name = %file_name,
            size_bytes,
            width = image.width(),
            height = image.height(),
            "upload decoded"
        ),
        Ok(Err(err)) => tracing::debug!(
            file_name = %file_name,
            size_bytes,
            error = %err,
            "upload is not a decodable image"
        ),
        Err(err) => tracing::warn!(file_name = %file_name, error = %err, "decode task failed"),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut buffer, ImageFormat::Jpeg)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn report_is_the_fixed_label_list() {
        let report = placeholder_report();
        assert_eq!(
            report.hazards,
            vec!["Missing safety gear".to_string(), "Potential fire hazard".to_string()]
        );
    }

    #[test]
    fn decodes_jpeg_dimensions() {
        let image = decode_color(&jpeg_bytes(8, 4)).unwrap();
        assert_eq!((image.width(), image.height()), (8, 4));
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert!(decode_color(b"0123456789").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(decode_color(&[]).is_err());
    }

    #[tokio::test]
    async fn discarding_garbage_does_not_panic() {
        decode_and_discard(UploadedImage {
            file_name: Some("notes.txt".to_string()),
            bytes: axum::body::Bytes::from_static(b"not an image"),
        })
        .await;
    }
}
