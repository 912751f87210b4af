//! Decoding of create/update request bodies
//!
//! Events can be submitted as JSON, as a urlencoded form, or as
//! `multipart/form-data` with an optional image in the `image` field.

use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::{StatusCode, header::CONTENT_TYPE},
};

use crate::error::{EventError, EventResult};
use crate::models::EventInput;
use crate::upload::{
    IMAGE_FIELD, ImageStore, MAX_IMAGE_BYTES, StoredImage, UploadError, check_image_type,
};

/// Decoded body of a create or update request
#[derive(Debug, Default)]
pub struct Submission {
    pub input: EventInput,
    /// Present when an image passed the upload gate and was written to disk
    pub image: Option<StoredImage>,
}

/// Decode `request` according to its content type.
///
/// Any other content type is treated as an empty submission.
pub async fn parse_submission(request: Request, images: &ImageStore) -> EventResult<Submission> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| UploadError::Malformed(e.body_text()))?;
        return read_multipart(multipart, images).await;
    }

    let input = if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(input) = Form::<EventInput>::from_request(request, &())
            .await
            .map_err(|e| EventError::InvalidBody(e.body_text()))?;
        input
    } else if content_type.starts_with("application/json") || content_type.contains("+json") {
        let Json(input) = Json::<EventInput>::from_request(request, &())
            .await
            .map_err(|e| EventError::InvalidBody(e.body_text()))?;
        input
    } else {
        EventInput::default()
    };

    Ok(Submission { input, image: None })
}

/// Walk the multipart stream, collecting text fields and at most one image.
///
/// The image is buffered and only written once the whole body was read
/// without a rejection.
async fn read_multipart(mut multipart: Multipart, images: &ImageStore) -> EventResult<Submission> {
    let mut input = EventInput::default();
    let mut pending: Option<(String, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await.map_err(multipart_error)?;
            input.set_field(&name, value);
            continue;
        };

        // browsers send an empty part when no file was chosen
        if file_name.is_empty() {
            let content_type = field.content_type().unwrap_or("unknown").to_string();
            let data = field.bytes().await.map_err(multipart_error)?;
            if data.is_empty() {
                continue;
            }
            return Err(UploadError::InvalidFileType {
                file_name,
                content_type,
            }
            .into());
        }

        if name != IMAGE_FIELD {
            return Err(UploadError::UnexpectedField(name).into());
        }
        if pending.is_some() {
            return Err(UploadError::TooManyFiles.into());
        }

        let extension = check_image_type(&file_name, field.content_type())?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if data.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(UploadError::FileTooLarge.into());
            }
            data.extend_from_slice(&chunk);
        }

        pending = Some((extension, data));
    }

    let image = match pending {
        Some((extension, data)) => Some(images.save(&extension, &data).await?),
        None => None,
    };

    Ok(Submission { input, image })
}

fn multipart_error(err: MultipartError) -> EventError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::FileTooLarge.into()
    } else {
        UploadError::Malformed(err.body_text()).into()
    }
}
