use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::DepartmentError;

pub const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

/// Splits "data:image/png;base64,iVBOR..." into bytes and content type.
/// Plain base64 is accepted too, in which case no content type is known.
pub fn decode_image_payload(payload: &str) -> Result<(Vec<u8>, Option<String>), DepartmentError> {
    let (content_type, data) = match payload.split_once(";base64,") {
        Some((prefix, data)) => (prefix.strip_prefix("data:").map(str::to_string), data),
        None => (None, payload),
    };

    let bytes = BASE64
        .decode(data.trim())
        .map_err(|e| DepartmentError::InvalidPhotoPayload(e.to_string()))?;

    Ok((bytes, content_type))
}

pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        _ => "jpg",
    }
}
