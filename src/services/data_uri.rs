use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Media type used when the upload does not declare one
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Wrap raw bytes as a `data:<type>;base64,<payload>` URI.
///
/// A missing or empty declared type falls back to [`DEFAULT_MEDIA_TYPE`].
pub fn to_data_uri(bytes: &[u8], declared_type: Option<&str>) -> String {
    let media_type = declared_type
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_MEDIA_TYPE);

    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}
