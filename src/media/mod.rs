//! Image storage for NetLink.
//!
//! Profile pictures, banners and post images arrive as base64 data URIs.
//! An [`ImageStore`] persists the decoded bytes and hands back a public URL
//! together with a storage ID used for later deletion.

mod local;

pub use local::LocalImageStore;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use crate::{NetlinkError, Result};

/// A stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Storage identifier, passed back to [`ImageStore::delete`].
    pub id: String,
    /// Public URL of the image.
    pub url: String,
}

/// Image storage backend.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store an image given as a data URI.
    async fn upload(&self, data_uri: &str) -> Result<StoredImage>;

    /// Delete a stored image. Returns `false` if it did not exist.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Delete a stored image on a cleanup path.
///
/// Failures are logged and swallowed so the caller's own result stands.
pub async fn discard(store: &dyn ImageStore, id: &str) {
    match store.delete(id).await {
        Ok(true) => debug!("Deleted image {}", id),
        Ok(false) => warn!("Image {} was already gone", id),
        Err(e) => warn!("Failed to delete image {}: {}", id, e),
    }
}

/// A decoded `data:image/...;base64,...` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

/// Decode a base64 image data URI.
pub fn decode_data_uri(data_uri: &str) -> Result<DecodedImage> {
    let rest = data_uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| NetlinkError::Validation("image must be a data URI".to_string()))?;

    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| NetlinkError::Validation("malformed image data URI".to_string()))?;

    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| NetlinkError::Validation("image data must be base64 encoded".to_string()))?
        .to_ascii_lowercase();

    if !mime.starts_with("image/") {
        return Err(NetlinkError::Validation(format!(
            "unsupported image type: {mime}"
        )));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| NetlinkError::Validation(format!("invalid image data: {e}")))?;

    if bytes.is_empty() {
        return Err(NetlinkError::Validation("image is empty".to_string()));
    }

    Ok(DecodedImage { mime, bytes })
}

/// File extension for an image MIME type.
pub fn extension_for(mime: &str) -> Option<&'static str> {
    let subtype = mime.strip_prefix("image/")?;
    let extensions = mime_guess::get_mime_extensions_str(mime)?;
    extensions
        .iter()
        .find(|ext| ext.eq_ignore_ascii_case(subtype))
        .or_else(|| extensions.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_uri() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"fakepng"));
        let image = decode_data_uri(&uri).unwrap();
        assert_eq!(image.mime, "image/png");
        assert_eq!(image.bytes, b"fakepng");
    }

    #[test]
    fn test_decode_rejects_plain_url() {
        let result = decode_data_uri("https://example.com/cat.png");
        assert!(matches!(result, Err(NetlinkError::Validation(_))));
    }

    #[test]
    fn test_decode_rejects_non_image() {
        let uri = format!("data:text/plain;base64,{}", STANDARD.encode(b"hello"));
        assert!(matches!(
            decode_data_uri(&uri),
            Err(NetlinkError::Validation(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(decode_data_uri("data:image/png;base64,!!!").is_err());
        assert!(decode_data_uri("data:image/png;base64,").is_err());
        assert!(decode_data_uri("data:image/png,rawdata").is_err());
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/jpeg"), Some("jpeg"));
        assert_eq!(extension_for("image/gif"), Some("gif"));
        assert_eq!(extension_for("text/plain"), None);
    }
}
