use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use std::path::Path;

use crate::utils::SiteScanError;

/// An image picked by the user, held in memory until it is submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name sent with the multipart part
    pub name: String,
    /// MIME type guessed from the extension
    pub mime: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime = guess_mime(&name).to_string();
        Self {
            name,
            mime,
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Guess an image MIME type from a file name
pub fn guess_mime(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Encode a file as a `data:` URL usable as an image preview source
pub fn to_data_url(file: &ImageFile) -> String {
    format!("data:{};base64,{}", file.mime, STANDARD.encode(&file.bytes))
}

/// File picking and reading facility
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Resolve a user selection into a file. `Ok(None)` means nothing was picked.
    async fn select_file(&self, selector: &str) -> Result<Option<ImageFile>, SiteScanError>;

    /// Preview image source for a picked file
    fn read_as_data_url(&self, file: &ImageFile) -> String {
        to_data_url(file)
    }
}

/// Treats the selector as a path on the local filesystem
#[derive(Debug, Default, Clone)]
pub struct DiskFileSource;

#[async_trait]
impl FileSource for DiskFileSource {
    async fn select_file(&self, selector: &str) -> Result<Option<ImageFile>, SiteScanError> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Ok(None);
        }

        let path = Path::new(selector);
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| selector.to_string());

        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Some(ImageFile::new(name, bytes)))
    }
}
