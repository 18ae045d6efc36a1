use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("storage returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid object url: {0}")]
    Url(#[from] url::ParseError),

    #[error("base url cannot hold a path: {0}")]
    BaseUrl(String),

    #[error("credentials: {0}")]
    Credentials(String),
}

/// Where an uploaded image ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub object_name: String,
    pub content_type: String,
    pub public_url: String,
}

/// Write-then-publish object store for uploaded images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `content` under `images/{filename}`, make it public-read and
    /// return its public location
    async fn store_image(&self, content: Vec<u8>, filename: &str) -> Result<StoredImage, StorageError>;
}

/// Content type guessed from the file extension
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Final path component of a client-supplied filename
pub fn sanitize_filename(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_content_type_from_extension() {
        assert_eq!(content_type_for("shirt.png"), "image/png");
        assert_eq!(content_type_for("SHIRT.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.b.webp"), "image/webp");
    }

    #[test]
    fn non_image_uploads_keep_their_own_type() {
        assert_eq!(content_type_for("scan.pdf"), "application/pdf");
        assert_eq!(content_type_for("look.txt"), "text/plain");
        assert_eq!(content_type_for("clip.mp4"), "video/mp4");
    }

    #[test]
    fn unknown_or_missing_extension_falls_back() {
        assert_eq!(content_type_for("notes.qqzz"), "application/octet-stream");
        assert_eq!(content_type_for("README"), "application/octet-stream");
        assert_eq!(content_type_for(""), "application/octet-stream");
    }

    #[test]
    fn strips_directories_from_filenames() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\gömlek.png"), "gömlek.png");
        assert_eq!(sanitize_filename("plain.png"), "plain.png");
    }
}
