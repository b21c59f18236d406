//! Error taxonomy for document acquisition and rendering.

/// Errors produced by source resolution and backend operations.
///
/// Acquisition failures never panic the host: the viewer converts them
/// into its failed states and the optional error callbacks.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to load document: {0}")]
    Load(String),

    #[error("encrypted documents are not supported by the default backend")]
    EncryptedUnsupported,

    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("render failed: {0}")]
    Render(String),

    #[error("failed to initialize rendering backend: {0}")]
    Init(String),
}
