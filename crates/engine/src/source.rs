//! Document sources and their resolution to loader input.
//!
//! A viewer configuration names its document in exactly one of four ways:
//! a remote URL, a local file path, in-memory bytes, or base64 text.
//! Resolution normalizes all of them to either a URL (passed through for
//! the backend to fetch) or a byte sequence.

use std::fmt;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::EngineError;

/// Where a document comes from.
#[derive(Clone, PartialEq)]
pub enum DocumentSource {
    /// Remote URL. Passed through unresolved; the backend fetches it.
    RemoteUrl(String),

    /// Local file, read into bytes at resolution time.
    FilePath(PathBuf),

    /// Document bytes already in memory.
    Bytes(Vec<u8>),

    /// Base64-encoded document content, decoded at resolution time.
    Base64(String),
}

impl DocumentSource {
    /// Normalize this source to loader input.
    ///
    /// Base64 decoding uses standard alphabet decoding, one byte per
    /// decoded character; the empty string decodes to an empty byte
    /// sequence. File reads go through the filesystem here so the
    /// backend only ever sees URLs and bytes.
    pub fn resolve(&self) -> Result<ResolvedSource, EngineError> {
        match self {
            DocumentSource::RemoteUrl(url) => Ok(ResolvedSource::Url(url.clone())),
            DocumentSource::FilePath(path) => Ok(ResolvedSource::Bytes(std::fs::read(path)?)),
            DocumentSource::Bytes(bytes) => Ok(ResolvedSource::Bytes(bytes.clone())),
            DocumentSource::Base64(text) => {
                Ok(ResolvedSource::Bytes(BASE64.decode(text.trim())?))
            }
        }
    }
}

impl fmt::Debug for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::RemoteUrl(url) => f.debug_tuple("RemoteUrl").field(url).finish(),
            DocumentSource::FilePath(path) => f.debug_tuple("FilePath").field(path).finish(),
            DocumentSource::Bytes(bytes) => {
                write!(f, "Bytes({} bytes)", bytes.len())
            }
            DocumentSource::Base64(text) => {
                write!(f, "Base64({} chars)", text.len())
            }
        }
    }
}

/// A source after resolution: what the backend loader actually consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedSource {
    Url(String),
    Bytes(Vec<u8>),
}

impl ResolvedSource {
    /// Materialize the document bytes, fetching URL sources over HTTP.
    pub fn into_bytes(self) -> Result<Vec<u8>, EngineError> {
        match self {
            ResolvedSource::Bytes(bytes) => Ok(bytes),
            ResolvedSource::Url(url) => fetch_bytes(&url),
        }
    }
}

/// Fetch a remote document into memory.
fn fetch_bytes(url: &str) -> Result<Vec<u8>, EngineError> {
    tracing::debug!(url, "fetching remote document");

    let response = ureq::get(url).call().map_err(|err| EngineError::Fetch {
        url: url.to_owned(),
        reason: err.to_string(),
    })?;

    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut response.into_reader(), &mut bytes)?;

    Ok(bytes)
}
