//! Rendering capability interface for the embeddable PDF viewer.
//!
//! The viewer component never talks to a concrete PDF library. It goes
//! through the narrow trait surface defined here: load a document from a
//! resolved source, fetch a page, compute a viewport, render into a
//! surface. Backends implement that surface; `LopdfBackend` is the
//! pure-Rust default and `PdfiumBackend` (behind the `pdfium` feature)
//! rasterizes real page content.

pub mod error;
pub mod lopdf_backend;
#[cfg(feature = "pdfium")]
pub mod pdfium_backend;
pub mod source;
pub mod surface;
#[cfg(test)]
mod test_support;
pub mod viewport;

pub use error::EngineError;
pub use lopdf_backend::LopdfBackend;
#[cfg(feature = "pdfium")]
pub use pdfium_backend::PdfiumBackend;
pub use source::{DocumentSource, ResolvedSource};
pub use surface::Surface;
pub use viewport::Viewport;

/// Page dimensions in points (1/72 inch), before any scaling or rotation.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageSize {
    pub width_pt: f32,
    pub height_pt: f32,
}

/// Document-level metadata available once a document has loaded.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentInfo {
    /// Total number of pages.
    pub page_count: u32,

    /// Document title, when the file carries one.
    pub title: Option<String>,

    /// Document author, when the file carries one.
    pub author: Option<String>,
}

/// Entry point of the capability interface.
///
/// Implementations must be shareable across threads: the viewer hands the
/// engine to a background loader while keeping its own reference.
pub trait PdfEngine: Send + Sync {
    /// Load a document from an already-resolved source.
    ///
    /// URL sources are fetched by the backend itself; byte sources are
    /// parsed directly.
    fn load_document(
        &self,
        source: &ResolvedSource,
    ) -> Result<Box<dyn DocumentHandle>, EngineError>;
}

/// Opaque handle to a loaded document.
pub trait DocumentHandle: Send + Sync {
    /// Metadata extracted at load time.
    fn info(&self) -> &DocumentInfo;

    /// Number of pages in the document.
    fn page_count(&self) -> u32 {
        self.info().page_count
    }

    /// Fetch a page by zero-based index.
    fn page(&self, index: u32) -> Result<Box<dyn PageHandle>, EngineError>;
}

/// Opaque handle to one page of a document.
pub trait PageHandle: Send {
    /// Zero-based index of this page within its document.
    fn index(&self) -> u32;

    /// Unscaled, unrotated page dimensions.
    fn base_size(&self) -> PageSize;

    /// Compute the viewport for a scale and rotation.
    fn viewport(&self, scale: f32, rotation_deg: Option<f32>) -> Viewport {
        Viewport::of(self.base_size(), scale, rotation_deg)
    }

    /// Rasterize this page into `surface` at the given viewport.
    ///
    /// The surface has already been sized to the viewport's pixel
    /// dimensions by the caller.
    fn render(&self, surface: &mut Surface, viewport: &Viewport) -> Result<(), EngineError>;
}
