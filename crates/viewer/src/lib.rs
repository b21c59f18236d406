//! Embeddable PDF viewer component.
//!
//! `PdfViewer` bridges a host UI loop to a PDF rendering backend: it
//! resolves a configured source, drives the backend through document and
//! page acquisition, and paints the requested page into a [`Surface`]
//! the host displays. The component itself never blocks and never
//! touches a thread; it emits acquisition requests and consumes
//! completions. `ThreadedLoader` is the stock driver that executes
//! requests on a background worker.
//!
//! [`Surface`]: pdf_embed_engine::Surface

pub mod loader;
pub mod props;
pub mod scale;
pub mod state;
pub mod viewer;

pub use loader::{execute, AcquireCompletion, AcquireRequest, ThreadedLoader};
pub use props::{Placeholders, PropsDiff, ViewerProps};
pub use scale::effective_scale;
pub use state::{SlotState, ViewerPhase};
pub use viewer::{ConfigError, PdfViewer, ViewContent, ViewerCallbacks};
