//! The viewer component.

use std::sync::Arc;

use pdf_embed_engine::{DocumentHandle, DocumentInfo, EngineError, PageHandle, Surface};

use crate::loader::{AcquireCompletion, AcquireRequest};
use crate::props::{PropsDiff, ViewerProps};
use crate::scale::effective_scale;
use crate::state::{SlotState, ViewerPhase};

/// Integrator mistakes, surfaced synchronously instead of entering a
/// loading state.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("a PDF viewer needs a source: a URL, a file path, bytes or base64 content")]
    MissingSource,
}

/// Reaction callbacks, all optional. Each fires exactly once per
/// corresponding completion.
#[derive(Default)]
pub struct ViewerCallbacks {
    pub on_document_complete: Option<Box<dyn FnMut(u32, &dyn DocumentHandle)>>,
    pub on_document_error: Option<Box<dyn FnMut(&EngineError)>>,
    pub on_page_complete: Option<Box<dyn FnMut(u32, &dyn PageHandle)>>,
    pub on_page_error: Option<Box<dyn FnMut(&EngineError)>>,
}

impl ViewerCallbacks {
    pub fn on_document_complete(
        mut self,
        callback: impl FnMut(u32, &dyn DocumentHandle) + 'static,
    ) -> Self {
        self.on_document_complete = Some(Box::new(callback));
        self
    }

    pub fn on_document_error(mut self, callback: impl FnMut(&EngineError) + 'static) -> Self {
        self.on_document_error = Some(Box::new(callback));
        self
    }

    pub fn on_page_complete(
        mut self,
        callback: impl FnMut(u32, &dyn PageHandle) + 'static,
    ) -> Self {
        self.on_page_complete = Some(Box::new(callback));
        self
    }

    pub fn on_page_error(mut self, callback: impl FnMut(&EngineError) + 'static) -> Self {
        self.on_page_error = Some(Box::new(callback));
        self
    }
}

/// What the host should display right now.
#[derive(Debug)]
pub enum ViewContent<'a> {
    /// No source configured: the no-data placeholder.
    NoData(&'a str),

    /// Acquisition in flight and nothing painted yet.
    Loading(&'a str),

    /// A document or page acquisition failed.
    Error(&'a str),

    /// The painted page. Also returned while a re-fetch is in flight if
    /// an earlier paint exists, so reconfiguration does not flicker
    /// through the loading placeholder.
    Page(&'a Surface),
}

/// Embeddable PDF viewer.
///
/// Owns the document and page handles, the drawable surface, and the
/// acquisition bookkeeping. All transitions happen in [`PdfViewer::apply`];
/// the component never blocks.
pub struct PdfViewer {
    props: ViewerProps,
    callbacks: ViewerCallbacks,
    document: SlotState<Arc<dyn DocumentHandle>>,
    page: SlotState<Box<dyn PageHandle>>,
    surface: Surface,
    painted: bool,
    paint_seq: u64,
    next_epoch: u64,
    outbox: Vec<AcquireRequest>,
}

impl PdfViewer {
    /// Mount with the given configuration.
    ///
    /// Fails fast when no source is configured; everything else is
    /// reported through state and callbacks, never as a panic.
    pub fn mount(props: ViewerProps) -> Result<Self, ConfigError> {
        Self::mount_with(props, ViewerCallbacks::default())
    }

    /// Mount with reaction callbacks.
    pub fn mount_with(props: ViewerProps, callbacks: ViewerCallbacks) -> Result<Self, ConfigError> {
        if props.source.is_none() {
            return Err(ConfigError::MissingSource);
        }

        let mut viewer = PdfViewer {
            props,
            callbacks,
            document: SlotState::Absent,
            page: SlotState::Absent,
            surface: Surface::new(),
            painted: false,
            paint_seq: 0,
            next_epoch: 0,
            outbox: Vec::new(),
        };
        viewer.request_document();

        Ok(viewer)
    }

    /// Replace the configuration.
    ///
    /// A source change restarts document acquisition; a page, scale or
    /// rotation change re-fetches the page from the current document; a
    /// width or pixel-ratio change repaints in place. Identical
    /// configuration does nothing.
    pub fn update(&mut self, new_props: ViewerProps) {
        let diff = PropsDiff::between(&self.props, &new_props);
        self.props = new_props;

        if diff.is_empty() {
            return;
        }

        if diff.needs_document_reload() {
            if self.props.source.is_some() {
                self.request_document();
            } else {
                // Source withdrawn: park on the no-data placeholder.
                self.document = SlotState::Absent;
                self.page = SlotState::Absent;
                self.surface = Surface::new();
                self.painted = false;
            }
            return;
        }

        if diff.needs_page_reload() {
            if self.document.is_ready() {
                self.request_page();
            }
            // With the document still in flight, its completion handler
            // picks up the new page/scale/rotation from props.
            return;
        }

        if diff.needs_repaint() && self.page.is_ready() {
            self.paint();
        }
    }

    /// Requests issued since the last call. Hand them to a driver such
    /// as [`ThreadedLoader`](crate::loader::ThreadedLoader).
    pub fn take_requests(&mut self) -> Vec<AcquireRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Apply one acquisition completion.
    ///
    /// Completions whose epoch does not match the current request are
    /// stale leftovers of a superseded configuration and are discarded:
    /// the latest request always wins.
    pub fn apply(&mut self, completion: AcquireCompletion) {
        match completion {
            AcquireCompletion::Document { epoch, result } => {
                if self.document.pending_epoch() != Some(epoch) {
                    tracing::debug!(epoch, "discarding stale document completion");
                    return;
                }

                match result {
                    Ok(document) => {
                        let page_count = document.info().page_count;
                        tracing::debug!(page_count, "document ready");
                        self.document = SlotState::Ready(document);

                        if let SlotState::Ready(document) = &self.document {
                            if let Some(callback) = self.callbacks.on_document_complete.as_mut() {
                                callback(page_count, document.as_ref());
                            }
                        }

                        self.request_page();
                    }
                    Err(error) => {
                        tracing::debug!(%error, "document load failed");
                        self.document = SlotState::Failed;
                        self.page = SlotState::Absent;
                        self.painted = false;

                        if let Some(callback) = self.callbacks.on_document_error.as_mut() {
                            callback(&error);
                        }
                    }
                }
            }
            AcquireCompletion::Page { epoch, result } => {
                if self.page.pending_epoch() != Some(epoch) {
                    tracing::debug!(epoch, "discarding stale page completion");
                    return;
                }

                match result {
                    Ok(page) => {
                        self.page = SlotState::Ready(page);
                        self.paint();

                        if let SlotState::Ready(page) = &self.page {
                            let display_index = page.index() + 1;
                            if let Some(callback) = self.callbacks.on_page_complete.as_mut() {
                                callback(display_index, page.as_ref());
                            }
                        }
                    }
                    Err(error) => {
                        tracing::debug!(%error, "page load failed");
                        self.page = SlotState::Failed;
                        self.painted = false;

                        if let Some(callback) = self.callbacks.on_page_error.as_mut() {
                            callback(&error);
                        }
                    }
                }
            }
        }
    }

    /// Current position in the load cycle.
    pub fn phase(&self) -> ViewerPhase {
        if self.props.source.is_none() {
            return ViewerPhase::NoSource;
        }

        match &self.document {
            SlotState::Failed => ViewerPhase::DocumentFailed,
            SlotState::Absent | SlotState::Pending { .. } => ViewerPhase::DocumentLoading,
            SlotState::Ready(_) => match &self.page {
                SlotState::Failed => ViewerPhase::PageFailed,
                SlotState::Ready(_) => ViewerPhase::Ready,
                SlotState::Absent | SlotState::Pending { .. } => ViewerPhase::PageLoading,
            },
        }
    }

    /// What to display for the current phase.
    pub fn view(&self) -> ViewContent<'_> {
        match self.phase() {
            ViewerPhase::NoSource => ViewContent::NoData(&self.props.placeholders.no_data),
            ViewerPhase::DocumentFailed | ViewerPhase::PageFailed => {
                ViewContent::Error(&self.props.placeholders.error)
            }
            ViewerPhase::Ready => ViewContent::Page(&self.surface),
            ViewerPhase::DocumentLoading | ViewerPhase::PageLoading => {
                if self.painted {
                    ViewContent::Page(&self.surface)
                } else {
                    ViewContent::Loading(&self.props.placeholders.loading)
                }
            }
        }
    }

    pub fn props(&self) -> &ViewerProps {
        &self.props
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Bumped on every successful paint; hosts use it to know when to
    /// re-upload the surface.
    pub fn paint_seq(&self) -> u64 {
        self.paint_seq
    }

    /// Metadata of the loaded document, once available.
    pub fn document_info(&self) -> Option<&DocumentInfo> {
        self.document.ready().map(|document| document.info())
    }

    fn bump_epoch(&mut self) -> u64 {
        self.next_epoch += 1;
        self.next_epoch
    }

    fn request_document(&mut self) {
        let Some(source) = self.props.source.clone() else {
            return;
        };

        let epoch = self.bump_epoch();
        tracing::debug!(epoch, source = ?source, "requesting document");
        self.document = SlotState::Pending { epoch };
        self.page = SlotState::Absent;
        self.outbox.push(AcquireRequest::Document { epoch, source });
    }

    fn request_page(&mut self) {
        let Some(document) = self.document.ready().map(Arc::clone) else {
            return;
        };

        let epoch = self.bump_epoch();
        let page_index = self.props.page.saturating_sub(1);
        tracing::debug!(epoch, page_index, "requesting page");
        self.outbox.push(AcquireRequest::Page {
            epoch,
            document,
            page_index,
        });
        self.page = SlotState::Pending { epoch };
    }

    fn paint(&mut self) {
        let SlotState::Ready(page) = &self.page else {
            return;
        };

        let ratio = match self.props.device_pixel_ratio {
            Some(ratio) if ratio > 0.0 => ratio,
            _ => 1.0,
        };
        let scale = effective_scale(page.base_size(), self.props.scale, self.props.width) * ratio;
        let viewport = page.viewport(scale, self.props.rotation);

        self.surface.resize_for(&viewport, ratio);
        if let Err(error) = page.render(&mut self.surface, &viewport) {
            tracing::warn!(%error, "page render failed");
            return;
        }

        self.painted = true;
        self.paint_seq += 1;
    }
}
