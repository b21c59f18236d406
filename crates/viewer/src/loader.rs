//! Acquisition requests, completions, and the threaded driver.
//!
//! The viewer emits [`AcquireRequest`]s and consumes
//! [`AcquireCompletion`]s; it never executes anything itself. That split
//! keeps state transitions confined to completion application and makes
//! mid-flight reconfiguration a pure epoch comparison. [`execute`] turns
//! one request into one completion against an engine;
//! [`ThreadedLoader`] runs that on a background worker so document
//! parsing and fetching stay off the host's frame loop.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use pdf_embed_engine::{
    DocumentHandle, DocumentSource, EngineError, PageHandle, PdfEngine,
};

use crate::viewer::PdfViewer;

/// One asynchronous acquisition step, tagged with the epoch captured at
/// issue time.
pub enum AcquireRequest {
    /// Resolve a source and load a document from it.
    Document { epoch: u64, source: DocumentSource },

    /// Fetch one page (zero-based) from a loaded document.
    Page {
        epoch: u64,
        document: Arc<dyn DocumentHandle>,
        page_index: u32,
    },
}

impl AcquireRequest {
    pub fn epoch(&self) -> u64 {
        match self {
            AcquireRequest::Document { epoch, .. } => *epoch,
            AcquireRequest::Page { epoch, .. } => *epoch,
        }
    }
}

/// The outcome of one acquisition step, carrying the request's epoch
/// back so the viewer can detect staleness.
pub enum AcquireCompletion {
    Document {
        epoch: u64,
        result: Result<Arc<dyn DocumentHandle>, EngineError>,
    },
    Page {
        epoch: u64,
        result: Result<Box<dyn PageHandle>, EngineError>,
    },
}

/// Execute one request against an engine.
///
/// Source resolution happens here too, so base64 decoding and file
/// reads stay off the host loop along with parsing.
pub fn execute(engine: &dyn PdfEngine, request: AcquireRequest) -> AcquireCompletion {
    match request {
        AcquireRequest::Document { epoch, source } => {
            let result = source
                .resolve()
                .and_then(|resolved| engine.load_document(&resolved))
                .map(Arc::from);

            AcquireCompletion::Document { epoch, result }
        }
        AcquireRequest::Page {
            epoch,
            document,
            page_index,
        } => AcquireCompletion::Page {
            epoch,
            result: document.page(page_index),
        },
    }
}

/// Stock driver: one worker thread executing requests in order.
///
/// Completions queue up until the host drains them, so application
/// still happens on the host's own loop.
pub struct ThreadedLoader {
    requests: Option<mpsc::Sender<AcquireRequest>>,
    completions: mpsc::Receiver<AcquireCompletion>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadedLoader {
    pub fn spawn(engine: Arc<dyn PdfEngine>) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<AcquireRequest>();
        let (completion_tx, completion_rx) = mpsc::channel();

        let worker = std::thread::Builder::new()
            .name("pdf-acquire".to_owned())
            .spawn(move || {
                while let Ok(request) = request_rx.recv() {
                    tracing::debug!(epoch = request.epoch(), "executing acquisition");
                    if completion_tx.send(execute(engine.as_ref(), request)).is_err() {
                        break;
                    }
                }
            })
            .expect("failed to spawn acquisition worker");

        ThreadedLoader {
            requests: Some(request_tx),
            completions: completion_rx,
            worker: Some(worker),
        }
    }

    pub fn submit(&self, request: AcquireRequest) {
        if let Some(requests) = &self.requests {
            let _ = requests.send(request);
        }
    }

    /// Completions that have arrived since the last drain.
    pub fn drain(&self) -> Vec<AcquireCompletion> {
        self.completions.try_iter().collect()
    }

    /// Forward the viewer's pending requests and apply any finished
    /// completions. Call once per host frame.
    pub fn pump(&self, viewer: &mut PdfViewer) {
        for request in viewer.take_requests() {
            self.submit(request);
        }
        for completion in self.drain() {
            viewer.apply(completion);
        }
    }
}

impl Drop for ThreadedLoader {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use pdf_embed_engine::{DocumentInfo, PageSize, ResolvedSource, Surface, Viewport};

    struct FixedDocument {
        info: DocumentInfo,
    }

    impl DocumentHandle for FixedDocument {
        fn info(&self) -> &DocumentInfo {
            &self.info
        }

        fn page(&self, index: u32) -> Result<Box<dyn PageHandle>, EngineError> {
            if index >= self.info.page_count {
                return Err(EngineError::PageOutOfRange {
                    page: index,
                    page_count: self.info.page_count,
                });
            }
            Ok(Box::new(FixedPage { index }))
        }
    }

    struct FixedPage {
        index: u32,
    }

    impl PageHandle for FixedPage {
        fn index(&self) -> u32 {
            self.index
        }

        fn base_size(&self) -> PageSize {
            PageSize {
                width_pt: 612.0,
                height_pt: 792.0,
            }
        }

        fn render(&self, _surface: &mut Surface, _viewport: &Viewport) -> Result<(), EngineError> {
            Ok(())
        }
    }

    struct FixedEngine {
        pages: u32,
    }

    impl PdfEngine for FixedEngine {
        fn load_document(
            &self,
            _source: &ResolvedSource,
        ) -> Result<Box<dyn DocumentHandle>, EngineError> {
            Ok(Box::new(FixedDocument {
                info: DocumentInfo {
                    page_count: self.pages,
                    title: None,
                    author: None,
                },
            }))
        }
    }

    #[test]
    fn execute_chains_resolution_into_document_load() {
        let engine = FixedEngine { pages: 4 };
        let request = AcquireRequest::Document {
            epoch: 9,
            source: DocumentSource::Bytes(vec![1, 2, 3]),
        };

        match execute(&engine, request) {
            AcquireCompletion::Document { epoch, result } => {
                assert_eq!(epoch, 9);
                assert_eq!(result.expect("load should succeed").page_count(), 4);
            }
            AcquireCompletion::Page { .. } => panic!("expected a document completion"),
        }
    }

    #[test]
    fn execute_reports_resolution_failures_as_document_failures() {
        let engine = FixedEngine { pages: 1 };
        let request = AcquireRequest::Document {
            epoch: 1,
            source: DocumentSource::Base64("!!bad!!".to_owned()),
        };

        match execute(&engine, request) {
            AcquireCompletion::Document { result, .. } => {
                assert!(matches!(
                    result.expect_err("decode should fail"),
                    EngineError::InvalidBase64(_)
                ));
            }
            AcquireCompletion::Page { .. } => panic!("expected a document completion"),
        }
    }

    #[test]
    fn threaded_loader_round_trips_a_document_request() {
        let loader = ThreadedLoader::spawn(Arc::new(FixedEngine { pages: 2 }));

        loader.submit(AcquireRequest::Document {
            epoch: 5,
            source: DocumentSource::Bytes(vec![0]),
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let completions = loader.drain();
            if !completions.is_empty() {
                match &completions[0] {
                    AcquireCompletion::Document { epoch, result } => {
                        assert_eq!(*epoch, 5);
                        assert!(result.is_ok());
                    }
                    AcquireCompletion::Page { .. } => panic!("expected a document completion"),
                }
                break;
            }
            assert!(Instant::now() < deadline, "worker never completed");
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}
