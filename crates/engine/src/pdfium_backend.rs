//! PDFium-backed rasterizing backend, enabled with the `pdfium` cargo
//! feature.
//!
//! Requires the PDFium native library at runtime. Library discovery
//! tries the executable's directory first (app bundle layouts), then the
//! working directory, then the system library paths.

use std::sync::Arc;

use pdfium_render::prelude::*;

use crate::error::EngineError;
use crate::source::ResolvedSource;
use crate::surface::Surface;
use crate::viewport::Viewport;
use crate::{DocumentHandle, DocumentInfo, PageHandle, PageSize, PdfEngine};

/// Rasterizing backend bound to the PDFium native library.
pub struct PdfiumBackend {
    pdfium: &'static Pdfium,
}

impl PdfiumBackend {
    /// Bind to PDFium and keep the binding for the process lifetime.
    pub fn new() -> Result<Self, EngineError> {
        let pdfium = Box::leak(Box::new(init_pdfium()?));
        Ok(Self { pdfium })
    }
}

fn init_pdfium() -> Result<Pdfium, EngineError> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    if let Some(ref dir) = exe_dir {
        if let Ok(bindings) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        {
            return Ok(Pdfium::new(bindings));
        }
    }

    Ok(Pdfium::new(
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|err| EngineError::Init(err.to_string()))?,
    ))
}

impl PdfEngine for PdfiumBackend {
    fn load_document(
        &self,
        source: &ResolvedSource,
    ) -> Result<Box<dyn DocumentHandle>, EngineError> {
        let bytes = source.clone().into_bytes()?;

        // PDFium borrows the backing bytes for the document's lifetime;
        // the handle is held across arbitrary host frames, so give the
        // bytes a static lifetime the way the binding requires.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());

        let doc = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|err| EngineError::Load(err.to_string()))?;

        let mut sizes = Vec::with_capacity(doc.pages().len() as usize);
        for page in doc.pages().iter() {
            sizes.push(PageSize {
                width_pt: page.width().value,
                height_pt: page.height().value,
            });
        }

        if sizes.is_empty() {
            return Err(EngineError::Load("document has no pages".to_owned()));
        }

        let metadata = doc.metadata();
        let info = DocumentInfo {
            page_count: sizes.len() as u32,
            title: metadata
                .get(PdfDocumentMetadataTagType::Title)
                .map(|tag| tag.value().to_string()),
            author: metadata
                .get(PdfDocumentMetadataTagType::Author)
                .map(|tag| tag.value().to_string()),
        };

        tracing::debug!(page_count = info.page_count, "pdfium document loaded");

        Ok(Box::new(PdfiumDocument {
            shared: Arc::new(SharedDocument { doc, sizes }),
            info,
        }))
    }
}

struct SharedDocument {
    doc: PdfDocument<'static>,
    sizes: Vec<PageSize>,
}

struct PdfiumDocument {
    shared: Arc<SharedDocument>,
    info: DocumentInfo,
}

impl DocumentHandle for PdfiumDocument {
    fn info(&self) -> &DocumentInfo {
        &self.info
    }

    fn page(&self, index: u32) -> Result<Box<dyn PageHandle>, EngineError> {
        let size = self.shared.sizes.get(index as usize).copied().ok_or(
            EngineError::PageOutOfRange {
                page: index,
                page_count: self.shared.sizes.len() as u32,
            },
        )?;

        Ok(Box::new(PdfiumPage {
            shared: Arc::clone(&self.shared),
            index,
            size,
        }))
    }
}

struct PdfiumPage {
    shared: Arc<SharedDocument>,
    index: u32,
    size: PageSize,
}

impl PageHandle for PdfiumPage {
    fn index(&self) -> u32 {
        self.index
    }

    fn base_size(&self) -> PageSize {
        self.size
    }

    fn render(&self, surface: &mut Surface, viewport: &Viewport) -> Result<(), EngineError> {
        let page = self
            .shared
            .doc
            .pages()
            .get(self.index as u16)
            .map_err(|_| EngineError::PageOutOfRange {
                page: self.index,
                page_count: self.shared.sizes.len() as u32,
            })?;

        // Render unrotated at the transposed target size, then turn the
        // bitmap; quarter turns are exact on the raster.
        let (view_width, view_height) = viewport.pixel_dimensions();
        let (target_width, target_height) = match viewport.rotation {
            90 | 270 => (view_height, view_width),
            _ => (view_width, view_height),
        };

        let config = PdfRenderConfig::new()
            .set_target_width(target_width as i32)
            .set_target_height(target_height as i32)
            .render_form_data(true)
            .render_annotations(true);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|err| EngineError::Render(err.to_string()))?;

        let rendered = bitmap.as_image().to_rgba8();
        let oriented = match viewport.rotation {
            90 => image::imageops::rotate90(&rendered),
            180 => image::imageops::rotate180(&rendered),
            270 => image::imageops::rotate270(&rendered),
            _ => rendered,
        };

        surface.put_pixels(oriented);

        Ok(())
    }
}
