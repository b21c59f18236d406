//! Default pure-Rust backend.
//!
//! Parses real structure (page tree, media boxes, info dictionary) with
//! lopdf and rasterizes placeholder page images: white fill with a light
//! border. Real content rasterization lives in the `pdfium` feature
//! backend; this one keeps the viewer fully functional, and testable,
//! without a native library on the machine.

use lopdf::{Document, Object};

use crate::error::EngineError;
use crate::source::ResolvedSource;
use crate::surface::Surface;
use crate::viewport::Viewport;
use crate::{DocumentHandle, DocumentInfo, PageHandle, PageSize, PdfEngine};

const US_LETTER: PageSize = PageSize {
    width_pt: 612.0,
    height_pt: 792.0,
};

/// Structure-only backend backed by lopdf.
#[derive(Debug, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfEngine for LopdfBackend {
    fn load_document(
        &self,
        source: &ResolvedSource,
    ) -> Result<Box<dyn DocumentHandle>, EngineError> {
        let bytes = source.clone().into_bytes()?;

        if bytes
            .windows("/Encrypt".len())
            .any(|window| window == b"/Encrypt")
        {
            return Err(EngineError::EncryptedUnsupported);
        }

        let doc =
            Document::load_mem(&bytes).map_err(|err| EngineError::Load(err.to_string()))?;

        let page_sizes = page_sizes(&doc);
        if page_sizes.is_empty() {
            return Err(EngineError::Load("document has no pages".to_owned()));
        }

        let info = DocumentInfo {
            page_count: page_sizes.len() as u32,
            title: info_string(&doc, b"Title"),
            author: info_string(&doc, b"Author"),
        };

        tracing::debug!(page_count = info.page_count, "document loaded");

        Ok(Box::new(LopdfDocument { info, page_sizes }))
    }
}

struct LopdfDocument {
    info: DocumentInfo,
    page_sizes: Vec<PageSize>,
}

impl DocumentHandle for LopdfDocument {
    fn info(&self) -> &DocumentInfo {
        &self.info
    }

    fn page(&self, index: u32) -> Result<Box<dyn PageHandle>, EngineError> {
        let size = self.page_sizes.get(index as usize).copied().ok_or(
            EngineError::PageOutOfRange {
                page: index,
                page_count: self.page_sizes.len() as u32,
            },
        )?;

        Ok(Box::new(LopdfPage { index, size }))
    }
}

struct LopdfPage {
    index: u32,
    size: PageSize,
}

impl PageHandle for LopdfPage {
    fn index(&self) -> u32 {
        self.index
    }

    fn base_size(&self) -> PageSize {
        self.size
    }

    fn render(&self, surface: &mut Surface, _viewport: &Viewport) -> Result<(), EngineError> {
        let width = surface.pixel_width();
        let height = surface.pixel_height();
        let image = surface.image_mut();

        for pixel in image.pixels_mut() {
            *pixel = image::Rgba([255, 255, 255, 255]);
        }

        if width >= 4 && height >= 4 {
            let border = image::Rgba([220, 220, 220, 255]);
            for x in 0..width {
                image.put_pixel(x, 0, border);
                image.put_pixel(x, height - 1, border);
            }
            for y in 0..height {
                image.put_pixel(0, y, border);
                image.put_pixel(width - 1, y, border);
            }
        }

        Ok(())
    }
}

/// Media-box size per page, falling back to US Letter when a page
/// carries no usable media box.
fn page_sizes(doc: &Document) -> Vec<PageSize> {
    let pages = doc.get_pages();
    let mut sizes = Vec::with_capacity(pages.len());

    for (_, object_id) in pages {
        let size = doc
            .get_dictionary(object_id)
            .ok()
            .and_then(|dict| dict.get(b"MediaBox").ok())
            .and_then(|object| object.as_array().ok())
            .and_then(|array| {
                if array.len() != 4 {
                    return None;
                }
                let x0 = array[0].as_float().ok()?;
                let y0 = array[1].as_float().ok()?;
                let x1 = array[2].as_float().ok()?;
                let y1 = array[3].as_float().ok()?;
                Some(PageSize {
                    width_pt: (x1 - x0).abs(),
                    height_pt: (y1 - y0).abs(),
                })
            })
            .unwrap_or(US_LETTER);

        sizes.push(size);
    }

    sizes
}

/// A text entry from the document information dictionary.
fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = doc.trailer.get(b"Info").ok()?;

    let dict = match info {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };

    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_pdf_bytes;

    #[test]
    fn loads_document_and_reads_page_count() {
        let backend = LopdfBackend::new();
        let doc = backend
            .load_document(&ResolvedSource::Bytes(sample_pdf_bytes(3)))
            .expect("load should succeed");

        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.info().title.as_deref(), Some("Sample"));
    }

    #[test]
    fn page_exposes_media_box_size() {
        let backend = LopdfBackend::new();
        let doc = backend
            .load_document(&ResolvedSource::Bytes(sample_pdf_bytes(1)))
            .expect("load should succeed");

        let page = doc.page(0).expect("page 0 should exist");

        assert_eq!(page.base_size().width_pt, 612.0);
        assert_eq!(page.base_size().height_pt, 792.0);
    }

    #[test]
    fn out_of_range_page_is_rejected() {
        let backend = LopdfBackend::new();
        let doc = backend
            .load_document(&ResolvedSource::Bytes(sample_pdf_bytes(2)))
            .expect("load should succeed");

        let err = doc.page(2).expect_err("page 2 should be out of range");

        assert!(matches!(
            err,
            EngineError::PageOutOfRange {
                page: 2,
                page_count: 2
            }
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let backend = LopdfBackend::new();

        let err = backend
            .load_document(&ResolvedSource::Bytes(b"not a pdf".to_vec()))
            .expect_err("load should fail");

        assert!(matches!(err, EngineError::Load(_)));
    }

    #[test]
    fn render_fills_surface_with_bordered_placeholder() {
        let backend = LopdfBackend::new();
        let doc = backend
            .load_document(&ResolvedSource::Bytes(sample_pdf_bytes(1)))
            .expect("load should succeed");
        let page = doc.page(0).expect("page 0 should exist");

        let viewport = page.viewport(0.1, None);
        let mut surface = Surface::new();
        surface.resize_for(&viewport, 1.0);
        page.render(&mut surface, &viewport).expect("render");

        let image = surface.image();
        assert_eq!(image.get_pixel(0, 0), &image::Rgba([220, 220, 220, 255]));
        assert_eq!(
            image.get_pixel(image.width() / 2, image.height() / 2),
            &image::Rgba([255, 255, 255, 255])
        );
    }
}
