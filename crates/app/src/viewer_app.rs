//! eframe shell hosting the viewer component.
//!
//! The shell owns the UI state (source, page, zoom, rotation), rebuilds
//! the viewer's props from it every frame, and lets the component's own
//! diffing decide whether anything needs re-acquiring or repainting.
//! Acquisitions run on the loader's worker thread; the frame loop pumps
//! requests out and completions in.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use pdf_embed_engine::{DocumentSource, LopdfBackend, PdfEngine};
use pdf_embed_viewer::{
    PdfViewer, ThreadedLoader, ViewContent, ViewerCallbacks, ViewerPhase, ViewerProps,
};

const MIN_SCALE: f32 = 0.25;
const MAX_SCALE: f32 = 4.0;

/// Pick the best available backend: PDFium when the feature is enabled
/// and the native library binds, the structural backend otherwise.
fn build_engine() -> Arc<dyn PdfEngine> {
    #[cfg(feature = "pdfium")]
    match pdf_embed_engine::PdfiumBackend::new() {
        Ok(backend) => return Arc::new(backend),
        Err(error) => {
            tracing::warn!(%error, "PDFium unavailable, falling back to structural backend");
        }
    }

    Arc::new(LopdfBackend::new())
}

pub struct PdfEmbedApp {
    loader: ThreadedLoader,
    viewer: Option<PdfViewer>,

    // Source and view configuration, fed into the viewer as props.
    source: Option<DocumentSource>,
    page: u32,
    scale: f32,
    rotation: f32,

    page_count: Option<u32>,

    // Uploaded copy of the painted surface.
    texture: Option<egui::TextureHandle>,
    uploaded_paint: u64,

    url_input: String,

    // Last callback notification, shown in the status bar.
    last_event: Rc<RefCell<Option<String>>>,
}

impl PdfEmbedApp {
    pub fn new() -> Self {
        PdfEmbedApp {
            loader: ThreadedLoader::spawn(build_engine()),
            viewer: None,
            source: None,
            page: 1,
            scale: 1.0,
            rotation: 0.0,
            page_count: None,
            texture: None,
            uploaded_paint: 0,
            url_input: String::new(),
            last_event: Rc::new(RefCell::new(None)),
        }
    }

    fn current_props(&self, pixels_per_point: f32) -> ViewerProps {
        let mut props = ViewerProps::default()
            .with_page(self.page)
            .with_scale(self.scale)
            .with_device_pixel_ratio(pixels_per_point);

        if self.rotation != 0.0 {
            props = props.with_rotation(self.rotation);
        }
        props.source = self.source.clone();

        props
    }

    /// Mount a fresh viewer on the given source.
    fn load_source(&mut self, source: DocumentSource, ctx: &egui::Context) {
        tracing::info!(source = ?source, "loading document source");
        self.source = Some(source);
        self.page = 1;
        self.rotation = 0.0;
        self.page_count = None;
        self.texture = None;
        self.uploaded_paint = 0;

        let callbacks = {
            let documents = Rc::clone(&self.last_event);
            let document_errors = Rc::clone(&self.last_event);
            let pages = Rc::clone(&self.last_event);
            let page_errors = Rc::clone(&self.last_event);

            ViewerCallbacks::default()
                .on_document_complete(move |page_count, _document| {
                    *documents.borrow_mut() = Some(format!("Document loaded: {page_count} page(s)"));
                })
                .on_document_error(move |error| {
                    *document_errors.borrow_mut() = Some(format!("Document failed: {error}"));
                })
                .on_page_complete(move |index, _page| {
                    *pages.borrow_mut() = Some(format!("Page {index} ready"));
                })
                .on_page_error(move |error| {
                    *page_errors.borrow_mut() = Some(format!("Page failed: {error}"));
                })
        };

        match PdfViewer::mount_with(self.current_props(ctx.pixels_per_point()), callbacks) {
            Ok(viewer) => self.viewer = Some(viewer),
            Err(error) => {
                *self.last_event.borrow_mut() = Some(error.to_string());
                self.viewer = None;
            }
        }
    }

    fn open_file(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .pick_file()
        {
            self.load_source(DocumentSource::FilePath(path), ctx);
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add_space(8.0);

                if ui.button("📂 Open").clicked() {
                    self.open_file(ctx);
                }

                ui.separator();

                ui.label("URL:");
                ui.add(egui::TextEdit::singleline(&mut self.url_input).desired_width(260.0));
                if ui.button("Load").clicked() && !self.url_input.trim().is_empty() {
                    let url = self.url_input.trim().to_owned();
                    self.load_source(DocumentSource::RemoteUrl(url), ctx);
                }

                ui.separator();

                ui.add_enabled_ui(self.viewer.is_some(), |ui| {
                    if ui.button("◀").clicked() && self.page > 1 {
                        self.page -= 1;
                    }

                    let page_text = match self.page_count {
                        Some(count) => format!("{} / {}", self.page, count),
                        None => "— / —".to_owned(),
                    };
                    ui.label(page_text);

                    let at_end = self
                        .page_count
                        .is_some_and(|count| self.page >= count);
                    if ui.button("▶").clicked() && !at_end {
                        self.page += 1;
                    }

                    ui.separator();

                    if ui.button("−").clicked() {
                        self.scale = (self.scale - 0.25).max(MIN_SCALE);
                    }
                    ui.label(format!("{:.0}%", self.scale * 100.0));
                    if ui.button("+").clicked() {
                        self.scale = (self.scale + 0.25).min(MAX_SCALE);
                    }

                    ui.separator();

                    if ui.button("⟳ Rotate").clicked() {
                        self.rotation = (self.rotation + 90.0) % 360.0;
                    }
                });
            });
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(event) = self.last_event.borrow().as_deref() {
                    ui.label(event);
                } else {
                    ui.weak("Open a PDF file or load a URL");
                }
            });
        });
    }

    /// Re-upload the painted surface whenever the viewer repainted.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let Some(viewer) = &self.viewer else { return };

        if viewer.paint_seq() == self.uploaded_paint || viewer.paint_seq() == 0 {
            return;
        }

        let image = viewer.surface().image();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [image.width() as usize, image.height() as usize],
            image.as_raw(),
        );
        self.texture =
            Some(ctx.load_texture("pdf-page", color_image, egui::TextureOptions::LINEAR));
        self.uploaded_paint = viewer.paint_seq();
    }

    fn viewport(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(viewer) = &self.viewer else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a PDF to get started");
                });
                return;
            };

            match viewer.view() {
                ViewContent::NoData(text)
                | ViewContent::Loading(text)
                | ViewContent::Error(text) => {
                    ui.centered_and_justified(|ui| {
                        ui.label(text);
                    });
                }
                ViewContent::Page(surface) => {
                    let size = egui::vec2(surface.display_width(), surface.display_height());

                    egui::ScrollArea::both()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            let Some(texture) = &self.texture else { return };

                            // Center the page in the viewport.
                            let available = ui.available_size();
                            let padding_x = ((available.x - size.x) / 2.0).max(0.0);
                            let padding_y = ((available.y - size.y) / 2.0).max(0.0);

                            ui.add_space(padding_y);
                            ui.horizontal(|ui| {
                                ui.add_space(padding_x);
                                let (rect, _response) =
                                    ui.allocate_exact_size(size, egui::Sense::hover());
                                ui.painter().image(
                                    texture.id(),
                                    rect,
                                    egui::Rect::from_min_max(
                                        egui::pos2(0.0, 0.0),
                                        egui::pos2(1.0, 1.0),
                                    ),
                                    egui::Color32::WHITE,
                                );
                            });
                        });
                }
            }
        });
    }
}

impl eframe::App for PdfEmbedApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let props = self.current_props(ctx.pixels_per_point());

        if let Some(viewer) = self.viewer.as_mut() {
            viewer.update(props);
            self.loader.pump(viewer);
            self.page_count = viewer.document_info().map(|info| info.page_count);

            // Completions arrive off-frame; keep polling while loading.
            if matches!(
                viewer.phase(),
                ViewerPhase::DocumentLoading | ViewerPhase::PageLoading
            ) {
                ctx.request_repaint_after(Duration::from_millis(50));
            }
        }

        self.sync_texture(ctx);
        self.toolbar(ctx);
        self.status_bar(ctx);
        self.viewport(ctx);
    }
}
