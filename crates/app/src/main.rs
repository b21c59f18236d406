//! PDF Embed demo application
//!
//! Entry point for the eframe shell hosting the viewer component.

mod viewer_app;

use eframe::egui;
use viewer_app::PdfEmbedApp;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("PDF Embed"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Embed",
        options,
        Box::new(|_cc| Ok(Box::new(PdfEmbedApp::new()))),
    )
}
