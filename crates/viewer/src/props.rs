//! Viewer configuration and reconfiguration diffing.

use pdf_embed_engine::DocumentSource;

/// Placeholder text shown while no page can be painted.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholders {
    /// Shown when no source is configured.
    pub no_data: String,

    /// Shown while a document or page acquisition is in flight and
    /// nothing has been painted yet.
    pub loading: String,

    /// Shown after a document or page acquisition failure.
    pub error: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Placeholders {
            no_data: "No PDF file specified.".to_owned(),
            loading: "Loading PDF...".to_owned(),
            error: "Failed to load PDF file.".to_owned(),
        }
    }
}

/// Configuration for one render cycle. Replaced wholesale on
/// reconfiguration; the viewer diffs old against new to decide how much
/// of the acquisition chain to re-run.
#[derive(Debug, Clone)]
pub struct ViewerProps {
    /// The document to show. A viewer cannot mount without one.
    pub source: Option<DocumentSource>,

    /// Requested page, 1-based.
    pub page: u32,

    /// Base render scale.
    pub scale: f32,

    /// Target display width. When set, the render scale is adjusted so
    /// the painted page occupies exactly this logical width.
    pub width: Option<f32>,

    /// Rotation in degrees.
    pub rotation: Option<f32>,

    /// Host display pixel ratio; 1.0 when absent.
    pub device_pixel_ratio: Option<f32>,

    /// Placeholder content for the no-source, loading and error states.
    pub placeholders: Placeholders,
}

impl Default for ViewerProps {
    fn default() -> Self {
        ViewerProps {
            source: None,
            page: 1,
            scale: 1.0,
            width: None,
            rotation: None,
            device_pixel_ratio: None,
            placeholders: Placeholders::default(),
        }
    }
}

impl ViewerProps {
    pub fn with_source(mut self, source: DocumentSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = Some(ratio);
        self
    }
}

/// What changed between two configurations.
///
/// Pure comparison, kept apart from the component so the "how much do we
/// redo" decision stays testable without a host framework in the loop.
/// Exact equality is intentional for the float fields: a configuration
/// is either the same value or it is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropsDiff {
    pub source_changed: bool,
    pub page_changed: bool,
    pub scale_changed: bool,
    pub width_changed: bool,
    pub rotation_changed: bool,
    pub pixel_ratio_changed: bool,
}

impl PropsDiff {
    pub fn between(old: &ViewerProps, new: &ViewerProps) -> Self {
        PropsDiff {
            source_changed: old.source != new.source,
            page_changed: old.page != new.page,
            scale_changed: old.scale != new.scale,
            width_changed: old.width != new.width,
            rotation_changed: old.rotation != new.rotation,
            pixel_ratio_changed: old.device_pixel_ratio != new.device_pixel_ratio,
        }
    }

    /// The document must be re-acquired from scratch.
    pub fn needs_document_reload(&self) -> bool {
        self.source_changed
    }

    /// The page must be re-fetched from the current document.
    pub fn needs_page_reload(&self) -> bool {
        self.page_changed || self.scale_changed || self.rotation_changed
    }

    /// The current page must be repainted even without a re-fetch.
    pub fn needs_repaint(&self) -> bool {
        self.scale_changed
            || self.width_changed
            || self.rotation_changed
            || self.pixel_ratio_changed
    }

    pub fn is_empty(&self) -> bool {
        !(self.source_changed
            || self.page_changed
            || self.scale_changed
            || self.width_changed
            || self.rotation_changed
            || self.pixel_ratio_changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_props() -> ViewerProps {
        ViewerProps::default().with_source(DocumentSource::Bytes(vec![1, 2, 3]))
    }

    #[test]
    fn identical_props_diff_empty() {
        let props = base_props();
        let diff = PropsDiff::between(&props, &props.clone());

        assert!(diff.is_empty());
        assert!(!diff.needs_document_reload());
        assert!(!diff.needs_page_reload());
        assert!(!diff.needs_repaint());
    }

    #[test]
    fn source_change_requires_document_reload() {
        let old = base_props();
        let new = old
            .clone()
            .with_source(DocumentSource::RemoteUrl("https://example.com/a.pdf".into()));

        let diff = PropsDiff::between(&old, &new);

        assert!(diff.source_changed);
        assert!(diff.needs_document_reload());
    }

    #[test]
    fn page_scale_rotation_require_page_reload() {
        let old = base_props();

        assert!(PropsDiff::between(&old, &old.clone().with_page(2)).needs_page_reload());
        assert!(PropsDiff::between(&old, &old.clone().with_scale(2.0)).needs_page_reload());
        assert!(PropsDiff::between(&old, &old.clone().with_rotation(90.0)).needs_page_reload());
    }

    #[test]
    fn width_change_only_requires_repaint() {
        let old = base_props();
        let diff = PropsDiff::between(&old, &old.clone().with_width(400.0));

        assert!(!diff.needs_document_reload());
        assert!(!diff.needs_page_reload());
        assert!(diff.needs_repaint());
    }

    #[test]
    fn default_props_match_documented_defaults() {
        let props = ViewerProps::default();

        assert_eq!(props.page, 1);
        assert_eq!(props.scale, 1.0);
        assert!(props.source.is_none());
        assert_eq!(props.placeholders.no_data, "No PDF file specified.");
        assert_eq!(props.placeholders.loading, "Loading PDF...");
        assert_eq!(props.placeholders.error, "Failed to load PDF file.");
    }
}
