//! Effective render scale.

use pdf_embed_engine::PageSize;

/// Compute the render scale for a page.
///
/// Without a width override the configured scale is used unchanged. With
/// one, the scale is adjusted so the rendered width at the base scale
/// matches the requested width: `scale * (width / natural_width)`, where
/// the natural width is the page width at the base scale. The device
/// pixel ratio is applied by the caller after this, so the override is
/// expressed in ratio-independent layout units.
pub fn effective_scale(base: PageSize, scale: f32, width: Option<f32>) -> f32 {
    let mut page_scale = 1.0;

    if let Some(width) = width {
        let natural_width = base.width_pt * scale;
        if natural_width > 0.0 {
            page_scale = width / natural_width;
        }
    }

    scale * page_scale
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: PageSize = PageSize {
        width_pt: 600.0,
        height_pt: 800.0,
    };

    #[test]
    fn without_width_scale_passes_through() {
        assert_eq!(effective_scale(PAGE, 1.0, None), 1.0);
        assert_eq!(effective_scale(PAGE, 2.5, None), 2.5);
    }

    #[test]
    fn width_override_pins_rendered_width() {
        // Rendered width = width_pt * effective = requested width,
        // whatever the base scale was.
        for base_scale in [0.5, 1.0, 1.5, 3.0] {
            let effective = effective_scale(PAGE, base_scale, Some(300.0));
            let rendered_width = PAGE.width_pt * effective;
            assert!((rendered_width - 300.0).abs() < 1e-3);
        }
    }

    #[test]
    fn degenerate_page_width_keeps_base_scale() {
        let zero = PageSize {
            width_pt: 0.0,
            height_pt: 100.0,
        };

        assert_eq!(effective_scale(zero, 1.5, Some(300.0)), 1.5);
    }
}
