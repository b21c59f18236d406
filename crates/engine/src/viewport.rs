//! Viewport computation for a scale and rotation.

use crate::PageSize;

/// A page viewport: the pixel box a page occupies at a given scale and
/// rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in device pixels.
    pub width: f32,

    /// Height in device pixels.
    pub height: f32,

    /// Scale the viewport was computed at.
    pub scale: f32,

    /// Rotation in degrees, normalized to a quarter turn (0/90/180/270).
    pub rotation: u16,
}

impl Viewport {
    /// Compute the viewport for a page at `scale`, rotated by
    /// `rotation_deg` degrees.
    ///
    /// Rotation is normalized into [0, 360) and snapped to the nearest
    /// quarter turn; quarter turns swap width and height.
    pub fn of(base: PageSize, scale: f32, rotation_deg: Option<f32>) -> Self {
        let rotation = snap_quarter_turn(rotation_deg.unwrap_or(0.0));
        let (width_pt, height_pt) = match rotation {
            90 | 270 => (base.height_pt, base.width_pt),
            _ => (base.width_pt, base.height_pt),
        };

        Viewport {
            width: width_pt * scale,
            height: height_pt * scale,
            scale,
            rotation,
        }
    }

    /// Pixel dimensions rounded for surface allocation, at least 1x1.
    pub fn pixel_dimensions(&self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

/// Normalize an angle in degrees into [0, 360).
pub fn normalize_degrees(deg: f32) -> f32 {
    let wrapped = deg % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Snap an angle to the nearest quarter turn: 0, 90, 180 or 270.
pub fn snap_quarter_turn(deg: f32) -> u16 {
    let quarter = (normalize_degrees(deg) / 90.0).round() as u16;
    (quarter % 4) * 90
}
