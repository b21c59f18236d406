//! The drawable surface the viewer paints into.
//!
//! A surface is an RGBA pixel buffer plus the logical size the host
//! should display it at. Pixel dimensions track the viewport; display
//! dimensions are pixel dimensions divided by the device pixel ratio, so
//! the page renders at native resolution while occupying its
//! ratio-independent layout size.

use image::{Rgba, RgbaImage};

use crate::viewport::Viewport;

/// RGBA drawing surface owned by the viewer.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
    display_width: f32,
    display_height: f32,
}

impl Surface {
    /// An empty 0x0 surface; painted content arrives with the first
    /// resize-and-render cycle.
    pub fn new() -> Self {
        Surface {
            image: RgbaImage::new(0, 0),
            display_width: 0.0,
            display_height: 0.0,
        }
    }

    /// Size the surface for a viewport.
    ///
    /// Pixel dimensions become the viewport's pixel dimensions; display
    /// dimensions become pixels divided by `device_pixel_ratio`. The
    /// buffer is cleared to white, matching paper before ink.
    pub fn resize_for(&mut self, viewport: &Viewport, device_pixel_ratio: f32) {
        let (width, height) = viewport.pixel_dimensions();
        let ratio = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        self.image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        self.display_width = width as f32 / ratio;
        self.display_height = height as f32 / ratio;
    }

    /// Replace the pixel contents with a rendered page image.
    ///
    /// Display dimensions are untouched; callers size the surface via
    /// [`Surface::resize_for`] first.
    pub fn put_pixels(&mut self, image: RgbaImage) {
        self.image = image;
    }

    pub fn pixel_width(&self) -> u32 {
        self.image.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.image.height()
    }

    /// Logical width the host should lay this surface out at.
    pub fn display_width(&self) -> f32 {
        self.display_width
    }

    /// Logical height the host should lay this surface out at.
    pub fn display_height(&self) -> f32 {
        self.display_height
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}
