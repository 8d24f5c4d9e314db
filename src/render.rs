//! Rasterization of SVG markup into pixel buffers

use image::{Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use thiserror::Error;

/// Something which can check and rasterize vector markup.  Parsing is split from rendering so
/// that malformed markup can be reported separately from rendering failures.
pub trait Rasterizer {
    /// A parsed, valid document which can be rendered any number of times
    type Document;

    fn parse(&self, markup: &str) -> Result<Self::Document, MalformedMarkup>;

    /// Renders `document`, stretched to exactly `width`x`height` pixels
    fn render(
        &self,
        document: &Self::Document,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, RasterError>;
}

/// The markup given to a [`Rasterizer`] couldn't be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed markup: {reason}")]
pub struct MalformedMarkup {
    pub reason: String,
}

impl MalformedMarkup {
    pub fn new(reason: impl ToString) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    #[error("can't rasterize to a {width}x{height} canvas")]
    InvalidSize { width: u32, height: u32 },
}

/// [`Rasterizer`] backed by `resvg`, which renders with anti-aliasing
pub struct ResvgRasterizer {
    options: usvg::Options<'static>,
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        Self {
            options: usvg::Options::default(),
        }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgRasterizer").finish_non_exhaustive()
    }
}

impl Rasterizer for ResvgRasterizer {
    type Document = usvg::Tree;

    fn parse(&self, markup: &str) -> Result<usvg::Tree, MalformedMarkup> {
        usvg::Tree::from_str(markup, &self.options).map_err(MalformedMarkup::new)
    }

    fn render(&self, tree: &usvg::Tree, width: u32, height: u32) -> Result<RgbaImage, RasterError> {
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or(RasterError::InvalidSize { width, height })?;
        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(tree, transform, &mut pixmap.as_mut());

        // `tiny_skia` stores premultiplied alpha, `image` expects straight alpha
        let mut raster = RgbaImage::new(width, height);
        for (dst, src) in raster.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4" viewBox="0 0 4 4"><rect width="4" height="4" fill="#ff0000"/></svg>"##;

    #[test]
    fn renders_at_requested_size() {
        let rasterizer = ResvgRasterizer::new();
        let tree = rasterizer.parse(SQUARE).unwrap();
        let raster = rasterizer.render(&tree, 8, 6).unwrap();
        assert_eq!(raster.dimensions(), (8, 6));
        assert_eq!(*raster.get_pixel(4, 3), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn malformed_markup_is_reported() {
        let rasterizer = ResvgRasterizer::new();
        assert!(rasterizer.parse("<svg><rect").is_err());
        assert!(rasterizer.parse("definitely not markup").is_err());
    }

    #[test]
    fn zero_size_is_an_error() {
        let rasterizer = ResvgRasterizer::new();
        let tree = rasterizer.parse(SQUARE).unwrap();
        assert_eq!(
            rasterizer.render(&tree, 0, 5),
            Err(RasterError::InvalidSize {
                width: 0,
                height: 5
            })
        );
    }
}
