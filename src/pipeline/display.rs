use image::RgbaImage;

/// Somewhere a [`PreviewPipeline`](super::PreviewPipeline) can show its bitmaps
pub trait DisplaySurface {
    /// Replaces whatever is currently shown with `pixels`
    fn show_artifact(&mut self, pixels: &RgbaImage);

    /// Shows nothing.  Called when a run fails, so that a stale preview is never left on screen.
    fn clear(&mut self);
}

/// An in-memory [`DisplaySurface`] which keeps the last frame it was shown
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    frame: Option<RgbaImage>,
    frames_shown: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently displayed frame, or `None` if the display is blank
    pub fn frame(&self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    /// How many times [`DisplaySurface::show_artifact`] has been called
    pub fn frames_shown(&self) -> usize {
        self.frames_shown
    }
}

impl DisplaySurface for FrameBuffer {
    fn show_artifact(&mut self, pixels: &RgbaImage) {
        self.frame = Some(pixels.clone());
        self.frames_shown += 1;
    }

    fn clear(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_frame() {
        let mut buffer = FrameBuffer::new();
        assert!(buffer.frame().is_none());
        buffer.show_artifact(&RgbaImage::new(2, 3));
        buffer.show_artifact(&RgbaImage::new(4, 5));
        assert_eq!(buffer.frame().map(|f| f.dimensions()), Some((4, 5)));
        assert_eq!(buffer.frames_shown(), 2);
        buffer.clear();
        assert!(buffer.frame().is_none());
        assert_eq!(buffer.frames_shown(), 2);
    }
}
