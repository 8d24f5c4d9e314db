//! The preview pipeline: generate, validate, rasterize, cache, then display or export.

use std::{convert::TryFrom, fmt, path::Path, rc::Rc};

use image::{imageops::FilterType, RgbaImage};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    generate::{GenerateError, Generator},
    params::Request,
    render::{MalformedMarkup, RasterError, Rasterizer, ResvgRasterizer},
};

mod display;
mod export;

pub use display::{DisplaySurface, FrameBuffer};
pub use export::{ExportError, ExportKind};

/// Settings for a [`PreviewPipeline`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Output size used by [`PreviewPipeline::refresh`] when the request has no usable `width`
    /// or `height`
    pub fallback_size: (u32, u32),
    /// Filter used to scale the cached raster to the viewport
    pub preview_filter: FilterType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_size: (1920, 1080),
            preview_filter: FilterType::Triangle,
        }
    }
}

/// The output of one successful pipeline run.  Artifacts are immutable once created, so readers
/// hold them through an [`Rc`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    pub markup: String,
    pub raster: RgbaImage,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    /// Nothing has been generated yet
    Idle,
    Generating,
    Valid(Rc<GeneratedArtifact>),
    Failed(PipelineError),
}

/// Why a pipeline run failed.  Each variant has a distinct message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("generation failed: {0}")]
    Generation(#[from] GenerateError),
    #[error("generator produced unusable markup: {0}")]
    MalformedMarkup(#[from] MalformedMarkup),
    #[error("rasterization failed: {0}")]
    Rasterize(#[from] RasterError),
}

/// Turns [`Request`]s into [`GeneratedArtifact`]s, caches the most recent one and pushes
/// previews of it to a [`DisplaySurface`]
pub struct PreviewPipeline<G, R = ResvgRasterizer, D = FrameBuffer> {
    generator: G,
    rasterizer: R,
    display: D,
    config: Config,
    state: PipelineState,
    /// The size of the display area, as of the last [`PreviewPipeline::resize`]
    viewport: Option<(u32, u32)>,
}

impl<G: Generator, R: Rasterizer, D: DisplaySurface> PreviewPipeline<G, R, D> {
    pub fn new(generator: G, rasterizer: R, display: D) -> Self {
        Self::with_config(generator, rasterizer, display, Config::default())
    }

    pub fn with_config(generator: G, rasterizer: R, display: D, config: Config) -> Self {
        Self {
            generator,
            rasterizer,
            display,
            config,
            state: PipelineState::Idle,
            viewport: None,
        }
    }

    /* Getters */

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// The cached artifact, if the last run succeeded
    pub fn artifact(&self) -> Option<Rc<GeneratedArtifact>> {
        match &self.state {
            PipelineState::Valid(artifact) => Some(artifact.clone()),
            _ => None,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.viewport
    }

    /* Triggers */

    /// Regenerates at the size given by the request's `width` and `height` values, falling back
    /// on [`Config::fallback_size`] for whichever is missing or unusable
    pub fn refresh(&mut self, request: &Request) -> Result<Rc<GeneratedArtifact>, PipelineError> {
        let (fallback_width, fallback_height) = self.config.fallback_size;
        let width = size_from_request(request, "width").unwrap_or(fallback_width);
        let height = size_from_request(request, "height").unwrap_or(fallback_height);
        self.regenerate(request, width, height)
    }

    /// Runs the whole pipeline for `request` at `width`x`height` pixels.  On success the new
    /// artifact replaces the cached one and is displayed.  On failure the cache and display are
    /// both cleared.
    pub fn regenerate(
        &mut self,
        request: &Request,
        width: u32,
        height: u32,
    ) -> Result<Rc<GeneratedArtifact>, PipelineError> {
        self.state = PipelineState::Generating;
        debug!(width, height, params = request.len(), "generating");
        match self.run(request, width, height) {
            Ok(artifact) => {
                let artifact = Rc::new(artifact);
                info!(width, height, bytes = artifact.markup.len(), "generated image");
                self.state = PipelineState::Valid(artifact.clone());
                self.redisplay();
                Ok(artifact)
            }
            Err(e) => {
                warn!(error = %e, "pipeline run failed");
                self.state = PipelineState::Failed(e.clone());
                self.display.clear();
                Err(e)
            }
        }
    }

    fn run(
        &self,
        request: &Request,
        width: u32,
        height: u32,
    ) -> Result<GeneratedArtifact, PipelineError> {
        if width == 0 || height == 0 {
            return Err(GenerateError::InvalidSize { width, height }.into());
        }
        let markup = self.generator.generate(width, height, request)?;
        debug!(bytes = markup.len(), "validating markup");
        let document = self.rasterizer.parse(&markup)?;
        debug!("rasterizing");
        let raster = self.rasterizer.render(&document, width, height)?;
        Ok(GeneratedArtifact {
            markup,
            raster,
            width,
            height,
        })
    }

    /// Records a new display size and redraws the cached raster to fit it.  This never calls
    /// the generator.  Returns `true` if a frame was pushed to the display.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        debug!(width, height, "viewport resized");
        self.viewport = Some((width, height));
        self.redisplay()
    }

    /// Pushes the cached raster to the display, scaled to fit the viewport (or at full size if
    /// no viewport has been set)
    fn redisplay(&mut self) -> bool {
        let artifact = match &self.state {
            PipelineState::Valid(artifact) => artifact.clone(),
            _ => return false,
        };
        match self.viewport {
            None => self.display.show_artifact(&artifact.raster),
            Some((width, height)) => match preview(&artifact.raster, width, height, &self.config) {
                Some(scaled) => self.display.show_artifact(&scaled),
                None => {
                    self.display.clear();
                    return false;
                }
            },
        }
        true
    }

    /// Writes the cached artifact to `path`.  If there is no artifact, nothing is written and
    /// [`ExportError::NoArtifact`] is returned.  Failures never change the pipeline's state.
    pub fn export(&self, path: &Path, kind: ExportKind) -> Result<(), ExportError> {
        let artifact = match self.artifact() {
            Some(artifact) => artifact,
            None => {
                debug!(path = %path.display(), "nothing to export");
                return Err(ExportError::NoArtifact);
            }
        };
        export::write(&artifact, path, kind)?;
        info!(path = %path.display(), ?kind, "exported image");
        Ok(())
    }

    /// Like [`PreviewPipeline::export`], but picks the [`ExportKind`] from `path`'s extension
    pub fn export_to(&self, path: &Path) -> Result<(), ExportError> {
        let kind = ExportKind::from_path(path)?;
        self.export(path, kind)
    }
}

impl<G, R, D: fmt::Debug> fmt::Debug for PreviewPipeline<G, R, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewPipeline")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("viewport", &self.viewport)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

fn size_from_request(request: &Request, name: &str) -> Option<u32> {
    let value = request.get(name)?.as_i64()?;
    u32::try_from(value).ok().filter(|v| *v > 0)
}

/// The largest size with the same aspect ratio as `(width, height)` which fits inside
/// `(max_width, max_height)`
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
        return None;
    }
    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let fitted_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let fitted_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    Some((fitted_width, fitted_height))
}

/// Scales `raster` to fit a `width`x`height` viewport, keeping its aspect ratio
fn preview(raster: &RgbaImage, width: u32, height: u32, config: &Config) -> Option<RgbaImage> {
    let (raster_width, raster_height) = raster.dimensions();
    let (w, h) = fit_within(raster_width, raster_height, width, height)?;
    if (w, h) == (raster_width, raster_height) {
        return Some(raster.clone());
    }
    Some(image::imageops::resize(raster, w, h, config.preview_filter))
}
