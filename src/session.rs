//! A [`Session`] ties one [`ParameterSet`] to one [`PreviewPipeline`]

use std::{cell::Cell, fmt, path::Path, rc::Rc};

use tracing::debug;

use crate::{
    generate::{Generator, Mosaic},
    params::{ParameterError, ParameterSet},
    pipeline::{
        DisplaySurface, ExportError, ExportKind, FrameBuffer, GeneratedArtifact, PipelineError,
        PreviewPipeline,
    },
    render::{Rasterizer, ResvgRasterizer},
};

/// The parameters and preview pipeline for one image being edited.
///
/// Parameter edits only mark the session as dirty.  Regeneration happens in
/// [`Session::update`], so an input event which changes many parameters at once (like
/// [`ParameterSet::reset_all`]) regenerates once rather than once per parameter.
pub struct Session<G, R = ResvgRasterizer, D = FrameBuffer> {
    params: ParameterSet,
    pipeline: PreviewPipeline<G, R, D>,
    dirty: Rc<Cell<bool>>,
}

impl Session<Mosaic> {
    /// A session for the [`Mosaic`] generator, with its full parameter catalog, rendered by
    /// `resvg` into an in-memory [`FrameBuffer`]
    pub fn mosaic() -> Result<Self, ParameterError> {
        let mosaic = Mosaic::default();
        let params = mosaic.parameters()?;
        Ok(Self::new(
            params,
            PreviewPipeline::new(mosaic, ResvgRasterizer::new(), FrameBuffer::new()),
        ))
    }
}

impl<G: Generator, R: Rasterizer, D: DisplaySurface> Session<G, R, D> {
    /// Creates a new `Session`.  The session starts dirty, so the first [`Session::update`]
    /// generates an image.
    pub fn new(mut params: ParameterSet, pipeline: PreviewPipeline<G, R, D>) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let flag = dirty.clone();
        params.on_any_value_changed(move |name, value| {
            debug!(name, %value, "parameter changed");
            flag.set(true);
        });
        Self {
            params,
            pipeline,
            dirty,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Mutable access to the parameters.  Changes made through this are picked up by the next
    /// [`Session::update`].
    pub fn params_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    pub fn pipeline(&self) -> &PreviewPipeline<G, R, D> {
        &self.pipeline
    }

    /// Returns `true` if a parameter has changed since the last generation
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Applies one input event to the parameters, then regenerates if anything changed.  Returns
    /// the event's own output along with the outcome of the regeneration (`None` if the event
    /// changed nothing).
    pub fn dispatch<T>(
        &mut self,
        event: impl FnOnce(&mut ParameterSet) -> T,
    ) -> (T, Option<Result<Rc<GeneratedArtifact>, PipelineError>>) {
        let output = event(&mut self.params);
        let outcome = self.update();
        (output, outcome)
    }

    /// Regenerates if any parameter has changed since the last generation.  Returns `None` if
    /// nothing needed doing.
    pub fn update(&mut self) -> Option<Result<Rc<GeneratedArtifact>, PipelineError>> {
        if self.dirty.get() {
            Some(self.refresh())
        } else {
            None
        }
    }

    /// Regenerates unconditionally
    pub fn refresh(&mut self) -> Result<Rc<GeneratedArtifact>, PipelineError> {
        self.dirty.set(false);
        self.pipeline.refresh(&self.params.to_request())
    }

    /// Redraws the cached image for a new display size, without regenerating
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.pipeline.resize(width, height)
    }

    pub fn export(&self, path: &Path, kind: ExportKind) -> Result<(), ExportError> {
        self.pipeline.export(path, kind)
    }

    pub fn export_to(&self, path: &Path) -> Result<(), ExportError> {
        self.pipeline.export_to(path)
    }
}

impl<G, R, D: fmt::Debug> fmt::Debug for Session<G, R, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("params", &self.params)
            .field("pipeline", &self.pipeline)
            .field("dirty", &self.dirty.get())
            .finish()
    }
}
