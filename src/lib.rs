//! Live, parameter-driven previews of procedurally generated vector images.
//!
//! A [`ParameterSet`] holds the named values a user is tuning.  Each parameter keeps a value and
//! its paired widgets in lockstep through a [`ValueBinding`](params::ValueBinding).  A
//! [`PreviewPipeline`] turns a snapshot of those values into SVG markup (via a [`Generator`]),
//! validates and rasterizes it (via a [`Rasterizer`]), caches the result and pushes it to a
//! display surface or writes it to disk.

use vector2d::Vector2D;

pub mod color;
pub mod generate;
pub mod img;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod session;
mod utils;

pub use generate::{GenerateError, Generator, Mosaic};
pub use params::{ParamValue, ParameterError, ParameterSet, Request};
pub use pipeline::{
    ExportError, ExportKind, GeneratedArtifact, PipelineError, PipelineState, PreviewPipeline,
};
pub use render::{Rasterizer, ResvgRasterizer};
pub use session::Session;
pub use utils::{CircularArc, Rect2};

/// Type alias for 2D floating point vectors (in the geometric sense, unlike [`Vec`])
pub type V2 = Vector2D<f32>;

/// Extra constants and methods for [`V2`]
pub trait V2Ext: Sized {
    const ZERO: Self;
    const ONE: Self;

    /// Rotates this vector **clockwise** (in screen space) by `angle`
    fn rotate(self, angle: impl angle::Angle<f32> + Copy) -> Self;

    /// Returns the midpoint between `self` and `other`
    fn midpoint(self, other: Self) -> Self;

    /// The vector rotated 90 degrees anti-clockwise (in screen space), i.e. pointing to the left
    /// of the direction of travel.  `Vector2D::normal` points the other way.
    fn left_normal(self) -> Self;
}

impl V2Ext for V2 {
    const ZERO: Self = Vector2D { x: 0.0, y: 0.0 };
    const ONE: Self = Vector2D { x: 1.0, y: 1.0 };

    fn rotate(self, angle: impl angle::Angle<f32> + Copy) -> Self {
        utils::rotate_vec(self, angle)
    }

    fn midpoint(self, other: Self) -> Self {
        (self + other) / 2.0
    }

    fn left_normal(self) -> Self {
        V2::new(self.y, -self.x)
    }
}
