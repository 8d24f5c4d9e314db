//! Vector image description and rendering utilities.  In essence, this is an intermediate
//! representation (IR) for vector images: generators describe *what* to draw with semantic styles
//! (e.g. [`StrokeStyle::Connector`]), which are then lowered using a [`RenderingOpts`] into
//! concrete colors and widths and written out as SVG.

mod ir;
mod lowering;
pub mod svg;

pub use ir::{ConcreteFillStyle, ConcreteStrokeStyle, FillStyle, StrokeStyle};
pub use lowering::RenderingOpts;

/// Re-export of [`ir::Image`] with the type params needed by the rest of the code
pub type Image = ir::Image<FillStyle, StrokeStyle>;
/// Version of [`ir::Image`] where all the styles are fully specified
pub type LoweredImage = ir::Image<ConcreteFillStyle, ConcreteStrokeStyle>;

/// Re-export of [`ir::Elem`] with the type params needed by the rest of the code
pub type Elem = ir::Elem<FillStyle, StrokeStyle>;
/// Version of [`ir::Elem`] where all the styles are fully specified
pub type LoweredElem = ir::Elem<ConcreteFillStyle, ConcreteStrokeStyle>;

/// Re-export of [`ir::Style`] with the type params needed by the rest of the code
pub type Style = ir::Style<FillStyle, StrokeStyle>;
/// Version of [`ir::Style`] where all the styles are fully specified
pub type LoweredStyle = ir::Style<ConcreteFillStyle, ConcreteStrokeStyle>;
