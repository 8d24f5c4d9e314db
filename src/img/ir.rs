//! An intermediate representation for vector images

use rgb::RGB8;

use crate::{
    utils::{CircularArc, Rect2},
    V2,
};

use super::{lowering, svg, LoweredImage, RenderingOpts};

/// A full [`Image`], composed of many [`Elem`]ents.  Coordinates are in arbitrary 'layout units';
/// the SVG writer scales them to fit the requested pixel size.
#[derive(Debug, Clone)]
pub struct Image<F, S> {
    pub(super) elements: Vec<Elem<F, S>>,
}

impl<F, S> Image<F, S> {
    /// Creates an empty `Image` (i.e. one which contains no [`Elem`]s)
    pub fn empty() -> Self {
        Self { elements: vec![] }
    }

    /// Adds a new [`Elem`] to this `Image`
    pub fn add(&mut self, elem: Elem<F, S>) {
        self.elements.push(elem)
    }

    pub fn add_iter(&mut self, elems: impl IntoIterator<Item = Elem<F, S>>) {
        self.elements.extend(elems)
    }

    /// Compute the smallest [`Rect2`] which fits around every [`Elem`] in this `Image`.  This
    /// returns `None` if the `Image` contains no [`Elem`]s.
    pub fn bbox(&self) -> Option<Rect2> {
        Rect2::union_iter(self.elements.iter().map(Elem::bbox))
    }

    pub fn elements(&self) -> &[Elem<F, S>] {
        self.elements.as_slice()
    }
}

/// Helper methods for easy conversions to various formats
impl Image<FillStyle, StrokeStyle> {
    /// Lowers this image and writes it as an SVG document exactly `width`x`height` pixels in size
    pub fn svg_string(&self, width: u32, height: u32, opts: &RenderingOpts) -> String {
        svg::gen_svg(self, width, height, opts).to_string()
    }

    pub fn lower(&self, opts: &RenderingOpts) -> LoweredImage {
        lowering::lower(self, opts)
    }
}

/// The shape of an [`Elem`]
#[derive(Debug, Clone)]
pub enum Elem<F, S> {
    LineSegment(V2, V2, S),
    CircularArc(CircularArc, S),
    Polygon(Vec<V2>, Style<F, S>),
}

impl<F, S> Elem<F, S> {
    /// Returns the smallest [`Rect2`] which contains this element
    pub fn bbox(&self) -> Rect2 {
        match self {
            Elem::LineSegment(p1, p2, _) => Rect2::point(*p1).union(Rect2::point(*p2)),
            Elem::CircularArc(arc, _) => arc.bbox(),
            Elem::Polygon(verts, _) => {
                // An empty polygon draws nothing, but still needs a position
                Rect2::bbox(verts.iter().copied())
                    .unwrap_or_else(|| Rect2::point(V2::new(0.0, 0.0)))
            }
        }
    }

    /// Gets the fill style of this `Elem`, if it exists.  It may not exist - for example,
    /// [`Elem::LineSegment`]s can't be filled.
    pub fn fill_style(&self) -> Option<&F> {
        match self {
            Elem::LineSegment(..) | Elem::CircularArc(..) => None,
            Elem::Polygon(_, style) => style.fill_style(),
        }
    }

    /// Gets the stroke style of this `Elem`, if it exists.
    pub fn stroke_style(&self) -> Option<&S> {
        match self {
            Elem::LineSegment(_, _, stroke_style) => Some(stroke_style),
            Elem::CircularArc(_, stroke_style) => Some(stroke_style),
            Elem::Polygon(_, style) => style.stroke_style(),
        }
    }
}

/////////////
// STYLING //
/////////////

/// The full styling of an [`Elem`], which is either filled or stroked or both (but invisible
/// elements are not possible).
#[derive(Debug, Clone)]
pub enum Style<F, S> {
    JustFill(F),
    JustStroke(S),
    FillAndStroke(F, S),
}

impl<F, S> Style<F, S> {
    pub fn fill_style(&self) -> Option<&F> {
        match self {
            Self::JustFill(f) => Some(f),
            Self::JustStroke(_) => None,
            Self::FillAndStroke(f, _) => Some(f),
        }
    }

    pub fn stroke_style(&self) -> Option<&S> {
        match self {
            Self::JustFill(_) => None,
            Self::JustStroke(s) => Some(s),
            Self::FillAndStroke(_, s) => Some(s),
        }
    }
}

/// The visual style of the body of an [`Elem`]
#[derive(Debug, Clone)]
pub enum FillStyle {
    /// The color behind everything else
    Background,
    /// The base color of a cell, before any per-cell variation
    Cell,
    Custom(ConcreteFillStyle),
}

/// A fully specified [`FillStyle`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteFillStyle {
    pub fill_color: RGB8,
}

/// The visual style of the outline of an [`Elem`]
#[derive(Debug, Clone)]
pub enum StrokeStyle {
    /// The outline of a cell
    CellBorder,
    /// A line joining the centres of two neighbouring cells
    Connector,
    Custom(ConcreteStrokeStyle),
}

/// A fully specified [`StrokeStyle`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConcreteStrokeStyle {
    pub line_width: f32,
    pub stroke_color: RGB8,
}
