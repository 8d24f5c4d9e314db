use itertools::Itertools;
use rgb::RGB8;

use super::{
    ConcreteFillStyle, ConcreteStrokeStyle, Elem, FillStyle, Image, LoweredElem, LoweredImage,
    LoweredStyle, StrokeStyle, Style,
};

/// 'Lower' an [`Image`] to a [`LoweredImage`] - i.e. use values from [`RenderingOpts`] to make
/// concrete versions for every style.  The [`LoweredImage`] can then be unambiguously converted to
/// an image file, and the [`RenderingOpts`] is no longer needed.
pub(super) fn lower(image: &Image, opts: &RenderingOpts) -> LoweredImage {
    LoweredImage {
        elements: image
            .elements
            .iter()
            .map(|e| lower_elem(e, opts))
            .collect_vec(),
    }
}

/// 'Lower' a single [`Elem`] to a [`LoweredElem`], by converting all `XStyle`s to
/// `ConcreteXStyle`s
fn lower_elem(elem: &Elem, opts: &RenderingOpts) -> LoweredElem {
    match elem {
        Elem::LineSegment(pt1, pt2, stroke_style) => {
            LoweredElem::LineSegment(*pt1, *pt2, lower_stroke_style(stroke_style, opts))
        }
        Elem::CircularArc(arc, stroke_style) => {
            LoweredElem::CircularArc(*arc, lower_stroke_style(stroke_style, opts))
        }
        Elem::Polygon(pts, style) => LoweredElem::Polygon(pts.to_owned(), lower_style(style, opts)),
    }
}

fn lower_style(style: &Style, opts: &RenderingOpts) -> LoweredStyle {
    match style {
        Style::JustFill(f) => LoweredStyle::JustFill(lower_fill_style(f, opts)),
        Style::JustStroke(s) => LoweredStyle::JustStroke(lower_stroke_style(s, opts)),
        Style::FillAndStroke(f, s) => {
            LoweredStyle::FillAndStroke(lower_fill_style(f, opts), lower_stroke_style(s, opts))
        }
    }
}

/// Lowers a [`FillStyle`] by replacing any non-concrete styles (like [`FillStyle::Background`])
/// with a [`ConcreteFillStyle`] who's values are populated from `opts`.
fn lower_fill_style(style: &FillStyle, opts: &RenderingOpts) -> ConcreteFillStyle {
    let fill_color = match style {
        FillStyle::Background => opts.background_color,
        FillStyle::Cell => opts.cell_fill_color,
        FillStyle::Custom(concrete_style) => return concrete_style.to_owned(), // No lowering needed
    };
    ConcreteFillStyle { fill_color }
}

/// Lowers a [`StrokeStyle`] by replacing any non-concrete styles (like
/// [`StrokeStyle::CellBorder`]) with a [`ConcreteStrokeStyle`] who's values are populated from
/// `opts`.
fn lower_stroke_style(style: &StrokeStyle, opts: &RenderingOpts) -> ConcreteStrokeStyle {
    let (line_width, stroke_color) = match style {
        StrokeStyle::CellBorder => (opts.cell_line_width, opts.cell_stroke_color),
        StrokeStyle::Connector => (opts.connector_width, opts.connector_color),
        StrokeStyle::Custom(concrete_style) => return concrete_style.to_owned(), // No lowering needed
    };
    ConcreteStrokeStyle {
        line_width,
        stroke_color,
    }
}

/// Configuration for how an [`Image`] should be rendered.  Widths and the margin are in the same
/// layout units as the image itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingOpts {
    /// What color fills the whole canvas, behind every element
    pub background_color: RGB8,

    /// The base fill color of cells
    pub cell_fill_color: RGB8,
    /// The colour of cell outlines
    pub cell_stroke_color: RGB8,
    /// How many layout units wide the cell outlines are
    pub cell_line_width: f32,

    /// The colour of the lines joining neighbouring cells
    pub connector_color: RGB8,
    /// How many layout units wide the connector lines are
    pub connector_width: f32,

    /// How much space (in layout units) is reserved round the edge of the image
    pub margin: f32,
    /// Multiplies the scale which exactly fits the image to the canvas.  Values above `1` crop
    /// the image, values below `1` leave extra space round it.
    pub zoom: f32,
}

impl Default for RenderingOpts {
    fn default() -> Self {
        Self {
            background_color: RGB8::new(255, 255, 255),

            cell_fill_color: RGB8::new(70, 130, 180),
            cell_stroke_color: RGB8::new(0, 0, 0),
            cell_line_width: 0.05, // cell sizes

            connector_color: RGB8::new(1, 1, 1) * 200,
            connector_width: 0.1, // cell sizes

            margin: 0.5, // cell sizes
            zoom: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::V2;

    #[test]
    fn semantic_styles_take_values_from_opts() {
        let opts = RenderingOpts::default();
        let mut image = Image::empty();
        image.add(Elem::Polygon(
            vec![V2::new(0.0, 0.0), V2::new(1.0, 0.0), V2::new(0.0, 1.0)],
            Style::FillAndStroke(FillStyle::Cell, StrokeStyle::CellBorder),
        ));
        let custom = ConcreteStrokeStyle {
            line_width: 3.0,
            stroke_color: RGB8::new(1, 2, 3),
        };
        image.add(Elem::LineSegment(
            V2::new(0.0, 0.0),
            V2::new(1.0, 1.0),
            StrokeStyle::Custom(custom.clone()),
        ));

        let lowered = image.lower(&opts);
        let elems = lowered.elements();
        assert_eq!(
            elems[0].fill_style(),
            Some(&ConcreteFillStyle {
                fill_color: opts.cell_fill_color
            })
        );
        assert_eq!(
            elems[0].stroke_style().map(|s| s.line_width),
            Some(opts.cell_line_width)
        );
        assert_eq!(elems[1].stroke_style(), Some(&custom));
    }
}
