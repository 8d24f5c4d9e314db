//! Code to convert an [`Image`] to an SVG string

use itertools::Itertools;
use simple_xml_builder::XMLElement;

use crate::{color, utils::Rect2, V2Ext, V2};

use super::{
    lowering::lower, ConcreteFillStyle, ConcreteStrokeStyle, Image, LoweredElem, LoweredImage,
    RenderingOpts,
};

/// Generate an SVG root element for an unlowered [`Image`], exactly `width`x`height` pixels in
/// size
pub fn gen_svg(image: &Image, width: u32, height: u32, opts: &RenderingOpts) -> XMLElement {
    // Lower image then delegate to `gen_svg_from_lowered`
    gen_svg_from_lowered(&lower(image, opts), width, height, opts)
}

/// Generate an SVG root element for a lowered [`Image`] (i.e. one where all styles are stated
/// concretely).  The image is scaled uniformly to fit inside the canvas and centred within it.
pub fn gen_svg_from_lowered(
    lowered_image: &LoweredImage,
    width: u32,
    height: u32,
    opts: &RenderingOpts,
) -> XMLElement {
    let bbox = lowered_image
        .bbox()
        // An empty image has a 0-size bbox at the origin
        .unwrap_or_else(|| Rect2::point(V2::ZERO));
    let margin_vec = V2::ONE * opts.margin;
    let content_size = bbox.size() + margin_vec * 2.0;
    let canvas_size = V2::new(width as f32, height as f32);

    // Uniform scale which fits the content (plus margins) inside the canvas
    let fit_scale = if content_size.x > 0.0 && content_size.y > 0.0 {
        (canvas_size.x / content_size.x).min(canvas_size.y / content_size.y)
    } else {
        1.0
    };
    let scale = fit_scale * opts.zoom;
    // Maps the `min` corner of the bbox to inside the margin, then centres the slack
    let slack = canvas_size / scale - content_size;
    let translation = margin_vec - bbox.min() + slack / 2.0;

    // Generate the root SVG element
    let mut root = XMLElement::new("svg");
    root.add_attribute("xmlns", "http://www.w3.org/2000/svg");
    root.add_attribute("width", &width.to_string());
    root.add_attribute("height", &height.to_string());
    root.add_attribute("viewBox", &format!("0 0 {} {}", width, height));

    let mut background = XMLElement::new("rect");
    background.add_attribute("width", &width.to_string());
    background.add_attribute("height", &height.to_string());
    add_fill_style_attrs(
        Some(&ConcreteFillStyle {
            fill_color: opts.background_color,
        }),
        &mut background,
    );
    root.add_child(background);

    // Translate all `Elem`s to SVG's `XMLElement`s
    for e in lowered_image.elements() {
        root.add_child(gen_svg_elem(e, translation, scale));
    }

    root
}

/// Creates an [`XMLElement`] for a given [`LoweredElem`]
fn gen_svg_elem(elem: &LoweredElem, translation: V2, scale: f32) -> XMLElement {
    // Helper closure to transform (i.e. translate then scale) a point
    let transform_point = |pt: &V2| (*pt + translation) * scale;

    // Create an unstyled XML element
    let mut xml_elem = match elem {
        // For `LineSegment`, we use the SVG `<line>` element
        LoweredElem::LineSegment(untransformed_pt_1, untransformed_pt_2, _) => {
            let p1 = transform_point(untransformed_pt_1);
            let p2 = transform_point(untransformed_pt_2);
            let mut elem = XMLElement::new("line");
            elem.add_attribute("x1", &p1.x.to_string());
            elem.add_attribute("y1", &p1.y.to_string());
            elem.add_attribute("x2", &p2.x.to_string());
            elem.add_attribute("y2", &p2.y.to_string());
            elem
        }
        // For `CircularArc`, we use an SVG `<path>` element
        LoweredElem::CircularArc(untransformed_arc, _) => {
            let arc = untransformed_arc.transform(translation, scale);
            let mut elem = XMLElement::new("path");
            elem.add_attribute("d", &arc.svg_path_str());
            elem
        }
        // For `Polygon`, we use an SVG `<polygon>` element
        LoweredElem::Polygon(vertices, _) => {
            // The SVG point string is a whitespace-delimited list of vertices, expressed as `x,y`
            // pairs.  So the unit square at the origin would be `"0,0 0,1 1,1 1,0"`
            let coord_string = vertices
                .iter()
                .map(|vert| {
                    let vert = transform_point(vert);
                    format!("{},{}", vert.x, vert.y)
                })
                .join(" ");
            let mut cell_elem = XMLElement::new("polygon");
            cell_elem.add_attribute("points", &coord_string);
            cell_elem
        }
    };
    // Add styles
    add_fill_style_attrs(elem.fill_style(), &mut xml_elem);
    add_stroke_style_attrs(elem.stroke_style(), scale, &mut xml_elem);
    xml_elem
}

/// Add SVG attributes to give an [`XMLElement`] a given `FillStyle`
fn add_fill_style_attrs(style: Option<&ConcreteFillStyle>, xml_elem: &mut XMLElement) {
    match style {
        Some(s) => xml_elem.add_attribute("fill", &color::to_hex(s.fill_color)),
        None => xml_elem.add_attribute("fill", "none"), // We need `fill="none"` to disable the fill
    }
}

/// Add SVG attributes to give an [`XMLElement`] a given `StrokeStyle`
fn add_stroke_style_attrs(
    style: Option<&ConcreteStrokeStyle>,
    scale: f32,
    xml_elem: &mut XMLElement,
) {
    match style {
        Some(s) => {
            xml_elem.add_attribute("stroke", &color::to_hex(s.stroke_color));
            xml_elem.add_attribute("stroke-width", &(s.line_width * scale).to_string());
            xml_elem.add_attribute("stroke-linecap", "round"); // Always round off the line ends
            xml_elem.add_attribute("stroke-linejoin", "round"); // Always round off internal corners
        }
        None => xml_elem.add_attribute("stroke", "none"), // Put `stroke="none"` if no stroke
    }
}
