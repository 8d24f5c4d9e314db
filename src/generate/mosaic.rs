//! A procedural mosaic: a jittered, rotated grid of colored cells, optionally joined by
//! connector lines between neighbouring cells.

use std::str::FromStr;

use angle::Deg;
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{get_choice, get_color, get_float, get_int, GenerateError, Generator};
use crate::{
    color::Hsl,
    img::{ConcreteFillStyle, Elem, FillStyle, Image, RenderingOpts, StrokeStyle, Style},
    params::{
        ChoiceParameter, ColorParameter, NumericParameter, ParameterError, ParameterSet, Request,
    },
    utils::{self, CircularArc},
    V2Ext, V2,
};

/// How far (as a fraction of the distance between them) arc connectors bow away from the
/// straight line between two cell centres
const ARC_BULGE: f32 = 0.25;

/// The mosaic generator.  See [`Mosaic::parameters`] for the values it reads from a request.
#[derive(Debug, Clone)]
pub struct Mosaic {
    /// Requests for more cells than this are rejected
    max_cells: i64,
}

impl Mosaic {
    pub fn new(max_cells: i64) -> Self {
        Self { max_cells }
    }

    /// Declares every parameter this generator reads, with their defaults, ranges and steps
    pub fn parameters(&self) -> Result<ParameterSet, ParameterError> {
        let styles = ConnectorStyle::ALL.iter().map(|s| s.as_str()).collect_vec();
        ParameterSet::new()
            .with(NumericParameter::integer("width", 1920, Some((1, 4096)), Some(128))?)?
            .with(NumericParameter::integer("height", 1080, Some((1, 4096)), Some(128))?)?
            .with(NumericParameter::integer("columns", 8, Some((1, 64)), None)?)?
            .with(NumericParameter::integer("rows", 5, Some((1, 64)), None)?)?
            .with(NumericParameter::fractional("scale", 0.8, Some((0.1, 10.0)), Some(0.1))?)?
            .with(NumericParameter::fractional("rotation", 0.0, Some((-180.0, 180.0)), None)?)?
            .with(NumericParameter::fractional("jitter", 0.15, Some((0.0, 0.45)), Some(0.01))?)?
            .with(ColorParameter::new("background", "#ffffff")?)?
            .with(ColorParameter::new("fill", "steelblue")?)?
            .with(ColorParameter::new("stroke", "#1b1b1b")?)?
            .with(NumericParameter::fractional("line_width", 0.05, Some((0.0, 1.0)), Some(0.01))?)?
            .with(ColorParameter::new("connector_color", "#f0a020")?)?
            .with(NumericParameter::fractional("connector_width", 0.08, Some((0.0, 1.0)), Some(0.01))?)?
            .with(ChoiceParameter::new("connector_style", &styles, "arc")?)?
            .with(NumericParameter::fractional("hue_spread", 20.0, Some((0.0, 180.0)), None)?)?
            .with(NumericParameter::fractional("saturation", 0.6, Some((0.0, 1.0)), Some(0.05))?)?
            .with(NumericParameter::fractional("lightness", 0.55, Some((0.0, 1.0)), Some(0.05))?)?
            .with(NumericParameter::integer("seed", 1, Some((0, 1_000_000)), None)?)
    }
}

impl Default for Mosaic {
    fn default() -> Self {
        Self::new(64 * 64)
    }
}

impl Generator for Mosaic {
    fn generate(&self, width: u32, height: u32, request: &Request) -> Result<String, GenerateError> {
        if width == 0 || height == 0 {
            return Err(GenerateError::InvalidSize { width, height });
        }
        let settings = Settings::from_request(request)?;
        let num_cells = settings.columns.checked_mul(settings.rows);
        let in_range = match num_cells {
            Some(n) => settings.columns >= 1 && settings.rows >= 1 && n <= self.max_cells,
            None => false,
        };
        if !in_range {
            return Err(GenerateError::InvalidValue {
                name: "columns".to_owned(),
                value: format!("{}x{}", settings.columns, settings.rows),
                reason: format!("grid must have between 1 and {} cells", self.max_cells),
            });
        }

        let image = settings.image();
        Ok(image.svg_string(width, height, &settings.opts))
    }
}

/// The style of line which joins neighbouring cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorStyle {
    None,
    Straight,
    Arc,
}

impl ConnectorStyle {
    pub const ALL: [ConnectorStyle; 3] =
        [ConnectorStyle::None, ConnectorStyle::Straight, ConnectorStyle::Arc];

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectorStyle::None => "none",
            ConnectorStyle::Straight => "straight",
            ConnectorStyle::Arc => "arc",
        }
    }
}

impl FromStr for ConnectorStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        Self::ALL.iter().copied().find(|style| style.as_str() == s).ok_or(())
    }
}

/// The values of a [`Request`], checked and converted into the types the generator works with
#[derive(Debug, Clone)]
struct Settings {
    columns: i64,
    rows: i64,
    rotation: f32,
    jitter: f32,
    hue_spread: f32,
    saturation: f32,
    lightness: f32,
    seed: u64,
    connector_style: ConnectorStyle,
    opts: RenderingOpts,
}

impl Settings {
    fn from_request(request: &Request) -> Result<Self, GenerateError> {
        let style_name = get_choice(request, "connector_style")?;
        let connector_style =
            ConnectorStyle::from_str(style_name).map_err(|()| GenerateError::InvalidValue {
                name: "connector_style".to_owned(),
                value: style_name.to_owned(),
                reason: "unknown connector style".to_owned(),
            })?;
        let seed = get_int(request, "seed")?;
        let opts = RenderingOpts {
            background_color: get_color(request, "background")?,
            cell_fill_color: get_color(request, "fill")?,
            cell_stroke_color: get_color(request, "stroke")?,
            cell_line_width: get_float(request, "line_width")? as f32,
            connector_color: get_color(request, "connector_color")?,
            connector_width: get_float(request, "connector_width")? as f32,
            zoom: get_float(request, "scale")? as f32,
            ..RenderingOpts::default()
        };
        if opts.zoom <= 0.0 {
            return Err(GenerateError::InvalidValue {
                name: "scale".to_owned(),
                value: opts.zoom.to_string(),
                reason: "must be positive".to_owned(),
            });
        }
        Ok(Self {
            columns: get_int(request, "columns")?,
            rows: get_int(request, "rows")?,
            rotation: get_float(request, "rotation")? as f32,
            // Larger jitter would let neighbouring vertices cross over
            jitter: (get_float(request, "jitter")? as f32).clamp(0.0, 0.45),
            hue_spread: get_float(request, "hue_spread")? as f32,
            saturation: get_float(request, "saturation")? as f32,
            lightness: get_float(request, "lightness")? as f32,
            seed: seed as u64,
            connector_style,
            opts,
        })
    }

    /// Builds the mosaic's [`Image`].  All randomness comes from an RNG seeded by `seed`, drawn
    /// in a fixed order, so the same settings always give the same image.
    fn image(&self) -> Image {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let cols = self.columns as usize;
        let rows = self.rows as usize;

        // Vertices of the grid, centred on the origin and rotated about it
        let centre = V2::new(cols as f32, rows as f32) / 2.0;
        let verts = (0..=rows)
            .cartesian_product(0..=cols)
            .map(|(y, x)| {
                let offset = V2::new(
                    rng.gen_range(-self.jitter..=self.jitter),
                    rng.gen_range(-self.jitter..=self.jitter),
                );
                (V2::new(x as f32, y as f32) + offset - centre).rotate(Deg(self.rotation))
            })
            .collect_vec();
        let vert = |x: usize, y: usize| verts[y * (cols + 1) + x];

        let mut image = Image::empty();
        let base = Hsl::from_rgb(self.opts.cell_fill_color);
        let mut centres = Vec::with_capacity(cols * rows);
        for (y, x) in (0..rows).cartesian_product(0..cols) {
            let corners = vec![vert(x, y), vert(x + 1, y), vert(x + 1, y + 1), vert(x, y + 1)];
            centres.push(utils::centroid(corners.iter().copied()).unwrap_or(V2::ZERO));

            let hue_shift = if self.hue_spread > 0.0 {
                rng.gen_range(-self.hue_spread..=self.hue_spread)
            } else {
                0.0
            };
            let fill = FillStyle::Custom(ConcreteFillStyle {
                fill_color: Hsl {
                    hue: base.hue + hue_shift,
                    saturation: self.saturation,
                    lightness: self.lightness,
                }
                .to_rgb(),
            });
            let style = if self.opts.cell_line_width > 0.0 {
                Style::FillAndStroke(fill, StrokeStyle::CellBorder)
            } else {
                Style::JustFill(fill)
            };
            image.add(Elem::Polygon(corners, style));
        }

        if self.connector_style != ConnectorStyle::None && self.opts.connector_width > 0.0 {
            let centre_of = |x: usize, y: usize| centres[y * cols + x];
            let across = (0..rows)
                .cartesian_product(0..cols.saturating_sub(1))
                .map(|(y, x)| (centre_of(x, y), centre_of(x + 1, y)));
            let down = (0..rows.saturating_sub(1))
                .cartesian_product(0..cols)
                .map(|(y, x)| (centre_of(x, y), centre_of(x, y + 1)));
            let connectors = across
                .chain(down)
                .map(|(from, to)| self.connector(from, to))
                .collect_vec();
            image.add_iter(connectors);
        }

        image
    }

    fn connector(&self, from: V2, to: V2) -> Elem {
        match self.connector_style {
            ConnectorStyle::Arc => match CircularArc::with_bulge(from, to, ARC_BULGE) {
                Some(arc) => Elem::CircularArc(arc, StrokeStyle::Connector),
                // Coincident centres can't be joined by an arc
                None => Elem::LineSegment(from, to, StrokeStyle::Connector),
            },
            _ => Elem::LineSegment(from, to, StrokeStyle::Connector),
        }
    }
}
