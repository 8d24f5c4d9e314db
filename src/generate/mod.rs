//! Procedural image generators.  A [`Generator`] turns a pixel size and a flat [`Request`] of
//! named values into SVG markup.

use rgb::RGB8;
use thiserror::Error;

use crate::params::{ParamValue, Request};

mod mosaic;

pub use mosaic::{ConnectorStyle, Mosaic};

/// Something which can turn a [`Request`] into vector markup
pub trait Generator {
    /// Generates SVG markup for an image `width`x`height` pixels in size.  Generation must be
    /// deterministic: identical arguments give identical markup.
    fn generate(&self, width: u32, height: u32, request: &Request) -> Result<String, GenerateError>;
}

/// Closures make convenient one-off generators
impl<F> Generator for F
where
    F: Fn(u32, u32, &Request) -> Result<String, GenerateError>,
{
    fn generate(&self, width: u32, height: u32, request: &Request) -> Result<String, GenerateError> {
        self(width, height, request)
    }
}

/// The ways that a generator can reject a request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("image size must be positive, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("request has no parameter {0:?}")]
    MissingParameter(String),
    #[error("parameter {name:?} should be {expected}, got {actual}")]
    WrongType {
        name: String,
        expected: &'static str,
        actual: String,
    },
    #[error("parameter {name:?} = {value} is unusable: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

/* Typed access to request values */

fn lookup<'r>(request: &'r Request, name: &str) -> Result<&'r ParamValue, GenerateError> {
    request
        .get(name)
        .ok_or_else(|| GenerateError::MissingParameter(name.to_owned()))
}

fn wrong_type(name: &str, expected: &'static str, actual: &ParamValue) -> GenerateError {
    GenerateError::WrongType {
        name: name.to_owned(),
        expected,
        actual: actual.to_string(),
    }
}

pub(crate) fn get_int(request: &Request, name: &str) -> Result<i64, GenerateError> {
    let value = lookup(request, name)?;
    value
        .as_i64()
        .ok_or_else(|| wrong_type(name, "an integer", value))
}

pub(crate) fn get_float(request: &Request, name: &str) -> Result<f64, GenerateError> {
    let value = lookup(request, name)?;
    value.as_f64().ok_or_else(|| wrong_type(name, "a number", value))
}

pub(crate) fn get_color(request: &Request, name: &str) -> Result<RGB8, GenerateError> {
    let value = lookup(request, name)?;
    value.as_color().ok_or_else(|| wrong_type(name, "a color", value))
}

pub(crate) fn get_choice<'r>(request: &'r Request, name: &str) -> Result<&'r str, GenerateError> {
    let value = lookup(request, name)?;
    value.as_choice().ok_or_else(|| wrong_type(name, "a choice", value))
}
