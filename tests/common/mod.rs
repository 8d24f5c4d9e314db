#![allow(dead_code)]

use std::{cell::Cell, rc::Rc};

use kuvio::{GenerateError, Generator, Request};

pub const FILL: [u8; 4] = [0x33, 0x66, 0xcc, 0xff];

/// An SVG document filled with a single color
pub fn solid_svg(width: u32, height: u32) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="{w}" height="{h}" fill="#3366cc"/></svg>"##,
        w = width,
        h = height
    )
}

/// A generator which produces [`solid_svg`] and counts how often it's called
pub fn counting(calls: &Rc<Cell<usize>>) -> impl Generator {
    let calls = calls.clone();
    move |width: u32, height: u32, _: &Request| -> Result<String, GenerateError> {
        calls.set(calls.get() + 1);
        Ok(solid_svg(width, height))
    }
}

/// A generator whose output can be switched between valid and malformed markup by the
/// request's `broken` value
pub fn switchable() -> impl Generator {
    |width: u32, height: u32, request: &Request| -> Result<String, GenerateError> {
        match request.get("broken").and_then(|v| v.as_i64()) {
            Some(1) => Ok("<svg xmlns=\"http://www.w3.org/2000/svg\"><rect".to_owned()),
            _ => Ok(solid_svg(width, height)),
        }
    }
}
