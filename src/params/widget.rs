//! Headless models of the widgets that display a parameter.  Each widget owns the value it shows
//! and reports its own change notification whenever that value changes, unless its signals are
//! blocked (see [`SignalBlocker`]).

use std::ops::{Deref, DerefMut};

use image::{Rgba, RgbaImage};
use rgb::RGB8;

/// Behaviour shared by every widget: the ability to block its change notifications
pub trait Widget {
    fn signals_blocked(&self) -> bool;

    /// Sets whether change notifications are blocked, returning the previous setting
    fn block_signals(&mut self, blocked: bool) -> bool;
}

/// Blocks a [`Widget`]'s change notifications for as long as this guard lives.  The previous
/// blocking state is restored on drop, so guards nest correctly.
pub struct SignalBlocker<'w, W: Widget> {
    widget: &'w mut W,
    was_blocked: bool,
}

impl<'w, W: Widget> SignalBlocker<'w, W> {
    pub fn new(widget: &'w mut W) -> Self {
        let was_blocked = widget.block_signals(true);
        Self {
            widget,
            was_blocked,
        }
    }
}

impl<W: Widget> Deref for SignalBlocker<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.widget
    }
}

impl<W: Widget> DerefMut for SignalBlocker<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.widget
    }
}

impl<W: Widget> Drop for SignalBlocker<'_, W> {
    fn drop(&mut self) {
        self.widget.block_signals(self.was_blocked);
    }
}

/// Returns `Some(value)` if a widget whose value changed should notify its listeners
fn notify<T>(changed: bool, blocked: bool, value: T) -> Option<T> {
    if changed && !blocked {
        Some(value)
    } else {
        None
    }
}

macro_rules! impl_widget {
    ($($name: ident),*) => {
        $(
            impl Widget for $name {
                fn signals_blocked(&self) -> bool {
                    self.blocked
                }

                fn block_signals(&mut self, blocked: bool) -> bool {
                    std::mem::replace(&mut self.blocked, blocked)
                }
            }
        )*
    };
}

impl_widget!(SpinBox, Slider, LineEdit, Swatch, ComboBox);

///////////////
// SPIN BOX  //
///////////////

/// A bounded numeric edit field, showing its value to a fixed number of decimal places
#[derive(Debug, Clone)]
pub struct SpinBox {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    decimals: u32,
    blocked: bool,
}

impl SpinBox {
    pub fn new(decimals: u32) -> Self {
        Self {
            value: 0.0,
            min: 0.0,
            max: 99.0,
            step: 1.0,
            decimals,
            blocked: false,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Sets the value, clamped to the range and rounded to the displayed precision
    pub fn set_value(&mut self, value: f64) -> Option<f64> {
        let value = self.round(value.clamp(self.min, self.max));
        let changed = value != self.value;
        self.value = value;
        notify(changed, self.blocked, value)
    }

    /// Sets the range, clamping the current value into it
    pub fn set_range(&mut self, min: f64, max: f64) -> Option<f64> {
        self.min = self.round(min);
        self.max = self.round(max).max(self.min);
        self.set_value(self.value)
    }

    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }

    /// Moves the value by `steps` single steps, as the arrow buttons or keys would
    pub fn step_by(&mut self, steps: i32) -> Option<f64> {
        self.set_value(self.value + self.step * steps as f64)
    }

    /// The text the field currently shows
    pub fn text(&self) -> String {
        format!("{:.*}", self.decimals as usize, self.value)
    }

    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals as i32);
        (value * factor).round() / factor
    }
}

////////////
// SLIDER //
////////////

/// A bounded integer slider
#[derive(Debug, Clone)]
pub struct Slider {
    value: i64,
    min: i64,
    max: i64,
    single_step: i64,
    blocked: bool,
}

impl Slider {
    pub fn new() -> Self {
        Self {
            value: 0,
            min: 0,
            max: 99,
            single_step: 1,
            blocked: false,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn range(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    pub fn single_step(&self) -> i64 {
        self.single_step
    }

    /// Moves the handle, clamping to the slider's range
    pub fn set_value(&mut self, value: i64) -> Option<i64> {
        let value = value.clamp(self.min, self.max);
        let changed = value != self.value;
        self.value = value;
        notify(changed, self.blocked, value)
    }

    pub fn set_range(&mut self, min: i64, max: i64) -> Option<i64> {
        self.min = min;
        self.max = max.max(min);
        self.set_value(self.value)
    }

    pub fn set_single_step(&mut self, step: i64) {
        self.single_step = step.max(1);
    }
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

///////////////
// LINE EDIT //
///////////////

/// A single-line text field
#[derive(Debug, Clone, Default)]
pub struct LineEdit {
    text: String,
    blocked: bool,
}

impl LineEdit {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) -> Option<String> {
        let changed = self.text != text;
        if changed {
            self.text = text.to_owned();
        }
        notify(changed, self.blocked, self.text.clone())
    }
}

////////////
// SWATCH //
////////////

/// A solid block of color which shows the current value of a color parameter
#[derive(Debug, Clone)]
pub struct Swatch {
    color: RGB8,
    blocked: bool,
}

impl Swatch {
    pub fn new(color: RGB8) -> Self {
        Self {
            color,
            blocked: false,
        }
    }

    pub fn color(&self) -> RGB8 {
        self.color
    }

    pub fn set_color(&mut self, color: RGB8) -> Option<RGB8> {
        let changed = self.color != color;
        self.color = color;
        notify(changed, self.blocked, color)
    }

    /// Draws the swatch as an opaque `size`x`size` icon
    pub fn icon(&self, size: u32) -> RgbaImage {
        let RGB8 { r, g, b } = self.color;
        RgbaImage::from_pixel(size, size, Rgba([r, g, b, 255]))
    }
}

///////////////
// COMBO BOX //
///////////////

/// A drop-down list of options, of which exactly one is selected
#[derive(Debug, Clone)]
pub struct ComboBox {
    options: Vec<String>,
    current: usize,
    blocked: bool,
}

impl ComboBox {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            current: 0,
            blocked: false,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Selects an option by index.  Out-of-range indices are ignored.
    pub fn set_current_index(&mut self, index: usize) -> Option<usize> {
        if index >= self.options.len() {
            return None;
        }
        let changed = index != self.current;
        self.current = index;
        notify(changed, self.blocked, index)
    }
}

////////////////////
// POINTER EVENTS //
////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Keyboard modifiers held while a pointer event happened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
    };
}

/// A mouse button event delivered to one of a parameter's widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, button: MouseButton, modifiers: Modifiers) -> Self {
        Self {
            kind,
            button,
            modifiers,
        }
    }

    /// The reset gesture: releasing the middle button with only Ctrl held
    pub fn is_reset_gesture(&self) -> bool {
        self.kind == PointerEventKind::Release && self.is_reset_button()
    }

    /// `true` for both halves (press and release) of the reset gesture
    pub(super) fn is_reset_button(&self) -> bool {
        self.button == MouseButton::Middle && self.modifiers == Modifiers::CTRL
    }
}
