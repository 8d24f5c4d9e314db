//! User-editable parameters.  Each parameter keeps one logical value in sync with the widgets
//! which display it (see [`ValueBinding`]), and a [`ParameterSet`] gathers the parameters of one
//! generation session into a flat [`Request`].

use std::fmt::{self, Display, Formatter};

use rgb::RGB8;
use thiserror::Error;

mod binding;
mod choice;
mod color;
mod numeric;
mod set;
pub mod widget;

pub use binding::{EventFilter, Listener, ValueBinding};
pub use choice::ChoiceParameter;
pub use color::{ColorParameter, ColorPicker};
pub use numeric::{Number, NumericKind, NumericParameter};
pub use set::{ParameterSet, Request};

/// A named, bounded value which is edited through a pair of widgets
#[derive(Debug)]
pub enum Parameter {
    Numeric(NumericParameter),
    Color(ColorParameter),
    Choice(ChoiceParameter),
}

impl Parameter {
    pub fn name(&self) -> &str {
        match self {
            Parameter::Numeric(p) => p.name(),
            Parameter::Color(p) => p.name(),
            Parameter::Choice(p) => p.name(),
        }
    }

    /// The current value, as it will appear in a [`Request`]
    pub fn value(&self) -> ParamValue {
        match self {
            Parameter::Numeric(p) => p.value().into(),
            Parameter::Color(p) => ParamValue::Color(p.color()),
            Parameter::Choice(p) => ParamValue::Choice(p.value().to_owned()),
        }
    }

    /// A short name for the kind of this parameter, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Parameter::Numeric(_) => "numeric",
            Parameter::Color(_) => "color",
            Parameter::Choice(_) => "choice",
        }
    }

    pub fn reset_to_default(&mut self) {
        match self {
            Parameter::Numeric(p) => p.reset_to_default(),
            Parameter::Color(p) => p.reset_to_default(),
            Parameter::Choice(p) => p.reset_to_default(),
        }
    }

    /// Sets the value from its textual form (a number, a color or an option name)
    pub fn set_from_str(&mut self, text: &str) -> Result<(), ParameterError> {
        match self {
            Parameter::Numeric(p) => {
                let value = text
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ParameterError::InvalidNumber(text.to_owned()))?;
                p.set_value(value, false)
            }
            Parameter::Color(p) => p.set_value(text, false),
            Parameter::Choice(p) => p.set_value(text.trim(), false),
        }
    }

    /// Routes a pointer event that one of this parameter's widgets received.  Returns `true` if
    /// the event was consumed (i.e. it was part of the reset gesture).
    pub fn pointer_event(&mut self, event: &widget::PointerEvent) -> bool {
        match self {
            Parameter::Numeric(p) => p.pointer_event(event),
            Parameter::Color(p) => p.pointer_event(event),
            Parameter::Choice(p) => p.pointer_event(event),
        }
    }

    /// Registers a callback which runs once per change of this parameter's value
    pub fn on_value_changed(&mut self, mut listener: impl FnMut(&ParamValue) + 'static) {
        match self {
            Parameter::Numeric(p) => p.on_value_changed(move |n| listener(&n.into())),
            Parameter::Color(p) => p.on_value_changed(move |hex| {
                if let Some(color) = crate::color::parse(hex) {
                    listener(&ParamValue::Color(color))
                }
            }),
            Parameter::Choice(p) => {
                p.on_value_changed(move |option| listener(&ParamValue::Choice(option.to_owned())))
            }
        }
    }
}

impl From<NumericParameter> for Parameter {
    fn from(p: NumericParameter) -> Self {
        Parameter::Numeric(p)
    }
}

impl From<ColorParameter> for Parameter {
    fn from(p: ColorParameter) -> Self {
        Parameter::Color(p)
    }
}

impl From<ChoiceParameter> for Parameter {
    fn from(p: ChoiceParameter) -> Self {
        Parameter::Choice(p)
    }
}

/// The value of one parameter inside a [`Request`]
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Color(RGB8),
    Choice(String),
}

impl ParamValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric values of either kind, as a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<RGB8> {
        match self {
            ParamValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            ParamValue::Choice(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Number> for ParamValue {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => ParamValue::Int(i),
            Number::Frac(f) => ParamValue::Float(f),
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Color(c) => write!(f, "{}", crate::color::to_hex(*c)),
            ParamValue::Choice(s) => write!(f, "{}", s),
        }
    }
}

/// The ways that a parameter can reject a value.  A rejected value never changes any state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{value} is outside the range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
    #[error("{0} is not a whole number")]
    NotAnInteger(f64),
    #[error("{0} is not a finite number")]
    NotFinite(f64),
    #[error("invalid range: minimum {min} is greater than maximum {max}")]
    InvalidRange { min: f64, max: f64 },
    #[error("step must be positive, got {0}")]
    InvalidStep(f64),
    #[error("{0:?} is not a number")]
    InvalidNumber(String),
    #[error("{0:?} is not a color")]
    InvalidColor(String),
    #[error("{option:?} is not one of {options:?}")]
    UnknownOption {
        option: String,
        options: Vec<String>,
    },
    #[error("no parameter named {0:?}")]
    UnknownParameter(String),
    #[error("a parameter named {0:?} already exists")]
    DuplicateName(String),
    #[error("parameter {name:?} is a {actual} parameter, not a {expected} one")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}
