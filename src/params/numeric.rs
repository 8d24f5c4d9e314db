use std::fmt::{self, Display, Formatter};

use tracing::debug;

use super::{
    binding::{EventFilter, ValueBinding},
    widget::{PointerEvent, SignalBlocker, Slider, SpinBox},
    ParameterError,
};

/// Whether a [`NumericParameter`] holds whole numbers or fractional ones.  Chosen once, at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Integer,
    /// Numbers with two decimal places.  The slider works in hundredths.
    Fractional,
}

impl NumericKind {
    /// How many slider units make up one unit of the logical value
    pub fn scale(self) -> i64 {
        match self {
            NumericKind::Integer => 1,
            NumericKind::Fractional => 100,
        }
    }

    fn decimals(self) -> u32 {
        match self {
            NumericKind::Integer => 0,
            NumericKind::Fractional => 2,
        }
    }

    fn default_range(self) -> (f64, f64) {
        match self {
            NumericKind::Integer => (0.0, 4096.0),
            NumericKind::Fractional => (0.0, 100.0),
        }
    }

    /// Converts slider units to a logical value
    fn number(self, raw: i64) -> Number {
        match self {
            NumericKind::Integer => Number::Int(raw),
            NumericKind::Fractional => Number::Frac(raw as f64 / self.scale() as f64),
        }
    }

    fn to_raw(self, value: f64) -> f64 {
        (value * self.scale() as f64).round()
    }
}

/// The value of a [`NumericParameter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Frac(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Frac(f) => f,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Frac(v) => write!(f, "{:.2}", v),
        }
    }
}

/// A bounded number, shown in a [`SpinBox`] and a [`Slider`] which are kept in lockstep.
///
/// The value is stored in slider units (see [`NumericKind::scale`]), so editing through the field
/// and dragging the slider to the same place always store exactly the same value.
#[derive(Debug)]
pub struct NumericParameter {
    name: String,
    kind: NumericKind,
    binding: ValueBinding<i64>,
    spin_box: SpinBox,
    slider: Slider,
}

impl NumericParameter {
    /// Creates a new parameter.  `range` defaults to `[0, 4096]` for integers and `[0, 100]` for
    /// fractions, `step` defaults to `1`.
    pub fn new(
        name: impl Into<String>,
        kind: NumericKind,
        value: f64,
        range: Option<(f64, f64)>,
        step: Option<f64>,
    ) -> Result<Self, ParameterError> {
        let mut param = Self {
            name: name.into(),
            kind,
            binding: ValueBinding::new(0),
            spin_box: SpinBox::new(kind.decimals()),
            slider: Slider::new(),
        };
        let (min, max) = range.unwrap_or_else(|| kind.default_range());
        param.set_range(min, max)?;
        param.set_single_step(step.unwrap_or(1.0))?;
        param.set_value(value, true)?;
        Ok(param)
    }

    pub fn integer(
        name: impl Into<String>,
        value: i64,
        range: Option<(i64, i64)>,
        step: Option<i64>,
    ) -> Result<Self, ParameterError> {
        Self::new(
            name,
            NumericKind::Integer,
            value as f64,
            range.map(|(min, max)| (min as f64, max as f64)),
            step.map(|s| s as f64),
        )
    }

    pub fn fractional(
        name: impl Into<String>,
        value: f64,
        range: Option<(f64, f64)>,
        step: Option<f64>,
    ) -> Result<Self, ParameterError> {
        Self::new(name, NumericKind::Fractional, value, range, step)
    }

    /* Getters */

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NumericKind {
        self.kind
    }

    pub fn value(&self) -> Number {
        self.kind.number(*self.binding.value())
    }

    pub fn default_value(&self) -> Number {
        self.kind.number(*self.binding.default_value())
    }

    pub fn range(&self) -> (f64, f64) {
        self.spin_box.range()
    }

    pub fn step(&self) -> f64 {
        self.spin_box.step()
    }

    pub fn spin_box(&self) -> &SpinBox {
        &self.spin_box
    }

    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    /* Setters */

    /// Sets the value, optionally making it the new default.  Values outside the range (or
    /// non-whole values for integer parameters) are rejected without changing anything.
    pub fn set_value(&mut self, value: f64, use_as_default: bool) -> Result<(), ParameterError> {
        let raw = self.validate(value).map_err(|e| {
            debug!(parameter = %self.name, value, error = %e, "rejected value");
            e
        })?;
        self.commit(raw, use_as_default);
        Ok(())
    }

    pub fn set_default_value(&mut self, value: f64) -> Result<(), ParameterError> {
        let raw = self.validate(value)?;
        self.binding.set_default_value(raw);
        Ok(())
    }

    pub fn reset_to_default(&mut self) {
        let default = *self.binding.default_value();
        self.commit(default, false);
    }

    /// Changes the range of both widgets.  The value (and the default) are clamped into the new
    /// range; listeners are only notified if the value actually moved.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<(), ParameterError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ParameterError::InvalidRange { min, max });
        }
        let raw_min = self.kind.to_raw(min) as i64;
        let raw_max = self.kind.to_raw(max) as i64;
        {
            // Widgets clamp their own values; none of that is a user edit
            SignalBlocker::new(&mut self.spin_box).set_range(min, max);
            SignalBlocker::new(&mut self.slider).set_range(raw_min, raw_max);
        }

        let default = *self.binding.default_value();
        self.binding.set_default_value(default.clamp(raw_min, raw_max));
        let current = *self.binding.value();
        let clamped = current.clamp(raw_min, raw_max);
        if clamped != current {
            self.commit(clamped, false);
        }
        Ok(())
    }

    /// Sets how far one step of the field's arrows (or the slider's keys) moves the value
    pub fn set_single_step(&mut self, step: f64) -> Result<(), ParameterError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(ParameterError::InvalidStep(step));
        }
        self.spin_box.set_step(step);
        self.slider.set_single_step(self.kind.to_raw(step) as i64);
        Ok(())
    }

    pub fn on_value_changed(&mut self, mut listener: impl FnMut(Number) + 'static) {
        let kind = self.kind;
        self.binding.on_value_changed(move |raw| listener(kind.number(*raw)));
    }

    /* User interaction */

    /// The user typed `value` into the edit field
    pub fn edit_field(&mut self, value: f64) {
        if let Some(v) = self.spin_box.set_value(value) {
            self.on_spin_box_changed(v);
        }
    }

    /// The user pressed the edit field's up (positive `steps`) or down arrows
    pub fn step_field(&mut self, steps: i32) {
        if let Some(v) = self.spin_box.step_by(steps) {
            self.on_spin_box_changed(v);
        }
    }

    /// The user dragged the slider to `raw` (in slider units)
    pub fn drag_slider(&mut self, raw: i64) {
        if let Some(raw) = self.slider.set_value(raw) {
            self.on_slider_changed(raw);
        }
    }

    /// Handles a pointer event on either widget, returning `true` if it was consumed by the
    /// reset gesture
    pub fn pointer_event(&mut self, event: &PointerEvent) -> bool {
        match self.binding.filter_event(event) {
            EventFilter::Reset => {
                self.reset_to_default();
                true
            }
            EventFilter::Consumed => true,
            EventFilter::PassThrough => false,
        }
    }

    /* Helpers */

    fn on_spin_box_changed(&mut self, value: f64) {
        if self.binding.is_suppressed() {
            return;
        }
        match self.validate(value) {
            Ok(raw) => self.commit(raw, false),
            Err(e) => debug!(parameter = %self.name, value, error = %e, "ignored field edit"),
        }
    }

    fn on_slider_changed(&mut self, raw: i64) {
        if self.binding.is_suppressed() {
            return;
        }
        self.commit(raw, false);
    }

    /// Checks that `value` is in this parameter's domain, returning it in slider units
    fn validate(&self, value: f64) -> Result<i64, ParameterError> {
        if !value.is_finite() {
            return Err(ParameterError::NotFinite(value));
        }
        if self.kind == NumericKind::Integer && value.fract() != 0.0 {
            return Err(ParameterError::NotAnInteger(value));
        }
        // Checked before rounding to slider units, which could pull the value back into range
        let (min, max) = self.range();
        let raw = self.kind.to_raw(value);
        let (raw_min, raw_max) = self.slider.range();
        if value < min || value > max || raw < raw_min as f64 || raw > raw_max as f64 {
            return Err(ParameterError::OutOfRange { value, min, max });
        }
        Ok(raw as i64)
    }

    /// Stores `raw` and writes it into both widgets, notifying listeners once
    fn commit(&mut self, raw: i64, use_as_default: bool) {
        if !self.binding.begin_update(raw, use_as_default) {
            return;
        }
        let logical = self.kind.number(raw).as_f64();
        let field_echo = SignalBlocker::new(&mut self.spin_box).set_value(logical);
        let slider_echo = SignalBlocker::new(&mut self.slider).set_value(raw);
        // Blocked widgets don't echo, but anything that does is dropped by the handlers
        if let Some(v) = field_echo {
            self.on_spin_box_changed(v);
        }
        if let Some(raw) = slider_echo {
            self.on_slider_changed(raw);
        }
        self.binding.finish_update();
    }
}
