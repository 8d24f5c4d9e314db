use image::RgbaImage;
use rgb::RGB8;
use tracing::debug;

use super::{
    binding::{EventFilter, ValueBinding},
    widget::{LineEdit, PointerEvent, SignalBlocker, Swatch},
    ParameterError,
};
use crate::color;

/// A color, shown as text in a [`LineEdit`] and as a solid [`Swatch`] which opens a picker.  The
/// value is always canonical `#rrggbb` text.
#[derive(Debug)]
pub struct ColorParameter {
    name: String,
    binding: ValueBinding<String>,
    line_edit: LineEdit,
    swatch: Swatch,
}

impl ColorParameter {
    /// Creates a new color parameter, which accepts any notation understood by
    /// [`color::parse`]
    pub fn new(name: impl Into<String>, value: &str) -> Result<Self, ParameterError> {
        let rgb = color::parse(value).ok_or_else(|| ParameterError::InvalidColor(value.to_owned()))?;
        let hex = color::to_hex(rgb);
        let mut line_edit = LineEdit::default();
        line_edit.set_text(&hex);
        Ok(Self {
            name: name.into(),
            binding: ValueBinding::new(hex),
            line_edit,
            swatch: Swatch::new(rgb),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value, as `#rrggbb`
    pub fn value(&self) -> &str {
        self.binding.value()
    }

    pub fn color(&self) -> RGB8 {
        self.swatch.color()
    }

    pub fn default_value(&self) -> &str {
        self.binding.default_value()
    }

    pub fn line_edit(&self) -> &LineEdit {
        &self.line_edit
    }

    /// The swatch drawn as a square icon, as shown next to the text field
    pub fn swatch_icon(&self, size: u32) -> RgbaImage {
        self.swatch.icon(size)
    }

    /// Parses and sets the color.  Text which isn't a color is rejected, leaving the value
    /// unchanged and notifying nobody.
    pub fn set_value(&mut self, value: &str, use_as_default: bool) -> Result<(), ParameterError> {
        let rgb = color::parse(value).ok_or_else(|| {
            debug!(parameter = %self.name, value, "rejected color");
            ParameterError::InvalidColor(value.to_owned())
        })?;
        self.commit(rgb, use_as_default);
        Ok(())
    }

    pub fn set_default_value(&mut self, value: &str) -> Result<(), ParameterError> {
        let hex =
            color::normalize(value).ok_or_else(|| ParameterError::InvalidColor(value.to_owned()))?;
        self.binding.set_default_value(hex);
        Ok(())
    }

    pub fn reset_to_default(&mut self) {
        // The default was normalized when it was stored
        if let Some(rgb) = color::parse(self.binding.default_value()) {
            self.commit(rgb, false);
        }
    }

    pub fn on_value_changed(&mut self, listener: impl FnMut(&String) + 'static) {
        self.binding.on_value_changed(listener);
    }

    /* User interaction */

    /// The user finished editing the text field, leaving `text` in it
    pub fn edit_text(&mut self, text: &str) {
        if let Some(text) = self.line_edit.set_text(text) {
            self.on_text_edited(&text);
        }
    }

    /// Opens a color picker, seeded with the current color
    pub fn open_picker(&self) -> ColorPicker {
        ColorPicker::new(self.color())
    }

    /// The open picker's selection moved to `color`.  Picker changes apply immediately but never
    /// touch the default.
    pub fn picker_changed(&mut self, picker: &mut ColorPicker, color: RGB8) {
        picker.current = color;
        self.commit(color, false);
    }

    /// The picker was dismissed without accepting, so its starting color is restored
    pub fn picker_cancelled(&mut self, picker: ColorPicker) {
        if picker.current != picker.initial {
            self.commit(picker.initial, false);
        }
    }

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

    fn on_text_edited(&mut self, text: &str) {
        if self.binding.is_suppressed() {
            return;
        }
        match color::parse(text) {
            Some(rgb) => self.commit(rgb, false),
            None => {
                debug!(parameter = %self.name, text, "reverting invalid color text");
                let current = self.binding.value().clone();
                SignalBlocker::new(&mut self.line_edit).set_text(&current);
            }
        }
    }

    fn on_swatch_changed(&mut self, rgb: RGB8) {
        if self.binding.is_suppressed() {
            return;
        }
        self.commit(rgb, false);
    }

    fn commit(&mut self, rgb: RGB8, use_as_default: bool) {
        let hex = color::to_hex(rgb);
        if !self.binding.begin_update(hex.clone(), use_as_default) {
            return;
        }
        let text_echo = SignalBlocker::new(&mut self.line_edit).set_text(&hex);
        let swatch_echo = SignalBlocker::new(&mut self.swatch).set_color(rgb);
        if let Some(text) = text_echo {
            self.on_text_edited(&text);
        }
        if let Some(rgb) = swatch_echo {
            self.on_swatch_changed(rgb);
        }
        self.binding.finish_update();
    }
}

/// An open color picker dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPicker {
    initial: RGB8,
    current: RGB8,
}

impl ColorPicker {
    fn new(initial: RGB8) -> Self {
        Self {
            initial,
            current: initial,
        }
    }

    /// The color the picker was opened with
    pub fn initial(&self) -> RGB8 {
        self.initial
    }

    pub fn current(&self) -> RGB8 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use image::Rgba;

    use super::*;

    fn record(param: &mut ColorParameter) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = seen.clone();
        param.on_value_changed(move |v| seen2.borrow_mut().push(v.clone()));
        seen
    }

    #[test]
    fn values_are_normalized() {
        let mut p = ColorParameter::new("fill", "White").unwrap();
        assert_eq!(p.value(), "#ffffff");
        p.set_value("#0F0", false).unwrap();
        assert_eq!(p.value(), "#00ff00");
        assert_eq!(p.line_edit().text(), "#00ff00");
        assert_eq!(p.color(), RGB8::new(0, 255, 0));
        assert_eq!(p.swatch_icon(2).get_pixel(1, 1), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn invalid_colors_change_nothing() {
        let mut p = ColorParameter::new("fill", "#123456").unwrap();
        let seen = record(&mut p);
        assert_eq!(
            p.set_value("not-a-color", false),
            Err(ParameterError::InvalidColor("not-a-color".to_owned()))
        );
        assert_eq!(p.value(), "#123456");
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn invalid_text_edits_revert_the_field() {
        let mut p = ColorParameter::new("fill", "#123456").unwrap();
        let seen = record(&mut p);
        p.edit_text("bogus");
        assert_eq!(p.line_edit().text(), "#123456");
        assert_eq!(p.value(), "#123456");
        assert!(seen.borrow().is_empty());

        p.edit_text("navy");
        assert_eq!(p.value(), "#000080");
        assert_eq!(p.line_edit().text(), "#000080");
        assert_eq!(*seen.borrow(), vec!["#000080".to_owned()]);
    }

    #[test]
    fn picker_changes_are_live_but_not_default() {
        let mut p = ColorParameter::new("stroke", "black").unwrap();
        let seen = record(&mut p);
        let mut picker = p.open_picker();
        assert_eq!(picker.initial(), RGB8::new(0, 0, 0));

        p.picker_changed(&mut picker, RGB8::new(255, 0, 0));
        p.picker_changed(&mut picker, RGB8::new(0, 0, 255));
        assert_eq!(p.value(), "#0000ff");
        assert_eq!(p.default_value(), "#000000");
        assert_eq!(seen.borrow().len(), 2);

        p.picker_cancelled(picker);
        assert_eq!(p.value(), "#000000");
    }

    #[test]
    fn reset_restores_default() {
        let mut p = ColorParameter::new("bg", "#ffffff").unwrap();
        p.set_value("#eeeeee", true).unwrap();
        p.set_value("#111111", false).unwrap();
        p.edit_text("red");
        p.reset_to_default();
        assert_eq!(p.value(), "#eeeeee");
    }
}
