use tracing::debug;

use super::{
    binding::{EventFilter, ValueBinding},
    widget::{ComboBox, PointerEvent, SignalBlocker},
    ParameterError,
};

/// One of a small, fixed list of named options, shown in a [`ComboBox`]
#[derive(Debug)]
pub struct ChoiceParameter {
    name: String,
    /// Index into the combo box's options
    binding: ValueBinding<usize>,
    combo_box: ComboBox,
}

impl ChoiceParameter {
    pub fn new(
        name: impl Into<String>,
        options: &[&str],
        value: &str,
    ) -> Result<Self, ParameterError> {
        let mut combo_box = ComboBox::new(options.iter().map(|s| s.to_string()).collect());
        let index = index_of(&combo_box, value)?;
        combo_box.set_current_index(index);
        Ok(Self {
            name: name.into(),
            binding: ValueBinding::new(index),
            combo_box,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.combo_box.options()[*self.binding.value()]
    }

    pub fn default_value(&self) -> &str {
        &self.combo_box.options()[*self.binding.default_value()]
    }

    pub fn options(&self) -> &[String] {
        self.combo_box.options()
    }

    pub fn combo_box(&self) -> &ComboBox {
        &self.combo_box
    }

    /// Selects an option by name
    pub fn set_value(&mut self, option: &str, use_as_default: bool) -> Result<(), ParameterError> {
        let index = index_of(&self.combo_box, option).map_err(|e| {
            debug!(parameter = %self.name, option, "rejected option");
            e
        })?;
        self.commit(index, use_as_default);
        Ok(())
    }

    pub fn reset_to_default(&mut self) {
        let default = *self.binding.default_value();
        self.commit(default, false);
    }

    pub fn on_value_changed(&mut self, mut listener: impl FnMut(&str) + 'static) {
        let options = self.combo_box.options().to_vec();
        self.binding.on_value_changed(move |&index| listener(&options[index]));
    }

    /// The user picked the option at `index` from the drop-down
    pub fn select(&mut self, index: usize) {
        if let Some(index) = self.combo_box.set_current_index(index) {
            self.on_combo_box_changed(index);
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

    fn on_combo_box_changed(&mut self, index: usize) {
        if self.binding.is_suppressed() {
            return;
        }
        self.commit(index, false);
    }

    fn commit(&mut self, index: usize, use_as_default: bool) {
        if !self.binding.begin_update(index, use_as_default) {
            return;
        }
        let echo = SignalBlocker::new(&mut self.combo_box).set_current_index(index);
        if let Some(index) = echo {
            self.on_combo_box_changed(index);
        }
        self.binding.finish_update();
    }
}

fn index_of(combo_box: &ComboBox, option: &str) -> Result<usize, ParameterError> {
    combo_box
        .options()
        .iter()
        .position(|o| o == option)
        .ok_or_else(|| ParameterError::UnknownOption {
            option: option.to_owned(),
            options: combo_box.options().to_vec(),
        })
}
