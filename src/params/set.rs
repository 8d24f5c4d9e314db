use std::{cell::RefCell, iter::FromIterator, rc::Rc};

use indexmap::IndexMap;

use super::{
    ChoiceParameter, ColorParameter, NumericParameter, ParamValue, Parameter, ParameterError,
};

type AnyListener = Box<dyn FnMut(&str, &ParamValue)>;

/// The ordered, named parameters of one generation session.  Declaration order is kept for
/// laying out the widgets; it has no effect on generation.
#[derive(Default)]
pub struct ParameterSet {
    params: IndexMap<String, Parameter>,
    /// Shared with a forwarding listener on every member parameter
    listeners: Rc<RefCell<Vec<AnyListener>>>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter to the end of the set.  Names must be unique.
    pub fn insert(&mut self, param: impl Into<Parameter>) -> Result<(), ParameterError> {
        let mut param = param.into();
        let name = param.name().to_owned();
        if self.params.contains_key(&name) {
            return Err(ParameterError::DuplicateName(name));
        }

        let listeners = self.listeners.clone();
        let forwarded_name = name.clone();
        param.on_value_changed(move |value| {
            for listener in listeners.borrow_mut().iter_mut() {
                listener(&forwarded_name, value);
            }
        });
        self.params.insert(name, param);
        Ok(())
    }

    /// Builder-style version of [`insert`](Self::insert)
    pub fn with(mut self, param: impl Into<Parameter>) -> Result<Self, ParameterError> {
        self.insert(param)?;
        Ok(self)
    }

    /// Registers a callback which runs whenever any member parameter's value changes.  It
    /// receives the parameter's name and new value.
    pub fn on_any_value_changed(&mut self, listener: impl FnMut(&str, &ParamValue) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Takes an independent snapshot of every parameter's current value
    pub fn to_request(&self) -> Request {
        self.params
            .iter()
            .map(|(name, param)| (name.clone(), param.value()))
            .collect()
    }

    /* Lookups */

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The parameters, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Parameter, ParameterError> {
        self.params
            .get_mut(name)
            .ok_or_else(|| ParameterError::UnknownParameter(name.to_owned()))
    }

    pub fn numeric_mut(&mut self, name: &str) -> Result<&mut NumericParameter, ParameterError> {
        match self.get_mut(name)? {
            Parameter::Numeric(p) => Ok(p),
            other => Err(mismatch(name, "numeric", other)),
        }
    }

    pub fn color_mut(&mut self, name: &str) -> Result<&mut ColorParameter, ParameterError> {
        match self.get_mut(name)? {
            Parameter::Color(p) => Ok(p),
            other => Err(mismatch(name, "color", other)),
        }
    }

    pub fn choice_mut(&mut self, name: &str) -> Result<&mut ChoiceParameter, ParameterError> {
        match self.get_mut(name)? {
            Parameter::Choice(p) => Ok(p),
            other => Err(mismatch(name, "choice", other)),
        }
    }

    /* Bulk edits */

    /// Sets a parameter from its textual form (see [`Parameter::set_from_str`])
    pub fn set_from_str(&mut self, name: &str, text: &str) -> Result<(), ParameterError> {
        self.get_mut(name)?.set_from_str(text)
    }

    pub fn reset_all(&mut self) {
        for param in self.params.values_mut() {
            param.reset_to_default();
        }
    }
}

impl std::fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterSet")
            .field("params", &self.params)
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

fn mismatch(name: &str, expected: &'static str, actual: &Parameter) -> ParameterError {
    ParameterError::KindMismatch {
        name: name.to_owned(),
        expected,
        actual: actual.kind_name(),
    }
}

/// An immutable snapshot of a [`ParameterSet`]'s values, in declaration order.  Later edits to
/// the parameters never affect a `Request` which has already been taken.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    values: IndexMap<String, ParamValue>,
}

impl Request {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a copy of this request with `name` set to `value`
    pub fn with(&self, name: impl Into<String>, value: ParamValue) -> Self {
        let mut values = self.values.clone();
        values.insert(name.into(), value);
        Self { values }
    }
}

impl FromIterator<(String, ParamValue)> for Request {
    fn from_iter<T: IntoIterator<Item = (String, ParamValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rgb::RGB8;

    use super::*;

    fn sample() -> ParameterSet {
        ParameterSet::new()
            .with(NumericParameter::integer("width", 1080, Some((1, 4096)), Some(128)).unwrap())
            .unwrap()
            .with(NumericParameter::fractional("scale", 0.8, Some((0.1, 10.0)), Some(0.1)).unwrap())
            .unwrap()
            .with(ColorParameter::new("fill", "#ff0000").unwrap())
            .unwrap()
            .with(ChoiceParameter::new("connector_style", &["none", "arc"], "arc").unwrap())
            .unwrap()
    }

    #[test]
    fn request_is_a_snapshot() {
        let mut set = sample();
        let request = set.to_request();
        set.numeric_mut("width").unwrap().set_value(64.0, false).unwrap();
        set.color_mut("fill").unwrap().set_value("blue", false).unwrap();

        assert_eq!(request.get("width"), Some(&ParamValue::Int(1080)));
        assert_eq!(
            request.get("fill"),
            Some(&ParamValue::Color(RGB8::new(255, 0, 0)))
        );
        assert_eq!(set.to_request().get("width"), Some(&ParamValue::Int(64)));
    }

    #[test]
    fn request_keeps_declaration_order() {
        let names = sample()
            .to_request()
            .iter()
            .map(|(name, _)| name.to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["width", "scale", "fill", "connector_style"]);
    }

    #[test]
    fn any_change_is_reported_once() {
        let mut set = sample();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = seen.clone();
        set.on_any_value_changed(move |name, value| {
            seen2.borrow_mut().push((name.to_owned(), value.clone()))
        });

        set.numeric_mut("scale").unwrap().drag_slider(250);
        set.choice_mut("connector_style").unwrap().select(0);
        let _ = set.color_mut("fill").unwrap().set_value("nope", false);

        assert_eq!(
            *seen.borrow(),
            vec![
                ("scale".to_owned(), ParamValue::Float(2.5)),
                ("connector_style".to_owned(), ParamValue::Choice("none".to_owned())),
            ]
        );
    }

    #[test]
    fn names_are_unique() {
        let mut set = sample();
        assert_eq!(
            set.insert(ColorParameter::new("width", "red").unwrap()),
            Err(ParameterError::DuplicateName("width".to_owned()))
        );
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn typed_lookups_check_kind() {
        let mut set = sample();
        assert!(matches!(
            set.color_mut("width"),
            Err(ParameterError::KindMismatch { .. })
        ));
        assert!(matches!(
            set.numeric_mut("height"),
            Err(ParameterError::UnknownParameter(_))
        ));
    }

    #[test]
    fn text_values_and_reset() {
        let mut set = sample();
        set.set_from_str("width", "2000").unwrap();
        set.set_from_str("fill", "lime").unwrap();
        set.set_from_str("connector_style", "none").unwrap();
        assert!(set.set_from_str("scale", "lots").is_err());

        let request = set.to_request();
        assert_eq!(request.get("width").and_then(ParamValue::as_i64), Some(2000));
        assert_eq!(
            request.get("fill").and_then(ParamValue::as_color),
            Some(RGB8::new(0, 255, 0))
        );

        set.reset_all();
        assert_eq!(set.to_request(), sample().to_request());
    }
}
