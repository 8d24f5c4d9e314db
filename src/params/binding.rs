use std::fmt;

use super::widget::PointerEvent;

/// A callback run after a binding's value changes
pub type Listener<T> = Box<dyn FnMut(&T)>;

/// The stored half of a two-way binding between one logical value and the widgets which display
/// it.
///
/// Parameter types own their widgets and bracket every change with [`begin_update`] and
/// [`finish_update`].  In between, the binding is suppressed: the parameter writes the new value
/// into its widgets (with each widget's own signals blocked), and any edit that still arrives is
/// an echo of those writes and is dropped.  Listeners then hear about the change exactly once.
///
/// [`begin_update`]: ValueBinding::begin_update
/// [`finish_update`]: ValueBinding::finish_update
pub struct ValueBinding<T> {
    value: T,
    default: T,
    /// Set while widgets are being brought up to date.  Edits arriving while this is set are
    /// echoes of our own writes, and are dropped.
    suppressed: bool,
    listeners: Vec<Listener<T>>,
}

impl<T: Clone> ValueBinding<T> {
    /// Creates a binding whose value and default are both `initial`
    pub fn new(initial: T) -> Self {
        Self {
            default: initial.clone(),
            value: initial,
            suppressed: false,
            listeners: Vec::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn set_default_value(&mut self, value: T) {
        self.default = value;
    }

    /// `true` while an update is propagating to the widgets
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Registers a callback which is run once per completed update
    pub fn on_value_changed(&mut self, listener: impl FnMut(&T) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Stores an already-validated `value` and starts bringing the widgets up to date.  Until
    /// the matching [`finish_update`](Self::finish_update), the binding is suppressed.
    ///
    /// Returns `false` (and changes nothing) if another update is still propagating; such a call
    /// can only be an echo of that update's writes into the widgets.
    pub fn begin_update(&mut self, value: T, use_as_default: bool) -> bool {
        if self.suppressed {
            return false;
        }
        if use_as_default {
            self.default = value.clone();
        }
        self.value = value;
        self.suppressed = true;
        true
    }

    /// Ends the update started by [`begin_update`](Self::begin_update) and notifies every
    /// listener exactly once
    pub fn finish_update(&mut self) {
        debug_assert!(self.suppressed, "`finish_update` without `begin_update`");
        self.suppressed = false;
        for listener in &mut self.listeners {
            listener(&self.value);
        }
    }

    /// Decides whether a pointer event is the reset gesture.  This must be checked before the
    /// widget that received the event gets to handle it.
    pub fn filter_event(&self, event: &PointerEvent) -> EventFilter {
        if event.is_reset_gesture() {
            EventFilter::Reset
        } else if event.is_reset_button() {
            // The press half of the gesture is swallowed so the widget never sees half of it
            EventFilter::Consumed
        } else {
            EventFilter::PassThrough
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBinding")
            .field("value", &self.value)
            .field("default", &self.default)
            .field("suppressed", &self.suppressed)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// What should happen to a pointer event delivered to a bound widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    /// The event is the reset gesture; reset the value to its default
    Reset,
    /// The event belongs to the reset gesture but needs no action
    Consumed,
    /// The widget should handle the event as normal
    PassThrough,
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::params::widget::{Modifiers, MouseButton, PointerEventKind};

    #[test]
    fn one_notification_per_update() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut binding = ValueBinding::new(1);
        let seen2 = seen.clone();
        binding.on_value_changed(move |v| seen2.borrow_mut().push(*v));

        assert!(binding.begin_update(5, false));
        assert!(binding.is_suppressed());
        assert!(seen.borrow().is_empty());
        binding.finish_update();

        assert_eq!(*seen.borrow(), vec![5]);
        assert_eq!(*binding.value(), 5);
        assert_eq!(*binding.default_value(), 1);
    }

    #[test]
    fn update_can_set_default() {
        let mut binding = ValueBinding::new("a".to_owned());
        assert!(binding.begin_update("b".to_owned(), true));
        binding.finish_update();
        assert_eq!(binding.default_value(), "b");
        binding.set_default_value("c".to_owned());
        assert_eq!(binding.value(), "b");
    }

    #[test]
    fn echoes_are_dropped_while_suppressed() {
        let mut binding = ValueBinding::new(0);
        assert!(binding.begin_update(3, false));
        assert!(!binding.begin_update(4, true));
        binding.finish_update();
        assert_eq!(*binding.value(), 3);
        assert_eq!(*binding.default_value(), 0);
        assert!(!binding.is_suppressed());
    }

    #[test]
    fn reset_gesture_is_filtered() {
        let binding = ValueBinding::new(0);
        let release = PointerEvent::new(
            PointerEventKind::Release,
            MouseButton::Middle,
            Modifiers::CTRL,
        );
        let press = PointerEvent::new(PointerEventKind::Press, MouseButton::Middle, Modifiers::CTRL);
        let click = PointerEvent::new(
            PointerEventKind::Release,
            MouseButton::Left,
            Modifiers::NONE,
        );
        assert_eq!(binding.filter_event(&release), EventFilter::Reset);
        assert_eq!(binding.filter_event(&press), EventFilter::Consumed);
        assert_eq!(binding.filter_event(&click), EventFilter::PassThrough);
    }
}
