//! Reactive property wrapper assigned by generated binders.
//!
//! The binding core only requires that assignment be observable: the change
//! hook fires exactly once per assignment, in binder-declaration order.
//! Redraw scheduling hangs off the hook and is the host's concern.

use std::fmt;

type ChangeHook<T> = Box<dyn Fn(&T, &T) + Send + Sync>;

/// A settable field whose assignments notify an optional change hook with
/// the old and new value.
pub struct Dynamic<T> {
    value: T,
    on_change: Option<ChangeHook<T>>,
}

impl<T> Dynamic<T> {
    pub fn new(initial: T) -> Self {
        Dynamic { value: initial, on_change: None }
    }

    pub fn with_hook(initial: T, hook: impl Fn(&T, &T) + Send + Sync + 'static) -> Self {
        Dynamic { value: initial, on_change: Some(Box::new(hook)) }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Assigns a new value. The hook fires once per call, including when the
    /// new value equals the old one; no equality gate is applied.
    pub fn set(&mut self, value: T) {
        let old = std::mem::replace(&mut self.value, value);
        if let Some(hook) = &self.on_change {
            hook(&old, &self.value);
        }
    }
}

impl<T: Default> Default for Dynamic<T> {
    fn default() -> Self {
        Dynamic::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dynamic").field("value", &self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn hook_fires_once_per_assignment_with_old_and_new() {
        let fired = Arc::new(AtomicUsize::new(0));
        let observed = Arc::new(parking_lot::Mutex::new((0, 0)));
        let fired2 = Arc::clone(&fired);
        let observed2 = Arc::clone(&observed);

        let mut prop = Dynamic::with_hook(66, move |old, new| {
            fired2.fetch_add(1, Ordering::SeqCst);
            *observed2.lock() = (*old, *new);
        });
        prop.set(10);

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(*observed.lock(), (66, 10));
        assert_eq!(*prop.get(), 10);
    }

    #[test]
    fn hook_fires_even_when_value_is_unchanged() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = Arc::clone(&fired);
        let mut prop = Dynamic::with_hook(5, move |_, _| {
            fired2.fetch_add(1, Ordering::SeqCst);
        });
        prop.set(5);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
