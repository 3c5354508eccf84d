//! Observable cells
//!
//! A value paired with an explicit, ordered list of observers. Setting an
//! equal value is a no-op; a different value notifies every observer in the
//! order they subscribed.

use indexmap::IndexMap;

/// Identifier returned by [`Observable::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Observer callback
pub type Observer<T> = Box<dyn FnMut(&T)>;

/// A value with change notification
pub struct Observable<T> {
    value: T,
    observers: IndexMap<SubscriptionId, Observer<T>>,
    next_id: u64,
}

impl<T: PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            observers: IndexMap::new(),
            next_id: 0,
        }
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store a new value, notifying observers if it differs.
    ///
    /// Returns whether the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        for observer in self.observers.values_mut() {
            observer(&self.value);
        }
        true
    }

    /// Register an observer. It is not called with the current value.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.insert(id, Box::new(observer));
        id
    }

    /// Remove an observer, preserving the order of the rest
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.shift_remove(&id).is_some()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl<T: Copy + PartialEq> Observable<T> {
    pub fn value(&self) -> T {
        self.value
    }
}

impl<T: PartialEq + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}
