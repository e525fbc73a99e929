//! ReactiveCell - Observable value with synchronous subscribers
//!
//! A cell holds one value. Every write replaces the value and notifies every
//! active subscriber, in write order, before `set` returns.
//!
//! # API
//!
//! - `get()` - Read the current value
//! - `set(value)` - Replace the value and notify
//! - `update(f)` - Write `f(current)` and notify
//! - `subscribe(f)` - Call `f` now and on every later write
//! - `map(f)` - Derived view for use inside a signal graph
//!
//! # Example
//!
//! ```ignore
//! use gridworld_store::reactive::ReactiveCell;
//!
//! let width = ReactiveCell::new("world_width", 5);
//!
//! let unsubscribe = width.subscribe(|w| println!("width: {}", w));
//! width.set(10);
//! unsubscribe();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use spark_signals::{derived, signal, Derived, Signal};

// =============================================================================
// TYPES
// =============================================================================

/// Deregistration handle returned by `subscribe`.
///
/// Call it to stop the callback. Dropping it without calling leaves the
/// subscription registered.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// Derived view over a cell, produced by [`ReactiveCell::map`].
pub type CellMap<U> = Derived<U>;

struct Listener<T> {
    id: usize,
    active: Cell<bool>,
    callback: Box<dyn Fn(&T)>,
}

struct CellInner<T> {
    name: &'static str,
    value: Signal<T>,
    listeners: RefCell<Vec<Rc<Listener<T>>>>,
    next_id: Cell<usize>,
    // Writes made while a notification pass is running, each paired with
    // the listeners registered at the moment of the write
    pending: RefCell<VecDeque<(T, Vec<Rc<Listener<T>>>)>>,
    notifying: Cell<bool>,
}

/// Ends a notification pass, even if a subscriber panics. Queued writes
/// from an aborted pass are discarded.
struct NotifyGuard<'a, T>(&'a CellInner<T>);

impl<T> Drop for NotifyGuard<'_, T> {
    fn drop(&mut self) {
        self.0.pending.borrow_mut().clear();
        self.0.notifying.set(false);
    }
}

/// A shared, observable value.
///
/// Cloning a `ReactiveCell` clones the handle, not the value: all clones read
/// and write the same cell.
pub struct ReactiveCell<T> {
    inner: Rc<CellInner<T>>,
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

// =============================================================================
// READ / WRITE
// =============================================================================

impl<T> ReactiveCell<T>
where
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    /// Create a cell. `name` labels the cell in log output.
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            inner: Rc::new(CellInner {
                name,
                value: signal(initial),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                pending: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    /// Label given at construction.
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Current value. Tracked when read inside a derived or effect.
    pub fn get(&self) -> T {
        self.inner.value.get()
    }

    /// Replace the value and notify every active subscriber.
    ///
    /// Subscribers are notified even when `value` equals the current value.
    pub fn set(&self, value: T) {
        tracing::trace!(cell = self.inner.name, ?value, "cell write");
        self.inner.value.set(value.clone());
        self.notify(value);
    }

    /// Write `f(current)`.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.get());
        self.set(next);
    }

    fn notify(&self, value: T) {
        let listeners: Vec<Rc<Listener<T>>> = self.inner.listeners.borrow().clone();
        self.inner.pending.borrow_mut().push_back((value, listeners));

        // A write from inside a subscriber lands in the queue and is
        // delivered by the pass already running.
        if self.inner.notifying.replace(true) {
            return;
        }
        let _guard = NotifyGuard(&*self.inner);

        loop {
            let Some((value, listeners)) = self.inner.pending.borrow_mut().pop_front() else {
                break;
            };
            for listener in listeners {
                if listener.active.get() {
                    (listener.callback)(&value);
                }
            }
        }
    }
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

impl<T> ReactiveCell<T>
where
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    /// Register `callback`. It runs immediately with the current value and
    /// again on every later write.
    ///
    /// Returns the handle that deregisters it.
    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&T) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let listener = Rc::new(Listener {
            id,
            active: Cell::new(true),
            callback: Box::new(callback),
        });
        self.inner.listeners.borrow_mut().push(Rc::clone(&listener));
        tracing::trace!(cell = self.inner.name, id, "subscribed");

        (listener.callback)(&self.get());

        let weak: Weak<CellInner<T>> = Rc::downgrade(&self.inner);
        Box::new(move || {
            listener.active.set(false);
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|l| l.id != listener.id);
                tracing::trace!(cell = inner.name, id = listener.id, "unsubscribed");
            }
        })
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Derived view of this cell. Recomputes when the cell is written.
    pub fn map<U, F>(&self, f: F) -> CellMap<U>
    where
        U: Clone + PartialEq + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let value = self.inner.value.clone();
        let compute: Box<dyn Fn() -> U> = Box::new(move || f(&value.get()));
        derived(compute)
    }
}

impl<T> fmt::Debug for ReactiveCell<T>
where
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("name", &self.inner.name)
            .field("value", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
