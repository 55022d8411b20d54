//! Observer registration and synchronous fan-out
//!
//! Fan-out snapshots the registration list before dispatching. An observer
//! registered while a fan-out is running is not called for that event; one
//! removed while it is running receives no further calls.

use super::observer::{AttributeObserver, StreamError, StreamResult};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared handle to an observer
pub type ObserverHandle = Rc<RefCell<dyn AttributeObserver>>;

/// Wrap an observer into a shareable handle, keeping its concrete type
pub fn shared<O: AttributeObserver>(observer: O) -> Rc<RefCell<O>> {
    Rc::new(RefCell::new(observer))
}

/// Identifier handed out when an observer is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Registration {
    id: ObserverId,
    observer: ObserverHandle,
    active: Cell<bool>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Rc<Registration>>,
}

/// An ordered list of observers.
///
/// Cloning yields another handle onto the same list, which lets an observer
/// keep a handle and unregister itself from inside a callback.
#[derive(Clone, Default)]
pub struct ObserverList {
    inner: Rc<RefCell<Registry>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer at the end of the list
    pub fn add(&self, observer: ObserverHandle) -> ObserverId {
        let mut registry = self.inner.borrow_mut();
        let id = ObserverId(registry.next_id);
        registry.next_id += 1;
        registry.registrations.push(Rc::new(Registration {
            id,
            observer,
            active: Cell::new(true),
        }));
        id
    }

    /// Unregister an observer. Returns false if it was not registered.
    pub fn remove(&self, id: ObserverId) -> bool {
        let mut registry = self.inner.borrow_mut();
        match registry.registrations.iter().position(|r| r.id == id) {
            Some(index) => {
                let registration = registry.registrations.remove(index);
                registration.active.set(false);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.inner.borrow().registrations.iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().registrations.is_empty()
    }

    /// Call `deliver` once per registered observer, in registration order.
    ///
    /// Stops at the first error and returns it. An observer that is already
    /// handling an event (a re-entrant call) yields [`StreamError::ObserverBusy`].
    pub fn dispatch<F>(&self, mut deliver: F) -> StreamResult<()>
    where
        F: FnMut(&mut dyn AttributeObserver) -> StreamResult<()>,
    {
        let snapshot: Vec<Rc<Registration>> = self.inner.borrow().registrations.clone();

        for registration in snapshot {
            if !registration.active.get() {
                continue;
            }
            let mut observer = registration
                .observer
                .try_borrow_mut()
                .map_err(|_| StreamError::ObserverBusy(registration.id))?;
            deliver(&mut *observer)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<ObserverId> = self
            .inner
            .borrow()
            .registrations
            .iter()
            .map(|r| r.id)
            .collect();
        f.debug_struct("ObserverList").field("observers", &ids).finish()
    }
}
