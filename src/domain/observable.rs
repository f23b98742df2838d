//! Weakly-referenced publish channel used by the revaluation cascade.
//!
//! Subjects own an [`Observable`] and call [`Observable::notify_observers`]
//! after every state change. Observers are held by `Weak` reference: dropping
//! the last `Rc` to an observer removes it from every subject without an
//! explicit unregistration. Notification is synchronous and depth-first.
//!
//! An observer must not mutate the subject that is notifying it from inside
//! `observable_update`; doing so re-enters the cascade and its outcome is
//! unspecified.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::asset::Asset;
use super::fx_rate::FxRate;
use super::holding::Holding;
use super::portfolio::Portfolio;

/// The entity whose state changed.
#[derive(Clone, Copy)]
pub enum Subject<'a> {
    Asset(&'a Asset),
    FxRate(&'a FxRate),
    Holding(&'a Holding),
    Portfolio(&'a Portfolio),
}

impl Subject<'_> {
    /// Short human-readable identity, used in trace output.
    pub fn describe(&self) -> String {
        match self {
            Subject::Asset(a) => format!("asset {}", a.code()),
            Subject::FxRate(r) => format!("fx rate {}", r.currency_pair()),
            Subject::Holding(h) => format!("holding {}", h.asset_code()),
            Subject::Portfolio(p) => format!("portfolio {}", p.base_currency_code()),
        }
    }
}

/// Receives change notifications from subjects it was registered with.
pub trait Observer {
    fn observable_update(&self, subject: Subject<'_>);
}

#[derive(Default)]
pub struct Observable {
    observers: RefCell<Vec<Weak<dyn Observer>>>,
}

fn same_observer(weak: &Weak<dyn Observer>, target: *const ()) -> bool {
    weak.as_ptr().cast::<()>() == target
}

impl Observable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` for future notifications. Registering the same
    /// observer twice has no additional effect.
    pub fn add_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        let weak: Weak<O> = Rc::downgrade(observer);
        let weak: Weak<dyn Observer> = weak;
        self.add_weak_observer(weak);
    }

    pub(crate) fn add_weak_observer(&self, observer: Weak<dyn Observer>) {
        let target = observer.as_ptr().cast::<()>();
        let mut observers = self.observers.borrow_mut();
        observers.retain(|w| w.strong_count() > 0);
        if !observers.iter().any(|w| same_observer(w, target)) {
            observers.push(observer);
        }
    }

    /// Unregister `observer`. Absent observers are ignored.
    pub fn remove_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        let target = Rc::as_ptr(observer).cast::<()>();
        self.observers
            .borrow_mut()
            .retain(|w| w.strong_count() > 0 && !same_observer(w, target));
    }

    /// Number of observers that are still alive.
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Call `observable_update` on every live observer. Order is unspecified.
    pub fn notify_observers(&self, subject: Subject<'_>) {
        // Snapshot first so observers may (un)register during the callback.
        let live: Vec<Rc<dyn Observer>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|w| w.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in live {
            observer.observable_update(subject);
        }
    }
}

impl std::fmt::Debug for Observable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}
