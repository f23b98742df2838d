//! Weak, key-unique registry of live instances.
//!
//! Entries are `Weak` references. An entry whose instance has been dropped
//! is treated as absent by every operation, so a key becomes reusable as
//! soon as the last `Rc` to its instance goes away. Dead entries are pruned
//! lazily.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use super::error::LookbackError;

pub struct Registry<T> {
    kind: &'static str,
    entries: RefCell<BTreeMap<String, Weak<T>>>,
}

impl<T> Registry<T> {
    /// `kind` names the registered entity in error messages ("asset", "fx rate").
    pub fn new(kind: &'static str) -> Self {
        Registry {
            kind,
            entries: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Store a weak association for `key`. Fails if a live instance already
    /// holds the key.
    pub fn register(&self, key: &str, instance: &Rc<T>) -> Result<(), LookbackError> {
        if self.contains(key) {
            return Err(LookbackError::DuplicateKey {
                kind: self.kind,
                key: key.to_string(),
            });
        }
        debug!(kind = self.kind, key, "registered");
        self.entries
            .borrow_mut()
            .insert(key.to_string(), Rc::downgrade(instance));
        Ok(())
    }

    /// Drop the association for `key`. Absent keys are ignored.
    pub fn unregister(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<Rc<T>> {
        let upgraded = self.entries.borrow().get(key).map(Weak::upgrade);
        match upgraded {
            Some(Some(instance)) => Some(instance),
            Some(None) => {
                self.entries.borrow_mut().remove(key);
                None
            }
            None => None,
        }
    }

    pub fn lookup(&self, key: &str) -> Result<Rc<T>, LookbackError> {
        self.get(key).ok_or_else(|| LookbackError::NotFound {
            kind: self.kind,
            key: key.to_string(),
        })
    }

    /// Sorted keys of live instances.
    pub fn all_keys(&self) -> Vec<String> {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|_, w| w.strong_count() > 0);
        entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.all_keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
