//! Priced assets.
//!
//! Every asset has a unique code, an immutable quoted currency and a mutable
//! price. A price change recomputes the local value for the asset's kind and
//! then notifies observers (normally holdings).

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use super::error::LookbackError;
use super::field::{PRICE, Validated};
use super::observable::{Observable, Observer, Subject};

/// Anything with a value in a single currency.
pub trait Valuable {
    fn currency_code(&self) -> &str;
    fn value(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Exchange-traded instrument; local value equals price.
    Stock,
    /// Cash in its own currency; price and local value are fixed at 1.0.
    Cash,
}

impl AssetKind {
    fn local_value(&self, price: f64) -> f64 {
        match self {
            AssetKind::Stock => price,
            AssetKind::Cash => 1.0,
        }
    }
}

#[derive(Debug)]
pub struct Asset {
    code: String,
    currency_code: String,
    kind: AssetKind,
    price: Validated<f64>,
    local_value: Cell<f64>,
    observers: Observable,
}

impl Asset {
    /// Build an unregistered asset. Callers go through
    /// [`Market`](super::market::Market), which registers the code.
    pub(crate) fn new(
        kind: AssetKind,
        code: String,
        price: f64,
        currency_code: String,
    ) -> Result<Self, LookbackError> {
        if kind == AssetKind::Cash {
            check_cash_price(price)?;
        }
        let asset = Asset {
            code,
            currency_code,
            kind,
            price: Validated::new(&PRICE, price)?,
            local_value: Cell::new(0.0),
            observers: Observable::new(),
        };
        asset.revalue();
        Ok(asset)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn is_cash(&self) -> bool {
        self.kind == AssetKind::Cash
    }

    pub fn price(&self) -> f64 {
        self.price.get()
    }

    /// Worth of one unit in the quoted currency.
    pub fn local_value(&self) -> f64 {
        self.local_value.get()
    }

    /// Validate and store a new price, revalue, then notify observers.
    pub fn set_price(&self, price: f64) -> Result<(), LookbackError> {
        PRICE.check(price)?;
        if self.is_cash() {
            check_cash_price(price)?;
        }
        self.price.set(price)?;
        self.revalue();
        debug!(code = %self.code, price, local_value = self.local_value(), "asset repriced");
        self.observers.notify_observers(Subject::Asset(self));
        Ok(())
    }

    fn revalue(&self) {
        self.local_value.set(self.kind.local_value(self.price.get()));
    }

    pub fn add_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        self.observers.add_observer(observer);
    }

    pub fn remove_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        self.observers.remove_observer(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.observer_count()
    }
}

impl Valuable for Asset {
    fn currency_code(&self) -> &str {
        &self.currency_code
    }

    fn value(&self) -> f64 {
        self.local_value()
    }
}

fn check_cash_price(price: f64) -> Result<(), LookbackError> {
    if price != 1.0 {
        return Err(LookbackError::ImmutableFieldViolation {
            field: PRICE.name(),
            reason: format!("price should always be 1 for cash, got {price}"),
        });
    }
    Ok(())
}
