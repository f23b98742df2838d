//! Exchange rates and currency-pair resolution.
//!
//! Only one direction of a pair is ever registered. The other direction is
//! derived as the reciprocal of the live rate at the moment it is read, so a
//! later mutation of the registered rate is always reflected in both
//! directions.

use std::rc::Rc;

use tracing::debug;

use super::currency::CurrencyPair;
use super::error::LookbackError;
use super::field::{RATE, Validated};
use super::observable::{Observable, Observer, Subject};
use super::registry::Registry;

#[derive(Debug)]
pub struct FxRate {
    pair: CurrencyPair,
    rate: Validated<f64>,
    observers: Observable,
}

impl FxRate {
    pub(crate) fn new(pair: CurrencyPair, rate: f64) -> Result<Self, LookbackError> {
        Ok(FxRate {
            pair,
            rate: Validated::new(&RATE, rate)?,
            observers: Observable::new(),
        })
    }

    pub fn currency_pair(&self) -> &str {
        self.pair.as_str()
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn rate(&self) -> f64 {
        self.rate.get()
    }

    /// Validate and store a new rate, then notify observers.
    pub fn set_rate(&self, rate: f64) -> Result<(), LookbackError> {
        self.rate.set(rate)?;
        debug!(pair = %self.pair, rate, "fx rate changed");
        self.observers.notify_observers(Subject::FxRate(self));
        Ok(())
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

/// How one currency converts into another, bound to the live rate instance
/// that carries the number.
#[derive(Debug, Clone)]
pub enum Conversion {
    /// Equivalent pair, always 1.0.
    Identity,
    /// The pair itself is registered.
    Direct(Rc<FxRate>),
    /// The reverse pair is registered; the rate is its reciprocal.
    Inverse(Rc<FxRate>),
}

impl Conversion {
    /// Find the live instance for `pair` in `rates`, trying the pair itself
    /// before its reverse.
    pub fn lookup(rates: &Registry<FxRate>, pair: &CurrencyPair) -> Result<Self, LookbackError> {
        if pair.is_equivalent() {
            return Ok(Conversion::Identity);
        }
        if let Some(direct) = rates.get(pair.as_str()) {
            return Ok(Conversion::Direct(direct));
        }
        if let Some(inverse) = rates.get(pair.reverse().as_str()) {
            return Ok(Conversion::Inverse(inverse));
        }
        Err(LookbackError::RateUnavailable {
            pair: pair.to_string(),
        })
    }

    pub fn rate(&self) -> f64 {
        match self {
            Conversion::Identity => 1.0,
            Conversion::Direct(fx) => fx.rate(),
            Conversion::Inverse(fx) => 1.0 / fx.rate(),
        }
    }

    /// The instance to observe for changes, if any.
    pub fn source(&self) -> Option<&Rc<FxRate>> {
        match self {
            Conversion::Identity => None,
            Conversion::Direct(fx) | Conversion::Inverse(fx) => Some(fx),
        }
    }
}

/// Rate converting one unit of `pair.base()` into `pair.quote()`.
pub fn resolve(rates: &Registry<FxRate>, pair: &CurrencyPair) -> Result<f64, LookbackError> {
    Ok(Conversion::lookup(rates, pair)?.rate())
}
