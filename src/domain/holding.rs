//! Units of one asset, valued in a base currency.
//!
//! A holding observes its asset and, unless the asset is quoted in the base
//! currency, the fx rate instance carrying the conversion. Any upstream
//! change, or a change of unit count, recomputes both values and notifies
//! the holding's own observers (normally the owning portfolio).

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use super::asset::Asset;
use super::currency::{CurrencyPair, normalize_code_as};
use super::error::LookbackError;
use super::field::{BASE_CURRENCY_CODE, UNITS, Validated};
use super::fx_rate::Conversion;
use super::market::Market;
use super::observable::{Observable, Observer, Subject};

#[derive(Debug)]
pub struct Holding {
    asset: Rc<Asset>,
    asset_code: String,
    asset_currency_code: String,
    base_currency_code: String,
    pair: CurrencyPair,
    conversion: Conversion,
    units: Validated<i64>,
    local_currency_value: Cell<f64>,
    base_currency_value: Cell<f64>,
    observers: Observable,
}

impl Holding {
    /// Fails with `RateUnavailable` when the asset's currency cannot be
    /// converted into `base_currency_code` with the rates in `market`.
    pub fn new(
        market: &Market,
        asset: &Rc<Asset>,
        units: i64,
        base_currency_code: &str,
    ) -> Result<Rc<Holding>, LookbackError> {
        let base_currency_code = normalize_code_as(&BASE_CURRENCY_CODE, base_currency_code)?;
        let pair = CurrencyPair::from_codes(asset.currency_code(), &base_currency_code)?;
        let conversion = market.conversion(&pair)?;

        let holding = Rc::new(Holding {
            asset: Rc::clone(asset),
            asset_code: asset.code().to_string(),
            asset_currency_code: asset.currency_code().to_string(),
            base_currency_code,
            pair,
            conversion,
            units: Validated::new(&UNITS, units)?,
            local_currency_value: Cell::new(0.0),
            base_currency_value: Cell::new(0.0),
            observers: Observable::new(),
        });

        asset.add_observer(&holding);
        if let Some(fx) = holding.conversion.source() {
            fx.add_observer(&holding);
        }
        holding.revalue();
        Ok(holding)
    }

    pub fn asset(&self) -> &Rc<Asset> {
        &self.asset
    }

    pub fn asset_code(&self) -> &str {
        &self.asset_code
    }

    pub fn asset_currency_code(&self) -> &str {
        &self.asset_currency_code
    }

    pub fn base_currency_code(&self) -> &str {
        &self.base_currency_code
    }

    /// Pair converting the asset's currency into the base currency.
    pub fn currency_pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn units(&self) -> i64 {
        self.units.get()
    }

    /// Change the unit count and run the same revaluation an upstream
    /// change would.
    pub fn set_units(&self, units: i64) -> Result<(), LookbackError> {
        self.units.set(units)?;
        self.revalue();
        Ok(())
    }

    pub fn local_currency_value(&self) -> f64 {
        self.local_currency_value.get()
    }

    pub fn base_currency_value(&self) -> f64 {
        self.base_currency_value.get()
    }

    /// Rate currently applied to convert local into base currency value.
    pub fn fx_rate(&self) -> f64 {
        self.conversion.rate()
    }

    fn revalue(&self) {
        let local = self.asset.local_value() * self.units.get() as f64;
        let base = local * self.conversion.rate();
        self.local_currency_value.set(local);
        self.base_currency_value.set(base);
        debug!(
            code = %self.asset_code,
            units = self.units.get(),
            local,
            base,
            pair = %self.pair,
            "holding revalued"
        );
        self.observers.notify_observers(Subject::Holding(self));
    }

    pub fn add_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        self.observers.add_observer(observer);
    }

    pub(crate) fn add_weak_observer(&self, observer: std::rc::Weak<dyn Observer>) {
        self.observers.add_weak_observer(observer);
    }

    pub fn remove_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        self.observers.remove_observer(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.observer_count()
    }
}

impl Observer for Holding {
    fn observable_update(&self, subject: Subject<'_>) {
        debug!(holding = %self.asset_code, from = %subject.describe(), "upstream change");
        self.revalue();
    }
}
