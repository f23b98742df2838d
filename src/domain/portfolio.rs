//! Portfolio of holdings valued in one base currency.
//!
//! The portfolio observes every holding it creates and keeps `value` equal
//! to the sum of the holdings' base-currency values after every change.
//! Holdings are created on the first transfer of an asset and are kept even
//! when their unit count returns to zero.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::debug;

use super::asset::{Asset, Valuable};
use super::currency::{CurrencyPair, normalize_code_as};
use super::error::LookbackError;
use super::field::{BASE_CURRENCY_CODE, CONSIDERATION};
use super::holding::Holding;
use super::market::Market;
use super::observable::{Observable, Observer, Subject};

/// Tolerance when turning a cash consideration into whole units.
const WHOLE_UNIT_TOLERANCE: f64 = 1e-9;

pub struct Portfolio {
    me: Weak<Portfolio>,
    market: Rc<Market>,
    base_currency_code: String,
    holdings: RefCell<BTreeMap<String, Rc<Holding>>>,
    value: Cell<f64>,
    observers: Observable,
}

impl Portfolio {
    pub fn new(market: &Rc<Market>, base_currency_code: &str) -> Result<Rc<Portfolio>, LookbackError> {
        let base_currency_code = normalize_code_as(&BASE_CURRENCY_CODE, base_currency_code)?;
        Ok(Rc::new_cyclic(|me| Portfolio {
            me: me.clone(),
            market: Rc::clone(market),
            base_currency_code,
            holdings: RefCell::new(BTreeMap::new()),
            value: Cell::new(0.0),
            observers: Observable::new(),
        }))
    }

    pub fn base_currency_code(&self) -> &str {
        &self.base_currency_code
    }

    pub fn market(&self) -> &Rc<Market> {
        &self.market
    }

    /// Sum of all holdings' base-currency values.
    pub fn value(&self) -> f64 {
        self.value.get()
    }

    pub fn holding(&self, code: &str) -> Option<Rc<Holding>> {
        self.holdings.borrow().get(code).cloned()
    }

    /// Holdings ordered by asset code.
    pub fn holdings(&self) -> Vec<Rc<Holding>> {
        self.holdings.borrow().values().cloned().collect()
    }

    pub fn holding_count(&self) -> usize {
        self.holdings.borrow().len()
    }

    /// Units held of `code`, zero if the asset was never transferred in.
    pub fn get_holding_units(&self, code: &str) -> i64 {
        self.holding(code).map(|h| h.units()).unwrap_or(0)
    }

    /// Add `units` of `asset` (negative to remove, may go short). The asset
    /// must be the instance registered under its code in this portfolio's
    /// market.
    pub fn transfer(&self, asset: &Rc<Asset>, units: i64) -> Result<(), LookbackError> {
        self.check_member(asset)?;
        match self.holding(asset.code()) {
            Some(holding) => {
                let total = added_units(holding.units(), units)?;
                debug!(code = asset.code(), units, total, "transfer into existing holding");
                // The holding notifies this portfolio, which revalues.
                holding.set_units(total)?;
            }
            None => {
                let holding = Holding::new(&self.market, asset, units, &self.base_currency_code)?;
                let me: Weak<dyn Observer> = self.me.clone();
                holding.add_weak_observer(me);
                self.holdings
                    .borrow_mut()
                    .insert(asset.code().to_string(), holding);
                debug!(code = asset.code(), units, "new holding");
                self.revalue();
            }
        }
        Ok(())
    }

    /// Transfer `units` of `asset` and the offsetting cash leg in the asset's
    /// currency. The cash leg is `-consideration`, or `-(local value * units)`
    /// when no consideration is given. Nothing changes if either leg would
    /// fail.
    pub fn trade(
        &self,
        asset: &Rc<Asset>,
        units: i64,
        consideration: Option<f64>,
    ) -> Result<(), LookbackError> {
        let consideration = match consideration {
            Some(c) => {
                CONSIDERATION.check(c)?;
                c
            }
            None => asset.local_value() * units as f64,
        };
        let cash_units = whole_units(-consideration)?;

        self.check_member(asset)?;
        // Both legs share the asset's currency, so one conversion check
        // covers whichever holdings still need to be created.
        let pair = CurrencyPair::from_codes(asset.currency_code(), &self.base_currency_code)?;
        self.market.conversion(&pair)?;
        let cash = self.cash_for(asset.currency_code())?;

        let asset_total = added_units(self.get_holding_units(asset.code()), units)?;
        let cash_held = if cash.code() == asset.code() {
            asset_total
        } else {
            self.get_holding_units(cash.code())
        };
        added_units(cash_held, cash_units)?;

        debug!(code = asset.code(), units, cash = cash.code(), cash_units, "trade");
        self.transfer(asset, units)?;
        self.transfer(&cash, cash_units)
    }

    fn check_member(&self, asset: &Rc<Asset>) -> Result<(), LookbackError> {
        match self.market.asset(asset.code()) {
            Ok(registered) if Rc::ptr_eq(&registered, asset) => Ok(()),
            _ => Err(LookbackError::InvalidValue {
                field: "asset",
                reason: format!(
                    "{} is not the instance registered in this portfolio's market",
                    asset.code()
                ),
            }),
        }
    }

    fn cash_for(&self, currency_code: &str) -> Result<Rc<Asset>, LookbackError> {
        match self.market.asset(currency_code) {
            Ok(asset) if asset.is_cash() => Ok(asset),
            Ok(asset) => Err(LookbackError::InvalidValue {
                field: "currency_code",
                reason: format!("{} is registered to a non-cash asset", asset.code()),
            }),
            Err(LookbackError::NotFound { .. }) => self.market.new_cash(currency_code),
            Err(e) => Err(e),
        }
    }

    fn revalue(&self) {
        let total: f64 = self
            .holdings
            .borrow()
            .values()
            .map(|h| h.base_currency_value())
            .sum();
        self.value.set(total);
        debug!(base = %self.base_currency_code, value = total, "portfolio revalued");
        self.observers.notify_observers(Subject::Portfolio(self));
    }

    pub fn add_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        self.observers.add_observer(observer);
    }

    pub fn remove_observer<O: Observer + 'static>(&self, observer: &Rc<O>) {
        self.observers.remove_observer(observer);
    }
}

impl Observer for Portfolio {
    fn observable_update(&self, subject: Subject<'_>) {
        debug!(from = %subject.describe(), "portfolio notified");
        self.revalue();
    }
}

impl Valuable for Portfolio {
    fn currency_code(&self) -> &str {
        &self.base_currency_code
    }

    fn value(&self) -> f64 {
        self.value.get()
    }
}

impl std::fmt::Debug for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portfolio")
            .field("base_currency_code", &self.base_currency_code)
            .field("value", &self.value.get())
            .field("holdings", &self.holdings.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

fn added_units(held: i64, units: i64) -> Result<i64, LookbackError> {
    held.checked_add(units)
        .ok_or_else(|| LookbackError::InvalidValue {
            field: "units",
            reason: format!("{held} + {units} overflows"),
        })
}

fn whole_units(amount: f64) -> Result<i64, LookbackError> {
    let rounded = amount.round();
    if (amount - rounded).abs() > WHOLE_UNIT_TOLERANCE
        || rounded < i64::MIN as f64
        || rounded >= i64::MAX as f64
    {
        return Err(LookbackError::InvalidValue {
            field: CONSIDERATION.name(),
            reason: format!("cash leg {amount} is not a whole number of units"),
        });
    }
    Ok(rounded as i64)
}
