//! Scenario loading: build a market and portfolio from configuration.
//!
//! Sections are applied in a fixed order: `[fx]`, `[cash]`, `[stocks]`,
//! `[transfers]`, `[trades]`, then the `[prices]` and `[rates]` updates.
//! Keys within a section are applied in sorted order.
//!
//! ```ini
//! [portfolio]
//! base_currency = AUD
//!
//! [fx]
//! AUDUSD = 0.65
//!
//! [stocks]
//! AAPL US = 300 USD
//!
//! [cash]
//! currencies = AUD
//!
//! [transfers]
//! AUD = 1000
//!
//! [trades]
//! AAPL US = 1 @ 300
//! ```

use std::rc::Rc;

use tracing::{debug, info};

use super::asset::Asset;
use super::currency::CurrencyPair;
use super::error::LookbackError;
use super::field::{CONSIDERATION, PRICE, RATE, UNITS};
use super::fx_rate::FxRate;
use super::market::Market;
use super::portfolio::Portfolio;
use crate::ports::config_port::ConfigPort;

/// A loaded scenario. Owns the assets and rates it created; the market
/// only tracks them weakly.
pub struct Scenario {
    market: Rc<Market>,
    portfolio: Rc<Portfolio>,
    assets: Vec<Rc<Asset>>,
    rates: Vec<Rc<FxRate>>,
}

impl Scenario {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, LookbackError> {
        let base = required(config, "portfolio", "base_currency")?;
        let market = Market::new();
        let portfolio = Portfolio::new(&market, &base)?;
        let mut scenario = Scenario {
            market,
            portfolio,
            assets: Vec::new(),
            rates: Vec::new(),
        };

        scenario.load_rates(config)?;
        scenario.load_cash(config)?;
        scenario.load_stocks(config)?;
        scenario.apply_transfers(config)?;
        scenario.apply_trades(config)?;
        scenario.apply_updates(config)?;

        info!(
            base = scenario.portfolio.base_currency_code(),
            holdings = scenario.portfolio.holding_count(),
            value = scenario.portfolio.value(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    pub fn market(&self) -> &Rc<Market> {
        &self.market
    }

    pub fn portfolio(&self) -> &Rc<Portfolio> {
        &self.portfolio
    }

    pub fn assets(&self) -> &[Rc<Asset>] {
        &self.assets
    }

    pub fn rates(&self) -> &[Rc<FxRate>] {
        &self.rates
    }

    fn load_rates(&mut self, config: &dyn ConfigPort) -> Result<(), LookbackError> {
        for pair in config.keys("fx") {
            let raw = entry(config, "fx", &pair)?;
            let rate = RATE.parse_real(&raw)?;
            self.rates.push(self.market.new_fx_rate(&pair, rate)?);
        }
        Ok(())
    }

    fn load_cash(&mut self, config: &dyn ConfigPort) -> Result<(), LookbackError> {
        let Some(list) = config.get_string("cash", "currencies") else {
            return Ok(());
        };
        for token in list.split(',') {
            let code = token.trim();
            if code.is_empty() {
                return Err(invalid("cash", "currencies", "empty token in currency list"));
            }
            self.assets.push(self.market.new_cash(code)?);
        }
        Ok(())
    }

    fn load_stocks(&mut self, config: &dyn ConfigPort) -> Result<(), LookbackError> {
        for code in config.keys("stocks") {
            let raw = entry(config, "stocks", &code)?;
            let parts: Vec<&str> = raw.split_whitespace().collect();
            let [price, currency] = parts.as_slice() else {
                return Err(invalid(
                    "stocks",
                    &code,
                    "expected `<price> <currency code>`",
                ));
            };
            let price = PRICE.parse_real(price)?;
            self.assets.push(self.market.new_stock(&code, price, currency)?);
        }
        Ok(())
    }

    fn apply_transfers(&self, config: &dyn ConfigPort) -> Result<(), LookbackError> {
        for code in config.keys("transfers") {
            let raw = entry(config, "transfers", &code)?;
            let units = UNITS.parse_integer(&raw)?;
            let asset = self.market.asset(&code)?;
            self.portfolio.transfer(&asset, units)?;
        }
        Ok(())
    }

    fn apply_trades(&self, config: &dyn ConfigPort) -> Result<(), LookbackError> {
        for code in config.keys("trades") {
            let raw = entry(config, "trades", &code)?;
            let (units, consideration) = match raw.split_once('@') {
                Some((units, consideration)) => (
                    UNITS.parse_integer(units)?,
                    Some(CONSIDERATION.parse_real(consideration)?),
                ),
                None => (UNITS.parse_integer(&raw)?, None),
            };
            let asset = self.market.asset(&code)?;
            self.portfolio.trade(&asset, units, consideration)?;
        }
        Ok(())
    }

    /// Apply `[prices]` and `[rates]` to the live instances; every update
    /// cascades into the portfolio value.
    pub fn apply_updates(&self, config: &dyn ConfigPort) -> Result<(), LookbackError> {
        for code in config.keys("prices") {
            let raw = entry(config, "prices", &code)?;
            let price = PRICE.parse_real(&raw)?;
            debug!(code = %code, price, "applying price update");
            self.market.asset(&code)?.set_price(price)?;
        }
        for key in config.keys("rates") {
            let raw = entry(config, "rates", &key)?;
            let rate = RATE.parse_real(&raw)?;
            let pair = CurrencyPair::parse(&key)?;
            let fx = self.market.fx_rate(pair.as_str())?;
            // The rate is quoted for `key`; store it in the registered direction.
            let stored = if fx.pair() == &pair { rate } else { 1.0 / rate };
            debug!(pair = %pair, rate, stored, "applying rate update");
            fx.set_rate(stored)?;
        }
        Ok(())
    }
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, LookbackError> {
    match config.get_string(section, key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(LookbackError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn entry(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, LookbackError> {
    match config.get_string(section, key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(invalid(section, key, "missing value")),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> LookbackError {
    LookbackError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
