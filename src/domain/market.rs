//! The live market: registries of assets and fx rates.
//!
//! A `Market` replaces process-wide uniqueness state. Asset codes are unique
//! among live assets; a currency pair may be registered in one direction
//! only. Instances are tracked weakly: whoever creates an asset or rate owns
//! it, and its key is released when the last `Rc` is dropped.

use std::rc::Rc;

use tracing::debug;

use super::asset::{Asset, AssetKind};
use super::currency::{CurrencyPair, normalize_code};
use super::error::LookbackError;
use super::field::{ASSET_CODE, CURRENCY_PAIR, PRICE};
use super::fx_rate::{self, Conversion, FxRate};
use super::registry::Registry;

pub struct Market {
    assets: Registry<Asset>,
    rates: Registry<FxRate>,
}

impl Market {
    pub fn new() -> Rc<Market> {
        Rc::new(Market {
            assets: Registry::new("asset"),
            rates: Registry::new("fx rate"),
        })
    }

    /// Create and register a stock priced in `currency_code`.
    pub fn new_stock(
        &self,
        code: &str,
        price: f64,
        currency_code: &str,
    ) -> Result<Rc<Asset>, LookbackError> {
        let code = ASSET_CODE.text(code.trim())?;
        let currency_code = normalize_code(currency_code)?;
        PRICE.check(price)?;
        self.register_asset(Asset::new(AssetKind::Stock, code, price, currency_code)?)
    }

    /// Create and register cash in `currency_code`. The asset code is the
    /// normalized currency code.
    pub fn new_cash(&self, currency_code: &str) -> Result<Rc<Asset>, LookbackError> {
        let code = normalize_code(currency_code)?;
        self.register_asset(Asset::new(AssetKind::Cash, code.clone(), 1.0, code)?)
    }

    fn register_asset(&self, asset: Asset) -> Result<Rc<Asset>, LookbackError> {
        let asset = Rc::new(asset);
        self.assets.register(asset.code(), &asset)?;
        debug!(code = asset.code(), currency = asset.currency_code(), "asset created");
        Ok(asset)
    }

    /// Create and register a rate for `pair`. Equivalent pairs are never
    /// registered, and a pair collides with its own reverse.
    pub fn new_fx_rate(&self, pair: &str, rate: f64) -> Result<Rc<FxRate>, LookbackError> {
        let pair = CurrencyPair::parse(pair)?;
        if pair.is_equivalent() {
            return Err(LookbackError::InvalidValue {
                field: CURRENCY_PAIR.name(),
                reason: format!("{pair} is an equivalent pair and always resolves to 1.0"),
            });
        }
        let reverse = pair.reverse();
        if self.rates.contains(reverse.as_str()) {
            return Err(LookbackError::DuplicateKey {
                kind: self.rates.kind(),
                key: reverse.to_string(),
            });
        }
        let fx = Rc::new(FxRate::new(pair.clone(), rate)?);
        self.rates.register(pair.as_str(), &fx)?;
        debug!(pair = %pair, rate, "fx rate created");
        Ok(fx)
    }

    pub fn asset(&self, code: &str) -> Result<Rc<Asset>, LookbackError> {
        self.assets.lookup(code.trim())
    }

    /// Sorted codes of live assets.
    pub fn registered_codes(&self) -> Vec<String> {
        self.assets.all_keys()
    }

    /// Sorted pairs of live rates, in the direction they were registered.
    pub fn registered_pairs(&self) -> Vec<String> {
        self.rates.all_keys()
    }

    /// The live instance carrying the rate for `pair`, registered either as
    /// `pair` or as its reverse.
    pub fn fx_rate(&self, pair: &str) -> Result<Rc<FxRate>, LookbackError> {
        let pair = CurrencyPair::parse(pair)?;
        let source = self
            .conversion(&pair)
            .ok()
            .and_then(|conversion| conversion.source().cloned());
        source.ok_or_else(|| LookbackError::NotFound {
            kind: self.rates.kind(),
            key: pair.to_string(),
        })
    }

    pub(crate) fn conversion(&self, pair: &CurrencyPair) -> Result<Conversion, LookbackError> {
        Conversion::lookup(&self.rates, pair)
    }

    /// Rate converting one unit of the pair's first currency into its second:
    /// 1.0 for an equivalent pair, the registered rate, or the reciprocal of
    /// the reverse pair's rate.
    pub fn resolve(&self, pair: &str) -> Result<f64, LookbackError> {
        fx_rate::resolve(&self.rates, &CurrencyPair::parse(pair)?)
    }
}
