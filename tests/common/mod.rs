#![allow(dead_code)]

use lookback::domain::asset::Asset;
use lookback::domain::fx_rate::FxRate;
use lookback::domain::market::Market;
use lookback::domain::observable::{Observer, Subject};
use lookback::domain::portfolio::Portfolio;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Records the description of every subject it is notified about.
#[derive(Default)]
pub struct Recorder {
    pub seen: RefCell<Vec<String>>,
}

impl Recorder {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl Observer for Recorder {
    fn observable_update(&self, subject: Subject<'_>) {
        self.seen.borrow_mut().push(subject.describe());
    }
}

/// An AUD-based portfolio with AUD and USD cash, AUDUSD at 0.65 and two stocks.
pub struct Fixture {
    pub market: Rc<Market>,
    pub portfolio: Rc<Portfolio>,
    pub aud: Rc<Asset>,
    pub usd: Rc<Asset>,
    pub zzb: Rc<Asset>,
    pub aapl: Rc<Asset>,
    pub audusd: Rc<FxRate>,
}

pub fn fixture() -> Fixture {
    let market = Market::new();
    let portfolio = Portfolio::new(&market, "AUD").unwrap();
    Fixture {
        aud: market.new_cash("AUD").unwrap(),
        usd: market.new_cash("USD").unwrap(),
        zzb: market.new_stock("ZZB AU", 2.50, "AUD").unwrap(),
        aapl: market.new_stock("AAPL US", 300.0, "USD").unwrap(),
        audusd: market.new_fx_rate("AUDUSD", 0.65).unwrap(),
        market,
        portfolio,
    }
}

pub fn holdings_sum(portfolio: &Portfolio) -> f64 {
    portfolio
        .holdings()
        .iter()
        .map(|h| h.base_currency_value())
        .sum()
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
