//! Actors perform a strategy on behalf of a portfolio.

use std::rc::Rc;

use tracing::debug;

use super::error::LookbackError;
use super::portfolio::Portfolio;

pub trait Strategy {
    fn run(&mut self) -> Result<(), LookbackError>;
}

pub struct Actor<S: Strategy> {
    portfolio: Rc<Portfolio>,
    strategy: S,
}

impl<S: Strategy> Actor<S> {
    pub fn new(portfolio: Rc<Portfolio>, strategy: S) -> Self {
        Actor {
            portfolio,
            strategy,
        }
    }

    pub fn portfolio(&self) -> &Rc<Portfolio> {
        &self.portfolio
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn perform(&mut self) -> Result<(), LookbackError> {
        debug!(base = self.portfolio.base_currency_code(), "actor performing strategy");
        self.strategy.run()
    }
}
