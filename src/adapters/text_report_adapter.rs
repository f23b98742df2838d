//! Plain-text valuation report adapter implementing ReportPort.

use crate::domain::asset::Valuable;
use crate::domain::holding::Holding;
use crate::domain::portfolio::Portfolio;
use crate::ports::report_port::ReportPort;

const RULE_WIDTH: usize = 73;

pub struct TextReportAdapter {
    precision: usize,
    show_zero: bool,
}

impl TextReportAdapter {
    /// `precision` is the number of decimals for monetary columns;
    /// `show_zero` keeps zero-unit holdings in the table.
    pub fn new(precision: usize, show_zero: bool) -> Self {
        Self {
            precision,
            show_zero,
        }
    }

    fn row(&self, holding: &Holding) -> String {
        let p = self.precision;
        format!(
            "{:<14} {:>10} {:<4} {:>14.p$} {:>10.4} {:>16.p$}\n",
            holding.asset_code(),
            holding.units(),
            holding.asset_currency_code(),
            holding.local_currency_value(),
            holding.fx_rate(),
            holding.base_currency_value(),
        )
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new(2, true)
    }
}

impl ReportPort for TextReportAdapter {
    fn render(&self, portfolio: &Portfolio) -> String {
        let base = portfolio.currency_code();
        let mut output = String::new();
        output.push_str(&format!(
            "{:<14} {:>10} {:<4} {:>14} {:>10} {:>16}\n",
            "CODE",
            "UNITS",
            "CCY",
            "LOCAL VALUE",
            "FX RATE",
            format!("VALUE ({base})"),
        ));
        output.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));

        for holding in portfolio.holdings() {
            if !self.show_zero && holding.units() == 0 {
                continue;
            }
            output.push_str(&self.row(&holding));
        }

        output.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));
        output.push_str(&format!(
            "{:<56} {:>16.p$}\n",
            format!("TOTAL ({base})"),
            portfolio.value(),
            p = self.precision,
        ));
        output
    }
}
