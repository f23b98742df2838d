//! Valuation report port trait.

use crate::domain::error::LookbackError;
use crate::domain::portfolio::Portfolio;

/// Port for producing portfolio valuation reports.
pub trait ReportPort {
    fn render(&self, portfolio: &Portfolio) -> String;

    /// Default implementation: writes the rendered report to `output_path`.
    fn write(&self, portfolio: &Portfolio, output_path: &str) -> Result<(), LookbackError> {
        std::fs::write(output_path, self.render(portfolio))?;
        Ok(())
    }
}
