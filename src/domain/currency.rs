//! Currency code and currency pair normalization.

use std::fmt;

use super::error::LookbackError;
use super::field::{CURRENCY_CODE, CURRENCY_PAIR, FieldSpec};

/// Trim, uppercase and validate a 3-letter currency code against `spec`.
pub fn normalize_code_as(spec: &FieldSpec, raw: &str) -> Result<String, LookbackError> {
    spec.text(&raw.trim().to_uppercase())
}

/// Trim, uppercase and validate a 3-letter currency code.
pub fn normalize_code(raw: &str) -> Result<String, LookbackError> {
    normalize_code_as(&CURRENCY_CODE, raw)
}

/// An ordered currency pair such as `AUDUSD`: the rate converts one unit of
/// the base currency (`AUD`) into the quote currency (`USD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyPair {
    code: String,
}

impl CurrencyPair {
    pub fn parse(raw: &str) -> Result<Self, LookbackError> {
        let code = CURRENCY_PAIR.text(&raw.trim().to_uppercase())?;
        if !code.is_ascii() {
            return Err(LookbackError::InvalidValue {
                field: CURRENCY_PAIR.name(),
                reason: format!("{code:?} is not two ascii currency codes"),
            });
        }
        Ok(CurrencyPair { code })
    }

    /// Pair converting `from` into `to`.
    pub fn from_codes(from: &str, to: &str) -> Result<Self, LookbackError> {
        let from = normalize_code(from)?;
        let to = normalize_code(to)?;
        Self::parse(&format!("{from}{to}"))
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn base(&self) -> &str {
        &self.code[..3]
    }

    pub fn quote(&self) -> &str {
        &self.code[3..]
    }

    pub fn reverse(&self) -> CurrencyPair {
        CurrencyPair {
            code: format!("{}{}", self.quote(), self.base()),
        }
    }

    /// Both halves name the same currency; the rate is always 1.0.
    pub fn is_equivalent(&self) -> bool {
        self.base() == self.quote()
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Convenience wrapper over [`CurrencyPair::is_equivalent`] for raw input.
pub fn is_equivalent(pair: &str) -> Result<bool, LookbackError> {
    Ok(CurrencyPair::parse(pair)?.is_equivalent())
}
