//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pounds, not piastres).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero price in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Format for display, e.g. `"149.50 EGP"`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency_code.code())
    }
}

/// ISO 4217 currency codes for the storefront's markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Egyptian pound.
    #[default]
    EGP,
    /// Saudi riyal.
    SAR,
    /// UAE dirham.
    AED,
    /// US dollar.
    USD,
}

impl CurrencyCode {
    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EGP => "EGP",
            Self::SAR => "SAR",
            Self::AED => "AED",
            Self::USD => "USD",
        }
    }

    /// Parse a currency code from its ISO 4217 string.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EGP" => Some(Self::EGP),
            "SAR" => Some(Self::SAR),
            "AED" => Some(Self::AED),
            "USD" => Some(Self::USD),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let price = Price::new(Decimal::new(14950, 2), CurrencyCode::EGP);
        assert_eq!(price.display(), "149.50 EGP");
    }

    #[test]
    fn test_zero() {
        let price = Price::zero(CurrencyCode::SAR);
        assert_eq!(price.amount, Decimal::ZERO);
        assert_eq!(price.display(), "0.00 SAR");
    }

    #[test]
    fn test_code_roundtrip() {
        for code in [
            CurrencyCode::EGP,
            CurrencyCode::SAR,
            CurrencyCode::AED,
            CurrencyCode::USD,
        ] {
            assert_eq!(CurrencyCode::from_code(code.code()), Some(code));
        }
        assert_eq!(CurrencyCode::from_code("XYZ"), None);
    }
}
