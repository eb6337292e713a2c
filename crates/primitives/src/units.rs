//! Conversions between decimal amounts entered by the operator and integer token units

use crate::constants::paymaster::CREDIT_DECIMALS;
use ethers::{
    types::U256,
    utils::format_units,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of decimal digits of `U256::MAX`
const MAX_U256_DIGITS: usize = 78;

/// Error returned when an amount can not be converted to its smallest unit
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Nothing was entered
    #[error("amount is empty")]
    Empty,
    /// The amount is not a plain decimal number
    #[error("amount {amount:?} is not a decimal number")]
    NotANumber { amount: String },
    /// The amount is below zero
    #[error("amount {amount:?} is negative")]
    Negative { amount: String },
    /// The amount has more fractional digits than the token supports
    #[error("amount {amount:?} has more than {decimals} decimal places")]
    TooPrecise { amount: String, decimals: u32 },
    /// The amount does not fit into 256 bits
    #[error("amount {amount:?} is out of range")]
    OutOfRange { amount: String },
}

/// Converts a decimal amount (e.g. `"1.5"`) to the token's smallest unit (`amount * 10^decimals`)
pub fn to_smallest_unit(amount: &str, decimals: u32) -> Result<U256, AmountError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }
    if amount.starts_with('-') {
        return Err(AmountError::Negative { amount: amount.into() });
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::NotANumber { amount: amount.into() });
    }
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooPrecise { amount: amount.into(), decimals });
    }

    let out_of_range = || AmountError::OutOfRange { amount: amount.into() };
    // digits * 10^exp
    let scaled = |digits: &str, exp: usize| -> Result<U256, AmountError> {
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(U256::zero());
        }
        if digits.len() + exp > MAX_U256_DIGITS {
            return Err(out_of_range());
        }
        U256::from_dec_str(digits)
            .ok()
            .and_then(|value| value.checked_mul(U256::exp10(exp)))
            .ok_or_else(out_of_range)
    };

    let decimals = decimals as usize;
    scaled(whole, decimals)?
        .checked_add(scaled(fraction, decimals - fraction.len())?)
        .ok_or_else(out_of_range)
}

/// Renders an integer amount as a decimal string, keeping at least one fractional digit
pub fn to_decimal_string(value: U256, decimals: u32) -> String {
    let formatted = format_units(value, decimals).unwrap_or_else(|_| value.to_string());
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => format!("{formatted}.0"),
    }
}

/// Prepaid gas credit of an account (as reported by the paymaster)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasCredit {
    /// Raw balance
    pub balance: U256,
}

impl GasCredit {
    pub fn new(balance: U256) -> Self {
        Self { balance }
    }

    /// Balance scaled by the credit's fixed decimals
    pub fn amount(&self) -> String {
        to_decimal_string(self.balance, CREDIT_DECIMALS)
    }
}

impl fmt::Display for GasCredit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_amounts() {
        assert_eq!(
            to_smallest_unit("1.5", 18).unwrap(),
            U256::from_dec_str("1500000000000000000").unwrap()
        );
        assert_eq!(to_smallest_unit("10", 6).unwrap(), U256::from(10_000_000u64));
        assert_eq!(to_smallest_unit(".25", 2).unwrap(), U256::from(25u64));
        assert_eq!(to_smallest_unit("7.", 1).unwrap(), U256::from(70u64));
        assert_eq!(to_smallest_unit(" 0 ", 18).unwrap(), U256::zero());
    }

    #[test]
    fn malformed_amounts() {
        assert_eq!(to_smallest_unit("", 18), Err(AmountError::Empty));
        assert_eq!(to_smallest_unit("   ", 18), Err(AmountError::Empty));
        for amount in ["abc", "1e18", "0x10", "1.2.3", ".", "+1", "1,5", "NaN"] {
            assert!(
                matches!(to_smallest_unit(amount, 18), Err(AmountError::NotANumber { .. })),
                "{amount} should be rejected"
            );
        }
        assert!(matches!(to_smallest_unit("-1", 18), Err(AmountError::Negative { .. })));
        assert!(matches!(to_smallest_unit("-0.5", 18), Err(AmountError::Negative { .. })));
        assert!(matches!(
            to_smallest_unit("0.0000001", 6),
            Err(AmountError::TooPrecise { decimals: 6, .. })
        ));
    }

    #[test]
    fn trailing_zeros_are_not_precision() {
        assert_eq!(to_smallest_unit("1.50", 1).unwrap(), U256::from(15u64));
        assert_eq!(to_smallest_unit("1.0", 0).unwrap(), U256::one());
        assert_eq!(to_smallest_unit("0.000", 0).unwrap(), U256::zero());
        assert!(matches!(
            to_smallest_unit("1.05", 1),
            Err(AmountError::TooPrecise { decimals: 1, .. })
        ));
    }

    #[test]
    fn amounts_beyond_256_bits() {
        let huge = format!("1{}", "0".repeat(70));
        assert_eq!(
            to_smallest_unit(&huge, 18),
            Err(AmountError::OutOfRange { amount: huge.clone() })
        );

        let max = U256::MAX.to_string();
        assert_eq!(to_smallest_unit(&max, 0).unwrap(), U256::MAX);
        let above_max = max[..max.len() - 1].to_string() + "6";
        assert!(matches!(to_smallest_unit(&above_max, 0), Err(AmountError::OutOfRange { .. })));

        // U256::MAX with 18 decimals split off
        let (whole, fraction) = max.split_at(max.len() - 18);
        assert_eq!(to_smallest_unit(&format!("{whole}.{fraction}"), 18).unwrap(), U256::MAX);
        let above_max = format!("{whole}.{}6", &fraction[..17]);
        assert!(matches!(to_smallest_unit(&above_max, 18), Err(AmountError::OutOfRange { .. })));
        let whole_above_max = format!("{}.0", &max[..max.len() - 17]);
        assert!(matches!(
            to_smallest_unit(&whole_above_max, 18),
            Err(AmountError::OutOfRange { .. })
        ));
    }

    #[test]
    fn decimals_beyond_256_bits() {
        assert!(matches!(to_smallest_unit("1", 78), Err(AmountError::OutOfRange { .. })));
        assert_eq!(to_smallest_unit("0", 78).unwrap(), U256::zero());
        assert_eq!(to_smallest_unit("1", 77).unwrap(), U256::exp10(77));
    }

    #[test]
    fn credit_is_scaled_by_six_decimals() {
        let balance = U256::from_str_radix("0F4240", 16).unwrap();
        assert_eq!(GasCredit::new(balance).to_string(), "1.0");
        assert_eq!(GasCredit::new(U256::from(2_500_000u64)).to_string(), "2.5");
        assert_eq!(GasCredit::new(U256::zero()).to_string(), "0.0");
    }
}
