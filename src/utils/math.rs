//! Fixed-point price conversion.
//!
//! Attested prices are integers in micro-dollars (6 decimals). Conversion from
//! a floating-point USD quote truncates toward zero, it never rounds.

use crate::error::{Error, Result};
use crate::utils::constants::{PRICE_DECIMALS, PRICE_SCALE};

/// Smallest f64 that no longer fits in a u64 (2^64)
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Convert a USD quote to micro-units, truncating toward zero.
///
/// `1.234567` becomes `1_234_567` and `0.0000001` becomes `0`. Negative,
/// non-finite, or out-of-range quotes are rejected as price-source errors.
pub fn usd_to_micro_units(price_usd: f64) -> Result<u64> {
    if !price_usd.is_finite() || price_usd < 0.0 {
        return Err(Error::PriceSource(format!("invalid price value: {}", price_usd)));
    }

    let scaled = price_usd * PRICE_SCALE as f64;
    if scaled >= U64_LIMIT {
        return Err(Error::PriceSource(format!(
            "price {} exceeds fixed-point range",
            price_usd
        )));
    }

    Ok(scaled.trunc() as u64)
}

/// Format micro-units as a decimal USD string (`150250000` -> `"150.250000"`)
pub fn format_micro_units(micro_units: u64) -> String {
    format!(
        "{}.{:0width$}",
        micro_units / PRICE_SCALE,
        micro_units % PRICE_SCALE,
        width = PRICE_DECIMALS as usize
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncates_not_rounds() {
        assert_eq!(usd_to_micro_units(1.234567).unwrap(), 1_234_567);
        assert_eq!(usd_to_micro_units(1.2345679).unwrap(), 1_234_567);
        assert_eq!(usd_to_micro_units(0.0000001).unwrap(), 0);
    }

    #[test]
    fn test_common_quotes() {
        assert_eq!(usd_to_micro_units(150.25).unwrap(), 150_250_000);
        assert_eq!(usd_to_micro_units(1234.56).unwrap(), 1_234_560_000);
        assert_eq!(usd_to_micro_units(0.0).unwrap(), 0);
    }

    #[test]
    fn test_rejects_invalid_quotes() {
        assert!(matches!(usd_to_micro_units(-1.0), Err(Error::PriceSource(_))));
        assert!(matches!(usd_to_micro_units(f64::NAN), Err(Error::PriceSource(_))));
        assert!(matches!(usd_to_micro_units(f64::INFINITY), Err(Error::PriceSource(_))));
        assert!(matches!(usd_to_micro_units(1e14), Err(Error::PriceSource(_))));
    }

    #[test]
    fn test_format_micro_units() {
        assert_eq!(format_micro_units(150_250_000), "150.250000");
        assert_eq!(format_micro_units(1), "0.000001");
        assert_eq!(format_micro_units(0), "0.000000");
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_scaled_quote(price in 0.0f64..1_000_000_000.0) {
            let micro = usd_to_micro_units(price).unwrap();
            prop_assert!(micro as f64 <= price * PRICE_SCALE as f64);
            prop_assert!((price * PRICE_SCALE as f64) - (micro as f64) < 1.0);
        }
    }
}
