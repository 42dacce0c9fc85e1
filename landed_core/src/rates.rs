//! # Rate Table
//!
//! Fixed fees and rates applied to every shipment. The table is plain data:
//! it is built from settings by the caller and passed explicitly to each
//! calculation. Nothing in the engine reads configuration from a global.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "docs_fee_krw": 88000.0,
//!   "co_fee_krw": 43700.0,
//!   "ocean_freight_per_cbm_krw": 110000.0,
//!   "min_chargeable_cbm": 1.0,
//!   "cbm_weight_divisor": 250.0,
//!   "vat_rate_percent": 10.0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Default documentation fee per shipment (KRW)
pub const DEFAULT_DOCS_FEE_KRW: f64 = 88_000.0;

/// Default certificate-of-origin fee per shipment (KRW)
pub const DEFAULT_CO_FEE_KRW: f64 = 43_700.0;

/// Default LCL ocean freight per chargeable CBM (KRW)
pub const DEFAULT_OCEAN_FREIGHT_PER_CBM_KRW: f64 = 110_000.0;

/// Default LCL minimum chargeable volume (CBM)
pub const DEFAULT_MIN_CHARGEABLE_CBM: f64 = 1.0;

/// Default kilograms billed as one CBM
pub const DEFAULT_CBM_WEIGHT_DIVISOR: f64 = 250.0;

/// Default VAT rate (percent)
pub const DEFAULT_VAT_RATE_PERCENT: f64 = 10.0;

/// Per-shipment fees and rates.
///
/// Missing fields deserialize to their defaults so that settings saved by
/// an older version pick up newly added rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    /// Documentation fee charged once per shipment
    pub docs_fee_krw: f64,

    /// Certificate-of-origin fee charged once per shipment
    pub co_fee_krw: f64,

    /// LCL ocean freight per chargeable CBM
    pub ocean_freight_per_cbm_krw: f64,

    /// LCL minimum chargeable volume
    pub min_chargeable_cbm: f64,

    /// Kilograms per CBM-equivalent (weight is converted to volume with this)
    pub cbm_weight_divisor: f64,

    /// VAT rate in percent (10.0 = 10 %)
    pub vat_rate_percent: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        RateTable {
            docs_fee_krw: DEFAULT_DOCS_FEE_KRW,
            co_fee_krw: DEFAULT_CO_FEE_KRW,
            ocean_freight_per_cbm_krw: DEFAULT_OCEAN_FREIGHT_PER_CBM_KRW,
            min_chargeable_cbm: DEFAULT_MIN_CHARGEABLE_CBM,
            cbm_weight_divisor: DEFAULT_CBM_WEIGHT_DIVISOR,
            vat_rate_percent: DEFAULT_VAT_RATE_PERCENT,
        }
    }
}

impl RateTable {
    /// Fees charged once per shipment regardless of its size.
    pub fn fixed_fees_krw(&self) -> f64 {
        self.docs_fee_krw + self.co_fee_krw
    }

    /// Validate the table.
    ///
    /// Fees and rates must be finite and non-negative; the CBM divisor must
    /// be strictly positive since weight is divided by it.
    pub fn validate(&self) -> CalcResult<()> {
        let non_negative = [
            ("docs_fee_krw", self.docs_fee_krw),
            ("co_fee_krw", self.co_fee_krw),
            ("ocean_freight_per_cbm_krw", self.ocean_freight_per_cbm_krw),
            ("min_chargeable_cbm", self.min_chargeable_cbm),
            ("vat_rate_percent", self.vat_rate_percent),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a non-negative number",
                ));
            }
        }
        if !self.cbm_weight_divisor.is_finite() || self.cbm_weight_divisor <= 0.0 {
            return Err(CalcError::invalid_input(
                "cbm_weight_divisor",
                self.cbm_weight_divisor.to_string(),
                "Divisor must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rates = RateTable::default();
        assert_eq!(rates.docs_fee_krw, 88_000.0);
        assert_eq!(rates.co_fee_krw, 43_700.0);
        assert_eq!(rates.fixed_fees_krw(), 131_700.0);
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let rates: RateTable = serde_json::from_str(r#"{ "docs_fee_krw": 50000.0 }"#).unwrap();
        assert_eq!(rates.docs_fee_krw, 50_000.0);
        assert_eq!(rates.cbm_weight_divisor, DEFAULT_CBM_WEIGHT_DIVISOR);
        assert_eq!(rates.min_chargeable_cbm, DEFAULT_MIN_CHARGEABLE_CBM);
    }

    #[test]
    fn test_invalid_divisor() {
        let rates = RateTable {
            cbm_weight_divisor: 0.0,
            ..RateTable::default()
        };
        let err = rates.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_negative_fee_rejected() {
        let rates = RateTable {
            co_fee_krw: -1.0,
            ..RateTable::default()
        };
        assert!(rates.validate().is_err());
    }
}
