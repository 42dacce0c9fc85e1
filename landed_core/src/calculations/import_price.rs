//! # Import Purchase Price
//!
//! Unit purchase price of goods bought in CNY, with the buying agent's
//! commission and a customs handling fee, expressed in KRW.
//!
//! ```text
//! base      = product + packaging + label        (CNY)
//! total     = base × (1 + commission)            (CNY)
//! usd       = total × usd_per_cny
//! krw       = usd × krw_per_usd
//! final     = krw × (1 + customs fee)
//! ```
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "product_cost_cny": 10.0,
//!   "packaging_cny": 0.31,
//!   "label_cny": 0.03,
//!   "commission_rate": 0.035,
//!   "customs_fee_rate": 0.22,
//!   "usd_per_cny": 0.14,
//!   "exchange_rate_krw_per_usd": 1350.0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::settings::ImportOptions;
use crate::units::Cny;

/// Inputs of the import price calculator.
///
/// Commission and customs fee rates are fractions (0.035 = 3.5 %).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImportPriceInput {
    pub product_cost_cny: f64,
    #[serde(default)]
    pub packaging_cny: f64,
    #[serde(default)]
    pub label_cny: f64,
    #[serde(default)]
    pub commission_rate: f64,
    #[serde(default)]
    pub customs_fee_rate: f64,
    /// USD per CNY
    pub usd_per_cny: f64,
    /// KRW per USD
    pub exchange_rate_krw_per_usd: f64,
}

impl ImportPriceInput {
    /// Input using the first (default) choice of each option list.
    pub fn with_default_options(
        product_cost_cny: f64,
        options: &ImportOptions,
        usd_per_cny: f64,
        exchange_rate_krw_per_usd: f64,
    ) -> Self {
        ImportPriceInput {
            product_cost_cny,
            packaging_cny: ImportOptions::first_value(&options.packaging_options),
            label_cny: ImportOptions::first_value(&options.label_options),
            commission_rate: ImportOptions::first_value(&options.commission_rates),
            customs_fee_rate: ImportOptions::first_value(&options.customs_fee_rates),
            usd_per_cny,
            exchange_rate_krw_per_usd,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.product_cost_cny == 0.0 {
            return Err(CalcError::missing_field("product_cost_cny"));
        }
        for (field, rate) in [
            ("usd_per_cny", self.usd_per_cny),
            ("exchange_rate_krw_per_usd", self.exchange_rate_krw_per_usd),
        ] {
            if rate == 0.0 {
                return Err(CalcError::missing_field(field));
            }
            if !(rate > 0.0) || !rate.is_finite() {
                return Err(CalcError::invalid_input(field, rate.to_string(), "Rate must be positive"));
            }
        }
        let amounts = [
            ("product_cost_cny", self.product_cost_cny),
            ("packaging_cny", self.packaging_cny),
            ("label_cny", self.label_cny),
            ("commission_rate", self.commission_rate),
            ("customs_fee_rate", self.customs_fee_rate),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}

/// Import price breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImportPriceBreakdown {
    /// Product + packaging + label
    pub base_cost_cny: f64,
    pub commission_cny: f64,
    pub total_cost_cny: f64,
    pub total_cost_usd: f64,
    pub total_cost_krw: f64,
    pub customs_fee_krw: f64,
    /// KRW cost plus customs fee
    pub final_import_cost_krw: f64,
}

/// Compute the import purchase price.
///
/// `None` when the product cost is zero or either exchange rate is not
/// positive (or any value fails [`ImportPriceInput::validate`]).
pub fn compute_import_price(input: &ImportPriceInput) -> Option<ImportPriceBreakdown> {
    if input.validate().is_err() {
        return None;
    }

    let base = Cny(input.product_cost_cny) + Cny(input.packaging_cny) + Cny(input.label_cny);
    let commission = base * input.commission_rate;
    let total = base + commission;

    let usd = total.to_usd(input.usd_per_cny);
    let krw = usd.to_krw(input.exchange_rate_krw_per_usd);
    let customs_fee = krw * input.customs_fee_rate;

    tracing::trace!(total_cny = total.value(), krw = krw.value(), "priced import");

    Some(ImportPriceBreakdown {
        base_cost_cny: base.value(),
        commission_cny: commission.value(),
        total_cost_cny: total.value(),
        total_cost_usd: usd.value(),
        total_cost_krw: krw.value(),
        customs_fee_krw: customs_fee.value(),
        final_import_cost_krw: (krw + customs_fee).value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ImportPriceInput {
        ImportPriceInput {
            product_cost_cny: 10.0,
            packaging_cny: 0.31,
            label_cny: 0.03,
            commission_rate: 0.035,
            customs_fee_rate: 0.22,
            usd_per_cny: 0.14,
            exchange_rate_krw_per_usd: 1350.0,
        }
    }

    #[test]
    fn test_formula_chain() {
        let result = compute_import_price(&sample()).unwrap();

        let base = 10.0 + 0.31 + 0.03;
        let commission = base * 0.035;
        let total = base + commission;
        let krw = total * 0.14 * 1350.0;

        assert_eq!(result.base_cost_cny, base);
        assert_eq!(result.commission_cny, commission);
        assert_eq!(result.total_cost_cny, total);
        assert_eq!(result.total_cost_krw, krw);
        assert_eq!(result.customs_fee_krw, krw * 0.22);
        assert_eq!(result.final_import_cost_krw, krw + krw * 0.22);
    }

    #[test]
    fn test_zero_inputs_give_no_result() {
        let mut input = sample();
        input.product_cost_cny = 0.0;
        assert!(compute_import_price(&input).is_none());
        assert!(input.validate().unwrap_err().is_incomplete_input());

        let mut input = sample();
        input.usd_per_cny = 0.0;
        assert!(compute_import_price(&input).is_none());

        let mut input = sample();
        input.exchange_rate_krw_per_usd = -1.0;
        assert!(compute_import_price(&input).is_none());
    }

    #[test]
    fn test_no_extras() {
        let input = ImportPriceInput {
            packaging_cny: 0.0,
            label_cny: 0.0,
            commission_rate: 0.0,
            customs_fee_rate: 0.0,
            ..sample()
        };
        let result = compute_import_price(&input).unwrap();
        assert_eq!(result.commission_cny, 0.0);
        assert_eq!(result.final_import_cost_krw, result.total_cost_krw);
    }

    #[test]
    fn test_default_options() {
        let input = ImportPriceInput::with_default_options(10.0, &ImportOptions::default(), 0.14, 1350.0);
        assert_eq!(input, sample());
    }

    #[test]
    fn test_optional_fields_default_to_zero() {
        let json = r#"{ "product_cost_cny": 5.0, "usd_per_cny": 0.14, "exchange_rate_krw_per_usd": 1350.0 }"#;
        let input: ImportPriceInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.label_cny, 0.0);
        assert!(compute_import_price(&input).is_some());
    }
}
