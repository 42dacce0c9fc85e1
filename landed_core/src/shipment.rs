//! # Shipment Input
//!
//! The parameters of one shipment as entered by the user. The two calculation
//! modes (by unit, by box) and the two shipping modes (LCL, FCL) are tagged
//! enums, so a by-box input can never carry a stray unit price and an LCL
//! shipment has no container cost.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "quantity": {
//!     "mode": "ByUnit",
//!     "product_quantity": 1000,
//!     "unit_price_usd": 10.0,
//!     "quantity_per_box": 50
//!   },
//!   "weight_per_box_kg": 12.0,
//!   "shipping": { "mode": "Lcl" },
//!   "tariff_rate_percent": 8.0,
//!   "commission": { "basis": "PercentOfGoods", "value": 0.0 },
//!   "exchange_rate_krw_per_usd": 1350.0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// How the shipment size and goods value are specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum QuantityMode {
    /// Units and unit price given; boxes derived by ceiling division.
    ByUnit {
        product_quantity: u64,
        unit_price_usd: f64,
        quantity_per_box: u64,
    },
    /// Box count and total goods value given directly.
    ByBox {
        box_quantity: u64,
        total_product_price_usd: f64,
    },
}

impl QuantityMode {
    /// Number of boxes shipped. `None` when the per-box quantity is zero.
    pub fn total_boxes(&self) -> Option<u64> {
        match *self {
            QuantityMode::ByUnit {
                product_quantity,
                quantity_per_box,
                ..
            } => {
                if quantity_per_box == 0 {
                    return None;
                }
                Some(product_quantity.div_ceil(quantity_per_box))
            }
            QuantityMode::ByBox { box_quantity, .. } => Some(box_quantity),
        }
    }

    /// Total goods value in USD.
    pub fn total_product_price_usd(&self) -> f64 {
        match *self {
            QuantityMode::ByUnit {
                product_quantity,
                unit_price_usd,
                ..
            } => product_quantity as f64 * unit_price_usd,
            QuantityMode::ByBox {
                total_product_price_usd,
                ..
            } => total_product_price_usd,
        }
    }

    /// Unit count, only known in by-unit mode.
    pub fn product_quantity(&self) -> Option<u64> {
        match *self {
            QuantityMode::ByUnit { product_quantity, .. } => Some(product_quantity),
            QuantityMode::ByBox { .. } => None,
        }
    }
}

/// Ocean shipping mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum ShippingMode {
    /// Less than container load: billed per chargeable CBM with a minimum.
    Lcl,
    /// Full container load: a fixed container charge.
    Fcl { container_cost_krw: f64 },
}

impl ShippingMode {
    pub fn is_lcl(&self) -> bool {
        matches!(self, ShippingMode::Lcl)
    }

    /// Short display name ("LCL" / "FCL")
    pub fn name(&self) -> &'static str {
        match self {
            ShippingMode::Lcl => "LCL",
            ShippingMode::Fcl { .. } => "FCL",
        }
    }
}

/// How the buying agent's commission is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommissionBasis {
    /// Percent of the goods value in KRW
    PercentOfGoods,
    /// Fixed KRW amount per unit (by-unit mode only)
    PerUnit,
}

/// Commission setting: a basis and its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    pub basis: CommissionBasis,
    pub value: f64,
}

impl Commission {
    pub fn percent_of_goods(percent: f64) -> Self {
        Commission {
            basis: CommissionBasis::PercentOfGoods,
            value: percent,
        }
    }

    pub fn per_unit(krw: f64) -> Self {
        Commission {
            basis: CommissionBasis::PerUnit,
            value: krw,
        }
    }
}

impl Default for Commission {
    fn default() -> Self {
        Commission::percent_of_goods(0.0)
    }
}

/// Parameters of one shipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipmentInput {
    /// Quantity and goods value
    pub quantity: QuantityMode,

    /// Gross weight of one box in kilograms
    pub weight_per_box_kg: f64,

    /// LCL or FCL
    pub shipping: ShippingMode,

    /// Tariff rate in percent (8.0 = 8 %)
    pub tariff_rate_percent: f64,

    /// Buying agent commission
    #[serde(default)]
    pub commission: Commission,

    /// KRW per USD
    pub exchange_rate_krw_per_usd: f64,
}

impl ShipmentInput {
    /// Validate the input, naming the first field that prevents a result.
    ///
    /// Zero required values come back as [`CalcError::MissingField`] (the
    /// caller is still waiting for input); negative or non-finite values as
    /// [`CalcError::InvalidInput`]. When this returns `Ok`, the cost model
    /// produces a breakdown.
    pub fn validate(&self) -> CalcResult<()> {
        check_rate("exchange_rate_krw_per_usd", self.exchange_rate_krw_per_usd)?;

        match self.quantity {
            QuantityMode::ByUnit {
                product_quantity,
                unit_price_usd,
                quantity_per_box,
            } => {
                if product_quantity == 0 {
                    return Err(CalcError::missing_field("product_quantity"));
                }
                check_rate("unit_price_usd", unit_price_usd)?;
                if quantity_per_box == 0 {
                    return Err(CalcError::missing_field("quantity_per_box"));
                }
            }
            QuantityMode::ByBox {
                box_quantity,
                total_product_price_usd,
            } => {
                if box_quantity == 0 {
                    return Err(CalcError::missing_field("box_quantity"));
                }
                check_rate("total_product_price_usd", total_product_price_usd)?;
            }
        }

        check_non_negative("weight_per_box_kg", self.weight_per_box_kg)?;
        check_non_negative("tariff_rate_percent", self.tariff_rate_percent)?;
        check_non_negative("commission.value", self.commission.value)?;
        if let ShippingMode::Fcl { container_cost_krw } = self.shipping {
            check_non_negative("container_cost_krw", container_cost_krw)?;
        }
        Ok(())
    }

    /// The same shipment resized to `boxes` boxes.
    ///
    /// By-unit inputs keep their unit price and ship full boxes
    /// (`boxes × quantity_per_box` units). By-box inputs keep their average
    /// goods value per box. Every other parameter is unchanged.
    ///
    /// `None` when the resized unit count does not fit in a `u64`.
    pub fn with_box_count(&self, boxes: u64) -> Option<ShipmentInput> {
        let quantity = match self.quantity {
            QuantityMode::ByUnit {
                unit_price_usd,
                quantity_per_box,
                ..
            } => QuantityMode::ByUnit {
                product_quantity: boxes.checked_mul(quantity_per_box)?,
                unit_price_usd,
                quantity_per_box,
            },
            QuantityMode::ByBox {
                box_quantity,
                total_product_price_usd,
            } => {
                let price_per_box = if box_quantity == 0 {
                    0.0
                } else {
                    total_product_price_usd / box_quantity as f64
                };
                QuantityMode::ByBox {
                    box_quantity: boxes,
                    total_product_price_usd: boxes as f64 * price_per_box,
                }
            }
        };
        Some(ShipmentInput { quantity, ..*self })
    }
}

/// Strictly positive, finite value required; zero means "not entered yet".
fn check_rate(field: &str, value: f64) -> CalcResult<()> {
    if value == 0.0 {
        return Err(CalcError::missing_field(field));
    }
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be a positive number"));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a non-negative number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_unit() -> ShipmentInput {
        ShipmentInput {
            quantity: QuantityMode::ByUnit {
                product_quantity: 1000,
                unit_price_usd: 10.0,
                quantity_per_box: 50,
            },
            weight_per_box_kg: 12.0,
            shipping: ShippingMode::Lcl,
            tariff_rate_percent: 8.0,
            commission: Commission::default(),
            exchange_rate_krw_per_usd: 1350.0,
        }
    }

    #[test]
    fn test_total_boxes_ceiling() {
        let mode = QuantityMode::ByUnit {
            product_quantity: 1001,
            unit_price_usd: 1.0,
            quantity_per_box: 50,
        };
        assert_eq!(mode.total_boxes(), Some(21));
    }

    #[test]
    fn test_total_boxes_zero_per_box() {
        let mode = QuantityMode::ByUnit {
            product_quantity: 10,
            unit_price_usd: 1.0,
            quantity_per_box: 0,
        };
        assert_eq!(mode.total_boxes(), None);
    }

    #[test]
    fn test_validate_ok() {
        assert!(by_unit().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_unit_price() {
        let mut input = by_unit();
        input.quantity = QuantityMode::ByUnit {
            product_quantity: 1000,
            unit_price_usd: 0.0,
            quantity_per_box: 50,
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err, CalcError::missing_field("unit_price_usd"));
        assert!(err.is_incomplete_input());
    }

    #[test]
    fn test_validate_negative_weight() {
        let mut input = by_unit();
        input.weight_per_box_kg = -1.0;
        assert_eq!(input.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_with_box_count_by_unit() {
        let resized = by_unit().with_box_count(3).unwrap();
        assert_eq!(resized.quantity.product_quantity(), Some(150));
        assert_eq!(resized.quantity.total_boxes(), Some(3));
        assert_eq!(resized.tariff_rate_percent, 8.0);
    }

    #[test]
    fn test_with_box_count_by_box_keeps_price_per_box() {
        let mut input = by_unit();
        input.quantity = QuantityMode::ByBox {
            box_quantity: 4,
            total_product_price_usd: 2000.0,
        };
        let resized = input.with_box_count(2).unwrap();
        assert_eq!(resized.quantity.total_boxes(), Some(2));
        assert_eq!(resized.quantity.total_product_price_usd(), 1000.0);
    }

    #[test]
    fn test_with_box_count_unit_overflow() {
        let mut input = by_unit();
        input.quantity = QuantityMode::ByUnit {
            product_quantity: 10,
            unit_price_usd: 1.0,
            quantity_per_box: u64::MAX / 2,
        };
        assert!(input.validate().is_ok());
        assert!(input.with_box_count(2).is_some());
        assert!(input.with_box_count(3).is_none());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&by_unit()).unwrap();
        assert!(json.contains("\"mode\":\"ByUnit\""));
        assert!(json.contains("\"mode\":\"Lcl\""));
        let roundtrip: ShipmentInput = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, by_unit());
    }

    #[test]
    fn test_fcl_json() {
        let json = r#"{ "mode": "Fcl", "container_cost_krw": 2500000.0 }"#;
        let mode: ShippingMode = serde_json::from_str(json).unwrap();
        assert_eq!(mode, ShippingMode::Fcl { container_cost_krw: 2_500_000.0 });
        assert_eq!(mode.name(), "FCL");
    }
}
