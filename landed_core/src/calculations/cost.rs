//! # Landed Cost
//!
//! Turns a [`ShipmentInput`] and a [`RateTable`] into a full cost breakdown:
//! freight, tariff, VAT, fixed fees and commission.
//!
//! ## Formula Chain
//!
//! The steps run in a fixed order. Tariff and VAT are computed in USD on the
//! customs value (goods + freight converted at the exchange rate) and only
//! then converted back to KRW. The results depend on that round trip at the
//! last bit, so nothing here is shortcut through KRW.
//!
//! ```text
//! boxes        = ceil(quantity / per_box)          (by unit)
//! raw_cbm      = boxes × kg_per_box / divisor
//! chargeable   = max(raw_cbm, min_cbm)             (LCL)
//! freight      = chargeable × per_cbm | container  (LCL | FCL)
//! taxable_usd  = goods_usd + freight / rate
//! tariff_usd   = taxable_usd × tariff%
//! vat_usd      = (taxable_usd + tariff_usd) × vat%
//! landed       = docs + co + freight + tariff + vat + commission
//! ```
//!
//! ## Example
//!
//! ```rust
//! use landed_core::calculations::cost::compute_cost;
//! use landed_core::rates::RateTable;
//! use landed_core::shipment::{Commission, QuantityMode, ShipmentInput, ShippingMode};
//!
//! let input = ShipmentInput {
//!     quantity: QuantityMode::ByUnit {
//!         product_quantity: 1000,
//!         unit_price_usd: 10.0,
//!         quantity_per_box: 50,
//!     },
//!     weight_per_box_kg: 12.0,
//!     shipping: ShippingMode::Lcl,
//!     tariff_rate_percent: 8.0,
//!     commission: Commission::default(),
//!     exchange_rate_krw_per_usd: 1350.0,
//! };
//!
//! let cost = compute_cost(&input, &RateTable::default()).unwrap();
//! assert_eq!(cost.total_boxes, 20);
//! assert_eq!(cost.chargeable_cbm, 1.0);
//! println!("Landed cost: {:.0} KRW", cost.total_landed_cost_krw);
//! ```

use serde::{Deserialize, Serialize};

use crate::rates::RateTable;
use crate::shipment::{CommissionBasis, ShipmentInput, ShippingMode};
use crate::units::{Cbm, Kilograms, Krw, Usd};

/// Full cost breakdown of one shipment.
///
/// All KRW amounts exclude nothing unless stated: `total_landed_cost_krw`
/// is everything paid on top of the goods themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    // === Goods ===
    /// Goods value in USD
    pub total_product_price_usd: f64,

    /// Goods value in KRW (USD × exchange rate)
    pub total_product_price_krw: f64,

    // === Volume ===
    /// Boxes shipped
    pub total_boxes: u64,

    /// Gross weight (kg)
    pub total_weight_kg: f64,

    /// Weight-equivalent volume before any minimum (CBM)
    pub raw_cbm: f64,

    /// Billed volume; the LCL minimum is applied here (CBM)
    pub chargeable_cbm: f64,

    // === Costs (KRW) ===
    /// Ocean freight
    pub ocean_freight_krw: f64,

    /// Customs value: goods + freight
    pub taxable_base_krw: f64,

    /// Tariff on the customs value
    pub tariff_amount_krw: f64,

    /// VAT on customs value + tariff
    pub vat_amount_krw: f64,

    /// Tariff + VAT
    pub total_taxes_krw: f64,

    /// Documentation fee
    pub docs_fee_krw: f64,

    /// Certificate-of-origin fee
    pub co_fee_krw: f64,

    /// Buying agent commission
    pub commission_amount_krw: f64,

    /// Fees + freight + taxes + commission, goods excluded
    pub total_landed_cost_krw: f64,

    /// (goods + landed cost) / units; by-unit mode only
    pub cost_per_unit_krw: Option<f64>,
}

impl CostBreakdown {
    /// Goods plus every cost on top of them.
    pub fn grand_total_krw(&self) -> f64 {
        self.total_product_price_krw + self.total_landed_cost_krw
    }

    /// (goods + landed cost) per box.
    pub fn cost_per_box_krw(&self) -> Option<f64> {
        if self.total_boxes == 0 {
            return None;
        }
        Some(self.grand_total_krw() / self.total_boxes as f64)
    }

    /// Whether the LCL minimum raised the billed volume.
    pub fn min_cbm_applied(&self) -> bool {
        self.chargeable_cbm > self.raw_cbm
    }

    /// Cost components with their share of the grand total.
    ///
    /// Zero-valued components are omitted. Docs and CO fees are reported
    /// together as fixed fees.
    pub fn components(&self) -> Vec<CostComponent> {
        let entries = [
            (CostCategory::Goods, self.total_product_price_krw),
            (CostCategory::OceanFreight, self.ocean_freight_krw),
            (CostCategory::Commission, self.commission_amount_krw),
            (CostCategory::Tariff, self.tariff_amount_krw),
            (CostCategory::Vat, self.vat_amount_krw),
            (CostCategory::FixedFees, self.docs_fee_krw + self.co_fee_krw),
        ];
        let total: f64 = entries.iter().map(|(_, v)| *v).filter(|v| *v > 0.0).sum();

        entries
            .into_iter()
            .filter(|(_, amount)| *amount > 0.0)
            .map(|(category, amount_krw)| CostComponent {
                category,
                amount_krw,
                share: amount_krw / total,
            })
            .collect()
    }
}

/// Category of a cost component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostCategory {
    Goods,
    OceanFreight,
    Commission,
    Tariff,
    Vat,
    FixedFees,
}

impl CostCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CostCategory::Goods => "Goods",
            CostCategory::OceanFreight => "Ocean freight",
            CostCategory::Commission => "Commission",
            CostCategory::Tariff => "Tariff",
            CostCategory::Vat => "VAT",
            CostCategory::FixedFees => "Fixed fees (docs + CO)",
        }
    }
}

/// One slice of the cost breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostComponent {
    pub category: CostCategory,
    pub amount_krw: f64,
    /// Fraction of the grand total (0.0 - 1.0)
    pub share: f64,
}

/// Compute the landed cost of a shipment.
///
/// # Returns
///
/// * `Some(CostBreakdown)` - all required inputs present
/// * `None` - a required input is zero or missing (exchange rate, quantity,
///   unit price, per-box quantity, box count or total price), a value is
///   negative or non-finite, or the rate table is unusable. Use
///   [`ShipmentInput::validate`] to find out which.
pub fn compute_cost(input: &ShipmentInput, rates: &RateTable) -> Option<CostBreakdown> {
    if input.validate().is_err() || rates.validate().is_err() {
        return None;
    }
    let rate = input.exchange_rate_krw_per_usd;

    // 1. Boxes
    let total_boxes = input.quantity.total_boxes()?;
    let goods_usd = Usd(input.quantity.total_product_price_usd());

    // 2. Weight and weight-equivalent volume
    let total_weight = Kilograms(total_boxes as f64 * input.weight_per_box_kg);
    let raw_cbm = total_weight.to_cbm(rates.cbm_weight_divisor);

    // 3. LCL minimum
    let chargeable_cbm = if input.shipping.is_lcl() {
        raw_cbm.at_least(Cbm(rates.min_chargeable_cbm))
    } else {
        raw_cbm
    };

    // 4. Freight
    let ocean_freight = match input.shipping {
        ShippingMode::Fcl { container_cost_krw } => Krw(container_cost_krw),
        ShippingMode::Lcl => Krw(chargeable_cbm.0 * rates.ocean_freight_per_cbm_krw),
    };

    // 5-6. Customs value, tariff and VAT in USD
    let taxable_base_usd = goods_usd + ocean_freight.to_usd(rate);
    let tariff_usd = taxable_base_usd.percent(input.tariff_rate_percent);
    let vat_base_usd = taxable_base_usd + tariff_usd;
    let vat_usd = vat_base_usd.percent(rates.vat_rate_percent);

    // 7. Back to KRW
    let goods_krw = goods_usd.to_krw(rate);
    let tariff_krw = tariff_usd.to_krw(rate);
    let vat_krw = vat_usd.to_krw(rate);

    // 8. Commission
    let commission_krw = match input.commission.basis {
        CommissionBasis::PercentOfGoods => goods_krw.0 * (input.commission.value / 100.0),
        CommissionBasis::PerUnit => match input.quantity.product_quantity() {
            Some(units) => input.commission.value * units as f64,
            None => 0.0,
        },
    };

    // 9. Landed cost
    let total_landed_cost_krw = rates.docs_fee_krw
        + rates.co_fee_krw
        + ocean_freight.0
        + tariff_krw.0
        + vat_krw.0
        + commission_krw;

    // 10. Per unit
    let cost_per_unit_krw = input
        .quantity
        .product_quantity()
        .filter(|units| *units > 0)
        .map(|units| (goods_krw.0 + total_landed_cost_krw) / units as f64);

    tracing::trace!(
        boxes = total_boxes,
        chargeable_cbm = chargeable_cbm.0,
        landed_krw = total_landed_cost_krw,
        "priced shipment"
    );

    Some(CostBreakdown {
        total_product_price_usd: goods_usd.0,
        total_product_price_krw: goods_krw.0,
        total_boxes,
        total_weight_kg: total_weight.0,
        raw_cbm: raw_cbm.0,
        chargeable_cbm: chargeable_cbm.0,
        ocean_freight_krw: ocean_freight.0,
        taxable_base_krw: goods_krw.0 + ocean_freight.0,
        tariff_amount_krw: tariff_krw.0,
        vat_amount_krw: vat_krw.0,
        total_taxes_krw: tariff_krw.0 + vat_krw.0,
        docs_fee_krw: rates.docs_fee_krw,
        co_fee_krw: rates.co_fee_krw,
        commission_amount_krw: commission_krw,
        total_landed_cost_krw,
        cost_per_unit_krw,
    })
}
