//! # Quantity Efficiency Scan
//!
//! Prices the shipment at a handful of box counts to expose volume effects:
//! below the LCL minimum every extra box rides for free on freight, and the
//! fixed fees are spread over more units as the order grows.
//!
//! Breakpoints are 1 to 10 boxes, the current count and +1 / +5 / +10, and
//! the count at which the weight-equivalent volume first reaches the LCL
//! minimum (plus the one after it). The current count is priced from the
//! input as entered; every other breakpoint from a resized copy (see
//! [`ShipmentInput::with_box_count`]).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::calculations::cost::{compute_cost, CostBreakdown};
use crate::rates::RateTable;
use crate::shipment::ShipmentInput;

/// One priced breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyPoint {
    pub boxes: u64,
    /// Units shipped; by-unit mode only
    pub quantity: Option<u64>,
    pub raw_cbm: f64,
    pub chargeable_cbm: f64,
    pub ocean_freight_krw: f64,
    /// Landed cost, goods excluded
    pub total_cost_krw: f64,
    /// Cost per unit (by unit) or per box (by box), goods included
    pub metric_krw: f64,
    /// Raw volume below the LCL minimum: freight is billed on the minimum
    pub below_min_cbm: bool,
}

impl EfficiencyPoint {
    fn price(input: &ShipmentInput, rates: &RateTable) -> Option<Self> {
        let cost = compute_cost(input, rates)?;
        Self::from_cost(&cost, input.quantity.product_quantity(), rates.min_chargeable_cbm)
    }

    fn from_cost(cost: &CostBreakdown, quantity: Option<u64>, min_chargeable_cbm: f64) -> Option<Self> {
        let metric_krw = cost.cost_per_unit_krw.or_else(|| cost.cost_per_box_krw())?;
        Some(EfficiencyPoint {
            boxes: cost.total_boxes,
            quantity,
            raw_cbm: cost.raw_cbm,
            chargeable_cbm: cost.chargeable_cbm,
            ocean_freight_krw: cost.ocean_freight_krw,
            total_cost_krw: cost.total_landed_cost_krw,
            metric_krw,
            below_min_cbm: cost.raw_cbm < min_chargeable_cbm,
        })
    }
}

/// What the scan compares per breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EfficiencyMetric {
    CostPerUnit,
    CostPerBox,
}

/// A larger order that lowers the metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyRecommendation {
    pub boxes: u64,
    pub additional_boxes: u64,
    pub metric_krw: f64,
    /// Current metric minus the recommended one
    pub saving_krw: f64,
}

/// Result of a quantity efficiency scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyScan {
    pub metric: EfficiencyMetric,
    /// Priced breakpoints, ascending by box count
    pub points: Vec<EfficiencyPoint>,
    pub current_boxes: u64,
    pub current_metric_krw: f64,
    /// `None` when the current quantity is already efficient
    pub recommendation: Option<EfficiencyRecommendation>,
    /// Extra landed cost of sending the order one box per shipment instead
    /// of all at once. Only reported when the order has more than one box.
    pub one_box_split_penalty_krw: Option<f64>,
}

impl EfficiencyScan {
    pub fn is_already_efficient(&self) -> bool {
        self.recommendation.is_none()
    }

    pub fn point(&self, boxes: u64) -> Option<&EfficiencyPoint> {
        self.points.iter().find(|p| p.boxes == boxes)
    }
}

/// Box count at which the raw volume first reaches `min_chargeable_cbm`.
///
/// `None` when the box weight is not positive.
pub fn min_cbm_crossing(weight_per_box_kg: f64, rates: &RateTable) -> Option<u64> {
    if !(weight_per_box_kg > 0.0) || !weight_per_box_kg.is_finite() {
        return None;
    }
    let boxes = (rates.min_chargeable_cbm * rates.cbm_weight_divisor / weight_per_box_kg).ceil();
    if boxes.is_finite() && boxes >= 0.0 {
        Some(boxes as u64)
    } else {
        None
    }
}

/// Box counts evaluated by [`scan_efficiency`], ascending and deduplicated.
pub fn breakpoints(current_boxes: u64, weight_per_box_kg: f64, rates: &RateTable) -> Vec<u64> {
    let mut points: BTreeSet<u64> = (1..=10).collect();
    for offset in [0, 1, 5, 10] {
        points.insert(current_boxes.saturating_add(offset));
    }
    if let Some(crossing) = min_cbm_crossing(weight_per_box_kg, rates) {
        points.insert(crossing);
        points.insert(crossing.saturating_add(1));
    }
    points.remove(&0);
    points.into_iter().collect()
}

/// Scan box counts around the current order for a cheaper cost per unit
/// (by-unit mode) or per box (by-box mode).
///
/// The recommendation is the first breakpoint with more boxes than the
/// current order and a strictly lower metric. Returns `None` when the
/// current input cannot be priced.
///
/// The current row is priced from the units actually entered, so a partial
/// last box is not rounded up. Every other breakpoint ships full boxes
/// (`boxes × quantity_per_box` units). Breakpoints whose unit count
/// overflows are left out.
pub fn scan_efficiency(input: &ShipmentInput, rates: &RateTable) -> Option<EfficiencyScan> {
    let current = compute_cost(input, rates)?;
    let current_boxes = current.total_boxes;
    let metric = if current.cost_per_unit_krw.is_some() {
        EfficiencyMetric::CostPerUnit
    } else {
        EfficiencyMetric::CostPerBox
    };
    let current_point =
        EfficiencyPoint::from_cost(&current, input.quantity.product_quantity(), rates.min_chargeable_cbm)?;

    let mut points = Vec::new();
    for boxes in breakpoints(current_boxes, input.weight_per_box_kg, rates) {
        if boxes == current_boxes {
            points.push(current_point);
            continue;
        }
        let Some(point) = input
            .with_box_count(boxes)
            .and_then(|resized| EfficiencyPoint::price(&resized, rates))
        else {
            tracing::debug!(boxes, "breakpoint could not be priced");
            continue;
        };
        points.push(point);
    }

    let recommendation = points
        .iter()
        .find(|p| p.boxes > current_boxes && p.metric_krw < current_point.metric_krw)
        .map(|p| EfficiencyRecommendation {
            boxes: p.boxes,
            additional_boxes: p.boxes - current_boxes,
            metric_krw: p.metric_krw,
            saving_krw: current_point.metric_krw - p.metric_krw,
        });

    let one_box_split_penalty_krw = if current_boxes > 1 {
        points
            .iter()
            .find(|p| p.boxes == 1)
            .map(|single| single.total_cost_krw * current_boxes as f64 - current_point.total_cost_krw)
    } else {
        None
    };

    tracing::debug!(
        current_boxes,
        breakpoints = points.len(),
        recommended = recommendation.map(|r| r.boxes),
        "efficiency scan complete"
    );

    Some(EfficiencyScan {
        metric,
        points,
        current_boxes,
        current_metric_krw: current_point.metric_krw,
        recommendation,
        one_box_split_penalty_krw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::{Commission, QuantityMode, ShippingMode};

    fn small_order() -> ShipmentInput {
        // 4 boxes x 12 kg = 0.192 CBM: deep under the LCL minimum
        ShipmentInput {
            quantity: QuantityMode::ByUnit {
                product_quantity: 200,
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
    fn test_breakpoints_include_crossing() {
        let rates = RateTable::default();
        // ceil(1.0 * 250 / 12) = 21
        assert_eq!(min_cbm_crossing(12.0, &rates), Some(21));
        let points = breakpoints(4, 12.0, &rates);
        assert_eq!(points, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 14, 21, 22]);
    }

    #[test]
    fn test_breakpoints_without_weight() {
        let rates = RateTable::default();
        assert_eq!(min_cbm_crossing(0.0, &rates), None);
        let points = breakpoints(30, 0.0, &rates);
        assert_eq!(&points[10..], &[30, 31, 35, 40]);
    }

    #[test]
    fn test_small_order_gets_recommendation() {
        let scan = scan_efficiency(&small_order(), &RateTable::default()).unwrap();
        assert_eq!(scan.metric, EfficiencyMetric::CostPerUnit);
        assert_eq!(scan.current_boxes, 4);

        // Fixed fees and the freight minimum are spread over more units at 5 boxes
        let rec = scan.recommendation.unwrap();
        assert_eq!(rec.boxes, 5);
        assert_eq!(rec.additional_boxes, 1);
        assert!(rec.saving_krw > 0.0);
        assert!(!scan.is_already_efficient());
    }

    #[test]
    fn test_current_point_matches_cost_model() {
        let rates = RateTable::default();
        let scan = scan_efficiency(&small_order(), &rates).unwrap();
        let direct = compute_cost(&small_order(), &rates).unwrap();
        let current = scan.point(4).unwrap();
        assert_eq!(current.total_cost_krw, direct.total_landed_cost_krw);
        assert_eq!(Some(scan.current_metric_krw), direct.cost_per_unit_krw);
        assert_eq!(current.quantity, Some(200));
    }

    #[test]
    fn test_below_min_flags() {
        let scan = scan_efficiency(&small_order(), &RateTable::default()).unwrap();
        assert!(scan.point(4).unwrap().below_min_cbm);
        assert!(scan.point(20).is_none());
        // 21 x 12 = 252 kg = 1.008 CBM
        assert!(!scan.point(21).unwrap().below_min_cbm);
    }

    #[test]
    fn test_one_box_split_penalty() {
        let rates = RateTable::default();
        let scan = scan_efficiency(&small_order(), &rates).unwrap();
        let penalty = scan.one_box_split_penalty_krw.unwrap();
        // Four separate shipments pay three extra sets of fixed fees and minimums
        assert!(penalty > 3.0 * rates.fixed_fees_krw());

        let mut single = small_order();
        single.quantity = QuantityMode::ByUnit {
            product_quantity: 50,
            unit_price_usd: 10.0,
            quantity_per_box: 50,
        };
        let scan = scan_efficiency(&single, &rates).unwrap();
        assert_eq!(scan.one_box_split_penalty_krw, None);
    }

    #[test]
    fn test_by_box_uses_cost_per_box() {
        let mut input = small_order();
        input.quantity = QuantityMode::ByBox {
            box_quantity: 4,
            total_product_price_usd: 2000.0,
        };
        let scan = scan_efficiency(&input, &RateTable::default()).unwrap();
        assert_eq!(scan.metric, EfficiencyMetric::CostPerBox);
        assert!(scan.points.iter().all(|p| p.quantity.is_none()));
        assert!(scan.recommendation.is_some());
    }

    #[test]
    fn test_large_fcl_order_is_efficient_or_improves() {
        let mut input = small_order();
        input.shipping = ShippingMode::Fcl {
            container_cost_krw: 3_000_000.0,
        };
        let scan = scan_efficiency(&input, &RateTable::default()).unwrap();
        if let Some(rec) = scan.recommendation {
            assert!(rec.boxes > scan.current_boxes);
            assert!(rec.metric_krw < scan.current_metric_krw);
        }
        for pair in scan.points.windows(2) {
            assert!(pair[0].boxes < pair[1].boxes);
        }
    }

    #[test]
    fn test_unit_count_overflow_skips_breakpoints() {
        let mut input = small_order();
        input.quantity = QuantityMode::ByUnit {
            product_quantity: 10,
            unit_price_usd: 1.0,
            quantity_per_box: u64::MAX / 2,
        };
        assert!(input.validate().is_ok());

        let scan = scan_efficiency(&input, &RateTable::default()).unwrap();
        assert_eq!(scan.current_boxes, 1);
        // From 3 boxes on the unit count exceeds u64
        let boxes: Vec<u64> = scan.points.iter().map(|p| p.boxes).collect();
        assert_eq!(boxes, vec![1, 2]);
    }

    #[test]
    fn test_unpriceable_input() {
        let mut input = small_order();
        input.exchange_rate_krw_per_usd = 0.0;
        assert!(scan_efficiency(&input, &RateTable::default()).is_none());
    }
}
