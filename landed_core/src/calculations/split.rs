//! # Split Shipment Optimizer
//!
//! Answers "should this order ship in one go or in several smaller
//! shipments?". Every shipment pays the docs and CO fees again and, under
//! LCL, its own minimum chargeable volume, so splitting multiplies the fixed
//! costs while the variable costs (freight per CBM, taxes) stay roughly the
//! same in total. The optimizer prices every sensible split and ranks them.
//!
//! ## Search Space
//!
//! Split counts run from 1 up to `min(total_boxes, tier cap, 50)`. The tier
//! cap keeps shipments at a realistic minimum size: 10 boxes once the order
//! has 20 or more, 5 boxes from 10, otherwise a single box.
//!
//! ## Example
//!
//! ```rust
//! use landed_core::calculations::split::distribute_boxes;
//!
//! let buckets = distribute_boxes(11, 10).unwrap();
//! // one shipment of 2 boxes, nine shipments of 1 box
//! assert_eq!(buckets[0].boxes_per_shipment, 2);
//! assert_eq!(buckets[0].shipments, 1);
//! assert_eq!(buckets[1].boxes_per_shipment, 1);
//! assert_eq!(buckets[1].shipments, 9);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::cost::compute_cost;
use crate::rates::RateTable;
use crate::shipment::ShipmentInput;

/// Upper bound on the number of shipments considered
pub const MAX_SPLIT_COUNT: u64 = 50;

/// Shipments of one size within a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentBucket {
    /// Boxes in each of these shipments
    pub boxes_per_shipment: u64,
    /// Number of shipments of this size
    pub shipments: u64,
}

impl ShipmentBucket {
    pub fn total_boxes(&self) -> u64 {
        self.boxes_per_shipment * self.shipments
    }
}

/// One way of splitting the order, priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitScenario {
    /// Number of separate shipments
    pub split_count: u64,

    /// Shipment sizes; larger shipments first. At most two buckets, whose
    /// sizes differ by exactly one box.
    pub buckets: Vec<ShipmentBucket>,

    /// Landed cost (goods excluded) of one shipment per bucket, same order
    pub cost_per_shipment_krw: Vec<f64>,

    /// Sum of landed costs across all shipments (goods excluded)
    pub total_cost_krw: f64,
}

impl SplitScenario {
    /// Smallest shipment in the split (boxes).
    pub fn min_boxes(&self) -> u64 {
        self.buckets.iter().map(|b| b.boxes_per_shipment).min().unwrap_or(0)
    }

    /// Largest shipment in the split (boxes).
    pub fn max_boxes(&self) -> u64 {
        self.buckets.iter().map(|b| b.boxes_per_shipment).max().unwrap_or(0)
    }

    /// Boxes across all shipments.
    pub fn total_boxes(&self) -> u64 {
        self.buckets.iter().map(ShipmentBucket::total_boxes).sum()
    }
}

/// Ranked split scenarios for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitAnalysis {
    /// Boxes in the whole order
    pub total_boxes: u64,

    /// All priced scenarios, cheapest first
    pub scenarios: Vec<SplitScenario>,

    /// Cost of shipping everything at once
    pub baseline_cost_krw: f64,

    /// Baseline minus the cheapest scenario. Zero when a single shipment is
    /// already the cheapest.
    pub savings_vs_baseline_krw: f64,

    /// True when a single shipment is cheapest: every extra shipment adds
    /// more fixed cost than it saves.
    pub single_shipment_optimal: bool,
}

impl SplitAnalysis {
    /// The cheapest scenario.
    pub fn recommended(&self) -> Option<&SplitScenario> {
        self.scenarios.first()
    }

    /// Scenario for a given split count, if it was priced.
    pub fn scenario(&self, split_count: u64) -> Option<&SplitScenario> {
        self.scenarios.iter().find(|s| s.split_count == split_count)
    }
}

/// Minimum boxes per shipment for an order of `total_boxes`.
pub fn min_shipment_size(total_boxes: u64) -> u64 {
    if total_boxes >= 20 {
        10
    } else if total_boxes >= 10 {
        5
    } else {
        1
    }
}

/// Highest split count considered for an order of `total_boxes`.
pub fn max_split_count(total_boxes: u64) -> u64 {
    let tier_cap = (total_boxes / min_shipment_size(total_boxes)).max(1);
    total_boxes.min(tier_cap).min(MAX_SPLIT_COUNT)
}

/// Spread `total_boxes` over `split_count` shipments as evenly as possible.
///
/// `remainder` shipments carry one extra box. Returns `None` when the split
/// count is zero or exceeds the box count (some shipment would be empty).
pub fn distribute_boxes(total_boxes: u64, split_count: u64) -> Option<Vec<ShipmentBucket>> {
    if split_count == 0 {
        return None;
    }
    let base = total_boxes / split_count;
    if base == 0 {
        return None;
    }
    let remainder = total_boxes % split_count;

    let mut buckets = Vec::with_capacity(2);
    if remainder > 0 {
        buckets.push(ShipmentBucket {
            boxes_per_shipment: base + 1,
            shipments: remainder,
        });
    }
    buckets.push(ShipmentBucket {
        boxes_per_shipment: base,
        shipments: split_count - remainder,
    });
    Some(buckets)
}

/// Price every split of `total_boxes` and rank them.
///
/// Each shipment size is priced once with the cost model on a copy of
/// `input` resized to that many boxes (see
/// [`ShipmentInput::with_box_count`]). Only the landed cost is compared:
/// the goods are bought once whatever the split. FCL inputs reuse the same
/// container cost for every shipment.
///
/// Returns `None` when `total_boxes` is zero or the input cannot be priced
/// at some shipment size.
pub fn optimize_splits(total_boxes: u64, input: &ShipmentInput, rates: &RateTable) -> Option<SplitAnalysis> {
    if total_boxes == 0 {
        return None;
    }

    let max_count = max_split_count(total_boxes);
    let mut scenarios = Vec::with_capacity(max_count as usize);

    for split_count in 1..=max_count {
        let Some(buckets) = distribute_boxes(total_boxes, split_count) else {
            break;
        };

        let mut cost_per_shipment_krw = Vec::with_capacity(buckets.len());
        let mut total_cost_krw = 0.0;
        for bucket in &buckets {
            let resized = input.with_box_count(bucket.boxes_per_shipment)?;
            let cost = compute_cost(&resized, rates)?;
            cost_per_shipment_krw.push(cost.total_landed_cost_krw);
            total_cost_krw += cost.total_landed_cost_krw * bucket.shipments as f64;
        }

        tracing::debug!(split_count, total_cost_krw, "priced split candidate");
        scenarios.push(SplitScenario {
            split_count,
            buckets,
            cost_per_shipment_krw,
            total_cost_krw,
        });
    }

    let baseline_cost_krw = scenarios.first()?.total_cost_krw;
    // Stable: on equal cost the smaller split count stays first.
    scenarios.sort_by(|a, b| a.total_cost_krw.total_cmp(&b.total_cost_krw));

    let best = &scenarios[0];
    let single_shipment_optimal = best.split_count == 1;
    let savings_vs_baseline_krw = baseline_cost_krw - best.total_cost_krw;

    tracing::debug!(
        total_boxes,
        recommended = best.split_count,
        savings_vs_baseline_krw,
        "split analysis complete"
    );

    Some(SplitAnalysis {
        total_boxes,
        scenarios,
        baseline_cost_krw,
        savings_vs_baseline_krw,
        single_shipment_optimal,
    })
}
