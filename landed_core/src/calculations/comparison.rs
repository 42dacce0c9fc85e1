//! # Scenario Comparison
//!
//! Saved calculations that can be priced and compared side by side. A
//! scenario is either a customs shipment (compared on its landed cost) or an
//! import purchase (compared on its final import cost).
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "id": "6f1c...",
//!   "created_at": "2025-01-01T00:00:00Z",
//!   "label": "LCL, 20 boxes",
//!   "calculation": {
//!     "type": "Import",
//!     "product_cost_cny": 10.0,
//!     "usd_per_cny": 0.14,
//!     "exchange_rate_krw_per_usd": 1350.0
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::cost::compute_cost;
use crate::calculations::import_price::{compute_import_price, ImportPriceInput};
use crate::rates::RateTable;
use crate::shipment::ShipmentInput;

/// Calculation held by a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScenarioCalculation {
    /// Landed cost of a shipment
    Customs(ShipmentInput),
    /// Purchase price of imported goods
    Import(ImportPriceInput),
}

impl ScenarioCalculation {
    pub fn calc_type(&self) -> &'static str {
        match self {
            ScenarioCalculation::Customs(_) => "Customs",
            ScenarioCalculation::Import(_) => "Import",
        }
    }

    /// The figure scenarios are compared on (KRW).
    ///
    /// Customs scenarios use the landed cost (goods excluded), import
    /// scenarios the final import cost. `None` when the inputs are
    /// incomplete.
    pub fn cost_krw(&self, rates: &RateTable) -> Option<f64> {
        match self {
            ScenarioCalculation::Customs(input) => compute_cost(input, rates).map(|c| c.total_landed_cost_krw),
            ScenarioCalculation::Import(input) => compute_import_price(input).map(|p| p.final_import_cost_krw),
        }
    }
}

/// A saved calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub label: String,
    pub calculation: ScenarioCalculation,
}

impl Scenario {
    pub fn new(label: impl Into<String>, calculation: ScenarioCalculation) -> Self {
        Scenario {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            label: label.into(),
            calculation,
        }
    }

    /// Label with the shipping mode appended for customs scenarios
    /// ("Supplier A (LCL)").
    pub fn display_name(&self) -> String {
        match &self.calculation {
            ScenarioCalculation::Customs(input) => format!("{} ({})", self.label, input.shipping.name()),
            ScenarioCalculation::Import(_) => self.label.clone(),
        }
    }
}

/// Which of the two compared scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioSide {
    First,
    Second,
}

/// Outcome of a two-way comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum ComparisonOutcome {
    /// Both cost exactly the same
    Tie,
    Cheaper {
        side: ScenarioSide,
        difference_krw: f64,
    },
}

/// Priced side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCost {
    pub id: Uuid,
    pub name: String,
    pub calc_type: String,
    pub cost_krw: f64,
}

impl ScenarioCost {
    fn price(scenario: &Scenario, rates: &RateTable) -> Option<Self> {
        Some(ScenarioCost {
            id: scenario.id,
            name: scenario.display_name(),
            calc_type: scenario.calculation.calc_type().to_string(),
            cost_krw: scenario.calculation.cost_krw(rates)?,
        })
    }
}

/// Result of comparing two scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub first: ScenarioCost,
    pub second: ScenarioCost,
    pub outcome: ComparisonOutcome,
}

impl ScenarioComparison {
    /// The cheaper scenario, `None` on a tie.
    pub fn cheaper(&self) -> Option<&ScenarioCost> {
        match self.outcome {
            ComparisonOutcome::Tie => None,
            ComparisonOutcome::Cheaper {
                side: ScenarioSide::First,
                ..
            } => Some(&self.first),
            ComparisonOutcome::Cheaper {
                side: ScenarioSide::Second,
                ..
            } => Some(&self.second),
        }
    }
}

/// Price both scenarios and report the cheaper one.
///
/// Scenarios of different kinds may be compared; each contributes the
/// figure described in [`ScenarioCalculation::cost_krw`]. `None` when either
/// cannot be priced.
pub fn compare_scenarios(first: &Scenario, second: &Scenario, rates: &RateTable) -> Option<ScenarioComparison> {
    let first = ScenarioCost::price(first, rates)?;
    let second = ScenarioCost::price(second, rates)?;

    let outcome = if first.cost_krw == second.cost_krw {
        ComparisonOutcome::Tie
    } else {
        let side = if first.cost_krw < second.cost_krw {
            ScenarioSide::First
        } else {
            ScenarioSide::Second
        };
        ComparisonOutcome::Cheaper {
            side,
            difference_krw: (first.cost_krw - second.cost_krw).abs(),
        }
    };

    Some(ScenarioComparison { first, second, outcome })
}

/// Holds up to two scenarios for comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSlots {
    scenarios: Vec<Scenario>,
}

impl ScenarioSlots {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Save a scenario. When both slots are taken the second is replaced.
    ///
    /// Returns the id of the saved scenario.
    pub fn push(&mut self, scenario: Scenario) -> Uuid {
        let id = scenario.id;
        if self.scenarios.len() < Self::CAPACITY {
            self.scenarios.push(scenario);
        } else {
            self.scenarios[Self::CAPACITY - 1] = scenario;
        }
        id
    }

    pub fn clear(&mut self) {
        self.scenarios.clear();
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Compare the two saved scenarios; `None` until both slots are filled
    /// or when either cannot be priced.
    pub fn compare(&self, rates: &RateTable) -> Option<ScenarioComparison> {
        match self.scenarios.as_slice() {
            [first, second] => compare_scenarios(first, second, rates),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::{Commission, QuantityMode, ShippingMode};

    fn customs(shipping: ShippingMode) -> ScenarioCalculation {
        ScenarioCalculation::Customs(ShipmentInput {
            quantity: QuantityMode::ByBox {
                box_quantity: 20,
                total_product_price_usd: 10_000.0,
            },
            weight_per_box_kg: 12.0,
            shipping,
            tariff_rate_percent: 8.0,
            commission: Commission::default(),
            exchange_rate_krw_per_usd: 1350.0,
        })
    }

    fn import(product_cost_cny: f64) -> ScenarioCalculation {
        ScenarioCalculation::Import(ImportPriceInput {
            product_cost_cny,
            packaging_cny: 0.31,
            label_cny: 0.03,
            commission_rate: 0.035,
            customs_fee_rate: 0.22,
            usd_per_cny: 0.14,
            exchange_rate_krw_per_usd: 1350.0,
        })
    }

    #[test]
    fn test_lcl_cheaper_than_fcl() {
        let rates = RateTable::default();
        let lcl = Scenario::new("Consolidated", customs(ShippingMode::Lcl));
        let fcl = Scenario::new(
            "Own container",
            customs(ShippingMode::Fcl {
                container_cost_krw: 2_500_000.0,
            }),
        );

        let comparison = compare_scenarios(&fcl, &lcl, &rates).unwrap();
        let ComparisonOutcome::Cheaper { side, difference_krw } = comparison.outcome else {
            panic!("expected a cheaper side");
        };
        assert_eq!(side, ScenarioSide::Second);
        assert_eq!(difference_krw, comparison.first.cost_krw - comparison.second.cost_krw);
        assert_eq!(comparison.cheaper().unwrap().name, "Consolidated (LCL)");
    }

    #[test]
    fn test_identical_scenarios_tie() {
        let rates = RateTable::default();
        let a = Scenario::new("A", import(10.0));
        let b = Scenario::new("B", import(10.0));
        let comparison = compare_scenarios(&a, &b, &rates).unwrap();
        assert_eq!(comparison.outcome, ComparisonOutcome::Tie);
        assert!(comparison.cheaper().is_none());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_mixed_kinds() {
        let rates = RateTable::default();
        let a = Scenario::new("Import", import(10.0));
        let b = Scenario::new("Customs", customs(ShippingMode::Lcl));
        let comparison = compare_scenarios(&a, &b, &rates).unwrap();
        assert_eq!(comparison.first.calc_type, "Import");
        assert_eq!(comparison.second.calc_type, "Customs");
        // A single unit is far cheaper than a whole shipment's landed cost
        assert_eq!(comparison.cheaper().unwrap().id, a.id);
    }

    #[test]
    fn test_unpriceable_scenario() {
        let a = Scenario::new("A", import(0.0));
        let b = Scenario::new("B", import(10.0));
        assert!(compare_scenarios(&a, &b, &RateTable::default()).is_none());
    }

    #[test]
    fn test_slots_replace_second() {
        let mut slots = ScenarioSlots::new();
        let first = slots.push(Scenario::new("1", import(10.0)));
        slots.push(Scenario::new("2", import(11.0)));
        let third = slots.push(Scenario::new("3", import(12.0)));

        assert_eq!(slots.len(), 2);
        assert_eq!(slots.scenarios()[0].id, first);
        assert_eq!(slots.scenarios()[1].id, third);

        slots.clear();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_slots_compare_needs_two() {
        let rates = RateTable::default();
        let mut slots = ScenarioSlots::new();
        slots.push(Scenario::new("1", import(10.0)));
        assert!(slots.compare(&rates).is_none());
        slots.push(Scenario::new("2", import(12.0)));
        let comparison = slots.compare(&rates).unwrap();
        assert_eq!(comparison.cheaper().unwrap().name, "1");
    }

    #[test]
    fn test_scenario_json_tagged() {
        let scenario = Scenario::new("Import", import(10.0));
        let json = serde_json::to_string(&scenario).unwrap();
        assert!(json.contains("\"type\":\"Import\""));
        let roundtrip: Scenario = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, scenario);
    }
}
