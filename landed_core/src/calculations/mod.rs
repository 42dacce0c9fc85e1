//! # Calculations
//!
//! Every calculation is a plain function over serializable inputs. The
//! pricing functions return `Option`: `None` means the inputs are not yet
//! complete, never that something went wrong. Capacity functions return 0
//! for geometry that cannot fit.
//!
//! ## Available Calculations
//!
//! - [`cost`] - Landed cost of one shipment
//! - [`packing`] - Loose boxes per container
//! - [`pallet`] - Boxes per pallet, pallets per container
//! - [`split`] - One shipment or several?
//! - [`efficiency`] - Would ordering a few more boxes lower the unit cost?
//! - [`import_price`] - CNY purchase price to KRW
//! - [`comparison`] - Saved scenarios compared side by side

pub mod comparison;
pub mod cost;
pub mod efficiency;
pub mod import_price;
pub mod packing;
pub mod pallet;
pub mod split;

pub use comparison::{compare_scenarios, Scenario, ScenarioCalculation, ScenarioComparison, ScenarioSlots};
pub use cost::{compute_cost, CostBreakdown, CostCategory, CostComponent};
pub use efficiency::{scan_efficiency, EfficiencyScan};
pub use import_price::{compute_import_price, ImportPriceBreakdown, ImportPriceInput};
pub use packing::max_units_in_container;
pub use pallet::{
    pallets_in_container, plan_container_load, plan_pallet_load, shipping_capacity, ContainerLoad, PalletLoad,
};
pub use split::{distribute_boxes, optimize_splits, SplitAnalysis, SplitScenario};
