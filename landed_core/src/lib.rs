//! # landed_core - Landed Cost and Shipment Planning Engine
//!
//! `landed_core` answers the questions an importer asks before placing an
//! order: what will this shipment cost once freight, tariff, VAT and fees
//! are paid; how many boxes fit in a container; is it cheaper to ship once
//! or several times; and would a slightly larger order lower the unit cost.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions; the same input always gives the same bits
//! - **JSON-First**: All inputs and results implement Serialize/Deserialize
//! - **Explicit rates**: A [`RateTable`] is passed into every call
//! - **No panics**: Incomplete input yields `None`, impossible geometry 0
//!
//! ## Quick Start
//!
//! ```rust
//! use landed_core::{compute_cost, RateTable};
//! use landed_core::shipment::{Commission, QuantityMode, ShipmentInput, ShippingMode};
//!
//! let input = ShipmentInput {
//!     quantity: QuantityMode::ByBox {
//!         box_quantity: 20,
//!         total_product_price_usd: 10_000.0,
//!     },
//!     weight_per_box_kg: 12.0,
//!     shipping: ShippingMode::Lcl,
//!     tariff_rate_percent: 8.0,
//!     commission: Commission::default(),
//!     exchange_rate_krw_per_usd: 1350.0,
//! };
//!
//! let cost = compute_cost(&input, &RateTable::default()).unwrap();
//! let json = serde_json::to_string_pretty(&cost).unwrap();
//! assert!(json.contains("total_landed_cost_krw"));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Cost, packing, pallet, split, efficiency, import, comparison
//! - [`shipment`] - Shipment input
//! - [`dimensions`] - Box, container and pallet geometry and presets
//! - [`rates`] - Rate table
//! - [`settings`] - Persistable settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod dimensions;
pub mod errors;
pub mod rates;
pub mod settings;
pub mod shipment;
pub mod units;

pub use calculations::{
    compare_scenarios, compute_cost, compute_import_price, max_units_in_container, optimize_splits,
    plan_pallet_load, scan_efficiency, CostBreakdown,
};
pub use errors::{CalcError, CalcResult};
pub use rates::RateTable;
pub use settings::Settings;
pub use shipment::ShipmentInput;
