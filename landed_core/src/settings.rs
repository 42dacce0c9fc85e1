//! # Settings
//!
//! `Settings` is the root configuration object: the shared [`RateTable`] plus
//! the selectable options offered by the import price calculator. It is
//! serialized as JSON by the CLI settings store; the engine only ever sees
//! the pieces passed into each call.
//!
//! ## Structure
//!
//! ```text
//! Settings
//! ├── version: schema version (for migration compatibility)
//! ├── modified: last change timestamp
//! ├── rates: RateTable (fees, freight, VAT)
//! └── import: ImportOptions (commission, customs fee, packaging, label)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use landed_core::settings::Settings;
//!
//! let settings = Settings::default();
//! assert_eq!(settings.rates.docs_fee_krw, 88_000.0);
//!
//! let json = serde_json::to_string_pretty(&settings).unwrap();
//! assert!(json.contains("commission_rates"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::rates::RateTable;

/// Current schema version for settings files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root settings container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Schema version
    pub version: String,

    /// When the settings were last changed
    pub modified: DateTime<Utc>,

    /// Per-shipment fees and rates
    pub rates: RateTable,

    /// Options for the import price calculator
    pub import: ImportOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: SCHEMA_VERSION.to_string(),
            modified: Utc::now(),
            rates: RateTable::default(),
            import: ImportOptions::default(),
        }
    }
}

impl Settings {
    /// Replace the rate table and mark the settings as modified.
    pub fn update_rates(&mut self, rates: RateTable) -> CalcResult<()> {
        rates.validate()?;
        self.rates = rates;
        self.touch();
        Ok(())
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Validate rates and every option list.
    pub fn validate(&self) -> CalcResult<()> {
        self.rates.validate()?;
        self.import.validate()
    }
}

/// A labelled choice shown to the user (e.g. "3.5%" → 0.035).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateOption {
    pub label: String,
    pub value: f64,
}

impl RateOption {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        RateOption {
            label: label.into(),
            value,
        }
    }
}

/// Selectable options for the import price calculator.
///
/// Commission and customs fee values are fractions (0.035 = 3.5 %);
/// packaging and label values are CNY per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub commission_rates: Vec<RateOption>,
    pub customs_fee_rates: Vec<RateOption>,
    pub packaging_options: Vec<RateOption>,
    pub label_options: Vec<RateOption>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            commission_rates: vec![RateOption::new("3.5%", 0.035), RateOption::new("0%", 0.0)],
            customs_fee_rates: vec![RateOption::new("22%", 0.22), RateOption::new("29%", 0.29)],
            packaging_options: vec![
                RateOption::new("Standard bag", 0.31),
                RateOption::new("Outer bag", 0.46),
                RateOption::new("None", 0.0),
            ],
            label_options: vec![RateOption::new("Label", 0.03), RateOption::new("None", 0.0)],
        }
    }
}

impl ImportOptions {
    /// First (default) value of an option list, or 0 when the list is empty.
    pub fn first_value(options: &[RateOption]) -> f64 {
        options.first().map(|o| o.value).unwrap_or(0.0)
    }

    fn validate(&self) -> CalcResult<()> {
        let lists = [
            ("commission_rates", &self.commission_rates),
            ("customs_fee_rates", &self.customs_fee_rates),
            ("packaging_options", &self.packaging_options),
            ("label_options", &self.label_options),
        ];
        for (field, list) in lists {
            if let Some(bad) = list.iter().find(|o| !o.value.is_finite() || o.value < 0.0) {
                return Err(CalcError::invalid_input(
                    format!("{}.{}", field, bad.label),
                    bad.value.to_string(),
                    "Option values must be non-negative",
                ));
            }
        }
        Ok(())
    }
}
