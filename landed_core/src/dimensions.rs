//! # Dimensions and Presets
//!
//! Box, container and pallet geometry in millimeters, plus the standard
//! container and pallet presets offered to the user.
//!
//! ## Example
//!
//! ```rust
//! use landed_core::dimensions::{BoxDimensions, ContainerType, PalletType};
//!
//! let container = ContainerType::Ft20.dimensions();
//! assert_eq!(container.length, 5898.0);
//!
//! let pallet = PalletType::P1100x1100.spec();
//! assert_eq!(pallet.height_of_pallet_itself, 150.0);
//!
//! let carton = BoxDimensions::new(500.0, 400.0, 300.0);
//! assert!(carton.is_valid());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Outer dimensions of one shipping box (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxDimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        BoxDimensions { length, width, height }
    }

    /// All three sides finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.length, self.width, self.height]
            .iter()
            .all(|d| d.is_finite() && *d > 0.0)
    }
}

/// Inner dimensions of a container, or the outer dimensions of a loaded
/// pallet when pallets are placed into a container (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerDimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        ContainerDimensions { length, width, height }
    }
}

/// Standard ocean container sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    #[serde(rename = "20ft")]
    Ft20,
    #[serde(rename = "40ft")]
    Ft40,
}

impl ContainerType {
    pub const ALL: [ContainerType; 2] = [ContainerType::Ft20, ContainerType::Ft40];

    /// Inner dimensions (mm)
    pub fn dimensions(&self) -> ContainerDimensions {
        match self {
            ContainerType::Ft20 => ContainerDimensions::new(5898.0, 2352.0, 2393.0),
            ContainerType::Ft40 => ContainerDimensions::new(12032.0, 2352.0, 2393.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContainerType::Ft20 => "20ft",
            ContainerType::Ft40 => "40ft",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContainerType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "20ft" | "20" => Ok(ContainerType::Ft20),
            "40ft" | "40" => Ok(ContainerType::Ft40),
            other => Err(CalcError::unknown_preset(other)),
        }
    }
}

/// Pallet geometry (mm).
///
/// When `footprint_only` is set the pallet constrains the floor footprint
/// but its deck height is not deducted from, or added to, the stack height
/// (slip sheets, for example).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PalletSpec {
    pub length: f64,
    pub width: f64,
    pub height_of_pallet_itself: f64,
    #[serde(default)]
    pub footprint_only: bool,
}

impl PalletSpec {
    pub fn new(length: f64, width: f64, height_of_pallet_itself: f64) -> Self {
        PalletSpec {
            length,
            width,
            height_of_pallet_itself,
            footprint_only: false,
        }
    }

    /// Height the pallet itself adds to a loaded stack.
    pub fn deck_height(&self) -> f64 {
        if self.footprint_only {
            0.0
        } else {
            self.height_of_pallet_itself
        }
    }
}

/// Standard pallet sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PalletType {
    #[serde(rename = "1100x1100")]
    P1100x1100,
    #[serde(rename = "1000x1200")]
    P1000x1200,
    #[serde(rename = "800x1200")]
    P800x1200,
    #[serde(rename = "1140x1140")]
    P1140x1140,
}

/// Deck height shared by all standard pallet presets (mm)
pub const STANDARD_PALLET_HEIGHT_MM: f64 = 150.0;

impl PalletType {
    pub const ALL: [PalletType; 4] = [
        PalletType::P1100x1100,
        PalletType::P1000x1200,
        PalletType::P800x1200,
        PalletType::P1140x1140,
    ];

    pub fn spec(&self) -> PalletSpec {
        let (length, width) = match self {
            PalletType::P1100x1100 => (1100.0, 1100.0),
            PalletType::P1000x1200 => (1000.0, 1200.0),
            PalletType::P800x1200 => (800.0, 1200.0),
            PalletType::P1140x1140 => (1140.0, 1140.0),
        };
        PalletSpec::new(length, width, STANDARD_PALLET_HEIGHT_MM)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PalletType::P1100x1100 => "1100x1100",
            PalletType::P1000x1200 => "1000x1200",
            PalletType::P800x1200 => "800x1200",
            PalletType::P1140x1140 => "1140x1140",
        }
    }
}

impl fmt::Display for PalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PalletType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PalletType::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| CalcError::unknown_preset(s.trim()))
    }
}
