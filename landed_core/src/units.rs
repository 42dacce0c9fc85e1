//! # Unit Types
//!
//! Lightweight newtype wrappers for the money, mass and volume quantities the
//! cost model moves between. They keep KRW and USD amounts from being mixed
//! up while serializing as plain numbers.
//!
//! ## Currencies
//!
//! - KRW: Korean won, the settlement currency for fees, freight and taxes
//! - USD: the invoice currency of the goods; tariff and VAT are computed here
//! - CNY: purchase currency in the import price model
//!
//! Conversions take the rate explicitly. Rates are never stored globally.
//!
//! ## Example
//!
//! ```rust
//! use landed_core::units::{Krw, Usd};
//!
//! let freight = Krw(110_000.0);
//! let freight_usd: Usd = freight.to_usd(1350.0);
//! let back: Krw = freight_usd.to_krw(1350.0);
//! assert!((back.0 - 110_000.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Currency Units
// ============================================================================

/// Amount in Korean won
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Krw(pub f64);

/// Amount in US dollars
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usd(pub f64);

/// Amount in Chinese yuan
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cny(pub f64);

impl Krw {
    /// Convert to USD at `krw_per_usd`.
    pub fn to_usd(self, krw_per_usd: f64) -> Usd {
        Usd(self.0 / krw_per_usd)
    }
}

impl Usd {
    /// Convert to KRW at `krw_per_usd`.
    pub fn to_krw(self, krw_per_usd: f64) -> Krw {
        Krw(self.0 * krw_per_usd)
    }

    /// Apply a percentage (8.0 means 8 %).
    pub fn percent(self, percent: f64) -> Usd {
        Usd(self.0 * (percent / 100.0))
    }
}

impl Cny {
    /// Convert to USD at `usd_per_cny`.
    pub fn to_usd(self, usd_per_cny: f64) -> Usd {
        Usd(self.0 * usd_per_cny)
    }
}

// ============================================================================
// Mass and Volume
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cbm(pub f64);

impl Kilograms {
    /// Weight-equivalent volume: `kg / divisor` where the divisor is the
    /// number of kilograms billed as one CBM.
    pub fn to_cbm(self, kg_per_cbm: f64) -> Cbm {
        Cbm(self.0 / kg_per_cbm)
    }
}

impl Cbm {
    /// Chargeable volume with a contractual minimum applied.
    pub fn at_least(self, minimum: Cbm) -> Cbm {
        Cbm(self.0.max(minimum.0))
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Krw);
impl_arithmetic!(Usd);
impl_arithmetic!(Cny);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Cbm);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_krw_usd_conversion() {
        let usd = Krw(135_000.0).to_usd(1350.0);
        assert_eq!(usd.0, 100.0);
        assert_eq!(usd.to_krw(1350.0).0, 135_000.0);
    }

    #[test]
    fn test_percent() {
        assert_eq!(Usd(200.0).percent(10.0).0, 20.0);
    }

    #[test]
    fn test_cbm_floor() {
        let raw = Kilograms(240.0).to_cbm(250.0);
        assert!((raw.0 - 0.96).abs() < 1e-12);
        assert_eq!(raw.at_least(Cbm(1.0)).0, 1.0);
        assert_eq!(Cbm(1.5).at_least(Cbm(1.0)).0, 1.5);
    }

    #[test]
    fn test_arithmetic() {
        let a = Krw(10.0);
        let b = Krw(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let krw = Krw(88_000.0);
        let json = serde_json::to_string(&krw).unwrap();
        assert_eq!(json, "88000.0");
        let roundtrip: Krw = serde_json::from_str(&json).unwrap();
        assert_eq!(krw, roundtrip);
    }
}
