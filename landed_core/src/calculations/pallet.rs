//! # Pallet Loading
//!
//! Layered loading of boxes onto a pallet, then loaded pallets into a
//! container.
//!
//! ## Method
//!
//! Pallet stacks keep every layer identical. Each box side is tried as the
//! vertical axis (3 choices); the other two sides form the footprint, which
//! may be rotated 90° on the deck. Layers are stacked up to the usable
//! height. Loaded pallets are then placed on the container floor in one of
//! two rotations and never stacked on each other.
//!
//! ## Example
//!
//! ```rust
//! use landed_core::calculations::pallet::plan_container_load;
//! use landed_core::dimensions::{BoxDimensions, ContainerType, PalletType};
//!
//! let ft20 = ContainerType::Ft20.dimensions();
//! let carton = BoxDimensions::new(500.0, 400.0, 300.0);
//! let pallet = PalletType::P1100x1100.spec();
//!
//! let load = plan_container_load(&ft20, &carton, Some(&pallet));
//! let palletized = load.palletized.unwrap();
//! assert_eq!(palletized.units_in_container, palletized.pallets_in_container * palletized.units_per_pallet);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::packing::{fit, max_units_in_container};
use crate::dimensions::{BoxDimensions, ContainerDimensions, ContainerType, PalletSpec};

/// Best layered load for one pallet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PalletLoad {
    /// Boxes on one pallet
    pub units_per_pallet: u64,
    /// Height of the box stack above the deck (mm)
    pub stack_height_used: f64,
}

/// Plan the box stack on one pallet.
///
/// # Arguments
///
/// * `pallet` - pallet footprint (length × width)
/// * `box_dims` - box outer dimensions
/// * `usable_height` - vertical space available for boxes above the deck (mm)
///
/// Returns an empty load when the box is invalid, the usable height is not
/// positive, or no orientation fits.
pub fn plan_pallet_load(pallet: &PalletSpec, box_dims: &BoxDimensions, usable_height: f64) -> PalletLoad {
    if !box_dims.is_valid() || !(usable_height > 0.0) {
        return PalletLoad::default();
    }

    let (bl, bw, bh) = (box_dims.length, box_dims.width, box_dims.height);
    // (footprint a, footprint b, vertical)
    let candidates = [(bl, bw, bh), (bl, bh, bw), (bw, bh, bl)];

    let mut best = PalletLoad::default();
    for (a, b, h) in candidates {
        if h > usable_height {
            continue;
        }
        let layers = fit(usable_height, h);
        let per_layer = fit(pallet.length, a)
            .saturating_mul(fit(pallet.width, b))
            .max(fit(pallet.length, b).saturating_mul(fit(pallet.width, a)));
        let units = layers.saturating_mul(per_layer);
        if units > best.units_per_pallet {
            best = PalletLoad {
                units_per_pallet: units,
                stack_height_used: layers as f64 * h,
            };
        }
    }
    best
}

/// Loaded pallets that fit on the container floor.
///
/// `loaded_pallet` is the outer size of one pallet with its stack. Returns 0
/// when it is taller than the container or has a non-positive footprint.
pub fn pallets_in_container(container: &ContainerDimensions, loaded_pallet: &ContainerDimensions) -> u64 {
    if loaded_pallet.height > container.height
        || !(loaded_pallet.length > 0.0)
        || !(loaded_pallet.width > 0.0)
    {
        return 0;
    }
    let straight = fit(container.length, loaded_pallet.length)
        .saturating_mul(fit(container.width, loaded_pallet.width));
    let rotated = fit(container.length, loaded_pallet.width)
        .saturating_mul(fit(container.width, loaded_pallet.length));
    straight.max(rotated)
}

/// Palletized loading of one container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PalletizedLoad {
    /// Boxes on one pallet
    pub units_per_pallet: u64,
    /// Box stack height above the deck (mm)
    pub stack_height_used: f64,
    /// Deck + stack (mm)
    pub loaded_pallet_height: f64,
    /// Pallets on the container floor
    pub pallets_in_container: u64,
    /// pallets × boxes per pallet
    pub units_in_container: u64,
}

/// Capacity of one container for one box size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerLoad {
    /// Boxes when loaded loose
    pub loose_units: u64,
    /// Palletized result, when a pallet was specified
    pub palletized: Option<PalletizedLoad>,
}

impl ContainerLoad {
    /// Boxes shipped with the chosen loading method.
    pub fn units(&self) -> u64 {
        match &self.palletized {
            Some(p) => p.units_in_container,
            None => self.loose_units,
        }
    }
}

/// Loose and (optionally) palletized capacity of one container.
///
/// With a pallet, boxes are stacked up to the container height minus the
/// pallet deck. When that leaves no room, or nothing fits on the pallet,
/// the palletized counts are all zero.
pub fn plan_container_load(
    container: &ContainerDimensions,
    box_dims: &BoxDimensions,
    pallet: Option<&PalletSpec>,
) -> ContainerLoad {
    let loose_units = max_units_in_container(container, box_dims);

    let palletized = pallet.map(|pallet| {
        let empty = PalletizedLoad {
            units_per_pallet: 0,
            stack_height_used: 0.0,
            loaded_pallet_height: 0.0,
            pallets_in_container: 0,
            units_in_container: 0,
        };

        let usable_height = container.height - pallet.deck_height();
        if usable_height <= 0.0 {
            return empty;
        }
        let load = plan_pallet_load(pallet, box_dims, usable_height);
        if load.units_per_pallet == 0 {
            return empty;
        }

        let loaded_pallet_height = pallet.deck_height() + load.stack_height_used;
        let loaded = ContainerDimensions::new(pallet.length, pallet.width, loaded_pallet_height);
        let pallets = pallets_in_container(container, &loaded);
        PalletizedLoad {
            units_per_pallet: load.units_per_pallet,
            stack_height_used: load.stack_height_used,
            loaded_pallet_height,
            pallets_in_container: pallets,
            units_in_container: pallets.saturating_mul(load.units_per_pallet),
        }
    });

    ContainerLoad {
        loose_units,
        palletized,
    }
}

/// Capacity of one container preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerCapacity {
    pub container: ContainerType,
    pub load: ContainerLoad,
}

/// Capacity in every standard container.
///
/// `None` when the box dimensions are incomplete.
pub fn shipping_capacity(box_dims: &BoxDimensions, pallet: Option<&PalletSpec>) -> Option<Vec<ContainerCapacity>> {
    if !box_dims.is_valid() {
        return None;
    }
    Some(
        ContainerType::ALL
            .into_iter()
            .map(|container| ContainerCapacity {
                container,
                load: plan_container_load(&container.dimensions(), box_dims, pallet),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::PalletType;

    fn carton() -> BoxDimensions {
        BoxDimensions::new(500.0, 400.0, 300.0)
    }

    #[test]
    fn test_pallet_load_1100() {
        let pallet = PalletType::P1100x1100.spec();
        // usable 2393 - 150 = 2243
        let load = plan_pallet_load(&pallet, &carton(), 2243.0);
        // vertical 300: 7 layers; footprint 500x400 -> max(2*2, 2*2) = 4 -> 28
        // vertical 400: 5 layers; footprint 500x300 -> max(2*3, 3*2) = 6 -> 30
        // vertical 500: 4 layers; footprint 400x300 -> max(2*3, 3*2) = 6 -> 24
        assert_eq!(load.units_per_pallet, 30);
        assert_eq!(load.stack_height_used, 2000.0);
    }

    #[test]
    fn test_pallet_load_too_short() {
        let pallet = PalletType::P1100x1100.spec();
        let load = plan_pallet_load(&pallet, &carton(), 200.0);
        assert_eq!(load, PalletLoad::default());
    }

    #[test]
    fn test_pallet_load_invalid_inputs() {
        let pallet = PalletType::P1100x1100.spec();
        assert_eq!(plan_pallet_load(&pallet, &BoxDimensions::new(0.0, 1.0, 1.0), 1000.0).units_per_pallet, 0);
        assert_eq!(plan_pallet_load(&pallet, &carton(), 0.0).units_per_pallet, 0);
        assert_eq!(plan_pallet_load(&pallet, &carton(), f64::NAN).units_per_pallet, 0);
    }

    #[test]
    fn test_pallets_in_container_rotation() {
        let ft20 = ContainerType::Ft20.dimensions();
        let loaded = ContainerDimensions::new(1000.0, 1200.0, 2150.0);
        // straight: 5 x 1 = 5; rotated: 4 x 2 = 8
        assert_eq!(pallets_in_container(&ft20, &loaded), 8);
    }

    #[test]
    fn test_pallets_too_tall() {
        let ft20 = ContainerType::Ft20.dimensions();
        let loaded = ContainerDimensions::new(1100.0, 1100.0, 2400.0);
        assert_eq!(pallets_in_container(&ft20, &loaded), 0);
    }

    #[test]
    fn test_container_load_with_pallet() {
        let ft20 = ContainerType::Ft20.dimensions();
        let pallet = PalletType::P1100x1100.spec();
        let load = plan_container_load(&ft20, &carton(), Some(&pallet));
        let p = load.palletized.unwrap();
        assert_eq!(p.units_per_pallet, 30);
        assert_eq!(p.loaded_pallet_height, 2150.0);
        // 5898/1100 = 5, 2352/1100 = 2
        assert_eq!(p.pallets_in_container, 10);
        assert_eq!(p.units_in_container, 300);
        assert_eq!(load.units(), 300);
        assert_eq!(load.loose_units, 392);
    }

    #[test]
    fn test_container_load_loose_only() {
        let ft40 = ContainerType::Ft40.dimensions();
        let load = plan_container_load(&ft40, &carton(), None);
        assert!(load.palletized.is_none());
        assert_eq!(load.units(), load.loose_units);
    }

    #[test]
    fn test_footprint_only_pallet_uses_full_height() {
        let ft20 = ContainerType::Ft20.dimensions();
        let mut pallet = PalletType::P1100x1100.spec();
        pallet.footprint_only = true;
        let p = plan_container_load(&ft20, &carton(), Some(&pallet)).palletized.unwrap();
        // usable 2393: vertical 300 -> 7 layers x 4 = 28; vertical 400 -> 5 x 6 = 30;
        // vertical 500 -> 4 x 6 = 24
        assert_eq!(p.units_per_pallet, 30);
        assert_eq!(p.loaded_pallet_height, 2000.0);
    }

    #[test]
    fn test_pallet_taller_than_container() {
        let container = ContainerDimensions::new(5000.0, 2000.0, 100.0);
        let pallet = PalletType::P800x1200.spec();
        let p = plan_container_load(&container, &carton(), Some(&pallet)).palletized.unwrap();
        assert_eq!(p.units_in_container, 0);
        assert_eq!(p.pallets_in_container, 0);
    }

    #[test]
    fn test_tiny_box_saturates_counts() {
        let ft20 = ContainerType::Ft20.dimensions();
        let pallet = PalletType::P1100x1100.spec();
        let speck = BoxDimensions::new(0.0001, 0.0001, 0.0001);

        assert_eq!(plan_pallet_load(&pallet, &speck, 2243.0).units_per_pallet, u64::MAX);
        let load = plan_container_load(&ft20, &speck, Some(&pallet));
        assert_eq!(load.loose_units, u64::MAX);
        assert_eq!(load.palletized.unwrap().units_per_pallet, u64::MAX);

        let sliver = ContainerDimensions::new(1e-9, 1e-9, 1.0);
        assert_eq!(pallets_in_container(&ft20, &sliver), u64::MAX);
    }

    #[test]
    fn test_shipping_capacity_both_presets() {
        let capacity = shipping_capacity(&carton(), None).unwrap();
        assert_eq!(capacity.len(), 2);
        assert_eq!(capacity[0].container, ContainerType::Ft20);
        assert!(capacity[1].load.loose_units > capacity[0].load.loose_units);
        assert!(shipping_capacity(&BoxDimensions::new(0.0, 0.0, 0.0), None).is_none());
    }
}
