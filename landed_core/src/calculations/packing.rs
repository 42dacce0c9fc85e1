//! # Loose Container Loading
//!
//! Estimates how many identical boxes fit into a container when loaded
//! loose (no pallets).
//!
//! ## Method
//!
//! Each of the six ways of assigning the box's sides to the container's
//! length, width and height axes is tried as a uniform grid:
//! `floor(L/l) × floor(W/w) × floor(H/h)`. The best grid wins. Mixed
//! orientations inside one container are not considered, so the result is a
//! conservative lower bound on what a real loader achieves.

use crate::dimensions::{BoxDimensions, ContainerDimensions};

/// Whole boxes of side `part` that fit along `whole`.
pub(crate) fn fit(whole: f64, part: f64) -> u64 {
    (whole / part).floor() as u64
}

/// The six assignments of a box's sides to the (length, width, height) axes.
fn orientations(b: &BoxDimensions) -> [(f64, f64, f64); 6] {
    let (l, w, h) = (b.length, b.width, b.height);
    [
        (l, w, h),
        (l, h, w),
        (w, l, h),
        (w, h, l),
        (h, l, w),
        (h, w, l),
    ]
}

/// Maximum number of boxes in a container using a single orientation.
///
/// Returns 0 when the box has a non-positive side or fits in no orientation.
/// Counts too large for `u64` saturate at `u64::MAX`.
///
/// # Example
///
/// ```rust
/// use landed_core::calculations::packing::max_units_in_container;
/// use landed_core::dimensions::{BoxDimensions, ContainerType};
///
/// let ft20 = ContainerType::Ft20.dimensions();
/// let carton = BoxDimensions::new(500.0, 400.0, 300.0);
/// assert_eq!(max_units_in_container(&ft20, &carton), 392);
/// ```
pub fn max_units_in_container(container: &ContainerDimensions, box_dims: &BoxDimensions) -> u64 {
    if !box_dims.is_valid() {
        return 0;
    }

    orientations(box_dims)
        .into_iter()
        .filter(|&(l, w, h)| l <= container.length && w <= container.width && h <= container.height)
        .map(|(l, w, h)| {
            fit(container.length, l)
                .saturating_mul(fit(container.width, w))
                .saturating_mul(fit(container.height, h))
        })
        .max()
        .unwrap_or(0)
}
