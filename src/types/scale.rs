// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Linear value remapping.
//!
//! The Sengled cloud reports several fields as percentages or small
//! integer scales. [`rescale`] maps them onto the units used by the
//! rest of the library (kelvin, dBm) and back.

/// Linearly maps `value` from `[from_min, from_max]` onto `[to_min, to_max]`.
///
/// Values outside the source range are extrapolated, not clamped.
///
/// # Examples
///
/// ```
/// use sengled_lib::types::rescale;
///
/// // Color temperature percentage to kelvin
/// assert_eq!(rescale(50.0, 0.0, 100.0, 2000.0, 6500.0), 4250.0);
///
/// // Signal bars to dBm
/// assert_eq!(rescale(5.0, 0.0, 5.0, -100.0, -30.0), -30.0);
/// ```
#[must_use]
pub fn rescale(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    let from_span = from_max - from_min;
    let to_span = to_max - to_min;

    let scaled = (value - from_min) / from_span;
    to_min + scaled * to_span
}

/// Rounds to the nearest integer, ties to even.
///
/// The cloud integration has always rounded this way, so `2.5` becomes `2`
/// and `3.5` becomes `4`.
///
/// # Examples
///
/// ```
/// use sengled_lib::types::round_half_even;
///
/// assert_eq!(round_half_even(2.5), 2);
/// assert_eq!(round_half_even(3.5), 4);
/// assert_eq!(round_half_even(-64.0), -64);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}
