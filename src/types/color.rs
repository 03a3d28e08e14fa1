// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color temperature unit conversions.
//!
//! Bulbs report and accept color temperature in kelvin (after remapping the
//! vendor percentage). Home-automation front ends usually speak mireds.

/// Color temperature assumed when a bulb has not reported one yet.
pub const DEFAULT_KELVIN: u16 = 2000;

/// Converts kelvin to mireds (`floor(1_000_000 / kelvin)`).
///
/// Returns `None` for zero.
///
/// # Examples
///
/// ```
/// use sengled_lib::types::kelvin_to_mired;
///
/// assert_eq!(kelvin_to_mired(2000), Some(500));
/// assert_eq!(kelvin_to_mired(6500), Some(153));
/// assert_eq!(kelvin_to_mired(0), None);
/// ```
#[must_use]
pub fn kelvin_to_mired(kelvin: u16) -> Option<u16> {
    convert(kelvin)
}

/// Converts mireds to kelvin (`floor(1_000_000 / mired)`).
///
/// Returns `None` for zero or when the result does not fit in `u16`.
///
/// # Examples
///
/// ```
/// use sengled_lib::types::mired_to_kelvin;
///
/// assert_eq!(mired_to_kelvin(500), Some(2000));
/// assert_eq!(mired_to_kelvin(153), Some(6535));
/// ```
#[must_use]
pub fn mired_to_kelvin(mired: u16) -> Option<u16> {
    convert(mired)
}

fn convert(value: u16) -> Option<u16> {
    if value == 0 {
        return None;
    }
    u16::try_from(1_000_000 / u32::from(value)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelvin_mired_conversions() {
        assert_eq!(kelvin_to_mired(2700), Some(370));
        assert_eq!(mired_to_kelvin(370), Some(2702));
    }

    #[test]
    fn mired_overflow_is_none() {
        // 1_000_000 / 10 does not fit in u16
        assert_eq!(mired_to_kelvin(10), None);
    }

    #[test]
    fn zero_is_none() {
        assert_eq!(kelvin_to_mired(0), None);
        assert_eq!(mired_to_kelvin(0), None);
    }
}
