// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with the two string encodings used around Sengled bulbs.
//!
//! Front ends hand colors over as an `"R,G,B"` triple (sometimes rendered as
//! a tuple, `"(255, 128, 0)"`). Wi-Fi bulbs expect and report the vendor
//! `"R:G:B"` format. Zigbee bulbs take the three components as separate
//! integers.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use sengled_lib::types::RgbColor;
///
/// let color: RgbColor = "(255, 128, 0)".parse().unwrap();
/// assert_eq!(color, RgbColor::new(255, 128, 0));
/// assert_eq!(color.to_vendor_string(), "255:128:0");
///
/// let reported = RgbColor::from_vendor("0:255:64").unwrap();
/// assert_eq!(reported.green(), 255);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a white color.
    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Parses an `"R,G,B"` triple. Spaces and surrounding parentheses are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColor` unless the string holds exactly
    /// three comma-separated integers in 0-255.
    pub fn from_triple(triple: &str) -> Result<Self, ValueError> {
        parse_components(triple, ',')
    }

    /// Parses the vendor `"R:G:B"` format.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColor` unless the string holds exactly
    /// three colon-separated integers in 0-255.
    pub fn from_vendor(vendor: &str) -> Result<Self, ValueError> {
        parse_components(vendor, ':')
    }

    /// Renders the vendor `"R:G:B"` format.
    #[must_use]
    pub fn to_vendor_string(&self) -> String {
        format!("{}:{}:{}", self.red, self.green, self.blue)
    }

    /// Renders the `"R,G,B"` triple format.
    #[must_use]
    pub fn to_triple_string(&self) -> String {
        format!("{},{},{}", self.red, self.green, self.blue)
    }

    /// Creates a color from hue (0-360) and saturation (0-100) at full
    /// brightness.
    ///
    /// # Examples
    ///
    /// ```
    /// use sengled_lib::types::RgbColor;
    ///
    /// assert_eq!(RgbColor::from_hs(120, 100), RgbColor::new(0, 255, 0));
    /// assert_eq!(RgbColor::from_hs(0, 0), RgbColor::white());
    /// ```
    #[must_use]
    pub fn from_hs(hue: u16, saturation: u8) -> Self {
        let (r, g, b) = hsb_to_rgb(hue.min(360), saturation.min(100), 100);
        Self::new(r, g, b)
    }

    /// Returns hue (0-360) and saturation (0-100) of this color.
    ///
    /// # Examples
    ///
    /// ```
    /// use sengled_lib::types::RgbColor;
    ///
    /// assert_eq!(RgbColor::new(0, 0, 255).to_hs(), (240, 100));
    /// ```
    #[must_use]
    pub fn to_hs(&self) -> (u16, u8) {
        let (h, s, _) = rgb_to_hsb(self.red, self.green, self.blue);
        (h, s)
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::white()
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_triple_string())
    }
}

/// Parses either format: a colon anywhere selects the vendor format.
impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            Self::from_vendor(s)
        } else {
            Self::from_triple(s)
        }
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

/// Rewrites an `"R,G,B"` triple into the vendor `"R:G:B"` format.
///
/// This is a plain string rewrite: spaces and parentheses are dropped and
/// commas become colons. The components are not validated.
///
/// # Examples
///
/// ```
/// use sengled_lib::types::convert_triple_to_vendor;
///
/// assert_eq!(convert_triple_to_vendor("(255, 128, 0)"), "255:128:0");
/// assert_eq!(convert_triple_to_vendor("1,2,3"), "1:2:3");
/// ```
#[must_use]
pub fn convert_triple_to_vendor(triple: &str) -> String {
    triple
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')'))
        .map(|c| if c == ',' { ':' } else { c })
        .collect()
}

fn parse_components(input: &str, separator: char) -> Result<RgbColor, ValueError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')'))
        .collect();

    let parts: Vec<&str> = cleaned.split(separator).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(ValueError::InvalidColor(input.to_string()));
    };

    let component = |s: &str| {
        s.parse::<u8>()
            .map_err(|_| ValueError::InvalidColor(input.to_string()))
    };

    Ok(RgbColor::new(component(r)?, component(g)?, component(b)?))
}

/// Converts RGB values to HSB.
///
/// Returns (hue: 0-360, saturation: 0-100, brightness: 0-100)
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn rgb_to_hsb(r: u8, g: u8, b: u8) -> (u16, u8, u8) {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let brightness = (max * 100.0).round() as u8;

    let saturation = if max == 0.0 {
        0
    } else {
        ((delta / max) * 100.0).round() as u8
    };

    let hue = if delta < f32::EPSILON {
        0
    } else if (max - r).abs() < f32::EPSILON {
        let h = 60.0 * (((g - b) / delta) % 6.0);
        if h < 0.0 {
            (h + 360.0).round() as u16
        } else {
            h.round() as u16
        }
    } else if (max - g).abs() < f32::EPSILON {
        (60.0 * (((b - r) / delta) + 2.0)).round() as u16
    } else {
        (60.0 * (((r - g) / delta) + 4.0)).round() as u16
    };

    (hue, saturation, brightness)
}

/// Converts HSB values to RGB.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn hsb_to_rgb(h: u16, s: u8, v: u8) -> (u8, u8, u8) {
    let s = f32::from(s) / 100.0;
    let v = f32::from(v) / 100.0;
    let h = f32::from(h);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_triple() {
        let color = RgbColor::from_triple("10,20,30").unwrap();
        assert_eq!(color, RgbColor::new(10, 20, 30));
    }

    #[test]
    fn parse_tuple_rendering() {
        let color: RgbColor = "(255, 0, 127)".parse().unwrap();
        assert_eq!(color, RgbColor::new(255, 0, 127));
    }

    #[test]
    fn parse_vendor_format() {
        let color: RgbColor = "255:255:0".parse().unwrap();
        assert_eq!(color, RgbColor::new(255, 255, 0));
    }

    #[test]
    fn reject_wrong_arity_and_range() {
        assert!(RgbColor::from_triple("1,2").is_err());
        assert!(RgbColor::from_triple("1,2,3,4").is_err());
        assert!(RgbColor::from_triple("1,2,256").is_err());
        assert!(RgbColor::from_vendor("a:b:c").is_err());
    }

    #[test]
    fn vendor_and_triple_rendering() {
        let color = RgbColor::new(1, 22, 255);
        assert_eq!(color.to_vendor_string(), "1:22:255");
        assert_eq!(color.to_triple_string(), "1,22,255");
        assert_eq!(color.to_string(), "1,22,255");
    }

    #[test]
    fn string_rewrite_matches_typed_rendering() {
        let color = RgbColor::new(12, 34, 56);
        assert_eq!(
            convert_triple_to_vendor(&format!("({}, {}, {})", 12, 34, 56)),
            color.to_vendor_string()
        );
    }

    #[test]
    fn hs_conversion() {
        assert_eq!(RgbColor::from_hs(0, 100), RgbColor::new(255, 0, 0));
        assert_eq!(RgbColor::new(255, 0, 0).to_hs(), (0, 100));
        assert_eq!(RgbColor::white().to_hs(), (0, 0));
    }

    #[test]
    fn default_is_white() {
        assert_eq!(RgbColor::default(), RgbColor::new(255, 255, 255));
    }
}
