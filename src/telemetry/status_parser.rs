// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for `wifielement/<mac>/status` messages.

use serde::Deserialize;
use serde_json::Value;

use crate::device::property::{value_to_i64, value_to_string};
use crate::state::StateChange;

/// One entry of a status push.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusEntry {
    /// Device the entry is about.
    #[serde(default)]
    pub dn: Option<Value>,
    /// Attribute tag, e.g. `brightness`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Attribute value, a string or a number.
    #[serde(default)]
    pub value: Value,
}

impl StatusEntry {
    /// Returns `true` if the entry names `mac`. Only string `dn` values
    /// match.
    #[must_use]
    pub fn is_for(&self, mac: &str) -> bool {
        self.dn.as_ref().and_then(Value::as_str) == Some(mac)
    }

    /// Converts the entry to a state change.
    ///
    /// Values are taken as reported, with no rescaling. Returns `None` for
    /// unknown tags and for values that do not fit the field.
    #[must_use]
    pub fn to_state_change(&self) -> Option<StateChange> {
        match self.kind.as_deref()? {
            "color" => value_to_string(&self.value).map(StateChange::Color),
            "colorMode" => value_to_string(&self.value).map(StateChange::ColorMode),
            "brightness" => value_to_i64(&self.value)
                .and_then(|v| u8::try_from(v).ok())
                .map(StateChange::Brightness),
            "colorTemperature" => value_to_i64(&self.value)
                .and_then(|v| u16::try_from(v).ok())
                .map(StateChange::ColorTemperature),
            _ => None,
        }
    }
}

/// Parses a status push into the state changes addressed to `mac`.
///
/// Entries missing `type` or `dn`, entries for other devices and entries
/// that are not objects are skipped. A payload that is not a JSON array
/// yields nothing.
#[must_use]
pub fn parse_status(payload: &[u8], mac: &str) -> Vec<StateChange> {
    let entries: Vec<Value> = match serde_json::from_slice(payload) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::trace!(device = %mac, error = %e, "Ignoring malformed status push");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<StatusEntry>(entry).ok())
        .filter(|entry| entry.kind.is_some() && entry.is_for(mac))
        .filter_map(|entry| {
            let change = entry.to_state_change();
            if change.is_none() {
                tracing::trace!(device = %mac, kind = ?entry.kind, "Ignoring status entry");
            }
            change
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC: &str = "B0:CE:18:00:00:01";

    #[test]
    fn parses_known_tags_verbatim() {
        let payload = br#"[
            {"dn":"B0:CE:18:00:00:01","type":"color","value":"255:0:0"},
            {"dn":"B0:CE:18:00:00:01","type":"colorMode","value":"1"},
            {"dn":"B0:CE:18:00:00:01","type":"brightness","value":"80"},
            {"dn":"B0:CE:18:00:00:01","type":"colorTemperature","value":60}
        ]"#;

        assert_eq!(
            parse_status(payload, MAC),
            vec![
                StateChange::Color("255:0:0".to_string()),
                StateChange::ColorMode("1".to_string()),
                StateChange::Brightness(80),
                StateChange::ColorTemperature(60),
            ]
        );
    }

    #[test]
    fn skips_other_devices_and_incomplete_entries() {
        let payload = br#"[
            {"dn":"OTHER","type":"brightness","value":"10"},
            {"type":"brightness","value":"20"},
            {"dn":"B0:CE:18:00:00:01","value":"30"},
            "garbage",
            {"dn":"B0:CE:18:00:00:01","type":"brightness","value":"40"}
        ]"#;

        assert_eq!(parse_status(payload, MAC), vec![StateChange::Brightness(40)]);
    }

    #[test]
    fn ignores_unknown_tags() {
        let payload = br#"[{"dn":"B0:CE:18:00:00:01","type":"switch","value":"1"}]"#;
        assert!(parse_status(payload, MAC).is_empty());
    }

    #[test]
    fn skips_values_that_do_not_fit() {
        let payload = br#"[
            {"dn":"B0:CE:18:00:00:01","type":"brightness","value":"300"},
            {"dn":"B0:CE:18:00:00:01","type":"brightness","value":"bright"},
            {"dn":"B0:CE:18:00:00:01","type":"color","value":null}
        ]"#;
        assert!(parse_status(payload, MAC).is_empty());
    }

    #[test]
    fn malformed_payloads_yield_nothing() {
        assert!(parse_status(b"not json", MAC).is_empty());
        assert!(parse_status(br#"{"dn":"B0:CE:18:00:00:01"}"#, MAC).is_empty());
        assert!(parse_status(b"", MAC).is_empty());
        assert!(parse_status(&[0xff, 0xfe], MAC).is_empty());
    }

    #[test]
    fn numeric_dn_never_matches() {
        let entry: StatusEntry =
            serde_json::from_str(r#"{"dn": 42, "type": "brightness", "value": 1}"#).unwrap();
        assert!(!entry.is_for("42"));
        assert!(parse_status(br#"[{"dn": 42, "type": "brightness", "value": 1}]"#, "42").is_empty());

        let named: StatusEntry =
            serde_json::from_str(r#"{"dn": "42", "type": "brightness", "value": 1}"#).unwrap();
        assert!(named.is_for("42"));
        assert_eq!(named.to_state_change(), Some(StateChange::Brightness(1)));
    }
}
