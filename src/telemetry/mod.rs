// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status push parsing for Wi-Fi bulbs.
//!
//! Wi-Fi bulbs publish on `wifielement/<mac>/status` a JSON array of
//! `{"dn": <mac>, "type": <tag>, "value": <value>}` entries. Pushes are
//! best-effort: malformed payloads and unknown tags are dropped without
//! an error.
//!
//! # Examples
//!
//! ```
//! use sengled_lib::state::StateChange;
//! use sengled_lib::telemetry::parse_status;
//!
//! let payload = br#"[{"dn":"AA","type":"brightness","value":"80"}]"#;
//! assert_eq!(parse_status(payload, "AA"), vec![StateChange::Brightness(80)]);
//!
//! // Not an array: ignored
//! assert!(parse_status(b"{}", "AA").is_empty());
//! ```

mod status_parser;

pub use status_parser::{StatusEntry, parse_status};
