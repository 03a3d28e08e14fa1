// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb state tracking.
//!
//! [`BulbState`] mirrors what the cloud last reported for a bulb (or what a
//! local command optimistically assumed). [`StateChange`] is a single field
//! update, produced by local commands, pull refreshes and push updates.
//!
//! # Examples
//!
//! ```
//! use sengled_lib::state::{BulbState, StateChange};
//! use sengled_lib::types::PowerState;
//!
//! let mut state = BulbState::new("Desk lamp");
//! assert!(state.apply(&StateChange::Power(PowerState::On)));
//! assert!(state.is_on());
//! ```

mod bulb_state;
mod state_change;

pub use bulb_state::BulbState;
pub use state_change::StateChange;
