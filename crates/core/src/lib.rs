// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod event;
mod state;

#[cfg(test)]
mod tests;

use merch_checkout_domain::SavedAddress;

// Re-export public types and functions
pub use apply::apply;
pub use command::{Command, RetryTrigger};
pub use error::CoreError;
pub use event::{Actor, FlowAction, FlowEvent, FlowSnapshot};
pub use state::{
    CheckoutFlowState, CheckoutPhase, Effect, FlowFailure, MAX_SHIPPING_ATTEMPTS,
    TransitionResult,
};

/// Finds an address by id in a freshly fetched address list.
///
/// This is a read-only lookup that does not create flow events.
#[must_use]
pub fn find_address(addresses: &[SavedAddress], address_id: i64) -> Option<&SavedAddress> {
    addresses
        .iter()
        .find(|address| address.address_id == address_id)
}
