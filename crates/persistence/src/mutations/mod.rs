// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `customers`: Customer accounts and bearer sessions
//! - `addresses`: Address creation and full replacement
//! - `checkout`: Checkout sessions and the bundle hand-off
//!
//! Multi-statement mutations run inside a transaction.

pub mod addresses;
pub mod checkout;
pub mod customers;
