// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::Serialize;

/// The entity driving a flow transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    /// Identifier of the actor (customer id, or a process name).
    pub id: String,
    /// The type of actor (e.g. "customer", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// The actor used for transitions the flow drives on its own, such as
    /// applying a shipping response or an automatic retry.
    #[must_use]
    pub fn system() -> Self {
        Self::new(String::from("checkout-flow"), String::from("system"))
    }
}

/// What a transition did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowAction {
    /// The name of the action (e.g. "`SelectAddress`").
    pub name: String,
    /// Optional human-readable details.
    pub details: Option<String>,
}

impl FlowAction {
    /// Creates a new `FlowAction`.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact textual summary of flow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowSnapshot {
    /// Summary string.
    pub data: String,
}

impl FlowSnapshot {
    /// Creates a new `FlowSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// Record of one flow transition.
///
/// Every successful `apply` produces exactly one event, including
/// transitions that leave the state untouched (e.g. an ignored stale
/// shipping response).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEvent {
    /// The checkout session the flow belongs to.
    pub session_id: String,
    /// Who initiated the transition.
    pub actor: Actor,
    /// What happened.
    pub action: FlowAction,
    /// State before the transition.
    pub before: FlowSnapshot,
    /// State after the transition.
    pub after: FlowSnapshot,
}

impl FlowEvent {
    /// Creates a new `FlowEvent`.
    #[must_use]
    pub const fn new(
        session_id: String,
        actor: Actor,
        action: FlowAction,
        before: FlowSnapshot,
        after: FlowSnapshot,
    ) -> Self {
        Self {
            session_id,
            actor,
            action,
            before,
            after,
        }
    }
}
