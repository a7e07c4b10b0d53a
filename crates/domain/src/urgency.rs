// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Customer-selected priority tier for an order.
///
/// Variants are declared in severity order, so the derived `Ord` matches
/// `NORMAL < EXPEDITED < RUSH < EMERGENCY`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    /// Standard processing.
    #[default]
    Normal,
    /// Faster processing.
    Expedited,
    /// Priority processing.
    Rush,
    /// Drop-everything processing.
    Emergency,
}

impl UrgencyLevel {
    /// Every tier, lowest severity first.
    pub const ALL: [Self; 4] = [Self::Normal, Self::Expedited, Self::Rush, Self::Emergency];

    /// Converts this level to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Expedited => "EXPEDITED",
            Self::Rush => "RUSH",
            Self::Emergency => "EMERGENCY",
        }
    }
}

impl FromStr for UrgencyLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NORMAL" => Ok(Self::Normal),
            "EXPEDITED" => Ok(Self::Expedited),
            "RUSH" => Ok(Self::Rush),
            "EMERGENCY" => Ok(Self::Emergency),
            _ => Err(DomainError::InvalidUrgencyLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display and pricing metadata for an urgency level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrgencyProfile {
    /// The level this profile describes.
    pub level: UrgencyLevel,
    /// Factor applied to base shipping cost.
    pub multiplier: Decimal,
    /// Short customer-facing description.
    pub description: &'static str,
    /// UI color tag.
    pub color_tag: &'static str,
}

/// Resolves the multiplier and metadata for an urgency level.
///
/// The set of levels is closed, so this is a total lookup with no error case.
#[must_use]
pub fn resolve_multiplier(level: UrgencyLevel) -> UrgencyProfile {
    let (multiplier, description, color_tag) = match level {
        UrgencyLevel::Normal => (Decimal::ONE, "Standard processing time", "green"),
        UrgencyLevel::Expedited => (Decimal::new(15, 1), "Faster processing", "blue"),
        UrgencyLevel::Rush => (Decimal::new(2, 0), "Priority processing", "orange"),
        UrgencyLevel::Emergency => (Decimal::new(3, 0), "Immediate processing", "red"),
    };

    UrgencyProfile {
        level,
        multiplier,
        description,
        color_tag,
    }
}
