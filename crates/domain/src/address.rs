// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A postal address as submitted by a customer.
///
/// Saved addresses are never edited in place. A change is submitted as a
/// full replacement, which receives a new identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Name of the person receiving the parcel.
    pub recipient_name: String,
    /// Optional company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// First street line.
    pub street: String,
    /// Optional second street line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    /// City or town.
    pub city: String,
    /// Optional state, county or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Optional contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Address {
    /// Returns the key used to decide whether shipping must be re-quoted.
    #[must_use]
    pub fn shipping_key(&self) -> AddressKey {
        AddressKey::from_address(self)
    }

    /// Returns the country code normalized to uppercase.
    #[must_use]
    pub fn country_code(&self) -> String {
        self.country.trim().to_uppercase()
    }
}

/// The reduced address identity that drives shipping recalculation.
///
/// Only `street`, `city`, `postal_code` and `country` take part. Edits to
/// the recipient, company, second street line, state or phone compare equal
/// and therefore reuse previously quoted shipping options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressKey {
    street: String,
    city: String,
    postal_code: String,
    country: String,
}

impl AddressKey {
    /// Builds the normalized key for an address.
    ///
    /// Whitespace is collapsed and comparison is case-insensitive. Postal
    /// codes additionally ignore internal spaces.
    #[must_use]
    pub fn from_address(address: &Address) -> Self {
        Self {
            street: normalize_text(&address.street),
            city: normalize_text(&address.city),
            postal_code: address
                .postal_code
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase(),
            country: address.country_code(),
        }
    }

    /// Returns the normalized country code.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }
}

fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_uppercase()
}

/// What an address is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    /// Delivery destination.
    #[default]
    Shipping,
    /// Invoice destination.
    Billing,
}

impl AddressType {
    /// Converts this address type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shipping => "SHIPPING",
            Self::Billing => "BILLING",
        }
    }
}

impl FromStr for AddressType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SHIPPING" => Ok(Self::Shipping),
            "BILLING" => Ok(Self::Billing),
            _ => Err(DomainError::InvalidAddressType(s.to_string())),
        }
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An address that has been persisted in a customer's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAddress {
    /// Address book identifier.
    pub address_id: i64,
    /// Owning customer.
    pub customer_id: i64,
    /// Shipping or billing.
    pub address_type: AddressType,
    /// Whether this is the customer's default for its type.
    pub is_default: bool,
    /// The address itself.
    #[serde(flatten)]
    pub address: Address,
}
