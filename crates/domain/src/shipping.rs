// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::address::Address;
use crate::error::DomainError;
use crate::pricing::round_currency;
use crate::urgency::{UrgencyLevel, resolve_multiplier};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Country code that makes a zone serve every destination.
pub const GLOBAL_ZONE_COUNTRY: &str = "Global";

/// A priced, timed delivery choice for one address and urgency level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    /// Option identifier, stable across urgency levels.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Price after the urgency multiplier (zero when free).
    pub cost: Decimal,
    /// Base price before the urgency multiplier.
    pub original_cost: Decimal,
    /// Estimated delivery time in days.
    pub estimated_days: u16,
    /// Multiplier that was applied to `original_cost`.
    pub urgency_multiplier: Decimal,
    /// Whether the option is free for this order.
    pub is_free: bool,
    /// The shipping zone that produced this option.
    pub zone_id: String,
}

impl ShippingOption {
    /// Prices a rate for an urgency level.
    ///
    /// Free options cost zero whatever the multiplier is.
    #[must_use]
    pub fn priced(rate: &ShippingRate, urgency: UrgencyLevel, is_free: bool) -> Self {
        let multiplier: Decimal = resolve_multiplier(urgency).multiplier;
        let cost: Decimal = if is_free {
            Decimal::ZERO
        } else {
            round_currency(rate.base_cost * multiplier)
        };

        Self {
            id: rate.id.clone(),
            name: rate.name.clone(),
            description: rate.description.clone(),
            cost,
            original_cost: rate.base_cost,
            estimated_days: rate.estimated_days,
            urgency_multiplier: multiplier,
            is_free,
            zone_id: rate.zone_id.clone(),
        }
    }

    /// Returns the cost implied by the base cost, multiplier and free flag.
    #[must_use]
    pub fn expected_cost(&self) -> Decimal {
        if self.is_free {
            Decimal::ZERO
        } else {
            round_currency(self.original_cost * self.urgency_multiplier)
        }
    }
}

/// A group of destination countries sharing the same rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZone {
    /// Zone identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Served country codes, or [`GLOBAL_ZONE_COUNTRY`].
    pub countries: Vec<String>,
}

impl ShippingZone {
    /// Checks whether this zone lists the country explicitly.
    #[must_use]
    pub fn lists_country(&self, country: &str) -> bool {
        self.countries
            .iter()
            .any(|c| c != GLOBAL_ZONE_COUNTRY && c.eq_ignore_ascii_case(country))
    }

    /// Checks whether this zone is the catch-all zone.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.countries.iter().any(|c| c == GLOBAL_ZONE_COUNTRY)
    }
}

/// A base delivery rate within a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    /// Rate identifier, used as the option id.
    pub id: String,
    /// The zone this rate belongs to.
    pub zone_id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Price at `NORMAL` urgency.
    pub base_cost: Decimal,
    /// Estimated delivery time in days.
    pub estimated_days: u16,
    /// Subtotal at or above which this rate is free.
    pub free_over: Option<Decimal>,
}

/// The shipping calculator's zones and rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRateTable {
    zones: Vec<ShippingZone>,
    rates: Vec<ShippingRate>,
}

impl ShippingRateTable {
    /// Creates a table from zones and rates.
    ///
    /// Rates are quoted in the order given here.
    #[must_use]
    pub const fn new(zones: Vec<ShippingZone>, rates: Vec<ShippingRate>) -> Self {
        Self { zones, rates }
    }

    /// Returns the zones.
    #[must_use]
    pub fn zones(&self) -> &[ShippingZone] {
        &self.zones
    }

    /// Finds the zone that serves a country.
    ///
    /// A zone listing the country wins over the catch-all zone.
    #[must_use]
    pub fn zone_for(&self, country: &str) -> Option<&ShippingZone> {
        self.zones
            .iter()
            .find(|zone| zone.lists_country(country))
            .or_else(|| self.zones.iter().find(|zone| zone.is_global()))
    }

    /// Quotes every rate that serves an address at an urgency level.
    ///
    /// # Errors
    ///
    /// Returns an error if no zone serves the address country.
    pub fn quote(
        &self,
        address: &Address,
        urgency: UrgencyLevel,
        subtotal: Decimal,
    ) -> Result<Vec<ShippingOption>, DomainError> {
        let country: String = address.country_code();
        let zone: &ShippingZone =
            self.zone_for(&country)
                .ok_or_else(|| DomainError::NoShippingZone {
                    country: country.clone(),
                })?;

        Ok(self
            .rates
            .iter()
            .filter(|rate| rate.zone_id == zone.id)
            .map(|rate| {
                let is_free: bool = rate.free_over.is_some_and(|limit| subtotal >= limit);
                ShippingOption::priced(rate, urgency, is_free)
            })
            .collect())
    }
}

impl Default for ShippingRateTable {
    fn default() -> Self {
        let zones: Vec<ShippingZone> = vec![
            ShippingZone {
                id: String::from("domestic"),
                name: String::from("Domestic"),
                countries: vec![String::from("KE")],
            },
            ShippingZone {
                id: String::from("east-africa"),
                name: String::from("East Africa"),
                countries: ["UG", "TZ", "RW", "BI", "SS"]
                    .iter()
                    .map(|c| (*c).to_string())
                    .collect(),
            },
            ShippingZone {
                id: String::from("international"),
                name: String::from("International"),
                countries: vec![String::from(GLOBAL_ZONE_COUNTRY)],
            },
        ];

        let rates: Vec<ShippingRate> = vec![
            ShippingRate {
                id: String::from("domestic-standard"),
                zone_id: String::from("domestic"),
                name: String::from("Standard Delivery"),
                description: String::from("Courier delivery within Kenya"),
                base_cost: Decimal::new(300, 0),
                estimated_days: 3,
                free_over: Some(Decimal::new(10_000, 0)),
            },
            ShippingRate {
                id: String::from("domestic-express"),
                zone_id: String::from("domestic"),
                name: String::from("Express Delivery"),
                description: String::from("Next-day courier delivery within Kenya"),
                base_cost: Decimal::new(750, 0),
                estimated_days: 1,
                free_over: None,
            },
            ShippingRate {
                id: String::from("east-africa-standard"),
                zone_id: String::from("east-africa"),
                name: String::from("Regional Standard"),
                description: String::from("Road freight across East Africa"),
                base_cost: Decimal::new(1_500, 0),
                estimated_days: 7,
                free_over: Some(Decimal::new(50_000, 0)),
            },
            ShippingRate {
                id: String::from("east-africa-express"),
                zone_id: String::from("east-africa"),
                name: String::from("Regional Express"),
                description: String::from("Air freight across East Africa"),
                base_cost: Decimal::new(3_200, 0),
                estimated_days: 3,
                free_over: None,
            },
            ShippingRate {
                id: String::from("international-standard"),
                zone_id: String::from("international"),
                name: String::from("International Standard"),
                description: String::from("Tracked international post"),
                base_cost: Decimal::new(4_500, 0),
                estimated_days: 14,
                free_over: None,
            },
            ShippingRate {
                id: String::from("international-express"),
                zone_id: String::from("international"),
                name: String::from("International Express"),
                description: String::from("Express international courier"),
                base_cost: Decimal::new(9_000, 0),
                estimated_days: 5,
                free_over: None,
            },
        ];

        Self::new(zones, rates)
    }
}
