// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Country entry that makes a payment method available everywhere.
pub const GLOBAL_PAYMENT_COUNTRY: &str = "Global";

/// The kind of payment rail a method uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentChannel {
    /// Mobile wallet payments.
    MobileMoney,
    /// Direct bank transfer.
    BankTransfer,
    /// Debit or credit card.
    Card,
}

impl PaymentChannel {
    /// Converts this channel to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MobileMoney => "MOBILE_MONEY",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::Card => "CARD",
        }
    }
}

impl FromStr for PaymentChannel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MOBILE_MONEY" => Ok(Self::MobileMoney),
            "BANK_TRANSFER" => Ok(Self::BankTransfer),
            "CARD" => Ok(Self::Card),
            _ => Err(DomainError::InvalidPaymentChannel(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fee charged by a payment method. Both parts are optional and additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFee {
    /// Percentage of the order total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    /// Flat amount added per payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Decimal>,
}

/// A payment method offered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Method identifier.
    pub id: String,
    /// Payment rail.
    pub channel: PaymentChannel,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Country codes served, or [`GLOBAL_PAYMENT_COUNTRY`].
    pub supported_countries: Vec<String>,
    /// Smallest order total accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    /// Largest order total accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Decimal>,
    /// Fee configuration, if the method charges one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<PaymentFee>,
    /// Customer-facing processing time.
    pub processing_time: String,
}

impl PaymentMethod {
    /// Checks whether the method serves a destination country.
    #[must_use]
    pub fn supports_country(&self, country: &str) -> bool {
        self.supported_countries
            .iter()
            .any(|c| c == GLOBAL_PAYMENT_COUNTRY || c.eq_ignore_ascii_case(country.trim()))
    }

    /// Checks whether an order total falls inside the method's bounds.
    #[must_use]
    pub fn accepts_amount(&self, total: Decimal) -> bool {
        self.min_amount.is_none_or(|min| total >= min)
            && self.max_amount.is_none_or(|max| total <= max)
    }

    /// Checks both country and amount eligibility.
    #[must_use]
    pub fn is_eligible(&self, country: &str, total: Decimal) -> bool {
        self.supports_country(country) && self.accepts_amount(total)
    }

    /// Computes the fee for an order total.
    ///
    /// `total * percentage / 100 + fixed`, never below zero. A method with no
    /// fee configuration charges nothing.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if the fee does not fit in a `Decimal`.
    pub fn calculate_fee(&self, total: Decimal) -> Result<Decimal, DomainError> {
        let Some(fee) = self.fee else {
            return Ok(Decimal::ZERO);
        };

        let overflow = || DomainError::AmountOverflow { field: "fee" };
        let percentage_part: Decimal = match fee.percentage {
            Some(pct) => total
                .checked_mul(pct)
                .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
                .ok_or_else(overflow)?,
            None => Decimal::ZERO,
        };
        let fixed_part: Decimal = fee.fixed.unwrap_or(Decimal::ZERO);

        Ok(percentage_part
            .checked_add(fixed_part)
            .ok_or_else(overflow)?
            .max(Decimal::ZERO))
    }
}

/// A payment method with its fee worked out for a specific order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedPaymentMethod {
    /// The method.
    pub method: PaymentMethod,
    /// Fee for this order.
    pub fee: Decimal,
    /// Order total plus fee.
    pub total_with_fees: Decimal,
}

/// Returns the fixed catalog of payment methods.
#[must_use]
pub fn payment_catalog() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: String::from("mobile-money"),
            channel: PaymentChannel::MobileMoney,
            name: String::from("Mobile Money"),
            description: String::from("Pay from an M-Pesa, Airtel Money or MTN wallet"),
            supported_countries: ["KE", "UG", "TZ", "RW"]
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            min_amount: Some(Decimal::new(10, 0)),
            max_amount: Some(Decimal::new(300_000, 0)),
            fee: Some(PaymentFee {
                percentage: Some(Decimal::new(15, 1)),
                fixed: None,
            }),
            processing_time: String::from("Instant"),
        },
        PaymentMethod {
            id: String::from("bank-transfer"),
            channel: PaymentChannel::BankTransfer,
            name: String::from("Bank Transfer"),
            description: String::from("Transfer directly from your bank account"),
            supported_countries: vec![String::from(GLOBAL_PAYMENT_COUNTRY)],
            min_amount: Some(Decimal::new(1_000, 0)),
            max_amount: None,
            fee: Some(PaymentFee {
                percentage: None,
                fixed: Some(Decimal::new(100, 0)),
            }),
            processing_time: String::from("1-3 business days"),
        },
        PaymentMethod {
            id: String::from("card"),
            channel: PaymentChannel::Card,
            name: String::from("Card"),
            description: String::from("Visa, Mastercard and American Express"),
            supported_countries: vec![String::from(GLOBAL_PAYMENT_COUNTRY)],
            min_amount: None,
            max_amount: None,
            fee: Some(PaymentFee {
                percentage: Some(Decimal::new(25, 1)),
                fixed: None,
            }),
            processing_time: String::from("Instant"),
        },
    ]
}

/// Filters a catalog down to the methods usable for a country and total.
///
/// Catalog order is preserved.
///
/// # Errors
///
/// Returns `AmountOverflow` if a fee or fee-inclusive total overflows.
pub fn eligible_payment_methods(
    catalog: &[PaymentMethod],
    country: &str,
    total: Decimal,
) -> Result<Vec<PricedPaymentMethod>, DomainError> {
    catalog
        .iter()
        .filter(|method| method.is_eligible(country, total))
        .map(|method| {
            let fee: Decimal = method.calculate_fee(total)?;
            let total_with_fees: Decimal = total.checked_add(fee).ok_or(
                DomainError::AmountOverflow {
                    field: "total_with_fees",
                },
            )?;
            Ok(PricedPaymentMethod {
                method: method.clone(),
                fee,
                total_with_fees,
            })
        })
        .collect()
}

/// Looks up a method and checks it can be used for a country and total.
///
/// # Errors
///
/// Returns an error if the method is unknown or not eligible.
pub fn require_eligible_method<'a>(
    catalog: &'a [PaymentMethod],
    method_id: &str,
    country: &str,
    total: Decimal,
) -> Result<&'a PaymentMethod, DomainError> {
    let method: &PaymentMethod = catalog
        .iter()
        .find(|m| m.id == method_id)
        .ok_or_else(|| DomainError::PaymentMethodNotFound(method_id.to_string()))?;

    if !method.is_eligible(country, total) {
        return Err(DomainError::PaymentMethodNotEligible {
            method_id: method_id.to_string(),
            country: country.to_string(),
            total,
        });
    }

    Ok(method)
}
