// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::address::Address;
use crate::cart::CartItem;
use crate::error::DomainError;
use crate::shipping::ShippingOption;
use rust_decimal::Decimal;

/// Validates that an address's required fields are present and well formed.
///
/// This function is pure and does not check ownership or persistence.
///
/// # Arguments
///
/// * `address` - The address to validate
///
/// # Errors
///
/// Returns an error if:
/// - The recipient, street, city or postal code is empty
/// - The country is not a two letter code
/// - A phone number is present but malformed
pub fn validate_address(address: &Address) -> Result<(), DomainError> {
    for (field, value) in [
        ("recipient_name", &address.recipient_name),
        ("street", &address.street),
        ("city", &address.city),
        ("postal_code", &address.postal_code),
    ] {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidAddress {
                field,
                reason: String::from("must not be empty"),
            });
        }
    }

    // Rule: country is ISO 3166-1 alpha-2
    let country: &str = address.country.trim();
    if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::InvalidCountryCode(address.country.clone()));
    }

    if let Some(phone) = &address.phone {
        validate_phone(phone)?;
    }

    Ok(())
}

/// Validates a phone number.
///
/// Accepts an optional leading `+`, then 7 to 15 digits. Spaces and dashes
/// are ignored.
///
/// # Errors
///
/// Returns an error if the number is malformed.
pub fn validate_phone(phone: &str) -> Result<(), DomainError> {
    let trimmed: &str = phone.trim();
    let digits: &str = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let cleaned: String = digits
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();

    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::InvalidPhone(String::from(
            "only digits, spaces and dashes are allowed",
        )));
    }
    if !(7..=15).contains(&cleaned.len()) {
        return Err(DomainError::InvalidPhone(format!(
            "expected 7 to 15 digits, got {}",
            cleaned.len()
        )));
    }
    Ok(())
}

/// Largest quantity accepted on one cart line.
pub const MAX_ITEM_QUANTITY: u32 = 10_000;

/// Largest unit price accepted on one cart line.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Validates cart contents.
///
/// # Errors
///
/// Returns an error if the cart is empty, or a line has a blank product id,
/// a quantity outside `1..=MAX_ITEM_QUANTITY` or a price outside
/// `0..=MAX_UNIT_PRICE`.
pub fn validate_cart_items(items: &[CartItem]) -> Result<(), DomainError> {
    if items.is_empty() {
        return Err(DomainError::EmptyCart);
    }

    for item in items {
        if item.product_id.trim().is_empty() {
            return Err(DomainError::InvalidCartItem {
                product_id: item.product_id.clone(),
                reason: String::from("product id must not be empty"),
            });
        }
        if item.quantity == 0 {
            return Err(DomainError::InvalidCartItem {
                product_id: item.product_id.clone(),
                reason: String::from("quantity must be at least 1"),
            });
        }
        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(DomainError::InvalidCartItem {
                product_id: item.product_id.clone(),
                reason: format!("quantity must be at most {MAX_ITEM_QUANTITY}"),
            });
        }
        if item.unit_price < Decimal::ZERO {
            return Err(DomainError::InvalidCartItem {
                product_id: item.product_id.clone(),
                reason: format!("unit price {} is negative", item.unit_price),
            });
        }
        if item.unit_price > MAX_UNIT_PRICE {
            return Err(DomainError::InvalidCartItem {
                product_id: item.product_id.clone(),
                reason: format!("unit price must be at most {MAX_UNIT_PRICE}"),
            });
        }
    }

    Ok(())
}

/// Validates a shipping option's price invariant.
///
/// Free options must cost zero. Other options must cost
/// `round(original_cost * urgency_multiplier)` at the minor unit.
///
/// # Errors
///
/// Returns an error if the cost disagrees with the base cost and multiplier.
pub fn validate_shipping_option(option: &ShippingOption) -> Result<(), DomainError> {
    let expected: Decimal = option.expected_cost();
    if option.cost != expected {
        return Err(DomainError::ShippingOptionPriceMismatch {
            option_id: option.id.clone(),
            expected,
            actual: option.cost,
        });
    }
    Ok(())
}
