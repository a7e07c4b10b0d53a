// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal_macros::dec;

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidAddress {
        field: "city",
        reason: String::from("must not be empty"),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid address field 'city': must not be empty"
    );

    let err: DomainError = DomainError::InvalidUrgencyLevel(String::from("SOON"));
    assert_eq!(format!("{err}"), "Unknown urgency level 'SOON'");

    let err: DomainError = DomainError::EmptyCart;
    assert_eq!(format!("{err}"), "Cart must contain at least one item");

    let err: DomainError = DomainError::NoShippingZone {
        country: String::from("AQ"),
    };
    assert_eq!(format!("{err}"), "No shipping zone delivers to 'AQ'");

    let err: DomainError = DomainError::ShippingOptionNotFound {
        option_id: String::from("drone"),
    };
    assert_eq!(format!("{err}"), "Shipping option 'drone' is not available");

    let err: DomainError = DomainError::TotalsMismatch {
        expected: dec!(1192),
        actual: dec!(1200),
    };
    assert_eq!(
        format!("{err}"),
        "Estimated total 1200 does not match its components (1192)"
    );

    let err: DomainError = DomainError::SessionNotOpen {
        session_id: String::from("cs_9"),
        status: String::from("COMPLETED"),
    };
    assert_eq!(
        format!("{err}"),
        "Checkout session 'cs_9' is COMPLETED and cannot be changed"
    );
}
