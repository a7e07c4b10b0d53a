// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    DomainError, PaymentChannel, PaymentFee, PaymentMethod, PricedPaymentMethod,
    eligible_payment_methods, payment_catalog, require_eligible_method,
};

fn create_test_method(countries: &[&str], fee: Option<PaymentFee>) -> PaymentMethod {
    PaymentMethod {
        id: String::from("test-method"),
        channel: PaymentChannel::MobileMoney,
        name: String::from("Test"),
        description: String::from("Test method"),
        supported_countries: countries.iter().map(|c| (*c).to_string()).collect(),
        min_amount: None,
        max_amount: None,
        fee,
        processing_time: String::from("Instant"),
    }
}

#[test]
fn test_percentage_fee_end_to_end() {
    let method: PaymentMethod = create_test_method(
        &["Global"],
        Some(PaymentFee {
            percentage: Some(dec!(2.5)),
            fixed: None,
        }),
    );

    let priced: Vec<PricedPaymentMethod> =
        eligible_payment_methods(&[method], "KE", dec!(485.00)).unwrap();

    assert_eq!(priced.len(), 1);
    assert_eq!(priced[0].fee, dec!(12.125));
    assert_eq!(priced[0].total_with_fees, dec!(497.125));
}

#[test]
fn test_fee_parts_are_additive() {
    let method: PaymentMethod = create_test_method(
        &["Global"],
        Some(PaymentFee {
            percentage: Some(dec!(1)),
            fixed: Some(dec!(30)),
        }),
    );

    assert_eq!(method.calculate_fee(dec!(1000)).unwrap(), dec!(40));
}

#[test]
fn test_method_without_fee_config_charges_nothing() {
    let method: PaymentMethod = create_test_method(&["Global"], None);
    assert_eq!(method.calculate_fee(dec!(1000)).unwrap(), Decimal::ZERO);

    let empty_fee: PaymentMethod = create_test_method(&["Global"], Some(PaymentFee::default()));
    assert_eq!(empty_fee.calculate_fee(dec!(1000)).unwrap(), Decimal::ZERO);
}

#[test]
fn test_fee_is_never_negative() {
    let method: PaymentMethod = create_test_method(
        &["Global"],
        Some(PaymentFee {
            percentage: None,
            fixed: Some(dec!(-25)),
        }),
    );
    assert_eq!(method.calculate_fee(dec!(1000)).unwrap(), Decimal::ZERO);
}

#[test]
fn test_country_restricted_method_is_excluded_elsewhere() {
    let kenya_only: PaymentMethod = create_test_method(&["KE"], None);

    let priced: Vec<PricedPaymentMethod> =
        eligible_payment_methods(&[kenya_only.clone()], "UG", dec!(500)).unwrap();
    assert!(priced.is_empty());

    let priced: Vec<PricedPaymentMethod> =
        eligible_payment_methods(&[kenya_only], "ke", dec!(500)).unwrap();
    assert_eq!(priced.len(), 1);
}

#[test]
fn test_global_method_is_always_included() {
    let global: PaymentMethod = create_test_method(&["Global"], None);

    for country in ["KE", "UG", "US", "JP"] {
        assert!(global.supports_country(country));
    }
}

#[test]
fn test_amount_bounds_are_inclusive() {
    let mut method: PaymentMethod = create_test_method(&["Global"], None);
    method.min_amount = Some(dec!(100));
    method.max_amount = Some(dec!(200));

    assert!(!method.accepts_amount(dec!(99.99)));
    assert!(method.accepts_amount(dec!(100)));
    assert!(method.accepts_amount(dec!(200)));
    assert!(!method.accepts_amount(dec!(200.01)));
}

#[test]
fn test_catalog_filters_for_uganda() {
    let catalog: Vec<PaymentMethod> = payment_catalog();
    assert_eq!(catalog.len(), 3);

    let ids: Vec<String> = eligible_payment_methods(&catalog, "UG", dec!(2000))
        .unwrap()
        .into_iter()
        .map(|p| p.method.id)
        .collect();
    assert_eq!(ids, vec!["mobile-money", "bank-transfer", "card"]);

    let ids: Vec<String> = eligible_payment_methods(&catalog, "US", dec!(500))
        .unwrap()
        .into_iter()
        .map(|p| p.method.id)
        .collect();
    assert_eq!(ids, vec!["card"]);
}

#[test]
fn test_require_eligible_method_reports_reason() {
    let catalog: Vec<PaymentMethod> = payment_catalog();

    assert!(require_eligible_method(&catalog, "card", "US", dec!(10)).is_ok());
    assert_eq!(
        require_eligible_method(&catalog, "cash", "KE", dec!(10)).unwrap_err(),
        DomainError::PaymentMethodNotFound(String::from("cash"))
    );
    assert_eq!(
        require_eligible_method(&catalog, "mobile-money", "US", dec!(10)).unwrap_err(),
        DomainError::PaymentMethodNotEligible {
            method_id: String::from("mobile-money"),
            country: String::from("US"),
            total: dec!(10),
        }
    );
}

#[test]
fn test_fee_overflow_is_an_error() {
    let method: PaymentMethod = create_test_method(
        &["Global"],
        Some(PaymentFee {
            percentage: Some(dec!(250)),
            fixed: None,
        }),
    );

    assert_eq!(
        method.calculate_fee(Decimal::MAX),
        Err(DomainError::AmountOverflow { field: "fee" })
    );
    assert!(eligible_payment_methods(&[method], "KE", Decimal::MAX).is_err());
}
