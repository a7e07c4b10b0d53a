// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal_macros::dec;

use crate::tests::helpers::{create_test_address, create_test_items, create_test_saved_address};
use crate::{
    CheckoutBundle, CheckoutTotals, DomainError, ShippingOption, ShippingRateTable, UrgencyLevel,
};

fn create_test_options() -> Vec<ShippingOption> {
    ShippingRateTable::default()
        .quote(&create_test_address("KE"), UrgencyLevel::Expedited, dec!(1000))
        .unwrap()
}

#[test]
fn test_assemble_picks_selected_option_and_keeps_full_list() {
    let options: Vec<ShippingOption> = create_test_options();
    let totals: CheckoutTotals =
        CheckoutTotals::compute(dec!(1000), options[1].cost, dec!(160), dec!(0)).unwrap();

    let bundle: CheckoutBundle = CheckoutBundle::assemble(
        String::from("cs_1"),
        create_test_saved_address(1, "KE"),
        "domestic-express",
        options.clone(),
        totals,
        UrgencyLevel::Expedited,
        7,
        create_test_items(),
    )
    .unwrap();

    assert_eq!(bundle.selected_shipping_option.id, "domestic-express");
    assert_eq!(bundle.selected_shipping_option.cost, dec!(1125));
    assert_eq!(bundle.shipping_options, options);
    assert_eq!(bundle.calculated_totals.estimated_total, dec!(2285));
}

#[test]
fn test_assemble_rejects_unknown_option() {
    let options: Vec<ShippingOption> = create_test_options();
    let totals: CheckoutTotals =
        CheckoutTotals::compute(dec!(1000), dec!(0), dec!(160), dec!(0)).unwrap();

    let result = CheckoutBundle::assemble(
        String::from("cs_1"),
        create_test_saved_address(1, "KE"),
        "teleport",
        options,
        totals,
        UrgencyLevel::Expedited,
        7,
        create_test_items(),
    );

    assert_eq!(
        result.unwrap_err(),
        DomainError::ShippingOptionNotFound {
            option_id: String::from("teleport")
        }
    );
}

#[test]
fn test_assemble_rejects_totals_priced_with_another_option() {
    let options: Vec<ShippingOption> = create_test_options();
    let totals: CheckoutTotals =
        CheckoutTotals::compute(dec!(1000), options[0].cost, dec!(160), dec!(0)).unwrap();

    let result = CheckoutBundle::assemble(
        String::from("cs_1"),
        create_test_saved_address(1, "KE"),
        "domestic-express",
        options,
        totals,
        UrgencyLevel::Expedited,
        7,
        create_test_items(),
    );

    assert!(matches!(
        result,
        Err(DomainError::TotalsMismatch { .. })
    ));
}

#[test]
fn test_bundle_serializes_with_camel_case_keys() {
    let options: Vec<ShippingOption> = create_test_options();
    let totals: CheckoutTotals =
        CheckoutTotals::compute(dec!(1000), options[0].cost, dec!(160), dec!(0)).unwrap();
    let bundle: CheckoutBundle = CheckoutBundle::assemble(
        String::from("cs_1"),
        create_test_saved_address(1, "KE"),
        "domestic-standard",
        options,
        totals,
        UrgencyLevel::Expedited,
        7,
        create_test_items(),
    )
    .unwrap();

    let value: serde_json::Value = serde_json::to_value(&bundle).unwrap();
    assert_eq!(value["sessionId"], "cs_1");
    assert_eq!(value["urgencyLevel"], "EXPEDITED");
    assert_eq!(value["selectedShippingOption"]["id"], "domestic-standard");
    assert!(value["calculatedTotals"].get("estimatedTotal").is_some());
}
