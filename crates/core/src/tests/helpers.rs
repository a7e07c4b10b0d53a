// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Actor, CheckoutFlowState, Command, Effect, TransitionResult, apply};
use merch_checkout_domain::{
    Address, AddressType, CartItem, CheckoutTotals, SavedAddress, ShippingOption,
    ShippingRateTable, UrgencyLevel,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("7"), String::from("customer"))
}

pub fn create_test_address() -> Address {
    Address {
        recipient_name: String::from("Wanjiru Kamau"),
        company_name: None,
        street: String::from("14 Moi Avenue"),
        street2: None,
        city: String::from("Nairobi"),
        state: None,
        postal_code: String::from("00100"),
        country: String::from("KE"),
        phone: Some(String::from("+254 712 345678")),
    }
}

pub fn create_test_saved_address(address_id: i64) -> SavedAddress {
    SavedAddress {
        address_id,
        customer_id: 7,
        address_type: AddressType::Shipping,
        is_default: true,
        address: create_test_address(),
    }
}

pub fn create_test_items() -> Vec<CartItem> {
    vec![CartItem {
        product_id: String::from("hoodie-grey-m"),
        name: String::from("Crew Hoodie"),
        quantity: 2,
        unit_price: dec!(500.00),
        customization: None,
    }]
}

pub fn create_test_state() -> CheckoutFlowState {
    CheckoutFlowState::new(String::from("cs_test"), 7, create_test_items())
}

pub fn create_test_options(address: &Address, urgency: UrgencyLevel) -> Vec<ShippingOption> {
    ShippingRateTable::default()
        .quote(address, urgency, dec!(1000))
        .unwrap()
}

/// Totals as the calculator reports them, priced with the first option.
pub fn create_test_totals(options: &[ShippingOption]) -> CheckoutTotals {
    let shipping: Decimal = options.first().map_or(Decimal::ZERO, |o| o.cost);
    CheckoutTotals::compute(dec!(1000), shipping, dec!(160), dec!(0)).unwrap()
}

pub fn step(state: &CheckoutFlowState, command: Command) -> TransitionResult {
    apply(state, command, create_test_actor()).unwrap()
}

pub fn pending_seq(result: &TransitionResult) -> u64 {
    match &result.effect {
        Some(Effect::CalculateShipping { seq, .. }) => *seq,
        other => panic!("expected a shipping calculation, got {other:?}"),
    }
}

/// Drives a fresh flow to `SelectingOption` with domestic options quoted.
pub fn create_quoted_state() -> CheckoutFlowState {
    let selected: TransitionResult = step(
        &create_test_state(),
        Command::SelectAddress {
            address: create_test_saved_address(1),
        },
    );
    let seq: u64 = pending_seq(&selected);
    let options: Vec<ShippingOption> =
        create_test_options(&create_test_address(), UrgencyLevel::Normal);
    let totals: CheckoutTotals = create_test_totals(&options);

    step(
        &selected.new_state,
        Command::ShippingCalculated {
            seq,
            options,
            totals,
        },
    )
    .new_state
}
