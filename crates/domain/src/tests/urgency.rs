// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::{DomainError, UrgencyLevel, UrgencyProfile, resolve_multiplier};

#[test]
fn test_multipliers_come_from_fixed_set() {
    let allowed: [Decimal; 4] = [dec!(1), dec!(1.5), dec!(2), dec!(3)];

    for level in UrgencyLevel::ALL {
        let profile: UrgencyProfile = resolve_multiplier(level);
        assert!(
            allowed.contains(&profile.multiplier),
            "{level} resolved to unexpected multiplier {}",
            profile.multiplier
        );
        assert_eq!(profile.level, level);
    }
}

#[test]
fn test_multipliers_match_each_tier() {
    assert_eq!(resolve_multiplier(UrgencyLevel::Normal).multiplier, dec!(1));
    assert_eq!(
        resolve_multiplier(UrgencyLevel::Expedited).multiplier,
        dec!(1.5)
    );
    assert_eq!(resolve_multiplier(UrgencyLevel::Rush).multiplier, dec!(2));
    assert_eq!(
        resolve_multiplier(UrgencyLevel::Emergency).multiplier,
        dec!(3)
    );
}

#[test]
fn test_multipliers_are_monotonic_in_severity() {
    for pair in UrgencyLevel::ALL.windows(2) {
        assert!(pair[0] < pair[1]);
        assert!(resolve_multiplier(pair[0]).multiplier <= resolve_multiplier(pair[1]).multiplier);
    }
}

#[test]
fn test_every_tier_has_distinct_color_tag() {
    let mut tags: Vec<&str> = UrgencyLevel::ALL
        .iter()
        .map(|level| resolve_multiplier(*level).color_tag)
        .collect();
    tags.sort_unstable();
    tags.dedup();
    assert_eq!(tags.len(), 4);
}

#[test]
fn test_urgency_level_parses_case_insensitively() {
    assert_eq!(
        UrgencyLevel::from_str("rush").unwrap(),
        UrgencyLevel::Rush
    );
    assert_eq!(
        UrgencyLevel::from_str(" EXPEDITED ").unwrap(),
        UrgencyLevel::Expedited
    );
}

#[test]
fn test_unknown_urgency_level_is_rejected() {
    let result: Result<UrgencyLevel, DomainError> = UrgencyLevel::from_str("WHENEVER");
    assert_eq!(
        result,
        Err(DomainError::InvalidUrgencyLevel(String::from("WHENEVER")))
    );
}

#[test]
fn test_urgency_level_serializes_in_screaming_case() {
    let json: String = serde_json::to_string(&UrgencyLevel::Emergency).unwrap();
    assert_eq!(json, "\"EMERGENCY\"");
    assert_eq!(UrgencyLevel::default(), UrgencyLevel::Normal);
}
