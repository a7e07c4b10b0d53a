// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use crate::tests::{create_test_customer, create_test_persistence};

#[test]
fn test_migrations_create_every_table() {
    let mut persistence: Persistence = create_test_persistence();

    let tables: Vec<String> = persistence.list_tables().unwrap();

    assert_eq!(
        tables,
        vec![
            "addresses",
            "auth_sessions",
            "checkout_bundles",
            "checkout_sessions",
            "customers"
        ]
    );
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());

    // An auth session for a customer that does not exist violates the FK.
    let result = persistence.create_auth_session("token", 999, "2099-01-01T00:00:00Z");
    assert!(result.is_err());
}

#[test]
fn test_in_memory_instances_are_isolated() {
    let mut db1: Persistence = create_test_persistence();
    let mut db2: Persistence = create_test_persistence();

    create_test_customer(&mut db1);

    assert_eq!(db1.count_customers().unwrap(), 1);
    assert_eq!(db2.count_customers().unwrap(), 0);
}
