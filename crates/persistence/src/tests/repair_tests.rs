// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use violeta_domain::Customer;

use crate::diesel_schema::customers;
use crate::mutations::RepairReport;
use crate::tests::helpers::{
    create_order, create_test_intake, new_store, santiago, seed_customer, seed_product, seed_rose,
};
use crate::Persistence;

#[test]
fn test_repair_on_clean_store_reports_nothing_removed() {
    let mut store: Persistence = new_store();
    seed_customer(&mut store);

    let report: RepairReport = store.repair_integrity().unwrap();

    assert_eq!(report.duplicate_recipes_removed, 0);
    assert_eq!(report.duplicate_order_materials_removed, 0);
    assert_eq!(report.customers_rebuilt, 1);
}

#[test]
fn test_repair_rebuilds_drifted_customer_totals() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);
    create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        santiago(2025, 3, 3, 9, 0),
    );

    // Simulate drift from a write outside the transactional path.
    diesel::update(customers::table.find(customer_id))
        .set((
            customers::total_orders.eq(9),
            customers::total_spent.eq(999_999),
        ))
        .execute(&mut store.conn)
        .unwrap();

    store.repair_integrity().unwrap();

    let customer: Customer = store.get_customer(customer_id).unwrap();
    assert_eq!(customer.total_orders, 1);
    assert_eq!(customer.total_spent, 30_000);
}
