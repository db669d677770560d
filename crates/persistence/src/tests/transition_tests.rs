// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use violeta::Command;
use violeta_domain::{
    Customer, FulfillmentStatus, Material, MaterialRef, Order, OrderMaterial, PaymentMethod,
    PaymentStatus,
};

use crate::error::PersistenceError;
use crate::mutations::PersistedOrder;
use crate::tests::helpers::{
    apply_command, create_order, create_test_intake, new_store, santiago, seed_customer,
    seed_product, seed_rose,
};
use crate::Persistence;

#[test]
fn test_create_order_assigns_sequential_numbers() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);
    let now: DateTime<Utc> = santiago(2025, 3, 3, 9, 0);

    let first: PersistedOrder = create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        now,
    );
    let second: PersistedOrder = create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 6, 11, 0)),
        now,
    );

    assert_eq!(first.order_number, "V000001");
    assert_eq!(second.order_number, "V000002");
    assert_eq!(
        store.get_order(first.order_id).unwrap().order_number,
        "V000001"
    );
}

#[test]
fn test_create_order_consumes_stock_and_rolls_up_customer() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);

    create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        santiago(2025, 3, 3, 9, 0),
    );

    let stock: Material = store.get_material(rose).unwrap();
    assert_eq!(stock.on_hand, 38);

    let customer: Customer = store.get_customer(customer_id).unwrap();
    assert_eq!(customer.total_orders, 1);
    assert_eq!(customer.total_spent, 30_000);
}

#[test]
fn test_order_round_trips_through_the_store() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);
    let delivery_at: DateTime<Utc> = santiago(2025, 3, 5, 11, 0);

    let persisted: PersistedOrder = create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, delivery_at),
        santiago(2025, 3, 3, 9, 0),
    );

    let order: Order = store.get_order(persisted.order_id).unwrap();
    assert_eq!(order.delivery_at, delivery_at);
    assert_eq!(order.fulfillment, FulfillmentStatus::ThisWeekPlan);
    assert_eq!(order.payment, PaymentStatus::Pending);
    assert_eq!(order.total_price(), 30_000);
    assert_eq!(order.payment_due_date.to_string(), "2025-03-18");

    let rows: Vec<OrderMaterial> = store.get_order_materials(persisted.order_id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].material, rose);
    assert_eq!(rows[0].quantity, 12);
}

#[test]
fn test_cancel_restores_stock_and_rollup() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);

    let persisted: PersistedOrder = create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        santiago(2025, 3, 3, 9, 0),
    );
    apply_command(
        &mut store,
        persisted.order_id,
        Command::Cancel {
            reason: String::from("cliente canceló"),
        },
        santiago(2025, 3, 4, 10, 0),
    );

    let stock: Material = store.get_material(rose).unwrap();
    assert_eq!(stock.on_hand, 50);

    let customer: Customer = store.get_customer(customer_id).unwrap();
    assert_eq!(customer.total_orders, 0);
    assert_eq!(customer.total_spent, 0);

    let order: Order = store.get_order(persisted.order_id).unwrap();
    assert_eq!(order.fulfillment, FulfillmentStatus::Cancelled);
    assert!(order.cancelled_at.is_some());
}

#[test]
fn test_mark_paid_updates_existing_row() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);

    let persisted: PersistedOrder = create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        santiago(2025, 3, 3, 9, 0),
    );
    apply_command(
        &mut store,
        persisted.order_id,
        Command::MarkPaid {
            method: PaymentMethod::TransferenciaBice,
        },
        santiago(2025, 3, 4, 10, 0),
    );

    let order: Order = store.get_order(persisted.order_id).unwrap();
    assert_eq!(order.payment, PaymentStatus::Paid);
    assert_eq!(order.payment_method, PaymentMethod::TransferenciaBice);
    assert!(order.paid_at.is_some());
    assert_eq!(order.order_number, "V000001");
}

#[test]
fn test_list_orders_by_status_and_sweepable() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);

    let persisted: PersistedOrder = create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        santiago(2025, 3, 3, 9, 0),
    );

    let bucket: Vec<Order> = store
        .list_orders_by_status(FulfillmentStatus::ThisWeekPlan)
        .unwrap();
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[0].order_id, Some(persisted.order_id));

    let sweepable: Vec<Order> = store.list_sweepable_orders().unwrap();
    assert_eq!(sweepable.len(), 1);

    assert!(store
        .list_orders_by_status(FulfillmentStatus::Today)
        .unwrap()
        .is_empty());
}

#[test]
fn test_list_orders_for_customer_newest_first() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);
    let now: DateTime<Utc> = santiago(2025, 3, 3, 9, 0);

    create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        now,
    );
    create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 6, 11, 0)),
        now,
    );

    let orders: Vec<Order> = store.list_orders_for_customer(customer_id).unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_number, "V000002");
    assert_eq!(orders[1].order_number, "V000001");
}

#[test]
fn test_get_missing_order_is_not_found() {
    let mut store: Persistence = new_store();

    let result: Result<Order, PersistenceError> = store.get_order(999);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}
