// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, NaiveDate, Utc};
use violeta_domain::{
    FulfillmentStatus, Order, PaymentMethod, PaymentStatus, TaxDocument,
};

use crate::reclassify::{PlannedTransition, plan_sweep};
use crate::tests::helpers::santiago;

fn order_in(
    order_id: i64,
    fulfillment: FulfillmentStatus,
    delivery_at: DateTime<Utc>,
) -> Order {
    Order {
        order_id: Some(order_id),
        order_number: format!("V{order_id:06}"),
        customer_id: 1,
        delivery_at,
        delivery_address: String::from("Av. Vitacura 2900"),
        comuna: None,
        arrangement_price: 25_000,
        delivery_price: 5_000,
        fulfillment,
        payment: PaymentStatus::Pending,
        payment_method: PaymentMethod::Pendiente,
        tax_document: TaxDocument::NotIssued,
        document_number: None,
        photo_url: None,
        is_event: false,
        event_type: None,
        reason: None,
        payment_due_date: NaiveDate::from_ymd_opt(2025, 3, 18).unwrap(),
        created_at: santiago(2025, 3, 1, 10, 0),
        dispatched_at: None,
        archived_at: None,
        cancelled_at: None,
        paid_at: None,
    }
}

#[test]
fn test_sweep_promotes_tomorrow_to_today() {
    // Delivery at 09:00 today, still labelled tomorrow after the clock
    // moved one day.
    let now: DateTime<Utc> = santiago(2025, 3, 5, 6, 0);
    let orders: Vec<Order> = vec![order_in(
        1,
        FulfillmentStatus::Tomorrow,
        santiago(2025, 3, 5, 9, 0),
    )];

    let planned: Vec<PlannedTransition> = plan_sweep(&orders, now);

    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].order_id, 1);
    assert_eq!(planned[0].from, FulfillmentStatus::Tomorrow);
    assert_eq!(planned[0].to, FulfillmentStatus::Today);
}

#[test]
fn test_sweep_promotes_week_plan_through_buckets() {
    let now: DateTime<Utc> = santiago(2025, 3, 5, 6, 0);
    let orders: Vec<Order> = vec![
        order_in(1, FulfillmentStatus::ThisWeekPlan, santiago(2025, 3, 6, 9, 0)),
        order_in(2, FulfillmentStatus::ThisWeekPlan, santiago(2025, 3, 12, 9, 0)),
    ];

    let planned: Vec<PlannedTransition> = plan_sweep(&orders, now);

    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].to, FulfillmentStatus::Tomorrow);
}

#[test]
fn test_sweep_archives_dispatched_past_delivery() {
    let now: DateTime<Utc> = santiago(2025, 3, 6, 6, 0);
    let orders: Vec<Order> = vec![
        order_in(1, FulfillmentStatus::Dispatched, santiago(2025, 3, 5, 14, 0)),
        // Dispatched today stays dispatched until tomorrow.
        order_in(2, FulfillmentStatus::Dispatched, santiago(2025, 3, 6, 9, 0)),
    ];

    let planned: Vec<PlannedTransition> = plan_sweep(&orders, now);

    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].order_id, 1);
    assert_eq!(planned[0].to, FulfillmentStatus::Archived);
}

#[test]
fn test_sweep_ignores_terminal_and_draft_orders() {
    let now: DateTime<Utc> = santiago(2025, 3, 5, 6, 0);
    let orders: Vec<Order> = vec![
        order_in(1, FulfillmentStatus::Archived, santiago(2025, 3, 1, 9, 0)),
        order_in(2, FulfillmentStatus::Cancelled, santiago(2025, 3, 5, 9, 0)),
        order_in(3, FulfillmentStatus::Draft, santiago(2025, 3, 5, 9, 0)),
    ];

    assert!(plan_sweep(&orders, now).is_empty());
}

#[test]
fn test_sweep_is_idempotent_within_a_day() {
    let now: DateTime<Utc> = santiago(2025, 3, 5, 6, 0);
    let mut orders: Vec<Order> = vec![
        order_in(1, FulfillmentStatus::Tomorrow, santiago(2025, 3, 5, 9, 0)),
        order_in(2, FulfillmentStatus::ThisWeekPlan, santiago(2025, 3, 6, 9, 0)),
        order_in(3, FulfillmentStatus::Dispatched, santiago(2025, 3, 4, 14, 0)),
    ];

    let first: Vec<PlannedTransition> = plan_sweep(&orders, now);
    for transition in &first {
        for order in &mut orders {
            if order.order_id == Some(transition.order_id) {
                order.fulfillment = transition.to;
            }
        }
    }

    assert_eq!(first.len(), 3);
    assert!(plan_sweep(&orders, now).is_empty());
}

#[test]
fn test_sweep_skips_unpersisted_orders() {
    let now: DateTime<Utc> = santiago(2025, 3, 5, 6, 0);
    let mut order: Order = order_in(1, FulfillmentStatus::Tomorrow, santiago(2025, 3, 5, 9, 0));
    order.order_id = None;

    assert!(plan_sweep(&[order], now).is_empty());
}
