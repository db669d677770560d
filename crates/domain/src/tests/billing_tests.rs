// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::billing::{compute_customer_totals, due_date};
use crate::labels::CreditClass;
use crate::status::FulfillmentStatus;
use crate::tests::helpers::{create_test_order, santiago};
use crate::types::Order;
use chrono::NaiveDate;

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

#[test]
fn test_due_date_per_credit_class() {
    let order_date: NaiveDate = march(3);

    assert_eq!(due_date(order_date, CreditClass::Nuevo), march(3));
    assert_eq!(due_date(order_date, CreditClass::Fiel), march(18));
    assert_eq!(
        due_date(order_date, CreditClass::Cumplidor),
        NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()
    );
    assert_eq!(due_date(order_date, CreditClass::NoCumplidor), march(3));
    assert_eq!(
        due_date(order_date, CreditClass::Vip),
        NaiveDate::from_ymd_opt(2025, 4, 17).unwrap()
    );
    assert_eq!(due_date(order_date, CreditClass::Ocasional), march(10));
}

#[test]
fn test_cumplidor_due_date_crosses_month_boundary() {
    assert_eq!(
        due_date(march(15), CreditClass::Cumplidor),
        NaiveDate::from_ymd_opt(2025, 4, 14).unwrap()
    );
}

#[test]
fn test_totals_exclude_cancelled_orders() {
    let mut paid: Order = create_test_order(1, santiago(2025, 3, 5, 14, 0));
    paid.arrangement_price = 25_000;
    paid.delivery_price = 5_000;
    let mut cancelled: Order = create_test_order(1, santiago(2025, 3, 6, 14, 0));
    cancelled.arrangement_price = 100_000;
    cancelled.fulfillment = FulfillmentStatus::Cancelled;

    let (total_orders, total_spent): (i64, i64) =
        compute_customer_totals(&[paid, cancelled]);

    assert_eq!(total_orders, 1);
    assert_eq!(total_spent, 30_000);
}

#[test]
fn test_totals_for_no_orders_are_zero() {
    assert_eq!(compute_customer_totals(&[]), (0, 0));
}
