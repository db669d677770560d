// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::labels::CreditClass;
use crate::phase::add_days;
use crate::status::FulfillmentStatus;
use crate::types::Order;
use chrono::NaiveDate;

/// Computes the payment due date for an order placed on `order_date`.
#[must_use]
pub fn due_date(order_date: NaiveDate, class: CreditClass) -> NaiveDate {
    add_days(order_date, class.credit_days())
}

/// Recomputes a customer's lifetime totals from their orders.
///
/// Cancelled orders are excluded. Returns `(total_orders, total_spent)`.
/// This is the authoritative computation; cached values on the customer
/// row are advisory.
#[must_use]
pub fn compute_customer_totals(orders: &[Order]) -> (i64, i64) {
    let mut total_orders: i64 = 0;
    let mut total_spent: i64 = 0;
    for order in orders {
        if order.fulfillment == FulfillmentStatus::Cancelled {
            continue;
        }
        total_orders += 1;
        total_spent += order.total_price();
    }
    (total_orders, total_spent)
}
