// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use violeta_domain::{FulfillmentStatus, Order, is_past_delivery, phase_of};

/// One transition the sweep intends to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedTransition {
    /// The order to move.
    pub order_id: i64,
    /// The phase the order currently holds.
    pub from: FulfillmentStatus,
    /// The phase the order must move to.
    pub to: FulfillmentStatus,
}

/// Plans the daily reclassification sweep.
///
/// Orders in a time bucket whose classification against the current clock
/// differs are moved to the new bucket; dispatched orders whose delivery
/// date has passed are archived. Orders without a persisted id are
/// skipped. The plan is empty when run a second time after its transitions
/// have been applied, which makes the sweep idempotent within a local day.
#[must_use]
pub fn plan_sweep(orders: &[Order], now: DateTime<Utc>) -> Vec<PlannedTransition> {
    let mut planned: Vec<PlannedTransition> = Vec::new();
    for order in orders {
        let Some(order_id) = order.order_id else {
            continue;
        };
        if order.fulfillment.is_time_bucket() {
            let target: FulfillmentStatus = phase_of(order.delivery_at, now);
            if target != order.fulfillment {
                planned.push(PlannedTransition {
                    order_id,
                    from: order.fulfillment,
                    to: target,
                });
            }
        } else if order.fulfillment == FulfillmentStatus::Dispatched
            && is_past_delivery(order.delivery_at, now)
        {
            planned.push(PlannedTransition {
                order_id,
                from: order.fulfillment,
                to: FulfillmentStatus::Archived,
            });
        }
    }
    planned
}
