// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order reads.

use diesel::prelude::*;
use diesel::SqliteConnection;
use violeta_domain::{FulfillmentStatus, Order, OrderMaterial};

use crate::data_models::{OrderMaterialRow, OrderRow};
use crate::diesel_schema::{order_materials, orders};
use crate::error::PersistenceError;

/// Loads one order by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for a missing order and
/// `PersistenceError::CorruptRow` for a row that fails to map back.
pub fn get_order(conn: &mut SqliteConnection, order_id: i64) -> Result<Order, PersistenceError> {
    let row: OrderRow = orders::table
        .find(order_id)
        .first::<OrderRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("order {order_id}")))?;
    row.try_into_domain()
}

/// Loads the material rows of one order.
///
/// # Errors
///
/// Returns an error if the query fails or a row fails to map back.
pub fn get_order_materials(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Vec<OrderMaterial>, PersistenceError> {
    order_materials::table
        .filter(order_materials::order_id.eq(order_id))
        .order(order_materials::order_material_id.asc())
        .load::<OrderMaterialRow>(conn)?
        .into_iter()
        .map(OrderMaterialRow::try_into_domain)
        .collect()
}

/// Lists the orders in one fulfillment bucket, soonest delivery first.
///
/// # Errors
///
/// Returns an error if the query fails or a row fails to map back.
pub fn list_orders_by_status(
    conn: &mut SqliteConnection,
    status: FulfillmentStatus,
) -> Result<Vec<Order>, PersistenceError> {
    orders::table
        .filter(orders::fulfillment_status.eq(status.as_str()))
        .order(orders::delivery_at.asc())
        .load::<OrderRow>(conn)?
        .into_iter()
        .map(OrderRow::try_into_domain)
        .collect()
}

/// Lists the orders the scheduled sweep may move: the three time buckets
/// plus dispatched orders awaiting archival.
///
/// # Errors
///
/// Returns an error if the query fails or a row fails to map back.
pub fn list_sweepable_orders(
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, PersistenceError> {
    let sweepable: Vec<&str> = vec![
        FulfillmentStatus::ThisWeekPlan.as_str(),
        FulfillmentStatus::Tomorrow.as_str(),
        FulfillmentStatus::Today.as_str(),
        FulfillmentStatus::Dispatched.as_str(),
    ];
    orders::table
        .filter(orders::fulfillment_status.eq_any(sweepable))
        .order(orders::order_id.asc())
        .load::<OrderRow>(conn)?
        .into_iter()
        .map(OrderRow::try_into_domain)
        .collect()
}

/// Lists one customer's orders, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row fails to map back.
pub fn list_orders_for_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Vec<Order>, PersistenceError> {
    orders::table
        .filter(orders::customer_id.eq(customer_id))
        .order(orders::order_id.desc())
        .load::<OrderRow>(conn)?
        .into_iter()
        .map(OrderRow::try_into_domain)
        .collect()
}
