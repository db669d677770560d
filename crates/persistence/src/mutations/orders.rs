// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order persistence.
//!
//! `persist_transition` is the single write path for engine results. It
//! encloses the order upsert, the material counter updates, and the
//! customer roll-up in one transaction; the audit record is appended by
//! the caller only after the transaction commits.

use diesel::dsl::count_star;
use diesel::sql_types::{BigInt, Nullable};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use violeta::TransitionResult;
use violeta_domain::{Material, MaterialKind};

use crate::data_models::{NewOrderMaterialRow, OrderRecord};
use crate::diesel_schema::{containers, customers, flowers, order_materials, orders};
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Identity assigned to a persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOrder {
    /// The rowid of the order.
    pub order_id: i64,
    /// The human-readable order number.
    pub order_number: String,
}

/// Persists an engine transition in one transaction.
///
/// Inserts or updates the order, replaces its material rows, writes the
/// mutated stock counters, and recomputes the customer roll-up. A failure
/// at any step rolls the whole transaction back.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistedOrder, PersistenceError> {
    conn.transaction::<PersistedOrder, PersistenceError, _>(|conn| {
        let record: OrderRecord = OrderRecord::from_domain(&result.order);
        let persisted: PersistedOrder = if let Some(order_id) = result.order.order_id {
            diesel::update(orders::table.find(order_id))
                .set(&record)
                .execute(conn)?;
            PersistedOrder {
                order_id,
                order_number: result.order.order_number.clone(),
            }
        } else {
            diesel::insert_into(orders::table)
                .values(&record)
                .execute(conn)?;
            let order_id: i64 = get_last_insert_rowid(conn)?;
            let order_number: String = format!("V{order_id:06}");
            diesel::update(orders::table.find(order_id))
                .set(orders::order_number.eq(&order_number))
                .execute(conn)?;
            PersistedOrder {
                order_id,
                order_number,
            }
        };

        diesel::delete(order_materials::table.filter(order_materials::order_id.eq(persisted.order_id)))
            .execute(conn)?;
        for row in &result.order_materials {
            diesel::insert_into(order_materials::table)
                .values(NewOrderMaterialRow::from_domain(persisted.order_id, row))
                .execute(conn)?;
        }

        for material in &result.materials {
            write_material_counters(conn, material)?;
        }

        recompute_customer_rollup(conn, result.order.customer_id)?;

        debug!(
            "Persisted order {} ({})",
            persisted.order_id, persisted.order_number
        );
        Ok(persisted)
    })
}

/// Writes the stock counters of one material row.
///
/// # Errors
///
/// Returns an error if the material has no persisted id or the write
/// fails.
pub fn write_material_counters(
    conn: &mut SqliteConnection,
    material: &Material,
) -> Result<(), PersistenceError> {
    let material_id: i64 = material.material_id.ok_or_else(|| {
        PersistenceError::NotFound(format!("material '{}' has no id", material.name))
    })?;
    let updated: usize = match material.kind {
        MaterialKind::Flower => diesel::update(flowers::table.find(material_id))
            .set((
                flowers::on_hand.eq(material.on_hand),
                flowers::reserved_for_event.eq(material.reserved_for_event),
            ))
            .execute(conn)?,
        MaterialKind::Container => diesel::update(containers::table.find(material_id))
            .set((
                containers::on_hand.eq(material.on_hand),
                containers::reserved_for_event.eq(material.reserved_for_event),
            ))
            .execute(conn)?,
    };
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "material {}:{material_id}",
            material.kind
        )));
    }
    Ok(())
}

/// Recomputes a customer's cached lifetime totals from their orders.
///
/// The authoritative values are the count and the sum of
/// `arrangement_price + delivery_price` over non-cancelled orders.
///
/// # Errors
///
/// Returns an error if the aggregate query or the update fails.
pub fn recompute_customer_rollup(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<(), PersistenceError> {
    let (total_orders, total_spent): (i64, Option<i64>) = orders::table
        .filter(orders::customer_id.eq(customer_id))
        .filter(orders::fulfillment_status.ne("cancelled"))
        .select((
            count_star(),
            // diesel types SUM(BigInt) as Nullable<Numeric>, which SQLite
            // cannot deserialize to i64; SQLite's integer SUM is an integer.
            diesel::dsl::sql::<Nullable<BigInt>>("SUM(arrangement_price + delivery_price)"),
        ))
        .first(conn)?;

    diesel::update(customers::table.find(customer_id))
        .set((
            customers::total_orders.eq(total_orders),
            customers::total_spent.eq(total_spent.unwrap_or(0)),
        ))
        .execute(conn)?;
    Ok(())
}
