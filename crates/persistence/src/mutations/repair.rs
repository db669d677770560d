// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Integrity repair for databases that predate the unique constraints.
//!
//! Older databases could accumulate duplicate recipe and order-material
//! rows, and customer totals drifted when orders were edited outside the
//! transactional write path. The repair pass removes the duplicates and
//! rebuilds every customer roll-up from the orders table.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::diesel_schema::customers;
use crate::error::PersistenceError;
use crate::mutations::orders::recompute_customer_rollup;

/// Summary of one integrity repair pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepairReport {
    /// Duplicate recipe rows removed.
    pub duplicate_recipes_removed: usize,
    /// Duplicate order-material rows removed.
    pub duplicate_order_materials_removed: usize,
    /// Customers whose cached totals were rebuilt.
    pub customers_rebuilt: usize,
}

/// Runs the repair pass in one transaction.
///
/// # Errors
///
/// Returns an error if any of the cleanup statements fail.
pub fn repair_integrity(conn: &mut SqliteConnection) -> Result<RepairReport, PersistenceError> {
    conn.transaction::<RepairReport, PersistenceError, _>(|conn| {
        // Greatest quantity wins within each duplicate group; ties keep the
        // oldest row. NOTE: windowed dedupe is not expressible in the diesel
        // DSL, so this is justified raw SQL.
        let duplicate_recipes_removed: usize = diesel::sql_query(
            "DELETE FROM product_recipes WHERE recipe_id NOT IN \
             (SELECT recipe_id FROM \
               (SELECT recipe_id, ROW_NUMBER() OVER \
                 (PARTITION BY product_id, material_kind, material_id \
                  ORDER BY quantity DESC, recipe_id ASC) AS rn \
                FROM product_recipes) \
              WHERE rn = 1)",
        )
        .execute(conn)?;

        let duplicate_order_materials_removed: usize = diesel::sql_query(
            "DELETE FROM order_materials WHERE order_material_id NOT IN \
             (SELECT order_material_id FROM \
               (SELECT order_material_id, ROW_NUMBER() OVER \
                 (PARTITION BY order_id, material_kind, material_id, role \
                  ORDER BY quantity DESC, order_material_id ASC) AS rn \
                FROM order_materials) \
              WHERE rn = 1)",
        )
        .execute(conn)?;

        let customer_ids: Vec<i64> = customers::table
            .select(customers::customer_id)
            .load(conn)?;
        for customer_id in &customer_ids {
            recompute_customer_rollup(conn, *customer_id)?;
        }

        let report: RepairReport = RepairReport {
            duplicate_recipes_removed,
            duplicate_order_materials_removed,
            customers_rebuilt: customer_ids.len(),
        };
        info!(
            "Repair pass removed {} recipe and {} order-material duplicates, rebuilt {} customers",
            report.duplicate_recipes_removed,
            report.duplicate_order_materials_removed,
            report.customers_rebuilt
        );
        Ok(report)
    })
}
