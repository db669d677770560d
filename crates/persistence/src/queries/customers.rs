// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer reads.

use diesel::prelude::*;
use diesel::SqliteConnection;
use violeta_domain::Customer;

use crate::data_models::CustomerRow;
use crate::diesel_schema::customers;
use crate::error::PersistenceError;

/// Loads one customer by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for a missing customer.
pub fn get_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Customer, PersistenceError> {
    let row: CustomerRow = customers::table
        .find(customer_id)
        .first::<CustomerRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("customer {customer_id}")))?;
    row.try_into_domain()
}

/// Lists every customer, alphabetically.
///
/// # Errors
///
/// Returns an error if the query fails or a row fails to map back.
pub fn list_customers(conn: &mut SqliteConnection) -> Result<Vec<Customer>, PersistenceError> {
    customers::table
        .order(customers::name.asc())
        .load::<CustomerRow>(conn)?
        .into_iter()
        .map(CustomerRow::try_into_domain)
        .collect()
}
