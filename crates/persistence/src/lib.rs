// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Violeta order lifecycle engine.
//!
//! This crate stores orders, catalog entities, users, and the audit log in
//! `SQLite` via Diesel. The engine in the `violeta` crate stays pure; this
//! crate loads the context it needs and persists the `TransitionResult` it
//! produces, with the order upsert, material counters, and customer
//! roll-up enclosed in one transaction.
//!
//! ## Write discipline
//!
//! - `persist_transition` is the only write path for engine results.
//! - The audit log is append-only and written after the business
//!   transaction commits; the API layer swallows audit failures.
//! - Catalog and user mutations are individually validated and go through
//!   their own functions.
//!
//! ## Testing
//!
//! Tests run against unique shared in-memory `SQLite` databases, one per
//! `new_in_memory()` call, so they are fast, deterministic, and isolated.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use violeta::TransitionResult;
use violeta_audit::{AuditFilter, AuditRecord};
use violeta_domain::{
    Customer, FulfillmentStatus, Material, MaterialKind, MaterialRef, Order, OrderMaterial,
    Product, RecipeEntry,
};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, so
/// tests are isolated without time-based collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::UserData;
pub use error::PersistenceError;
pub use mutations::{PersistedOrder, RepairReport};

/// Persistence adapter over one `SQLite` connection.
///
/// The adapter is single-writer by construction: callers that share it
/// across tasks wrap it in a mutex, which also guarantees that loading a
/// context and persisting the resulting transition never interleave with
/// another write.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter backed by an in-memory database.
    ///
    /// Uses a unique shared in-memory database per call via an atomic
    /// counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter backed by a database file.
    ///
    /// Enables WAL mode for better read concurrency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Transitions & Audit
    // ========================================================================

    /// Persists an engine transition in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; the transaction rolls back.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistedOrder, PersistenceError> {
        mutations::orders::persist_transition(&mut self.conn, result)
    }

    /// Appends one record to the audit log.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn append_audit(&mut self, record: &AuditRecord) -> Result<i64, PersistenceError> {
        mutations::audit::append_audit(&mut self.conn, record)
    }

    /// Queries the audit log, newest first, paged and capped.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn query_audit(
        &mut self,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditRecord>, PersistenceError> {
        queries::audit::query_audit(&mut self.conn, filter)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Loads one order by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is missing or its row is corrupt.
    pub fn get_order(&mut self, order_id: i64) -> Result<Order, PersistenceError> {
        queries::orders::get_order(&mut self.conn, order_id)
    }

    /// Loads the material rows of one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_order_materials(
        &mut self,
        order_id: i64,
    ) -> Result<Vec<OrderMaterial>, PersistenceError> {
        queries::orders::get_order_materials(&mut self.conn, order_id)
    }

    /// Lists the orders in one fulfillment bucket, soonest delivery first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_orders_by_status(
        &mut self,
        status: FulfillmentStatus,
    ) -> Result<Vec<Order>, PersistenceError> {
        queries::orders::list_orders_by_status(&mut self.conn, status)
    }

    /// Lists the orders the scheduled sweep may move.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sweepable_orders(&mut self) -> Result<Vec<Order>, PersistenceError> {
        queries::orders::list_sweepable_orders(&mut self.conn)
    }

    /// Lists one customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_orders_for_customer(
        &mut self,
        customer_id: i64,
    ) -> Result<Vec<Order>, PersistenceError> {
        queries::orders::list_orders_for_customer(&mut self.conn, customer_id)
    }

    // ========================================================================
    // Materials
    // ========================================================================

    /// Creates a material in its kind table.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the insert fails.
    pub fn create_material(&mut self, material: &Material) -> Result<i64, PersistenceError> {
        mutations::catalog::create_material(&mut self.conn, material)
    }

    /// Updates a material's attributes and counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the material is missing or validation fails.
    pub fn update_material(&mut self, material: &Material) -> Result<(), PersistenceError> {
        mutations::catalog::update_material(&mut self.conn, material)
    }

    /// Adds stock to a material.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive quantity or a missing material.
    pub fn restock_material(
        &mut self,
        reference: MaterialRef,
        quantity: i64,
    ) -> Result<(), PersistenceError> {
        mutations::catalog::restock_material(&mut self.conn, reference, quantity)
    }

    /// Deletes a material unless a live order still references it.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StillReferenced` when a non-terminal
    /// order needs the material.
    pub fn delete_material(&mut self, reference: MaterialRef) -> Result<(), PersistenceError> {
        mutations::catalog::delete_material(&mut self.conn, reference)
    }

    /// Loads one material by reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the material is missing.
    pub fn get_material(&mut self, reference: MaterialRef) -> Result<Material, PersistenceError> {
        queries::catalog::get_material(&mut self.conn, reference)
    }

    /// Loads a set of materials by reference, in the order given.
    ///
    /// # Errors
    ///
    /// Returns an error for the first missing material.
    pub fn get_materials(
        &mut self,
        references: &[MaterialRef],
    ) -> Result<Vec<Material>, PersistenceError> {
        queries::catalog::get_materials(&mut self.conn, references)
    }

    /// Finds a material of one kind by exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_material_by_name(
        &mut self,
        kind: MaterialKind,
        name: &str,
    ) -> Result<Option<Material>, PersistenceError> {
        queries::catalog::find_material_by_name(&mut self.conn, kind, name)
    }

    /// Lists every material of one kind, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_materials(
        &mut self,
        kind: MaterialKind,
    ) -> Result<Vec<Material>, PersistenceError> {
        queries::catalog::list_materials(&mut self.conn, kind)
    }

    /// Lists every material at or below its low-stock threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_low_stock(&mut self) -> Result<Vec<Material>, PersistenceError> {
        queries::catalog::list_low_stock(&mut self.conn)
    }

    // ========================================================================
    // Products & Recipes
    // ========================================================================

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the insert fails.
    pub fn create_product(&mut self, product: &Product) -> Result<i64, PersistenceError> {
        mutations::catalog::create_product(&mut self.conn, product)
    }

    /// Updates a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing or validation fails.
    pub fn update_product(&mut self, product: &Product) -> Result<(), PersistenceError> {
        mutations::catalog::update_product(&mut self.conn, product)
    }

    /// Replaces a product's recipe with a new set of entries.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate material keys or non-positive
    /// quantities.
    pub fn set_recipe(
        &mut self,
        product_id: i64,
        entries: &[RecipeEntry],
    ) -> Result<(), PersistenceError> {
        mutations::catalog::set_recipe(&mut self.conn, product_id, entries)
    }

    /// Loads one product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing.
    pub fn get_product(&mut self, product_id: i64) -> Result<Product, PersistenceError> {
        queries::catalog::get_product(&mut self.conn, product_id)
    }

    /// Lists products, optionally restricted to active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_products(&mut self, only_active: bool) -> Result<Vec<Product>, PersistenceError> {
        queries::catalog::list_products(&mut self.conn, only_active)
    }

    /// Loads a product's recipe entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_recipe(&mut self, product_id: i64) -> Result<Vec<RecipeEntry>, PersistenceError> {
        queries::catalog::get_recipe(&mut self.conn, product_id)
    }

    // ========================================================================
    // Customers
    // ========================================================================

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the insert fails.
    pub fn create_customer(&mut self, customer: &Customer) -> Result<i64, PersistenceError> {
        mutations::catalog::create_customer(&mut self.conn, customer)
    }

    /// Updates a customer's attributes (not the cached totals).
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is missing or validation fails.
    pub fn update_customer(&mut self, customer: &Customer) -> Result<(), PersistenceError> {
        mutations::catalog::update_customer(&mut self.conn, customer)
    }

    /// Deletes a customer unless any order references them.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StillReferenced` when the customer has
    /// orders.
    pub fn delete_customer(&mut self, customer_id: i64) -> Result<(), PersistenceError> {
        mutations::catalog::delete_customer(&mut self.conn, customer_id)
    }

    /// Loads one customer by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is missing.
    pub fn get_customer(&mut self, customer_id: i64) -> Result<Customer, PersistenceError> {
        queries::customers::get_customer(&mut self.conn, customer_id)
    }

    /// Lists every customer, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_customers(&mut self) -> Result<Vec<Customer>, PersistenceError> {
        queries::customers::list_customers(&mut self.conn)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a user with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown role, a short password, or a
    /// duplicate login.
    pub fn create_user(
        &mut self,
        login: &str,
        password: &str,
        display_name: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, login, password, display_name, role)
    }

    /// Activates or deactivates a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist.
    pub fn set_user_active(
        &mut self,
        user_id: i64,
        is_active: bool,
    ) -> Result<(), PersistenceError> {
        mutations::users::set_user_active(&mut self.conn, user_id, is_active)
    }

    /// Verifies a login and stamps the last-login time.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidCredentials` for an unknown
    /// login, an inactive user, or a wrong password.
    pub fn verify_login(
        &mut self,
        login: &str,
        password: &str,
    ) -> Result<UserData, PersistenceError> {
        mutations::users::verify_login(&mut self.conn, login, password)
    }

    /// Loads one user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is missing.
    pub fn get_user(&mut self, user_id: i64) -> Result<UserData, PersistenceError> {
        queries::users::get_user(&mut self.conn, user_id)
    }

    /// Lists every user, by login.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&mut self) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users(&mut self.conn)
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Runs the integrity repair pass in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any cleanup statement fails.
    pub fn repair_integrity(&mut self) -> Result<RepairReport, PersistenceError> {
        mutations::repair::repair_integrity(&mut self.conn)
    }
}
