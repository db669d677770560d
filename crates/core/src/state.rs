// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use violeta_audit::AuditRecord;
use violeta_domain::{Customer, Material, Order, OrderMaterial, Product, RecipeEntry};

/// The slice of store state a single command operates on.
///
/// The caller loads the context inside the enclosing transaction, applies
/// the command against it, and persists the resulting rows before commit.
/// The engine itself never touches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderContext {
    /// The ordering customer.
    pub customer: Customer,
    /// The chosen product and its recipe entries. Required for
    /// `CreateOrder`, ignored otherwise.
    pub product: Option<(Product, Vec<RecipeEntry>)>,
    /// The existing order. `None` for `CreateOrder`.
    pub order: Option<Order>,
    /// The existing order's material rows.
    pub order_materials: Vec<OrderMaterial>,
    /// Every material the command may touch, with current stock counters.
    pub materials: Vec<Material>,
    /// The wall clock the command is evaluated against.
    pub now: DateTime<Utc>,
}

impl OrderContext {
    /// Creates a context for a brand-new order.
    #[must_use]
    pub const fn for_intake(
        customer: Customer,
        product: Product,
        recipe: Vec<RecipeEntry>,
        materials: Vec<Material>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            customer,
            product: Some((product, recipe)),
            order: None,
            order_materials: Vec::new(),
            materials,
            now,
        }
    }

    /// Creates a context for a command against an existing order.
    #[must_use]
    pub const fn for_order(
        customer: Customer,
        order: Order,
        order_materials: Vec<OrderMaterial>,
        materials: Vec<Material>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            customer,
            product: None,
            order: Some(order),
            order_materials,
            materials,
            now,
        }
    }
}

/// The outcome of a successfully applied command.
///
/// Carries every row the caller must persist inside the enclosing
/// transaction, plus the audit record to append after commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The order as it must be persisted.
    pub order: Order,
    /// The order's material rows as they must be persisted.
    pub order_materials: Vec<OrderMaterial>,
    /// Materials whose stock counters changed.
    pub materials: Vec<Material>,
    /// The audit record describing the transition.
    pub audit: AuditRecord,
}
