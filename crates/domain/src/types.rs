// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::labels::{CreditClass, PaymentMethod, TaxDocument};
use crate::status::{FulfillmentStatus, PaymentStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The two kinds of raw material a florist stocks.
///
/// Flowers and containers persist in separate tables for display purposes;
/// everywhere else they share one identifier space via [`MaterialRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// A cut flower (roses, lilies, eucalyptus, ...).
    Flower,
    /// A container (vases, boxes, baskets, ...).
    Container,
}

impl MaterialKind {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flower => "flower",
            Self::Container => "container",
        }
    }
}

impl FromStr for MaterialKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flower" => Ok(Self::Flower),
            "container" => Ok(Self::Container),
            _ => Err(DomainError::Validation {
                field: "material_kind",
                reason: format!("unknown material kind '{s}'"),
            }),
        }
    }
}

impl std::fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compound key addressing one material across the two kind tables.
///
/// `order_materials` and `product_recipes` reference materials
/// polymorphically via `(material_kind, material_id)`; this type is the
/// in-memory form of that key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialRef {
    /// Which kind table the material lives in.
    pub kind: MaterialKind,
    /// The rowid within that table.
    pub id: i64,
}

impl MaterialRef {
    /// Creates a new material reference.
    #[must_use]
    pub const fn new(kind: MaterialKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl std::fmt::Display for MaterialRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A raw material with its stock counters.
///
/// Stock counters are mutated only through the inventory ledger; at
/// quiescence `on_hand >= reserved_for_event` unless an operator has used
/// the overdraw override since the last reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// The rowid within the kind table. `None` before first persistence.
    pub material_id: Option<i64>,
    /// Which kind table the material lives in.
    pub kind: MaterialKind,
    /// Display name (unique per kind).
    pub name: String,
    /// Units currently on hand. May go negative only under the overdraw
    /// override.
    pub on_hand: i64,
    /// Units held for event orders but not yet consumed.
    pub reserved_for_event: i64,
    /// Threshold at or below which the material appears in the low-stock
    /// report.
    pub low_stock_threshold: i64,
    /// Unit cost in Chilean pesos.
    pub unit_cost: i64,
}

impl Material {
    /// Creates a new `Material` without a persisted id.
    #[must_use]
    pub const fn new(
        kind: MaterialKind,
        name: String,
        on_hand: i64,
        low_stock_threshold: i64,
        unit_cost: i64,
    ) -> Self {
        Self {
            material_id: None,
            kind,
            name,
            on_hand,
            reserved_for_event: 0,
            low_stock_threshold,
            unit_cost,
        }
    }

    /// Returns the compound reference for a persisted material.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the material has not been
    /// persisted yet.
    pub fn reference(&self) -> Result<MaterialRef, DomainError> {
        self.material_id
            .map(|id| MaterialRef::new(self.kind, id))
            .ok_or(DomainError::Validation {
                field: "material_id",
                reason: String::from("material has not been persisted"),
            })
    }

    /// Returns whether the material is at or below its low-stock threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.on_hand <= self.low_stock_threshold
    }
}

/// A catalog product (a sellable floral arrangement).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// The rowid. `None` before first persistence.
    pub product_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Catalog category (free-form, e.g. "Ramos", "Coronas").
    pub category: String,
    /// Base retail price in Chilean pesos.
    pub base_price: i64,
    /// Deactivated products stay referenced by historical orders but
    /// disappear from intake.
    pub is_active: bool,
}

impl Product {
    /// Creates a new active `Product` without a persisted id.
    #[must_use]
    pub const fn new(name: String, category: String, base_price: i64) -> Self {
        Self {
            product_id: None,
            name,
            category,
            base_price,
            is_active: true,
        }
    }
}

/// One entry of a product's bill of materials.
///
/// The set of entries for one product is a mapping from material reference
/// to positive quantity; duplicates are a data-integrity breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeEntry {
    /// The owning product.
    pub product_id: i64,
    /// The required material.
    pub material: MaterialRef,
    /// Units of the material per one unit of product. Always positive.
    pub quantity: i64,
}

/// The role an order-material row plays within an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialRole {
    /// Expanded from the product recipe at intake.
    Recipe,
    /// Added manually by the workshop on top of the recipe.
    Extra,
}

impl MaterialRole {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recipe => "recipe",
            Self::Extra => "extra",
        }
    }
}

impl FromStr for MaterialRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recipe" => Ok(Self::Recipe),
            "extra" => Ok(Self::Extra),
            _ => Err(DomainError::Validation {
                field: "material_role",
                reason: format!("unknown material role '{s}'"),
            }),
        }
    }
}

/// A material requirement attached to an order.
///
/// For any given order, each `(material, role)` key appears at most once;
/// the persistence repair routine enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderMaterial {
    /// The required material.
    pub material: MaterialRef,
    /// Units required. Always positive.
    pub quantity: i64,
    /// Whether the row came from the recipe expansion or a manual add.
    pub role: MaterialRole,
}

/// A customer with cached lifetime totals.
///
/// The cached totals are advisory; the authoritative values are recomputed
/// from the set of non-cancelled orders inside every order-modifying
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// The rowid. `None` before first persistence.
    pub customer_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Free-form contact (phone, email).
    pub contact: String,
    /// Credit class determining the payment due-date offset.
    pub credit_class: CreditClass,
    /// Cached count of non-cancelled orders.
    pub total_orders: i64,
    /// Cached sum of arrangement + delivery prices over non-cancelled
    /// orders, in Chilean pesos.
    pub total_spent: i64,
}

impl Customer {
    /// Creates a new `Customer` without a persisted id.
    #[must_use]
    pub const fn new(name: String, contact: String, credit_class: CreditClass) -> Self {
        Self {
            customer_id: None,
            name,
            contact,
            credit_class,
            total_orders: 0,
            total_spent: 0,
        }
    }
}

/// An order moving through the lifecycle engine.
///
/// Three coordinated sub-states evolve independently except that
/// `Cancelled` freezes the other two. The triple always lies within the
/// legal transition graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// The rowid. `None` before first persistence.
    pub order_id: Option<i64>,
    /// Human-readable order number, assigned at persistence time.
    pub order_number: String,
    /// The owning customer.
    pub customer_id: i64,
    /// Delivery datetime (UTC; compared in the business timezone).
    pub delivery_at: DateTime<Utc>,
    /// Delivery street address.
    pub delivery_address: String,
    /// Resolved comuna, when known.
    pub comuna: Option<String>,
    /// Arrangement price in Chilean pesos. Never negative.
    pub arrangement_price: i64,
    /// Delivery price in Chilean pesos. Never negative.
    pub delivery_price: i64,
    /// Fulfillment sub-state.
    pub fulfillment: FulfillmentStatus,
    /// Payment sub-state.
    pub payment: PaymentStatus,
    /// Payment method label.
    pub payment_method: PaymentMethod,
    /// Tax-document sub-state (doubles as the wire label).
    pub tax_document: TaxDocument,
    /// Document number; required once a document is issued.
    pub document_number: Option<String>,
    /// Optional reference photo URL.
    pub photo_url: Option<String>,
    /// Event orders reserve materials instead of consuming them at intake.
    pub is_event: bool,
    /// Event type (e.g. "matrimonio"), when `is_event`.
    pub event_type: Option<String>,
    /// Free-form reason recorded on cancellation or manual edits.
    pub reason: Option<String>,
    /// Payment due date derived from the customer's credit class.
    pub payment_due_date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Set when the order transitions to `Dispatched`.
    pub dispatched_at: Option<DateTime<Utc>>,
    /// Set when the order transitions to `Archived`.
    pub archived_at: Option<DateTime<Utc>>,
    /// Set when the order transitions to `Cancelled`.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Set when the order is marked paid.
    pub paid_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the order's total price (arrangement + delivery).
    #[must_use]
    pub const fn total_price(&self) -> i64 {
        self.arrangement_price + self.delivery_price
    }
}
