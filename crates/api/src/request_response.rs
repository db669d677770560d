// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Api request and response data transfer objects.
//!
//! DTOs are distinct from domain types and represent the api contract.
//! Label and status fields travel as strings: requests carry the wire
//! labels the domain enumerations parse, responses carry both the
//! persistence token and the display label where the back office needs
//! them.

use violeta_domain::{Customer, Material, Order, OrderMaterial, Product, RecipeEntry};
use violeta_persistence::UserData;

/// Api request to log in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// The login name.
    pub login: String,
    /// The password.
    pub password: String,
}

/// Api response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The user's id.
    pub user_id: i64,
    /// The login name.
    pub login: String,
    /// The display name.
    pub display_name: String,
    /// The role label.
    pub role: String,
}

/// Api request to create an order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateOrderRequest {
    /// The ordering customer.
    pub customer_id: i64,
    /// The chosen product.
    pub product_id: i64,
    /// How many units of the product the arrangement contains.
    pub quantity: i64,
    /// Delivery timestamp, RFC 3339 or a naive local datetime.
    pub delivery_at: String,
    /// Delivery street address.
    pub delivery_address: String,
    /// Comuna, when known.
    pub comuna: Option<String>,
    /// Arrangement price in Chilean pesos.
    pub arrangement_price: i64,
    /// Delivery price; omitted means look the comuna up in the business
    /// configuration.
    pub delivery_price: Option<i64>,
    /// Payment method label.
    pub payment_method: String,
    /// Tax document label.
    pub tax_document: String,
    /// Optional reference photo URL.
    pub photo_url: Option<String>,
    /// Event orders reserve materials instead of consuming them.
    #[serde(default)]
    pub is_event: bool,
    /// Event type, required when `is_event`.
    pub event_type: Option<String>,
}

/// One material row of an order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderMaterialInfo {
    /// Material kind: `flower` or `container`.
    pub kind: String,
    /// The material id within its kind table.
    pub material_id: i64,
    /// Units of the material.
    pub quantity: i64,
    /// Row role: `recipe` or `extra`.
    pub role: String,
}

impl OrderMaterialInfo {
    #[must_use]
    pub fn from_domain(row: &OrderMaterial) -> Self {
        Self {
            kind: row.material.kind.as_str().to_string(),
            material_id: row.material.id,
            quantity: row.quantity,
            role: row.role.as_str().to_string(),
        }
    }
}

/// Api request to replace an order's material set.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EditMaterialsRequest {
    /// The desired material set after the edit.
    pub materials: Vec<OrderMaterialInfo>,
}

/// Api request to cancel an order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CancelOrderRequest {
    /// Why the order is cancelled.
    pub reason: String,
}

/// Api request to dispatch an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct DispatchOrderRequest {
    /// Allow event consumption to draw stock below zero.
    #[serde(default)]
    pub allow_overdraw: bool,
}

/// Api request to mark an order paid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MarkPaidRequest {
    /// The payment method label; must not be `Pendiente`.
    pub payment_method: String,
}

/// Api request to move the tax-document machine.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetTaxDocumentRequest {
    /// The target tax document label.
    pub tax_document: String,
    /// Document number, required for issued states.
    pub document_number: Option<String>,
}

/// An order as exposed by the api.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderInfo {
    /// The order id.
    pub order_id: i64,
    /// The human-readable order number.
    pub order_number: String,
    /// The ordering customer.
    pub customer_id: i64,
    /// Delivery timestamp, RFC 3339.
    pub delivery_at: String,
    /// Delivery street address.
    pub delivery_address: String,
    /// Comuna, when known.
    pub comuna: Option<String>,
    /// Arrangement price in Chilean pesos.
    pub arrangement_price: i64,
    /// Delivery price in Chilean pesos.
    pub delivery_price: i64,
    /// Arrangement plus delivery.
    pub total_price: i64,
    /// Fulfillment status token.
    pub fulfillment: String,
    /// Fulfillment display label for the back office.
    pub fulfillment_label: String,
    /// Payment status token.
    pub payment: String,
    /// Payment method label.
    pub payment_method: String,
    /// Tax document label.
    pub tax_document: String,
    /// Document number, when issued.
    pub document_number: Option<String>,
    /// Optional reference photo URL.
    pub photo_url: Option<String>,
    /// Whether this is an event order.
    pub is_event: bool,
    /// Event type, when an event.
    pub event_type: Option<String>,
    /// Cancellation reason, when cancelled.
    pub reason: Option<String>,
    /// Payment due date, `YYYY-MM-DD`.
    pub payment_due_date: String,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Dispatch timestamp, when dispatched.
    pub dispatched_at: Option<String>,
    /// Archival timestamp, when archived.
    pub archived_at: Option<String>,
    /// Cancellation timestamp, when cancelled.
    pub cancelled_at: Option<String>,
    /// Payment timestamp, when paid.
    pub paid_at: Option<String>,
    /// The order's material rows.
    pub materials: Vec<OrderMaterialInfo>,
}

impl OrderInfo {
    #[must_use]
    pub fn from_domain(order: &Order, rows: &[OrderMaterial]) -> Self {
        Self {
            order_id: order.order_id.unwrap_or_default(),
            order_number: order.order_number.clone(),
            customer_id: order.customer_id,
            delivery_at: order.delivery_at.to_rfc3339(),
            delivery_address: order.delivery_address.clone(),
            comuna: order.comuna.clone(),
            arrangement_price: order.arrangement_price,
            delivery_price: order.delivery_price,
            total_price: order.total_price(),
            fulfillment: order.fulfillment.as_str().to_string(),
            fulfillment_label: order.fulfillment.display_label().to_string(),
            payment: order.payment.as_str().to_string(),
            payment_method: order.payment_method.as_str().to_string(),
            tax_document: order.tax_document.as_str().to_string(),
            document_number: order.document_number.clone(),
            photo_url: order.photo_url.clone(),
            is_event: order.is_event,
            event_type: order.event_type.clone(),
            reason: order.reason.clone(),
            payment_due_date: order.payment_due_date.to_string(),
            created_at: order.created_at.to_rfc3339(),
            dispatched_at: order.dispatched_at.map(|ts| ts.to_rfc3339()),
            archived_at: order.archived_at.map(|ts| ts.to_rfc3339()),
            cancelled_at: order.cancelled_at.map(|ts| ts.to_rfc3339()),
            paid_at: order.paid_at.map(|ts| ts.to_rfc3339()),
            materials: rows.iter().map(OrderMaterialInfo::from_domain).collect(),
        }
    }
}

/// One order moved by the scheduled sweep.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SweepMoveInfo {
    /// The moved order.
    pub order_id: i64,
    /// The phase the order left.
    pub from: String,
    /// The phase the order entered.
    pub to: String,
}

/// Api response for a sweep run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SweepResponse {
    /// The orders the sweep moved, in order id order.
    pub moved: Vec<SweepMoveInfo>,
}

/// Api request to create a material.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateMaterialRequest {
    /// Material kind: `flower` or `container`.
    pub kind: String,
    /// Material name, unique within its kind.
    pub name: String,
    /// Initial stock on hand.
    pub on_hand: i64,
    /// Threshold at or below which the material is low on stock.
    pub low_stock_threshold: i64,
    /// Unit cost in Chilean pesos.
    pub unit_cost: i64,
}

/// Api request to update a material's attributes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateMaterialRequest {
    /// Material kind: `flower` or `container`.
    pub kind: String,
    /// The material id.
    pub material_id: i64,
    /// Material name.
    pub name: String,
    /// Threshold at or below which the material is low on stock.
    pub low_stock_threshold: i64,
    /// Unit cost in Chilean pesos.
    pub unit_cost: i64,
}

/// A material as exposed by the api.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MaterialInfo {
    /// The material id.
    pub material_id: i64,
    /// Material kind: `flower` or `container`.
    pub kind: String,
    /// Material name.
    pub name: String,
    /// Units physically in stock.
    pub on_hand: i64,
    /// Units reserved for event orders.
    pub reserved_for_event: i64,
    /// Threshold at or below which the material is low on stock.
    pub low_stock_threshold: i64,
    /// Unit cost in Chilean pesos.
    pub unit_cost: i64,
    /// Whether the material is at or below its threshold.
    pub is_low_stock: bool,
}

impl MaterialInfo {
    #[must_use]
    pub fn from_domain(material: &Material) -> Self {
        Self {
            material_id: material.material_id.unwrap_or_default(),
            kind: material.kind.as_str().to_string(),
            name: material.name.clone(),
            on_hand: material.on_hand,
            reserved_for_event: material.reserved_for_event,
            low_stock_threshold: material.low_stock_threshold,
            unit_cost: material.unit_cost,
            is_low_stock: material.is_low_stock(),
        }
    }
}

/// Api request to restock a material.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RestockRequest {
    /// Material kind: `flower` or `container`.
    pub kind: String,
    /// The material id.
    pub material_id: i64,
    /// Units to add; must be positive.
    pub quantity: i64,
}

/// Api request to create a product.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateProductRequest {
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Base price in Chilean pesos.
    pub base_price: i64,
}

/// Api request to update a product. Deactivation goes through here.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateProductRequest {
    /// The product id.
    pub product_id: i64,
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Base price in Chilean pesos.
    pub base_price: i64,
    /// Inactive products are hidden from intake.
    pub is_active: bool,
}

/// A product as exposed by the api.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProductInfo {
    /// The product id.
    pub product_id: i64,
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Base price in Chilean pesos.
    pub base_price: i64,
    /// Inactive products are hidden from intake.
    pub is_active: bool,
}

impl ProductInfo {
    #[must_use]
    pub fn from_domain(product: &Product) -> Self {
        Self {
            product_id: product.product_id.unwrap_or_default(),
            name: product.name.clone(),
            category: product.category.clone(),
            base_price: product.base_price,
            is_active: product.is_active,
        }
    }
}

/// A product together with its recipe entries.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProductDetailInfo {
    /// The product.
    pub product: ProductInfo,
    /// The product's recipe entries.
    pub recipe: Vec<RecipeEntryInfo>,
}

/// One recipe entry of a product.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecipeEntryInfo {
    /// Material kind: `flower` or `container`.
    pub kind: String,
    /// The material id.
    pub material_id: i64,
    /// Units per single product.
    pub quantity: i64,
}

impl RecipeEntryInfo {
    #[must_use]
    pub fn from_domain(entry: &RecipeEntry) -> Self {
        Self {
            kind: entry.material.kind.as_str().to_string(),
            material_id: entry.material.id,
            quantity: entry.quantity,
        }
    }
}

/// Api request to replace a product's recipe.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetRecipeRequest {
    /// The desired recipe entries.
    pub entries: Vec<RecipeEntryInfo>,
}

/// Api request to create or update a customer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomerRequest {
    /// Customer name.
    pub name: String,
    /// Contact details.
    pub contact: String,
    /// Credit class label.
    pub credit_class: String,
}

/// A customer as exposed by the api.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomerInfo {
    /// The customer id.
    pub customer_id: i64,
    /// Customer name.
    pub name: String,
    /// Contact details.
    pub contact: String,
    /// Credit class label.
    pub credit_class: String,
    /// Credit days granted by the class.
    pub credit_days: i64,
    /// Lifetime non-cancelled order count.
    pub total_orders: i64,
    /// Lifetime non-cancelled spend in Chilean pesos.
    pub total_spent: i64,
}

impl CustomerInfo {
    #[must_use]
    pub fn from_domain(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id.unwrap_or_default(),
            name: customer.name.clone(),
            contact: customer.contact.clone(),
            credit_class: customer.credit_class.as_str().to_string(),
            credit_days: customer.credit_class.credit_days(),
            total_orders: customer.total_orders,
            total_spent: customer.total_spent,
        }
    }
}

/// One row of a stock import preview or run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StockImportRowInfo {
    /// One-based CSV line number (excluding the header).
    pub line: usize,
    /// Material kind as given in the file.
    pub kind: String,
    /// Material name as given in the file.
    pub name: String,
    /// Units as given in the file.
    pub quantity: i64,
    /// Row outcome: `restocked`, `created`, `would_restock`,
    /// `would_create`, or `error`.
    pub status: String,
    /// Error detail for `error` rows.
    pub message: Option<String>,
}

/// Api response for a stock import preview or run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StockImportResponse {
    /// Rows applied (or applicable, for a preview).
    pub applied: usize,
    /// Rows rejected.
    pub failed: usize,
    /// Per-row outcomes in file order.
    pub rows: Vec<StockImportRowInfo>,
}

/// Api request to create a user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateUserRequest {
    /// Unique login name.
    pub login: String,
    /// The password; at least 8 characters.
    pub password: String,
    /// Display name shown in the back office and audit log.
    pub display_name: String,
    /// Role label: `admin`, `secretary`, or `workshop`.
    pub role: String,
}

/// Api request to activate or deactivate a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetUserActiveRequest {
    /// The target activation state.
    pub is_active: bool,
}

/// A user as exposed by the api.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserInfo {
    /// The user's id.
    pub user_id: i64,
    /// Unique login name.
    pub login: String,
    /// Display name.
    pub display_name: String,
    /// Role label.
    pub role: String,
    /// Deactivated users cannot log in.
    pub is_active: bool,
    /// Last successful login, RFC 3339, when any.
    pub last_login_at: Option<String>,
}

impl UserInfo {
    #[must_use]
    pub fn from_data(user: &UserData) -> Self {
        Self {
            user_id: user.user_id,
            login: user.login.clone(),
            display_name: user.display_name.clone(),
            role: user.role.clone(),
            is_active: user.is_active,
            last_login_at: user.last_login_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

/// Api request to query the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct AuditQueryRequest {
    /// Restrict to one actor's user id.
    #[serde(default)]
    pub actor_id: Option<i64>,
    /// Restrict to one action label.
    #[serde(default)]
    pub action: Option<String>,
    /// Restrict to one entity kind.
    #[serde(default)]
    pub entity_kind: Option<String>,
    /// Inclusive lower bound on the record time, RFC 3339.
    #[serde(default)]
    pub from: Option<String>,
    /// Exclusive upper bound on the record time, RFC 3339.
    #[serde(default)]
    pub to: Option<String>,
    /// Zero-based page index.
    #[serde(default)]
    pub page: i64,
    /// Requested page size; clamped to the cap.
    #[serde(default)]
    pub page_size: i64,
}

/// One audit record as exposed by the api.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditRecordInfo {
    /// The record id.
    pub audit_id: i64,
    /// The acting user's id, absent for system actions.
    pub actor_user_id: Option<i64>,
    /// The acting user's display name, or `system`.
    pub actor_name: String,
    /// The action label.
    pub action: String,
    /// The entity kind label.
    pub entity_kind: String,
    /// The affected entity's id, when known.
    pub entity_id: Option<i64>,
    /// Structured action details.
    pub details: serde_json::Value,
    /// Client IP, when captured.
    pub client_ip: Option<String>,
    /// Client user agent, when captured.
    pub user_agent: Option<String>,
    /// Record timestamp, RFC 3339.
    pub recorded_at: String,
}

/// Api response for an integrity repair run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RepairResponse {
    /// Duplicate recipe rows removed.
    pub duplicate_recipes_removed: usize,
    /// Duplicate order-material rows removed.
    pub duplicate_order_materials_removed: usize,
    /// Customers whose cached totals were rebuilt.
    pub customers_rebuilt: usize,
}
