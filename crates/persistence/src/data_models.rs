// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs mapping database tables onto domain types.
//!
//! Timestamps are stored as RFC 3339 text in UTC; dates as `YYYY-MM-DD`
//! text. Status and label columns hold the persistence tokens defined by
//! the domain enumerations, so a row that fails to map back signals a
//! corrupt store rather than a caller error.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use violeta_audit::{Actor, AuditAction, AuditRecord, ClientContext, EntityKind};
use violeta_domain::{
    Customer, Material, MaterialKind, MaterialRef, Order, OrderMaterial, Product, RecipeEntry,
};

use crate::diesel_schema;
use crate::error::PersistenceError;

pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn parse_ts(
    table: &'static str,
    value: &str,
) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| PersistenceError::CorruptRow {
            table,
            reason: format!("bad timestamp '{value}': {e}"),
        })
}

pub(crate) fn parse_opt_ts(
    table: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, PersistenceError> {
    value.map(|v| parse_ts(table, v)).transpose()
}

pub(crate) fn parse_date(
    table: &'static str,
    value: &str,
) -> Result<NaiveDate, PersistenceError> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| PersistenceError::CorruptRow {
            table,
            reason: format!("bad date '{value}': {e}"),
        })
}

fn corrupt<E: std::fmt::Display>(
    table: &'static str,
) -> impl FnOnce(E) -> PersistenceError {
    move |e| PersistenceError::CorruptRow {
        table,
        reason: e.to_string(),
    }
}

#[derive(Debug, Clone, Queryable)]
pub(crate) struct OrderRow {
    pub order_id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub delivery_at: String,
    pub delivery_address: String,
    pub comuna: Option<String>,
    pub arrangement_price: i64,
    pub delivery_price: i64,
    pub fulfillment_status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub tax_document: String,
    pub document_number: Option<String>,
    pub photo_url: Option<String>,
    pub is_event: i32,
    pub event_type: Option<String>,
    pub reason: Option<String>,
    pub payment_due_date: String,
    pub created_at: String,
    pub dispatched_at: Option<String>,
    pub archived_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub paid_at: Option<String>,
}

impl OrderRow {
    pub(crate) fn try_into_domain(self) -> Result<Order, PersistenceError> {
        Ok(Order {
            order_id: Some(self.order_id),
            order_number: self.order_number,
            customer_id: self.customer_id,
            delivery_at: parse_ts("orders", &self.delivery_at)?,
            delivery_address: self.delivery_address,
            comuna: self.comuna,
            arrangement_price: self.arrangement_price,
            delivery_price: self.delivery_price,
            fulfillment: self
                .fulfillment_status
                .parse()
                .map_err(corrupt("orders"))?,
            payment: self.payment_status.parse().map_err(corrupt("orders"))?,
            payment_method: self.payment_method.parse().map_err(corrupt("orders"))?,
            tax_document: self.tax_document.parse().map_err(corrupt("orders"))?,
            document_number: self.document_number,
            photo_url: self.photo_url,
            is_event: self.is_event != 0,
            event_type: self.event_type,
            reason: self.reason,
            payment_due_date: parse_date("orders", &self.payment_due_date)?,
            created_at: parse_ts("orders", &self.created_at)?,
            dispatched_at: parse_opt_ts("orders", self.dispatched_at.as_deref())?,
            archived_at: parse_opt_ts("orders", self.archived_at.as_deref())?,
            cancelled_at: parse_opt_ts("orders", self.cancelled_at.as_deref())?,
            paid_at: parse_opt_ts("orders", self.paid_at.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::orders)]
pub(crate) struct OrderRecord {
    pub order_number: String,
    pub customer_id: i64,
    pub delivery_at: String,
    pub delivery_address: String,
    pub comuna: Option<String>,
    pub arrangement_price: i64,
    pub delivery_price: i64,
    pub fulfillment_status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub tax_document: String,
    pub document_number: Option<String>,
    pub photo_url: Option<String>,
    pub is_event: i32,
    pub event_type: Option<String>,
    pub reason: Option<String>,
    pub payment_due_date: String,
    pub created_at: String,
    pub dispatched_at: Option<String>,
    pub archived_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub paid_at: Option<String>,
}

impl OrderRecord {
    pub(crate) fn from_domain(order: &Order) -> Self {
        Self {
            order_number: order.order_number.clone(),
            customer_id: order.customer_id,
            delivery_at: format_ts(order.delivery_at),
            delivery_address: order.delivery_address.clone(),
            comuna: order.comuna.clone(),
            arrangement_price: order.arrangement_price,
            delivery_price: order.delivery_price,
            fulfillment_status: order.fulfillment.as_str().to_string(),
            payment_status: order.payment.as_str().to_string(),
            payment_method: order.payment_method.as_str().to_string(),
            tax_document: order.tax_document.as_str().to_string(),
            document_number: order.document_number.clone(),
            photo_url: order.photo_url.clone(),
            is_event: i32::from(order.is_event),
            event_type: order.event_type.clone(),
            reason: order.reason.clone(),
            payment_due_date: order.payment_due_date.to_string(),
            created_at: format_ts(order.created_at),
            dispatched_at: order.dispatched_at.map(format_ts),
            archived_at: order.archived_at.map(format_ts),
            cancelled_at: order.cancelled_at.map(format_ts),
            paid_at: order.paid_at.map(format_ts),
        }
    }
}

#[derive(Debug, Clone, Queryable)]
pub(crate) struct OrderMaterialRow {
    #[allow(dead_code)]
    pub order_material_id: i64,
    #[allow(dead_code)]
    pub order_id: i64,
    pub material_kind: String,
    pub material_id: i64,
    pub quantity: i64,
    pub role: String,
}

impl OrderMaterialRow {
    pub(crate) fn try_into_domain(self) -> Result<OrderMaterial, PersistenceError> {
        let kind: MaterialKind = self
            .material_kind
            .parse()
            .map_err(corrupt("order_materials"))?;
        Ok(OrderMaterial {
            material: MaterialRef::new(kind, self.material_id),
            quantity: self.quantity,
            role: self.role.parse().map_err(corrupt("order_materials"))?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = diesel_schema::order_materials)]
pub(crate) struct NewOrderMaterialRow {
    pub order_id: i64,
    pub material_kind: String,
    pub material_id: i64,
    pub quantity: i64,
    pub role: String,
}

impl NewOrderMaterialRow {
    pub(crate) fn from_domain(order_id: i64, row: &OrderMaterial) -> Self {
        Self {
            order_id,
            material_kind: row.material.kind.as_str().to_string(),
            material_id: row.material.id,
            quantity: row.quantity,
            role: row.role.as_str().to_string(),
        }
    }
}

/// Shared shape of the two material kind tables.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct MaterialRow {
    pub material_id: i64,
    pub name: String,
    pub on_hand: i64,
    pub reserved_for_event: i64,
    pub low_stock_threshold: i64,
    pub unit_cost: i64,
}

impl MaterialRow {
    pub(crate) fn into_domain(self, kind: MaterialKind) -> Material {
        Material {
            material_id: Some(self.material_id),
            kind,
            name: self.name,
            on_hand: self.on_hand,
            reserved_for_event: self.reserved_for_event,
            low_stock_threshold: self.low_stock_threshold,
            unit_cost: self.unit_cost,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::flowers)]
pub(crate) struct FlowerRecord {
    pub name: String,
    pub on_hand: i64,
    pub reserved_for_event: i64,
    pub low_stock_threshold: i64,
    pub unit_cost: i64,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::containers)]
pub(crate) struct ContainerRecord {
    pub name: String,
    pub on_hand: i64,
    pub reserved_for_event: i64,
    pub low_stock_threshold: i64,
    pub unit_cost: i64,
}

impl FlowerRecord {
    pub(crate) fn from_domain(material: &Material) -> Self {
        Self {
            name: material.name.clone(),
            on_hand: material.on_hand,
            reserved_for_event: material.reserved_for_event,
            low_stock_threshold: material.low_stock_threshold,
            unit_cost: material.unit_cost,
        }
    }
}

impl ContainerRecord {
    pub(crate) fn from_domain(material: &Material) -> Self {
        Self {
            name: material.name.clone(),
            on_hand: material.on_hand,
            reserved_for_event: material.reserved_for_event,
            low_stock_threshold: material.low_stock_threshold,
            unit_cost: material.unit_cost,
        }
    }
}

#[derive(Debug, Clone, Queryable)]
pub(crate) struct CustomerRow {
    pub customer_id: i64,
    pub name: String,
    pub contact: String,
    pub credit_class: String,
    pub total_orders: i64,
    pub total_spent: i64,
}

impl CustomerRow {
    pub(crate) fn try_into_domain(self) -> Result<Customer, PersistenceError> {
        Ok(Customer {
            customer_id: Some(self.customer_id),
            name: self.name,
            contact: self.contact,
            credit_class: self.credit_class.parse().map_err(corrupt("customers"))?,
            total_orders: self.total_orders,
            total_spent: self.total_spent,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::customers)]
pub(crate) struct CustomerRecord {
    pub name: String,
    pub contact: String,
    pub credit_class: String,
}

impl CustomerRecord {
    pub(crate) fn from_domain(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            contact: customer.contact.clone(),
            credit_class: customer.credit_class.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable)]
pub(crate) struct ProductRow {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub base_price: i64,
    pub is_active: i32,
}

impl ProductRow {
    pub(crate) fn into_domain(self) -> Product {
        Product {
            product_id: Some(self.product_id),
            name: self.name,
            category: self.category,
            base_price: self.base_price,
            is_active: self.is_active != 0,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::products)]
pub(crate) struct ProductRecord {
    pub name: String,
    pub category: String,
    pub base_price: i64,
    pub is_active: i32,
}

impl ProductRecord {
    pub(crate) fn from_domain(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            base_price: product.base_price,
            is_active: i32::from(product.is_active),
        }
    }
}

#[derive(Debug, Clone, Queryable)]
pub(crate) struct RecipeRow {
    #[allow(dead_code)]
    pub recipe_id: i64,
    pub product_id: i64,
    pub material_kind: String,
    pub material_id: i64,
    pub quantity: i64,
}

impl RecipeRow {
    pub(crate) fn try_into_domain(self) -> Result<RecipeEntry, PersistenceError> {
        let kind: MaterialKind = self
            .material_kind
            .parse()
            .map_err(corrupt("product_recipes"))?;
        Ok(RecipeEntry {
            product_id: self.product_id,
            material: MaterialRef::new(kind, self.material_id),
            quantity: self.quantity,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = diesel_schema::product_recipes)]
pub(crate) struct NewRecipeRow {
    pub product_id: i64,
    pub material_kind: String,
    pub material_id: i64,
    pub quantity: i64,
}

impl NewRecipeRow {
    pub(crate) fn from_domain(entry: &RecipeEntry) -> Self {
        Self {
            product_id: entry.product_id,
            material_kind: entry.material.kind.as_str().to_string(),
            material_id: entry.material.id,
            quantity: entry.quantity,
        }
    }
}

#[derive(Debug, Clone, Queryable)]
pub(crate) struct UserRow {
    pub user_id: i64,
    pub login: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub is_active: i32,
    pub last_login_at: Option<String>,
}

/// A back-office user as exposed to callers (no password hash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    /// The user's id.
    pub user_id: i64,
    /// Unique login name.
    pub login: String,
    /// Display name shown in the back office and audit log.
    pub display_name: String,
    /// Role label: `admin`, `secretary`, or `workshop`.
    pub role: String,
    /// Deactivated users cannot log in.
    pub is_active: bool,
    /// Last successful login, when any.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRow {
    pub(crate) fn try_into_data(self) -> Result<UserData, PersistenceError> {
        Ok(UserData {
            user_id: self.user_id,
            login: self.login,
            display_name: self.display_name,
            role: self.role,
            is_active: self.is_active != 0,
            last_login_at: parse_opt_ts("users", self.last_login_at.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = diesel_schema::users)]
pub(crate) struct NewUserRow {
    pub login: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub is_active: i32,
}

#[derive(Debug, Clone, Queryable)]
pub(crate) struct AuditRow {
    pub audit_id: i64,
    pub actor_user_id: Option<i64>,
    pub actor_name: String,
    pub action: String,
    pub entity_kind: String,
    pub entity_id: Option<i64>,
    pub details_json: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub recorded_at: String,
}

impl AuditRow {
    pub(crate) fn try_into_domain(self) -> Result<AuditRecord, PersistenceError> {
        let action: AuditAction =
            AuditAction::parse(&self.action).ok_or(PersistenceError::CorruptRow {
                table: "audit_log",
                reason: format!("unknown action '{}'", self.action),
            })?;
        let entity_kind: EntityKind =
            EntityKind::parse(&self.entity_kind).ok_or(PersistenceError::CorruptRow {
                table: "audit_log",
                reason: format!("unknown entity kind '{}'", self.entity_kind),
            })?;
        Ok(AuditRecord {
            audit_id: Some(self.audit_id),
            actor: Actor {
                user_id: self.actor_user_id,
                name: self.actor_name,
            },
            action,
            entity_kind,
            entity_id: self.entity_id,
            details: serde_json::from_str(&self.details_json)?,
            client: ClientContext::new(self.client_ip, self.user_agent),
            recorded_at: parse_ts("audit_log", &self.recorded_at)?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = diesel_schema::audit_log)]
pub(crate) struct NewAuditRow {
    pub actor_user_id: Option<i64>,
    pub actor_name: String,
    pub action: String,
    pub entity_kind: String,
    pub entity_id: Option<i64>,
    pub details_json: String,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub recorded_at: String,
}

impl NewAuditRow {
    pub(crate) fn from_domain(record: &AuditRecord) -> Result<Self, PersistenceError> {
        Ok(Self {
            actor_user_id: record.actor.user_id,
            actor_name: record.actor.name.clone(),
            action: record.action.as_str().to_string(),
            entity_kind: record.entity_kind.as_str().to_string(),
            entity_id: record.entity_id,
            details_json: serde_json::to_string(&record.details)?,
            client_ip: record.client.ip.clone(),
            user_agent: record.client.user_agent.clone(),
            recorded_at: format_ts(record.recorded_at),
        })
    }
}
