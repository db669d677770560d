// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! Audit record types for the Violeta back office.
//!
//! Every state-changing action produces exactly one audit record. The log
//! is append-only by convention: records are never updated or deleted
//! through normal interfaces, and a failure to write one must never fail
//! the business operation that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of audit records one query page may return.
pub const MAX_PAGE_SIZE: i64 = 50;

/// The entity performing a state-changing action.
///
/// Actors are usually back-office users; the reclassifier sweep and
/// maintenance routines act as the system actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The user id, when the actor is a user. `None` for the system actor.
    pub user_id: Option<i64>,
    /// Snapshot of the actor's display name at the time of the action.
    pub name: String,
}

impl Actor {
    /// Creates an actor for a back-office user.
    #[must_use]
    pub const fn user(user_id: i64, name: String) -> Self {
        Self {
            user_id: Some(user_id),
            name,
        }
    }

    /// Creates the system actor used by sweeps and maintenance routines.
    #[must_use]
    pub fn system() -> Self {
        Self {
            user_id: None,
            name: String::from("system"),
        }
    }
}

/// The action label of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// An order was created.
    Create,
    /// An order's composition or attributes were edited.
    Edit,
    /// An order was cancelled.
    Cancel,
    /// An order was dispatched.
    Dispatch,
    /// An order was marked paid.
    MarkPaid,
    /// An order's tax-document state changed.
    TaxDocument,
    /// The bulk reclassifier moved an order between phases.
    Reclassify,
    /// A material was restocked.
    Restock,
    /// Materials were consumed past zero under the overdraw override.
    ConsumeOverdraw,
    /// A catalog entity was created.
    CatalogCreate,
    /// A catalog entity was updated or deactivated.
    CatalogUpdate,
    /// Stock quantities were imported from a CSV file.
    StockImport,
    /// A maintenance repair routine ran.
    Repair,
    /// A user logged in.
    Login,
}

impl AuditAction {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Cancel => "cancel",
            Self::Dispatch => "dispatch",
            Self::MarkPaid => "mark_paid",
            Self::TaxDocument => "tax_document",
            Self::Reclassify => "reclassify",
            Self::Restock => "restock",
            Self::ConsumeOverdraw => "consume_overdraw",
            Self::CatalogCreate => "catalog_create",
            Self::CatalogUpdate => "catalog_update",
            Self::StockImport => "stock_import",
            Self::Repair => "repair",
            Self::Login => "login",
        }
    }

    /// Parses a persisted action label.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "edit" => Some(Self::Edit),
            "cancel" => Some(Self::Cancel),
            "dispatch" => Some(Self::Dispatch),
            "mark_paid" => Some(Self::MarkPaid),
            "tax_document" => Some(Self::TaxDocument),
            "reclassify" => Some(Self::Reclassify),
            "restock" => Some(Self::Restock),
            "consume_overdraw" => Some(Self::ConsumeOverdraw),
            "catalog_create" => Some(Self::CatalogCreate),
            "catalog_update" => Some(Self::CatalogUpdate),
            "stock_import" => Some(Self::StockImport),
            "repair" => Some(Self::Repair),
            "login" => Some(Self::Login),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of entity an audit record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Order,
    Product,
    Flower,
    Container,
    Customer,
    User,
    /// Records with no single entity, e.g. a repair run.
    System,
}

impl EntityKind {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Product => "product",
            Self::Flower => "flower",
            Self::Container => "container",
            Self::Customer => "customer",
            Self::User => "user",
            Self::System => "system",
        }
    }

    /// Parses a persisted entity-kind label.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "order" => Some(Self::Order),
            "product" => Some(Self::Product),
            "flower" => Some(Self::Flower),
            "container" => Some(Self::Container),
            "customer" => Some(Self::Customer),
            "user" => Some(Self::User),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Network context of the client that triggered an action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientContext {
    /// The client's network address, when known.
    pub ip: Option<String>,
    /// The client's user-agent string, when known.
    pub user_agent: Option<String>,
}

impl ClientContext {
    /// Creates a client context.
    #[must_use]
    pub const fn new(ip: Option<String>, user_agent: Option<String>) -> Self {
        Self { ip, user_agent }
    }
}

/// One immutable entry of the append-only audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// Monotonic identifier. `None` before the record is persisted.
    pub audit_id: Option<i64>,
    /// Who performed the action.
    pub actor: Actor,
    /// What was done.
    pub action: AuditAction,
    /// The kind of entity acted on.
    pub entity_kind: EntityKind,
    /// The entity's identifier, when the action targets one entity.
    pub entity_id: Option<i64>,
    /// Structured details of the action.
    pub details: serde_json::Value,
    /// Network context of the originating client.
    pub client: ClientContext,
    /// When the action happened.
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Creates a new unpersisted audit record stamped with the current time.
    #[must_use]
    pub fn new(
        actor: Actor,
        action: AuditAction,
        entity_kind: EntityKind,
        entity_id: Option<i64>,
        details: serde_json::Value,
        client: ClientContext,
    ) -> Self {
        Self {
            audit_id: None,
            actor,
            action,
            entity_kind,
            entity_id,
            details,
            client,
            recorded_at: Utc::now(),
        }
    }
}

/// Filter for audit-log queries.
///
/// All criteria are conjunctive; `None` means no constraint. Page size is
/// clamped to [`MAX_PAGE_SIZE`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditFilter {
    /// Restrict to one actor's user id.
    pub actor_id: Option<i64>,
    /// Restrict to one action label.
    pub action: Option<AuditAction>,
    /// Restrict to one entity kind.
    pub entity_kind: Option<EntityKind>,
    /// Inclusive lower bound on `recorded_at`.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `recorded_at`.
    pub to: Option<DateTime<Utc>>,
    /// Zero-based page index.
    pub page: i64,
    /// Requested page size; zero or negative falls back to the cap.
    pub page_size: i64,
}

impl AuditFilter {
    /// Returns the effective page size after clamping to the cap.
    #[must_use]
    pub const fn effective_page_size(&self) -> i64 {
        if self.page_size <= 0 || self.page_size > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    /// Returns the query offset for the requested page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        let page: i64 = if self.page < 0 { 0 } else { self.page };
        page * self.effective_page_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_actor_has_no_user_id() {
        let actor: Actor = Actor::system();

        assert_eq!(actor.user_id, None);
        assert_eq!(actor.name, "system");
    }

    #[test]
    fn test_user_actor_snapshots_name() {
        let actor: Actor = Actor::user(7, String::from("Valentina"));

        assert_eq!(actor.user_id, Some(7));
        assert_eq!(actor.name, "Valentina");
    }

    #[test]
    fn test_action_labels_round_trip() {
        for action in [
            AuditAction::Create,
            AuditAction::Edit,
            AuditAction::Cancel,
            AuditAction::Dispatch,
            AuditAction::MarkPaid,
            AuditAction::TaxDocument,
            AuditAction::Reclassify,
            AuditAction::Restock,
            AuditAction::ConsumeOverdraw,
            AuditAction::CatalogCreate,
            AuditAction::CatalogUpdate,
            AuditAction::StockImport,
            AuditAction::Repair,
            AuditAction::Login,
        ] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("drop_table"), None);
    }

    #[test]
    fn test_entity_kind_labels_round_trip() {
        for kind in [
            EntityKind::Order,
            EntityKind::Product,
            EntityKind::Flower,
            EntityKind::Container,
            EntityKind::Customer,
            EntityKind::User,
            EntityKind::System,
        ] {
            assert_eq!(EntityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::parse("invoice"), None);
    }

    #[test]
    fn test_page_size_clamps_to_cap() {
        let mut filter: AuditFilter = AuditFilter::default();

        assert_eq!(filter.effective_page_size(), MAX_PAGE_SIZE);

        filter.page_size = 10;
        assert_eq!(filter.effective_page_size(), 10);

        filter.page_size = 500;
        assert_eq!(filter.effective_page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_offset_uses_effective_page_size() {
        let filter: AuditFilter = AuditFilter {
            page: 3,
            page_size: 10,
            ..AuditFilter::default()
        };

        assert_eq!(filter.offset(), 30);
    }

    #[test]
    fn test_negative_page_is_treated_as_first() {
        let filter: AuditFilter = AuditFilter {
            page: -2,
            page_size: 10,
            ..AuditFilter::default()
        };

        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_new_record_is_unpersisted() {
        let record: AuditRecord = AuditRecord::new(
            Actor::system(),
            AuditAction::Reclassify,
            EntityKind::Order,
            Some(42),
            serde_json::json!({"from": "tomorrow", "to": "today"}),
            ClientContext::default(),
        );

        assert_eq!(record.audit_id, None);
        assert_eq!(record.entity_id, Some(42));
    }
}
