// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log reads.
//!
//! `recorded_at` is RFC 3339 text in UTC with a fixed `+00:00` offset, so
//! lexicographic comparison on the column matches chronological order and
//! the date-range filters can compare strings directly.

use diesel::prelude::*;
use diesel::SqliteConnection;
use violeta_audit::{AuditFilter, AuditRecord};

use crate::data_models::{AuditRow, format_ts};
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;

/// Queries the audit log, newest first, paged and capped.
///
/// # Errors
///
/// Returns an error if the query fails or a row fails to map back.
pub fn query_audit(
    conn: &mut SqliteConnection,
    filter: &AuditFilter,
) -> Result<Vec<AuditRecord>, PersistenceError> {
    let mut query = audit_log::table.into_boxed();
    if let Some(actor_id) = filter.actor_id {
        query = query.filter(audit_log::actor_user_id.eq(actor_id));
    }
    if let Some(action) = filter.action {
        query = query.filter(audit_log::action.eq(action.as_str()));
    }
    if let Some(entity_kind) = filter.entity_kind {
        query = query.filter(audit_log::entity_kind.eq(entity_kind.as_str()));
    }
    if let Some(from) = filter.from {
        query = query.filter(audit_log::recorded_at.ge(format_ts(from)));
    }
    if let Some(to) = filter.to {
        query = query.filter(audit_log::recorded_at.lt(format_ts(to)));
    }
    query
        .order(audit_log::audit_id.desc())
        .limit(filter.effective_page_size())
        .offset(filter.offset())
        .load::<AuditRow>(conn)?
        .into_iter()
        .map(AuditRow::try_into_domain)
        .collect()
}
