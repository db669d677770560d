// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log appends.
//!
//! The log is append-only: this module exposes no update or delete. The
//! caller appends after the business transaction commits and swallows any
//! failure from here, because a lost audit entry is acceptable while a
//! half-applied mutation is not.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use violeta_audit::AuditRecord;

use crate::data_models::NewAuditRow;
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Appends one record to the audit log.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn append_audit(
    conn: &mut SqliteConnection,
    record: &AuditRecord,
) -> Result<i64, PersistenceError> {
    let row: NewAuditRow = NewAuditRow::from_domain(record)?;
    diesel::insert_into(audit_log::table)
        .values(row)
        .execute(conn)?;
    let audit_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        "Appended audit record {audit_id}: {} on {}",
        record.action, record.entity_kind
    );
    Ok(audit_id)
}
