// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Back-office user management.

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use violeta_domain::DomainError;

use crate::data_models::{NewUserRow, UserData, UserRow, format_ts};
use crate::diesel_schema::users;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

const VALID_ROLES: [&str; 3] = ["admin", "secretary", "workshop"];

/// Creates a user with a bcrypt-hashed password.
///
/// # Errors
///
/// Returns an error for an unknown role, a hashing failure, or an insert
/// failure (including a duplicate login).
pub fn create_user(
    conn: &mut SqliteConnection,
    login: &str,
    password: &str,
    display_name: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    if !VALID_ROLES.contains(&role) {
        return Err(DomainError::Validation {
            field: "role",
            reason: format!("unknown role '{role}'"),
        }
        .into());
    }
    if password.len() < 8 {
        return Err(DomainError::Validation {
            field: "password",
            reason: String::from("must be at least 8 characters"),
        }
        .into());
    }
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::InitializationError(format!("bcrypt failure: {e}")))?;
    let row: NewUserRow = NewUserRow {
        login: login.to_string(),
        password_hash,
        display_name: display_name.to_string(),
        role: role.to_string(),
        is_active: 1,
    };
    diesel::insert_into(users::table).values(row).execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Activates or deactivates a user.
///
/// # Errors
///
/// Returns an error if the user does not exist.
pub fn set_user_active(
    conn: &mut SqliteConnection,
    user_id: i64,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(users::table.find(user_id))
        .set(users::is_active.eq(i32::from(is_active)))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("user {user_id}")));
    }
    Ok(())
}

/// Verifies a login and stamps the last-login time.
///
/// # Errors
///
/// Returns `PersistenceError::InvalidCredentials` for an unknown login,
/// an inactive user, or a wrong password. The three cases are deliberately
/// indistinguishable to the caller.
pub fn verify_login(
    conn: &mut SqliteConnection,
    login: &str,
    password: &str,
) -> Result<UserData, PersistenceError> {
    let row: UserRow = users::table
        .filter(users::login.eq(login))
        .first::<UserRow>(conn)
        .optional()?
        .ok_or(PersistenceError::InvalidCredentials)?;
    if row.is_active == 0 {
        return Err(PersistenceError::InvalidCredentials);
    }
    let verified: bool = bcrypt::verify(password, &row.password_hash)
        .map_err(|e| PersistenceError::QueryFailed(format!("bcrypt failure: {e}")))?;
    if !verified {
        return Err(PersistenceError::InvalidCredentials);
    }
    diesel::update(users::table.find(row.user_id))
        .set(users::last_login_at.eq(format_ts(Utc::now())))
        .execute(conn)?;
    row.try_into_data()
}
