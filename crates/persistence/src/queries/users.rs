// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User reads. Password hashes never leave this crate.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{UserData, UserRow};
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Loads one user by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for a missing user.
pub fn get_user(conn: &mut SqliteConnection, user_id: i64) -> Result<UserData, PersistenceError> {
    let row: UserRow = users::table
        .find(user_id)
        .first::<UserRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("user {user_id}")))?;
    row.try_into_data()
}

/// Lists every user, by login.
///
/// # Errors
///
/// Returns an error if the query fails or a row fails to map back.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<UserData>, PersistenceError> {
    users::table
        .order(users::login.asc())
        .load::<UserRow>(conn)?
        .into_iter()
        .map(UserRow::try_into_data)
        .collect()
}
