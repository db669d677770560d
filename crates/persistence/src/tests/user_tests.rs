// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use violeta_domain::DomainError;

use crate::data_models::UserData;
use crate::error::PersistenceError;
use crate::tests::helpers::new_store;
use crate::Persistence;

#[test]
fn test_create_user_and_verify_login() {
    let mut store: Persistence = new_store();
    let user_id: i64 = store
        .create_user("valentina", "jardín2026", "Valentina", "secretary")
        .unwrap();

    let user: UserData = store.verify_login("valentina", "jardín2026").unwrap();

    assert_eq!(user.user_id, user_id);
    assert_eq!(user.display_name, "Valentina");
    assert_eq!(user.role, "secretary");
    assert!(user.is_active);
    assert!(user.last_login_at.is_some());
}

#[test]
fn test_wrong_password_is_invalid_credentials() {
    let mut store: Persistence = new_store();
    store
        .create_user("valentina", "jardín2026", "Valentina", "secretary")
        .unwrap();

    let result: Result<UserData, PersistenceError> = store.verify_login("valentina", "incorrecta");

    assert!(matches!(result, Err(PersistenceError::InvalidCredentials)));
}

#[test]
fn test_unknown_login_is_invalid_credentials() {
    let mut store: Persistence = new_store();

    let result: Result<UserData, PersistenceError> = store.verify_login("nadie", "loquesea1");

    assert!(matches!(result, Err(PersistenceError::InvalidCredentials)));
}

#[test]
fn test_deactivated_user_cannot_log_in() {
    let mut store: Persistence = new_store();
    let user_id: i64 = store
        .create_user("valentina", "jardín2026", "Valentina", "secretary")
        .unwrap();
    store.set_user_active(user_id, false).unwrap();

    let result: Result<UserData, PersistenceError> = store.verify_login("valentina", "jardín2026");

    assert!(matches!(result, Err(PersistenceError::InvalidCredentials)));
}

#[test]
fn test_unknown_role_is_rejected() {
    let mut store: Persistence = new_store();

    let result: Result<i64, PersistenceError> =
        store.create_user("valentina", "jardín2026", "Valentina", "gerente");

    assert!(matches!(
        result,
        Err(PersistenceError::Domain(DomainError::Validation {
            field: "role",
            ..
        }))
    ));
}

#[test]
fn test_short_password_is_rejected() {
    let mut store: Persistence = new_store();

    let result: Result<i64, PersistenceError> =
        store.create_user("valentina", "corta", "Valentina", "secretary");

    assert!(matches!(
        result,
        Err(PersistenceError::Domain(DomainError::Validation {
            field: "password",
            ..
        }))
    ));
}

#[test]
fn test_list_users_excludes_password_material() {
    let mut store: Persistence = new_store();
    store
        .create_user("valentina", "jardín2026", "Valentina", "secretary")
        .unwrap();
    store
        .create_user("alonso", "taller2026x", "Alonso", "workshop")
        .unwrap();

    let users: Vec<UserData> = store.list_users().unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].login, "alonso");
    assert_eq!(users[1].login, "valentina");
    assert!(users.iter().all(|u| u.last_login_at.is_none()));
}
