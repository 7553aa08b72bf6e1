// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Sign-in session assembly and user administration against a [`DataStore`].

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::logic::store::{DataStore, Direction, Query, decode_rows, record};
use crate::models::session::{ADMIN_ROLE, AuthUser, Session};
use crate::models::user::{Profile, RoleGrant, UserAccount, attach_roles};

pub const PROFILES_TABLE: &str = "profiles";
pub const ROLES_TABLE: &str = "user_roles";

/// Authenticate and build the session from profile name and role grants.
///
/// Profile or role lookups that fail leave the session without a name or
/// admin rights rather than failing the sign-in.
pub fn establish_session(
    store: &dyn DataStore,
    email: &str,
    password: &str,
) -> Result<Session, StoreError> {
    let user = store.sign_in(email, password)?;
    let full_name = profile_name(store, &user);
    let roles = role_names(store, &user.id);
    let session = Session::new(&user, full_name.as_deref(), &roles);
    info!(user = %session.email, admin = session.is_admin, "Signed in");
    Ok(session)
}

fn profile_name(store: &dyn DataStore, user: &AuthUser) -> Option<String> {
    let query = Query::new().where_eq("id", user.id.as_str());
    match store.list_records(PROFILES_TABLE, &query) {
        Ok(rows) => rows
            .first()
            .and_then(|row| row.get("full_name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(err) => {
            warn!(error = %err, "Failed to load profile");
            None
        }
    }
}

fn role_names(store: &dyn DataStore, user_id: &str) -> Vec<String> {
    let query = Query::new().where_eq("user_id", user_id);
    match store
        .list_records(ROLES_TABLE, &query)
        .and_then(decode_rows::<RoleGrant>)
    {
        Ok(grants) => grants.into_iter().map(|g| g.role).collect(),
        Err(err) => {
            warn!(error = %err, "Failed to load roles");
            Vec::new()
        }
    }
}

/// All profiles, newest first, with their roles attached.
pub fn load_users(store: &dyn DataStore) -> Result<Vec<UserAccount>, StoreError> {
    let profiles = store
        .list_records(
            PROFILES_TABLE,
            &Query::new().order_by("created_at", Direction::Descending),
        )
        .and_then(decode_rows::<Profile>)?;
    let grants = store
        .list_records(ROLES_TABLE, &Query::new())
        .and_then(decode_rows::<RoleGrant>)?;
    Ok(attach_roles(profiles, &grants))
}

/// Grant or revoke the admin role.
pub fn set_admin(store: &dyn DataStore, user_id: &str, grant: bool) -> Result<String, StoreError> {
    if grant {
        store.insert_record(
            ROLES_TABLE,
            record([("user_id", json!(user_id)), ("role", json!(ADMIN_ROLE))]),
        )?;
        info!(user_id, "Admin role granted");
        Ok("User promoted to admin".into())
    } else {
        let query = Query::new()
            .where_eq("user_id", user_id)
            .where_eq("role", ADMIN_ROLE);
        store.delete_record(ROLES_TABLE, &query)?;
        info!(user_id, "Admin role revoked");
        Ok("Admin privileges removed".into())
    }
}

pub fn delete_user(store: &dyn DataStore, user_id: &str) -> Result<String, StoreError> {
    store.invoke_function("delete-user", json!({ "userId": user_id }))?;
    info!(user_id, "User deleted");
    Ok("User deleted successfully".into())
}

/// Rename a profile and optionally reset its password.
pub fn update_user(
    store: &dyn DataStore,
    user_id: &str,
    full_name: &str,
    new_password: Option<&str>,
) -> Result<String, StoreError> {
    store.update_record(
        PROFILES_TABLE,
        &Query::new().where_eq("id", user_id),
        record([("full_name", json!(full_name))]),
    )?;

    match new_password {
        Some(password) => {
            store.invoke_function(
                "update-user-password",
                json!({ "userId": user_id, "newPassword": password }),
            )?;
            info!(user_id, "Profile and password updated");
            Ok("User and password updated successfully".into())
        }
        None => {
            info!(user_id, "Profile updated");
            Ok("User updated successfully".into())
        }
    }
}

pub fn create_user(
    store: &dyn DataStore,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<String, StoreError> {
    store.invoke_function(
        "create-user",
        json!({ "email": email, "password": password, "fullName": full_name }),
    )?;
    info!(email, "User created");
    Ok("User created successfully".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::memory_store::{MemoryStore, OFFLINE_ADMIN_EMAIL, OFFLINE_ADMIN_PASSWORD};

    #[test]
    fn session_carries_profile_name_and_admin_flag() {
        let store = MemoryStore::seeded();

        let session =
            establish_session(&store, OFFLINE_ADMIN_EMAIL, OFFLINE_ADMIN_PASSWORD).unwrap();

        assert_eq!(session.display_name, "Administrator");
        assert!(session.is_admin);
    }

    #[test]
    fn empty_profile_name_falls_back_to_email() {
        let store = MemoryStore::new();
        store.add_account("ana@example.com", "secret1", "", &["admin"]);

        let session = establish_session(&store, "ana@example.com", "secret1").unwrap();
        assert_eq!(session.display_name, "ana@example.com");
        assert!(session.is_admin);

        let bad = establish_session(&store, "ana@example.com", "nope").unwrap_err();
        assert!(matches!(bad, StoreError::Auth(_)));
    }

    #[test]
    fn admin_toggle_round_trips_through_roles() {
        let store = MemoryStore::new();
        let id = store.add_account("ana@example.com", "secret1", "Ana", &["user"]);

        set_admin(&store, &id, true).unwrap();
        assert!(load_users(&store).unwrap()[0].is_admin());

        set_admin(&store, &id, false).unwrap();
        let users = load_users(&store).unwrap();
        assert!(!users[0].is_admin());
        assert_eq!(users[0].roles, vec!["user".to_string()]);
    }

    #[test]
    fn update_user_resets_password_only_when_given() {
        let store = MemoryStore::new();
        let id = store.add_account("ana@example.com", "secret1", "Ana", &[]);

        let message = update_user(&store, &id, "Ana Maria", None).unwrap();
        assert_eq!(message, "User updated successfully");
        assert!(!store.calls().iter().any(|c| c == "fn:update-user-password"));

        update_user(&store, &id, "Ana Maria", Some("newpass")).unwrap();
        assert!(store.sign_in("ana@example.com", "newpass").is_ok());
        assert_eq!(
            load_users(&store).unwrap()[0].full_name.as_deref(),
            Some("Ana Maria")
        );
    }

    #[test]
    fn create_and_delete_go_through_server_functions() {
        let store = MemoryStore::new();

        create_user(&store, "Bia", "bia@example.com", "secret1").unwrap();
        let users = load_users(&store).unwrap();
        assert_eq!(users.len(), 1);

        delete_user(&store, &users[0].id).unwrap();
        assert!(load_users(&store).unwrap().is_empty());
        assert!(delete_user(&store, "missing").is_err());
    }
}
