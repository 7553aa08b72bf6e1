// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Authenticated session context passed explicitly to the screens that need it.

/// Role name granting access to user administration.
pub const ADMIN_ROLE: &str = "admin";

/// Identity returned by the auth service after sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Signed-in user as seen by the UI. Created on sign-in, dropped on sign-out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    /// Profile name when set, otherwise the email address.
    pub display_name: String,
    pub is_admin: bool,
}

impl Session {
    /// Build a session from the auth identity plus profile name and role list.
    pub fn new(user: &AuthUser, full_name: Option<&str>, roles: &[String]) -> Self {
        let display_name = full_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&user.email)
            .to_string();

        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            display_name,
            is_admin: roles.iter().any(|r| r == ADMIN_ROLE),
        }
    }
}
