// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! User accounts for the administration screen and credential validation rules.

use chrono::{DateTime, Duration, Utc};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::models::session::ADMIN_ROLE;

const MIN_PASSWORD_LEN: usize = 6;
const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 255;

/// Profile joined with its roles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub roles: Vec<String>,
}

impl UserAccount {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }

    /// Name shown in lists and confirmation dialogs.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }

    fn matches(&self, needle: &str) -> bool {
        let name_hit = self
            .full_name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(needle));
        name_hit || self.email.to_lowercase().contains(needle)
    }
}

/// Row of the `profiles` table.
#[derive(Clone, Debug, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of the `user_roles` table.
#[derive(Clone, Debug, Deserialize)]
pub struct RoleGrant {
    pub user_id: String,
    pub role: String,
}

/// Join profiles with their role grants, keeping profile order.
pub fn attach_roles(profiles: Vec<Profile>, grants: &[RoleGrant]) -> Vec<UserAccount> {
    profiles
        .into_iter()
        .map(|profile| {
            let roles = grants
                .iter()
                .filter(|g| g.user_id == profile.id)
                .map(|g| g.role.clone())
                .collect();
            UserAccount {
                id: profile.id,
                email: profile.email,
                full_name: profile.full_name,
                created_at: profile.created_at,
                roles,
            }
        })
        .collect()
}

/// Case-insensitive search over name and email.
pub fn filter_users<'a>(users: &'a [UserAccount], search: &str) -> Vec<&'a UserAccount> {
    let needle = search.trim().to_lowercase();
    users.iter().filter(|u| u.matches(&needle)).collect()
}

/// Counters shown above the user table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub admins: usize,
    /// Accounts created within the last seven days.
    pub recent: usize,
}

pub fn user_stats(users: &[UserAccount], now: DateTime<Utc>) -> UserStats {
    let cutoff = now - Duration::days(7);
    UserStats {
        total: users.len(),
        admins: users.iter().filter(|u| u.is_admin()).count(),
        recent: users.iter().filter(|u| u.created_at > cutoff).count(),
    }
}

/// Per-field credential errors for the sign-in, sign-up, and user dialogs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialErrors {
    pub full_name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
}

impl CredentialErrors {
    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }

    /// First failing message in field order.
    pub fn first(&self) -> Option<&'static str> {
        self.full_name
            .or(self.email)
            .or(self.password)
            .or(self.confirm_password)
    }
}

fn email_error(email: &str) -> Option<&'static str> {
    let email = email.trim();
    if !EmailAddress::is_valid(email) {
        Some("Invalid email")
    } else if email.chars().count() > MAX_EMAIL_LEN {
        Some("Email must be at most 255 characters")
    } else {
        None
    }
}

fn password_error(password: &str) -> Option<&'static str> {
    (password.chars().count() < MIN_PASSWORD_LEN)
        .then_some("Password must be at least 6 characters")
}

pub fn validate_login(email: &str, password: &str) -> CredentialErrors {
    CredentialErrors {
        email: email_error(email),
        password: password_error(password),
        ..Default::default()
    }
}

/// Rules shared by self sign-up and admin-created accounts.
pub fn validate_signup(
    full_name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> CredentialErrors {
    let name_len = full_name.trim().chars().count();
    let full_name = if name_len < 2 {
        Some("Name must be at least 2 characters")
    } else if name_len > MAX_NAME_LEN {
        Some("Name must be at most 100 characters")
    } else {
        None
    };

    CredentialErrors {
        full_name,
        email: email_error(email),
        password: password_error(password),
        confirm_password: (password != confirm_password).then_some("Passwords do not match"),
    }
}

/// Admin edit: name required; password optional but checked when given.
pub fn validate_profile_edit(
    full_name: &str,
    new_password: &str,
    confirm_password: &str,
) -> CredentialErrors {
    let name_len = full_name.trim().chars().count();
    let full_name = if name_len == 0 {
        Some("Name cannot be empty")
    } else if name_len > MAX_NAME_LEN {
        Some("Name must be at most 100 characters")
    } else {
        None
    };

    let changing_password = !new_password.is_empty();
    CredentialErrors {
        full_name,
        email: None,
        password: changing_password
            .then(|| password_error(new_password))
            .flatten(),
        confirm_password: (changing_password && new_password != confirm_password)
            .then_some("Passwords do not match"),
    }
}
