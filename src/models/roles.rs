//! Role checks used to gate moderator and admin features
//!
//! A missing or deactivated account never passes a role check.

use super::{User, UserRole};

pub fn has_role(user: Option<&User>, roles: &[UserRole]) -> bool {
    match user {
        Some(user) if user.is_active => roles.contains(&user.role),
        _ => false,
    }
}

pub fn is_admin(user: Option<&User>) -> bool {
    has_role(user, &[UserRole::Admin])
}

/// Moderators and admins
pub fn is_moderator(user: Option<&User>) -> bool {
    has_role(user, &[UserRole::Moderator, UserRole::Admin])
}

/// Any active account
pub fn is_user(user: Option<&User>) -> bool {
    has_role(user, &[UserRole::User, UserRole::Moderator, UserRole::Admin])
}

pub fn is_active(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.is_active)
}

impl UserRole {
    /// Name shown to end users
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Moderator => "Moderator",
            Self::Admin => "Administrator",
        }
    }
}
