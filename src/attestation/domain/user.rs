//! Registered user identity consumed by the scheduling engine.

use super::{EmailAddress, UserId};
use serde::{Deserialize, Serialize};

/// A registered account, as the external user directory exposes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    first_name: String,
    last_name: String,
    manager_email: Option<EmailAddress>,
}

impl User {
    /// Creates a user snapshot.
    #[must_use]
    pub fn new(
        id: UserId,
        email: EmailAddress,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        manager_email: Option<EmailAddress>,
    ) -> Self {
        Self {
            id,
            email,
            first_name: first_name.into(),
            last_name: last_name.into(),
            manager_email,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the user's first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the user's last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the user's display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the manager's email address, when known.
    #[must_use]
    pub const fn manager_email(&self) -> Option<&EmailAddress> {
        self.manager_email.as_ref()
    }
}
