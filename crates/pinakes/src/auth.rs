/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Caller identity and roles.
//!
//! Managers take a plain [`Caller`] value instead of a web-framework
//! security context. `Option<&Caller>` with `None` is the unauthenticated,
//! public-only view.

use serde::{Deserialize, Serialize};

/// Roles recognized by the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Onboarding-team access (moderation without infrastructure admin)
    Epot,
    /// Provider representative
    Provider,
    /// Plain authenticated user
    User,
}

impl Role {
    /// Returns the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Epot => "ROLE_EPOT",
            Role::Provider => "ROLE_PROVIDER",
            Role::User => "ROLE_USER",
        }
    }

    /// Parses a role from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ROLE_ADMIN" => Some(Role::Admin),
            "ROLE_EPOT" => Some(Role::Epot),
            "ROLE_PROVIDER" => Some(Role::Provider),
            "ROLE_USER" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of the user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Email address, recorded in the audit trail
    pub email: String,
    /// Display name, recorded in the audit trail
    pub full_name: String,
    /// Granted roles
    pub roles: Vec<Role>,
}

impl Caller {
    /// Creates a caller with a single role.
    pub fn new(email: impl Into<String>, full_name: impl Into<String>, role: Role) -> Self {
        Caller {
            email: email.into(),
            full_name: full_name.into(),
            roles: vec![role],
        }
    }

    /// The identity synchronization hooks act under.
    pub fn system() -> Self {
        Caller {
            email: "system".to_string(),
            full_name: "System".to_string(),
            roles: vec![Role::Admin],
        }
    }

    /// Whether the caller holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the caller may perform moderation actions.
    pub fn is_moderator(&self) -> bool {
        self.has_role(Role::Admin) || self.has_role(Role::Epot)
    }

    /// Highest-privilege role label, recorded in logging-info entries.
    pub fn role_label(&self) -> &'static str {
        for role in [Role::Admin, Role::Epot, Role::Provider, Role::User] {
            if self.has_role(role) {
                return role.as_str();
            }
        }
        "ROLE_USER"
    }
}
