// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Account, domain and role types

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};

use crate::path::DomainPath;

// ============================================================================
// Identifiers
// ============================================================================

/// Domain identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct DomainId(pub u64);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DomainId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(DomainId)
    }
}

/// Account identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(AccountId)
    }
}

// ============================================================================
// Roles
// ============================================================================

/// Role of an account
///
/// Admin and ReadOnlyAdmin are elevated. DomainAdmin is elevated but bounded
/// to its own domain subtree. User and Project are unprivileged and can only
/// ever act on themselves.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    User,
    DomainAdmin,
    Admin,
    ReadOnlyAdmin,
    Project,
}

impl Role {
    /// Whether this role may act on accounts other than its own
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Admin | Role::DomainAdmin | Role::ReadOnlyAdmin)
    }

    /// Whether this role's reach is limited to its own domain subtree
    pub fn is_domain_bounded(self) -> bool {
        matches!(self, Role::DomainAdmin | Role::ReadOnlyAdmin)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A tenant principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Account {
    pub id: AccountId,
    /// Login name, unique within the owning domain
    pub name: String,
    pub role: Role,
    /// The single domain this account belongs to
    pub domain_id: DomainId,
}

/// A node in the tenancy tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
    /// None for the root domain
    #[serde(default)]
    pub parent_id: Option<DomainId>,
    /// Root-to-node chain of domain ids, e.g. "1/5/9"
    pub path: DomainPath,
    /// Depth from the root (root = 0)
    pub level: u32,
}

impl Domain {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_classification() {
        assert!(!Role::User.is_elevated());
        assert!(!Role::Project.is_elevated());
        assert!(Role::Admin.is_elevated());
        assert!(Role::DomainAdmin.is_elevated());
        assert!(Role::ReadOnlyAdmin.is_elevated());

        assert!(!Role::Admin.is_domain_bounded());
        assert!(Role::DomainAdmin.is_domain_bounded());
        assert!(Role::ReadOnlyAdmin.is_domain_bounded());
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Role::DomainAdmin.to_string(), "domain_admin");
        assert_eq!("read_only_admin".parse::<Role>().ok(), Some(Role::ReadOnlyAdmin));
        assert_eq!(
            serde_json::to_string(&Role::Project).unwrap(),
            "\"project\""
        );
    }

    #[test]
    fn test_account_deserialize() {
        let json = r#"{"id": 7, "name": "bob", "role": "user", "domain_id": 9}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.id, AccountId(7));
        assert_eq!(account.domain_id, DomainId(9));
        assert_eq!(account.role, Role::User);
    }

    #[test]
    fn test_domain_deserialize() {
        let json = r#"{"id": 9, "name": "eng", "parent_id": 5, "path": "1/5/9", "level": 2}"#;
        let domain: Domain = serde_json::from_str(json).unwrap();
        assert_eq!(domain.path.as_str(), "1/5/9");
        assert!(!domain.is_root());

        let json = r#"{"id": 1, "name": "ROOT", "path": "/1/", "level": 0}"#;
        let root: Domain = serde_json::from_str(json).unwrap();
        assert!(root.is_root());
        assert_eq!(root.path.as_str(), "1");
    }
}
