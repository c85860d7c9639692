// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Scope resolution
//!
//! Turns a caller plus optional "act as account X in domain Y" parameters
//! into an [`EffectiveScope`] that a handler can apply to its repository
//! query. Rules, first match wins:
//!
//! 1. User/Project callers are always scoped to their own account; any
//!    explicit parameters are ignored.
//! 2. Elevated callers naming a domain: bounded roles (DomainAdmin,
//!    ReadOnlyAdmin) must name a domain inside their own subtree. With an
//!    account name the scope narrows to that account, otherwise it covers
//!    the domain (recursively for Admin; per [`ScopePolicy`] for bounded
//!    roles).
//! 3. Elevated callers naming an account without a domain are rejected.
//! 4. Admin with no parameters sees everything from the root down.
//! 5. Bounded roles with no parameters see their own domain only.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::directory::Directory;
use crate::error::ScopeError;
use crate::path::is_descendant;
use crate::types::{Account, AccountId, DomainId, Role};

/// Account or domain-subtree restriction applied to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectiveScope {
    /// Exactly one account
    Account { account_id: AccountId },
    /// One domain, plus its descendants when `recursive`
    Domain { domain_id: DomainId, recursive: bool },
}

impl EffectiveScope {
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            EffectiveScope::Account { account_id } => Some(*account_id),
            EffectiveScope::Domain { .. } => None,
        }
    }

    pub fn domain_id(&self) -> Option<DomainId> {
        match self {
            EffectiveScope::Account { .. } => None,
            EffectiveScope::Domain { domain_id, .. } => Some(*domain_id),
        }
    }

    pub fn is_recursive(&self) -> bool {
        matches!(self, EffectiveScope::Domain { recursive: true, .. })
    }

    /// Whether `account` falls inside this scope
    pub fn admits_account<D: Directory + ?Sized>(&self, account: &Account, directory: &D) -> bool {
        match *self {
            EffectiveScope::Account { account_id } => account.id == account_id,
            EffectiveScope::Domain {
                domain_id,
                recursive: false,
            } => account.domain_id == domain_id,
            EffectiveScope::Domain {
                domain_id,
                recursive: true,
            } => is_descendant(domain_id, account.domain_id, directory),
        }
    }

    /// Whether the domain `id` falls inside this scope
    ///
    /// An account scope admits only the account's own domain.
    pub fn admits_domain<D: Directory + ?Sized>(&self, id: DomainId, directory: &D) -> bool {
        match *self {
            EffectiveScope::Account { account_id } => directory
                .account(account_id)
                .is_some_and(|a| a.domain_id == id),
            EffectiveScope::Domain {
                domain_id,
                recursive: false,
            } => domain_id == id && directory.domain(id).is_some(),
            EffectiveScope::Domain {
                domain_id,
                recursive: true,
            } => is_descendant(domain_id, id, directory),
        }
    }
}

/// Knobs that differ between deployments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopePolicy {
    /// Whether a bounded role (DomainAdmin, ReadOnlyAdmin) naming a domain
    /// also sees that domain's descendants. Admin always does.
    #[serde(default)]
    pub bounded_recursive: bool,
}

/// Resolves caller scopes against a [`Directory`]
#[derive(Debug)]
pub struct ScopeResolver<'a, D: ?Sized> {
    directory: &'a D,
    policy: ScopePolicy,
}

impl<'a, D: Directory + ?Sized> ScopeResolver<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            policy: ScopePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScopePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compute the scope `caller` may query, given optional explicit
    /// account-name and domain-id parameters
    pub fn resolve(
        &self,
        caller: &Account,
        account_name: Option<&str>,
        domain_id: Option<DomainId>,
    ) -> Result<EffectiveScope, ScopeError> {
        let scope = self.resolve_inner(caller, account_name, domain_id);
        match &scope {
            Ok(s) => tracing::debug!(
                caller = %caller.id,
                role = %caller.role,
                scope = ?s,
                "resolved scope"
            ),
            Err(e) => tracing::debug!(
                caller = %caller.id,
                role = %caller.role,
                error = %e,
                "scope rejected"
            ),
        }
        scope
    }

    fn resolve_inner(
        &self,
        caller: &Account,
        account_name: Option<&str>,
        domain_id: Option<DomainId>,
    ) -> Result<EffectiveScope, ScopeError> {
        if !caller.role.is_elevated() {
            return Ok(EffectiveScope::Account {
                account_id: caller.id,
            });
        }

        let Some(domain_id) = domain_id else {
            if account_name.is_some() {
                return Err(ScopeError::InvalidParameter(
                    "account must be accompanied by domain".to_string(),
                ));
            }
            return self.default_scope(caller);
        };

        self.authorize_domain(caller, domain_id)?;

        if let Some(name) = account_name {
            let account = self
                .directory
                .account_by_name(name, domain_id)
                .ok_or_else(|| ScopeError::AccountNotFound {
                    name: name.to_string(),
                    domain_id,
                })?;
            return Ok(EffectiveScope::Account {
                account_id: account.id,
            });
        }

        let recursive = match caller.role {
            Role::Admin => true,
            _ => self.policy.bounded_recursive,
        };
        Ok(EffectiveScope::Domain {
            domain_id,
            recursive,
        })
    }

    /// Scope for an elevated caller that named nothing
    fn default_scope(&self, caller: &Account) -> Result<EffectiveScope, ScopeError> {
        if caller.role.is_domain_bounded() {
            return Ok(EffectiveScope::Domain {
                domain_id: caller.domain_id,
                recursive: false,
            });
        }

        let home = self
            .directory
            .domain(caller.domain_id)
            .ok_or(ScopeError::DomainNotFound(caller.domain_id))?;
        let root = home.path.root_id().unwrap_or(home.id);
        Ok(EffectiveScope::Domain {
            domain_id: root,
            recursive: true,
        })
    }

    /// Check that an elevated caller may reach `domain_id`
    fn authorize_domain(&self, caller: &Account, domain_id: DomainId) -> Result<(), ScopeError> {
        if caller.role.is_domain_bounded() {
            if !is_descendant(caller.domain_id, domain_id, self.directory) {
                return Err(ScopeError::PermissionDenied(format!(
                    "account {} cannot access domain {} outside its domain {}",
                    caller.id, domain_id, caller.domain_id
                )));
            }
        } else if self.directory.domain(domain_id).is_none() {
            return Err(ScopeError::DomainNotFound(domain_id));
        }
        Ok(())
    }
}

/// Check that `caller` may view or modify the single account `target`
///
/// Unprivileged callers may only touch themselves, bounded roles may touch
/// accounts anywhere in their domain subtree, and Admin may touch anything.
pub fn check_account_access<D: Directory + ?Sized>(
    caller: &Account,
    target: &Account,
    directory: &D,
) -> Result<(), ScopeError> {
    let allowed = match caller.role {
        Role::Admin => true,
        Role::DomainAdmin | Role::ReadOnlyAdmin => {
            is_descendant(caller.domain_id, target.domain_id, directory)
        }
        Role::User | Role::Project => caller.id == target.id,
    };

    if allowed {
        Ok(())
    } else {
        Err(ScopeError::PermissionDenied(format!(
            "account {} cannot access account {}",
            caller.id, target.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::path::DomainPath;
    use crate::types::Domain;
    use quickcheck::{Arbitrary, Gen, QuickCheck};
    use quickcheck_helpers::random;

    /// Account name a caller might ask for: either one that exists in the
    /// test directory or random lowercase text
    #[derive(Clone, Debug)]
    struct AccountName(String);

    impl Arbitrary for AccountName {
        fn arbitrary(g: &mut Gen) -> Self {
            const KNOWN: [&str; 6] = ["admin", "dadmin", "auditor", "bob", "carol", "proj"];
            if bool::arbitrary(g) {
                let i = random::below(g, KNOWN.len() as u64) as usize;
                AccountName(KNOWN[i].to_string())
            } else {
                let len = 1 + random::below(g, 12) as usize;
                AccountName(random::string(g, len))
            }
        }
    }

    fn domain(id: u64, parent: Option<u64>, path: &str) -> Domain {
        let path = DomainPath::new(path).unwrap();
        Domain {
            id: DomainId(id),
            name: format!("d{}", id),
            parent_id: parent.map(DomainId),
            level: (path.depth() - 1) as u32,
            path,
        }
    }

    fn account(id: u64, name: &str, role: Role, domain_id: u64) -> Account {
        Account {
            id: AccountId(id),
            name: name.to_string(),
            role,
            domain_id: DomainId(domain_id),
        }
    }

    /// ROOT(1) -> 5 -> 9
    ///         -> 7
    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new(
            vec![
                domain(1, None, "1"),
                domain(5, Some(1), "1/5"),
                domain(9, Some(5), "1/5/9"),
                domain(7, Some(1), "1/7"),
            ],
            vec![
                account(1, "admin", Role::Admin, 1),
                account(2, "dadmin", Role::DomainAdmin, 5),
                account(3, "auditor", Role::ReadOnlyAdmin, 5),
                account(10, "bob", Role::User, 9),
                account(11, "carol", Role::User, 7),
                account(12, "proj", Role::Project, 9),
            ],
        )
        .unwrap()
    }

    fn caller(dir: &InMemoryDirectory, id: u64) -> Account {
        dir.account(AccountId(id)).unwrap()
    }

    #[test]
    fn test_admin_without_params_sees_everything() {
        let dir = directory();
        let scope = ScopeResolver::new(&dir)
            .resolve(&caller(&dir, 1), None, None)
            .unwrap();
        assert_eq!(
            scope,
            EffectiveScope::Domain {
                domain_id: DomainId(1),
                recursive: true
            }
        );
    }

    #[test]
    fn test_admin_in_subdomain_defaults_to_root() {
        let dir = InMemoryDirectory::new(
            vec![domain(1, None, "1"), domain(5, Some(1), "1/5")],
            vec![account(1, "ops", Role::Admin, 5)],
        )
        .unwrap();
        let scope = ScopeResolver::new(&dir)
            .resolve(&caller(&dir, 1), None, None)
            .unwrap();
        assert_eq!(scope.domain_id(), Some(DomainId(1)));
        assert!(scope.is_recursive());
    }

    #[test]
    fn test_domain_admin_names_account_in_subdomain() {
        let dir = directory();
        let scope = ScopeResolver::new(&dir)
            .resolve(&caller(&dir, 2), Some("bob"), Some(DomainId(9)))
            .unwrap();
        assert_eq!(
            scope,
            EffectiveScope::Account {
                account_id: AccountId(10)
            }
        );
    }

    #[test]
    fn test_domain_admin_cross_domain_denied() {
        let dir = directory();
        let resolver = ScopeResolver::new(&dir);
        for id in [2, 3] {
            let err = resolver
                .resolve(&caller(&dir, id), None, Some(DomainId(7)))
                .unwrap_err();
            assert_eq!(err.code(), "PermissionDenied");

            let err = resolver
                .resolve(&caller(&dir, id), Some("carol"), Some(DomainId(7)))
                .unwrap_err();
            assert_eq!(err.code(), "PermissionDenied");

            let err = resolver
                .resolve(&caller(&dir, id), None, Some(DomainId(1)))
                .unwrap_err();
            assert_eq!(err.code(), "PermissionDenied");
        }
    }

    #[test]
    fn test_domain_admin_unknown_domain_denied() {
        let dir = directory();
        let err = ScopeResolver::new(&dir)
            .resolve(&caller(&dir, 2), None, Some(DomainId(404)))
            .unwrap_err();
        assert_eq!(err.code(), "PermissionDenied");
    }

    #[test]
    fn test_admin_unknown_domain_not_found() {
        let dir = directory();
        let err = ScopeResolver::new(&dir)
            .resolve(&caller(&dir, 1), None, Some(DomainId(404)))
            .unwrap_err();
        assert_eq!(err, ScopeError::DomainNotFound(DomainId(404)));
    }

    #[test]
    fn test_unknown_account_name() {
        let dir = directory();
        let err = ScopeResolver::new(&dir)
            .resolve(&caller(&dir, 1), Some("carol"), Some(DomainId(9)))
            .unwrap_err();
        assert_eq!(
            err,
            ScopeError::AccountNotFound {
                name: "carol".to_string(),
                domain_id: DomainId(9)
            }
        );
    }

    #[test]
    fn test_account_without_domain_is_invalid() {
        let dir = directory();
        for id in [1, 2, 3] {
            let err = ScopeResolver::new(&dir)
                .resolve(&caller(&dir, id), Some("bob"), None)
                .unwrap_err();
            assert_eq!(err.code(), "InvalidParameter");
        }
    }

    #[test]
    fn test_domain_recursion_policy() {
        let dir = directory();

        let admin = ScopeResolver::new(&dir)
            .resolve(&caller(&dir, 1), None, Some(DomainId(5)))
            .unwrap();
        assert_eq!(
            admin,
            EffectiveScope::Domain {
                domain_id: DomainId(5),
                recursive: true
            }
        );

        let bounded = ScopeResolver::new(&dir)
            .resolve(&caller(&dir, 2), None, Some(DomainId(9)))
            .unwrap();
        assert_eq!(
            bounded,
            EffectiveScope::Domain {
                domain_id: DomainId(9),
                recursive: false
            }
        );

        let bounded = ScopeResolver::new(&dir)
            .with_policy(ScopePolicy {
                bounded_recursive: true,
            })
            .resolve(&caller(&dir, 2), None, Some(DomainId(5)))
            .unwrap();
        assert!(bounded.is_recursive());
    }

    #[test]
    fn test_bounded_default_is_own_domain() {
        let dir = directory();
        let scope = ScopeResolver::new(&dir)
            .resolve(&caller(&dir, 3), None, None)
            .unwrap();
        assert_eq!(
            scope,
            EffectiveScope::Domain {
                domain_id: DomainId(5),
                recursive: false
            }
        );
    }

    #[test]
    fn test_unprivileged_params_ignored() {
        let dir = directory();
        let resolver = ScopeResolver::new(&dir);
        for id in [10, 12] {
            let me = caller(&dir, id);
            for (name, domain) in [
                (None, None),
                (Some("carol"), Some(DomainId(7))),
                (Some("carol"), None),
                (None, Some(DomainId(404))),
            ] {
                let scope = resolver.resolve(&me, name, domain).unwrap();
                assert_eq!(scope, EffectiveScope::Account { account_id: me.id });
            }
        }
    }

    #[test]
    fn test_unprivileged_scope_for_any_params() {
        fn prop(name: AccountName, domain: Option<u64>, project: bool) -> bool {
            let dir = directory();
            let me = if project {
                caller(&dir, 12)
            } else {
                caller(&dir, 10)
            };
            let scope = ScopeResolver::new(&dir)
                .resolve(&me, Some(name.0.as_str()), domain.map(DomainId))
                .unwrap();
            scope.account_id() == Some(me.id)
        }

        QuickCheck::new().quickcheck(prop as fn(AccountName, Option<u64>, bool) -> bool);
    }

    #[test]
    fn test_scope_admits_account() {
        let dir = directory();
        let bob = caller(&dir, 10);
        let carol = caller(&dir, 11);

        let subtree = EffectiveScope::Domain {
            domain_id: DomainId(5),
            recursive: true,
        };
        assert!(subtree.admits_account(&bob, &dir));
        assert!(!subtree.admits_account(&carol, &dir));

        let flat = EffectiveScope::Domain {
            domain_id: DomainId(5),
            recursive: false,
        };
        assert!(!flat.admits_account(&bob, &dir));
        assert!(flat.admits_account(&caller(&dir, 2), &dir));

        let single = EffectiveScope::Account {
            account_id: bob.id,
        };
        assert!(single.admits_account(&bob, &dir));
        assert!(!single.admits_account(&carol, &dir));
    }

    #[test]
    fn test_scope_admits_domain() {
        let dir = directory();
        let single = EffectiveScope::Account {
            account_id: AccountId(10),
        };
        assert!(single.admits_domain(DomainId(9), &dir));
        assert!(!single.admits_domain(DomainId(5), &dir));

        let subtree = EffectiveScope::Domain {
            domain_id: DomainId(5),
            recursive: true,
        };
        assert!(subtree.admits_domain(DomainId(9), &dir));
        assert!(!subtree.admits_domain(DomainId(7), &dir));
    }

    #[test]
    fn test_check_account_access() {
        let dir = directory();
        let admin = caller(&dir, 1);
        let dadmin = caller(&dir, 2);
        let bob = caller(&dir, 10);
        let carol = caller(&dir, 11);

        assert!(check_account_access(&admin, &carol, &dir).is_ok());
        assert!(check_account_access(&dadmin, &bob, &dir).is_ok());
        assert!(check_account_access(&dadmin, &carol, &dir).is_err());
        assert!(check_account_access(&bob, &bob, &dir).is_ok());
        assert_eq!(
            check_account_access(&bob, &carol, &dir)
                .unwrap_err()
                .code(),
            "PermissionDenied"
        );
    }

    #[test]
    fn test_scope_serialization() {
        let scope = EffectiveScope::Domain {
            domain_id: DomainId(1),
            recursive: true,
        };
        let json = serde_json::to_value(scope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "domain", "domain_id": 1, "recursive": true})
        );
    }
}
