// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Account and domain lookups

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::path::is_descendant;
use crate::types::{Account, AccountId, Domain, DomainId};

/// Read-only view of the account/domain repository
///
/// Implementations must present a consistent snapshot for the duration of a
/// single resolution. Lookups that miss return `None`; deciding whether a
/// miss is an error is up to the caller.
pub trait Directory {
    /// Look up a domain by id
    fn domain(&self, id: DomainId) -> Option<Domain>;

    /// Look up an account by id
    fn account(&self, id: AccountId) -> Option<Account>;

    /// Look up an account by login name within one domain
    fn account_by_name(&self, name: &str, domain_id: DomainId) -> Option<Account>;
}

impl<T: Directory + ?Sized> Directory for &T {
    fn domain(&self, id: DomainId) -> Option<Domain> {
        (**self).domain(id)
    }

    fn account(&self, id: AccountId) -> Option<Account> {
        (**self).account(id)
    }

    fn account_by_name(&self, name: &str, domain_id: DomainId) -> Option<Account> {
        (**self).account_by_name(name, domain_id)
    }
}

/// Errors raised while building an [`InMemoryDirectory`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Duplicate domain id {0}")]
    DuplicateDomain(DomainId),

    #[error("Duplicate account id {0}")]
    DuplicateAccount(AccountId),

    #[error("Duplicate account name '{name}' in domain {domain_id}")]
    DuplicateAccountName { name: String, domain_id: DomainId },

    #[error("Expected exactly one root domain, found {0}")]
    RootCount(usize),

    #[error("Domain {id} has unknown parent {parent_id}")]
    UnknownParent { id: DomainId, parent_id: DomainId },

    #[error("Domain {id} has path '{path}', expected '{expected}'")]
    PathMismatch {
        id: DomainId,
        path: String,
        expected: String,
    },

    #[error("Domain {id} has level {level}, expected {expected}")]
    LevelMismatch { id: DomainId, level: u32, expected: u32 },

    #[error("Account {account_id} belongs to unknown domain {domain_id}")]
    UnknownDomain {
        account_id: AccountId,
        domain_id: DomainId,
    },
}

/// A validated in-memory snapshot of the tenancy tree
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    domains: BTreeMap<DomainId, Domain>,
    accounts: BTreeMap<AccountId, Account>,
    by_name: HashMap<(DomainId, String), AccountId>,
}

impl InMemoryDirectory {
    /// Build a directory, checking the materialized-path invariants
    ///
    /// Each domain's path must be its parent's path followed by its own id
    /// (the root's path is just its id), and its level must match the path
    /// depth. Every account must belong to a known domain.
    pub fn new(
        domains: impl IntoIterator<Item = Domain>,
        accounts: impl IntoIterator<Item = Account>,
    ) -> Result<Self, DirectoryError> {
        let mut dir = Self::default();

        for domain in domains {
            if dir.domains.contains_key(&domain.id) {
                return Err(DirectoryError::DuplicateDomain(domain.id));
            }
            dir.domains.insert(domain.id, domain);
        }

        let roots = dir.domains.values().filter(|d| d.is_root()).count();
        if !dir.domains.is_empty() && roots != 1 {
            return Err(DirectoryError::RootCount(roots));
        }

        for domain in dir.domains.values() {
            let expected = match domain.parent_id {
                None => domain.id.to_string(),
                Some(parent_id) => {
                    let parent =
                        dir.domains
                            .get(&parent_id)
                            .ok_or(DirectoryError::UnknownParent {
                                id: domain.id,
                                parent_id,
                            })?;
                    parent.path.child(domain.id).to_string()
                }
            };
            if domain.path.as_str() != expected {
                return Err(DirectoryError::PathMismatch {
                    id: domain.id,
                    path: domain.path.to_string(),
                    expected,
                });
            }
            let expected_level = (domain.path.depth() - 1) as u32;
            if domain.level != expected_level {
                return Err(DirectoryError::LevelMismatch {
                    id: domain.id,
                    level: domain.level,
                    expected: expected_level,
                });
            }
        }

        for account in accounts {
            if !dir.domains.contains_key(&account.domain_id) {
                return Err(DirectoryError::UnknownDomain {
                    account_id: account.id,
                    domain_id: account.domain_id,
                });
            }
            if dir.accounts.contains_key(&account.id) {
                return Err(DirectoryError::DuplicateAccount(account.id));
            }
            let key = (account.domain_id, account.name.clone());
            if dir.by_name.contains_key(&key) {
                return Err(DirectoryError::DuplicateAccountName {
                    name: account.name,
                    domain_id: account.domain_id,
                });
            }
            dir.by_name.insert(key, account.id);
            dir.accounts.insert(account.id, account);
        }

        Ok(dir)
    }

    /// The root domain, if the directory is not empty
    pub fn root(&self) -> Option<&Domain> {
        self.domains.values().find(|d| d.is_root())
    }

    /// All domains, ordered by id
    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.domains.values()
    }

    /// All accounts, ordered by id
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// `ancestor` and every domain beneath it, ordered by path
    pub fn descendants(&self, ancestor: DomainId) -> Vec<&Domain> {
        let mut found: Vec<&Domain> = self
            .domains
            .values()
            .filter(|d| is_descendant(ancestor, d.id, self))
            .collect();
        found.sort_by(|a, b| a.path.as_str().cmp(b.path.as_str()));
        found
    }
}

impl Directory for InMemoryDirectory {
    fn domain(&self, id: DomainId) -> Option<Domain> {
        self.domains.get(&id).cloned()
    }

    fn account(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).cloned()
    }

    fn account_by_name(&self, name: &str, domain_id: DomainId) -> Option<Account> {
        self.by_name
            .get(&(domain_id, name.to_string()))
            .and_then(|id| self.accounts.get(id))
            .cloned()
    }
}
