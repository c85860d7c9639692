// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! API context: the fixture-backed repository behind the handlers
//!
//! Each list operation runs the same pipeline: resolve the caller's scope,
//! filter the repository rows by it, then cut out the requested page.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use mgmt_api::{AccountList, CapacityList, CapacitySort, DomainList};
use mgmt_capacity::{
    CapacityAggregator, CapacityQuery, CapacitySample, PoolType, ResourceId, sort_by_usage,
};
use mgmt_pagination::{resolve_page_with_default, validate_page_size};
use mgmt_tenancy::{
    Account, AccountId, Directory, Domain, DomainId, EffectiveScope, InMemoryDirectory, ScopeError,
    ScopePolicy, ScopeResolver, check_account_access,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Storage pool entry in `storage_pools.json`
#[derive(Debug, Clone, Deserialize)]
struct StoragePool {
    id: ResourceId,
    pool_type: PoolType,
}

/// Page request as it arrives from the query string
#[derive(Debug, Clone, Copy, Default)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// API context shared across all request handlers
#[derive(Debug)]
pub struct ApiContext {
    directory: InMemoryDirectory,
    samples: Vec<CapacitySample>,
    pool_types: HashMap<ResourceId, PoolType>,
    policy: ScopePolicy,
    default_page_size: i64,
    max_page_size: i64,
}

impl ApiContext {
    /// Load the repository from the configured fixtures directory
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let dir = config.fixtures_dir.as_path();

        let domains: Vec<Domain> = load_json(&dir.join("domains.json"))?;
        let accounts: Vec<Account> = load_json(&dir.join("accounts.json"))?;
        let directory = InMemoryDirectory::new(domains, accounts)
            .with_context(|| format!("Invalid tenancy fixtures in {}", dir.display()))?;

        let samples: Vec<CapacitySample> = load_json(&dir.join("capacity.json"))?;
        let pools: Vec<StoragePool> = load_json(&dir.join("storage_pools.json"))?;
        let pool_types = pools.into_iter().map(|p| (p.id, p.pool_type)).collect();

        tracing::info!(
            domains = directory.domains().count(),
            accounts = directory.accounts().count(),
            samples = samples.len(),
            fixtures_dir = %dir.display(),
            "Loaded fixtures"
        );

        Ok(Self {
            directory,
            samples,
            pool_types,
            policy: config.scope,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        })
    }

    /// Look up the account behind the caller header
    pub fn caller(&self, id: AccountId) -> Result<Account, ApiError> {
        self.directory
            .account(id)
            .ok_or(ApiError::UnknownCaller(id))
    }

    fn resolver(&self) -> ScopeResolver<'_, InMemoryDirectory> {
        ScopeResolver::new(&self.directory).with_policy(self.policy)
    }

    fn bounds(&self, params: PageParams) -> Result<mgmt_pagination::PageBounds, ApiError> {
        validate_page_size(params.page_size, self.max_page_size)?;
        Ok(resolve_page_with_default(
            params.page,
            params.page_size,
            self.default_page_size,
        ))
    }

    /// Accounts visible to `caller`, optionally narrowed to a named
    /// account and/or a domain
    pub fn list_accounts(
        &self,
        caller: &Account,
        account_name: Option<&str>,
        domain_id: Option<DomainId>,
        params: PageParams,
    ) -> Result<AccountList, ApiError> {
        let bounds = self.bounds(params)?;
        let scope = self.resolver().resolve(caller, account_name, domain_id)?;

        let accounts = bounds
            .apply(
                self.directory
                    .accounts()
                    .filter(|a| scope.admits_account(a, &self.directory)),
            )
            .cloned()
            .collect();

        Ok(AccountList { scope, accounts })
    }

    /// A single account, if `caller` may see it
    pub fn get_account(&self, caller: &Account, id: AccountId) -> Result<Account, ApiError> {
        let target = self
            .directory
            .account(id)
            .ok_or(ApiError::NoSuchAccount(id))?;
        check_account_access(caller, &target, &self.directory)?;
        Ok(target)
    }

    /// Domains visible to `caller`, ordered by path
    pub fn list_domains(
        &self,
        caller: &Account,
        domain_id: Option<DomainId>,
        params: PageParams,
    ) -> Result<DomainList, ApiError> {
        let bounds = self.bounds(params)?;
        let scope = self.resolver().resolve(caller, None, domain_id)?;

        let visible = match scope {
            EffectiveScope::Domain {
                domain_id,
                recursive: true,
            } => self.directory.descendants(domain_id),
            // Account and single-domain scopes admit at most one domain
            _ => self
                .directory
                .domains()
                .filter(|d| scope.admits_domain(d.id, &self.directory))
                .collect(),
        };

        let domains = bounds.apply(visible).cloned().collect();
        Ok(DomainList { scope, domains })
    }

    /// Pod and zone capacity rollups; elevated callers only
    pub fn list_capacity(
        &self,
        caller: &Account,
        query: CapacityQuery,
        sort_by: Option<CapacitySort>,
        params: PageParams,
    ) -> Result<CapacityList, ApiError> {
        if !caller.role.is_elevated() {
            return Err(ScopeError::PermissionDenied(format!(
                "account {} may not view capacity",
                caller.id
            ))
            .into());
        }
        let bounds = self.bounds(params)?;

        let aggregator =
            CapacityAggregator::new(|id: ResourceId| self.pool_types.get(&id).copied());
        let mut rollups = aggregator.aggregate(self.samples.iter().filter(|s| query.matches(s)));
        if sort_by == Some(CapacitySort::Usage) {
            sort_by_usage(&mut rollups);
        }

        Ok(CapacityList {
            capacity: bounds.apply(rollups).collect(),
        })
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgmt_capacity::{CapacityType, ZoneId};

    fn context() -> ApiContext {
        ApiContext::new(&ServerConfig::default()).unwrap()
    }

    fn all() -> PageParams {
        PageParams {
            page: None,
            page_size: Some(-1),
        }
    }

    fn names(list: &AccountList) -> Vec<&str> {
        list.accounts.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_load_fixtures() {
        let ctx = context();
        assert_eq!(ctx.directory.domains().count(), 4);
        assert_eq!(ctx.directory.accounts().count(), 7);
        assert_eq!(ctx.samples.len(), 6);
        assert_eq!(ctx.pool_types.get(&ResourceId(201)), Some(&PoolType::Rbd));
    }

    #[test]
    fn test_missing_fixtures_dir() {
        let config = ServerConfig {
            fixtures_dir: "/nonexistent".into(),
            ..Default::default()
        };
        let err = ApiContext::new(&config).unwrap_err();
        assert!(err.to_string().contains("domains.json"));
    }

    #[test]
    fn test_user_sees_only_self() {
        let ctx = context();
        let bob = ctx.caller(AccountId(3)).unwrap();

        // Parameters are ignored for unprivileged callers
        let list = ctx
            .list_accounts(&bob, Some("alice"), Some(DomainId(5)), all())
            .unwrap();
        assert_eq!(list.scope, EffectiveScope::Account { account_id: AccountId(3) });
        assert_eq!(names(&list), vec!["bob"]);
    }

    #[test]
    fn test_domain_admin_own_domain() {
        let ctx = context();
        let alice = ctx.caller(AccountId(2)).unwrap();

        let list = ctx.list_accounts(&alice, None, None, all()).unwrap();
        assert!(!list.scope.is_recursive());
        assert_eq!(names(&list), vec!["alice", "auditor", "dave"]);

        let list = ctx
            .list_accounts(&alice, None, Some(DomainId(9)), all())
            .unwrap();
        assert_eq!(names(&list), vec!["bob"]);
    }

    #[test]
    fn test_domain_admin_recursive_policy() {
        let mut ctx = context();
        ctx.policy = ScopePolicy {
            bounded_recursive: true,
        };
        let alice = ctx.caller(AccountId(2)).unwrap();

        let list = ctx
            .list_accounts(&alice, None, Some(DomainId(5)), all())
            .unwrap();
        assert_eq!(names(&list), vec!["alice", "bob", "auditor", "dave"]);
    }

    #[test]
    fn test_domain_admin_sibling_denied() {
        let ctx = context();
        let alice = ctx.caller(AccountId(2)).unwrap();

        let err = ctx
            .list_accounts(&alice, None, Some(DomainId(6)), all())
            .unwrap_err();
        assert_eq!(err.code(), "PermissionDenied");
    }

    #[test]
    fn test_admin_sees_everything() {
        let ctx = context();
        let admin = ctx.caller(AccountId(1)).unwrap();

        let list = ctx.list_accounts(&admin, None, None, all()).unwrap();
        assert_eq!(
            list.scope,
            EffectiveScope::Domain {
                domain_id: DomainId(1),
                recursive: true
            }
        );
        assert_eq!(list.accounts.len(), 7);

        let list = ctx
            .list_accounts(&admin, Some("carol"), Some(DomainId(6)), all())
            .unwrap();
        assert_eq!(names(&list), vec!["carol"]);
    }

    #[test]
    fn test_pagination() {
        let ctx = context();
        let admin = ctx.caller(AccountId(1)).unwrap();

        let page = |page, page_size| PageParams {
            page: Some(page),
            page_size: Some(page_size),
        };
        let list = ctx.list_accounts(&admin, None, None, page(2, 3)).unwrap();
        assert_eq!(names(&list), vec!["carol", "auditor", "dave"]);

        let err = ctx
            .list_accounts(&admin, None, None, page(1, 0))
            .unwrap_err();
        assert_eq!(err.code(), "InvalidParameter");
    }

    #[test]
    fn test_get_account() {
        let ctx = context();
        let alice = ctx.caller(AccountId(2)).unwrap();
        let bob = ctx.caller(AccountId(3)).unwrap();

        assert_eq!(ctx.get_account(&alice, AccountId(3)).unwrap().name, "bob");
        assert_eq!(ctx.get_account(&bob, AccountId(3)).unwrap().name, "bob");
        assert_eq!(
            ctx.get_account(&bob, AccountId(2)).unwrap_err().code(),
            "PermissionDenied"
        );
        assert_eq!(
            ctx.get_account(&alice, AccountId(4)).unwrap_err().code(),
            "PermissionDenied"
        );
        assert_eq!(
            ctx.get_account(&alice, AccountId(99)).unwrap_err().code(),
            "AccountNotFound"
        );
    }

    #[test]
    fn test_list_domains() {
        let ctx = context();
        let ids = |list: &DomainList| list.domains.iter().map(|d| d.id.0).collect::<Vec<_>>();

        let admin = ctx.caller(AccountId(1)).unwrap();
        let list = ctx.list_domains(&admin, None, all()).unwrap();
        assert_eq!(ids(&list), vec![1, 5, 9, 6]);

        let list = ctx.list_domains(&admin, Some(DomainId(5)), all()).unwrap();
        assert_eq!(ids(&list), vec![5, 9]);

        let bob = ctx.caller(AccountId(3)).unwrap();
        let list = ctx.list_domains(&bob, None, all()).unwrap();
        assert_eq!(ids(&list), vec![9]);

        let carol = ctx.caller(AccountId(4)).unwrap();
        let list = ctx.list_domains(&carol, None, all()).unwrap();
        assert_eq!(ids(&list), vec![6]);

        // Recursive scopes page over the subtree in path order
        let page = PageParams {
            page: Some(2),
            page_size: Some(2),
        };
        let list = ctx.list_domains(&admin, None, page).unwrap();
        assert!(list.scope.is_recursive());
        assert_eq!(ids(&list), vec![9, 6]);
    }

    #[test]
    fn test_list_domains_bounded_recursive() {
        let ctx = ApiContext::new(&ServerConfig {
            scope: ScopePolicy {
                bounded_recursive: true,
            },
            ..ServerConfig::default()
        })
        .unwrap();

        let alice = ctx.caller(AccountId(2)).unwrap();
        let ids = |list: &DomainList| list.domains.iter().map(|d| d.id.0).collect::<Vec<_>>();

        // Naming nothing stays on the home domain alone
        let list = ctx.list_domains(&alice, None, PageParams::default()).unwrap();
        assert!(!list.scope.is_recursive());
        assert_eq!(ids(&list), vec![5]);

        let list = ctx
            .list_domains(&alice, Some(DomainId(5)), PageParams::default())
            .unwrap();
        assert_eq!(
            list.scope,
            EffectiveScope::Domain {
                domain_id: DomainId(5),
                recursive: true
            }
        );
        assert_eq!(ids(&list), vec![5, 9]);
    }

    #[test]
    fn test_capacity_requires_elevated_role() {
        let ctx = context();
        let bob = ctx.caller(AccountId(3)).unwrap();
        let err = ctx
            .list_capacity(&bob, CapacityQuery::default(), None, all())
            .unwrap_err();
        assert_eq!(err.code(), "PermissionDenied");
    }

    #[test]
    fn test_capacity_rollups() {
        let ctx = context();
        let admin = ctx.caller(AccountId(1)).unwrap();

        let list = ctx
            .list_capacity(&admin, CapacityQuery::default(), None, all())
            .unwrap();
        // memory: pod + zone, cpu: 2 pods + zone, storage: pod + zone
        // (Rbd pool dropped), public ip: zone only
        assert_eq!(list.capacity.len(), 8);

        let storage: Vec<_> = list
            .capacity
            .iter()
            .filter(|r| r.capacity_type == CapacityType::Storage)
            .collect();
        assert_eq!(storage.len(), 2);
        assert!(storage.iter().all(|r| r.total_capacity == 1000));

        let query = CapacityQuery {
            zone_id: Some(ZoneId(1)),
            capacity_type: Some(CapacityType::Cpu),
            ..Default::default()
        };
        let list = ctx
            .list_capacity(&admin, query, Some(CapacitySort::Usage), all())
            .unwrap();
        let percents: Vec<f64> = list.capacity.iter().map(|r| r.percent_used).collect();
        assert_eq!(percents, vec![50.0, 37.5, 25.0]);
    }
}
