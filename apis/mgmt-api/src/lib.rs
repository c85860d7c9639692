// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Dropshot API trait for the management plane.
//!
//! Every endpoint is account-scoped. The caller's account id arrives in the
//! [`CALLER_HEADER`] request header, set by the authenticating front end;
//! this API does not authenticate on its own.
//!
//! ## Endpoints
//!
//! - `GET /ping` - Health check
//! - `GET /accounts` - List accounts visible to the caller
//! - `GET /accounts/{id}` - Get one account
//! - `GET /domains` - List domains visible to the caller
//! - `GET /capacity` - Pod and zone capacity rollups (elevated callers only)

use dropshot::{HttpError, HttpResponseOk, Path, Query, RequestContext};
use mgmt_capacity::{CapacityRollup, CapacityType};
use mgmt_tenancy::{Account, Domain, EffectiveScope};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Header carrying the authenticated caller's account id
pub const CALLER_HEADER: &str = "x-caller-account";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PingResponse {
    pub status: String,
}

/// Query parameters for listing accounts
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListAccountsQuery {
    /// Act on this account name; requires `domain_id`
    pub account: Option<String>,
    /// Restrict to this domain (elevated callers only)
    pub domain_id: Option<u64>,
    /// 1-based page number (default: first page)
    pub page: Option<i64>,
    /// Rows per page; -1 for no limit
    pub page_size: Option<i64>,
}

/// Accounts visible under the resolved scope
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AccountList {
    pub scope: EffectiveScope,
    pub accounts: Vec<Account>,
}

/// Path parameter for single-account endpoints
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AccountPath {
    /// Account id
    pub id: u64,
}

/// Query parameters for listing domains
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListDomainsQuery {
    /// Restrict to this domain (elevated callers only)
    pub domain_id: Option<u64>,
    /// 1-based page number (default: first page)
    pub page: Option<i64>,
    /// Rows per page; -1 for no limit
    pub page_size: Option<i64>,
}

/// Domains visible under the resolved scope
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DomainList {
    pub scope: EffectiveScope,
    pub domains: Vec<Domain>,
}

/// Ordering for capacity listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CapacitySort {
    /// Highest percentage used first
    Usage,
}

/// Query parameters for capacity listing
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListCapacityQuery {
    /// Only samples from this zone
    pub zone_id: Option<u64>,
    /// Only samples from this pod
    pub pod_id: Option<u64>,
    /// Only samples of this capacity type
    pub capacity_type: Option<CapacityType>,
    /// Sort order (default: by capacity type, zone, pod)
    pub sort_by: Option<CapacitySort>,
    /// 1-based page number (default: first page)
    pub page: Option<i64>,
    /// Rows per page; -1 for no limit
    pub page_size: Option<i64>,
}

/// Capacity rollups, pod rows and zone totals
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CapacityList {
    pub capacity: Vec<CapacityRollup>,
}

// ============================================================================
// API Trait
// ============================================================================

/// Management Plane API
#[dropshot::api_description]
pub trait MgmtApi {
    /// Context type for request handlers
    type Context: Send + Sync + 'static;

    /// Health check
    #[endpoint {
        method = GET,
        path = "/ping",
        tags = ["system"],
    }]
    async fn ping(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<PingResponse>, HttpError>;

    /// List accounts
    ///
    /// Unprivileged callers only ever see their own account. Elevated
    /// callers may name a domain (and optionally an account in it) inside
    /// the subtree they administer.
    ///
    /// Returns 403 if the named domain is outside the caller's reach, 404 if
    /// the named account or domain does not exist, and 400 if an account
    /// name is given without a domain.
    #[endpoint {
        method = GET,
        path = "/accounts",
        tags = ["accounts"],
    }]
    async fn list_accounts(
        rqctx: RequestContext<Self::Context>,
        query: Query<ListAccountsQuery>,
    ) -> Result<HttpResponseOk<AccountList>, HttpError>;

    /// Get an account
    ///
    /// Returns 403 if the account is outside the caller's reach.
    #[endpoint {
        method = GET,
        path = "/accounts/{id}",
        tags = ["accounts"],
    }]
    async fn get_account(
        rqctx: RequestContext<Self::Context>,
        path: Path<AccountPath>,
    ) -> Result<HttpResponseOk<Account>, HttpError>;

    /// List domains
    #[endpoint {
        method = GET,
        path = "/domains",
        tags = ["domains"],
    }]
    async fn list_domains(
        rqctx: RequestContext<Self::Context>,
        query: Query<ListDomainsQuery>,
    ) -> Result<HttpResponseOk<DomainList>, HttpError>;

    /// List capacity
    ///
    /// Rolls host and storage-pool capacity samples up per pod and per
    /// zone. Zone rows have a null `pod_id`.
    ///
    /// Returns 403 for unprivileged callers.
    #[endpoint {
        method = GET,
        path = "/capacity",
        tags = ["capacity"],
    }]
    async fn list_capacity(
        rqctx: RequestContext<Self::Context>,
        query: Query<ListCapacityQuery>,
    ) -> Result<HttpResponseOk<CapacityList>, HttpError>;
}
