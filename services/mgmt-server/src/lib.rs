// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Management-plane service library
//!
//! Serves account-scoped listings of accounts, domains and capacity over
//! the [`mgmt_api::MgmtApi`] trait. Tenancy and capacity data come from
//! JSON fixtures loaded at startup.
//!
//! # Modules
//!
//! - [`config`] - Server configuration (bind address, fixtures, paging limits)
//! - [`context`] - API context: the repository and the list pipelines
//! - [`error`] - Handler errors and their HTTP status mapping

pub mod config;
pub mod context;
pub mod error;

use dropshot::{HttpError, HttpResponseOk, Path, Query, RequestContext};
use mgmt_api::{
    AccountList, AccountPath, CALLER_HEADER, CapacityList, DomainList, ListAccountsQuery,
    ListCapacityQuery, ListDomainsQuery, MgmtApi, PingResponse,
};
use mgmt_capacity::{CapacityQuery, PodId, ZoneId};
use mgmt_tenancy::{Account, AccountId, DomainId};

use crate::context::{ApiContext, PageParams};
use crate::error::ApiError;

/// Management API implementation
///
/// This enum serves as the implementation type for the `MgmtApi` trait.
/// It contains no data - all state is stored in the `ApiContext`.
pub enum MgmtServerImpl {}

/// Resolve the calling account from the request headers
fn caller(rqctx: &RequestContext<ApiContext>) -> Result<Account, ApiError> {
    let id: AccountId = rqctx
        .request
        .headers()
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .ok_or(ApiError::MissingCaller(CALLER_HEADER))?;
    rqctx.context().caller(id)
}

impl MgmtApi for MgmtServerImpl {
    type Context = ApiContext;

    async fn ping(
        _rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<PingResponse>, HttpError> {
        Ok(HttpResponseOk(PingResponse {
            status: "ok".to_string(),
        }))
    }

    async fn list_accounts(
        rqctx: RequestContext<Self::Context>,
        query: Query<ListAccountsQuery>,
    ) -> Result<HttpResponseOk<AccountList>, HttpError> {
        let caller = caller(&rqctx)?;
        let query = query.into_inner();

        let list = rqctx
            .context()
            .list_accounts(
                &caller,
                query.account.as_deref(),
                query.domain_id.map(DomainId),
                PageParams {
                    page: query.page,
                    page_size: query.page_size,
                },
            )
            .inspect_err(|e| {
                tracing::info!(caller = %caller.id, error = %e, "list_accounts rejected");
            })?;

        tracing::debug!(
            caller = %caller.id,
            scope = ?list.scope,
            count = list.accounts.len(),
            "Listed accounts"
        );
        Ok(HttpResponseOk(list))
    }

    async fn get_account(
        rqctx: RequestContext<Self::Context>,
        path: Path<AccountPath>,
    ) -> Result<HttpResponseOk<Account>, HttpError> {
        let caller = caller(&rqctx)?;
        let id = AccountId(path.into_inner().id);

        let account = rqctx.context().get_account(&caller, id).inspect_err(|e| {
            tracing::info!(caller = %caller.id, account = %id, error = %e, "get_account rejected");
        })?;

        Ok(HttpResponseOk(account))
    }

    async fn list_domains(
        rqctx: RequestContext<Self::Context>,
        query: Query<ListDomainsQuery>,
    ) -> Result<HttpResponseOk<DomainList>, HttpError> {
        let caller = caller(&rqctx)?;
        let query = query.into_inner();

        let list = rqctx
            .context()
            .list_domains(
                &caller,
                query.domain_id.map(DomainId),
                PageParams {
                    page: query.page,
                    page_size: query.page_size,
                },
            )
            .inspect_err(|e| {
                tracing::info!(caller = %caller.id, error = %e, "list_domains rejected");
            })?;

        tracing::debug!(
            caller = %caller.id,
            scope = ?list.scope,
            count = list.domains.len(),
            "Listed domains"
        );
        Ok(HttpResponseOk(list))
    }

    async fn list_capacity(
        rqctx: RequestContext<Self::Context>,
        query: Query<ListCapacityQuery>,
    ) -> Result<HttpResponseOk<CapacityList>, HttpError> {
        let caller = caller(&rqctx)?;
        let query = query.into_inner();

        let filter = CapacityQuery {
            zone_id: query.zone_id.map(ZoneId),
            pod_id: query.pod_id.map(PodId),
            capacity_type: query.capacity_type,
        };
        let list = rqctx
            .context()
            .list_capacity(
                &caller,
                filter,
                query.sort_by,
                PageParams {
                    page: query.page,
                    page_size: query.page_size,
                },
            )
            .inspect_err(|e| {
                tracing::info!(caller = %caller.id, error = %e, "list_capacity rejected");
            })?;

        Ok(HttpResponseOk(list))
    }
}

/// Create the Dropshot API description for the server
pub fn api_description() -> Result<dropshot::ApiDescription<ApiContext>, String> {
    mgmt_api::mgmt_api_mod::api_description::<MgmtServerImpl>().map_err(|e| e.to_string())
}
