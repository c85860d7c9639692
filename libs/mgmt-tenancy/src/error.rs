// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Error types for mgmt-tenancy

use thiserror::Error;

use crate::types::DomainId;

/// Errors returned by scope resolution and access checks
///
/// All of these are caller-visible. None are transient: resolution does no
/// I/O of its own, so there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The caller tried to reach outside the domain subtree it administers
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The named account does not exist in the given domain
    #[error("Account '{name}' not found in domain {domain_id}")]
    AccountNotFound { name: String, domain_id: DomainId },

    /// The referenced domain does not exist
    #[error("Domain {0} not found")]
    DomainNotFound(DomainId),

    /// The request parameters are malformed or contradict each other
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ScopeError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ScopeError::PermissionDenied(_) => "PermissionDenied",
            ScopeError::AccountNotFound { .. } => "AccountNotFound",
            ScopeError::DomainNotFound(_) => "DomainNotFound",
            ScopeError::InvalidParameter(_) => "InvalidParameter",
        }
    }
}
