// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Request-level errors and their HTTP mapping

use dropshot::{ClientErrorStatusCode, HttpError};
use mgmt_pagination::PageError;
use mgmt_tenancy::{AccountId, ScopeError};
use thiserror::Error;

/// Everything a handler can fail with
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Page(#[from] PageError),

    /// No usable caller header on the request
    #[error("Missing or malformed {0} header")]
    MissingCaller(&'static str),

    /// The caller header names no known account
    #[error("Unknown caller account {0}")]
    UnknownCaller(AccountId),

    /// A path parameter names no known account
    #[error("Account {0} not found")]
    NoSuchAccount(AccountId),
}

impl ApiError {
    /// Stable error code reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Scope(e) => e.code(),
            ApiError::Page(e) => e.code(),
            ApiError::MissingCaller(_) | ApiError::UnknownCaller(_) => "Unauthorized",
            ApiError::NoSuchAccount(_) => "AccountNotFound",
        }
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let code = Some(err.code().to_string());
        let message = err.to_string();
        match err {
            ApiError::Scope(ScopeError::PermissionDenied(_)) => {
                HttpError::for_client_error(code, ClientErrorStatusCode::FORBIDDEN, message)
            }
            ApiError::Scope(ScopeError::AccountNotFound { .. })
            | ApiError::Scope(ScopeError::DomainNotFound(_))
            | ApiError::NoSuchAccount(_) => HttpError::for_not_found(code, message),
            ApiError::Scope(ScopeError::InvalidParameter(_)) | ApiError::Page(_) => {
                HttpError::for_bad_request(code, message)
            }
            ApiError::MissingCaller(_) | ApiError::UnknownCaller(_) => {
                HttpError::for_client_error(code, ClientErrorStatusCode::UNAUTHORIZED, message)
            }
        }
    }
}
