// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Tenancy scoping for management-plane commands
//!
//! Every list/update/delete command needs to answer the same two questions
//! before it touches a repository:
//!
//! 1. Which accounts or domains may this caller see or modify?
//! 2. Does the caller's request cross a tenancy boundary?
//!
//! This crate answers both without doing any I/O. Account and domain data
//! come in through the [`Directory`] trait, so handlers can back it with a
//! database snapshot, a cache, or the bundled [`InMemoryDirectory`].
//!
//! # Modules
//!
//! - [`types`] - Account, domain and role types
//! - [`path`] - Materialized domain paths and subtree containment
//! - [`directory`] - Lookup trait and the in-memory directory
//! - [`scope`] - Scope resolution and per-account access checks
//! - [`error`] - Caller-visible scoping errors

pub mod directory;
pub mod error;
pub mod path;
pub mod scope;
pub mod types;

pub use directory::{Directory, DirectoryError, InMemoryDirectory};
pub use error::ScopeError;
pub use path::{DomainPath, InvalidDomainPath, is_descendant};
pub use scope::{EffectiveScope, ScopePolicy, ScopeResolver, check_account_access};
pub use types::{Account, AccountId, Domain, DomainId, Role};
