// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Materialized domain paths
//!
//! A domain's path is the slash-joined chain of domain ids from the root
//! down to the domain itself. The path of every descendant extends the path
//! of its ancestor segment by segment, which turns "is D under A?" into a
//! prefix test instead of a walk up the parent chain.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::directory::Directory;
use crate::types::DomainId;

/// Root-to-node path of a domain, stored without leading/trailing slashes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainPath(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDomainPath(pub String);

impl fmt::Display for InvalidDomainPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid domain path: '{}' (expected ids joined by '/')",
            self.0
        )
    }
}

impl std::error::Error for InvalidDomainPath {}

impl DomainPath {
    /// Parse a path, tolerating a leading or trailing '/'
    ///
    /// Every segment must be a domain id; empty segments ("1//5") are
    /// rejected.
    pub fn new(path: impl AsRef<str>) -> Result<Self, InvalidDomainPath> {
        let raw = path.as_ref();
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty()
            || trimmed
                .split('/')
                .any(|seg| seg.is_empty() || seg.parse::<DomainId>().is_err())
        {
            return Err(InvalidDomainPath(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Path of the child `id` directly below this one
    pub fn child(&self, id: DomainId) -> Self {
        Self(format!("{}/{}", self.0, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain ids from the root down to this domain
    pub fn segments(&self) -> impl Iterator<Item = DomainId> + '_ {
        // Segments were validated in new(), so none are dropped here.
        self.0.split('/').filter_map(|seg| seg.parse().ok())
    }

    /// Id of the root domain this path hangs from
    pub fn root_id(&self) -> Option<DomainId> {
        self.segments().next()
    }

    /// Number of segments (root = 1)
    pub fn depth(&self) -> usize {
        self.0.split('/').count()
    }

    /// Whether `other` is this path or lies beneath it
    ///
    /// The comparison is segment-aligned: "1/5" contains "1/5/9" but not
    /// "1/51".
    pub fn contains(&self, other: &DomainPath) -> bool {
        other
            .0
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

impl TryFrom<String> for DomainPath {
    type Error = InvalidDomainPath;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DomainPath> for String {
    fn from(path: DomainPath) -> Self {
        path.0
    }
}

impl fmt::Display for DomainPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl JsonSchema for DomainPath {
    fn schema_name() -> String {
        "DomainPath".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

/// Whether `candidate` is `ancestor` or one of its descendants
///
/// Returns false when either id does not resolve through `directory`;
/// absence means "not contained", never an error.
pub fn is_descendant<D: Directory + ?Sized>(
    ancestor: DomainId,
    candidate: DomainId,
    directory: &D,
) -> bool {
    let (Some(anc), Some(cand)) = (directory.domain(ancestor), directory.domain(candidate)) else {
        return false;
    };
    ancestor == candidate || anc.path.contains(&cand.path)
}
