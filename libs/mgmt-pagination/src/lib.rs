// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Page/page-size arithmetic shared by every list command
//!
//! List commands accept a 1-based `page` and a `page_size`. A `page_size`
//! of [`UNLIMITED`] (-1) means "return everything"; the offset is then
//! always 0 and no multiplication happens. An absent or non-positive
//! `page` means the first page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller gives none
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Page size sentinel meaning "no limit"
pub const UNLIMITED: i64 = -1;

/// Errors from validating a caller-supplied page size
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Zero, or negative other than the -1 sentinel
    #[error("Invalid page size {0}: must be positive or -1 for no limit")]
    InvalidPageSize(i64),

    /// Above the configured maximum
    #[error("Page size {size} exceeds the maximum of {max}")]
    PageSizeTooLarge { size: i64, max: i64 },
}

impl PageError {
    pub fn code(&self) -> &'static str {
        "InvalidParameter"
    }
}

/// Offset and limit for a repository query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBounds {
    pub offset: i64,
    /// None means unbounded
    pub limit: Option<i64>,
}

impl PageBounds {
    /// Every row
    pub const UNBOUNDED: PageBounds = PageBounds {
        offset: 0,
        limit: None,
    };

    /// Apply these bounds to an iterator of rows
    pub fn apply<I: IntoIterator>(self, rows: I) -> impl Iterator<Item = I::Item> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = match self.limit {
            Some(limit) => usize::try_from(limit).unwrap_or(0),
            None => usize::MAX,
        };
        rows.into_iter().skip(skip).take(take)
    }
}

/// Resolve `page`/`page_size` using [`DEFAULT_PAGE_SIZE`]
pub fn resolve_page(page: Option<i64>, page_size: Option<i64>) -> PageBounds {
    resolve_page_with_default(page, page_size, DEFAULT_PAGE_SIZE)
}

/// Resolve `page`/`page_size`, using `default_size` when no size is given
///
/// Some commands default to an effectively unlimited size; they pass their
/// own `default_size` here. Sizes that [`validate_page_size`] would reject
/// as negative resolve to an empty page, never a negative offset or limit.
pub fn resolve_page_with_default(
    page: Option<i64>,
    page_size: Option<i64>,
    default_size: i64,
) -> PageBounds {
    let size = page_size.unwrap_or(default_size);
    if size == UNLIMITED {
        return PageBounds::UNBOUNDED;
    }
    let size = size.max(0);

    let offset = match page {
        Some(p) if p > 0 => size.saturating_mul(p - 1),
        _ => 0,
    };
    PageBounds {
        offset,
        limit: Some(size),
    }
}

/// Reject page sizes that are zero, negative (other than -1), or above `max`
pub fn validate_page_size(page_size: Option<i64>, max: i64) -> Result<(), PageError> {
    match page_size {
        None | Some(UNLIMITED) => Ok(()),
        Some(size) if size <= 0 => Err(PageError::InvalidPageSize(size)),
        Some(size) if size > max => Err(PageError::PageSizeTooLarge { size, max }),
        Some(_) => Ok(()),
    }
}
