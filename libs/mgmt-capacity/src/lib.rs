// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Capacity rollups
//!
//! Raw capacity samples arrive per host or per storage pool. Reporting
//! commands want them summed per pod and per zone. [`CapacityAggregator`]
//! does that in one pass, applying the storage-pool inclusion rules on the
//! way in.

pub mod aggregate;
pub mod types;

pub use aggregate::{CapacityAggregator, CapacityQuery, percent_used, sort_by_usage};
pub use types::{
    CapacityRollup, CapacitySample, CapacityType, PodId, PoolType, ResourceId, ZoneId,
};
