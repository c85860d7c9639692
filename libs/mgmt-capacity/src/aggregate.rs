// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Pod and zone rollups
//!
//! Each surviving sample is added to two independent accumulators: one for
//! its pod (if it has one) and one for its whole zone. The zone total is
//! not the sum of the pod rows, since pod-less resources (secondary storage,
//! zone-wide primary pools) only ever land in the zone accumulator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{
    CapacityRollup, CapacitySample, CapacityType, PodId, PoolType, ResourceId, ZoneId,
};

/// Second half of a rollup key. `Pod` orders before `AllPods`, so a zone's
/// pod rows are emitted ahead of its zone total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Granularity {
    Pod(PodId),
    AllPods,
}

type RollupKey = (CapacityType, ZoneId, Granularity);

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    used: u64,
    total: u64,
}

impl Totals {
    fn add(&mut self, sample: &CapacitySample) {
        self.used = self.used.saturating_add(sample.used_capacity);
        self.total = self.total.saturating_add(sample.total_capacity);
    }
}

/// Percentage of `total` that is `used`; 0 when `total` is 0
pub fn percent_used(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}

/// Rolls capacity samples up to pod and zone level
///
/// `pool_type_of` maps a storage pool id to its type. Pool-storage samples
/// whose pool is not NetworkFilesystem or IscsiLUN, or whose pool type is
/// unknown (`None`), are left out. Other capacity types skip the lookup.
pub struct CapacityAggregator<F> {
    pool_type_of: F,
}

impl<F> CapacityAggregator<F>
where
    F: Fn(ResourceId) -> Option<PoolType>,
{
    pub fn new(pool_type_of: F) -> Self {
        Self { pool_type_of }
    }

    fn included(&self, sample: &CapacitySample) -> bool {
        if !sample.capacity_type.is_pool_storage() {
            return true;
        }
        let pool_type = (self.pool_type_of)(sample.host_or_pool_id);
        let keep = pool_type.is_some_and(PoolType::counts_toward_capacity);
        if !keep {
            tracing::trace!(
                pool = %sample.host_or_pool_id,
                pool_type = ?pool_type,
                "excluding storage pool from capacity"
            );
        }
        keep
    }

    /// Aggregate `samples` into per-pod and per-zone rollups
    ///
    /// The result is ordered by capacity type, then zone, with a zone's pod
    /// rows before its zone total. Input order does not affect the output.
    pub fn aggregate<'s>(
        &self,
        samples: impl IntoIterator<Item = &'s CapacitySample>,
    ) -> Vec<CapacityRollup> {
        let mut sums: BTreeMap<RollupKey, Totals> = BTreeMap::new();

        for sample in samples.into_iter().filter(|s| self.included(s)) {
            if let Some(pod_id) = sample.pod_id {
                sums.entry((
                    sample.capacity_type,
                    sample.data_center_id,
                    Granularity::Pod(pod_id),
                ))
                .or_default()
                .add(sample);
            }
            sums.entry((
                sample.capacity_type,
                sample.data_center_id,
                Granularity::AllPods,
            ))
            .or_default()
            .add(sample);
        }

        sums.into_iter()
            .map(
                |((capacity_type, data_center_id, granularity), totals)| CapacityRollup {
                    capacity_type,
                    data_center_id,
                    pod_id: match granularity {
                        Granularity::Pod(pod_id) => Some(pod_id),
                        Granularity::AllPods => None,
                    },
                    used_capacity: totals.used,
                    total_capacity: totals.total,
                    percent_used: percent_used(totals.used, totals.total),
                },
            )
            .collect()
    }
}

fn rollup_key(rollup: &CapacityRollup) -> RollupKey {
    let granularity = match rollup.pod_id {
        Some(pod_id) => Granularity::Pod(pod_id),
        None => Granularity::AllPods,
    };
    (rollup.capacity_type, rollup.data_center_id, granularity)
}

/// Order rollups by descending percentage used
///
/// Equal percentages fall back to key order: capacity type, then zone,
/// then pod rows ahead of the zone total.
pub fn sort_by_usage(rollups: &mut [CapacityRollup]) {
    rollups.sort_by(|a, b| {
        b.percent_used
            .total_cmp(&a.percent_used)
            .then_with(|| rollup_key(a).cmp(&rollup_key(b)))
    });
}

/// Predicate a sample source applies before aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityQuery {
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    #[serde(default)]
    pub pod_id: Option<PodId>,
    #[serde(default)]
    pub capacity_type: Option<CapacityType>,
}

impl CapacityQuery {
    pub fn matches(&self, sample: &CapacitySample) -> bool {
        self.zone_id.is_none_or(|z| z == sample.data_center_id)
            && self.pod_id.is_none_or(|p| sample.pod_id == Some(p))
            && self.capacity_type.is_none_or(|t| t == sample.capacity_type)
    }
}
