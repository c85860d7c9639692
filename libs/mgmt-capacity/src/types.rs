// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Capacity sample and rollup types

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, VariantNames};

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            JsonSchema,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Zone (data center) identifier
    ZoneId
);
numeric_id!(
    /// Pod identifier
    PodId
);
numeric_id!(
    /// Identifier of the sampled host or storage pool
    ResourceId
);

// ============================================================================
// Enumerations
// ============================================================================

/// Kind of capacity a sample measures
///
/// Variants are declared in numeric-code order, which is also the order
/// rollups are reported in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapacityType {
    Memory,
    Cpu,
    Storage,
    StorageAllocated,
    PublicIp,
    PrivateIp,
    SecondaryStorage,
    Vlan,
    DirectAttachedPublicIp,
    LocalStorage,
}

impl CapacityType {
    /// Stable numeric code
    pub fn code(self) -> u16 {
        match self {
            CapacityType::Memory => 0,
            CapacityType::Cpu => 1,
            CapacityType::Storage => 2,
            CapacityType::StorageAllocated => 3,
            CapacityType::PublicIp => 4,
            CapacityType::PrivateIp => 5,
            CapacityType::SecondaryStorage => 6,
            CapacityType::Vlan => 7,
            CapacityType::DirectAttachedPublicIp => 8,
            CapacityType::LocalStorage => 9,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|t| t.code() == code)
    }

    /// Whether samples of this type come from shared primary-storage pools
    /// and are subject to the pool-type filter
    pub fn is_pool_storage(self) -> bool {
        matches!(self, CapacityType::Storage | CapacityType::StorageAllocated)
    }
}

/// Backing technology of a storage pool
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
pub enum PoolType {
    NetworkFilesystem,
    #[serde(rename = "IscsiLUN")]
    #[strum(serialize = "IscsiLUN")]
    IscsiLun,
    Filesystem,
    Lvm,
    Clvm,
    Rbd,
    SharedMountPoint,
    Vmfs,
    PreSetup,
    #[serde(other)]
    Unknown,
}

impl PoolType {
    /// Whether a pool of this type counts toward reported storage capacity
    pub fn counts_toward_capacity(self) -> bool {
        matches!(self, PoolType::NetworkFilesystem | PoolType::IscsiLun)
    }
}

// ============================================================================
// Samples and rollups
// ============================================================================

/// One raw capacity measurement for a host or storage pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CapacitySample {
    pub capacity_type: CapacityType,
    pub data_center_id: ZoneId,
    /// Absent for zone-wide resources
    #[serde(default)]
    pub pod_id: Option<PodId>,
    pub host_or_pool_id: ResourceId,
    pub used_capacity: u64,
    pub total_capacity: u64,
}

/// Summed capacity for one pod, or for a whole zone when `pod_id` is None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CapacityRollup {
    pub capacity_type: CapacityType,
    pub data_center_id: ZoneId,
    pub pod_id: Option<PodId>,
    pub used_capacity: u64,
    pub total_capacity: u64,
    pub percent_used: f64,
}

impl CapacityRollup {
    pub fn is_zone_total(&self) -> bool {
        self.pod_id.is_none()
    }
}
