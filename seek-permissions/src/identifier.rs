// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static NEXT_POLICY_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_PERMISSION_ID: AtomicU64 = AtomicU64::new(1);

/// Generated identifier of a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolicyId(u64);

impl PolicyId {
    /// Generate a fresh, process-unique policy id.
    pub fn generate() -> Self {
        Self(NEXT_POLICY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PolicyId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for PolicyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "policy#{}", self.0)
    }
}

/// Generated identifier of a permission record.
///
/// Permission records are compared by this identifier only, two grants with the same contributor
/// and level are still different records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PermissionId(u64);

impl PermissionId {
    /// Generate a fresh, process-unique permission id.
    pub fn generate() -> Self {
        Self(NEXT_PERMISSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PermissionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for PermissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "permission#{}", self.0)
    }
}
