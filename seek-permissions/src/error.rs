// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

use crate::identifier::{PermissionId, PolicyId};

/// Malformed input detected while constructing or mutating a policy or permission.
///
/// These are never coerced into a default access level, as silently granting access is worse
/// than failing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown access level code {0}")]
    UnknownAccessLevelCode(i64),

    #[error("unknown access level '{0}'")]
    UnknownAccessLevelName(String),

    #[error("unknown sharing scope code {0}")]
    UnknownSharingScopeCode(i64),

    #[error("unknown sharing scope '{0}'")]
    UnknownSharingScopeName(String),

    #[error("permission requires a contributor")]
    MissingContributor,

    #[error("gatekeeper access must lie between visible and editing, got {0}")]
    InvalidGatekeeperAccess(crate::AccessLevel),
}

/// Inconsistent state between a policy and its permission records.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("permission {permission} belongs to policy {owner} but is held by policy {holder}")]
    ForeignPermission {
        permission: PermissionId,
        owner: PolicyId,
        holder: PolicyId,
    },

    #[error("permission {0} appears more than once in policy {1}")]
    DuplicatePermission(PermissionId, PolicyId),

    #[error("policy {0} referenced by resource was not found")]
    MissingPolicy(PolicyId),
}
