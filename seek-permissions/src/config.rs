// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::access::{AccessLevel, SharingScope};
use crate::error::ValidationError;

/// Configuration for an authorizer instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Sharing scope of the policy handed to resources without an explicit one.
    pub(crate) default_sharing_scope: SharingScope,

    /// Access level of the policy handed to resources without an explicit one.
    pub(crate) default_access_type: AccessLevel,

    /// Level implied by the gatekeeper role, gatekeepers need to inspect content before they
    /// approve publishing it.
    pub(crate) gatekeeper_access: AccessLevel,
}

impl Config {
    pub fn new() -> Self {
        Self {
            default_sharing_scope: SharingScope::Private,
            default_access_type: AccessLevel::NoAccess,
            gatekeeper_access: AccessLevel::Accessible,
        }
    }

    pub fn with_default_sharing(
        mut self,
        sharing_scope: SharingScope,
        access_type: AccessLevel,
    ) -> Self {
        self.default_sharing_scope = sharing_scope;
        self.default_access_type = access_type;
        self
    }

    pub fn with_gatekeeper_access(mut self, access: AccessLevel) -> Self {
        self.gatekeeper_access = access;
        self
    }

    pub fn default_sharing_scope(&self) -> SharingScope {
        self.default_sharing_scope
    }

    pub fn default_access_type(&self) -> AccessLevel {
        self.default_access_type
    }

    pub fn gatekeeper_access(&self) -> AccessLevel {
        self.gatekeeper_access
    }

    /// Reject settings which would make the gatekeeper role meaningless or let it edit.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.gatekeeper_access < AccessLevel::Visible
            || self.gatekeeper_access > AccessLevel::Editing
        {
            return Err(ValidationError::InvalidGatekeeperAccess(
                self.gatekeeper_access,
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
