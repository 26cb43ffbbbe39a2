// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sharing policy of a resource.
//!
//! A policy grants a default access level to a sharing scope population and owns a set of
//! explicit permission records. Deleting a policy deletes its permissions with it, they are
//! stored inside the policy value and never shared between policies.
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::access::{AccessLevel, SharingScope};
use crate::config::Config;
use crate::error::{IntegrityError, ValidationError};
use crate::identifier::{PermissionId, PolicyId};
use crate::member::{Contributor, Principal};
use crate::permission::Permission;
use crate::traits::IdentityHandle;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Policy<ID> {
    id: PolicyId,
    name: String,
    sharing_scope: SharingScope,
    access_type: AccessLevel,
    use_whitelist: bool,
    use_blacklist: bool,
    permissions: Vec<Permission<ID>>,
}

impl<ID> Policy<ID>
where
    ID: Copy,
{
    pub fn new(
        name: impl Into<String>,
        sharing_scope: SharingScope,
        access_type: AccessLevel,
    ) -> Self {
        Self {
            id: PolicyId::generate(),
            name: name.into(),
            sharing_scope,
            access_type,
            use_whitelist: false,
            use_blacklist: false,
            permissions: Vec::new(),
        }
    }

    /// Create a policy from unchecked numeric codes.
    pub fn from_codes(
        name: impl Into<String>,
        sharing_scope: i64,
        access_type: i64,
    ) -> Result<Self, ValidationError> {
        let sharing_scope = SharingScope::from_code(sharing_scope)?;
        let access_type = AccessLevel::from_code(access_type)?;
        Ok(Self::new(name, sharing_scope, access_type))
    }

    /// Restore a previously persisted policy with its original identifiers.
    ///
    /// No integrity checks are applied here, call [`Policy::check_integrity`] before trusting the
    /// result.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: PolicyId,
        name: impl Into<String>,
        sharing_scope: SharingScope,
        access_type: AccessLevel,
        use_whitelist: bool,
        use_blacklist: bool,
        permissions: Vec<Permission<ID>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            sharing_scope,
            access_type,
            use_whitelist,
            use_blacklist,
            permissions,
        }
    }

    /// The safe baseline: nobody but role holders can do anything.
    ///
    /// Private policies never carry permission records when created.
    pub fn private() -> Self {
        Self::new("default policy", SharingScope::Private, AccessLevel::NoAccess)
    }

    /// Policy used for resources which have no explicit policy and no project default.
    ///
    /// With the default configuration this equals [`Policy::private`].
    pub fn default_for(config: &Config) -> Self {
        Self::new(
            "default policy",
            config.default_sharing_scope(),
            config.default_access_type(),
        )
    }

    /// Copy of this policy with a new identity and freshly created, equivalent permission
    /// records.
    ///
    /// The copy does not share anything with the original and can be persisted on its own.
    pub fn deep_copy(&self) -> Self {
        let id = PolicyId::generate();
        let permissions = self
            .permissions
            .iter()
            .map(|permission| permission.copy_to(id))
            .collect();

        Self {
            id,
            name: self.name.clone(),
            sharing_scope: self.sharing_scope,
            access_type: self.access_type,
            use_whitelist: self.use_whitelist,
            use_blacklist: self.use_blacklist,
            permissions,
        }
    }

    pub fn id(&self) -> PolicyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sharing_scope(&self) -> SharingScope {
        self.sharing_scope
    }

    pub fn access_type(&self) -> AccessLevel {
        self.access_type
    }

    pub fn use_whitelist(&self) -> bool {
        self.use_whitelist
    }

    pub fn use_blacklist(&self) -> bool {
        self.use_blacklist
    }

    pub fn permissions(&self) -> &[Permission<ID>] {
        &self.permissions
    }

    /// Returns true if this is the private baseline without any explicit grants.
    pub fn is_entirely_private(&self) -> bool {
        self.sharing_scope == SharingScope::Private
            && self.access_type == AccessLevel::NoAccess
            && self.permissions.is_empty()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Change which population receives which default access level.
    pub fn set_sharing(&mut self, sharing_scope: SharingScope, access_type: AccessLevel) {
        self.sharing_scope = sharing_scope;
        self.access_type = access_type;
    }

    pub fn set_use_whitelist(&mut self, use_whitelist: bool) {
        self.use_whitelist = use_whitelist;
    }

    pub fn set_use_blacklist(&mut self, use_blacklist: bool) {
        self.use_blacklist = use_blacklist;
    }

    /// Grant an access level to a contributor, returning the id of the new record.
    pub fn grant(&mut self, contributor: Contributor<ID>, access: AccessLevel) -> PermissionId {
        let permission = Permission::new(self, contributor, access);
        let id = permission.id();
        self.permissions.push(permission);
        id
    }

    /// Attach an existing permission record, it has to be owned by this policy.
    pub fn add_permission(&mut self, permission: Permission<ID>) -> Result<(), IntegrityError> {
        if permission.policy_id() != self.id {
            return Err(IntegrityError::ForeignPermission {
                permission: permission.id(),
                owner: permission.policy_id(),
                holder: self.id,
            });
        }
        if self.permissions.contains(&permission) {
            return Err(IntegrityError::DuplicatePermission(permission.id(), self.id));
        }
        self.permissions.push(permission);
        Ok(())
    }

    /// Change the level of an existing record. Returns false if no such record exists.
    pub fn set_permission_access(&mut self, id: PermissionId, access: AccessLevel) -> bool {
        match self.permissions.iter_mut().find(|permission| permission.id() == id) {
            Some(permission) => {
                permission.set_access(access);
                true
            }
            None => false,
        }
    }

    /// Remove a record. Returns false if no such record exists.
    pub fn revoke(&mut self, id: PermissionId) -> bool {
        let before = self.permissions.len();
        self.permissions.retain(|permission| permission.id() != id);
        before != self.permissions.len()
    }

    /// Supersede the whole permission set with new records.
    pub fn replace_permissions(
        &mut self,
        grants: impl IntoIterator<Item = (Contributor<ID>, AccessLevel)>,
    ) {
        let permissions = grants
            .into_iter()
            .map(|(contributor, access)| Permission::new(self, contributor, access))
            .collect();
        self.permissions = permissions;
    }

    /// Make the resource accessible to everyone.
    pub(crate) fn publish(&mut self) {
        self.sharing_scope = SharingScope::Everyone;
        self.access_type = AccessLevel::Accessible;
    }

    /// Check that every permission record is owned by this policy and appears only once.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        let mut seen = HashSet::new();
        for permission in &self.permissions {
            if permission.policy_id() != self.id {
                return Err(IntegrityError::ForeignPermission {
                    permission: permission.id(),
                    owner: permission.policy_id(),
                    holder: self.id,
                });
            }
            if !seen.insert(permission.id()) {
                return Err(IntegrityError::DuplicatePermission(permission.id(), self.id));
            }
        }
        Ok(())
    }
}

impl<ID> Policy<ID>
where
    ID: IdentityHandle,
{
    /// Default access the principal receives through the sharing scope.
    ///
    /// Returns `None` when the principal lies outside the scope population or the scope grants
    /// nothing.
    pub fn scope_access(&self, principal: &Principal<ID>) -> Option<AccessLevel> {
        let covered = match principal {
            Principal::Anonymous => self.sharing_scope.includes_anonymous(),
            Principal::Person(_) => self.sharing_scope.includes_registered(),
        };

        if covered && !self.access_type.is_no_access() {
            Some(self.access_type)
        } else {
            None
        }
    }

    /// Highest level granted explicitly to the person, directly or through one of their groups.
    ///
    /// Returns `None` when no permission record applies.
    pub fn explicit_access(&self, person: &ID, groups: &[ID]) -> Option<AccessLevel> {
        self.permissions
            .iter()
            .filter(|permission| match permission.contributor() {
                Contributor::Individual(id) => id == *person,
                Contributor::Group(id) => groups.contains(&id),
            })
            .map(|permission| permission.access())
            .max()
    }
}
