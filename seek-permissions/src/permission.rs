// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::access::AccessLevel;
use crate::error::ValidationError;
use crate::identifier::{PermissionId, PolicyId};
use crate::member::Contributor;
use crate::policy::Policy;

/// One explicit grant of an access level to a contributor, owned by exactly one policy.
///
/// Only the access level may change after creation. Records are identified by their generated
/// id, two records granting the same level to the same contributor are not equal.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Permission<ID> {
    id: PermissionId,
    policy_id: PolicyId,
    contributor: Contributor<ID>,
    access: AccessLevel,
}

impl<ID> Permission<ID>
where
    ID: Copy,
{
    /// Create a new permission record for the given policy.
    ///
    /// The record is not added to the policy, see [`Policy::grant`] for that.
    pub fn new(policy: &Policy<ID>, contributor: Contributor<ID>, access: AccessLevel) -> Self {
        Self {
            id: PermissionId::generate(),
            policy_id: policy.id(),
            contributor,
            access,
        }
    }

    /// Create a permission record from unchecked input, as handed over by a sharing form or a
    /// storage row.
    pub fn create(
        policy: &Policy<ID>,
        contributor: Option<Contributor<ID>>,
        access_code: i64,
    ) -> Result<Self, ValidationError> {
        let contributor = contributor.ok_or(ValidationError::MissingContributor)?;
        let access = AccessLevel::from_code(access_code)?;
        Ok(Self::new(policy, contributor, access))
    }

    /// Restore a previously persisted record with its original identifiers.
    pub fn from_parts(
        id: PermissionId,
        policy_id: PolicyId,
        contributor: Contributor<ID>,
        access: AccessLevel,
    ) -> Self {
        Self {
            id,
            policy_id,
            contributor,
            access,
        }
    }

    pub fn id(&self) -> PermissionId {
        self.id
    }

    pub fn policy_id(&self) -> PolicyId {
        self.policy_id
    }

    pub fn contributor(&self) -> Contributor<ID> {
        self.contributor
    }

    pub fn access(&self) -> AccessLevel {
        self.access
    }

    pub fn set_access(&mut self, access: AccessLevel) {
        self.access = access;
    }

    /// Equivalent record with a fresh identity, owned by another policy.
    pub(crate) fn copy_to(&self, policy_id: PolicyId) -> Self {
        Self {
            id: PermissionId::generate(),
            policy_id,
            contributor: self.contributor,
            access: self.access,
        }
    }
}

impl<ID> PartialEq for Permission<ID> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<ID> Eq for Permission<ID> {}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::{AccessLevel, Contributor, Policy, ValidationError};

    use super::Permission;

    #[test]
    fn create_validates_input() {
        let policy = Policy::<char>::private();

        let permission =
            Permission::create(&policy, Some(Contributor::Individual('A')), 6).unwrap();
        assert_eq!(permission.access(), AccessLevel::Editing);
        assert_eq!(permission.policy_id(), policy.id());

        assert_matches!(
            Permission::create(&policy, None, 6),
            Err(ValidationError::MissingContributor)
        );
        assert_matches!(
            Permission::create(&policy, Some(Contributor::Group('G')), 5),
            Err(ValidationError::UnknownAccessLevelCode(5))
        );
    }

    #[test]
    fn equality_is_by_identity() {
        let policy = Policy::<char>::private();
        let a = Permission::new(&policy, Contributor::Individual('A'), AccessLevel::Visible);
        let b = Permission::new(&policy, Contributor::Individual('A'), AccessLevel::Visible);
        assert_ne!(a, b);

        let mut a_edited = a.clone();
        a_edited.set_access(AccessLevel::Managing);
        assert_eq!(a, a_edited);
    }
}
