// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use crate::access::AccessLevel;
use crate::identifier::PolicyId;
use crate::member::Person;
use crate::policy::Policy;
use crate::traits::IdentityHandle;

/// Read access to people, groups and their memberships.
pub trait MembershipStore<ID>
where
    ID: IdentityHandle,
{
    type Error: Error;

    /// Look up a registered person.
    fn person(&self, id: &ID) -> Result<Option<Person<ID>>, Self::Error>;

    /// All registered users of the network.
    fn network_members(&self) -> Result<Vec<Person<ID>>, Self::Error>;

    /// Direct members of a group.
    fn group_members(&self, group: &ID) -> Result<Vec<ID>, Self::Error>;

    /// Groups the given person is a member of.
    fn groups_of(&self, person: &ID) -> Result<Vec<ID>, Self::Error>;

    /// People the given owner has put on their whitelist, with the level they should receive.
    fn whitelist(&self, owner: &ID) -> Result<Vec<(ID, AccessLevel)>, Self::Error>;

    /// People the given owner has put on their blacklist.
    fn blacklist(&self, owner: &ID) -> Result<Vec<ID>, Self::Error>;
}

/// Read access to role memberships within projects.
pub trait RoleStore<ID>: MembershipStore<ID>
where
    ID: IdentityHandle,
{
    /// People designated as asset managers of the project.
    fn asset_managers(&self, project: &ID) -> Result<Vec<ID>, Self::Error>;

    /// People designated as project managers of the project.
    fn project_managers(&self, project: &ID) -> Result<Vec<ID>, Self::Error>;

    /// People designated as gatekeepers of the project.
    fn gatekeepers(&self, project: &ID) -> Result<Vec<ID>, Self::Error>;
}

/// Persistence of policies together with their permission records.
pub trait PolicyStore<ID>: MembershipStore<ID>
where
    ID: IdentityHandle,
{
    /// Get a policy with its full permission set.
    fn policy(&self, id: &PolicyId) -> Result<Option<Policy<ID>>, Self::Error>;

    /// Insert or replace a policy together with its full permission set.
    ///
    /// Implementations must apply the policy and its permissions as one atomic update, a reader
    /// must never observe the new policy with the old permissions or vice versa.
    fn update_policy(&self, policy: Policy<ID>) -> Result<(), Self::Error>;

    /// Change a stored policy in one atomic step.
    ///
    /// `modify` receives the current policy and returns true if it changed it, only then the
    /// result is stored. No other update of the same policy may happen between reading and
    /// storing it, `modify` itself must not call back into the store. Returns `None` if the policy
    /// does not exist.
    fn modify_policy<F>(&self, id: &PolicyId, modify: F) -> Result<Option<bool>, Self::Error>
    where
        F: FnOnce(&mut Policy<ID>) -> bool;

    /// Default policy a project hands to newly created resources, if it has one.
    fn project_default_policy(&self, project: &ID) -> Result<Option<Policy<ID>>, Self::Error>;

    /// Returns true if the person asked to publish the resource and the request still waits for
    /// a gatekeeper's decision.
    fn awaiting_publish_approval(&self, resource: &ID, person: &ID) -> Result<bool, Self::Error>;
}
