// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store for people, role memberships and policies.
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::{debug, warn};

use crate::access::AccessLevel;
use crate::error::IntegrityError;
use crate::identifier::PolicyId;
use crate::member::Person;
use crate::policy::Policy;
use crate::traits::{IdentityHandle, MembershipStore, PolicyStore, RoleStore};

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

#[derive(Clone, Debug)]
pub struct InnerMemoryStore<ID> {
    people: HashMap<ID, Person<ID>>,
    group_members: HashMap<ID, HashSet<ID>>,
    whitelists: HashMap<ID, Vec<(ID, AccessLevel)>>,
    blacklists: HashMap<ID, HashSet<ID>>,
    asset_managers: HashMap<ID, HashSet<ID>>,
    project_managers: HashMap<ID, HashSet<ID>>,
    gatekeepers: HashMap<ID, HashSet<ID>>,
    policies: HashMap<PolicyId, Policy<ID>>,
    project_default_policies: HashMap<ID, PolicyId>,
    publish_requests: HashSet<(ID, ID)>,
}

impl<ID> Default for InnerMemoryStore<ID> {
    fn default() -> Self {
        Self {
            people: HashMap::new(),
            group_members: HashMap::new(),
            whitelists: HashMap::new(),
            blacklists: HashMap::new(),
            asset_managers: HashMap::new(),
            project_managers: HashMap::new(),
            gatekeepers: HashMap::new(),
            policies: HashMap::new(),
            project_default_policies: HashMap::new(),
            publish_requests: HashSet::new(),
        }
    }
}

/// An in-memory store implementing all store traits of this crate.
///
/// `MemoryStore` supports usage in multi-threaded contexts by wrapping an `InnerMemoryStore` with
/// an `RwLock` and `Arc`. Cloned handles share the same data.
#[derive(Clone, Debug)]
pub struct MemoryStore<ID> {
    inner: Arc<RwLock<InnerMemoryStore<ID>>>,
}

impl<ID> MemoryStore<ID> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(InnerMemoryStore::default())),
        }
    }

    /// Obtain a read-lock on the store.
    pub fn read_store(&self) -> RwLockReadGuard<'_, InnerMemoryStore<ID>> {
        self.inner
            .read()
            .expect("acquire shared read access on store")
    }

    /// Obtain a write-lock on the store.
    pub fn write_store(&self) -> RwLockWriteGuard<'_, InnerMemoryStore<ID>> {
        self.inner
            .write()
            .expect("acquire exclusive write access on store")
    }
}

impl<ID> Default for MemoryStore<ID> {
    fn default() -> Self {
        Self::new()
    }
}

impl<ID> MemoryStore<ID>
where
    ID: IdentityHandle,
{
    pub fn insert_person(&self, person: Person<ID>) {
        self.write_store().people.insert(person.id, person);
    }

    pub fn add_group_member(&self, group: ID, person: ID) {
        self.write_store()
            .group_members
            .entry(group)
            .or_default()
            .insert(person);
    }

    pub fn remove_group_member(&self, group: ID, person: ID) -> bool {
        match self.write_store().group_members.get_mut(&group) {
            Some(members) => members.remove(&person),
            None => false,
        }
    }

    /// Put a person on the owner's whitelist, replacing an earlier entry for them.
    pub fn whitelist_person(&self, owner: ID, person: ID, access: AccessLevel) {
        let mut store = self.write_store();
        let whitelist = store.whitelists.entry(owner).or_default();
        whitelist.retain(|(id, _)| *id != person);
        whitelist.push((person, access));
    }

    pub fn blacklist_person(&self, owner: ID, person: ID) {
        self.write_store()
            .blacklists
            .entry(owner)
            .or_default()
            .insert(person);
    }

    pub fn add_asset_manager(&self, project: ID, person: ID) {
        self.write_store()
            .asset_managers
            .entry(project)
            .or_default()
            .insert(person);
    }

    pub fn add_project_manager(&self, project: ID, person: ID) {
        self.write_store()
            .project_managers
            .entry(project)
            .or_default()
            .insert(person);
    }

    pub fn add_gatekeeper(&self, project: ID, person: ID) {
        self.write_store()
            .gatekeepers
            .entry(project)
            .or_default()
            .insert(person);
    }

    /// Store a policy and make it the default for new resources of the project.
    pub fn set_project_default_policy(
        &self,
        project: ID,
        policy: Policy<ID>,
    ) -> Result<(), MemoryStoreError> {
        policy.check_integrity()?;
        let mut store = self.write_store();
        store.project_default_policies.insert(project, policy.id());
        store.policies.insert(policy.id(), policy);
        Ok(())
    }

    /// Record that the person asked a gatekeeper to publish the resource.
    pub fn request_publish(&self, resource: ID, person: ID) {
        self.write_store().publish_requests.insert((resource, person));
    }

    /// Record the gatekeeper's decision on an open publish request.
    pub fn resolve_publish_request(&self, resource: ID, person: ID) -> bool {
        self.write_store()
            .publish_requests
            .remove(&(resource, person))
    }

    /// Delete a policy together with all its permission records.
    pub fn remove_policy(&self, id: &PolicyId) -> Option<Policy<ID>> {
        let mut store = self.write_store();
        store
            .project_default_policies
            .retain(|_, policy_id| policy_id != id);
        store.policies.remove(id)
    }
}

impl<ID> MembershipStore<ID> for MemoryStore<ID>
where
    ID: IdentityHandle,
{
    type Error = MemoryStoreError;

    fn person(&self, id: &ID) -> Result<Option<Person<ID>>, Self::Error> {
        Ok(self.read_store().people.get(id).cloned())
    }

    fn network_members(&self) -> Result<Vec<Person<ID>>, Self::Error> {
        let mut people: Vec<Person<ID>> = self.read_store().people.values().cloned().collect();
        people.sort_by_key(|person| person.id);
        Ok(people)
    }

    fn group_members(&self, group: &ID) -> Result<Vec<ID>, Self::Error> {
        Ok(sorted(self.read_store().group_members.get(group)))
    }

    fn groups_of(&self, person: &ID) -> Result<Vec<ID>, Self::Error> {
        let mut groups: Vec<ID> = self
            .read_store()
            .group_members
            .iter()
            .filter(|(_, members)| members.contains(person))
            .map(|(group, _)| *group)
            .collect();
        groups.sort();
        Ok(groups)
    }

    fn whitelist(&self, owner: &ID) -> Result<Vec<(ID, AccessLevel)>, Self::Error> {
        Ok(self
            .read_store()
            .whitelists
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }

    fn blacklist(&self, owner: &ID) -> Result<Vec<ID>, Self::Error> {
        Ok(sorted(self.read_store().blacklists.get(owner)))
    }
}

fn sorted<ID: IdentityHandle>(people: Option<&HashSet<ID>>) -> Vec<ID> {
    let mut people: Vec<ID> = people
        .map(|people| people.iter().copied().collect())
        .unwrap_or_default();
    people.sort();
    people
}

impl<ID> RoleStore<ID> for MemoryStore<ID>
where
    ID: IdentityHandle,
{
    fn asset_managers(&self, project: &ID) -> Result<Vec<ID>, Self::Error> {
        Ok(sorted(self.read_store().asset_managers.get(project)))
    }

    fn project_managers(&self, project: &ID) -> Result<Vec<ID>, Self::Error> {
        Ok(sorted(self.read_store().project_managers.get(project)))
    }

    fn gatekeepers(&self, project: &ID) -> Result<Vec<ID>, Self::Error> {
        Ok(sorted(self.read_store().gatekeepers.get(project)))
    }
}

impl<ID> PolicyStore<ID> for MemoryStore<ID>
where
    ID: IdentityHandle,
{
    fn policy(&self, id: &PolicyId) -> Result<Option<Policy<ID>>, Self::Error> {
        Ok(self.read_store().policies.get(id).cloned())
    }

    fn update_policy(&self, policy: Policy<ID>) -> Result<(), Self::Error> {
        if let Err(err) = policy.check_integrity() {
            warn!(policy = %policy.id(), %err, "refusing to store inconsistent policy");
            return Err(err.into());
        }

        debug!(
            policy = %policy.id(),
            sharing_scope = %policy.sharing_scope(),
            access_type = %policy.access_type(),
            permissions = policy.permissions().len(),
            "replace policy"
        );

        // Policy and permissions are one value, swapping it under the write lock is atomic.
        self.write_store().policies.insert(policy.id(), policy);
        Ok(())
    }

    fn modify_policy<F>(&self, id: &PolicyId, modify: F) -> Result<Option<bool>, Self::Error>
    where
        F: FnOnce(&mut Policy<ID>) -> bool,
    {
        let mut store = self.write_store();
        let Some(current) = store.policies.get(id) else {
            return Ok(None);
        };

        let mut policy = current.clone();
        if !modify(&mut policy) {
            return Ok(Some(false));
        }

        if let Err(err) = policy.check_integrity() {
            warn!(policy = %id, %err, "refusing to store inconsistent policy");
            return Err(err.into());
        }

        debug!(
            policy = %id,
            sharing_scope = %policy.sharing_scope(),
            access_type = %policy.access_type(),
            "modify policy"
        );
        store.policies.insert(*id, policy);
        Ok(Some(true))
    }

    fn project_default_policy(&self, project: &ID) -> Result<Option<Policy<ID>>, Self::Error> {
        let store = self.read_store();
        Ok(store
            .project_default_policies
            .get(project)
            .and_then(|id| store.policies.get(id))
            .cloned())
    }

    fn awaiting_publish_approval(&self, resource: &ID, person: &ID) -> Result<bool, Self::Error> {
        Ok(self
            .read_store()
            .publish_requests
            .contains(&(*resource, *person)))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use assert_matches::assert_matches;

    use crate::traits::{MembershipStore, PolicyStore, RoleStore};
    use crate::{
        AccessLevel, Contributor, IntegrityError, Permission, PermissionId, Person, Policy,
        PolicyId, SharingScope,
    };

    use super::{MemoryStore, MemoryStoreError};

    #[test]
    fn memberships() {
        let store = MemoryStore::<char>::new();
        store.insert_person(Person::new('A', "Alice"));
        store.insert_person(Person::new('B', "Bob"));
        store.add_group_member('G', 'A');
        store.add_group_member('H', 'A');
        store.add_group_member('G', 'B');

        assert_eq!(store.groups_of(&'A').unwrap(), vec!['G', 'H']);
        assert_eq!(store.group_members(&'G').unwrap(), vec!['A', 'B']);
        assert_eq!(store.network_members().unwrap().len(), 2);

        assert!(store.remove_group_member('G', 'B'));
        assert_eq!(store.group_members(&'G').unwrap(), vec!['A']);
        assert!(store.groups_of(&'B').unwrap().is_empty());
    }

    #[test]
    fn lists_and_roles() {
        let store = MemoryStore::<char>::new();
        store.whitelist_person('O', 'A', AccessLevel::Visible);
        store.whitelist_person('O', 'A', AccessLevel::Editing);
        store.blacklist_person('O', 'B');
        store.add_asset_manager('P', 'M');
        store.add_project_manager('P', 'N');
        store.add_gatekeeper('P', 'G');

        assert_eq!(store.whitelist(&'O').unwrap(), vec![('A', AccessLevel::Editing)]);
        assert_eq!(store.blacklist(&'O').unwrap(), vec!['B']);
        assert!(store.whitelist(&'X').unwrap().is_empty());
        assert_eq!(store.asset_managers(&'P').unwrap(), vec!['M']);
        assert_eq!(store.project_managers(&'P').unwrap(), vec!['N']);
        assert_eq!(store.gatekeepers(&'P').unwrap(), vec!['G']);
        assert!(store.gatekeepers(&'Q').unwrap().is_empty());
    }

    #[test]
    fn update_policy_rejects_inconsistent_permissions() {
        let store = MemoryStore::<char>::new();
        let mut policy = Policy::private();
        policy.grant(Contributor::Individual('A'), AccessLevel::Editing);
        store.update_policy(policy.clone()).unwrap();

        let other = Policy::<char>::private();
        let foreign = Permission::from_parts(
            PermissionId::generate(),
            other.id(),
            Contributor::Individual('B'),
            AccessLevel::Managing,
        );

        let mut permissions = policy.permissions().to_vec();
        permissions.push(foreign);
        let tampered = Policy::from_parts(
            policy.id(),
            policy.name(),
            SharingScope::Everyone,
            AccessLevel::Accessible,
            false,
            false,
            permissions,
        );

        assert_matches!(
            store.update_policy(tampered),
            Err(MemoryStoreError::Integrity(IntegrityError::ForeignPermission { .. }))
        );

        // Nothing of the rejected update is visible.
        let stored = store.policy(&policy.id()).unwrap().unwrap();
        assert_eq!(stored.sharing_scope(), SharingScope::Private);
        assert_eq!(stored.permissions().len(), 1);
    }

    #[test]
    fn project_default_policy_and_removal() {
        let store = MemoryStore::<char>::new();
        let policy = Policy::new("project default", SharingScope::Everyone, AccessLevel::Visible);
        let id = policy.id();
        store.set_project_default_policy('P', policy).unwrap();

        assert_eq!(store.project_default_policy(&'P').unwrap().unwrap().id(), id);
        assert!(store.project_default_policy(&'Q').unwrap().is_none());

        assert!(store.remove_policy(&id).is_some());
        assert!(store.policy(&id).unwrap().is_none());
        assert!(store.project_default_policy(&'P').unwrap().is_none());
    }

    #[test]
    fn modify_policy_in_place() {
        let store = MemoryStore::<char>::new();
        let mut policy = Policy::private();
        let grant = policy.grant(Contributor::Individual('A'), AccessLevel::Editing);
        let id = policy.id();
        store.update_policy(policy).unwrap();

        // Declined changes are not stored.
        let result = store.modify_policy(&id, |policy| {
            policy.set_sharing(SharingScope::Everyone, AccessLevel::Managing);
            false
        });
        assert_matches!(result, Ok(Some(false)));
        assert_eq!(
            store.policy(&id).unwrap().unwrap().sharing_scope(),
            SharingScope::Private
        );

        let result = store.modify_policy(&id, |policy| {
            policy.set_sharing(SharingScope::AllUsersOfNetwork, AccessLevel::Visible);
            policy.revoke(grant)
        });
        assert_matches!(result, Ok(Some(true)));
        let stored = store.policy(&id).unwrap().unwrap();
        assert_eq!(stored.sharing_scope(), SharingScope::AllUsersOfNetwork);
        assert!(stored.permissions().is_empty());

        let missing = PolicyId::generate();
        assert_matches!(store.modify_policy(&missing, |_| true), Ok(None));
    }

    #[test]
    fn publish_requests() {
        let store = MemoryStore::<char>::new();
        store.request_publish('D', 'A');
        assert!(store.awaiting_publish_approval(&'D', &'A').unwrap());
        assert!(!store.awaiting_publish_approval(&'D', &'B').unwrap());
        assert!(store.resolve_publish_request('D', 'A'));
        assert!(!store.awaiting_publish_approval(&'D', &'A').unwrap());
    }

    #[test]
    fn readers_never_observe_partial_updates() {
        let store = MemoryStore::<char>::new();
        let policy = Policy::private();
        store.update_policy(policy.clone()).unwrap();
        let id = policy.id();

        thread::scope(|scope| {
            let writer = store.clone();
            let mut writer_policy = policy.clone();
            scope.spawn(move || {
                for round in 0..200 {
                    // Scope and permission count always change together.
                    if round % 2 == 0 {
                        writer_policy.set_sharing(SharingScope::Everyone, AccessLevel::Visible);
                        writer_policy.replace_permissions(vec![
                            (Contributor::Individual('A'), AccessLevel::Editing),
                            (Contributor::Group('G'), AccessLevel::Visible),
                        ]);
                    } else {
                        writer_policy.set_sharing(SharingScope::Private, AccessLevel::NoAccess);
                        writer_policy.replace_permissions(Vec::new());
                    }
                    writer.update_policy(writer_policy.clone()).unwrap();
                }
            });

            for _ in 0..4 {
                let reader = store.clone();
                scope.spawn(move || {
                    for _ in 0..200 {
                        let current = reader.policy(&id).unwrap().unwrap();
                        match current.sharing_scope() {
                            SharingScope::Everyone => assert_eq!(current.permissions().len(), 2),
                            _ => assert!(current.permissions().is_empty()),
                        }
                    }
                });
            }
        });

        let last = store.policy(&id).unwrap().unwrap();
        assert_eq!(last.sharing_scope(), SharingScope::Private);
        assert!(last.permissions().is_empty());
    }
}
