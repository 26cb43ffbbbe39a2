// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable overview of who can do what with a resource.
use std::collections::BTreeMap;
use std::ops::Index;

use tracing::{debug, warn};

use crate::access::AccessLevel;
use crate::config::Config;
use crate::entries::{Entry, add_whitelist_entries, apply_blacklist, remove_duplicates};
use crate::member::{Contributor, Person, Principal};
use crate::policy::Policy;
use crate::roles::Role;
use crate::traits::{IdentityHandle, MembershipStore};

/// People holding a resource-specific role, with the names to show for them.
#[derive(Clone, Debug)]
pub struct RoleHolders<ID> {
    pub creators: Vec<Person<ID>>,
    pub asset_managers: Vec<Person<ID>>,
    pub project_managers: Vec<Person<ID>>,
    pub gatekeepers: Vec<Person<ID>>,

    /// Level implied by the gatekeeper role, see [`Config::gatekeeper_access`].
    pub gatekeeper_access: AccessLevel,
}

impl<ID> RoleHolders<ID> {
    pub fn new(creators: Vec<Person<ID>>, asset_managers: Vec<Person<ID>>) -> Self {
        Self {
            creators,
            asset_managers,
            project_managers: Vec::new(),
            gatekeepers: Vec::new(),
            gatekeeper_access: Config::default().gatekeeper_access(),
        }
    }

    pub fn with_project_managers(mut self, project_managers: Vec<Person<ID>>) -> Self {
        self.project_managers = project_managers;
        self
    }

    pub fn with_gatekeepers(mut self, gatekeepers: Vec<Person<ID>>, access: AccessLevel) -> Self {
        self.gatekeepers = gatekeepers;
        self.gatekeeper_access = access;
        self
    }

    /// Role holders with the level each role implies, in annotation order.
    fn by_role(&self) -> [(Role, AccessLevel, &[Person<ID>]); 4] {
        [
            (Role::Creator, self.creators.as_slice()),
            (Role::AssetManager, self.asset_managers.as_slice()),
            (Role::ProjectManager, self.project_managers.as_slice()),
            (Role::Gatekeeper, self.gatekeepers.as_slice()),
        ]
        .map(|(role, people)| {
            let access = role.fixed_access().unwrap_or(self.gatekeeper_access);
            (role, access, people)
        })
    }
}

/// People with access to a resource, bucketed by their final access level.
///
/// People without access are not listed. Within a bucket people appear in the order they were
/// first encountered while merging. Anonymous visitors are not people, the level they receive is
/// reported separately by [`PermissionSummary::public_access`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermissionSummary<ID> {
    buckets: BTreeMap<AccessLevel, Vec<Entry<ID>>>,
    public: Option<AccessLevel>,
}

impl<ID> Default for PermissionSummary<ID> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
            public: None,
        }
    }
}

impl<ID> PermissionSummary<ID> {
    /// Everybody with exactly the given access level.
    pub fn get(&self, access: AccessLevel) -> &[Entry<ID>] {
        self.buckets
            .get(&access)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty buckets, from the lowest to the highest access level.
    pub fn iter(&self) -> impl Iterator<Item = (AccessLevel, &[Entry<ID>])> {
        self.buckets
            .iter()
            .map(|(access, entries)| (*access, entries.as_slice()))
    }

    /// Level granted to anonymous visitors, `None` if they can not access the resource.
    pub fn public_access(&self) -> Option<AccessLevel> {
        self.public
    }

    /// Number of people listed across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Returns true if no person is listed. Public access is not taken into account.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<AccessLevel, Vec<Entry<ID>>> {
        self.buckets
    }
}

impl<ID> PermissionSummary<ID>
where
    ID: IdentityHandle,
{
    /// Final access level of the person, `None` if they are not listed.
    pub fn access_of(&self, id: &ID) -> Option<AccessLevel> {
        self.buckets
            .iter()
            .find(|(_, entries)| entries.iter().any(|entry| entry.id == *id))
            .map(|(access, _)| *access)
    }
}

impl<ID> Index<AccessLevel> for PermissionSummary<ID> {
    type Output = [Entry<ID>];

    fn index(&self, access: AccessLevel) -> &Self::Output {
        self.get(access)
    }
}

impl<ID> Policy<ID>
where
    ID: IdentityHandle,
{
    /// Summarize who receives which access level from this policy and the given role holders.
    ///
    /// Whitelist and blacklist are not taken into account, see
    /// [`Policy::summarize_permissions_with_roles`].
    pub fn summarize_permissions<S>(
        &self,
        creators: &[Person<ID>],
        asset_managers: &[Person<ID>],
        store: &S,
    ) -> Result<PermissionSummary<ID>, S::Error>
    where
        S: MembershipStore<ID>,
    {
        let roles = RoleHolders::new(creators.to_vec(), asset_managers.to_vec());
        self.summarize_permissions_with_roles(&roles, None, store)
    }

    /// Summarize who receives which access level, including project managers, gatekeepers and
    /// the lists of the resource's contributor.
    pub fn summarize_permissions_with_roles<S>(
        &self,
        roles: &RoleHolders<ID>,
        contributor: Option<ID>,
        store: &S,
    ) -> Result<PermissionSummary<ID>, S::Error>
    where
        S: MembershipStore<ID>,
    {
        let mut scope_entries = Vec::new();
        if self.sharing_scope().includes_registered() && !self.access_type().is_no_access() {
            for person in store.network_members()? {
                scope_entries.push(Entry::new(person.id, person.name, self.access_type()));
            }
        }

        let mut group_entries = Vec::new();
        let mut individual_entries = Vec::new();
        for permission in self.permissions() {
            let access = permission.access();
            match permission.contributor() {
                Contributor::Group(group) => {
                    for member in store.group_members(&group)? {
                        if let Some(person) = named(store, member)? {
                            group_entries.push(Entry::new(person.id, person.name, access));
                        }
                    }
                }
                Contributor::Individual(id) => {
                    if let Some(person) = named(store, id)? {
                        individual_entries.push(Entry::new(person.id, person.name, access));
                    }
                }
            }
        }

        // Explicit grants never lower the scope level, the higher of both counts.
        group_entries.extend(individual_entries);
        let explicit = remove_duplicates(group_entries);
        scope_entries.extend(explicit);
        let mut computed = remove_duplicates(scope_entries);

        if let Some(owner) = contributor {
            if self.use_blacklist() {
                let mut blacklist = Vec::new();
                for id in store.blacklist(&owner)? {
                    if let Some(person) = named(store, id)? {
                        blacklist.push(Entry::new(person.id, person.name, AccessLevel::NoAccess));
                    }
                }
                computed = apply_blacklist(computed, blacklist);
            }

            if self.use_whitelist() {
                let mut whitelist = Vec::new();
                for (id, access) in store.whitelist(&owner)? {
                    if let Some(person) = named(store, id)? {
                        whitelist.push(Entry::new(person.id, person.name, access));
                    }
                }
                computed = add_whitelist_entries(computed, whitelist);
            }
        }

        let mut role_entries = Vec::new();
        for (_, access, people) in roles.by_role() {
            for person in people {
                role_entries.push(Entry::new(person.id, person.name.clone(), access));
            }
        }

        // Roles only ever raise what the policy computed.
        computed.extend(role_entries);
        let merged = remove_duplicates(computed);

        let mut buckets: BTreeMap<AccessLevel, Vec<Entry<ID>>> = BTreeMap::new();
        for mut entry in merged {
            if entry.access.is_no_access() {
                continue;
            }
            for (role, access, people) in roles.by_role() {
                if access == entry.access && people.iter().any(|person| person.id == entry.id)
                {
                    entry.name.push_str(role.annotation());
                }
            }
            buckets.entry(entry.access).or_default().push(entry);
        }

        let summary = PermissionSummary {
            buckets,
            public: self.scope_access(&Principal::Anonymous),
        };
        debug!(policy = %self.id(), people = summary.len(), "summarized permissions");
        Ok(summary)
    }
}

/// Look up the person record for an id, skipping ids unknown to the store.
fn named<ID, S>(store: &S, id: ID) -> Result<Option<Person<ID>>, S::Error>
where
    ID: IdentityHandle,
    S: MembershipStore<ID>,
{
    let person = store.person(&id)?;
    if person.is_none() {
        warn!(%id, "skipping unknown person in permission summary");
    }
    Ok(person)
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{MemoryStoreBuilder, setup_logging};
    use crate::{AccessLevel, Contributor, Entry, MemoryStore, Person, Policy, SharingScope};

    use super::RoleHolders;

    fn store() -> MemoryStore<char> {
        MemoryStoreBuilder::new()
            .person('A', "Anna")
            .person('B', "Bert")
            .person('C', "Clara")
            .person('M', "Mona")
            .person('N', "Nils")
            .group_member('G', 'A')
            .group_member('G', 'B')
            .build()
    }

    fn mona() -> Person<char> {
        Person::new('M', "Mona")
    }

    fn clara() -> Person<char> {
        Person::new('C', "Clara")
    }

    #[test]
    fn asset_manager_always_managing() {
        setup_logging();
        let store = store();
        let managing = Entry::new('M', "Mona (asset manager)", AccessLevel::Managing);

        let private = Policy::private();
        let summary = private
            .summarize_permissions(&[], &[mona()], &store)
            .unwrap();
        assert_eq!(summary[AccessLevel::Managing], [managing.clone()]);
        assert_eq!(summary.len(), 1);

        let mut with_permissions = Policy::private();
        with_permissions.grant(Contributor::Group('G'), AccessLevel::Visible);
        with_permissions.grant(Contributor::Individual('M'), AccessLevel::Visible);
        let summary = with_permissions
            .summarize_permissions(&[], &[mona()], &store)
            .unwrap();
        assert!(summary[AccessLevel::Managing].contains(&managing));
        assert!(
            !summary[AccessLevel::Visible]
                .iter()
                .any(|entry| entry.id == 'M')
        );

        let network_viewable = Policy::new(
            "network viewable",
            SharingScope::AllUsersOfNetwork,
            AccessLevel::Visible,
        );
        let summary = network_viewable
            .summarize_permissions(&[], &[mona()], &store)
            .unwrap();
        assert!(summary[AccessLevel::Managing].contains(&managing));
        assert_eq!(summary[AccessLevel::Visible].len(), 4);
    }

    #[test]
    fn creators_are_editing() {
        let store = store();

        let public = Policy::new("public", SharingScope::Everyone, AccessLevel::Accessible);
        let summary = public
            .summarize_permissions(&[clara()], &[], &store)
            .unwrap();
        assert_eq!(
            summary[AccessLevel::Editing],
            [Entry::new('C', "Clara (creator)", AccessLevel::Editing)]
        );
        assert_eq!(summary.access_of(&'A'), Some(AccessLevel::Accessible));
        assert_eq!(summary.public_access(), Some(AccessLevel::Accessible));
    }

    #[test]
    fn gatekeepers_at_configured_level() {
        let store = store();
        let gina = Person::new('G', "Gina");

        let roles = RoleHolders::new(Vec::new(), Vec::new())
            .with_gatekeepers(vec![gina.clone()], AccessLevel::Visible);
        let summary = Policy::private()
            .summarize_permissions_with_roles(&roles, None, &store)
            .unwrap();
        assert_eq!(
            summary[AccessLevel::Visible],
            [Entry::new('G', "Gina (gatekeeper)", AccessLevel::Visible)]
        );

        // A creator who is also gatekeeper ends up at the higher creator level.
        let roles = RoleHolders::new(vec![gina.clone()], Vec::new())
            .with_gatekeepers(vec![gina], AccessLevel::Accessible);
        let summary = Policy::private()
            .summarize_permissions_with_roles(&roles, None, &store)
            .unwrap();
        assert_eq!(
            summary[AccessLevel::Editing],
            [Entry::new('G', "Gina (creator)", AccessLevel::Editing)]
        );
        assert!(summary[AccessLevel::Accessible].is_empty());
    }

    #[test]
    fn creator_annotation_follows_final_level() {
        let store = store();

        // An explicit grant at the creator level still shows the creator annotation.
        let mut editing = Policy::private();
        editing.grant(Contributor::Individual('C'), AccessLevel::Editing);
        let summary = editing
            .summarize_permissions(&[clara()], &[], &store)
            .unwrap();
        assert_eq!(
            summary[AccessLevel::Editing],
            [Entry::new('C', "Clara (creator)", AccessLevel::Editing)]
        );

        // A higher explicit grant wins and the creator role is not mentioned.
        let mut managing = Policy::private();
        managing.grant(Contributor::Individual('C'), AccessLevel::Managing);
        let summary = managing
            .summarize_permissions(&[clara()], &[], &store)
            .unwrap();
        assert_eq!(
            summary[AccessLevel::Managing],
            [Entry::new('C', "Clara", AccessLevel::Managing)]
        );
        assert!(summary[AccessLevel::Editing].is_empty());
    }

    #[test]
    fn creator_and_asset_manager() {
        let store = store();
        let summary = Policy::private()
            .summarize_permissions(&[mona()], &[mona()], &store)
            .unwrap();
        assert_eq!(
            summary[AccessLevel::Managing],
            [Entry::new('M', "Mona (asset manager)", AccessLevel::Managing)]
        );
        assert!(summary[AccessLevel::Editing].is_empty());
    }

    #[test]
    fn project_managers_and_ordering() {
        let store = store();
        let roles = RoleHolders::new(vec![clara()], vec![mona()])
            .with_project_managers(vec![mona(), Person::new('N', "Nils")]);

        let summary = Policy::private()
            .summarize_permissions_with_roles(&roles, None, &store)
            .unwrap();
        assert_eq!(
            summary[AccessLevel::Managing],
            [
                Entry::new('M', "Mona (asset manager) (project manager)", AccessLevel::Managing),
                Entry::new('N', "Nils (project manager)", AccessLevel::Managing),
            ]
        );

        let levels: Vec<AccessLevel> = summary.iter().map(|(access, _)| access).collect();
        assert_eq!(levels, vec![AccessLevel::Editing, AccessLevel::Managing]);
    }

    #[test]
    fn blacklist_and_whitelist() {
        let store = MemoryStoreBuilder::new()
            .person('A', "Anna")
            .person('B', "Bert")
            .person('W', "Wanda")
            .person('O', "Otto")
            .blacklisted('O', 'A')
            .whitelisted('O', 'A', AccessLevel::Editing)
            .whitelisted('O', 'W', AccessLevel::Accessible)
            .build();

        let mut policy = Policy::new(
            "network viewable",
            SharingScope::AllUsersOfNetwork,
            AccessLevel::Visible,
        );
        let roles = RoleHolders::new(Vec::new(), Vec::new());

        // Without the flags the lists are ignored.
        let summary = policy
            .summarize_permissions_with_roles(&roles, Some('O'), &store)
            .unwrap();
        assert_eq!(summary.access_of(&'A'), Some(AccessLevel::Visible));
        assert_eq!(summary.access_of(&'W'), Some(AccessLevel::Visible));
        // Anonymous visitors are not part of the network.
        assert_eq!(summary.public_access(), None);

        policy.set_use_blacklist(true);
        policy.set_use_whitelist(true);
        let summary = policy
            .summarize_permissions_with_roles(&roles, Some('O'), &store)
            .unwrap();

        // Blacklisted people lose access and can not be whitelisted back in.
        assert_eq!(summary.access_of(&'A'), None);
        // The whitelist does not change levels computed from the policy.
        assert_eq!(summary.access_of(&'W'), Some(AccessLevel::Visible));
        assert_eq!(summary.access_of(&'B'), Some(AccessLevel::Visible));

        // Whitelisted people outside the scope are added at their whitelist level.
        let mut private = Policy::private();
        private.set_use_whitelist(true);
        let summary = private
            .summarize_permissions_with_roles(&roles, Some('O'), &store)
            .unwrap();
        assert_eq!(summary.access_of(&'W'), Some(AccessLevel::Accessible));
        assert_eq!(summary.access_of(&'A'), Some(AccessLevel::Editing));
        assert_eq!(summary.access_of(&'B'), None);
    }

    #[test]
    fn unknown_people_are_skipped() {
        let store = store();
        let mut policy = Policy::private();
        policy.grant(Contributor::Individual('Z'), AccessLevel::Editing);
        policy.grant(Contributor::Individual('A'), AccessLevel::Editing);

        let summary = policy.summarize_permissions(&[], &[], &store).unwrap();
        assert_eq!(
            summary[AccessLevel::Editing],
            [Entry::new('A', "Anna", AccessLevel::Editing)]
        );
        assert!(!summary.is_empty());
    }
}
