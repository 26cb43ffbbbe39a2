// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities.
use rand::Rng;

use crate::access::AccessLevel;
use crate::entries::Entry;
use crate::member::Person;
use crate::memory::MemoryStore;
use crate::policy::Policy;
use crate::traits::{IdentityHandle, PolicyStore};

impl IdentityHandle for char {}

pub type CharId = char;

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Entries with ids drawn from `0..max_id` and random access levels, duplicates included.
pub fn random_entries<R: Rng>(rng: &mut R, count: usize, max_id: u32) -> Vec<Entry<u32>> {
    (0..count)
        .map(|_| {
            let id = rng.random_range(0..max_id);
            let access = AccessLevel::ALL[rng.random_range(0..AccessLevel::ALL.len())];
            Entry::new(id, format!("person{id}"), access)
        })
        .collect()
}

/// Fluent setup of a populated memory store.
#[derive(Default)]
pub struct MemoryStoreBuilder {
    store: MemoryStore<CharId>,
}

impl MemoryStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn person(self, id: CharId, name: &str) -> Self {
        self.store.insert_person(Person::new(id, name));
        self
    }

    pub fn group_member(self, group: CharId, person: CharId) -> Self {
        self.store.add_group_member(group, person);
        self
    }

    pub fn whitelisted(self, owner: CharId, person: CharId, access: AccessLevel) -> Self {
        self.store.whitelist_person(owner, person, access);
        self
    }

    pub fn blacklisted(self, owner: CharId, person: CharId) -> Self {
        self.store.blacklist_person(owner, person);
        self
    }

    pub fn asset_manager(self, project: CharId, person: CharId) -> Self {
        self.store.add_asset_manager(project, person);
        self
    }

    pub fn project_manager(self, project: CharId, person: CharId) -> Self {
        self.store.add_project_manager(project, person);
        self
    }

    pub fn gatekeeper(self, project: CharId, person: CharId) -> Self {
        self.store.add_gatekeeper(project, person);
        self
    }

    pub fn policy(self, policy: Policy<CharId>) -> Self {
        self.store
            .update_policy(policy)
            .expect("test policy is consistent");
        self
    }

    pub fn build(self) -> MemoryStore<CharId> {
        self.store
    }
}
