// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge rules for lists of people and the access level each of them receives.
//!
//! A person can qualify for access through several routes at once: the sharing scope, one or
//! more groups, an individual grant, a whitelist or a role. The functions in this module combine
//! such lists into one entry per person. All of them keep the order in which people were first
//! seen, so results are stable for identical input.
use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::access::AccessLevel;
use crate::traits::IdentityHandle;

/// A person, the name shown for them and the access level they receive.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry<ID> {
    pub id: ID,
    pub name: String,
    pub access: AccessLevel,
}

impl<ID> Entry<ID> {
    pub fn new(id: ID, name: impl Into<String>, access: AccessLevel) -> Self {
        Self {
            id,
            name: name.into(),
            access,
        }
    }
}

/// Collapse entries sharing an id into one, keeping the highest access level seen for that id.
///
/// When several entries share the highest level the first one wins.
pub fn remove_duplicates<ID>(entries: Vec<Entry<ID>>) -> Vec<Entry<ID>>
where
    ID: IdentityHandle,
{
    let mut positions: HashMap<ID, usize> = HashMap::new();
    let mut result: Vec<Entry<ID>> = Vec::with_capacity(entries.len());

    for entry in entries {
        match positions.get(&entry.id) {
            Some(&index) => {
                if entry.access > result[index].access {
                    result[index] = entry;
                }
            }
            None => {
                positions.insert(entry.id, result.len());
                result.push(entry);
            }
        }
    }

    result
}

/// Let entries from a higher precedence list replace those of a lower precedence list.
///
/// Every id present in `higher` is returned with the entry from `higher`, regardless of whether
/// that raises or lowers the level computed in `lower`. Ids only present in `lower` pass through
/// unchanged. Duplicates within either list are collapsed first, see [`remove_duplicates`].
pub fn apply_precedence<ID>(lower: Vec<Entry<ID>>, higher: Vec<Entry<ID>>) -> Vec<Entry<ID>>
where
    ID: IdentityHandle,
{
    let higher = remove_duplicates(higher);
    let mut overrides: HashMap<ID, Entry<ID>> = higher
        .iter()
        .map(|entry| (entry.id, entry.clone()))
        .collect();

    let lower = remove_duplicates(lower);
    let mut result: Vec<Entry<ID>> = Vec::with_capacity(lower.len() + higher.len());

    for entry in lower {
        match overrides.remove(&entry.id) {
            Some(replacement) => result.push(replacement),
            None => result.push(entry),
        }
    }

    // Whatever is left in higher did not occur in lower.
    for entry in higher {
        if overrides.contains_key(&entry.id) {
            result.push(entry);
        }
    }

    result
}

/// Add whitelisted people who are not already present in `base`.
///
/// The whitelist never changes the level of somebody already present, neither up nor down.
pub fn add_whitelist_entries<ID>(
    base: Vec<Entry<ID>>,
    whitelist: Vec<Entry<ID>>,
) -> Vec<Entry<ID>>
where
    ID: IdentityHandle,
{
    let mut present: HashSet<ID> = base.iter().map(|entry| entry.id).collect();
    let mut result = base;

    for entry in whitelist {
        if present.insert(entry.id) {
            result.push(entry);
        }
    }

    result
}

/// Force blacklisted people down to no access.
///
/// Blacklisted people who are not present in `base` are added with no access, so that a later
/// whitelist pass can not grant them anything either.
pub fn apply_blacklist<ID>(base: Vec<Entry<ID>>, blacklist: Vec<Entry<ID>>) -> Vec<Entry<ID>>
where
    ID: IdentityHandle,
{
    let blacklist = blacklist
        .into_iter()
        .map(|entry| Entry {
            access: AccessLevel::NoAccess,
            ..entry
        })
        .collect();
    apply_precedence(base, blacklist)
}
