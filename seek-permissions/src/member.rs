// SPDX-License-Identifier: MIT OR Apache-2.0

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::IdentityHandle;

/// Receiver of a permission record, a single person or a group of people.
///
/// Groups cover work groups, projects, institutions and favourite groups alike, their members are
/// looked up through the [`MembershipStore`](crate::traits::MembershipStore).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Contributor<ID> {
    Individual(ID),
    Group(ID),
}

impl<ID> Contributor<ID>
where
    ID: Copy,
{
    /// Return the ID of the contributor.
    pub fn id(&self) -> ID {
        match self {
            Contributor::Individual(id) => *id,
            Contributor::Group(id) => *id,
        }
    }

    /// Return true if this contributor is a group.
    pub fn is_group(&self) -> bool {
        match self {
            Contributor::Individual(_) => false,
            Contributor::Group(_) => true,
        }
    }

    /// Return true if this contributor is an individual.
    pub fn is_individual(&self) -> bool {
        !self.is_group()
    }
}

/// Whoever requests an action.
///
/// Anonymous visitors belong to the "everyone" sharing scope only, they hold no roles and no
/// explicit permissions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Principal<ID> {
    Anonymous,
    Person(ID),
}

impl<ID> Principal<ID>
where
    ID: IdentityHandle,
{
    pub fn person_id(&self) -> Option<ID> {
        match self {
            Principal::Anonymous => None,
            Principal::Person(id) => Some(*id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Principal::Anonymous)
    }
}

impl<ID> From<Option<ID>> for Principal<ID> {
    fn from(value: Option<ID>) -> Self {
        match value {
            Some(id) => Principal::Person(id),
            None => Principal::Anonymous,
        }
    }
}

/// A registered person with the name shown in permission summaries.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Person<ID> {
    pub id: ID,
    pub name: String,
}

impl<ID> Person<ID> {
    pub fn new(id: ID, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
