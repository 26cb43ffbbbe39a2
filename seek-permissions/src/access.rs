// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Access levels which can be granted on a resource. Greater access levels are assumed to also
/// contain all lower ones.
///
/// Levels are ordered by their numeric code, not by declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AccessLevel {
    /// Resource is not even listed.
    #[default]
    NoAccess,

    /// Summary and title can be seen.
    Visible,

    /// Content can be viewed and, for downloadable resources, downloaded.
    Accessible,

    /// Metadata and content can be changed.
    Editing,

    /// Sharing policy can be changed, resource can be deleted and published.
    Managing,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 5] = [
        AccessLevel::NoAccess,
        AccessLevel::Visible,
        AccessLevel::Accessible,
        AccessLevel::Editing,
        AccessLevel::Managing,
    ];

    /// Numeric code of this level, used for ordering and storage.
    pub fn code(&self) -> i64 {
        match self {
            AccessLevel::NoAccess => 0,
            AccessLevel::Visible => 1,
            AccessLevel::Accessible => 2,
            AccessLevel::Editing => 6,
            AccessLevel::Managing => 8,
        }
    }

    /// Look up a level by its numeric code.
    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|level| level.code() == code)
            .ok_or(ValidationError::UnknownAccessLevelCode(code))
    }

    /// Canonical name of this level.
    pub fn name(&self) -> &'static str {
        match self {
            AccessLevel::NoAccess => "no_access",
            AccessLevel::Visible => "visible",
            AccessLevel::Accessible => "accessible",
            AccessLevel::Editing => "editing",
            AccessLevel::Managing => "managing",
        }
    }

    pub fn is_no_access(&self) -> bool {
        matches!(self, AccessLevel::NoAccess)
    }
}

impl PartialOrd for AccessLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AccessLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(&other.code())
    }
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AccessLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name() == s)
            .ok_or_else(|| ValidationError::UnknownAccessLevelName(s.to_string()))
    }
}

impl TryFrom<i64> for AccessLevel {
    type Error = ValidationError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

/// Population to which a policy's default access level applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SharingScope {
    /// Nobody besides explicit grants and roles.
    Private,

    /// Every registered user of the network.
    AllUsersOfNetwork,

    /// Everyone, including anonymous visitors.
    Everyone,
}

impl SharingScope {
    pub const ALL: [SharingScope; 3] = [
        SharingScope::Private,
        SharingScope::AllUsersOfNetwork,
        SharingScope::Everyone,
    ];

    pub fn code(&self) -> i64 {
        match self {
            SharingScope::Private => 0,
            SharingScope::AllUsersOfNetwork => 2,
            SharingScope::Everyone => 4,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.code() == code)
            .ok_or(ValidationError::UnknownSharingScopeCode(code))
    }

    pub fn name(&self) -> &'static str {
        match self {
            SharingScope::Private => "private",
            SharingScope::AllUsersOfNetwork => "all_users_of_network",
            SharingScope::Everyone => "everyone",
        }
    }

    /// Returns true if anonymous visitors belong to this scope's population.
    pub fn includes_anonymous(&self) -> bool {
        matches!(self, SharingScope::Everyone)
    }

    /// Returns true if registered users belong to this scope's population.
    pub fn includes_registered(&self) -> bool {
        matches!(self, SharingScope::AllUsersOfNetwork | SharingScope::Everyone)
    }
}

impl PartialOrd for SharingScope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SharingScope {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(&other.code())
    }
}

impl Display for SharingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SharingScope {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.name() == s)
            .ok_or_else(|| ValidationError::UnknownSharingScopeName(s.to_string()))
    }
}

impl TryFrom<i64> for SharingScope {
    type Error = ValidationError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}
