// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::AccessLevel;

/// Actions which can be requested on a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    View,
    Edit,
    Download,
    Delete,
    Manage,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::View,
        Action::Edit,
        Action::Download,
        Action::Delete,
        Action::Manage,
    ];

    /// Minimum access level a principal needs to hold for this action.
    ///
    /// Downloading additionally requires the resource itself to be downloadable.
    pub fn required_level(&self) -> AccessLevel {
        match self {
            Action::View => AccessLevel::Visible,
            Action::Download => AccessLevel::Accessible,
            Action::Edit => AccessLevel::Editing,
            Action::Delete | Action::Manage => AccessLevel::Managing,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Edit => "edit",
            Action::Download => "download",
            Action::Delete => "delete",
            Action::Manage => "manage",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);
