// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resources which can be protected by a policy.
use std::fmt::Display;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifier::PolicyId;
use crate::traits::IdentityHandle;

/// Registry of resource types known to the authorization core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResourceKind {
    DataFile,
    Model,
    Sop,
    Presentation,
    Publication,
    Investigation,
    Study,
    Assay,
    Specimen,
    Strain,
    Event,
    Project,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 12] = [
        ResourceKind::DataFile,
        ResourceKind::Model,
        ResourceKind::Sop,
        ResourceKind::Presentation,
        ResourceKind::Publication,
        ResourceKind::Investigation,
        ResourceKind::Study,
        ResourceKind::Assay,
        ResourceKind::Specimen,
        ResourceKind::Strain,
        ResourceKind::Event,
        ResourceKind::Project,
    ];

    /// Returns true if resources of this kind carry content which can be downloaded.
    pub fn is_downloadable(&self) -> bool {
        matches!(
            self,
            ResourceKind::DataFile
                | ResourceKind::Model
                | ResourceKind::Sop
                | ResourceKind::Presentation
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::DataFile => "data_file",
            ResourceKind::Model => "model",
            ResourceKind::Sop => "sop",
            ResourceKind::Presentation => "presentation",
            ResourceKind::Publication => "publication",
            ResourceKind::Investigation => "investigation",
            ResourceKind::Study => "study",
            ResourceKind::Assay => "assay",
            ResourceKind::Specimen => "specimen",
            ResourceKind::Strain => "strain",
            ResourceKind::Event => "event",
            ResourceKind::Project => "project",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown resource kind '{0}'")]
pub struct UnknownResourceKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownResourceKind(s.to_string()))
    }
}

/// Capability interface every resource type implements to take part in authorization.
pub trait Authorizable<ID>
where
    ID: IdentityHandle,
{
    fn id(&self) -> ID;

    fn kind(&self) -> ResourceKind;

    /// Policy owned by this resource. Resources without one fall back to the default policy.
    fn policy_id(&self) -> Option<PolicyId>;

    /// Projects this resource belongs to.
    fn projects(&self) -> Vec<ID>;

    /// Person who registered the resource and owns its whitelist and blacklist.
    fn contributor(&self) -> Option<ID>;

    /// People credited as creators of the resource.
    fn creators(&self) -> Vec<ID>;

    fn is_downloadable(&self) -> bool {
        self.kind().is_downloadable()
    }

    /// Returns false for resource types which are not protected by a policy at all.
    fn authorization_supported(&self) -> bool {
        true
    }

    fn title_is_public(&self) -> bool {
        false
    }

    fn contributor_credited(&self) -> bool {
        false
    }
}

/// Default object for resource types without policy-based authorization.
///
/// Every action on it is permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unrestricted<ID> {
    pub id: ID,
    pub kind: ResourceKind,
}

impl<ID> Unrestricted<ID> {
    pub fn new(id: ID, kind: ResourceKind) -> Self {
        Self { id, kind }
    }
}

impl<ID> Authorizable<ID> for Unrestricted<ID>
where
    ID: IdentityHandle,
{
    fn id(&self) -> ID {
        self.id
    }

    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn policy_id(&self) -> Option<PolicyId> {
        None
    }

    fn projects(&self) -> Vec<ID> {
        Vec::new()
    }

    fn contributor(&self) -> Option<ID> {
        None
    }

    fn creators(&self) -> Vec<ID> {
        Vec::new()
    }

    fn authorization_supported(&self) -> bool {
        false
    }
}

/// A policy-protected asset as handed over by the resource store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Asset<ID> {
    pub id: ID,
    pub kind: ResourceKind,
    pub policy_id: Option<PolicyId>,
    pub projects: Vec<ID>,
    pub contributor: Option<ID>,
    pub creators: Vec<ID>,
}

impl<ID> Asset<ID> {
    pub fn new(id: ID, kind: ResourceKind) -> Self {
        Self {
            id,
            kind,
            policy_id: None,
            projects: Vec::new(),
            contributor: None,
            creators: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy_id: PolicyId) -> Self {
        self.policy_id = Some(policy_id);
        self
    }

    pub fn with_projects(mut self, projects: Vec<ID>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_contributor(mut self, contributor: ID) -> Self {
        self.contributor = Some(contributor);
        self
    }

    pub fn with_creators(mut self, creators: Vec<ID>) -> Self {
        self.creators = creators;
        self
    }
}

impl<ID> Authorizable<ID> for Asset<ID>
where
    ID: IdentityHandle,
{
    fn id(&self) -> ID {
        self.id
    }

    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn policy_id(&self) -> Option<PolicyId> {
        self.policy_id
    }

    fn projects(&self) -> Vec<ID> {
        self.projects.clone()
    }

    fn contributor(&self) -> Option<ID> {
        self.contributor
    }

    fn creators(&self) -> Vec<ID> {
        self.creators.clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::CharId;

    use super::{Asset, Authorizable, ResourceKind, Unrestricted};

    #[test]
    fn downloadable_kinds() {
        assert!(ResourceKind::DataFile.is_downloadable());
        assert!(ResourceKind::Sop.is_downloadable());
        assert!(!ResourceKind::Publication.is_downloadable());
        assert!(!ResourceKind::Assay.is_downloadable());

        let asset: Asset<CharId> = Asset::new('D', ResourceKind::Model);
        assert!(asset.is_downloadable());
        assert!(asset.authorization_supported());
        assert!(!asset.title_is_public());
        assert!(!asset.contributor_credited());
    }

    #[test]
    fn kind_names() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.to_string().parse::<ResourceKind>(), Ok(kind));
        }
        assert!("spreadsheet".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn unrestricted_opts_out() {
        let resource: Unrestricted<CharId> = Unrestricted::new('X', ResourceKind::Event);
        assert!(!resource.authorization_supported());
        assert!(resource.policy_id().is_none());
    }
}
