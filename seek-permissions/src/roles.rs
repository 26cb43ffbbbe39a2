// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access implied by the roles a person holds towards a resource.
//!
//! Roles are never persisted as grants. They are derived on every call from the resource's
//! creators and the role memberships of its owning projects, and can not be taken away by a
//! restrictive policy.
use std::fmt::Display;

use tracing::trace;

use crate::access::AccessLevel;
use crate::config::Config;
use crate::member::Principal;
use crate::resource::Authorizable;
use crate::traits::{IdentityHandle, RoleStore};

/// Roles a person can hold towards a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Credited as creator of the resource.
    Creator,

    /// Asset manager of one of the owning projects.
    AssetManager,

    /// Project manager of one of the owning projects.
    ProjectManager,

    /// Gatekeeper of one of the owning projects, approves publishing.
    Gatekeeper,
}

impl Role {
    /// Minimum access level this role implies.
    pub fn access(&self, config: &Config) -> AccessLevel {
        self.fixed_access().unwrap_or_else(|| config.gatekeeper_access())
    }

    /// Level implied by roles which do not depend on configuration.
    pub fn fixed_access(&self) -> Option<AccessLevel> {
        match self {
            Role::Creator => Some(AccessLevel::Editing),
            Role::AssetManager => Some(AccessLevel::Managing),
            Role::ProjectManager => Some(AccessLevel::Managing),
            Role::Gatekeeper => None,
        }
    }

    /// Suffix appended to a person's name in permission summaries.
    pub fn annotation(&self) -> &'static str {
        match self {
            Role::Creator => " (creator)",
            Role::AssetManager => " (asset manager)",
            Role::ProjectManager => " (project manager)",
            Role::Gatekeeper => " (gatekeeper)",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Creator => "creator",
            Role::AssetManager => "asset manager",
            Role::ProjectManager => "project manager",
            Role::Gatekeeper => "gatekeeper",
        };
        write!(f, "{}", s)
    }
}

/// All roles the principal holds towards the resource, across all owning projects.
///
/// Anonymous principals hold no roles.
pub fn roles_of<ID, R, S>(
    principal: &Principal<ID>,
    resource: &R,
    store: &S,
) -> Result<Vec<Role>, S::Error>
where
    ID: IdentityHandle,
    R: Authorizable<ID> + ?Sized,
    S: RoleStore<ID>,
{
    let Some(person) = principal.person_id() else {
        return Ok(Vec::new());
    };

    let mut roles = Vec::new();
    if resource.creators().contains(&person) {
        roles.push(Role::Creator);
    }

    for project in resource.projects() {
        if !roles.contains(&Role::AssetManager) && store.asset_managers(&project)?.contains(&person)
        {
            roles.push(Role::AssetManager);
        }
        if !roles.contains(&Role::ProjectManager)
            && store.project_managers(&project)?.contains(&person)
        {
            roles.push(Role::ProjectManager);
        }
        if !roles.contains(&Role::Gatekeeper) && store.gatekeepers(&project)?.contains(&person) {
            roles.push(Role::Gatekeeper);
        }
    }

    roles.sort();
    Ok(roles)
}

/// Highest access level implied by the principal's roles, `NoAccess` if they hold none.
pub fn resolve_role_level<ID, R, S>(
    principal: &Principal<ID>,
    resource: &R,
    store: &S,
    config: &Config,
) -> Result<AccessLevel, S::Error>
where
    ID: IdentityHandle,
    R: Authorizable<ID> + ?Sized,
    S: RoleStore<ID>,
{
    let roles = roles_of(principal, resource, store)?;
    let level = roles
        .iter()
        .map(|role| role.access(config))
        .max()
        .unwrap_or_default();

    trace!(?principal, resource = %resource.id(), ?roles, %level, "resolved role level");
    Ok(level)
}
