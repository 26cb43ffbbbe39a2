// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single entry point deciding whether a principal may perform an action on a resource.
//!
//! The [`Authorizer`] combines four sources into one access level:
//!
//! 1. the sharing scope of the resource's policy, if the principal belongs to its population
//! 2. explicit permission records for the principal or one of their groups
//! 3. whitelist and blacklist of the resource's contributor, when the policy enables them
//! 4. roles the principal holds towards the resource
//!
//! Scope and explicit grants are merged by taking the maximum. The blacklist then forces the
//! result down to no access, while the whitelist only fills in for principals who received
//! nothing from the policy. Roles are applied last and can not be taken away.
//!
//! A denied action is a normal outcome and reported as `false`. Errors are reserved for failing
//! stores and inconsistent policies.
use std::marker::PhantomData;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::access::AccessLevel;
use crate::action::Action;
use crate::config::Config;
use crate::error::{IntegrityError, ValidationError};
use crate::member::{Person, Principal};
use crate::policy::Policy;
use crate::resource::Authorizable;
use crate::roles::resolve_role_level;
use crate::summary::{PermissionSummary, RoleHolders};
use crate::traits::{IdentityHandle, PolicyStore, RoleStore};

#[derive(Debug, Error)]
pub enum AuthorizerError<E>
where
    E: std::error::Error,
{
    #[error("store error: {0}")]
    Store(E),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

/// Resolves access decisions against a store of policies, memberships and roles.
///
/// The authorizer holds no state besides its store and configuration, concurrent calls are safe
/// whenever the store is.
#[derive(Clone, Debug)]
pub struct Authorizer<ID, S> {
    store: S,
    config: Config,
    _marker: PhantomData<ID>,
}

impl<ID, S> Authorizer<ID, S>
where
    ID: IdentityHandle,
    S: PolicyStore<ID> + RoleStore<ID>,
{
    pub fn new(store: S, config: Config) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            _marker: PhantomData,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The policy protecting the resource.
    ///
    /// Resources without their own policy are protected by the configured default policy. A
    /// policy id which can not be found is an integrity error, never a reason to fall back.
    pub fn policy_of<R>(&self, resource: &R) -> Result<Policy<ID>, AuthorizerError<S::Error>>
    where
        R: Authorizable<ID> + ?Sized,
    {
        let policy = match resource.policy_id() {
            Some(id) => self
                .store
                .policy(&id)
                .map_err(AuthorizerError::Store)?
                .ok_or(IntegrityError::MissingPolicy(id))?,
            None => Policy::default_for(&self.config),
        };

        if let Err(err) = policy.check_integrity() {
            warn!(resource = %resource.id(), policy = %policy.id(), %err, "inconsistent policy");
            return Err(err.into());
        }

        Ok(policy)
    }

    /// Final access level of the principal on the resource.
    ///
    /// Resources which do not take part in authorization grant everybody the highest level.
    pub fn access_level<R>(
        &self,
        principal: &Principal<ID>,
        resource: &R,
    ) -> Result<AccessLevel, AuthorizerError<S::Error>>
    where
        R: Authorizable<ID> + ?Sized,
    {
        if !resource.authorization_supported() {
            return Ok(AccessLevel::Managing);
        }

        let policy = self.policy_of(resource)?;
        let standing = self.standing(principal, resource)?;
        Ok(level_under(&policy, principal, &standing))
    }

    /// Everything about the principal which is stored outside the policy.
    ///
    /// Both lists of the contributor are read regardless of the policy, which decides later
    /// whether they apply.
    fn standing<R>(
        &self,
        principal: &Principal<ID>,
        resource: &R,
    ) -> Result<Standing<ID>, AuthorizerError<S::Error>>
    where
        R: Authorizable<ID> + ?Sized,
    {
        let mut standing = Standing {
            person: principal.person_id(),
            ..Standing::default()
        };

        if let Some(person) = standing.person {
            standing.groups = self
                .store
                .groups_of(&person)
                .map_err(AuthorizerError::Store)?;

            if let Some(owner) = resource.contributor() {
                standing.blacklisted = self
                    .store
                    .blacklist(&owner)
                    .map_err(AuthorizerError::Store)?
                    .contains(&person);
                if standing.blacklisted {
                    trace!(%person, %owner, "principal is blacklisted");
                }
                standing.whitelisted = self
                    .store
                    .whitelist(&owner)
                    .map_err(AuthorizerError::Store)?
                    .into_iter()
                    .find(|(id, _)| *id == person)
                    .map(|(_, access)| access);
            }
        }

        standing.role_level = resolve_role_level(principal, resource, &self.store, &self.config)
            .map_err(AuthorizerError::Store)?;
        Ok(standing)
    }

    /// Returns true if the principal may perform the action on the resource.
    pub fn can_perform<R>(
        &self,
        principal: &Principal<ID>,
        resource: &R,
        action: Action,
    ) -> Result<bool, AuthorizerError<S::Error>>
    where
        R: Authorizable<ID> + ?Sized,
    {
        if !resource.authorization_supported() {
            trace!(resource = %resource.id(), %action, "authorization not supported, permit");
            return Ok(true);
        }

        let level = self.access_level(principal, resource)?;
        let permitted = level >= action.required_level()
            && (action != Action::Download || resource.is_downloadable());

        debug!(
            ?principal,
            resource = %resource.id(),
            %action,
            %level,
            permitted,
            "authorization decision"
        );
        Ok(permitted)
    }

    /// Make the resource downloadable for everybody.
    ///
    /// Requires the principal to be able to manage the resource, returns `false` otherwise. The
    /// resource needs a policy of its own to be published. Permission check and policy change
    /// happen in one [`PolicyStore::modify_policy`] step, a grant revoked in the meantime is
    /// honoured.
    pub fn publish<R>(
        &self,
        principal: &Principal<ID>,
        resource: &R,
    ) -> Result<bool, AuthorizerError<S::Error>>
    where
        R: Authorizable<ID> + ?Sized,
    {
        if !resource.authorization_supported() {
            return Ok(false);
        }

        let Some(id) = resource.policy_id() else {
            warn!(resource = %resource.id(), "can not publish resource without own policy");
            return Ok(false);
        };

        let standing = self.standing(principal, resource)?;

        // The decision is taken on the policy version which gets published.
        let mut inconsistent = None;
        let modified = self
            .store
            .modify_policy(&id, |policy| {
                if let Err(err) = policy.check_integrity() {
                    inconsistent = Some(err);
                    return false;
                }
                if level_under(policy, principal, &standing) < Action::Manage.required_level() {
                    return false;
                }
                policy.publish();
                true
            })
            .map_err(AuthorizerError::Store)?;

        if let Some(err) = inconsistent {
            warn!(resource = %resource.id(), policy = %id, %err, "inconsistent policy");
            return Err(err.into());
        }

        match modified {
            None => Err(IntegrityError::MissingPolicy(id).into()),
            Some(false) => {
                debug!(?principal, resource = %resource.id(), "publish denied");
                Ok(false)
            }
            Some(true) => {
                debug!(?principal, resource = %resource.id(), policy = %id, "publish");
                Ok(true)
            }
        }
    }

    /// Returns true if anonymous visitors can download the resource, or view it when it has no
    /// downloadable content.
    pub fn is_published<R>(&self, resource: &R) -> Result<bool, AuthorizerError<S::Error>>
    where
        R: Authorizable<ID> + ?Sized,
    {
        let action = if resource.is_downloadable() {
            Action::Download
        } else {
            Action::View
        };
        self.can_perform(&Principal::Anonymous, resource, action)
    }

    /// Returns true if the principal may ask a gatekeeper to publish the resource.
    ///
    /// Only one request per person and resource can be open at a time.
    pub fn can_send_publishing_request<R>(
        &self,
        principal: &Principal<ID>,
        resource: &R,
    ) -> Result<bool, AuthorizerError<S::Error>>
    where
        R: Authorizable<ID> + ?Sized,
    {
        let Some(person) = principal.person_id() else {
            return Ok(false);
        };

        if !self.can_perform(principal, resource, Action::Manage)? {
            return Ok(false);
        }

        let awaiting = self
            .store
            .awaiting_publish_approval(&resource.id(), &person)
            .map_err(AuthorizerError::Store)?;
        Ok(!awaiting)
    }

    /// Returns true if the resource can be published together with the investigation, study and
    /// assay it is part of.
    pub fn is_in_isa_publishable<R>(&self, resource: &R) -> bool
    where
        R: Authorizable<ID> + ?Sized,
    {
        resource.is_downloadable()
    }

    /// Policy for a resource about to be created in the given projects.
    ///
    /// The first project with a default policy hands out a copy of it, otherwise the configured
    /// default policy is used.
    pub fn policy_for_new_resource(
        &self,
        projects: &[ID],
    ) -> Result<Policy<ID>, AuthorizerError<S::Error>> {
        for project in projects {
            let Some(policy) = self
                .store
                .project_default_policy(project)
                .map_err(AuthorizerError::Store)?
            else {
                continue;
            };

            policy.check_integrity()?;
            trace!(%project, policy = %policy.id(), "copy project default policy");
            return Ok(policy.deep_copy());
        }

        Ok(Policy::default_for(&self.config))
    }

    /// Overview of everybody with access to the resource, bucketed by access level.
    ///
    /// Resources outside authorization have no policy to summarize, their summary is empty.
    pub fn summarize_permissions<R>(
        &self,
        resource: &R,
    ) -> Result<PermissionSummary<ID>, AuthorizerError<S::Error>>
    where
        R: Authorizable<ID> + ?Sized,
    {
        if !resource.authorization_supported() {
            return Ok(PermissionSummary::default());
        }

        let policy = self.policy_of(resource)?;

        let mut asset_managers = Vec::new();
        let mut project_managers = Vec::new();
        let mut gatekeepers = Vec::new();
        for project in resource.projects() {
            asset_managers.extend(
                self.store
                    .asset_managers(&project)
                    .map_err(AuthorizerError::Store)?,
            );
            project_managers.extend(
                self.store
                    .project_managers(&project)
                    .map_err(AuthorizerError::Store)?,
            );
            gatekeepers.extend(
                self.store
                    .gatekeepers(&project)
                    .map_err(AuthorizerError::Store)?,
            );
        }

        let roles = RoleHolders::new(
            self.people(resource.creators())?,
            self.people(asset_managers)?,
        )
        .with_project_managers(self.people(project_managers)?)
        .with_gatekeepers(self.people(gatekeepers)?, self.config.gatekeeper_access());

        policy
            .summarize_permissions_with_roles(&roles, resource.contributor(), &self.store)
            .map_err(AuthorizerError::Store)
    }

    /// Person records for the given ids, without duplicates and skipping unknown ids.
    fn people(&self, ids: Vec<ID>) -> Result<Vec<Person<ID>>, AuthorizerError<S::Error>> {
        let mut people: Vec<Person<ID>> = Vec::with_capacity(ids.len());
        for id in ids {
            if people.iter().any(|person| person.id == id) {
                continue;
            }
            if let Some(person) = self.store.person(&id).map_err(AuthorizerError::Store)? {
                people.push(person);
            }
        }
        Ok(people)
    }
}

/// What the stores say about a principal, independent of the policy version.
#[derive(Debug)]
struct Standing<ID> {
    person: Option<ID>,
    groups: Vec<ID>,
    blacklisted: bool,
    whitelisted: Option<AccessLevel>,
    role_level: AccessLevel,
}

impl<ID> Default for Standing<ID> {
    fn default() -> Self {
        Self {
            person: None,
            groups: Vec::new(),
            blacklisted: false,
            whitelisted: None,
            role_level: AccessLevel::NoAccess,
        }
    }
}

/// Access level of the principal under the given policy.
fn level_under<ID>(
    policy: &Policy<ID>,
    principal: &Principal<ID>,
    standing: &Standing<ID>,
) -> AccessLevel
where
    ID: IdentityHandle,
{
    let mut computed = policy.scope_access(principal);

    if let Some(person) = &standing.person {
        computed = computed.max(policy.explicit_access(person, &standing.groups));

        if policy.use_blacklist() && standing.blacklisted {
            computed = Some(AccessLevel::NoAccess);
        } else if policy.use_whitelist() && computed.is_none() {
            computed = standing.whitelisted;
        }
    }

    computed.unwrap_or_default().max(standing.role_level)
}
