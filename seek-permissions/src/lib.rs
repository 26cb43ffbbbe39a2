// SPDX-License-Identifier: MIT OR Apache-2.0

//! Policy-based authorization for research assets.
//!
//! Every protected resource owns a [`Policy`]. The policy grants a default [`AccessLevel`] to a
//! [`SharingScope`] population and holds explicit [`Permission`] records for individuals and
//! groups. Roles in the resource's owning projects imply further access, see [`roles`]. The
//! [`Authorizer`] merges all sources into one decision per [`Action`].
mod access;
mod action;
pub mod authorizer;
mod config;
pub mod entries;
mod error;
mod identifier;
pub mod memory;
mod member;
mod permission;
pub mod policy;
pub mod resource;
pub mod roles;
pub mod summary;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;

pub use access::{AccessLevel, SharingScope};
pub use action::{Action, UnknownAction};
pub use authorizer::{Authorizer, AuthorizerError};
pub use config::Config;
pub use entries::Entry;
pub use error::{IntegrityError, ValidationError};
pub use identifier::{PermissionId, PolicyId};
pub use member::{Contributor, Person, Principal};
pub use memory::{MemoryStore, MemoryStoreError};
pub use permission::Permission;
pub use policy::Policy;
pub use resource::{Asset, Authorizable, ResourceKind, UnknownResourceKind, Unrestricted};
pub use roles::Role;
pub use summary::{PermissionSummary, RoleHolders};
