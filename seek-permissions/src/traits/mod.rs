// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the collaborators the authorization core reads from.
mod identity;
mod store;

pub use identity::IdentityHandle;
pub use store::{MembershipStore, PolicyStore, RoleStore};
