// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Identifier of a person, group, project or resource.
///
/// People, groups and projects share one identifier space, a permission can be granted to any of
/// them through [`Contributor`](crate::Contributor).
pub trait IdentityHandle: Copy + Debug + Display + Eq + Ord + Hash + Send + Sync {}

impl IdentityHandle for u64 {}
impl IdentityHandle for u32 {}
