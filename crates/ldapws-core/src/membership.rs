//! Group to user membership maps
//!
//! A [`MembershipMap`] records, per group, the set of users holding some
//! relation to it (local administrator, directory owner). Ordered
//! collections keep iteration, and therefore log output, deterministic.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, UserId};

/// Mapping from group to a set of users. Duplicate pairs collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipMap {
    groups: BTreeMap<GroupId, BTreeSet<UserId>>,
}

impl MembershipMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `user` under `group`. Returns `false` if the pair was already present.
    pub fn insert(&mut self, group: impl Into<GroupId>, user: impl Into<UserId>) -> bool {
        self.groups
            .entry(group.into())
            .or_default()
            .insert(user.into())
    }

    /// Make sure `group` is a key, with an empty set if it had none.
    pub fn ensure_group(&mut self, group: impl Into<GroupId>) {
        self.groups.entry(group.into()).or_default();
    }

    /// Replace the user set of `group`. An empty set removes the key.
    pub fn set_users(&mut self, group: impl Into<GroupId>, users: BTreeSet<UserId>) {
        let group = group.into();
        if users.is_empty() {
            self.groups.remove(&group);
        } else {
            self.groups.insert(group, users);
        }
    }

    /// Remove one pair. Returns whether it was present.
    pub fn remove(&mut self, group: &GroupId, user: &UserId) -> bool {
        let Some(users) = self.groups.get_mut(group) else {
            return false;
        };
        let removed = users.remove(user);
        if users.is_empty() {
            self.groups.remove(group);
        }
        removed
    }

    /// Users recorded for `group`; `None` when the group is absent.
    #[must_use]
    pub fn users(&self, group: &GroupId) -> Option<&BTreeSet<UserId>> {
        self.groups.get(group)
    }

    /// Whether the pair is present.
    #[must_use]
    pub fn contains(&self, group: &GroupId, user: &UserId) -> bool {
        self.groups
            .get(group)
            .is_some_and(|users| users.contains(user))
    }

    /// Group keys in ascending order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.keys()
    }

    /// Groups with their user sets, in ascending group order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupId, &BTreeSet<UserId>)> {
        self.groups.iter()
    }

    /// Every (group, user) pair, ordered by group then user.
    pub fn pairs(&self) -> impl Iterator<Item = (&GroupId, &UserId)> {
        self.groups
            .iter()
            .flat_map(|(group, users)| users.iter().map(move |user| (group, user)))
    }

    /// Number of group keys.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of (group, user) pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }

    /// Whether the map holds no pair at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(BTreeSet::is_empty)
    }
}

impl<G, U> FromIterator<(G, U)> for MembershipMap
where
    G: Into<GroupId>,
    U: Into<UserId>,
{
    fn from_iter<I: IntoIterator<Item = (G, U)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (group, user) in iter {
            map.insert(group, user);
        }
        map
    }
}

impl<G, U> Extend<(G, U)> for MembershipMap
where
    G: Into<GroupId>,
    U: Into<UserId>,
{
    fn extend<I: IntoIterator<Item = (G, U)>>(&mut self, iter: I) {
        for (group, user) in iter {
            self.insert(group, user);
        }
    }
}
