//! Owner reconciliation
//!
//! Compares the desired administrators of each group with the owners the
//! directory currently records and produces the minimal set of additions and
//! removals. Pure: no I/O and independent of insertion order.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::ids::{GroupId, UserId};
use crate::membership::MembershipMap;

/// Changes needed to make the directory match the local state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Pairs present locally but missing from the directory.
    pub to_add: MembershipMap,
    /// Pairs present in the directory but not locally.
    pub to_remove: MembershipMap,
}

impl Reconciliation {
    /// Whether the two sides already agree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of directory mutations this plan implies.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.to_add.pair_count() + self.to_remove.pair_count()
    }
}

/// Reconcile local administrators against directory owners.
///
/// For every group key in either map, `local[g] \ directory[g]` becomes an
/// addition and `directory[g] \ local[g]` a removal. A group missing from one
/// side counts as an empty set there. Groups whose difference is empty are
/// left out of the result.
#[must_use]
#[instrument(skip_all, fields(local_groups = local.group_count(), directory_groups = directory.group_count()))]
pub fn reconcile(local: &MembershipMap, directory: &MembershipMap) -> Reconciliation {
    let plan = Reconciliation {
        to_add: difference(local, directory),
        to_remove: difference(directory, local),
    };

    debug!(
        to_add = plan.to_add.pair_count(),
        to_remove = plan.to_remove.pair_count(),
        "Reconciled group owners"
    );

    plan
}

/// Per-group set difference `left \ right`, keeping only non-empty results.
fn difference(left: &MembershipMap, right: &MembershipMap) -> MembershipMap {
    let empty = BTreeSet::new();
    let mut result = MembershipMap::new();

    for (group, users) in left.iter() {
        let other: &BTreeSet<UserId> = right.users(group).unwrap_or(&empty);
        let missing: BTreeSet<UserId> = users.difference(other).cloned().collect();
        if !missing.is_empty() {
            result.set_users(GroupId::clone(group), missing);
        }
    }

    result
}
