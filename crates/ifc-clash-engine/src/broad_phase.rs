// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broad-phase candidate pair generation
//!
//! Enumerates element pairs whose world-space bounding boxes overlap,
//! using the per-group spatial index instead of brute-force all-pairs
//! testing. De-duplication invariant: an element id is added to a visited
//! set before its box query runs, and a candidate already in the set is
//! skipped only when the reverse pair was reachable from the candidate's
//! own query, that is when the current element is also in the second
//! group. Each unordered pair is therefore emitted exactly once and an
//! element never pairs with itself, for self-collision queries and for
//! groups sharing any subset of their elements.

use ifc_clash_model::GlobalId;
use rustc_hash::FxHashSet;

use crate::spatial::Group;

/// An ephemeral pair of potentially colliding elements
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CandidatePair {
    /// Element from the first group
    pub a: GlobalId,
    /// Element from the second group
    pub b: GlobalId,
}

/// Enumerate candidate pairs between two groups
///
/// Pass the same group twice for self-collision. Pairs are emitted in
/// iteration order of the first group, then candidate order of the
/// second, which is registration order on both sides.
pub fn broad_phase(group_a: &Group, group_b: &Group) -> Vec<CandidatePair> {
    let mut visited: FxHashSet<&GlobalId> = FxHashSet::default();
    let mut pairs = Vec::new();
    for id in group_a.iter() {
        // Mark before querying so the element cannot pair with itself.
        visited.insert(id);
        let Some(object) = group_a.object(id) else {
            continue;
        };
        for candidate in group_b.query_box(object.world_aabb()) {
            // Skip the self-pair, and skip a visited candidate only if its
            // own query could have emitted the reverse pair (this element
            // is in the second group too).
            if candidate == *id || (visited.contains(&candidate) && group_b.contains(id)) {
                continue;
            }
            pairs.push(CandidatePair {
                a: id.clone(),
                b: candidate,
            });
        }
    }
    pairs
}
