//! Collision detection and removal policy.
//!
//! Every unordered pair is checked once. When two bodies touch, the one
//! later in the collection is removed and the earlier one survives, whatever
//! their masses. There is no merging.

use std::collections::BTreeSet;

use bevy::log::debug;

use crate::body::Body;

/// Indices of the bodies to remove this tick, ascending.
///
/// A body already marked may still be checked against later pairs; it is
/// removed once however many collisions it is part of.
pub fn find_removals(bodies: &[Body]) -> BTreeSet<usize> {
    let mut removals = BTreeSet::new();

    for (i, a) in bodies.iter().enumerate() {
        for (j, b) in bodies.iter().enumerate().skip(i + 1) {
            if a.is_colliding(b) {
                debug!("Collision: {:?} vs {:?}, removing {:?}", a.id, b.id, b.id);
                removals.insert(j);
            }
        }
    }

    removals
}

/// Drop the marked bodies in one pass, keeping the order of the rest.
///
/// Returns the removed bodies.
pub fn prune(bodies: &mut Vec<Body>, removals: &BTreeSet<usize>) -> Vec<Body> {
    if removals.is_empty() {
        return Vec::new();
    }

    let mut removed = Vec::with_capacity(removals.len());
    let mut kept = Vec::with_capacity(bodies.len() - removals.len());
    for (index, body) in bodies.drain(..).enumerate() {
        if removals.contains(&index) {
            removed.push(body);
        } else {
            kept.push(body);
        }
    }
    *bodies = kept;
    removed
}
