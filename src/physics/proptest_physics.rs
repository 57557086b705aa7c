//! Property-based tests for the physics pipeline using proptest.
//!
//! These check collision and gravity invariants over random body layouts.

use bevy::math::DVec2;
use proptest::prelude::*;

use crate::agent::QAgent;
use crate::body::Body;
use crate::config::AgentConfig;
use crate::physics::{compute_accelerations, find_removals, prune};
use crate::test_utils::fixtures;

/// Strategy for a small random collection of bodies.
fn bodies(max: usize) -> impl Strategy<Value = Vec<Body>> {
    prop::collection::vec(
        (-200.0f64..200.0, -200.0f64..200.0, 0.1f64..1000.0, 0.0f64..30.0),
        0..max,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, mass, radius))| {
                fixtures::body(i as u64, DVec2::new(x, y), mass, radius)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Overlap is a symmetric relation.
    #[test]
    fn prop_collision_symmetric(layout in bodies(8)) {
        for a in &layout {
            for b in &layout {
                prop_assert_eq!(a.is_colliding(b), b.is_colliding(a));
            }
        }
    }

    /// Every overlapping pair loses exactly its later body, and nothing
    /// else is removed.
    #[test]
    fn prop_later_body_of_each_pair_removed(layout in bodies(10)) {
        let removals = find_removals(&layout);

        for j in 0..layout.len() {
            let overlaps_earlier = (0..j).any(|i| layout[i].is_colliding(&layout[j]));
            prop_assert_eq!(removals.contains(&j), overlaps_earlier);
        }
        // The first body can never be removed.
        prop_assert!(!removals.contains(&0));
    }

    /// Pruning keeps exactly the unmarked bodies in their original order.
    #[test]
    fn prop_prune_keeps_survivors_in_order(layout in bodies(10)) {
        let removals = find_removals(&layout);
        let mut survivors = layout.clone();
        let removed = prune(&mut survivors, &removals);

        prop_assert_eq!(removed.len(), removals.len());
        prop_assert_eq!(survivors.len() + removed.len(), layout.len());
        let expected: Vec<_> = layout
            .iter()
            .enumerate()
            .filter(|(i, _)| !removals.contains(i))
            .map(|(_, body)| body.id)
            .collect();
        let actual: Vec<_> = survivors.iter().map(|body| body.id).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Pairwise forces cancel: total momentum change from one gravity pass
    /// is zero.
    #[test]
    fn prop_gravity_conserves_momentum(layout in bodies(6)) {
        let accelerations = compute_accelerations(&layout, 1.0);
        let net: DVec2 = layout
            .iter()
            .zip(&accelerations)
            .map(|(body, acc)| *acc * body.mass)
            .sum();
        let scale: f64 = layout
            .iter()
            .zip(&accelerations)
            .map(|(body, acc)| acc.length() * body.mass)
            .sum::<f64>()
            .max(1.0);
        prop_assert!(net.length() / scale < 1e-9, "net force {:?}", net);
    }

    /// Exploration never drops below its floor.
    #[test]
    fn prop_epsilon_floor(
        decay in 0.01f64..1.0,
        floor in 0.0f64..0.5,
        updates in 1usize..500,
    ) {
        let config = AgentConfig {
            epsilon_decay: decay,
            min_epsilon: floor,
            ..AgentConfig::default()
        };
        let mut agent = QAgent::with_seed(config, 9).unwrap();
        agent.select_action(DVec2::ZERO);
        for _ in 0..updates {
            agent.update(-1.0);
            prop_assert!(agent.epsilon() >= floor);
        }
    }
}
