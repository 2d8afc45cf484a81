//! Property tests: the swarm never reports a point outside its box.

use proptest::prelude::*;
use sysid_optim::{Bounds, ParticleSwarm, PsoOptions};

fn small_swarm(seed: u64) -> PsoOptions {
    PsoOptions {
        swarm_size: 8,
        max_iterations: 15,
        seed: Some(seed),
        parallel: false,
        ..PsoOptions::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn result_stays_inside_bounds(
        lower in prop::collection::vec(-50.0_f64..0.0, 1..7),
        width in 0.0_f64..30.0,
        seed in any::<u64>(),
    ) {
        let upper: Vec<f64> = lower.iter().map(|l| l + width).collect();
        let bounds = Bounds::new(lower, upper).unwrap();

        // Linear objective pushes the swarm into a corner of the box.
        let result = ParticleSwarm::new(small_swarm(seed))
            .unwrap()
            .minimize(|x: &[f64]| x.iter().sum(), &bounds)
            .unwrap();

        prop_assert!(bounds.contains(&result.best_position));
        prop_assert!(result.best_value.is_finite());
    }

    #[test]
    fn six_dimensional_default_box(seed in any::<u64>()) {
        let bounds = Bounds::uniform(6, -10.0, 10.0).unwrap();
        let result = ParticleSwarm::new(small_swarm(seed))
            .unwrap()
            .minimize(|x: &[f64]| x.iter().map(|v| (v - 20.0).powi(2)).sum(), &bounds)
            .unwrap();

        prop_assert_eq!(result.best_position.len(), 6);
        for v in &result.best_position {
            prop_assert!((-10.0..=10.0).contains(v));
        }
    }
}
