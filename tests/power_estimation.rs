use pmpkit::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::rstest;

#[test]
fn test_reference_scenario() -> anyhow::Result<()> {
    let config = PowerConfig::default()
        .with_alpha(0.05)
        .with_power(0.8)
        .with_max_depth(100_000)
        .with_step(100);
    let depth = estimate_required_depth(0.001, 0.05, 1_000_000, &config)?
        .expect("target power is reachable");
    assert!(depth > config.floor);

    // Independent check with another stream and more trials.
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let power = simulate_power(0.001, 0.05, 1_000_000, depth, 0.05, 4_000, &mut rng)?;
    assert!(power >= 0.8 - 0.05, "power at {} reads is {}", depth, power);
    Ok(())
}

#[rstest]
#[case(0.02, 0.02)]
#[case(0.3, 0.1)]
fn test_not_found_without_difference(
    #[case] f1: f64,
    #[case] f2: f64,
) {
    assert_eq!(
        estimate_required_depth(f1, f2, 1_000_000, &PowerConfig::default()),
        Ok(None)
    );
}

#[test]
fn test_same_seed_same_result_different_seed_still_valid() -> anyhow::Result<()> {
    let config = PowerConfig::default()
        .with_max_depth(3_000)
        .with_step(25)
        .with_n_trials(300);
    let a = estimate_required_depth(0.005, 0.03, 200_000, &config)?;
    let b = estimate_required_depth(0.005, 0.03, 200_000, &config)?;
    assert_eq!(a, b);

    let other = estimate_required_depth(0.005, 0.03, 200_000, &config.clone().with_seed(7))?;
    assert!(a.is_some());
    assert!(other.is_some());
    Ok(())
}

#[test]
fn test_monotone_in_target_power() -> anyhow::Result<()> {
    let base = PowerConfig::default()
        .with_max_depth(3_000)
        .with_step(25)
        .with_n_trials(300);
    let depths = [0.6, 0.75, 0.9]
        .into_iter()
        .map(|power| estimate_required_depth(0.005, 0.03, 200_000, &base.clone().with_power(power)))
        .collect::<Result<Vec<_>, _>>()?;
    let found = depths.into_iter().flatten().collect::<Vec<_>>();
    assert_eq!(found.len(), 3);
    assert!(found.windows(2).all(|w| w[0] <= w[1]), "{:?}", found);
    Ok(())
}

#[test]
fn test_bisect_lands_on_grid() -> anyhow::Result<()> {
    let config = PowerConfig::default()
        .with_max_depth(3_000)
        .with_step(25)
        .with_n_trials(300)
        .with_strategy(SearchStrategy::Bisect);
    let depth = estimate_required_depth(0.005, 0.03, 200_000, &config)?
        .expect("target power is reachable");
    assert_eq!((depth - config.floor) % config.step, 0);
    assert!(depth <= config.max_depth);

    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let power = simulate_power(0.005, 0.03, 200_000, depth, 0.05, 2_000, &mut rng)?;
    assert!(power >= 0.8 - 0.1, "power at {} reads is {}", depth, power);
    Ok(())
}

#[test]
fn test_batch_matches_single_estimates() -> anyhow::Result<()> {
    let config = PowerConfig::default()
        .with_max_depth(2_000)
        .with_step(50)
        .with_n_trials(200);
    let rows = (0..12)
        .map(|i| {
            CandidatePattern {
                cpg_coordinates:  format!("{}:{}:{}", i, i + 1, i + 2),
                pattern:          PmpPattern::ALL[i % 8],
                fraction_tissue1: 0.002 * (i % 3) as f64,
                fraction_tissue2: 0.01 + 0.01 * i as f64,
            }
        })
        .collect::<Vec<_>>();

    let thresholds = estimate_thresholds_for_candidates(&rows, 500_000, &config)?;
    assert_eq!(thresholds.len(), rows.len());
    for (row, threshold) in rows.iter().zip(thresholds.iter()) {
        assert_eq!(threshold.cpg_coordinates, row.cpg_coordinates);
        let single = estimate_required_depth(
            row.fraction_tissue1,
            row.fraction_tissue2,
            500_000,
            &config,
        )?;
        assert_eq!(threshold.coverage_required_t2, single);
    }
    Ok(())
}
