mod common;

use casewise_confidence::{
    BCaBootstrap, CaseBootstrap, ConfidenceLevel, IntervalMethod, PercentileBootstrap,
};
use casewise_core::{execution::sequential, CancellationToken, Error};
use common::*;
use proptest::prelude::*;

fn terms<'a>(named: &'a [(&'a str, Vec<f64>)]) -> Vec<(&'a str, &'a [f64])> {
    named.iter().map(|(t, v)| (*t, v.as_slice())).collect()
}

#[test]
fn test_replicate_count_matches_request() {
    let named = vec![("vals", normal_cases(12, 2.0, 0.5, 1))];
    let result = CaseBootstrap::new(sequential(), BCaBootstrap)
        .with_resamples(321)
        .with_seed(3)
        .run(&terms(&named))
        .unwrap();

    assert_eq!(result.n_resamples, 321);
    assert_eq!(result.terms[0].replicates.len(), 321);
}

#[test]
fn test_terms_keep_input_order() {
    let named = vec![
        ("(Intercept)", normal_cases(8, 1.0, 0.3, 10)),
        ("vals", normal_cases(8, 2.0, 0.3, 11)),
        ("I(vals^2)", normal_cases(8, -0.5, 0.1, 12)),
    ];
    let result = CaseBootstrap::new(sequential(), PercentileBootstrap)
        .with_resamples(200)
        .with_seed(5)
        .run(&terms(&named))
        .unwrap();

    let names: Vec<&str> = result.terms.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(names, vec!["(Intercept)", "vals", "I(vals^2)"]);
}

#[test]
fn test_term_replicates_do_not_depend_on_other_terms() {
    // A term's stream depends on the seed and its position only
    let a = ("a", normal_cases(10, 0.0, 1.0, 20));
    let b = ("b", normal_cases(10, 5.0, 1.0, 21));
    let c = ("c", normal_cases(15, 9.0, 2.0, 22));

    let bootstrap = CaseBootstrap::new(sequential(), BCaBootstrap)
        .with_resamples(300)
        .with_seed(77);

    let first = bootstrap.run(&terms(&[a.clone(), b.clone()])).unwrap();
    let second = bootstrap.run(&terms(&[a, c])).unwrap();

    assert_eq!(first.terms[0], second.terms[0]);
}

#[test]
fn test_different_seeds_differ() {
    let named = vec![("vals", normal_cases(10, 1.0, 1.0, 30))];
    let one = CaseBootstrap::new(sequential(), BCaBootstrap)
        .with_resamples(200)
        .with_seed(1)
        .run(&terms(&named))
        .unwrap();
    let two = CaseBootstrap::new(sequential(), BCaBootstrap)
        .with_resamples(200)
        .with_seed(2)
        .run(&terms(&named))
        .unwrap();

    assert_ne!(one.terms[0].replicates, two.terms[0].replicates);
}

#[test]
fn test_drawn_seed_is_reported_and_reproduces() {
    let named = vec![("vals", normal_cases(10, 1.0, 1.0, 40))];
    let bootstrap = CaseBootstrap::new(sequential(), BCaBootstrap).with_resamples(150);
    let drawn = bootstrap.run(&terms(&named)).unwrap();

    let replay = bootstrap
        .clone()
        .with_seed(drawn.seed)
        .run(&terms(&named))
        .unwrap();
    assert_eq!(drawn.terms, replay.terms);
}

#[test]
fn test_bootstrap_mean_tracks_sample_mean() {
    let values = normal_cases(40, 3.0, 1.0, 50);
    let sample_mean = values.iter().sum::<f64>() / values.len() as f64;
    let named = vec![("vals", values)];

    let result = CaseBootstrap::new(sequential(), BCaBootstrap)
        .with_resamples(4000)
        .with_seed(9)
        .run(&terms(&named))
        .unwrap();

    let term = &result.terms[0];
    assert_relative_eq!(term.mean, sample_mean, epsilon = 0.05);
    assert_relative_eq!(term.interval.estimate, sample_mean, epsilon = 1e-12);
    // Standard error of a mean of 40 unit-variance cases is about 1/sqrt(40)
    assert!(term.std_error > 0.08 && term.std_error < 0.25, "se = {}", term.std_error);
    assert!(term.interval.contains(sample_mean));
}

#[test]
fn test_wider_level_gives_wider_interval() {
    let named = vec![("vals", skewed_cases(30, 60))];
    let at = |level: ConfidenceLevel| {
        CaseBootstrap::new(sequential(), IntervalMethod::BCa)
            .with_resamples(2000)
            .with_confidence_level(level)
            .with_seed(13)
            .run(&terms(&named))
            .unwrap()
            .terms[0]
            .interval
    };

    let narrow = at(ConfidenceLevel::NINETY);
    let wide = at(ConfidenceLevel::NINETY_NINE);
    assert!(wide.lower <= narrow.lower);
    assert!(wide.upper >= narrow.upper);
}

#[test]
fn test_cancellation_mid_configuration() {
    let token = CancellationToken::new();
    let named = vec![("vals", normal_cases(10, 0.0, 1.0, 70))];
    let bootstrap = CaseBootstrap::new(sequential(), BCaBootstrap)
        .with_resamples(100)
        .with_seed(1)
        .with_cancellation(token.clone());

    assert!(bootstrap.run(&terms(&named)).is_ok());
    token.cancel();
    assert!(matches!(bootstrap.run(&terms(&named)), Err(Error::Cancelled)));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    use casewise_core::execution::parallel;

    let named = vec![
        ("(Intercept)", normal_cases(9, 1.0, 0.4, 80)),
        ("vals", normal_cases(9, 2.0, 0.4, 81)),
        ("time", skewed_cases(9, 82)),
    ];

    let seq = CaseBootstrap::new(sequential(), BCaBootstrap)
        .with_resamples(500)
        .with_seed(99)
        .run(&terms(&named))
        .unwrap();
    let par = CaseBootstrap::new(parallel(), BCaBootstrap)
        .with_resamples(500)
        .with_seed(99)
        .run(&terms(&named))
        .unwrap();

    assert_eq!(seq.terms, par.terms);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_interval_is_ordered_and_inside_sample_range(
        values in prop::collection::vec(-100.0f64..100.0, 3..25),
        seed in any::<u64>(),
    ) {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assume!(max - min > 1e-6);

        let named = vec![("x", values)];
        let bootstrap = CaseBootstrap::new(sequential(), PercentileBootstrap)
            .with_resamples(200)
            .with_seed(seed);
        let result = bootstrap.run(&terms(&named)).unwrap();
        let term = &result.terms[0];

        prop_assert!(term.interval.lower <= term.interval.upper);
        prop_assert!(term.interval.lower >= min - 1e-9);
        prop_assert!(term.interval.upper <= max + 1e-9);
        prop_assert!(term.replicates.iter().all(|&r| r >= min - 1e-9 && r <= max + 1e-9));
    }
}
