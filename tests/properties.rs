//! Property-based tests for the survey statistics.

use hygiene_eda::analysis::{
    compare_companies, confidence_interval, hygiene_score, proportions, IntervalMethod,
};
use hygiene_eda::config::{Indicator, Record, Response};
use proptest::prelude::*;

fn response_strategy() -> impl Strategy<Value = Response> {
    prop_oneof![Just(Response::Yes), Just(Response::No), Just(Response::Unknown)]
}

fn method_strategy() -> impl Strategy<Value = IntervalMethod> {
    prop_oneof![
        Just(IntervalMethod::Wilson),
        Just(IntervalMethod::Normal),
        Just(IntervalMethod::ExactBinomial),
    ]
}

fn record_strategy() -> impl Strategy<Value = Record> {
    ("E[0-9]{1,2}", prop::collection::vec(response_strategy(), 9)).prop_map(|(id, answers)| {
        let mut record = Record::new(&id);
        for (indicator, answer) in Indicator::ALL.into_iter().zip(answers) {
            record = record.with_practice(indicator, answer);
        }
        record
    })
}

proptest! {
    #[test]
    fn test_shares_sum_to_one(records in prop::collection::vec(record_strategy(), 1..40)) {
        for indicator in Indicator::ALL {
            let shares = proportions(&records, indicator);
            let shares = shares.shares().expect("non-empty input has shares");
            let sum: f64 = Response::ALL.iter().map(|r| shares.share(*r)).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert_eq!(shares.counts.total(), records.len());
        }
    }

    #[test]
    fn test_interval_is_ordered_and_bounded(
        (total, successes) in (1usize..500).prop_flat_map(|n| (Just(n), 0..=n)),
        level in 0.5f64..0.999,
        method in method_strategy(),
    ) {
        let ci = confidence_interval(successes, total, level, method).unwrap();
        prop_assert!(0.0 <= ci.lower_bound);
        prop_assert!(ci.lower_bound <= ci.upper_bound);
        prop_assert!(ci.upper_bound <= 1.0);
        prop_assert_eq!(ci.confidence_level, level);
    }

    #[test]
    fn test_compare_companies_preserves_request_order(
        records in prop::collection::vec(record_strategy(), 0..30),
        requested in prop::collection::vec("E[0-9]{1,2}", 0..6),
    ) {
        let profiles = compare_companies(&records, &requested);
        prop_assert_eq!(profiles.len(), requested.len());
        for (profile, id) in profiles.iter().zip(&requested) {
            prop_assert_eq!(&profile.company_id, id);
            prop_assert_eq!(profile.is_found(), records.iter().any(|r| &r.company_id == id));
        }
    }

    #[test]
    fn test_hygiene_score_in_unit_range(record in record_strategy()) {
        if let Some(score) = hygiene_score(&record) {
            prop_assert!((0.0..=1.0).contains(&score));
        } else {
            prop_assert!(record.practices.iter().all(|r| *r == Response::Unknown));
        }
    }
}
