use proptest::prelude::*;

use crate::timesync::clock::ClockOffset;

#[test]
fn test_first_sample_sets_initial_only() {
    let mut offset = ClockOffset::default();
    offset.record(5_050, 100);

    assert_eq!(offset.sample_count(), 1);
    assert_eq!(offset.initial_ms(), 4_950);
    assert_eq!(offset.aggregated_ms(), 0);
    assert_eq!(offset.average_ms(), 0);
}

#[test]
fn test_later_samples_accumulate_residuals() {
    let mut offset = ClockOffset::default();
    offset.record(5_050, 100); // initial = 4950

    // Residual = estimated - receive - initial.
    offset.record(6_060, 1_100); // 6060 - 1100 - 4950 = 10
    assert_eq!(offset.sample_count(), 2);
    assert_eq!(offset.aggregated_ms(), 10);
    assert_eq!(offset.average_ms(), 10);

    offset.record(7_070, 2_100); // 7070 - 2100 - 4950 = 20
    assert_eq!(offset.sample_count(), 3);
    assert_eq!(offset.aggregated_ms(), 30);
    assert_eq!(offset.average_ms(), 15);
}

#[test]
fn test_negative_residuals() {
    let mut offset = ClockOffset::default();
    offset.record(1_000, 2_000); // initial = -1000
    assert_eq!(offset.initial_ms(), -1_000);

    offset.record(2_990, 4_000); // 2990 - 4000 - (-1000) = -10
    assert_eq!(offset.average_ms(), -10);
}

#[test]
fn test_server_now_translation() {
    let mut offset = ClockOffset::default();
    offset.record(5_050, 100); // initial = 4950
    offset.record(6_070, 1_100); // residual = 20

    // server now = local + average + initial.
    assert_eq!(offset.server_now_ms(10_000), 10_000 + 20 + 4_950);
}

#[test]
fn test_server_now_with_no_samples_is_identity() {
    let offset = ClockOffset::default();
    assert_eq!(offset.server_now_ms(123_456), 123_456);
}

proptest! {
    // The running average is always the integer mean of all non-initial
    // residuals, regardless of the sample sequence.
    #[test]
    fn prop_average_is_mean_of_residuals(
        pairs in prop::collection::vec((0i64..1_000_000, 0i64..1_000_000), 2..40)
    ) {
        let mut offset = ClockOffset::default();
        for (estimated, receive) in &pairs {
            offset.record(*estimated, *receive);
        }

        let initial = pairs[0].0 - pairs[0].1;
        let residuals: Vec<i64> = pairs[1..]
            .iter()
            .map(|(estimated, receive)| estimated - receive - initial)
            .collect();
        let sum: i64 = residuals.iter().sum();

        prop_assert_eq!(offset.initial_ms(), initial);
        prop_assert_eq!(offset.aggregated_ms(), sum);
        prop_assert_eq!(offset.average_ms(), sum / residuals.len() as i64);
        prop_assert_eq!(offset.sample_count(), pairs.len() as u32);
    }
}
