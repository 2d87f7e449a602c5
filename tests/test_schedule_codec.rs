//! Schedule codec properties: structured schedules survive encode/decode, and
//! anything unrecognized comes back verbatim as a manual expression.

mod common;

use guardian::schedule::{
    decode, decode_with, encode, Frequency, ScheduleDescriptor, ScheduleForm, WeeklyMatching,
    HOURLY_EXPRESSION,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(common::proptest_config())]

    #[test]
    fn daily_round_trips(hour in 0u32..=23) {
        let descriptor = ScheduleDescriptor::daily(hour);
        prop_assert_eq!(decode(&encode(&descriptor)), descriptor);
    }

    #[test]
    fn weekly_round_trips_in_both_modes(hour in 0u32..=23, day in 0u32..=6) {
        let descriptor = ScheduleDescriptor::weekly(hour, day);
        let expr = encode(&descriptor);
        prop_assert_eq!(decode_with(&expr, WeeklyMatching::Loose), descriptor.clone());
        prop_assert_eq!(decode_with(&expr, WeeklyMatching::Strict), descriptor);
    }

    #[test]
    fn custom_round_trips(interval in 1u32..=59) {
        let descriptor = ScheduleDescriptor::custom(interval);
        prop_assert_eq!(decode(&encode(&descriptor)), descriptor);
    }

    #[test]
    fn out_of_range_inputs_are_clamped(hour in 24u32..1000, day in 7u32..1000, interval in 60u32..1000) {
        prop_assert_eq!(encode(&ScheduleDescriptor::daily(hour)), "0 23 * * *");
        prop_assert_eq!(encode(&ScheduleDescriptor::weekly(hour, day)), "0 23 * * 6");
        prop_assert_eq!(encode(&ScheduleDescriptor::custom(interval)), "*/59 * * * *");
    }

    #[test]
    fn decode_never_loses_an_expression(expr in "[0-9*/,-]{1,4}( [0-9*/,-]{1,4}){0,6}") {
        let descriptor = decode(&expr);
        if let ScheduleDescriptor::Manual { raw_expression } = &descriptor {
            prop_assert_eq!(raw_expression.as_str(), expr.trim());
        }
        // Whatever the shape, encoding it again is stable.
        let again = encode(&descriptor);
        prop_assert_eq!(encode(&decode(&again)), again);
    }
}

#[test]
fn test_weekly_form_to_expression_and_back() {
    let form = ScheduleForm {
        day: Some("1".to_string()),
        hour: Some("3".to_string()),
        ..ScheduleForm::new(Frequency::Weekly)
    };
    let expr = encode(&form.to_descriptor());
    assert_eq!(expr, "0 3 * * 1");

    let decoded = decode(&expr);
    assert_eq!(decoded.frequency(), Frequency::Weekly);
    assert_eq!(decoded, ScheduleDescriptor::Weekly { hour: 3, day: 1 });
}

#[test]
fn test_hourly_and_empty() {
    assert_eq!(encode(&ScheduleDescriptor::Hourly), HOURLY_EXPRESSION);
    assert_eq!(decode(HOURLY_EXPRESSION), ScheduleDescriptor::Hourly);
    assert_eq!(decode(""), ScheduleDescriptor::Hourly);
    assert_eq!(decode("   "), ScheduleDescriptor::Hourly);
    assert_eq!(encode(&ScheduleDescriptor::manual("  ")), HOURLY_EXPRESSION);
}

#[test]
fn test_manual_fallbacks() {
    for expr in ["*/5 9-17 1 * *", "0 0 1 * *", "@daily", "15 2 * * *"] {
        assert_eq!(decode(expr), ScheduleDescriptor::manual(expr), "{}", expr);
        assert_eq!(encode(&decode(expr)), expr);
    }
}

#[test]
fn test_loose_and_strict_weekly_disagree() {
    // Loose accepts any " * * " shape with a day-of-week set.
    assert_eq!(
        decode_with("30 4 * * 1-5", WeeklyMatching::Loose).frequency(),
        Frequency::Weekly
    );
    assert_eq!(
        decode_with("30 4 * * 1-5", WeeklyMatching::Strict),
        ScheduleDescriptor::manual("30 4 * * 1-5")
    );
}
