//! Aggregation Function Tests
//!
//! Tests for: count, countIfValue, countIfZeroPos, maxValue, minValue, lastEventDate

use crate::{event, Fixture};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use rule_engine_model::{RuleEvent, RuleVariable};
use rule_engine_types::RuleValueType;

// ============================================================================
// Test Helpers
// ============================================================================

const DATA_ELEMENT: &str = "test_data_element";

fn variable(name: &str) -> RuleVariable {
    RuleVariable::current_event(name, DATA_ELEMENT, RuleValueType::Text).unwrap()
}

fn with_value(uid: &str, on: &str, value: &str) -> RuleEvent {
    event(uid, on, &[(DATA_ELEMENT, value)])
}

/// Target event plus three siblings, the last of which lacks the data element
fn siblings(values: [&str; 3]) -> Fixture {
    Fixture::new()
        .variables(vec![variable("test_var_one")])
        .target(with_value("target", "2020-05-04", values[0]))
        .events(vec![
            with_value("event2", "2020-05-02", values[1]),
            with_value("event3", "2020-05-03", values[2]),
            event("event4", "2020-05-01", &[("other", "1")]),
        ])
}

// ============================================================================
// Counting
// ============================================================================

#[rstest]
#[case("d2:count(#{test_var_one})", "3")]
#[case("d2:count('test_var_one')", "3")]
#[case("d2:countIfValue(#{test_var_one}, 'b')", "2")]
#[case("d2:countIfValue('test_var_one', 'a')", "1")]
#[case("d2:countIfValue(#{test_var_one}, 'c')", "0")]
fn test_counting(#[case] source: &str, #[case] expected: &str) {
    let fixture = siblings(["a", "b", "b"]);
    assert_eq!(fixture.text(source), expected);
}

#[test]
fn test_count_if_zero_pos() {
    let fixture = siblings(["0", "1", "-3"]);
    assert_eq!(fixture.text("d2:countIfZeroPos(#{test_var_one})"), "2");
    assert_eq!(fixture.text("d2:countIfZeroPos('test_var_one')"), "2");
}

#[test]
fn test_count_combined_with_has_value() {
    let fixture = siblings(["1", "2", "3"]);
    assert_eq!(
        fixture.text("d2:hasValue(V{current_date}) && d2:count(#{test_var_one}) > 0"),
        "true"
    );
}

#[test]
fn test_stale_copy_of_target_is_replaced() {
    let fixture = siblings(["1", "2", "3"]).events(vec![
        with_value("target", "2020-05-04", "old"),
        with_value("event2", "2020-05-02", "2"),
    ]);
    assert_eq!(fixture.text("d2:count(#{test_var_one})"), "2");
    assert_eq!(fixture.text("d2:countIfValue(#{test_var_one}, 'old')"), "0");
}

#[test]
fn test_unknown_variable_is_an_error() {
    let fixture = siblings(["1", "2", "3"]);
    assert!(fixture.eval("d2:count(#{nope})").is_err());
    assert!(fixture.eval("d2:count('nope')").is_err());
}

// ============================================================================
// Extremes
// ============================================================================

#[test]
fn test_max_and_min_value() {
    let fixture = siblings(["5", "7", "8"]);
    assert_eq!(fixture.text("d2:maxValue(#{test_var_one}) == 8.0"), "true");
    assert_eq!(fixture.text("d2:maxValue('test_var_one')"), "8");
    assert_eq!(fixture.text("d2:minValue(#{test_var_one})"), "5");
}

#[test]
fn test_extremes_skip_non_numeric_values() {
    let fixture = siblings(["x", "-2", "y"]);
    assert_eq!(fixture.text("d2:maxValue(#{test_var_one})"), "-2");

    let fixture = siblings(["x", "y", "z"]);
    assert_eq!(fixture.text("d2:minValue(#{test_var_one})"), "");
}

// ============================================================================
// Last Event Date
// ============================================================================

#[test]
fn test_last_event_date_is_before_target() {
    let fixture = Fixture::new()
        .variables(vec![variable("test_var_one")])
        .target(with_value("target", "2020-06-03", "3"))
        .events(vec![
            with_value("before_yesterday", "2020-05-30", "1"),
            with_value("yesterday", "2020-05-31", "2"),
        ]);
    assert_eq!(fixture.text("d2:lastEventDate('test_var_one')"), "2020-05-31");
    assert_eq!(fixture.text("d2:lastEventDate(#{test_var_one})"), "2020-05-31");
}

#[test]
fn test_last_event_date_without_earlier_events() {
    let fixture = Fixture::new()
        .variables(vec![variable("test_var_one")])
        .target(with_value("target", "2020-05-01", "3"))
        .events(vec![with_value("later", "2020-05-31", "2")]);
    assert_eq!(fixture.text("d2:lastEventDate(#{test_var_one})"), "");
}

// ============================================================================
// Variable Names
// ============================================================================

#[rstest]
#[case("Cabcde12345.Dabcde12345")]
#[case("Babcde12345.*")]
#[case("Eabcde12345.Fabcde12345.*")]
#[case("Labcde12345.*.Mabcde12345")]
#[case("Variable.name_3_4-1")]
fn test_composite_variable_names(#[case] name: &str) {
    let fixture = Fixture::new()
        .variables(vec![variable(name)])
        .target(with_value("target", "2020-05-04", "yes"))
        .events(vec![with_value("event2", "2020-05-02", "no")]);

    assert_eq!(fixture.text(&format!("#{{{name}}}")), "yes");
    assert_eq!(fixture.text(&format!("d2:hasValue(#{{{name}}})")), "true");
    assert_eq!(fixture.text(&format!("d2:count(#{{{name}}})")), "2");
    assert_eq!(
        fixture.text(&format!("d2:countIfValue(#{{{name}}}, 'no')")),
        "1"
    );
}

// ============================================================================
// Order Independence
// ============================================================================

fn counts_for(values: &[Option<i32>]) -> (String, String, String) {
    let events = values
        .iter()
        .enumerate()
        .map(|(i, value)| match value {
            Some(v) => with_value(&format!("event{i}"), "2020-05-01", &v.to_string()),
            None => event(&format!("event{i}"), "2020-05-01", &[]),
        })
        .collect();
    let fixture = Fixture::new()
        .variables(vec![variable("v")])
        .events(events);
    (
        fixture.text("d2:count(#{v})"),
        fixture.text("d2:countIfValue(#{v}, '1')"),
        fixture.text("d2:countIfZeroPos(#{v})"),
    )
}

fn value_lists() -> impl Strategy<Value = (Vec<Option<i32>>, Vec<Option<i32>>)> {
    prop::collection::vec(prop::option::of(-3i32..3), 0..8)
        .prop_flat_map(|values| (Just(values.clone()), Just(values).prop_shuffle()))
}

proptest! {
    #[test]
    fn aggregation_ignores_event_order((values, shuffled) in value_lists()) {
        let expected_count = values.iter().flatten().count().to_string();
        let (count, if_value, zero_pos) = counts_for(&values);
        prop_assert_eq!(&count, &expected_count);
        prop_assert_eq!((count, if_value, zero_pos), counts_for(&shuffled));
    }
}
