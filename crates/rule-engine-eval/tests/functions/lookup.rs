//! Lookup Function Tests
//!
//! Tests for: hasValue, isNull, isNotNull, firstNonNull, inOrgUnitGroup,
//! hasUserRole, if, constants

use crate::{eval, eval_text, event, Fixture};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rule_engine_eval::{EvalError, USER_ROLES_KEY};
use rule_engine_model::RuleVariable;
use rule_engine_types::RuleValueType;

fn with_variable(value: &str) -> Fixture {
    Fixture::new()
        .variables(vec![
            RuleVariable::current_event("v", "de", RuleValueType::Text).unwrap(),
            RuleVariable::current_event("blank", "other", RuleValueType::Text).unwrap(),
        ])
        .target(event("target", "2020-05-04", &[("de", value)]))
}

// ============================================================================
// Presence
// ============================================================================

#[rstest]
#[case("d2:hasValue(#{v})", "true")]
#[case("d2:hasValue('v')", "true")]
#[case("d2:hasValue(#{blank})", "false")]
#[case("d2:hasValue(#{unknown})", "false")]
#[case("d2:hasValue('unknown')", "false")]
#[case("d2:hasValue(V{event_date})", "true")]
#[case("d2:hasValue(V{due_date})", "false")]
#[case("d2:hasValue(V{no_such_thing})", "false")]
#[case("isNull(#{blank})", "true")]
#[case("isNull(#{v})", "false")]
#[case("isNotNull(#{v})", "true")]
#[case("isNotNull(#{unknown})", "false")]
fn test_presence(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(with_variable("x").text(source), expected);
}

#[test]
fn test_has_value_on_enrollment_target() {
    assert_eq!(
        eval_text("d2:hasValue(V{current_date}) && !d2:hasValue(V{event_date})"),
        "true"
    );
}

#[rstest]
#[case("firstNonNull(#{blank}, #{v})", "x")]
#[case("firstNonNull(#{unknown}, #{blank})", "")]
#[case("firstNonNull(#{blank}, 'fallback')", "fallback")]
#[case("firstNonNull(#{v}, 'fallback')", "x")]
#[case("firstNonNull(#{blank}, 1 + 2)", "3")]
fn test_first_non_null(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(with_variable("x").text(source), expected);
}

// ============================================================================
// Membership
// ============================================================================

fn located(value: &str) -> Fixture {
    let target = event("target", "2020-05-04", &[("de", value)])
        .with_organisation_unit("location1", "CODE1");
    Fixture::new()
        .variables(vec![
            RuleVariable::current_event("v", "de", RuleValueType::Text).unwrap(),
        ])
        .target(target)
        .supplementary("OU_GROUP_ID", &["location1", "location2"])
        .supplementary(USER_ROLES_KEY, &["role1", "role2"])
}

#[rstest]
#[case("d2:inOrgUnitGroup(#{v})", "true")]
#[case("d2:inOrgUnitGroup('OU_GROUP_ID')", "true")]
#[case("d2:inOrgUnitGroup('OTHER_GROUP')", "false")]
#[case("d2:hasUserRole('role1')", "true")]
#[case("d2:hasUserRole('role3')", "false")]
#[case("V{org_unit}", "location1")]
#[case("V{org_unit_code}", "CODE1")]
fn test_membership(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(located("OU_GROUP_ID").text(source), expected);
}

#[test]
fn test_org_unit_group_without_org_unit() {
    let fixture = Fixture::new().supplementary("OU_GROUP_ID", &["location1"]);
    assert_eq!(fixture.text("d2:inOrgUnitGroup('OU_GROUP_ID')"), "false");
}

// ============================================================================
// Conditionals
// ============================================================================

#[rstest]
#[case("if(true, 'a', 'b')", "a")]
#[case("if(1 > 2, 1, 2)", "2")]
#[case("if('true', 'yes', 'no')", "yes")]
#[case("d2:concatenate(if(false, 'x', 'y'), 'z')", "yz")]
fn test_if(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(eval_text(source), expected);
}

// ============================================================================
// Constants
// ============================================================================

#[test]
fn test_constants() {
    let fixture = Fixture::new().constants(&[("pi", "3.14"), ("name", "Lars")]);
    assert_eq!(fixture.text("C{pi}"), "3.14");
    assert_eq!(fixture.text("C{pi} * 2"), "6.28");
    assert_eq!(fixture.text("C{name}"), "Lars");
}

#[test]
fn test_unknown_constant() {
    assert!(matches!(
        eval("C{missing}"),
        Err(EvalError::UndefinedReference { ref name, .. }) if name == "missing"
    ));
}
