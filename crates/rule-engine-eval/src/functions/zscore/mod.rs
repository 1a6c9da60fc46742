//! Anthropometric z-scores and classification codes
//!
//! A measurement is placed between the standard-deviation boundaries of the
//! reference row for the child's age (or height) and sex. Keys on a table step
//! select their row directly; keys between steps interpolate the two
//! neighbouring rows.

mod tables;

use super::define;
use super::helpers::{number_arg, text_arg};
use crate::context::EvaluationContext;
use crate::error::{EvalError, EvalResult};
use crate::registry::{Argument, FunctionDefinition, FunctionParameter, FunctionRegistry, ParamKind};
use rule_engine_types::Value;
use std::sync::Arc;
use tables::Row;

/// Which reference table a z-score is computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthIndicator {
    /// Weight (kg) by age (months)
    WeightForAge,
    /// Height (cm) by age (months)
    HeightForAge,
    /// Weight (kg) by height (cm)
    WeightForHeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// `male`, `m`, `boy` and `0` (any case) are male; everything else female
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if ["male", "m", "boy", "0"]
            .iter()
            .any(|alias| text.eq_ignore_ascii_case(alias))
        {
            Self::Male
        } else {
            Self::Female
        }
    }
}

struct GrowthTable {
    first_key: f64,
    step: f64,
    rows: &'static [Row],
}

impl GrowthTable {
    /// Reference row for `key`
    fn row(&self, key: f64) -> Option<Row> {
        let position = (key - self.first_key) / self.step;
        let last = (self.rows.len() - 1) as f64;
        if !(-STEP_TOLERANCE..=last + STEP_TOLERANCE).contains(&position) {
            return None;
        }

        let nearest = position.round();
        if (position - nearest).abs() <= STEP_TOLERANCE {
            return self.rows.get(nearest as usize).copied();
        }

        let lower = position.floor();
        let fraction = position - lower;
        let below = self.rows.get(lower as usize)?;
        let above = self.rows.get(lower as usize + 1)?;
        Some(std::array::from_fn(|i| {
            below[i] + (above[i] - below[i]) * fraction
        }))
    }
}

// Keys like 81.5 cm must land on their row despite float error in the division.
const STEP_TOLERANCE: f64 = 1e-9;

impl GrowthIndicator {
    pub fn function_name(self) -> &'static str {
        match self {
            Self::WeightForAge => "d2:zScoreWFA",
            Self::HeightForAge => "d2:zScoreHFA",
            Self::WeightForHeight => "d2:zScoreWFH",
        }
    }

    fn table(self, sex: Sex) -> GrowthTable {
        let rows: &'static [Row] = match (self, sex) {
            (Self::WeightForAge, Sex::Male) => &tables::WEIGHT_FOR_AGE_BOYS,
            (Self::WeightForAge, Sex::Female) => &tables::WEIGHT_FOR_AGE_GIRLS,
            (Self::HeightForAge, Sex::Male) => &tables::HEIGHT_FOR_AGE_BOYS,
            (Self::HeightForAge, Sex::Female) => &tables::HEIGHT_FOR_AGE_GIRLS,
            (Self::WeightForHeight, Sex::Male) => &tables::WEIGHT_FOR_HEIGHT_BOYS,
            (Self::WeightForHeight, Sex::Female) => &tables::WEIGHT_FOR_HEIGHT_GIRLS,
        };
        let (first_key, step) = match self {
            Self::WeightForAge | Self::HeightForAge => {
                (tables::AGE_FIRST_MONTH, tables::AGE_STEP_MONTHS)
            }
            Self::WeightForHeight => (tables::HEIGHT_FIRST_CM, tables::HEIGHT_STEP_CM),
        };
        GrowthTable { first_key, step, rows }
    }
}

/// Whole z-score in `-3..=3` of `measurement` against the row for `key`
pub fn z_score(indicator: GrowthIndicator, sex: Sex, key: f64, measurement: f64) -> EvalResult<f64> {
    let row = indicator.table(sex).row(key).ok_or_else(|| {
        EvalError::invalid_argument(
            indicator.function_name(),
            format!("{key} is outside the reference table"),
        )
    })?;
    Ok(score(&row, measurement))
}

fn score(row: &Row, measurement: f64) -> f64 {
    if measurement <= row[0] {
        return -3.0;
    }
    if measurement >= row[6] {
        return 3.0;
    }

    let (index, low, high) = row
        .windows(2)
        .enumerate()
        .find(|(_, pair)| measurement >= pair[0] && measurement < pair[1])
        .map_or((0, row[0], row[1]), |(i, pair)| (i, pair[0], pair[1]));

    let exact = (index as f64 - 3.0) + (measurement - low) / (high - low);
    let two_places = (exact * 100.0).round() / 100.0;
    two_places.round().clamp(-3.0, 3.0)
}

pub fn register(registry: &mut FunctionRegistry) {
    let number = |name: &str| FunctionParameter::required(name, ParamKind::Number);
    let gender = || FunctionParameter::required("gender", ParamKind::Text);

    registry.register(define(
        "d2:zScoreWFA",
        vec![number("age_months"), number("weight_kg"), gender()],
        z_score_wfa,
    ));
    registry.register(define(
        "d2:zScoreHFA",
        vec![number("age_months"), number("height_cm"), gender()],
        z_score_hfa,
    ));
    registry.register(define(
        "d2:zScoreWFH",
        vec![number("height_cm"), number("weight_kg"), gender()],
        z_score_wfh,
    ));
    registry.register(
        FunctionDefinition::new("d2:zpvc", vec![FunctionParameter::required("value", ParamKind::Any)])
            .variadic(ParamKind::Any)
            .with_implementation(Arc::new(zpvc)),
    );
    registry.register(define("d2:zing", vec![number("value")], zing));
    registry.register(define("d2:oizp", vec![number("value")], oizp));
}

fn z_score_of(indicator: GrowthIndicator, args: &[Argument]) -> EvalResult<Value> {
    let sex = Sex::parse(text_arg(args, 2));
    z_score(indicator, sex, number_arg(args, 0), number_arg(args, 1)).map(Value::Number)
}

fn z_score_wfa(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    z_score_of(GrowthIndicator::WeightForAge, args)
}

fn z_score_hfa(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    z_score_of(GrowthIndicator::HeightForAge, args)
}

fn z_score_wfh(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    z_score_of(GrowthIndicator::WeightForHeight, args)
}

/// Number of numeric arguments that are zero or positive
fn zpvc(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let count = args
        .iter()
        .filter_map(Argument::value)
        .filter_map(|value| value.to_number().ok())
        .filter(|n| *n >= 0.0)
        .count();
    Ok(Value::Number(count as f64))
}

fn zing(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let value = number_arg(args, 0);
    Ok(Value::Number(if value < 0.0 { 0.0 } else { value }))
}

fn oizp(args: &[Argument], _ctx: &EvaluationContext<'_>) -> EvalResult<Value> {
    let value = number_arg(args, 0);
    Ok(Value::Number(if value >= 0.0 { 1.0 } else { 0.0 }))
}
