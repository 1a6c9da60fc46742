//! Command-line tests over context documents written to temporary files

#![cfg(feature = "cli")]

use pretty_assertions::assert_eq;
use rule_engine::cli::check::{check, CheckConfig};
use rule_engine::cli::evaluate::{evaluate, render, EvaluateConfig};
use rule_engine::cli::output::OutputFormat;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DOCUMENT: &str = r##"{
    "rules": [
        {
            "uid": "heavy",
            "priority": 1,
            "condition": "#{weight} > 10",
            "actions": [{ "type": "SHOW_WARNING", "content": "Heavy", "field": "w" }]
        },
        {
            "uid": "bmi",
            "priority": 2,
            "condition": "d2:hasValue(#{weight})",
            "actions": [{ "type": "ASSIGN", "field": "bmi", "data": "d2:round(#{weight} / 2)" }]
        }
    ],
    "variables": [
        { "type": "CURRENT_EVENT", "name": "weight", "dataElement": "w", "valueType": "NUMERIC" }
    ],
    "constants": {},
    "supplementaryData": {},
    "currentDate": "2020-06-01",
    "enrollment": {
        "enrollment": "enr",
        "incidentDate": "2020-01-01",
        "enrollmentDate": "2020-01-01"
    },
    "events": [
        {
            "event": "light",
            "programStage": "stage",
            "eventDate": "2020-02-01",
            "dataValues": [{ "dataElement": "w", "value": "5" }]
        },
        {
            "event": "heavy_event",
            "programStage": "stage",
            "eventDate": "2020-03-01",
            "dataValues": [{ "dataElement": "w", "value": "13" }]
        }
    ]
}"##;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn config(file: &Path, target: Option<&str>) -> EvaluateConfig {
    EvaluateConfig {
        file: file.to_path_buf(),
        target: target.map(str::to_string),
        format: OutputFormat::Json,
        output_file: None,
    }
}

#[test]
fn test_evaluate_all_records() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "context.json", DOCUMENT);

    let output: Value = serde_json::from_str(&render(&config(&file, None)).unwrap()).unwrap();
    let groups = output.as_array().unwrap();

    let uids: Vec<_> = groups
        .iter()
        .map(|g| g["trackerObjectUid"].as_str().unwrap())
        .collect();
    assert_eq!(uids, vec!["enr", "light", "heavy_event"]);

    assert_eq!(groups[0]["effects"].as_array().unwrap().len(), 0);
    assert_eq!(groups[1]["effects"][0]["data"], "3");
    assert_eq!(groups[2]["effects"][0]["ruleUid"], "heavy");
    assert_eq!(groups[2]["effects"][1]["data"], "7");
}

#[test]
fn test_evaluate_target_event_to_file() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "context.json", DOCUMENT);
    let output_file = dir.path().join("effects.json");

    let mut config = config(&file, Some("heavy_event"));
    config.output_file = Some(output_file.clone());
    evaluate(&config).unwrap();

    let output: Value = serde_json::from_str(&fs::read_to_string(output_file).unwrap()).unwrap();
    let actions: Vec<_> = output
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"]["type"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["SHOW_WARNING", "ASSIGN"]);
}

#[test]
fn test_evaluate_reports_problems() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "context.json", DOCUMENT);

    assert!(render(&config(&file, Some("missing"))).is_err());
    assert!(render(&config(&dir.path().join("absent.json"), None)).is_err());

    let incomplete = write(&dir, "incomplete.json", r#"{ "rules": [] }"#);
    let err = render(&config(&incomplete, None)).unwrap_err();
    assert!(format!("{err:#}").contains("RULE0103"));
}

#[test]
fn test_check() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.json", DOCUMENT);
    assert!(check(&CheckConfig { file: good }).is_ok());

    let broken = DOCUMENT.replace("#{weight} > 10", "#{weight} >");
    let bad = write(&dir, "bad.json", &broken);
    assert!(check(&CheckConfig { file: bad }).is_err());
}
