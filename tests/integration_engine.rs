// tests/integration_engine.rs
//! End-to-end evaluation of graph and rule documents as they arrive on disk.

use depfence_core::types::{Graph, RuleSet, Severity};
use depfence_core::{evaluate, DepfenceError, RuleEngine};
use serde_json::json;

fn graph() -> Graph {
    serde_json::from_value(json!({
        "modules": [
            {
                "source": "src/index.js",
                "dependencies": [
                    { "module": "./app", "resolved": "src/app.js", "dependencyTypes": ["local"] },
                    { "module": "lodash", "resolved": "node_modules/lodash/lodash.js",
                      "dependencyTypes": ["npm"], "license": "MIT" },
                    { "module": "./nowhere", "couldNotResolve": true, "dependencyTypes": ["unknown"] }
                ]
            },
            {
                "source": "src/app.js",
                "dependencies": [
                    { "module": "./util", "resolved": "src/util.js", "dependencyTypes": ["local"] },
                    { "module": "jest", "resolved": "node_modules/jest/index.js",
                      "dependencyTypes": ["npm-dev"] }
                ]
            },
            {
                "source": "src/util.js",
                "dependencies": [
                    { "module": "./app", "resolved": "src/app.js", "dependencyTypes": ["local"] }
                ]
            },
            { "source": "src/unused.js", "orphan": true },
            { "source": "node_modules/lodash/lodash.js", "dependencies": [] },
            { "source": "node_modules/jest/index.js", "dependencies": [] }
        ],
        "folders": [{ "name": "src", "moduleCount": 4 }],
        "summary": { "optionsUsed": { "combinedDependencies": false } }
    }))
    .unwrap()
}

fn rules() -> RuleSet {
    serde_json::from_value(json!({
        "forbidden": [
            { "name": "no-circular", "severity": "warn", "from": {}, "to": { "circular": true } },
            { "name": "no-orphans", "severity": "info", "from": {}, "to": { "orphan": true } },
            { "name": "not-to-unresolvable", "from": {}, "to": { "couldNotResolve": true } },
            { "name": "not-to-dev-dep", "severity": "error",
              "from": { "path": "^src" }, "to": { "dependencyTypes": ["npm-dev"] } },
            { "name": "no-mit", "severity": "info", "from": {}, "to": { "licenseNot": "^MIT$" } }
        ]
    }))
    .unwrap()
}

#[test]
fn test_full_evaluation() {
    let (annotated, summary) = evaluate(&graph(), &rules()).unwrap();

    let found: Vec<(&str, &str, &str)> = summary
        .violations
        .iter()
        .map(|v| (v.from.as_str(), v.to.as_str(), v.rule.name.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("src/app.js", "node_modules/jest/index.js", "not-to-dev-dep"),
            ("src/app.js", "src/util.js", "no-circular"),
            ("src/index.js", "./nowhere", "not-to-unresolvable"),
            ("src/unused.js", "src/unused.js", "no-orphans"),
            ("src/util.js", "src/app.js", "no-circular"),
        ]
    );
    assert_eq!((summary.error, summary.warn, summary.info), (2, 2, 1));
    assert_eq!(summary.total_cruised, 6);
    assert_eq!(summary.total_dependencies_cruised, 6);
    assert!(summary.extra.contains_key("optionsUsed"));

    assert_eq!(annotated.folders, graph().folders);
    assert_eq!(annotated.summary, summary);
    let util = annotated.module("src/util.js").unwrap();
    assert_eq!(util.dependencies[0].cycle, vec!["src/app.js".to_string(), "src/util.js".into()]);
}

#[test]
fn test_output_document_shape() {
    let (annotated, _) = evaluate(&graph(), &rules()).unwrap();
    let document = serde_json::to_value(&annotated).unwrap();

    let violation = &document["summary"]["violations"][0];
    assert_eq!(violation["rule"]["name"], json!("not-to-dev-dep"));
    assert_eq!(violation["rule"]["severity"], json!("error"));
    assert!(violation.get("cycle").is_none());
    assert_eq!(document["summary"]["totalCruised"], json!(6));

    let circular = &document["summary"]["violations"][1];
    assert_eq!(circular["cycle"], json!(["src/util.js", "src/app.js"]));

    let index = &document["modules"][0];
    assert_eq!(index["valid"], json!(true));
    assert_eq!(index["dependencies"][2]["valid"], json!(false));
    assert_eq!(
        index["dependencies"][2]["rules"],
        json!([{ "name": "not-to-unresolvable", "severity": "error" }])
    );
}

#[test]
fn test_evaluation_is_idempotent() {
    let engine = RuleEngine::new(&rules()).unwrap();
    let (first, first_summary) = engine.evaluate(&graph()).unwrap();
    let (second, second_summary) = engine.evaluate(&graph()).unwrap();
    assert_eq!(first_summary, second_summary);
    assert_eq!(first, second);

    // Feeding the annotated graph back in changes nothing.
    let (again, again_summary) = engine.evaluate(&first).unwrap();
    assert_eq!(again_summary.violations, first_summary.violations);
    assert_eq!(again.modules, first.modules);
}

#[test]
fn test_parallel_matches_sequential() {
    let engine = RuleEngine::new(&rules()).unwrap();
    let parallel = engine.clone().with_parallel(true).evaluate(&graph()).unwrap();
    let sequential = engine.with_parallel(false).evaluate(&graph()).unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_severity_defaults() {
    let rules: RuleSet = serde_json::from_value(json!({
        "forbidden": [{ "from": {}, "to": { "couldNotResolve": true } }],
        "allowed": [{ "from": { "path": "^src" }, "to": { "path": "^src" } }]
    }))
    .unwrap();
    let (_, summary) = evaluate(&graph(), &rules).unwrap();

    let unnamed = summary
        .violations
        .iter()
        .find(|v| v.rule.name == "unnamed")
        .unwrap();
    assert_eq!(unnamed.rule.severity, Severity::Error);

    let outside: Vec<&str> = summary
        .violations
        .iter()
        .filter(|v| v.rule.name == "not-in-allowed")
        .map(|v| v.to.as_str())
        .collect();
    assert_eq!(
        outside,
        vec!["node_modules/jest/index.js", "./nowhere", "node_modules/lodash/lodash.js"]
    );
    assert!(summary
        .violations
        .iter()
        .filter(|v| v.rule.name == "not-in-allowed")
        .all(|v| v.rule.severity == Severity::Warn));
}

#[test]
fn test_configuration_errors_are_fatal() {
    let bad_regex: RuleSet = serde_json::from_value(json!({
        "forbidden": [{ "name": "broken", "from": { "path": "([" }, "to": {} }]
    }))
    .unwrap();
    assert!(matches!(
        evaluate(&graph(), &bad_regex),
        Err(DepfenceError::InvalidPattern { .. })
    ));

    let bad_depth: RuleSet = serde_json::from_value(json!({ "options": { "maxDepth": 100 } })).unwrap();
    assert!(matches!(
        evaluate(&graph(), &bad_depth),
        Err(DepfenceError::InvalidOptions(_))
    ));

    let mixed: RuleSet = serde_json::from_value(json!({
        "forbidden": [{ "name": "m", "to": { "orphan": true, "circular": true } }]
    }))
    .unwrap();
    assert!(matches!(
        evaluate(&graph(), &mixed),
        Err(DepfenceError::InvalidRule { .. })
    ));
}

#[test]
fn test_empty_inputs() {
    let (annotated, summary) = evaluate(&Graph::default(), &RuleSet::default()).unwrap();
    assert!(annotated.modules.is_empty());
    assert!(summary.is_clean());
    assert_eq!(summary.total_cruised, 0);
}
