//! Integration tests for the config normalization engine.

use std::fs;

use diagrun::error::ParseError;
use diagrun::normalize::{parse, parse_file, ConfigFormat};
use tempfile::TempDir;

#[test]
fn yaml_and_json_normalize_to_the_same_tree() {
    let yaml = parse(
        ConfigFormat::Yaml,
        "common:\n  app_name: shop\n  labels:\n    - blue\n    - green\n  port: 8080\n".as_bytes(),
    )
    .unwrap();
    let json = parse(
        ConfigFormat::Json,
        r#"{"common": {"port": 8080, "labels": ["blue", "green"], "app_name": "shop"}}"#.as_bytes(),
    )
    .unwrap();

    assert_eq!(yaml, json);
    assert_eq!(
        yaml.to_string(),
        "/common/app_name: shop\n/common/labels/0: blue\n/common/labels/1: green\n/common/port: 8080\n"
    );
}

#[test]
fn yaml_json_and_ini_agree_on_a_flat_key() {
    let inputs = [
        (ConfigFormat::Yaml, "x: 1\n"),
        (ConfigFormat::Json, r#"{"x": 1}"#),
        (ConfigFormat::Ini, "x = 1\n"),
    ];
    for (format, text) in inputs {
        let tree = parse(format, text.as_bytes()).unwrap();
        let matches = tree.find_key("x");
        assert_eq!(matches.len(), 1, "{format}");
        assert!(matches[0].is_leaf(), "{format}");
        assert_eq!(matches[0].value(), "1", "{format}");
        assert_eq!(matches[0].path_and_key(), "/x", "{format}");
    }
}

#[test]
fn yaml_merge_keys_match_the_expanded_json() {
    let yaml = parse(
        ConfigFormat::Yaml,
        "common: &default_settings\n  license_key: abc\nproduction:\n  <<: *default_settings\n  app_name: p\n"
            .as_bytes(),
    )
    .unwrap();
    let json = parse(
        ConfigFormat::Json,
        r#"{"common": {"license_key": "abc"}, "production": {"license_key": "abc", "app_name": "p"}}"#
            .as_bytes(),
    )
    .unwrap();
    assert_eq!(yaml, json);
    assert_eq!(
        yaml.find_key_by_path("/production/license_key").unwrap().value(),
        "abc"
    );
}

#[test]
fn find_key_searches_every_depth() {
    let tree = parse(
        ConfigFormat::Yaml,
        "production:\n  license_key: a\nstaging:\n  license_key: b\n".as_bytes(),
    )
    .unwrap();

    let paths: Vec<String> = tree
        .find_key("license_key")
        .iter()
        .map(|node| node.path_and_key())
        .collect();
    assert_eq!(paths, vec!["/production/license_key", "/staging/license_key"]);
    assert!(tree.find_key("app_name").is_empty());
}

#[test]
fn xml_repeated_elements_are_indexed() {
    let tree = parse(
        ConfigFormat::Xml,
        "<configuration><labels><label>a</label><label>b</label></labels></configuration>".as_bytes(),
    )
    .unwrap();
    assert_eq!(
        tree.to_string(),
        "/configuration/labels/label/0: a\n/configuration/labels/label/1: b\n"
    );
}

#[test]
fn js_arrays_are_indexed() {
    let tree = parse(
        ConfigFormat::Js,
        "exports.config = {\n  app_name: ['one', 'two'],\n  license_key: 'abc',\n}\n".as_bytes(),
    )
    .unwrap();
    assert_eq!(tree.find_key("license_key")[0].value(), "abc");
    let app_name = tree.find_key("app_name");
    assert_eq!(app_name.len(), 1);
    assert_eq!(app_name[0].children.len(), 2);
    assert_eq!(app_name[0].children[1].value(), "two");
}

#[test]
fn ini_comments_are_skipped() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("newrelic.ini");
    fs::write(
        &file,
        "[newrelic]\n; newrelic.license = old\nnewrelic.license = \"current\"\n",
    )
    .unwrap();

    let tree = parse_file(&file).unwrap();
    assert_eq!(tree.to_string(), "/newrelic.license: current\n");
}

#[test]
fn format_comes_from_extension() {
    assert_eq!(ConfigFormat::from_extension(".YML").unwrap(), ConfigFormat::Yaml);
    assert_eq!(ConfigFormat::from_extension("config").unwrap(), ConfigFormat::Xml);

    let temp = TempDir::new().unwrap();
    let file = temp.path().join("newrelic.toml");
    fs::write(&file, "a = 1").unwrap();
    assert!(matches!(
        parse_file(&file),
        Err(ParseError::UnsupportedFormat { .. })
    ));
}

#[test]
fn malformed_yaml_reports_an_error() {
    let result = parse(ConfigFormat::Yaml, "common:\n  app_name: a\n bad: [\n".as_bytes());
    assert!(result.is_err());
}
