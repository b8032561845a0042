//! Integration tests for layered Settings loading.
//!
//! These tests pass an explicit local config file; no global config is
//! expected on the test machine.

use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use tempfile::TempDir;

use bookmind::application::ApplicationError;
use bookmind::config::Settings;
use bookmind::domain::{DomainDominance, ExportOptions};

fn write_config(temp: &TempDir, content: &str) -> PathBuf {
    let path = temp.path().join("bookmind.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_local_config_when_load_then_overrides_defaults_per_field() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        r#"
[hierarchy]
vertical = 6
dominance = "relative"

[export]
include_folders = false
output_dir = "/tmp/maps"
"#,
    );

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert: specified fields win, the rest keep defaults
    assert_eq!(settings.hierarchy.vertical, 6);
    assert_eq!(settings.hierarchy.horizontal, 8);
    assert_eq!(settings.hierarchy.dominance, DomainDominance::Relative);
    assert_eq!(
        settings.export_options(),
        ExportOptions {
            include_bookmarks: true,
            include_folders: false
        }
    );
    assert_eq!(settings.export.output_dir, PathBuf::from("/tmp/maps"));
    assert_eq!(settings.params().unwrap().vertical_complexity(), 6);
}

#[test]
fn given_missing_local_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("absent.toml");

    let err = Settings::load(Some(&missing)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[rstest]
#[case("[hierarchy]\nvertical = 1\n")]
#[case("[hierarchy]\nhorizontal = 40\n")]
#[case("[hierarchy]\ndominance = \"sometimes\"\n")]
#[case("this is not toml")]
fn given_invalid_local_config_when_load_then_config_error(#[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, content);

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "got {err:?}");
}

#[test]
fn given_rules_file_with_tilde_when_load_then_expanded() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "rules_file = \"~/bookmind-rules.toml\"\n");

    let settings = Settings::load(Some(&path)).unwrap();

    let rules = settings.rules_file.expect("rules_file set");
    assert!(!rules.to_string_lossy().starts_with('~'));
    assert!(rules.ends_with("bookmind-rules.toml"));
}

#[test]
fn given_loaded_settings_when_to_toml_then_parses_back_equal() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "[hierarchy]\nhorizontal = 12\n");
    let settings = Settings::load(Some(&path)).unwrap();

    let rendered = settings.to_toml().unwrap();
    let reparsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(reparsed, settings);
}

#[test]
fn given_template_when_parsed_then_valid_toml_with_defaults() {
    let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
    assert_eq!(parsed, Settings::default());
}
