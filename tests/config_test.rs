//! Integration tests for configuration loading

use sorter_poc::infra::{Config, OnError};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[site]
id = "test-site"

[batch]
on_error = "abort"
delimiter = ";"
reject_dir = "capture"

[form]
width = 10.0
height = 20.0
length = 30.0
mass = 5.0
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.site_id(), "test-site");
    assert_eq!(config.batch_on_error(), OnError::Abort);
    assert_eq!(config.batch_delimiter(), ';');
    assert_eq!(config.batch_reject_dir(), "capture");
    assert_eq!(config.form_width_cm(), 10.0);
    assert_eq!(config.form_height_cm(), 20.0);
    assert_eq!(config.form_length_cm(), 30.0);
    assert_eq!(config.form_mass_kg(), 5.0);
}

#[test]
fn test_partial_config_fills_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();

    temp_file
        .write_all(
            br#"
[site]
id = "depot-7"
"#,
        )
        .unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.site_id(), "depot-7");
    assert_eq!(config.batch_on_error(), OnError::Skip);
    assert_eq!(config.batch_delimiter(), ',');
    assert_eq!(config.form_width_cm(), 50.0);
    assert_eq!(config.form_mass_kg(), 10.0);
}

#[test]
fn test_missing_site_section_uses_default_id() {
    let mut temp_file = NamedTempFile::new().unwrap();

    temp_file
        .write_all(
            br#"
[batch]
on_error = "abort"
"#,
        )
        .unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.site_id(), "sorter");
    assert_eq!(config.batch_on_error(), OnError::Abort);
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.site_id(), "sorter");
    assert_eq!(config.batch_on_error(), OnError::Skip);
    assert_eq!(config.batch_delimiter(), ',');
}
