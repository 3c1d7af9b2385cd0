use itemshelf_core::{ConfigError, Settings};
use std::io::Write;

#[test]
fn partial_file_fills_missing_sections_with_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
debug = false

[database]
path = ":memory:"
"#
    )
    .unwrap();

    let settings = Settings::from_file(file.path()).unwrap();
    assert_eq!(settings.database.path, ":memory:");
    assert_eq!(settings.listing, Settings::default().listing);
    assert_eq!(settings.logging.dir, None);
}

#[test]
fn missing_file_reports_io_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Settings::from_file(&path).unwrap_err();
    match err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_toml_reports_parse_error() {
    let err = Settings::from_toml_str("[database\npath = 1").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn invalid_listing_section_is_rejected() {
    let err = Settings::from_toml_str(
        r#"
[listing]
default_limit = 0
"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            key: "listing.default_limit",
            ..
        }
    ));
}
