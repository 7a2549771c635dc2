use std::io::Write;

use stego_vault::common::config::{load_config, StegoConfig};
use stego_vault::StegoError;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_full_config() {
    let file = write_config(
        r#"
[crypto]
kdf_iterations = 250000

[policy]
max_plaintext_bytes = 128

[logging]
level = "debug"
"#,
    );
    let config = StegoConfig::from_file(file.path()).unwrap();
    assert_eq!(config.crypto.kdf_iterations, 250_000);
    assert_eq!(config.policy.max_plaintext_bytes, 128);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn empty_file_means_defaults() {
    let file = write_config("");
    assert_eq!(StegoConfig::from_file(file.path()).unwrap(), StegoConfig::default());
}

#[test]
fn shipped_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/stego.toml");
    assert_eq!(StegoConfig::from_file(path).unwrap(), StegoConfig::default());
}

#[test]
fn weak_iterations_rejected() {
    let file = write_config("[crypto]\nkdf_iterations = 1000\n");
    assert!(matches!(
        StegoConfig::from_file(file.path()),
        Err(StegoError::Config(_))
    ));
}

#[test]
fn malformed_toml_is_config_error() {
    let file = write_config("[crypto\nkdf_iterations = ");
    assert!(matches!(
        load_config::<StegoConfig>(file.path()),
        Err(StegoError::Config(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        StegoConfig::from_file(dir.path().join("absent.toml")),
        Err(StegoError::Io(_))
    ));
}
