use super::settings::{DeliveryMode, Settings};
use super::{load_config_from, ENV_PREFIX};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("chatcore.toml");
    fs::write(&path, body).expect("write config file");
    dir.path()
        .join("chatcore")
        .to_str()
        .expect("utf-8 temp path")
        .to_string()
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.broker.input_capacity, 100);
    assert_eq!(settings.broker.delivery, DeliveryMode::Drop);
    assert_eq!(settings.broker.block_timeout_ms, 50);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn missing_file_yields_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = tmp.path().join("absent");

    let cfg = load_config_from(path.to_str().unwrap()).expect("load_config failed");
    assert_eq!(cfg, Settings::default());
}

#[test]
#[serial]
fn file_overrides_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = write_config(
        &tmp,
        r#"
            [broker]
            input_capacity = 8
            delivery = "block"
            block_timeout_ms = 5

            [logging]
            level = "debug"
        "#,
    );

    let cfg = load_config_from(&path).expect("load_config failed");
    assert_eq!(cfg.broker.input_capacity, 8);
    assert_eq!(cfg.broker.delivery, DeliveryMode::Block);
    assert_eq!(cfg.broker.block_timeout_ms, 5);
    assert_eq!(cfg.logging.level, "debug");
}

#[test]
#[serial]
fn partial_file_keeps_remaining_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = write_config(
        &tmp,
        r#"
            [broker]
            input_capacity = 16
        "#,
    );

    let cfg = load_config_from(&path).expect("load_config failed");
    assert_eq!(cfg.broker.input_capacity, 16);
    assert_eq!(cfg.broker.delivery, DeliveryMode::Drop);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = write_config(
        &tmp,
        r#"
            [broker]
            input_capacity = 8
        "#,
    );

    let capacity_var = format!("{ENV_PREFIX}__BROKER__INPUT_CAPACITY");
    let delivery_var = format!("{ENV_PREFIX}__BROKER__DELIVERY");
    temp_env::with_vars(
        [
            (capacity_var.as_str(), Some("256")),
            (delivery_var.as_str(), Some("block")),
        ],
        || {
            let cfg = load_config_from(&path).expect("load_config failed");
            assert_eq!(cfg.broker.input_capacity, 256);
            assert_eq!(cfg.broker.delivery, DeliveryMode::Block);
        },
    );
}

#[test]
#[serial]
fn zero_input_capacity_is_rejected() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = write_config(
        &tmp,
        r#"
            [broker]
            input_capacity = 0
        "#,
    );

    let err = load_config_from(&path).unwrap_err();
    assert!(err.to_string().contains("input_capacity"));
}

#[test]
#[serial]
fn unknown_delivery_mode_is_rejected() {
    let tmp = TempDir::new().expect("create tempdir");
    let path = write_config(
        &tmp,
        r#"
            [broker]
            delivery = "retry"
        "#,
    );

    assert!(load_config_from(&path).is_err());
}
