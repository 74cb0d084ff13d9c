use crate::tests::{EnvGuard, setup_config_dir};
use crate::{Config, ConfigError, ConnectionMode};

use googletest::assert_that;
use googletest::prelude::{anything, eq, ok};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let _temp = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.connection.host.as_str(), eq("localhost"));
    assert_that!(config.connection.port, eq(8000));
    assert_that!(config.connection.user.as_str(), eq("Admin"));
    assert_that!(config.connection.password.as_str(), eq("Admin"));
    assert_that!(config.connection.mode, eq(ConnectionMode::Http));
    assert_that!(config.startup.wait_time_secs, eq(600));
    assert_that!(config.logging.level.as_str(), eq("info"));
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_ok_and_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [connection]
            host = "cms.example.org"
            port = 9000
            mode = "https"

            [startup]
            wait_time_secs = 120
        "#,
    )
    .unwrap();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.connection.host.as_str(), eq("cms.example.org"));
    assert_that!(config.connection.port, eq(9000));
    assert_that!(config.connection.mode, eq(ConnectionMode::Https));
    assert_that!(config.startup.wait_time_secs, eq(120));
    // Untouched sections keep their defaults
    assert_that!(config.connection.user.as_str(), eq("Admin"));
    assert_that!(config.logging.level.as_str(), eq("info"));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(temp.path().join("config.toml"), "[connection]\nport = 9000").unwrap();
    let _port_guard = EnvGuard::set("CMS_CONNECTION_PORT", "8888");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.connection.port, eq(8888));
}

#[test]
#[serial]
fn given_multiple_env_overrides_when_load_then_all_apply() {
    // Given
    let _temp = setup_config_dir();
    let _host = EnvGuard::set("CMS_CONNECTION_HOST", "cms.internal");
    let _user = EnvGuard::set("CMS_CONNECTION_USER", "SystemAdmin");
    let _mode = EnvGuard::set("CMS_CONNECTION_MODE", "https");
    let _wait = EnvGuard::set("CMS_STARTUP_WAIT_TIME_SECS", "90");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.connection.host.as_str(), eq("cms.internal"));
    assert_that!(config.connection.user.as_str(), eq("SystemAdmin"));
    assert_that!(config.connection.mode, eq(ConnectionMode::Https));
    assert_that!(config.startup.wait_time_secs, eq(90));
}

// =========================================================================
// Error Path Tests
// =========================================================================

#[test]
#[serial]
fn given_malformed_toml_when_load_then_toml_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(temp.path().join("config.toml"), "[connection\nport = ???").unwrap();

    // When
    let result = Config::load();

    // Then
    assert!(matches!(result, Err(ConfigError::Toml { .. })));
}

#[test]
#[serial]
fn given_zero_wait_time_when_validate_then_config_error() {
    // Given
    let _temp = setup_config_dir();
    let _wait = EnvGuard::set("CMS_STARTUP_WAIT_TIME_SECS", "0");
    let config = Config::load().unwrap();

    // When
    let result = config.validate();

    // Then
    assert!(matches!(result, Err(ConfigError::Generic { .. })));
}

#[test]
#[serial]
fn given_unparseable_env_override_when_load_then_value_is_ignored() {
    // Given
    let _temp = setup_config_dir();
    let _port = EnvGuard::set("CMS_CONNECTION_PORT", "not-a-port");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.connection.port, eq(8000));
}
