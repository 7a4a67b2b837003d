use std::io::Write;

use boozedb::{BoozeDbConfig, CatalogError, config::CONFIG_ENV_VAR};
use serial_test::serial;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn redis_url_expands_environment_placeholder() {
    unsafe { std::env::set_var("BOOZEDB_TEST_REDIS", "redis://cache.internal:6380/2") };

    let config = BoozeDbConfig::from_toml("[redis]\nurl = \"${BOOZEDB_TEST_REDIS}\"\n").unwrap();
    assert_eq!(config.redis_url().unwrap(), "redis://cache.internal:6380/2");

    unsafe { std::env::remove_var("BOOZEDB_TEST_REDIS") };
}

#[test]
#[serial]
fn missing_placeholder_variable_is_a_config_error() {
    unsafe { std::env::remove_var("BOOZEDB_TEST_UNSET") };

    let config = BoozeDbConfig::from_toml("[redis]\nurl = \"${BOOZEDB_TEST_UNSET}\"\n").unwrap();
    let err = config.redis_url().unwrap_err();
    assert!(matches!(err, CatalogError::Config { .. }), "{err:?}");
    assert!(err.to_string().contains("BOOZEDB_TEST_UNSET"));
}

#[test]
#[serial]
fn load_reads_file_named_by_environment() {
    let file = write_config(
        r#"
[pagination]
page_size = 10

[redis]
url = "redis://127.0.0.1:6379"
prefix = "staging"

[links]
base_url = "https://api.example.com/v1"
"#,
    );
    unsafe { std::env::set_var(CONFIG_ENV_VAR, file.path()) };

    let config = BoozeDbConfig::load(None).unwrap();
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    assert_eq!(config.pagination.page, 1);
    assert_eq!(config.pagination.page_size, 10);
    assert_eq!(config.redis.prefix, "staging");
    assert_eq!(config.redis_url().unwrap(), "redis://127.0.0.1:6379");
    assert_eq!(config.links.base_url, "https://api.example.com/v1");
}

#[test]
#[serial]
fn explicit_path_wins_over_environment() {
    let from_env = write_config("[redis]\nprefix = \"from-env\"\n");
    let explicit = write_config("[redis]\nprefix = \"explicit\"\n");
    unsafe { std::env::set_var(CONFIG_ENV_VAR, from_env.path()) };

    let config = BoozeDbConfig::load(Some(explicit.path())).unwrap();
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    assert_eq!(config.redis.prefix, "explicit");
}

#[test]
#[serial]
fn load_without_file_uses_defaults() {
    unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

    assert_eq!(BoozeDbConfig::load(None).unwrap(), BoozeDbConfig::default());
}

#[test]
#[serial]
fn unreadable_or_invalid_files_are_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = BoozeDbConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
    assert!(matches!(missing, CatalogError::Config { .. }), "{missing:?}");

    let invalid = write_config("[pagination]\npage_size = \"lots\"\n");
    let err = BoozeDbConfig::load(Some(invalid.path())).unwrap_err();
    assert!(matches!(err, CatalogError::Config { .. }), "{err:?}");
}
