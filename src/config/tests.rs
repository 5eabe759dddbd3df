//! Tests for configuration loading and key coercion

use std::io::Write as _;
use std::time::Duration;

use rstest::rstest;
use tempfile::{Builder, NamedTempFile};

use super::Settings;
use crate::error::PoolError;

fn temp_config(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .prefix("tidepool-config-")
        .suffix(suffix)
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file.flush().expect("flush temp config");
    file
}

#[cfg(feature = "ini")]
mod ini_backend {
    use super::*;
    use crate::config::IniSource;
    use crate::config::ConfigSource;

    #[test]
    fn settings_read_every_recognised_key() {
        let file = temp_config(
            ".ini",
            "ip = db.example\n\
             port = 3307\n\
             username = svc\n\
             password = secret\n\
             dbname = prod\n\
             initSize = 2\n\
             maxSize = 4\n\
             maxIdleTime = 30\n\
             connectionTimeOut = 250\n",
        );
        let settings = Settings::load(file.path()).expect("load ini settings");

        assert_eq!(settings.endpoint.host, "db.example");
        assert_eq!(settings.endpoint.port, 3307);
        assert_eq!(settings.endpoint.username, "svc");
        assert_eq!(settings.endpoint.password, "secret");
        assert_eq!(settings.endpoint.database, "prod");
        assert_eq!(settings.pool.init_size(), 2);
        assert_eq!(settings.pool.max_size(), 4);
        assert_eq!(settings.pool.max_idle_time(), Duration::from_secs(30));
        assert_eq!(settings.pool.acquire_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn missing_keys_take_their_defaults() {
        let file = temp_config(".ini", "unrelated = 1\n");
        let settings = Settings::load(file.path()).expect("load sparse ini");

        assert_eq!(settings.endpoint.host, "localhost");
        assert_eq!(settings.endpoint.port, 3306);
        assert_eq!(settings.endpoint.username, "root");
        assert_eq!(settings.endpoint.password, "");
        assert_eq!(settings.endpoint.database, "test");
        assert_eq!(settings.pool.init_size(), 5);
        assert_eq!(settings.pool.max_size(), 10);
        assert_eq!(settings.pool.max_idle_time(), Duration::from_secs(60));
        assert_eq!(settings.pool.acquire_timeout(), Duration::from_millis(100));
    }

    #[rstest]
    #[case("12", 12)]
    #[case(" 8 ", 8)]
    #[case("twelve", 42)]
    #[case("", 42)]
    fn int_values_coerce_or_fall_back(#[case] raw: &str, #[case] expected: i64) {
        let file = temp_config(".ini", &format!("answer = {raw}\n"));
        let source = IniSource::load(file.path()).expect("load ini");
        assert_eq!(source.get_int("answer", 42), expected);
    }

    #[rstest]
    #[case("yes", true)]
    #[case("on", true)]
    #[case("TRUE", true)]
    #[case("0", false)]
    #[case("garbage", false)]
    fn bool_values_coerce_or_fall_back(#[case] raw: &str, #[case] expected: bool) {
        let file = temp_config(".ini", &format!("flag = {raw}\n"));
        let source = IniSource::load(file.path()).expect("load ini");
        assert_eq!(source.get_bool("flag", false), expected);
    }

    #[test]
    fn invalid_sizing_is_rejected() {
        let file = temp_config(".ini", "initSize = 9\nmaxSize = 3\n");
        let err = Settings::load(file.path()).expect_err("sizing must be validated");
        assert!(matches!(err, PoolError::ConfigLoad(_)), "{err}");
    }

    #[test]
    fn nonpositive_timeout_is_rejected() {
        let file = temp_config(".ini", "maxIdleTime = 0\n");
        let err = Settings::load(file.path()).expect_err("timeout must be positive");
        assert!(matches!(err, PoolError::ConfigLoad(_)), "{err}");
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let file = temp_config(".ini", "port = 70000\n");
        let err = Settings::load(file.path()).expect_err("port must fit in u16");
        assert!(matches!(err, PoolError::ConfigLoad(_)), "{err}");
    }
}

#[cfg(feature = "yaml")]
mod yaml_backend {
    use super::*;
    use crate::config::ConfigSource;
    use crate::config::YamlSource;

    #[test]
    fn settings_read_every_recognised_key() {
        let file = temp_config(
            ".yaml",
            "ip: db.example\n\
             port: 3307\n\
             username: svc\n\
             password: secret\n\
             dbname: prod\n\
             initSize: 2\n\
             maxSize: 4\n\
             maxIdleTime: 30\n\
             connectionTimeOut: 250\n",
        );
        let settings = Settings::load(file.path()).expect("load yaml settings");

        assert_eq!(settings.endpoint.host, "db.example");
        assert_eq!(settings.endpoint.port, 3307);
        assert_eq!(settings.pool.init_size(), 2);
        assert_eq!(settings.pool.max_size(), 4);
        assert_eq!(settings.pool.acquire_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn yml_extension_selects_the_yaml_backend() {
        let file = temp_config(".yml", "initSize: 1\nmaxSize: 2\n");
        let settings = Settings::load(file.path()).expect("load yml settings");
        assert_eq!(settings.pool.init_size(), 1);
        assert_eq!(settings.pool.max_size(), 2);
    }

    #[test]
    fn unquoted_scalars_still_read_as_strings() {
        let file = temp_config(".yaml", "port: 3307\nenabled: true\n");
        let source = YamlSource::load(file.path()).expect("load yaml");
        assert_eq!(source.get_string("port", ""), "3307");
        assert_eq!(source.get_string("enabled", ""), "true");
    }

    #[test]
    fn type_mismatches_fall_back_to_defaults() {
        let file = temp_config(".yaml", "port: not-a-number\n");
        let source = YamlSource::load(file.path()).expect("load yaml");
        assert_eq!(source.get_int("port", 3306), 3306);
        assert_eq!(source.get_bool("port", true), true);
    }
}

#[test]
fn unknown_extension_is_fatal() {
    let file = temp_config(".toml", "ip = nope\n");
    let err = super::load(file.path()).expect_err("no backend for .toml");
    assert!(matches!(err, PoolError::ConfigLoad(_)), "{err}");
}

#[test]
fn missing_extension_is_fatal() {
    let file = temp_config("", "ip = nope\n");
    let err = super::load(file.path()).expect_err("no extension to dispatch on");
    assert!(matches!(err, PoolError::ConfigLoad(_)), "{err}");
}

#[test]
fn missing_file_is_fatal() {
    let err = super::load("/definitely/not/here/db_config.ini")
        .expect_err("missing file must not be papered over");
    assert!(matches!(err, PoolError::ConfigLoad(_)), "{err}");
}
