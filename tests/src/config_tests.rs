//! Desk configuration from the environment
//!
//! These mutate process environment variables, so every test is serialized.

use fxdesk_core::fixed;
use fxdesk_core::prelude::*;
use fxdesk_exchanges::prelude::*;
use fxdesk_rates::prelude::*;
use serial_test::serial;
use std::env;

const VARS: [&str; 9] = [
    "RAPIRA_URL",
    "BITKUB_SERVER_TIME_URL",
    "BITKUB_TICKER_URL",
    "BITKUB_API_KEY",
    "BITKUB_API_SECRET",
    "USDT_MARGIN",
    "RUB_MARGIN",
    "FXDESK_TIMEOUT_MS",
    "FXDESK_PRIMARY_OFFSET",
];

fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    for name in VARS {
        env::remove_var(name);
    }
    for (name, value) in vars {
        env::set_var(name, value);
    }
    let result = f();
    for name in VARS {
        env::remove_var(name);
    }
    result
}

#[test]
#[serial]
fn test_defaults_when_unset() {
    let config = with_env(&[], DeskConfig::from_env).unwrap();

    assert_eq!(config, DeskConfig::default());
    assert_eq!(config.rapira.rates_url, "https://api.rapira.net/open/market/rates");
    assert_eq!(config.bitkub.server_time_url, "https://api.bitkub.com/api/servertime");
    assert_eq!(config.bitkub.ticker_url, "https://api.bitkub.com/api/market/ticker?sym=THB_USDT");
    assert_eq!(config.margins, MarginPolicy::default());
    assert!(config.bitkub.credentials.is_none());
}

#[test]
#[serial]
fn test_overrides() {
    let config = with_env(
        &[
            ("RAPIRA_URL", "https://rates.example.test/open/market/rates"),
            ("BITKUB_API_KEY", "key"),
            ("BITKUB_API_SECRET", "secret"),
            ("USDT_MARGIN", "3"),
            ("RUB_MARGIN", " 4.25 "),
            ("FXDESK_TIMEOUT_MS", "2500"),
            ("FXDESK_PRIMARY_OFFSET", "0.1"),
        ],
        DeskConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.rapira.rates_url, "https://rates.example.test/open/market/rates");
    assert_eq!(config.bitkub.credentials, Some(BitkubCredentials::new("key", "secret")));
    assert_eq!(config.margins.usdt_margin, fixed!(3));
    assert_eq!(config.margins.rub_margin, fixed!(4.25));
    assert_eq!(config.bitkub.timeout_ms, 2_500);
    assert_eq!(config.rapira.timeout_ms, 2_500);
    assert_eq!(config.primary_offset, fixed!(0.1));
}

#[test]
#[serial]
fn test_empty_credentials_mean_none() {
    let config = with_env(&[("BITKUB_API_KEY", ""), ("BITKUB_API_SECRET", "secret")], DeskConfig::from_env).unwrap();
    assert!(config.bitkub.credentials.is_none());
}

#[test]
#[serial]
fn test_malformed_values_are_configuration_errors() {
    for (name, value) in [
        ("USDT_MARGIN", "two"),
        ("RUB_MARGIN", "3,5"),
        ("FXDESK_TIMEOUT_MS", "-1"),
        ("FXDESK_PRIMARY_OFFSET", "abc"),
    ] {
        let err = with_env(&[(name, value)], DeskConfig::from_env).unwrap_err();
        assert!(
            matches!(err, RateError::Source(ExchangeError::ConfigurationError(_))),
            "{name}={value}: {err}"
        );
    }
}

#[test]
#[serial]
fn test_unusable_margin_rejected() {
    let err = with_env(&[("USDT_MARGIN", "100")], DeskConfig::from_env).unwrap_err();
    assert!(matches!(err, RateError::InvalidMargin(_)));
}

#[test]
#[serial]
fn test_bad_url_rejected() {
    let err = with_env(&[("BITKUB_TICKER_URL", "not a url")], DeskConfig::from_env).unwrap_err();
    assert!(matches!(err, RateError::Source(ExchangeError::InvalidUrl(_))));
}

#[test]
#[serial]
fn test_debug_never_shows_secret() {
    let config = with_env(
        &[("BITKUB_API_KEY", "abcd1234567890wxyz"), ("BITKUB_API_SECRET", "very-secret-value")],
        DeskConfig::from_env,
    )
    .unwrap();
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("very-secret-value"));
    assert!(rendered.contains("abcd...wxyz"));
}
