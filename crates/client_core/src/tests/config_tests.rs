use super::{apply_env_overrides, apply_file_settings, load_settings, ClientSettings};
use crate::{controller::ControllerTiming, error::ConfigError};

use std::{
    collections::HashMap,
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn defaults_match_the_fixed_schedule() {
    let settings = ClientSettings::default();
    assert_eq!(settings.api_url, None);
    assert_eq!(settings.timing(), ControllerTiming::default());
    assert_eq!(settings.timing().request_timeout, Duration::from_secs(200));
}

#[test]
fn file_values_override_defaults() {
    let mut settings = ClientSettings::default();
    apply_file_settings(
        &mut settings,
        r#"
api_url = "https://nps.example.com/update"
request_timeout_seconds = 90
joke_interval_ms = 1500
"#,
    )
    .expect("parse");

    assert_eq!(
        settings.api_url.as_deref(),
        Some("https://nps.example.com/update")
    );
    assert_eq!(settings.request_timeout_seconds, 90);
    assert_eq!(settings.joke_interval_ms, 1500);
    assert_eq!(settings.notice_interval_seconds, 30);
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = ClientSettings::default();
    assert!(apply_file_settings(&mut settings, "request_timeout_seconds = \"soon\"").is_err());
}

#[test]
fn env_overrides_file_and_prefers_specific_name() {
    let mut settings = ClientSettings {
        api_url: Some("http://from-file".to_string()),
        ..ClientSettings::default()
    };
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("VITE_API_URL", "http://legacy"),
            ("NPS_UPDATER_API_URL", "https://nps.example.com/run"),
            ("APP__REQUEST_TIMEOUT_SECONDS", "45"),
            ("APP__JOKE_INTERVAL_MS", "not-a-number"),
        ]),
    );

    assert_eq!(
        settings.api_url.as_deref(),
        Some("https://nps.example.com/run")
    );
    assert_eq!(settings.request_timeout_seconds, 45);
    assert_eq!(settings.joke_interval_ms, 3000);
}

#[test]
fn blank_env_values_are_ignored() {
    let mut settings = ClientSettings {
        api_url: Some("http://from-file".to_string()),
        ..ClientSettings::default()
    };
    apply_env_overrides(&mut settings, lookup_from(&[("NPS_UPDATER_API_URL", "   ")]));
    assert_eq!(settings.api_url.as_deref(), Some("http://from-file"));
}

#[test]
fn endpoint_validation() {
    let mut settings = ClientSettings::default();
    assert!(matches!(settings.endpoint(), Err(ConfigError::MissingApiUrl)));

    settings.api_url = Some("not a url".to_string());
    assert!(matches!(
        settings.endpoint(),
        Err(ConfigError::InvalidApiUrl { .. })
    ));

    settings.api_url = Some("ftp://nps.example.com/update".to_string());
    assert!(matches!(
        settings.endpoint(),
        Err(ConfigError::UnsupportedScheme { .. })
    ));

    settings.api_url = Some(" https://nps.example.com/update ".to_string());
    let url = settings.endpoint().expect("valid url");
    assert_eq!(url.as_str(), "https://nps.example.com/update");
}

#[test]
fn timing_clamps_zero_and_overlong_notice() {
    let settings = ClientSettings {
        request_timeout_seconds: 0,
        joke_interval_ms: 0,
        notice_interval_seconds: 10,
        notice_duration_seconds: 10,
        ..ClientSettings::default()
    };
    let timing = settings.timing();
    assert_eq!(timing.request_timeout, Duration::from_secs(200));
    assert_eq!(timing.joke_interval, Duration::from_secs(3));
    assert_eq!(timing.notice_interval, Duration::from_secs(10));
    assert_eq!(timing.notice_duration, Duration::from_secs(5));
}

#[test]
fn explicit_settings_file_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("nps_updater_missing_{suffix}.toml"));
    assert!(load_settings(Some(missing.as_path())).is_err());
}

#[test]
fn explicit_settings_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("nps_updater_settings_{suffix}.toml"));
    fs::write(&path, "notice_interval_seconds = 45\n").expect("write settings");

    let settings = load_settings(Some(path.as_path())).expect("load");
    assert_eq!(settings.notice_interval_seconds, 45);

    fs::remove_file(path).expect("cleanup");
}
