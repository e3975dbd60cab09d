//! Test plan for the `rally-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and validation behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use rally_config::{load, AppConfig, AuthConfig, EmailConfig, HttpConfig, SummarizerConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "OPENAI_API_KEY",
    "RALLY_CONFIG",
    "RALLY__AUTH__JWT_SECRET",
    "RALLY__AUTH__TOKEN_TTL_SECONDS",
    "RALLY__DATABASE__MAX_CONNECTIONS",
    "RALLY__DATABASE__URL",
    "RALLY__EMAIL__ENABLED",
    "RALLY__EMAIL__API_URL",
    "RALLY__HTTP__ADDRESS",
    "RALLY__HTTP__PORT",
    "RALLY__NOTIFICATIONS__DELIVERY_TIMEOUT_SECONDS",
    "RALLY__SUMMARIZER__API_KEY",
    "RALLY__SUMMARIZER__BASE_URL",
    "RALLY__SUMMARIZER__MODEL",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(
        config.database.max_connections,
        defaults.database.max_connections
    );
    assert_eq!(config.auth.issuer, defaults.auth.issuer);
    assert_eq!(config.summarizer.model, defaults.summarizer.model);
    assert_eq!(config.summarizer.max_tokens, defaults.summarizer.max_tokens);
    assert!(!config.email.enabled);
    assert_eq!(
        config.notifications.delivery_timeout_seconds,
        defaults.notifications.delivery_timeout_seconds
    );
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "rally.toml",
        r#"
        [http]
        port = 4242
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/rally.toml",
        r#"
        [http]
        port = 5151
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "rally.toml",
        r#"
        [http]
        port = 8181

        [summarizer]
        model = "local-summarizer"
        temperature = 0.2

        [email]
        enabled = true
        api_url = "http://mail.internal/send"
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.http.port, 8181);
    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.summarizer.model, "local-summarizer");
    assert!((config.summarizer.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.summarizer.base_url, defaults.summarizer.base_url);
    assert!(config.email.enabled);
    assert_eq!(config.email.api_url, "http://mail.internal/send");
    assert_eq!(config.email.sender, defaults.email.sender);
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "rally.toml",
        r#"
        [http]
        port = 3030
        "#,
    );

    ctx.set_var("RALLY__HTTP__PORT", "8080");
    ctx.set_var("RALLY__DATABASE__URL", "sqlite://override.db");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.database.url, "sqlite://override.db");
}

#[test]
#[serial]
fn load_reads_explicit_config_path() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();

    write_config_file(
        temp_dir.path(),
        "custom/settings.toml",
        r#"
        [auth]
        jwt_secret = "from-file"
        "#,
    );
    let path = temp_dir.path().join("custom/settings.toml");
    ctx.set_var("RALLY_CONFIG", path.display().to_string());

    let config = load().expect("configuration load should read RALLY_CONFIG");
    assert_eq!(config.auth.jwt_secret, "from-file");
    assert_eq!(config.auth.audience, AuthConfig::default().audience);
}

#[test]
#[serial]
fn summarizer_key_falls_back_to_openai_environment_variable() {
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_var("OPENAI_API_KEY", "sk-env");

    let mut summarizer = SummarizerConfig::default();
    assert_eq!(summarizer.resolved_api_key().as_deref(), Some("sk-env"));

    summarizer.api_key = Some("sk-config".to_string());
    assert_eq!(summarizer.resolved_api_key().as_deref(), Some("sk-config"));
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "rally.toml",
        r#"
        [http]
        port = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration") || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn email_config_is_disabled_by_default() {
    let defaults = EmailConfig::default();
    assert!(!defaults.enabled);
    assert!(defaults.api_key.is_none());
    assert_eq!(defaults.request_timeout_seconds, 10);
}

#[test]
fn http_config_defaults_match_expected_host_and_port() {
    let defaults = HttpConfig::default();
    assert_eq!(defaults.address, "127.0.0.1");
    assert_eq!(defaults.port, 7070);
}
