use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn empty_database_url_falls_back_to_default() {
    assert_eq!(normalize_database_url("  "), "sqlite://./data/goals.db");
}

#[test]
fn keeps_memory_and_foreign_urls_untouched() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("sqlite://./data/a.db?mode=rwc"),
        "sqlite://./data/a.db?mode=rwc"
    );
}

#[test]
fn keeps_windows_absolute_path_with_single_sqlite_colon() {
    assert_eq!(
        normalize_database_url("sqlite:C:\\Users\\alice\\test.db"),
        "sqlite:C:/Users/alice/test.db"
    );
}

#[test]
fn normalizes_windows_plain_path_with_single_sqlite_colon() {
    assert_eq!(
        normalize_database_url("C:\\Users\\alice\\test.db"),
        "sqlite:C:/Users/alice/test.db"
    );
}

#[test]
fn converts_sqlite_double_slash_windows_path() {
    assert_eq!(
        normalize_database_url("sqlite://C:/Users/alice/test.db"),
        "sqlite:C:/Users/alice/test.db"
    );
}

#[test]
fn creates_parent_dir_for_sqlite_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();

    let temp_root = env::temp_dir().join(format!("goal_tracker_server_test_{suffix}"));
    let db_path = temp_root.join("data").join("test.db");

    prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare db url");
    assert!(temp_root.join("data").exists());

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn prepared_database_url_creates_openable_sqlite_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();

    let temp_root = env::temp_dir().join(format!("goal_tracker_server_open_test_{suffix}"));
    let db_path = temp_root.join("nested").join("server.db");

    let prepared = prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare");
    let storage = storage::Storage::new(&prepared).await.expect("open sqlite");
    storage.pool().close().await;

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn file_overrides_apply_known_keys() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        r#"
        bind_addr = "0.0.0.0:8080"
        database_url = "sqlite://./var/goals.db"
        gemini_model = "gemini-1.5-pro"
        "#,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.database_url, "sqlite://./var/goals.db");
    assert_eq!(settings.gemini_model, "gemini-1.5-pro");
    assert!(settings.gemini_api_key.is_none());
}

#[test]
fn malformed_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file_overrides(&mut settings, "bind_addr = [1, 2]");
    assert_eq!(settings.server_bind, "127.0.0.1:5000");
}

#[test]
fn app_prefixed_env_wins_over_plain_names() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:1111"),
            ("APP__BIND_ADDR", "127.0.0.1:2222"),
            ("GEMINI_API_KEY", "plain-key"),
            ("APP__MAX_BODY_BYTES", "2048"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2222");
    assert_eq!(settings.gemini_api_key.as_deref(), Some("plain-key"));
    assert_eq!(settings.max_body_bytes, 2048);
}

#[test]
fn gemini_config_requires_non_blank_key() {
    let mut settings = Settings::default();
    assert!(settings.gemini_config().is_none());

    settings.gemini_api_key = Some("   ".to_string());
    assert!(settings.gemini_config().is_none());

    settings.gemini_api_key = Some(" secret ".to_string());
    let config = settings.gemini_config().expect("configured");
    assert_eq!(config.api_key, "secret");
    assert_eq!(config.model, "gemini-2.0-flash");
}
