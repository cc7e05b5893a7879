use portfolio_chat::{
    Result,
    config::{BackendConfig, Config, LogsConfig},
};
use tempfile::TempDir;
use tokio::fs;

/// Create a test configuration pointing at `base_url`
pub fn create_test_config(base_url: &str) -> Config {
    Config {
        backend: BackendConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        },
        logs: LogsConfig {
            level: "debug".to_string(),
        },
    }
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Base URL on which nothing is listening
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind a local port");
    let port = listener.local_addr().expect("Bound port has no address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
backend:
  base_url: "http://localhost:8000"
  timeout_secs: 10
logs:
  level: "debug"
"#;

/// Configuration that only sets the log level
pub const PARTIAL_CONFIG_YAML: &str = r#"
logs:
  level: "info"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
backend:
  base_url: "http://localhost:8000"
  timeout_secs: "soon"
"#;
