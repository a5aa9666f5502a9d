use tracing::Level;
use vault_core::log::{LogConfig, LogLevel};

#[test]
fn verbose_console_enables_debug_without_env_directive() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config = LogConfig {
        directive: None,
        file_level: LogLevel::WARN,
        ..LogConfig::default()
    }
    .with_directory(temp.path())
    .with_prefix("verbose")
    .with_console_level(LogLevel::DEBUG);

    vault_core::log::init(config).expect("init logging");

    assert!(tracing::enabled!(Level::DEBUG));
    assert!(!tracing::enabled!(Level::TRACE));
}
