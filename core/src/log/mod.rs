//! Logging bootstrap for the vault.
//!
//! Installs a `tracing` subscriber with two sinks: a rolling file under the data directory
//! and stderr for interactive use. `log` records from dependencies are bridged in. `init`
//! may be called repeatedly; only the first call configures anything.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Checked in order for a filter directive such as `vault_core=debug`.
pub const FILTER_ENV_VARS: [&str; 2] = ["MANGA_VAULT_LOG", "RUST_LOG"];

static HANDLE: OnceLock<LogHandle> = OnceLock::new();

pub use tracing_subscriber::filter::LevelFilter as LogLevel;

/// How often the file sink starts a new file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Rolling {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<Rolling> for Rotation {
    fn from(rolling: Rolling) -> Self {
        match rolling {
            Rolling::Hourly => Rotation::HOURLY,
            Rolling::Daily => Rotation::DAILY,
            Rolling::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub directory: PathBuf,
    /// File names are `<prefix>.<date>.log`.
    pub file_prefix: String,
    /// Number of log files kept after pruning; `None` keeps everything.
    pub keep_files: Option<usize>,
    pub file_level: LevelFilter,
    pub console_level: LevelFilter,
    pub bridge_log_crate: bool,
    pub directive: Option<String>,
    pub rolling: Rolling,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_prefix: "vault".to_string(),
            keep_files: Some(7),
            file_level: LevelFilter::DEBUG,
            console_level: LevelFilter::WARN,
            bridge_log_crate: true,
            directive: directive_from_env(),
            rolling: Rolling::default(),
        }
    }
}

impl LogConfig {
    pub fn with_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.directory = path.into();
        self
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Raise stderr output to `level` (e.g. for a `--verbose` flag).
    pub fn with_console_level(mut self, level: LevelFilter) -> Self {
        self.console_level = level;
        self
    }
}

/// Keeps the background file writer alive for the life of the process.
#[derive(Debug)]
pub struct LogHandle {
    _guard: WorkerGuard,
    directory: PathBuf,
}

impl LogHandle {
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Install the global subscriber. Later calls return the first handle unchanged.
pub fn init(config: LogConfig) -> Result<&'static LogHandle> {
    if let Some(handle) = HANDLE.get() {
        return Ok(handle);
    }
    let handle = install(config)?;
    let _ = HANDLE.set(handle);
    Ok(HANDLE.get().expect("log handle initialised"))
}

fn install(config: LogConfig) -> Result<LogHandle> {
    if config.bridge_log_crate {
        let max = config.file_level.max(config.console_level);
        let _ = tracing_log::LogTracer::builder().with_max_level(to_log_level(max)).init();
    }

    fs::create_dir_all(&config.directory)
        .with_context(|| format!("creating log directory {}", config.directory.display()))?;
    if let Some(keep) = config.keep_files.filter(|keep| *keep > 0) {
        prune(&config.directory, &config.file_prefix, keep).context("pruning old log files")?;
    }

    let appender = RollingBuilder::new()
        .rotation(config.rolling.into())
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .build(&config.directory)
        .context("creating rolling log appender")?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let directive = config
        .directive
        .clone()
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| default_directive(&config));
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("parsing log filter `{directive}`"))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_target(true)
        .with_filter(config.file_level);
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_filter(config.console_level);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    Ok(LogHandle { _guard: guard, directory: config.directory })
}

/// Global filter used when no directive is configured: the most verbose sink level.
fn default_directive(config: &LogConfig) -> String {
    config.file_level.max(config.console_level).to_string().to_ascii_lowercase()
}

fn directive_from_env() -> Option<String> {
    FILTER_ENV_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .filter(|directive| !directive.trim().is_empty())
}

fn to_log_level(level: LevelFilter) -> log::LevelFilter {
    match level {
        LevelFilter::OFF => log::LevelFilter::Off,
        LevelFilter::ERROR => log::LevelFilter::Error,
        LevelFilter::WARN => log::LevelFilter::Warn,
        LevelFilter::INFO => log::LevelFilter::Info,
        LevelFilter::DEBUG => log::LevelFilter::Debug,
        LevelFilter::TRACE => log::LevelFilter::Trace,
    }
}

/// Delete the oldest `<prefix>*` files until at most `keep` remain.
fn prune(dir: &Path, prefix: &str, keep: usize) -> Result<()> {
    let mut files: Vec<(PathBuf, SystemTime)> = fs::read_dir(dir)
        .with_context(|| format!("reading log directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            let path = entry.path();
            let stem = path.file_stem().and_then(OsStr::to_str)?;
            if !meta.is_file() || !stem.starts_with(prefix) {
                return None;
            }
            Some((path, meta.modified().unwrap_or(SystemTime::UNIX_EPOCH)))
        })
        .collect();

    if files.len() <= keep {
        return Ok(());
    }
    files.sort_by_key(|(_, modified)| *modified);
    let excess = files.len() - keep;
    for (path, _) in files.into_iter().take(excess) {
        let _ = fs::remove_file(&path);
    }
    Ok(())
}

fn default_directory() -> PathBuf {
    directories::ProjectDirs::from("com", "MangaVault", "manga-vault")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("manga-vault-logs"))
}
