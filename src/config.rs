// ⚙️ Settings - defaults, then catalog.toml, then environment

use crate::selection::ResetScope;
use anyhow::Context;
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// None = built-in dataset
    pub data_dir: Option<PathBuf>,
    pub bind_addr: String,
    pub reset_scope: ResetScope,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            bind_addr: "127.0.0.1:3000".into(),
            reset_scope: ResetScope::Filters,
        }
    }
}

/// Shape of catalog.toml; every key optional
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    data_dir: Option<PathBuf>,
    bind_addr: Option<String>,
    reset_scope: Option<String>,
}

/// Load from `./catalog.toml` (if present) and the process environment
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if Path::new(CONFIG_FILE).is_file() {
        let raw = fs::read_to_string(CONFIG_FILE)
            .with_context(|| format!("failed to read {}", CONFIG_FILE))?;
        settings = apply_file(settings, &raw)?;
    }

    apply_env(settings, |key| std::env::var(key).ok())
}

fn apply_file(mut settings: Settings, raw: &str) -> anyhow::Result<Settings> {
    let file_cfg: FileSettings =
        toml::from_str(raw).with_context(|| format!("failed to parse {}", CONFIG_FILE))?;

    if let Some(v) = file_cfg.data_dir {
        settings.data_dir = Some(v);
    }
    if let Some(v) = file_cfg.bind_addr {
        settings.bind_addr = v;
    }
    if let Some(v) = file_cfg.reset_scope {
        settings.reset_scope = v.parse()?;
    }

    Ok(settings)
}

fn apply_env<F>(mut settings: Settings, var: F) -> anyhow::Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = var("CATALOG_DATA_DIR") {
        if v.trim().is_empty() {
            warn!("CATALOG_DATA_DIR is set but empty; using built-in dataset");
            settings.data_dir = None;
        } else {
            settings.data_dir = Some(PathBuf::from(v));
        }
    }

    if let Some(v) = var("CATALOG_BIND_ADDR") {
        settings.bind_addr = v;
    }

    if let Some(v) = var("CATALOG_RESET_SCOPE") {
        settings.reset_scope = v
            .parse()
            .context("invalid CATALOG_RESET_SCOPE")?;
    }

    Ok(settings)
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq)]
pub enum LogTarget {
    Stderr,
    /// Appended to; used while a full-screen UI owns the terminal
    File(PathBuf),
}

impl LogTarget {
    /// Log file for interactive sessions
    pub fn session_file() -> Self {
        LogTarget::File(std::env::temp_dir().join("goods-catalog.log"))
    }
}

fn make_writer(target: &LogTarget) -> anyhow::Result<BoxMakeWriter> {
    match target {
        LogTarget::Stderr => Ok(BoxMakeWriter::new(std::io::stderr)),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
    }
}

/// Default `info`, overridable through RUST_LOG
pub fn init_tracing(target: &LogTarget) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(*target == LogTarget::Stderr)
        .with_writer(make_writer(target)?)
        .init();

    Ok(())
}
