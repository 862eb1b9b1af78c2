//! Service configuration
//!
//! Read from `EXO_PHILOS_*` environment variables. Unset variables take the
//! defaults below; set but unparsable values are an error.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_MAX_SUBJECT_CHARS: usize = 500;
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_LOCALES: &[&str] = &["fr", "en"];

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    /// Parent of the classifier artifact directory
    pub model_dir: PathBuf,
    /// Holds `<locale>.json` lexicon bundles
    pub lexicon_dir: PathBuf,
    /// Tried in order; the first that loads wins
    pub locales: Vec<String>,
    pub max_subject_chars: usize,
    pub bind: SocketAddr,
    pub allowed_origin: String,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("EXO_PHILOS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let model_dir = lookup("EXO_PHILOS_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("models"));
        let lexicon_dir = lookup("EXO_PHILOS_LEXICON_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("lexicon"));

        let locales = match lookup("EXO_PHILOS_LOCALES") {
            Some(raw) => raw
                .split(',')
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
            None => DEFAULT_LOCALES.iter().map(|l| l.to_string()).collect(),
        };

        let max_subject_chars = match lookup("EXO_PHILOS_MAX_SUBJECT_CHARS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid EXO_PHILOS_MAX_SUBJECT_CHARS: {:?}", raw))?,
            None => DEFAULT_MAX_SUBJECT_CHARS,
        };

        let bind_raw = lookup("EXO_PHILOS_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid EXO_PHILOS_BIND: {:?}", bind_raw))?;

        let allowed_origin =
            lookup("EXO_PHILOS_ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());

        Ok(Self {
            data_dir,
            model_dir,
            lexicon_dir,
            locales,
            max_subject_chars,
            bind,
            allowed_origin,
        })
    }

    /// Same configuration, rooted at `dir`
    pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
        let data_dir = dir.into();
        Self {
            model_dir: data_dir.join("models"),
            lexicon_dir: data_dir.join("lexicon"),
            data_dir,
            locales: DEFAULT_LOCALES.iter().map(|l| l.to_string()).collect(),
            max_subject_chars: DEFAULT_MAX_SUBJECT_CHARS,
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.bind.set_port(port);
        self
    }
}

/// XDG data dir on Linux, ~/Library/Application Support on macOS
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("exo-philos")
}
