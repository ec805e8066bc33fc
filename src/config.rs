use std::path::Path;

use anyhow::{Context, Result, ensure};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::rewrite::RewritePolicy;

const ENV_PREFIX: &str = "DIRINDEX";

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub policy: RewritePolicy,
    /// Document served for directory-style URIs
    pub index_document: String,
    /// Exact URIs rewritten under the allowlist policy
    pub allowlist: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            policy: RewritePolicy::default(),
            index_document: "index.html".to_string(),
            allowlist: vec!["/account".to_string()],
        }
    }
}

impl RewriteConfig {
    /// Loads configuration from an optional file, then `DIRINDEX_*` environment variables
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_str = config_path.display().to_string();
        let config = Config::builder()
            .add_source(File::with_name(&config_str).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowlist"),
            )
            .build()
            .with_context(|| format!("Failed to load config from: {}", config_str))?;

        let rewrite_config: RewriteConfig = config
            .try_deserialize()
            .with_context(|| format!("Failed to parse config from: {}", config_str))?;

        rewrite_config
            .validate()
            .with_context(|| format!("Invalid config in: {}", config_str))?;

        Ok(rewrite_config)
    }

    /// Rejects settings under which rewriting its own output would change it again
    pub fn validate(&self) -> Result<()> {
        let doc = &self.index_document;
        ensure!(!doc.is_empty(), "index_document must not be empty");
        ensure!(
            !doc.contains('/'),
            "index_document must be a file name, got {:?}",
            doc
        );
        ensure!(
            doc.contains('.'),
            "index_document must contain a '.', got {:?}",
            doc
        );

        for entry in &self.allowlist {
            ensure!(
                entry.starts_with('/'),
                "allowlist entry must start with '/', got {:?}",
                entry
            );
            ensure!(
                !entry.ends_with('/'),
                "allowlist entry must not end with '/', got {:?}",
                entry
            );
            // Such an entry would match the rewritten form of its parent
            ensure!(
                entry.rsplit('/').next() != Some(doc.as_str()),
                "allowlist entry must not name the index document, got {:?}",
                entry
            );
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) const ENV_KEYS: [&str; 3] = [
    "DIRINDEX_POLICY",
    "DIRINDEX_INDEX_DOCUMENT",
    "DIRINDEX_ALLOWLIST",
];

/// Serializes tests that touch `DIRINDEX_*` environment variables
#[cfg(test)]
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Takes the environment lock and clears any `DIRINDEX_*` variables
#[cfg(test)]
pub(crate) fn clean_env() -> std::sync::MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    for key in ENV_KEYS {
        unsafe { std::env::remove_var(key) };
    }
    guard
}

#[cfg(test)]
pub(crate) fn write_temp_config(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "dirindex-{}-{}.config.yml",
        std::process::id(),
        name
    ));
    std::fs::write(&path, contents).unwrap();
    path
}
