//! Layered configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `BENCHPLOT_*` environment variables.
//!
//! ```toml
//! output_dir = "bench_results"
//! command = ["cargo", "bench", "--bench", "parquet_encoding"]
//!
//! [[families]]
//! prefix = "parquet_encoding"
//! label = "encode"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use benchplot_core::{Family, FamilyRegistry};
use benchplot_report::io::OUTPUT_DIR;
use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BENCHPLOT";

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory receiving all artifacts.
    pub output_dir: PathBuf,
    /// Benchmark command line, program first.
    pub command: Vec<String>,
    /// Benchmark families in priority order.
    pub families: Vec<Family>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(OUTPUT_DIR),
            command: vec!["make".to_string(), "bench".to_string()],
            families: FamilyRegistry::parquet_encoding().families().to_vec(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (if it exists) and the environment.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("command"),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Families as a registry.
    pub fn registry(&self) -> FamilyRegistry {
        self.families.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(settings.command, vec!["make", "bench"]);
        assert_eq!(settings.registry(), FamilyRegistry::parquet_encoding());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchplot.toml");
        std::fs::write(
            &path,
            r#"
output_dir = "out"
command = ["cargo", "bench"]

[[families]]
prefix = "foo_"
label = "foo"
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(settings.command, vec!["cargo", "bench"]);
        assert_eq!(settings.families, vec![Family::new("foo_", "foo")]);
    }
}
