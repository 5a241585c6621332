//! Configuration file support.
//!
//! Settings are loaded from TOML and passed explicitly to the code that needs
//! them; nothing reads process-wide state.

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pipeline::PipelineConfig;

const DEFAULT_TREE_HEIGHT: usize = 4;
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Configuration for tree generation and proving.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub prover: ProverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Circuit tree height; whitelists hold `2^height` addresses.
    #[serde(default = "default_tree_height")]
    pub height: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Prepended to every generated file name.
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProverConfig {
    /// Executable of the snarkjs-compatible prover CLI.
    #[serde(default = "default_prover_program")]
    pub program: PathBuf,
    #[serde(default = "default_circuit_wasm")]
    pub circuit_wasm: PathBuf,
    #[serde(default = "default_proving_key")]
    pub proving_key: PathBuf,
    /// Scratch directory for prover input and output files.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_TREE_HEIGHT,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            prefix: String::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            program: default_prover_program(),
            circuit_wasm: default_circuit_wasm(),
            proving_key: default_proving_key(),
            work_dir: default_work_dir(),
        }
    }
}

fn default_tree_height() -> usize {
    DEFAULT_TREE_HEIGHT
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_prover_program() -> PathBuf {
    PathBuf::from("snarkjs")
}

fn default_circuit_wasm() -> PathBuf {
    PathBuf::from("build/circuit_js/circuit.wasm")
}

fn default_proving_key() -> PathBuf {
    PathBuf::from("build/circuit_final.zkey")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".prover")
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise warns and returns the defaults.
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_from_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from_file(path);
        }
        warn!("Config file {} not found, using defaults", path.display());
        Ok(Self::default())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.tree.height >= usize::BITS as usize {
            anyhow::bail!("tree height {} is too large", self.tree.height);
        }
        Ok(())
    }

    /// Number of leaves a whitelist must have.
    #[must_use]
    pub fn num_leaves(&self) -> usize {
        1 << self.tree.height
    }

    #[must_use]
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            tree_height: self.tree.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tree.height, DEFAULT_TREE_HEIGHT);
        assert_eq!(config.num_leaves(), 16);
        assert_eq!(config.pipeline().tree_height, DEFAULT_TREE_HEIGHT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_deserialize_config() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.tree.height, deserialized.tree.height);
        assert_eq!(config.prover.proving_key, deserialized.prover.proving_key);
    }

    #[test]
    fn test_custom_config() {
        let config_toml = r#"
            [tree]
            height = 10

            [files]
            prefix = "airdrop_"

            [prover]
            program = "/usr/local/bin/snarkjs"
        "#;

        let config: Config = toml::from_str(config_toml).unwrap();
        assert_eq!(config.tree.height, 10);
        assert_eq!(config.num_leaves(), 1024);
        assert_eq!(config.files.prefix, "airdrop_");
        assert_eq!(config.files.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(
            config.prover.program,
            PathBuf::from("/usr/local/bin/snarkjs")
        );
        assert_eq!(config.prover.work_dir, PathBuf::from(".prover"));
    }

    #[test]
    fn test_validate_rejects_oversized_height() {
        let config: Config = toml::from_str("[tree]\nheight = 64\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("whitelist.toml");
        let mut config = Config::default();
        config.tree.height = 6;
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.tree.height, 6);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_default() {
        let config =
            Config::load_from_file_or_default(Path::new("/nonexistent/whitelist.toml")).unwrap();
        assert_eq!(config.tree.height, DEFAULT_TREE_HEIGHT);
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whitelist.toml");
        std::fs::write(&path, "[tree]\nheight = \"10\"\n").unwrap();

        let err = Config::load_from_file_or_default(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
