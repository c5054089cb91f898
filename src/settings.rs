//! Code for loading program settings.
use crate::get_agrinext_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use crate::predictor::DepthStrategy;
use anyhow::{Result, ensure};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# This file contains the program settings for AgriNext.
# Uncomment a setting to change it from its default value.
";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    let mut path = get_agrinext_config_dir();
    path.push(SETTINGS_FILE_NAME);

    path
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether to overwrite output folders by default
    #[serde(default)]
    pub overwrite: bool,
    /// A fixed maximum depth for regression trees. If unset, a depth between 7 and 15 is drawn for
    /// each commodity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_depth: Option<usize>,
    /// Seed for drawing tree depths, making predictions reproducible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
            tree_depth: None,
            seed: None,
        }
    }
}

impl Settings {
    /// Read the program settings from the user's config directory.
    ///
    /// If the file is not present, default values for settings will be used.
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        let settings: Settings = read_toml(file_path)?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if let Some(depth) = self.tree_depth {
            ensure!(depth >= 1, "tree_depth must be at least 1");
        }

        Ok(())
    }

    /// How tree depths should be chosen.
    ///
    /// A fixed depth takes precedence over a seed.
    pub fn depth_strategy(&self) -> DepthStrategy {
        match (self.tree_depth, self.seed) {
            (Some(depth), _) => DepthStrategy::Fixed(depth),
            (None, Some(seed)) => DepthStrategy::Seeded(seed),
            (None, None) => DepthStrategy::Random,
        }
    }

    /// The contents of the default settings file
    pub fn default_file_contents() -> String {
        // Optional settings have no default value, so show example values instead
        let settings = Settings {
            tree_depth: Some(10),
            seed: Some(42),
            ..Settings::default()
        };
        let settings_raw = toml::to_string(&settings).unwrap_or_default();

        // Comment out every setting and document it
        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for line in settings_raw.lines() {
            let Some(eq) = line.find('=') else {
                continue;
            };

            let field = line[..eq].trim();
            if let Ok(docs) = Settings::get_field_docs(field) {
                for doc_line in docs.lines() {
                    let _ = write!(&mut out, "\n# # {}", doc_line.trim());
                }
            }
            let _ = write!(&mut out, "\n# {}\n", line.trim());
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_settings_load_from_path_no_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME); // NB: doesn't exist
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_settings_load_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&file_path, "log_level = \"warn\"\nseed = 7\n").unwrap();

        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings {
                log_level: "warn".to_string(),
                overwrite: false,
                tree_depth: None,
                seed: Some(7),
            }
        );
    }

    #[test]
    fn test_settings_load_from_path_zero_depth() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&file_path, "tree_depth = 0\n").unwrap();

        assert_error!(
            Settings::load_from_path(&file_path),
            "tree_depth must be at least 1"
        );
    }

    #[test]
    fn test_depth_strategy() {
        let mut settings = Settings::default();
        assert_eq!(settings.depth_strategy(), DepthStrategy::Random);

        settings.seed = Some(3);
        assert_eq!(settings.depth_strategy(), DepthStrategy::Seeded(3));

        settings.tree_depth = Some(12);
        assert_eq!(settings.depth_strategy(), DepthStrategy::Fixed(12));
    }

    #[test]
    fn test_default_file_contents() {
        let contents = Settings::default_file_contents();
        assert!(contents.starts_with(DEFAULT_SETTINGS_FILE_HEADER));
        assert!(contents.contains("# log_level = \"info\""));
        assert!(contents.contains("# tree_depth = 10"));
        assert!(contents.contains("# # The default program log level"));

        // Every setting is commented out, so parsing gives the defaults
        let settings: Settings = toml::from_str(&contents).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
