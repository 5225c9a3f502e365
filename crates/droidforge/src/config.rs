//! Configuration file support for droidforge.
//!
//! Project settings live in a `droidforge.toml` file so builds run without
//! repeated CLI flags. The file is searched for starting from the current
//! working directory and walking up to the repository root.
//!
//! ## Example Configuration
//!
//! ```toml
//! [project]
//! android_dir = "."
//! app_module = "app"
//! assets_dir = "assets"
//!
//! [android]
//! min_sdk = 28
//!
//! # Optional; local builds only. CI builds read KEYSTORE_PATH and friends
//! # from the environment instead.
//! [signing]
//! store_file = "keys/upload.jks"
//! store_password = "..."
//! key_alias = "upload"
//! key_password = "..."
//! ```

use anyhow::{Context, Result};
use droidforge_sdk::{ProjectLayout, SigningProperties};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The default configuration file name.
pub const CONFIG_FILE_NAME: &str = "droidforge.toml";

/// Root configuration structure for `droidforge.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DroidforgeConfig {
    /// Project layout configuration.
    pub project: ProjectConfig,

    /// Android-specific configuration.
    pub android: AndroidConfig,

    /// Local signing credentials. Optional; when absent or incomplete,
    /// packaging uses the platform's default debug keystore.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningProperties>,
}

/// Project layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Gradle project directory, relative to the project root.
    ///
    /// Defaults to the project root itself.
    pub android_dir: PathBuf,

    /// Name of the Gradle application module.
    ///
    /// Defaults to "app".
    pub app_module: String,

    /// Shared asset source tree, relative to the project root.
    ///
    /// Defaults to "assets".
    pub assets_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            android_dir: PathBuf::from("."),
            app_module: "app".to_string(),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

/// Android-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidConfig {
    /// Minimum Android SDK version passed to the native build tool.
    ///
    /// Defaults to 28.
    pub min_sdk: u32,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self { min_sdk: 28 }
    }
}

impl DroidforgeConfig {
    /// Loads configuration from the specified file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;

        let config: DroidforgeConfig =
            toml::from_str(&contents).with_context(|| format!("parsing config file {:?}", path))?;

        Ok(config)
    }

    /// Attempts to find and load configuration starting from the specified
    /// directory, walking up until the repository root or filesystem root.
    ///
    /// Returns the configuration together with the path it was loaded from,
    /// or `None` if no config file exists.
    pub fn discover_from(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.is_file() {
                let config = Self::load_from_file(&config_path)?;
                return Ok(Some((config, config_path)));
            }

            // Stop at repository root or filesystem root
            if current.join(".git").exists() || !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Builds the project layout for the given root directory.
    pub fn layout(&self, project_root: &Path) -> ProjectLayout {
        ProjectLayout {
            project_root: project_root.to_path_buf(),
            android_dir: self.project.android_dir.clone(),
            app_module: self.project.app_module.clone(),
            assets_dir: self.project.assets_dir.clone(),
        }
    }

    /// Generates a starter configuration file as a commented TOML string.
    pub fn generate_starter_toml() -> String {
        r#"# droidforge configuration file
# Settings for building and packaging the Android app around a Rust native
# library. CLI flags override these settings when provided.

[project]
# Gradle project directory, relative to this file (default: ".")
android_dir = "."

# Gradle application module name (default: "app")
app_module = "app"

# Shared asset source tree mirrored into the app before packaging
assets_dir = "assets"

[android]
# Minimum Android SDK version passed to cargo-ndk (default: 28)
min_sdk = 28

# Local signing credentials (optional). All four values must be set for
# custom signing to apply; otherwise packaging falls back to the default
# debug keystore. CI builds ignore this table and read KEYSTORE_PATH,
# KEYSTORE_PASSWORD, KEY_ALIAS and KEY_PASSWORD from the environment.
# [signing]
# store_file = "keys/upload.jks"
# store_password = ""
# key_alias = "upload"
# key_password = ""
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DroidforgeConfig::default();
        assert_eq!(config.project.android_dir, PathBuf::from("."));
        assert_eq!(config.project.app_module, "app");
        assert_eq!(config.project.assets_dir, PathBuf::from("assets"));
        assert_eq!(config.android.min_sdk, 28);
        assert!(config.signing.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        let toml_content = r#"
[project]
android_dir = "android"
app_module = "game"
assets_dir = "shared/assets"

[android]
min_sdk = 24

[signing]
store_file = "keys/local.jks"
store_password = "pw"
key_alias = "dev"
key_password = "kpw"
"#;

        std::fs::write(&config_path, toml_content).unwrap();

        let config = DroidforgeConfig::load_from_file(&config_path).unwrap();

        assert_eq!(config.project.android_dir, PathBuf::from("android"));
        assert_eq!(config.project.app_module, "game");
        assert_eq!(config.project.assets_dir, PathBuf::from("shared/assets"));
        assert_eq!(config.android.min_sdk, 24);

        let signing = config.signing.unwrap();
        assert_eq!(signing.store_file.as_deref(), Some("keys/local.jks"));
        assert_eq!(signing.key_alias.as_deref(), Some("dev"));
    }

    #[test]
    fn test_partial_signing_table_parses() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(
            &config_path,
            r#"
[signing]
store_file = "keys/local.jks"
"#,
        )
        .unwrap();

        let config = DroidforgeConfig::load_from_file(&config_path).unwrap();
        let signing = config.signing.unwrap();
        assert!(signing.to_identity().is_none());
    }

    #[test]
    fn test_discover_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[android]\nmin_sdk = 26\n").unwrap();

        let nested = temp_dir.path().join("crates/game");
        std::fs::create_dir_all(&nested).unwrap();

        let result = DroidforgeConfig::discover_from(&nested).unwrap();
        assert!(result.is_some());

        let (config, path) = result.unwrap();
        assert_eq!(config.android.min_sdk, 26);
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_no_config() {
        let temp_dir = TempDir::new().unwrap();
        // Create a .git directory to stop the search
        std::fs::create_dir(temp_dir.path().join(".git")).unwrap();

        let result = DroidforgeConfig::discover_from(temp_dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_layout_from_config() {
        let mut config = DroidforgeConfig::default();
        config.project.android_dir = PathBuf::from("android");
        let layout = config.layout(Path::new("/proj"));
        assert_eq!(layout.project_root, PathBuf::from("/proj"));
        assert_eq!(layout.android_root(), PathBuf::from("/proj/android"));
        assert_eq!(layout.app_module, "app");
    }

    #[test]
    fn test_generate_starter_toml() {
        let toml = DroidforgeConfig::generate_starter_toml();
        assert!(toml.contains("android_dir = \".\""));
        assert!(toml.contains("app_module = \"app\""));
        assert!(toml.contains("min_sdk = 28"));
        assert!(toml.contains("KEYSTORE_PATH"));
        // The starter must parse back as a valid config.
        let parsed: DroidforgeConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.android.min_sdk, 28);
    }
}
