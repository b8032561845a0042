//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bookmind/bookmind.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `BOOKMIND_*` prefix (`__` separates sections)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{DomainDominance, ExportOptions, HierarchyParams};

/// Hierarchy builder settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Maximum folder depth (2-8)
    pub vertical: usize,
    /// Maximum sibling groups per split (3-15)
    pub horizontal: usize,
    /// Dominant-domain threshold
    pub dominance: DomainDominance,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        let params = HierarchyParams::default();
        Self {
            vertical: params.vertical_complexity(),
            horizontal: params.horizontal_complexity(),
            dominance: DomainDominance::default(),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    pub include_bookmarks: bool,
    pub include_folders: bool,
    /// Directory for generated mind maps when no output file is given
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_bookmarks: true,
            include_folders: true,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Raw hierarchy config for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawHierarchyConfig {
    pub vertical: Option<usize>,
    pub horizontal: Option<usize>,
    pub dominance: Option<DomainDominance>,
}

/// Raw export config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawExportConfig {
    pub include_bookmarks: Option<bool>,
    pub include_folders: Option<bool>,
    pub output_dir: Option<PathBuf>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub rules_file: Option<PathBuf>,
    pub hierarchy: RawHierarchyConfig,
    pub export: RawExportConfig,
}

/// Unified configuration for bookmind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// TOML rule table replacing the built-in classification rules
    pub rules_file: Option<PathBuf>,
    pub hierarchy: HierarchyConfig,
    pub export: ExportConfig,
}

/// Get the XDG config directory for bookmind.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bookmind").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bookmind.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path, leaving it unchanged on failure.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Hierarchy parameters, validated against their bounds.
    pub fn params(&self) -> Result<HierarchyParams, ApplicationError> {
        HierarchyParams::new(self.hierarchy.vertical, self.hierarchy.horizontal).map_err(|e| {
            ApplicationError::Config {
                message: e.to_string(),
            }
        })
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            include_bookmarks: self.export.include_bookmarks,
            include_folders: self.export.include_folders,
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.export.output_dir = expand_path(&self.export.output_dir);
        self.rules_file = self.rules_file.as_deref().map(expand_path);
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            rules_file: overlay.rules_file.clone().or_else(|| self.rules_file.clone()),
            hierarchy: HierarchyConfig {
                vertical: overlay.hierarchy.vertical.unwrap_or(self.hierarchy.vertical),
                horizontal: overlay
                    .hierarchy
                    .horizontal
                    .unwrap_or(self.hierarchy.horizontal),
                dominance: overlay
                    .hierarchy
                    .dominance
                    .unwrap_or(self.hierarchy.dominance),
            },
            export: ExportConfig {
                include_bookmarks: overlay
                    .export
                    .include_bookmarks
                    .unwrap_or(self.export.include_bookmarks),
                include_folders: overlay
                    .export
                    .include_folders
                    .unwrap_or(self.export.include_folders),
                output_dir: overlay
                    .export
                    .output_dir
                    .clone()
                    .unwrap_or_else(|| self.export.output_dir.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Optional extra config file (highest file precedence)
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/bookmind/bookmind.toml`
    /// 3. Local config file
    /// 4. Environment variables: `BOOKMIND_*` prefix
    ///
    /// The resulting hierarchy bounds are validated.
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(local_path) = local_config {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            debug!("local config: {}", local_path.display());
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.params()?;

        Ok(current)
    }

    /// Apply BOOKMIND_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BOOKMIND")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("rules_file") {
            settings.rules_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get::<usize>("hierarchy.vertical") {
            settings.hierarchy.vertical = val;
        }
        if let Ok(val) = config.get::<usize>("hierarchy.horizontal") {
            settings.hierarchy.horizontal = val;
        }
        if let Ok(val) = config.get_string("hierarchy.dominance") {
            settings.hierarchy.dominance = parse_dominance(&val)?;
        }
        if let Ok(val) = config.get_bool("export.include_bookmarks") {
            settings.export.include_bookmarks = val;
        }
        if let Ok(val) = config.get_bool("export.include_folders") {
            settings.export.include_folders = val;
        }
        if let Ok(val) = config.get_string("export.output_dir") {
            settings.export.output_dir = PathBuf::from(val);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# bookmind configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/bookmind/bookmind.toml
#   Local:  file passed with --config
#   Env:    BOOKMIND_* environment variables, e.g. BOOKMIND_HIERARCHY__VERTICAL=5

# Replace the built-in classification rules with a TOML table:
#   stop_words = ["the", "and"]
#   [[rules]]
#   category = "Development & Code"
#   domains = ["github.com"]
#   keywords = ["code"]
# rules_file = "~/.config/bookmind/rules.toml"

[hierarchy]
# Maximum folder depth (2-8)
# vertical = 4

# Maximum sibling groups per split, and the size below which a folder is not split (3-15)
# horizontal = 8

# Dominant-domain threshold: "literal" (any domain with 2+ bookmarks)
# or "relative" (at least 15% of the folder being split)
# dominance = "literal"

[export]
# include_bookmarks = true
# include_folders = true
# output_dir = "."
"#
        .to_string()
    }
}

fn parse_dominance(value: &str) -> Result<DomainDominance, ApplicationError> {
    match value.to_ascii_lowercase().as_str() {
        "literal" => Ok(DomainDominance::Literal),
        "relative" => Ok(DomainDominance::Relative),
        other => Err(ApplicationError::Config {
            message: format!("unknown dominance '{other}', expected 'literal' or 'relative'"),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_reading_params_then_matches_hierarchy_defaults() {
        let settings = Settings::default();
        let params = settings.params().expect("default params are valid");
        assert_eq!(params, HierarchyParams::default());
        assert_eq!(settings.export_options(), ExportOptions::default());
        assert_eq!(settings.hierarchy.dominance, DomainDominance::Literal);
    }

    #[test]
    fn given_out_of_range_vertical_when_reading_params_then_config_error() {
        let mut settings = Settings::default();
        settings.hierarchy.vertical = 9;
        let err = settings.params().unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            rules_file: None,
            hierarchy: RawHierarchyConfig {
                vertical: Some(6),
                horizontal: None,
                dominance: Some(DomainDominance::Relative),
            },
            export: RawExportConfig {
                include_bookmarks: Some(false),
                include_folders: None,
                output_dir: None,
            },
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.hierarchy.vertical, 6);
        assert_eq!(merged.hierarchy.horizontal, 8);
        assert_eq!(merged.hierarchy.dominance, DomainDominance::Relative);
        assert!(!merged.export.include_bookmarks);
        assert!(merged.export.include_folders);
        assert_eq!(merged.export.output_dir, PathBuf::from("."));
    }

    #[test]
    fn given_tilde_in_output_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings::default();
        settings.export.output_dir = PathBuf::from("~/maps");
        settings.rules_file = Some(PathBuf::from("$HOME/rules.toml"));

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.export.output_dir.starts_with(&home));
        assert!(settings
            .rules_file
            .as_ref()
            .is_some_and(|p| p.starts_with(&home)));
    }

    #[test]
    fn given_dominance_strings_when_parsing_then_case_insensitive() {
        assert_eq!(parse_dominance("Relative").unwrap(), DomainDominance::Relative);
        assert_eq!(parse_dominance("literal").unwrap(), DomainDominance::Literal);
        assert!(parse_dominance("loose").is_err());
    }

    #[test]
    fn given_settings_when_serializing_then_template_sections_present() {
        let toml = Settings::default().to_toml().expect("serialize");
        assert!(toml.contains("[hierarchy]"));
        assert!(toml.contains("dominance = \"literal\""));
        assert!(toml.contains("[export]"));
    }
}
