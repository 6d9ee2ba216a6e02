//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/meshtk/meshtk.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `MESHTK_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::NetworkConfig;

/// Default HTTP timeout for snapshot downloads.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Unified configuration for meshtk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Path or URL of the node-info document (nodes.json)
    pub nodes_source: Option<String>,
    /// Path or URL of the topology document (graph.json)
    pub graph_source: Option<String>,
    /// Node ids known to connect via VPN only (e.g. supernodes)
    pub vpn_only_nodes: Vec<String>,
    /// Timeout for HTTP downloads in seconds
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nodes_source: None,
            graph_source: None,
            vpn_only_nodes: vec![],
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Raw settings for intermediate parsing (all fields optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub nodes_source: Option<String>,
    pub graph_source: Option<String>,
    pub vpn_only_nodes: Option<Vec<String>>,
    pub http_timeout_secs: Option<u64>,
}

/// Merge arrays with union semantics and negation support.
///
/// - Items from overlay are added to base
/// - Items prefixed with `!` remove the corresponding item from the result
/// - Duplicates are de-duplicated
///
/// # Examples
/// ```ignore
/// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
/// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
/// ```
pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
    let mut result: HashSet<String> = base.iter().cloned().collect();

    for item in overlay {
        if let Some(negated) = item.strip_prefix('!') {
            result.remove(negated);
        } else {
            result.insert(item.clone());
        }
    }

    // Convert to sorted Vec for deterministic output
    let mut vec: Vec<String> = result.into_iter().collect();
    vec.sort();
    vec
}

/// Get the XDG config directory for meshtk.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "meshtk").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("meshtk.toml"))
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

/// Expand `~`, `$VAR` and `${VAR}` in a local path; URLs are left alone.
fn expand_source(source: &str) -> String {
    if source.contains("://") {
        return source.to_string();
    }
    shellexpand::full(source)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| source.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in the document sources.
    fn expand_paths(&mut self) {
        self.nodes_source = self.nodes_source.as_deref().map(expand_source);
        self.graph_source = self.graph_source.as_deref().map(expand_source);
    }

    /// Merge overlay config onto self (base) with union semantics for arrays.
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - `vpn_only_nodes`: union merge with negation support
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            nodes_source: overlay
                .nodes_source
                .clone()
                .or_else(|| self.nodes_source.clone()),
            graph_source: overlay
                .graph_source
                .clone()
                .or_else(|| self.graph_source.clone()),
            vpn_only_nodes: overlay
                .vpn_only_nodes
                .as_ref()
                .map(|o| merge_array(&self.vpn_only_nodes, o))
                .unwrap_or_else(|| self.vpn_only_nodes.clone()),
            http_timeout_secs: overlay
                .http_timeout_secs
                .unwrap_or(self.http_timeout_secs),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for arrays.
    pub fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            nodes_source: global
                .nodes_source
                .clone()
                .or_else(|| self.nodes_source.clone()),
            graph_source: global
                .graph_source
                .clone()
                .or_else(|| self.graph_source.clone()),
            vpn_only_nodes: global
                .vpn_only_nodes
                .clone()
                .unwrap_or_else(|| self.vpn_only_nodes.clone()),
            http_timeout_secs: global.http_timeout_secs.unwrap_or(self.http_timeout_secs),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, merged over the global one
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config (REPLACES defaults)
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        // 3. Explicit config file (UNION with global); must exist if given
        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (REPLACE - explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply MESHTK_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("MESHTK")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("nodes_source") {
            settings.nodes_source = Some(val);
        }
        if let Ok(val) = config.get_string("graph_source") {
            settings.graph_source = Some(val);
        }
        // comma separated, e.g. MESHTK_VPN_ONLY_NODES=02caffee0001,c04a00dd692a
        if let Ok(val) = config.get_string("vpn_only_nodes") {
            settings.vpn_only_nodes = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(val) = config.get_string("http_timeout_secs") {
            settings.http_timeout_secs = val.trim().parse().map_err(|e| ApplicationError::Config {
                message: format!("MESHTK_HTTP_TIMEOUT_SECS: {e}"),
            })?;
        }

        Ok(settings)
    }

    /// Graph configuration derived from these settings.
    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            vpn_only_nodes: self.vpn_only_nodes.iter().cloned().collect::<BTreeSet<_>>(),
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# meshtk configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/meshtk/meshtk.toml   (defines your baseline)
#   File:   meshtk --config <FILE>         (additions for one community)
#   Env:    MESHTK_* environment variables (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   A --config file UNIONS with global.
#   Use "!id" in a --config file to REMOVE an inherited node id:
#     vpn_only_nodes = ["c04a00dd692a", "!02caffee0001"]

# Path or URL of the node-info document
# nodes_source = "https://map.example.net/data/nodes.json"

# Path or URL of the topology document
# graph_source = "https://map.example.net/data/graph.json"

# Nodes that only ever connect via VPN (supernodes).
# Non-VPN links touching them are treated as VPN links.
# vpn_only_nodes = []

# Timeout for HTTP downloads in seconds
# http_timeout_secs = 30
"#
        .to_string()
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
    fn given_default_settings_when_created_then_has_no_sources() {
        let settings = Settings::default();
        assert!(settings.nodes_source.is_none());
        assert!(settings.graph_source.is_none());
        assert!(settings.vpn_only_nodes.is_empty());
        assert_eq!(settings.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn given_tilde_in_source_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            nodes_source: Some("~/data/nodes.json".to_string()),
            graph_source: Some("https://example.net/~user/graph.json".to_string()),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let nodes = settings.nodes_source.unwrap();
        assert!(nodes.starts_with(&home), "nodes_source should start with home dir: {nodes}");
        assert_eq!(
            settings.graph_source.as_deref(),
            Some("https://example.net/~user/graph.json"),
            "URLs must not be expanded"
        );
    }

    #[test]
    fn test_merge_array_union() {
        let base = vec!["a".to_string(), "b".to_string()];
        let overlay = vec!["c".to_string()];
        let result = merge_array(&base, &overlay);

        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_array_negation() {
        let base = vec!["a".to_string(), "b".to_string()];
        let overlay = vec!["!a".to_string(), "c".to_string()];
        let result = merge_array(&base, &overlay);

        assert_eq!(result, vec!["b", "c"]);
    }

    #[test]
    fn test_merge_array_negation_nonexistent() {
        let base = vec!["a".to_string()];
        let overlay = vec!["!x".to_string()];
        assert_eq!(merge_array(&base, &overlay), vec!["a"]);
    }

    #[test]
    fn test_apply_global_replaces_arrays() {
        let base = Settings {
            vpn_only_nodes: vec!["default".to_string()],
            ..Settings::default()
        };
        let global = RawSettings {
            vpn_only_nodes: Some(vec!["super1".to_string()]),
            http_timeout_secs: Some(5),
            ..RawSettings::default()
        };

        let result = base.apply_global(&global);

        assert_eq!(result.vpn_only_nodes, vec!["super1".to_string()]);
        assert_eq!(result.http_timeout_secs, 5);
    }

    #[test]
    fn test_merge_with_unions_arrays_and_keeps_unset_scalars() {
        let base = Settings {
            nodes_source: Some("nodes.json".to_string()),
            vpn_only_nodes: vec!["super1".to_string(), "super2".to_string()],
            ..Settings::default()
        };
        let overlay = RawSettings {
            graph_source: Some("graph.json".to_string()),
            vpn_only_nodes: Some(vec!["!super2".to_string(), "super3".to_string()]),
            ..RawSettings::default()
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.nodes_source.as_deref(), Some("nodes.json"));
        assert_eq!(result.graph_source.as_deref(), Some("graph.json"));
        assert_eq!(result.vpn_only_nodes, vec!["super1", "super3"]);
    }

    #[test]
    fn given_vpn_only_nodes_when_network_config_then_contains_all() {
        let settings = Settings {
            vpn_only_nodes: vec!["b".to_string(), "a".to_string()],
            ..Settings::default()
        };
        let config = settings.network_config();
        assert!(config.vpn_only_nodes.contains("a"));
        assert!(config.vpn_only_nodes.contains("b"));
    }
}
