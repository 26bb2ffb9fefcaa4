use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use bugwatch_search::{Facets, SavedSearch, scope_saved_searches};

const CONFIG_DIR: &str = ".bugwatch";
const CONFIG_FILE: &str = "search.toml";

/// Search settings for the current project
pub struct SearchContext {
    /// Config file that was loaded, if any
    pub config_path: Option<PathBuf>,
    pub config: SearchConfig,
}

/// Configuration stored in .bugwatch/search.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub project: ProjectSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
    #[serde(default)]
    pub saved_searches: Vec<SavedSearch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Scopes `saved_searches`; all of them are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Most recent first
    #[serde(default)]
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl SearchContext {
    /// Load from an explicit path, or search upward from the current directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::find(),
        }
    }

    /// Find the nearest config from the current directory or its ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find the nearest config starting from the given directory. No config is not an error.
    pub fn find_from(start: &Path) -> Result<Self> {
        match Self::find_config_file(start) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self {
                config_path: None,
                config: SearchConfig::default(),
            }),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SearchConfig =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Self {
            config_path: Some(path.to_path_buf()),
            config,
        })
    }

    fn find_config_file(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    pub fn history(&self) -> &[String] {
        &self.config.history.entries
    }

    /// Saved searches for the configured project, default first.
    pub fn saved_searches(&self) -> Vec<SavedSearch> {
        match self.config.project.id.as_deref() {
            Some(project_id) => scope_saved_searches(&self.config.saved_searches, project_id),
            None => self.config.saved_searches.clone(),
        }
    }

    pub fn facets(&self) -> Option<&Facets> {
        self.config.facets.as_ref()
    }

    pub fn per_page(&self) -> Option<u32> {
        self.config.search.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[project]
id = "web"

[history]
entries = ["level:error", "is:unresolved crash"]

[search]
per_page = 25

[facets.level]
error = 12
fatal = 1

[[saved_searches]]
id = "s1"
name = "Mobile crashes"
query = "level:fatal"
project_id = "mobile"
created_at = "2026-09-01T10:00:00Z"

[[saved_searches]]
id = "s2"
name = "Open errors"
query = "is:unresolved level:error"
project_id = "web"
created_at = "2026-09-02T10:00:00Z"

[[saved_searches]]
id = "s3"
name = "Triage"
query = "is:unresolved sort:users"
project_id = "web"
created_at = "2026-09-03T10:00:00Z"
is_default = true
"#;

    fn write_config(root: &Path, content: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).expect("create config dir");
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, content).expect("write config");
        path
    }

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!(config.history.entries.is_empty());
        assert!(config.saved_searches.is_empty());
        assert!(config.facets.is_none());
        assert_eq!(config.search.per_page, None);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let ctx = SearchContext::find_from(temp.path()).expect("no config is fine");
        assert!(ctx.config_path.is_none());
        assert!(ctx.history().is_empty());
    }

    #[test]
    fn test_config_found_in_ancestor() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_config(temp.path(), SAMPLE);
        let nested = temp.path().join("apps").join("web");
        std::fs::create_dir_all(&nested).expect("create nested dir");

        let ctx = SearchContext::find_from(&nested).expect("load config");
        assert_eq!(ctx.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(ctx.history(), ["level:error", "is:unresolved crash"]);
        assert_eq!(ctx.per_page(), Some(25));
        assert_eq!(ctx.facets().and_then(|f| f.level.get("error").copied()), Some(12));
    }

    #[test]
    fn test_saved_searches_scoped_to_project() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_config(temp.path(), SAMPLE);
        let ctx = SearchContext::from_file(&path).expect("load config");

        let ids: Vec<String> = ctx.saved_searches().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["s3", "s2"]);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_config(temp.path(), "[history]\nentries = 5\n");
        let err = SearchContext::from_file(&path).err().expect("invalid config");
        assert!(format!("{err}").contains("search.toml"));
    }

    #[test]
    fn test_config_serialization() {
        let mut config = SearchConfig::default();
        config.history.entries.push("level:error".to_string());
        let toml_str = toml::to_string_pretty(&config).expect("serialize config");
        assert!(toml_str.contains("entries"));
        assert!(!toml_str.contains("facets"));
    }
}
