use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file, looked up in the workspace root.
pub const WORKSPACE_CONFIG_FILE: &str = ".lct.toml";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub resources: ResourceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ResourceConfig {
    // Folder of the source-language file, relative to the workspace root
    #[serde(alias = "originalPath")]
    pub original_path: String,
    // Folder of the target-language file, relative to the workspace root
    #[serde(alias = "targetPath")]
    pub target_path: String,
    // Shared base name of both files; lower-cased it is the lookup namespace
    #[serde(alias = "targetFileName")]
    pub target_file_name: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            original_path: "lang/en/".to_string(),
            target_path: "lang/ar/".to_string(),
            target_file_name: "messages".to_string(),
        }
    }
}

impl ResourceConfig {
    pub fn namespace(&self) -> String {
        self.target_file_name.to_lowercase()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub language: String,
    // Prompt mode: "interactive" or "simple"
    pub tui_mode: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            tui_mode: "interactive".to_string(),
        }
    }
}

impl Config {
    /// Workspace file first, then the user-wide file, then built-in defaults.
    pub fn load(workspace: &Path) -> Result<Self> {
        for path in Self::candidate_paths(workspace) {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load_from(&path);
            }
        }
        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("couldn't load configuration from {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("couldn't load configuration from {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            fs::create_dir_all(config_dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn workspace_path(workspace: &Path) -> PathBuf {
        workspace.join(WORKSPACE_CONFIG_FILE)
    }

    fn candidate_paths(workspace: &Path) -> Vec<PathBuf> {
        let mut paths = vec![Self::workspace_path(workspace)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".lct").join("config.toml"));
        }
        paths
    }

    pub fn get_effective_language(&self) -> String {
        effective_language(
            std::env::var("LCT_LANG").ok(),
            &self.display.language,
            std::env::var("LANG").ok(),
        )
    }

    /// `LCT_TUI` overrides `display.tui_mode` when set.
    pub fn use_simple_prompts(&self) -> bool {
        simple_prompts(std::env::var("LCT_TUI").ok(), &self.display.tui_mode)
    }
}

/// `LCT_LANG` wins over the configured language; `auto` reads the system
/// locale (`LANG`) without its encoding suffix.
pub fn effective_language(
    override_lang: Option<String>,
    configured: &str,
    system_lang: Option<String>,
) -> String {
    let language = override_lang.unwrap_or_else(|| configured.to_string());
    if language != "auto" {
        return language;
    }
    system_lang
        .unwrap_or_else(|| "en_US".to_string())
        .split('.')
        .next()
        .unwrap_or("en")
        .to_string()
}

pub fn simple_prompts(tui_override: Option<String>, tui_mode: &str) -> bool {
    match tui_override {
        Some(value) => {
            let value = value.to_lowercase();
            value == "0" || value == "false" || value == "simple"
        }
        None => tui_mode.eq_ignore_ascii_case("simple"),
    }
}
