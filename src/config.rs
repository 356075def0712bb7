use anyhow::{Context, Result};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::describe::builtin_template;
use crate::model::ResourceKind;

const DEFAULT_PICKER_HEIGHT: usize = 7;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct KandieConfig {
    pub namespace: Option<String>,
    pub context: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    /// Resource kind to template file, replacing the built-in template.
    pub templates: BTreeMap<String, PathBuf>,
    pub picker: PickerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub height: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_PICKER_HEIGHT,
        }
    }
}

impl KandieConfig {
    pub fn discover() -> Result<Self> {
        let Some(path) = discover_config_path() else {
            debug!("no config file found, using defaults");
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::parse(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn picker_height(&self) -> usize {
        self.picker.height.max(1)
    }

    pub fn template_source(&self, kind: ResourceKind) -> Result<Cow<'static, str>> {
        match self.templates.get(kind.title()) {
            Some(path) => {
                let raw = fs::read_to_string(expand_home(path)).with_context(|| {
                    format!("failed to read {} template {}", kind.title(), path.display())
                })?;
                Ok(Cow::Owned(raw))
            }
            None => Ok(Cow::Borrowed(builtin_template(kind))),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    path.to_path_buf()
}

fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("KANDIE_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let cwd_candidates = [PathBuf::from("kandie.yaml"), PathBuf::from(".kandie.yaml")];
    for candidate in cwd_candidates {
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let user_candidates = [
            PathBuf::from(&home).join(".config/kandie/config.yaml"),
            PathBuf::from(&home).join(".config/kandie/config.yml"),
        ];
        for candidate in user_candidates {
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    None
}
