use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::app::ControllerOptions;
use crate::dom::HostCapabilities;
use crate::generation::ClientConfig;

/// Defaults that can live in a config file.
///
/// The API key is deliberately absent: it only comes from the command line
/// or the environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub base_url: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
    pub close_delay_ms: Option<u64>,
    pub no_intersection: bool,
}

impl ConfigFlags {
    /// Merge with `other` taking precedence for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            text_model: other.text_model.clone().or_else(|| self.text_model.clone()),
            image_model: other
                .image_model
                .clone()
                .or_else(|| self.image_model.clone()),
            close_delay_ms: other.close_delay_ms.or(self.close_delay_ms),
            no_intersection: self.no_intersection || other.no_intersection,
        }
    }

    pub fn controller_options(&self) -> ControllerOptions {
        let mut options = ControllerOptions::default();
        if let Some(ms) = self.close_delay_ms {
            options.close_delay = Duration::from_millis(ms);
        }
        options
    }

    /// Host capabilities for documents built by the binary.
    pub fn host_capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            intersection_observer: !self.no_intersection,
            ..HostCapabilities::default()
        }
    }

    pub fn client_config(&self, api_key: Option<String>) -> ClientConfig {
        ClientConfig {
            api_key,
            base_url: self.base_url.clone(),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("showcase").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("showcase")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("showcase").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("showcase")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".showcaserc")
}

/// Global file first, then the local override on top.
pub fn load_layered_flags() -> Result<ConfigFlags> {
    let global = load_config_flags(&global_config_path())?;
    let local = load_config_flags(&local_override_path())?;
    Ok(global.union(&local))
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    let flags = parse_flag_tokens(&tokens);
    tracing::debug!(path = %path.display(), ?flags, "config.loaded");
    Ok(flags)
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# showcase defaults (saved with --save)".to_string()];
    if let Some(url) = &flags.base_url {
        lines.push(format!("--base-url {url}"));
    }
    if let Some(model) = &flags.text_model {
        lines.push(format!("--text-model {model}"));
    }
    if let Some(model) = &flags.image_model {
        lines.push(format!("--image-model {model}"));
    }
    if let Some(ms) = flags.close_delay_ms {
        lines.push(format!("--close-delay-ms {ms}"));
    }
    if flags.no_intersection {
        lines.push("--no-intersection".to_string());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of `tokens`, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        let mut value = || {
            inline.map(ToOwned::to_owned).or_else(|| {
                let next = tokens.get(i + 1).cloned();
                if next.is_some() {
                    i += 1;
                }
                next
            })
        };
        match name {
            "--base-url" => flags.base_url = value(),
            "--text-model" => flags.text_model = value(),
            "--image-model" => flags.image_model = value(),
            "--close-delay-ms" => {
                let raw = value();
                flags.close_delay_ms = raw.as_deref().and_then(|v| v.parse().ok());
                if flags.close_delay_ms.is_none() {
                    tracing::warn!(value = ?raw, "config.invalid_close_delay");
                }
            }
            "--no-intersection" => flags.no_intersection = true,
            _ => {}
        }
        i += 1;
    }
    flags
}
