use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::network::Options;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Base address of the resource API
  pub host: Option<String>,
  /// Per-request timeout in seconds (unset waits indefinitely)
  pub timeout_secs: Option<u64>,
  /// Default resource name (singular, e.g. "user")
  pub resource: Option<String>,
  /// Headers added to every request (e.g., Authorization)
  #[serde(default)]
  pub headers: BTreeMap<String, String>,
  /// Write logs to this file instead of stderr
  pub log_file: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./recstore.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/recstore/config.yaml
  ///
  /// A missing file is not an error unless the path was given explicitly;
  /// everything can also come from the command line.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("recstore.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("recstore").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Network options for the configured host.
  pub fn options(&self) -> Result<Options> {
    let host = self
      .host
      .clone()
      .ok_or_else(|| eyre!("No host configured. Pass --host or set `host` in recstore.yaml."))?;

    Ok(Options {
      host: host.trim_end_matches('/').to_string(),
      timeout_secs: self.timeout_secs,
    })
  }

  /// Resource name to use, preferring an explicit override.
  pub fn resource_name(&self, explicit: Option<&str>) -> Result<String> {
    explicit
      .map(String::from)
      .or_else(|| self.resource.clone())
      .ok_or_else(|| eyre!("No resource given. Pass --resource or set `resource` in recstore.yaml."))
  }
}
