use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding `upstream.url`.
pub const UPSTREAM_URL_ENV: &str = "MOVIEQL_UPSTREAM_URL";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub upstream: UpstreamConfig,
  pub gateway: GatewayConfig,
  pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
  /// Base URL of the REST catalog; endpoint paths are joined under it
  pub url: String,
  pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
  fn default() -> Self {
    Self {
      url: "https://yts.mx/api/v2/".to_string(),
      timeout_secs: 10,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
  /// Address the `serve` command listens on
  pub bind: String,
}

impl Default for GatewayConfig {
  fn default() -> Self {
    Self {
      bind: "127.0.0.1:4000".to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Gateway the `browse` command talks to
  pub gateway_url: String,
  /// Number of movies requested by the list view
  pub limit: Option<u32>,
  /// Minimum rating requested by the list view
  pub min_rating: Option<f64>,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      gateway_url: "http://127.0.0.1:4000/".to_string(),
      limit: Some(20),
      min_rating: None,
    }
  }
}

impl Config {
  /// Load configuration from file, falling back to defaults.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./movieql.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/movieql/config.yaml
  ///
  /// `MOVIEQL_UPSTREAM_URL` overrides the upstream URL either way.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = match explicit_path {
      Some(p) if p.exists() => Some(p.to_path_buf()),
      Some(p) => return Err(eyre!("Config file not found: {}", p.display())),
      None => Self::find_config_file(),
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    if let Ok(url) = std::env::var(UPSTREAM_URL_ENV) {
      config.upstream.url = url;
    }

    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("movieql.yaml");
    if local.exists() {
      return Some(local);
    }

    let xdg_path = dirs::config_dir()?.join("movieql").join("config.yaml");
    xdg_path.exists().then_some(xdg_path)
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file deserializes to unit, not an empty mapping
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))
  }

  /// Directory for the client's log files.
  pub fn data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("movieql"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.upstream.url, "https://yts.mx/api/v2/");
    assert_eq!(config.gateway.bind, "127.0.0.1:4000");
    assert_eq!(config.client.limit, Some(20));
    assert_eq!(config.client.min_rating, None);
  }

  #[test]
  fn test_partial_yaml_keeps_defaults() {
    let config = Config::from_yaml(
      "upstream:\n  url: http://localhost:9000/api/v2\nclient:\n  min_rating: 7.5\n",
    )
    .unwrap();

    assert_eq!(config.upstream.url, "http://localhost:9000/api/v2");
    assert_eq!(config.upstream.timeout_secs, 10);
    assert_eq!(config.client.min_rating, Some(7.5));
    assert_eq!(config.client.limit, Some(20));
    assert_eq!(config.gateway.bind, "127.0.0.1:4000");
  }

  #[test]
  fn test_empty_yaml_is_default() {
    let config = Config::from_yaml("  \n").unwrap();
    assert_eq!(config.gateway.bind, "127.0.0.1:4000");
  }

  #[test]
  fn test_invalid_yaml() {
    assert!(Config::from_yaml("gateway: [1, 2").is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_error() {
    let result = Config::load(Some(Path::new("/nonexistent/movieql.yaml")));
    assert!(result.is_err());
  }
}
