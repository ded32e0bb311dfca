//! Configuration loader with layered merging.

use super::merge::deep_merge_all;
use super::types::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "TASK_LIST_CONFIG_PATH";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "task-list.yaml";

/// Loads configuration from defaults, an optional YAML file, and the
/// environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Config,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load from the process environment, reading `.env` first if present.
    ///
    /// `explicit` takes the place of `$TASK_LIST_CONFIG_PATH` when given.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        let explicit = explicit.map(|p| p.to_string_lossy().into_owned());
        Self::load_with_env(|key| match (key, &explicit) {
            (CONFIG_PATH_ENV, Some(path)) => Some(path.clone()),
            _ => std::env::var(key).ok(),
        })
    }

    /// Load using `env` to look up variables.
    pub fn load_with_env<F>(env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut layers: Vec<Value> = vec![serde_json::to_value(Config::default())?];

        let config_path = match env(CONFIG_PATH_ENV) {
            Some(explicit) => Some(PathBuf::from(explicit)),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.exists().then_some(local)
            }
        };

        if let Some(ref path) = config_path {
            layers.push(read_yaml(path)?);
        }

        let merged = deep_merge_all(layers);
        let mut config: Config =
            serde_json::from_value(merged).context("Invalid configuration file")?;

        apply_env_overrides(&mut config, &env)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The config file that was read, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn into_config(self) -> Config {
        self.config
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_yaml::from_str::<Value>(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn apply_env_overrides<F>(config: &mut Config, env: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = env("HOST") {
        config.server.host = host;
    }
    if let Some(port) = parse_env(env, "PORT")? {
        config.server.port = port;
    }
    if let Some(public_dir) = env("PUBLIC_DIR") {
        config.server.public_dir = PathBuf::from(public_dir);
    }
    if let Some(cors) = env("CORS") {
        config.server.cors = parse_flag(&cors)
            .with_context(|| format!("CORS must be true or false, got {:?}", cors))?;
    }
    if let Some(db_path) = env("DB_PATH") {
        config.database.path = PathBuf::from(db_path);
    }
    if let Some(pool_size) = parse_env(env, "DB_POOL_SIZE")? {
        config.database.pool_size = pool_size;
    }
    Ok(())
}

fn parse_env<F, T>(env: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = env_from(&[
            ("PORT", "8081"),
            ("DB_PATH", "/var/lib/tasks.db"),
            ("DB_POOL_SIZE", "4"),
            ("CORS", "yes"),
        ]);
        let config = ConfigLoader::load_with_env(env).unwrap().into_config();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.path, PathBuf::from("/var/lib/tasks.db"));
        assert_eq!(config.database.pool_size, 4);
        assert!(config.server.cors);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn invalid_port_names_the_variable() {
        let env = env_from(&[("PORT", "eighty")]);
        let err = ConfigLoader::load_with_env(env).unwrap_err();
        assert!(format!("{:#}", err).contains("PORT"));
    }

    #[test]
    fn file_layer_sits_between_defaults_and_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task-list.yaml");
        std::fs::write(
            &path,
            "server:\n  port: 9000\n  public_dir: web\ndatabase:\n  pool_size: 2\n",
        )
        .unwrap();

        let path_str = path.to_string_lossy().to_string();
        let env = env_from(&[(CONFIG_PATH_ENV, path_str.as_str()), ("DB_POOL_SIZE", "6")]);
        let loader = ConfigLoader::load_with_env(env).unwrap();

        assert_eq!(loader.config_path(), Some(path.as_path()));
        let config = loader.config();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.public_dir, PathBuf::from("web"));
        assert_eq!(config.database.pool_size, 6);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let env = env_from(&[(CONFIG_PATH_ENV, "/nonexistent/task-list.yaml")]);
        assert!(ConfigLoader::load_with_env(env).is_err());
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
