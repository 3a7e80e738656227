use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::Config;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data.db";

/// Load the TOML config file. A missing file means defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

pub fn database_url(config: &Config) -> String {
    resolve_database_url(std::env::var("DATABASE_URL").ok(), config)
}

/// `env_url` wins over the config file, which wins over the default. An
/// empty `env_url` counts as unset.
pub fn resolve_database_url(env_url: Option<String>, config: &Config) -> String {
    let url = env_url
        .filter(|v| !v.is_empty())
        .or_else(|| config.database.url.clone())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
    normalize_sqlite_url(&url)
}

/// Accept SQLAlchemy-style `sqlite:///relative` and `sqlite:////absolute`
/// URLs alongside the native `sqlite://path` form.
pub fn normalize_sqlite_url(url: &str) -> String {
    match url.strip_prefix("sqlite:///") {
        Some(rest) => format!("sqlite://{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sqlite_url() {
        assert_eq!(normalize_sqlite_url("sqlite:///./data.db"), "sqlite://./data.db");
        assert_eq!(normalize_sqlite_url("sqlite:////var/db/a.db"), "sqlite:///var/db/a.db");
        assert_eq!(normalize_sqlite_url("sqlite://data.db"), "sqlite://data.db");
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
    }

    fn config_with_url(url: Option<&str>) -> Config {
        let mut cfg = Config::default();
        cfg.database.url = url.map(|u| u.to_string());
        cfg
    }

    #[test]
    fn test_database_url_default() {
        let cfg = config_with_url(None);
        assert_eq!(resolve_database_url(None, &cfg), DEFAULT_DATABASE_URL);
        assert_eq!(resolve_database_url(None, &cfg), "sqlite://data.db");
    }

    #[test]
    fn test_database_url_from_config_file() {
        let cfg = config_with_url(Some("sqlite://school.db"));
        assert_eq!(resolve_database_url(None, &cfg), "sqlite://school.db");
    }

    #[test]
    fn test_database_url_env_overrides_config() {
        let cfg = config_with_url(Some("sqlite://school.db"));
        assert_eq!(
            resolve_database_url(Some("sqlite://env.db".into()), &cfg),
            "sqlite://env.db"
        );
        assert_eq!(
            resolve_database_url(Some("sqlite:///./env.db".into()), &config_with_url(None)),
            "sqlite://./env.db"
        );
    }

    #[test]
    fn test_database_url_empty_env_is_ignored() {
        let cfg = config_with_url(Some("sqlite://school.db"));
        assert_eq!(
            resolve_database_url(Some(String::new()), &cfg),
            "sqlite://school.db"
        );
        assert_eq!(
            resolve_database_url(Some(String::new()), &config_with_url(None)),
            DEFAULT_DATABASE_URL
        );
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let cfg = load_config(Path::new("/nonexistent/activities.toml")).unwrap();
        assert!(cfg.database.url.is_none());
        assert_eq!(cfg.web.static_dir, "static");
    }

    #[test]
    fn test_parse_config_file() {
        let path = std::env::temp_dir().join(format!("activities-cfg-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[database]\nurl = \"sqlite://school.db\"\n\n[web]\nstatic_dir = \"public\"\n",
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.database.url.as_deref(), Some("sqlite://school.db"));
        assert_eq!(cfg.web.static_dir, "public");
    }
}
