use anyhow::{anyhow, Context, Result};

use crate::pipeline::catalog::CatalogSource;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub sanity_project_id: String,
    pub sanity_dataset: String,
    pub sanity_api_token: String,
    pub firebase_api_key: String,
    pub session_secret: String,
    pub session_cookie_name: String,
    pub app_env: String,
    pub catalog_source: CatalogSource,
    /// Unset disables the preview endpoint.
    pub preview_secret: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let catalog = optional("CATALOG_SOURCE", "static");

        Ok(Config {
            gemini_api_key: require("GEMINI_API_KEY")?,
            sanity_project_id: require("SANITY_PROJECT_ID")?,
            sanity_dataset: optional("SANITY_DATASET", "production"),
            sanity_api_token: require("SANITY_API_TOKEN")?,
            firebase_api_key: require("FIREBASE_API_KEY")?,
            session_secret: require("SESSION_SECRET")?,
            session_cookie_name: optional("SESSION_COOKIE_NAME", "mj_session"),
            app_env: optional("APP_ENV", "production"),
            catalog_source: CatalogSource::parse(&catalog)
                .ok_or_else(|| anyhow!("CATALOG_SOURCE must be 'static' or 'cms', got '{catalog}'"))?,
            preview_secret: lookup("PREVIEW_SECRET").filter(|v| !v.is_empty()),
            port: optional("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional("RUST_LOG", "info"),
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(extra: &[(&str, &str)]) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = [
            ("GEMINI_API_KEY", "g"),
            ("SANITY_PROJECT_ID", "abc123"),
            ("SANITY_API_TOKEN", "t"),
            ("FIREBASE_API_KEY", "f"),
            ("SESSION_SECRET", "s"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in extra {
            map.insert(k.to_string(), v.to_string());
        }
        map
    }

    fn load(map: &HashMap<String, String>) -> Result<Config> {
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults_apply() {
        let config = load(&vars(&[])).unwrap();
        assert_eq!(config.sanity_dataset, "production");
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_cookie_name, "mj_session");
        assert_eq!(config.catalog_source, CatalogSource::Static);
        assert!(config.preview_secret.is_none());
        assert!(!config.is_development());
    }

    #[test]
    fn test_missing_required_var_names_it() {
        let mut map = vars(&[]);
        map.remove("SESSION_SECRET");
        let err = load(&map).unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));
    }

    #[test]
    fn test_invalid_port_and_catalog_fail() {
        assert!(load(&vars(&[("PORT", "eighty")])).is_err());
        assert!(load(&vars(&[("CATALOG_SOURCE", "redis")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&vars(&[
            ("CATALOG_SOURCE", "cms"),
            ("APP_ENV", "development"),
            ("PREVIEW_SECRET", "p"),
        ]))
        .unwrap();
        assert_eq!(config.catalog_source, CatalogSource::Cms);
        assert!(config.is_development());
        assert_eq!(config.preview_secret.as_deref(), Some("p"));
    }
}
