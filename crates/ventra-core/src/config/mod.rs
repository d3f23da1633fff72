use crate::error::{Result, VentraError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VentraConfig {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Supabase project the app talks to: identity (GoTrue), relational
/// tables (PostgREST), and CSV blob storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    /// Bucket the raw CSV uploads land in.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Where OAuth sign-ins land after the provider redirect.
    #[serde(default)]
    pub oauth_redirect: Option<String>,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            bucket: default_bucket(),
            oauth_redirect: None,
        }
    }
}

/// The external processing API (CSV parsing, email delivery).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_bucket() -> String {
    "csv".to_string()
}

impl VentraConfig {
    /// Load configuration with a layered merge:
    /// 1. ~/.config/ventra/config.toml (global)
    /// 2. .ventra/config.toml (project)
    /// 3. .ventra/config.local.toml (local, gitignored)
    /// 4. environment (`VENTRA__API__BASE_URL`, `VENTRA__SUPABASE__URL`, ...)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".ventra").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".ventra").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        builder = builder.add_source(Environment::with_prefix("VENTRA").separator("__"));

        let config = builder
            .build()
            .map_err(|e| VentraError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| VentraError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Validate config values, logging warnings. Lenient: fixes what it
    /// can rather than rejecting the config.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.supabase.url.is_empty() {
            warnings.push("supabase.url is not set; auth and store calls will fail".to_string());
        }
        if self.supabase.anon_key.is_empty() {
            warnings.push("supabase.anon_key is not set; requests will be rejected".to_string());
        }
        for (name, value) in [
            ("supabase.url", &mut self.supabase.url),
            ("api.base_url", &mut self.api.base_url),
        ] {
            if value.ends_with('/') {
                warnings.push(format!("{name} has a trailing slash, trimming"));
                *value = value.trim_end_matches('/').to_string();
            }
        }
        if self.supabase.bucket.is_empty() {
            warnings.push("supabase.bucket is empty, using \"csv\"".to_string());
            self.supabase.bucket = default_bucket();
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ventra").join("config.toml"))
}

/// Path to the persisted session file: `~/.config/ventra/session.toml`.
pub fn session_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ventra").join("session.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VentraConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.supabase.bucket, "csv");
        assert!(config.supabase.url.is_empty());
        assert!(config.supabase.oauth_redirect.is_none());
    }

    #[test]
    fn test_load_config_no_files() {
        let config = VentraConfig::load(Some(Path::new("/nonexistent/path"))).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_config_toml_parsing() {
        let toml_str = r#"
[supabase]
url = "https://abc.supabase.co"
anon_key = "anon-123"
bucket = "uploads"

[api]
base_url = "https://api.23ventures.example"
"#;
        let config: VentraConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.supabase.url, "https://abc.supabase.co");
        assert_eq!(config.supabase.anon_key, "anon-123");
        assert_eq!(config.supabase.bucket, "uploads");
        assert_eq!(config.api.base_url, "https://api.23ventures.example");
    }

    #[test]
    fn test_config_backward_compat() {
        // Configs without [api] still load with the default base URL
        let toml_str = r#"
[supabase]
url = "https://abc.supabase.co"
"#;
        let config: VentraConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.supabase.bucket, "csv");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = VentraConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: VentraConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.supabase.bucket, config.supabase.bucket);
    }

    #[test]
    fn test_validate_warns_on_missing_supabase() {
        let mut config = VentraConfig::default();
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("supabase.url")));
        assert!(warnings.iter().any(|w| w.contains("supabase.anon_key")));
    }

    #[test]
    fn test_validate_trims_trailing_slash() {
        let mut config = VentraConfig::default();
        config.supabase.url = "https://abc.supabase.co/".to_string();
        config.supabase.anon_key = "k".to_string();
        config.validate();
        assert_eq!(config.supabase.url, "https://abc.supabase.co");
    }

    #[test]
    fn test_validate_empty_bucket() {
        let mut config = VentraConfig::default();
        config.supabase.bucket = String::new();
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("bucket")));
        assert_eq!(config.supabase.bucket, "csv");
    }
}
