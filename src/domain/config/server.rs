use std::time::Duration;

use thiserror::Error;

use super::provider::ProviderConfig;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Process configuration, read once at start and handed to constructors.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub provider: ProviderConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let required = [
            "CLOUDINARY_CLOUD_NAME",
            "CLOUDINARY_API_KEY",
            "CLOUDINARY_API_SECRET",
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .copied()
            .filter(|name| get(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        let mut provider = ProviderConfig::new(
            get("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            get("CLOUDINARY_API_KEY").unwrap_or_default(),
            get("CLOUDINARY_API_SECRET").unwrap_or_default(),
        );

        if let Some(raw) = get("UPLOAD_FOLDER") {
            let folder = raw.trim().trim_matches('/');
            if folder.is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: "UPLOAD_FOLDER",
                    value: raw.clone(),
                });
            }
            provider.folder = folder.to_string();
        }

        if let Some(api_base) = get("CLOUDINARY_API_BASE") {
            provider.api_base = api_base.trim_end_matches('/').to_string();
        }

        if let Some(raw) = get("PROVIDER_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "PROVIDER_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            provider.timeout = Duration::from_secs(secs);
        }

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "PORT",
                    value: raw.clone(),
                })?,
            None => DEFAULT_PORT,
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        });

        Ok(Self {
            port,
            cors_allowed_origins,
            provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const CREDENTIALS: [(&str, &str); 3] = [
        ("CLOUDINARY_CLOUD_NAME", "demo"),
        ("CLOUDINARY_API_KEY", "key"),
        ("CLOUDINARY_API_SECRET", "secret"),
    ];

    #[test]
    fn reports_every_missing_credential() {
        let err = ServerConfig::from_lookup(lookup_from(&[("CLOUDINARY_API_KEY", "key")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVariables(vec!["CLOUDINARY_CLOUD_NAME", "CLOUDINARY_API_SECRET"])
        );
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let mut vars = CREDENTIALS.to_vec();
        vars[2] = ("CLOUDINARY_API_SECRET", "  ");
        let err = ServerConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVariables(vec!["CLOUDINARY_API_SECRET"])
        );
    }

    #[test]
    fn applies_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&CREDENTIALS)).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.cors_allowed_origins.is_none());
        assert_eq!(config.provider.cloud_name, "demo");
        assert_eq!(config.provider.folder, "uploads");
        assert_eq!(config.provider.api_base, "https://api.cloudinary.com/v1_1");
        assert_eq!(config.provider.timeout, Duration::from_secs(60));
    }

    #[test]
    fn reads_optional_overrides() {
        let mut vars = CREDENTIALS.to_vec();
        vars.extend([
            ("PORT", "3000"),
            ("UPLOAD_FOLDER", "/media/"),
            ("CLOUDINARY_API_BASE", "http://localhost:1234/"),
            ("PROVIDER_TIMEOUT_SECS", "15"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
        ]);
        let config = ServerConfig::from_lookup(lookup_from(&vars)).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.provider.folder, "media");
        assert_eq!(config.provider.api_base, "http://localhost:1234");
        assert_eq!(config.provider.timeout, Duration::from_secs(15));
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn rejects_bad_port() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("PORT", "eighty"));
        let err = ServerConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn rejects_folder_made_only_of_slashes() {
        let mut vars = CREDENTIALS.to_vec();
        vars.push(("UPLOAD_FOLDER", " / "));
        let err = ServerConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "UPLOAD_FOLDER",
                value: " / ".to_string()
            }
        );
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = ServerConfig::from_lookup(lookup_from(&CREDENTIALS)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("<redacted>"));
    }
}
