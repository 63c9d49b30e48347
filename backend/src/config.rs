use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Upper bound for presigned URL lifetime. Grants are meant to be used
/// right away by the browser that asked for them.
pub const MAX_UPLOAD_TTL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            frontend_dir: None,
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// S3-compatible endpoint, e.g. the OCI compat endpoint. `None` means AWS.
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    /// Base that object keys are appended to when telling the client where
    /// its upload will live.
    pub public_base_url: String,
    pub upload_ttl_secs: u64,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: "ap-mumbai-1".to_string(),
            endpoint_url: None,
            force_path_style: true,
            public_base_url: String::new(),
            upload_ttl_secs: 900,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

fn default_config_path() -> PathBuf {
    match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(manifest_dir) => PathBuf::from(format!("{}/../config/gateway.yaml", manifest_dir)),
        Err(_) => PathBuf::from("config/gateway.yaml"),
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

impl GatewayConfig {
    /// YAML defaults (if the file exists), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("GATEWAY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            log::warn!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse("PORT", v)?;
        }
        if let Some(v) = lookup("FRONTEND_DIR") {
            self.server.frontend_dir = Some(v);
        }
        if let Some(v) = lookup("CORS_ALLOWED_ORIGINS") {
            self.server.allowed_origins = v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("S3_BUCKET_NAME") {
            self.storage.bucket = v;
        }
        if let Some(v) = lookup("AWS_REGION") {
            self.storage.region = v;
        }
        if let Some(v) = lookup("S3_ENDPOINT_URL") {
            self.storage.endpoint_url = Some(v);
        }
        if let Some(v) = lookup("S3_FORCE_PATH_STYLE") {
            self.storage.force_path_style = parse("S3_FORCE_PATH_STYLE", v)?;
        }
        if let Some(v) = lookup("S3_PUBLIC_BASE_URL") {
            self.storage.public_base_url = v;
        }
        if let Some(v) = lookup("UPLOAD_URL_TTL_SECS") {
            self.storage.upload_ttl_secs = parse("UPLOAD_URL_TTL_SECS", v)?;
        }
        if let Some(v) = lookup("S3_ACCESS_KEY_ID") {
            self.storage.access_key_id = Some(v);
        }
        if let Some(v) = lookup("S3_SECRET_ACCESS_KEY") {
            self.storage.secret_access_key = Some(v);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let storage = &self.storage;
        if storage.bucket.trim().is_empty() {
            return Err(ConfigError::Missing("storage.bucket"));
        }
        if storage.public_base_url.trim().is_empty() {
            return Err(ConfigError::Missing("storage.public_base_url"));
        }
        Url::parse(&storage.public_base_url).map_err(|_| ConfigError::InvalidValue {
            key: "storage.public_base_url",
            value: storage.public_base_url.clone(),
        })?;
        if let Some(endpoint) = &storage.endpoint_url {
            Url::parse(endpoint).map_err(|_| ConfigError::InvalidValue {
                key: "storage.endpoint_url",
                value: endpoint.clone(),
            })?;
        }
        if storage.upload_ttl_secs == 0 || storage.upload_ttl_secs > MAX_UPLOAD_TTL_SECS {
            return Err(ConfigError::InvalidValue {
                key: "storage.upload_ttl_secs",
                value: storage.upload_ttl_secs.to_string(),
            });
        }
        if storage.access_key_id.is_some() != storage.secret_access_key.is_some() {
            return Err(ConfigError::Missing("storage.access_key_id/secret_access_key pair"));
        }
        Ok(())
    }

    pub fn frontend_dir(&self) -> String {
        match &self.server.frontend_dir {
            Some(dir) => dir.clone(),
            None => match std::env::var("CARGO_MANIFEST_DIR") {
                Ok(manifest_dir) => format!("{}/../frontend/dist", manifest_dir),
                Err(_) => "/usr/src/app/frontend/dist".to_string(),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.storage.bucket = "facerec-uploads".into();
        config.storage.public_base_url = "https://ns.compat.objectstorage.ap-mumbai-1.oraclecloud.com/facerec-uploads".into();
        config
    }

    #[test]
    fn yaml_fills_only_what_it_names() {
        let config: GatewayConfig = serde_yaml::from_str(
            "storage:\n  bucket: videos\n  upload_ttl_secs: 300\n",
        )
        .unwrap();
        assert_eq!(config.storage.bucket, "videos");
        assert_eq!(config.storage.upload_ttl_secs, 300);
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9000"),
            ("S3_BUCKET_NAME", "other"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, ,http://b.test"),
        ]);
        let mut config = valid();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.bucket, "other");
        assert_eq!(config.server.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn bad_port_is_reported() {
        let mut config = valid();
        let err = config
            .apply_overrides(|k| (k == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn long_lived_grants_are_refused() {
        let mut config = valid();
        assert!(config.validate().is_ok());

        config.storage.upload_ttl_secs = MAX_UPLOAD_TTL_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn half_a_key_pair_is_refused() {
        let mut config = valid();
        config.storage.access_key_id = Some("AKIA".into());
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));
    }
}
