use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node: NodeConfig,
    pub storage: StorageConfig,
    /// Email addresses that register straight into the admin role.
    pub admin_emails: Vec<String>,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
    /// Transport-level request body limit in bytes. Upload validation happens
    /// below this limit so oversized images get a proper domain error.
    pub max_request_size: u64,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Local,
    Supabase,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for local storage backend
    pub local_storage_path: String,
    /// Base URL used when the local backend builds public URLs
    pub public_base_url: String,
    /// Supabase project URL (required when backend is supabase)
    pub supabase_url: Option<String>,
    /// Supabase service role key (required when backend is supabase)
    pub supabase_service_key: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            data_dir: "./data".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            local_storage_path: "./media".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            supabase_url: None,
            supabase_service_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let admin_emails: Vec<String> = std::env::var("ADMIN_EMAILS")
            .map(|v| parse_list(&v))
            .unwrap_or_default();

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let max_request_size = std::env::var("MAX_REQUEST_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8 * 1024 * 1024); // 8MB

        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "supabase" => StorageBackend::Supabase,
            _ => StorageBackend::Local,
        };

        let local_storage_path =
            std::env::var("LOCAL_STORAGE_PATH").unwrap_or_else(|_| "./media".to_string());

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let supabase_url = std::env::var("SUPABASE_PROJECT_URL")
            .ok()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
        let supabase_service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let config = Config {
            node: NodeConfig {
                bind_address,
                data_dir,
            },
            storage: StorageConfig {
                backend,
                local_storage_path,
                public_base_url,
                supabase_url,
                supabase_service_key,
            },
            admin_emails,
            test_mode,
            max_request_size,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::Supabase {
            if self.storage.supabase_url.is_none() {
                return Err(ConfigError::ValidationError(
                    "SUPABASE_PROJECT_URL is required when STORAGE_BACKEND=supabase".to_string(),
                ));
            }
            if self.storage.supabase_service_key.is_none() {
                return Err(ConfigError::ValidationError(
                    "SUPABASE_SERVICE_ROLE_KEY is required when STORAGE_BACKEND=supabase"
                        .to_string(),
                ));
            }
        }

        if self.max_request_size < crate::service::upload::MAX_UPLOAD_BYTES as u64 {
            tracing::warn!(
                "MAX_REQUEST_SIZE ({}) is below the upload limit; large images will be \
                 rejected by the transport before validation",
                self.max_request_size
            );
        }

        Ok(())
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
