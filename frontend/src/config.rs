/// Endpoints baked in at build time (`trunk build` picks them up from the
/// environment).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Candidate, HR, meeting and verification API.
    pub api_base_url: String,
    /// Object storage prefix that relative document paths hang off.
    pub storage_base_url: String,
    /// Gateway issuing presigned upload URLs. Empty means same origin.
    pub gateway_base_url: String,
}

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_STORAGE_BASE_URL: &str = "https://objectstorage.ap-mumbai-1.oraclecloud.com";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_base_url: DEFAULT_STORAGE_BASE_URL.to_string(),
            gateway_base_url: String::new(),
        }
    }
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: option_env!("PORTAL_API_BASE_URL")
                .map(String::from)
                .unwrap_or(defaults.api_base_url),
            storage_base_url: option_env!("PORTAL_STORAGE_BASE_URL")
                .map(String::from)
                .unwrap_or(defaults.storage_base_url),
            gateway_base_url: option_env!("PORTAL_GATEWAY_BASE_URL")
                .map(String::from)
                .unwrap_or(defaults.gateway_base_url),
        }
    }
}
