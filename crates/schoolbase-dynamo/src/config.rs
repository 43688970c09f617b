//! Connection settings for DynamoDB

use serde::{Deserialize, Serialize};

/// Environment variable overriding the endpoint
pub const ENDPOINT_ENV: &str = "DYNAMODB_ENDPOINT";

/// Environment variable overriding the region
pub const REGION_ENV: &str = "DYNAMODB_REGION";

/// DynamoDB connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamoConfig {
    /// Endpoint URL; `None` uses the SDK's regional endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: Option<String>,
    /// Region name
    #[serde(default = "default_region")]
    pub region: String,
    /// Access key id (DynamoDB Local accepts anything)
    #[serde(default = "default_credential")]
    pub access_key_id: String,
    /// Secret access key
    #[serde(default = "default_credential")]
    pub secret_access_key: String,
    /// Per-operation timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_endpoint() -> Option<String> {
    Some("http://localhost:8000".to_string())
}

fn default_region() -> String {
    "local".to_string()
}

fn default_credential() -> String {
    "dummy".to_string()
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            region: default_region(),
            access_key_id: default_credential(),
            secret_access_key: default_credential(),
            timeout_ms: None,
        }
    }
}

impl DynamoConfig {
    /// Apply `DYNAMODB_ENDPOINT` / `DYNAMODB_REGION` when set
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = var(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(region) = var(REGION_ENV).filter(|v| !v.is_empty()) {
            self.region = region;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_dynamodb_local() {
        let config = DynamoConfig::default();
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.region, "local");
        assert_eq!(config.access_key_id, "dummy");
    }

    #[test]
    fn test_partial_ron() {
        let config: DynamoConfig = ron::from_str(r#"(region: "eu-west-1")"#).unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:8000"));

        let config: DynamoConfig = ron::from_str(r#"(endpoint: None)"#).unwrap();
        assert_eq!(config.endpoint, None);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DynamoConfig::default();
        config.apply_vars(|name| match name {
            ENDPOINT_ENV => Some("http://dynamo:8000".to_string()),
            REGION_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.endpoint.as_deref(), Some("http://dynamo:8000"));
        assert_eq!(config.region, "local");
    }
}
