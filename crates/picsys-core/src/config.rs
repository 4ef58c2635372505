//! Connection settings for the processing service.

use serde::{Deserialize, Serialize};

use crate::error::PicsysError;

/// Where requests go and which multipart field names the service reads.
///
/// The defaults match the service's stock deployment. Every field can be
/// overridden from JSON; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Absolute `http(s)` URL of the processing endpoint.
    pub endpoint: String,

    /// Field carrying the JSON array of operation names.
    pub methods_field: String,

    /// Field carrying the primary image.
    pub upload_field: String,

    /// Field carrying the second image for combination operations.
    pub second_upload_field: String,

    /// Send schema defaults for untouched parameters instead of leaving
    /// them out.
    pub explicit_defaults: bool,
}

impl ServiceConfig {
    /// Endpoint used when nothing else is configured.
    pub const DEFAULT_ENDPOINT: &'static str = "http://localhost:8000/process";

    /// Defaults, with the endpoint taken from the `PICSYS_ENDPOINT`
    /// environment variable at compile time when it was set.
    #[must_use]
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(endpoint) = option_env!("PICSYS_ENDPOINT") {
            config.endpoint = endpoint.to_owned();
        }
        config
    }

    /// Parse a (possibly partial) JSON configuration and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`PicsysError::InvalidConfig`] if the JSON is malformed or
    /// the resulting configuration fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, PicsysError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PicsysError::InvalidConfig(format!("malformed JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the endpoint is an `http(s)` URL and that no field
    /// name is empty or shared between two roles.
    ///
    /// # Errors
    ///
    /// Returns [`PicsysError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), PicsysError> {
        let endpoint = self.endpoint.trim();
        let Some(rest) = endpoint
            .strip_prefix("http://")
            .or_else(|| endpoint.strip_prefix("https://"))
        else {
            return Err(PicsysError::InvalidConfig(format!(
                "endpoint must start with http:// or https://, got {:?}",
                self.endpoint
            )));
        };
        if rest.is_empty() {
            return Err(PicsysError::InvalidConfig("endpoint has no host".into()));
        }

        let fields = [
            ("methods_field", &self.methods_field),
            ("upload_field", &self.upload_field),
            ("second_upload_field", &self.second_upload_field),
        ];
        for (role, name) in fields {
            if name.trim().is_empty() {
                return Err(PicsysError::InvalidConfig(format!("{role} is empty")));
            }
        }
        if self.methods_field == self.upload_field
            || self.methods_field == self.second_upload_field
            || self.upload_field == self.second_upload_field
        {
            return Err(PicsysError::InvalidConfig(
                "field names must be distinct".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
            methods_field: "methods".to_owned(),
            upload_field: "upload".to_owned(),
            second_upload_field: "upload2".to_owned(),
            explicit_defaults: false,
        }
    }
}
