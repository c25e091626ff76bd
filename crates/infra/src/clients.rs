//! Client wiring from configuration

use std::sync::Arc;

use batchpush_core::{
    CustomDataService, DualCustomDataService, DualTransactionalService, HttpTransport,
    TransactionalService,
};
use batchpush_domain::{BatchConfig, ConfigError, Credentials, Platform};

use crate::http::HttpClient;

/// Both dual services built from one [`BatchConfig`], sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct BatchClients {
    pub custom_data: DualCustomDataService,
    pub transactional: DualTransactionalService,
}

impl BatchClients {
    /// Validate `config` and build both services over a reqwest transport.
    ///
    /// # Errors
    /// Returns `ConfigError` for an invalid configuration or when the HTTP
    /// client cannot be built.
    pub fn from_config(config: &BatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = HttpClient::from_config(&config.http)
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {e}")))?;
        Self::with_transport(config, Arc::new(client))
    }

    /// Build both services over a caller-supplied transport.
    ///
    /// # Errors
    /// Returns `ConfigError` for an invalid configuration.
    pub fn with_transport(
        config: &BatchConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let custom_data_service = |platform: Platform| -> Result<CustomDataService, ConfigError> {
            let credentials = Credentials::new(
                config.api_key(platform),
                config.rest_key.as_str(),
                config.custom_data_api_version.as_str(),
            )?;
            Ok(CustomDataService::new(credentials, transport.clone())
                .with_api_domain(&config.api_domain))
        };
        let transactional_service = |platform: Platform| -> Result<TransactionalService, ConfigError> {
            let credentials = Credentials::new(
                config.api_key(platform),
                config.rest_key.as_str(),
                config.transactional_api_version.as_str(),
            )?;
            Ok(TransactionalService::new(credentials, transport.clone())
                .with_api_domain(&config.api_domain))
        };

        let custom_data = DualCustomDataService::from_services(
            custom_data_service(Platform::Ios)?,
            custom_data_service(Platform::Android)?,
        );
        let transactional = DualTransactionalService::from_services(
            transactional_service(Platform::Ios)?,
            transactional_service(Platform::Android)?,
        )
        .with_debug(config.debug);

        tracing::debug!(api_domain = %config.api_domain, "Batch clients ready");
        Ok(Self { custom_data, transactional })
    }
}
