// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pull credentials from the ECR authorization token API

use crate::config::Config;
use crate::constants::OPERATOR_NAME;
use crate::error::FetchError;
use crate::secret_string::SecretString;
use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_ecr::error::{DisplayErrorContext, SdkError};
use aws_sdk_ecr::operation::get_authorization_token::{
    GetAuthorizationTokenError, GetAuthorizationTokenOutput,
};
use tracing::{info, instrument, warn};

/// Registry endpoint plus the token to log in with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub endpoint: String,
    pub auth_token: SecretString,
}

/// Source of registry pull credentials
#[async_trait]
pub trait CredentialFetcher: Send + Sync {
    async fn fetch(&self, region: &str) -> Result<Credential, FetchError>;
}

/// Fetches credentials from ECR using one shared SDK configuration
#[derive(Debug, Clone)]
pub struct EcrCredentialFetcher {
    sdk_config: SdkConfig,
}

impl EcrCredentialFetcher {
    pub fn new(sdk_config: SdkConfig) -> Self {
        Self { sdk_config }
    }

    /// Build the SDK configuration from the default provider chain, or from
    /// static credentials when configured
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(config.api_timeout)
                    .build(),
            );

        if let Some(creds) = &config.aws_credentials {
            info!(
                "Using static AWS credentials with access key id {}",
                creds.access_key_id
            );
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.expose_secret(),
                None,
                None,
                OPERATOR_NAME,
            ));
        } else {
            info!("Using default AWS credential provider chain");
        }

        Self::new(loader.load().await)
    }
}

#[async_trait]
impl CredentialFetcher for EcrCredentialFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, region: &str) -> Result<Credential, FetchError> {
        info!("Fetching ECR token for region: {}", region);

        let ecr_config = aws_sdk_ecr::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        let client = aws_sdk_ecr::Client::from_conf(ecr_config);

        let output = client
            .get_authorization_token()
            .send()
            .await
            .map_err(classify)
            .inspect_err(|e| warn!(kind = e.kind(), "ECR token request failed: {}", e))?;

        credential_from_output(region, &output)
    }
}

fn classify(err: SdkError<GetAuthorizationTokenError>) -> FetchError {
    match err {
        SdkError::ServiceError(context) => classify_service_error(context.into_err()),
        other => FetchError::Transport(DisplayErrorContext(&other).to_string()),
    }
}

fn classify_service_error(err: GetAuthorizationTokenError) -> FetchError {
    match err {
        GetAuthorizationTokenError::ServerException(e) => FetchError::ServerError(e.to_string()),
        GetAuthorizationTokenError::InvalidParameterException(e) => {
            FetchError::InvalidParameter(e.to_string())
        }
        other => FetchError::Unclassified(DisplayErrorContext(&other).to_string()),
    }
}

/// Take the first authorization entry; an empty list is an error, never a panic
fn credential_from_output(
    region: &str,
    output: &GetAuthorizationTokenOutput,
) -> Result<Credential, FetchError> {
    let Some(data) = output.authorization_data().first() else {
        return Err(FetchError::NoAuthorizationData(region.to_string()));
    };

    match (data.proxy_endpoint(), data.authorization_token()) {
        (Some(endpoint), Some(token)) => Ok(Credential {
            endpoint: endpoint.to_string(),
            auth_token: SecretString::new(token.to_string()),
        }),
        _ => Err(FetchError::NoAuthorizationData(region.to_string())),
    }
}
