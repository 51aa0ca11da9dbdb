// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcrSyncError {
    #[error("Failed to load kubeconfig: {0}")]
    Kubeconfig(String),

    #[error("Failed to encode registry credential file: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Secret sync failed: {0}")]
    Secret(String),

    #[error("Service account update failed: {0}")]
    ServiceAccount(String),
}

/// Why the registry authority did not hand out a credential
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("registry server error: {0}")]
    ServerError(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unclassified error: {0}")]
    Unclassified(String),

    #[error("no authorization data returned for region {0}")]
    NoAuthorizationData(String),
}

impl FetchError {
    /// Short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::ServerError(_) => "server_error",
            FetchError::InvalidParameter(_) => "invalid_parameter",
            FetchError::Transport(_) => "transport",
            FetchError::Unclassified(_) => "unclassified",
            FetchError::NoAuthorizationData(_) => "no_authorization_data",
        }
    }
}

pub type Result<T> = std::result::Result<T, EcrSyncError>;
