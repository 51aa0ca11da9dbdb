// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from in-cluster or kubeconfig settings

use crate::config::Config;
use crate::error::{EcrSyncError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{info, instrument};

/// Select ring as the process-wide rustls provider. kube and the AWS SDK
/// enable different backends, so rustls cannot pick one on its own.
pub fn install_crypto_provider() {
    // Err means a provider is already installed
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Create the cluster client. Callers treat any error here as fatal.
#[instrument(skip(config))]
pub async fn create_client(config: &Config) -> Result<Client> {
    install_crypto_provider();

    let client_config = client_config(config).await?;

    Client::try_from(client_config)
        .map_err(|e| EcrSyncError::Kubeconfig(format!("Failed to create client: {}", e)))
}

/// Resolve the client configuration. The read timeout keeps kube's default,
/// which outlasts a server-side watch; per-call deadlines are applied by the
/// callers instead.
async fn client_config(config: &Config) -> Result<KConfig> {
    let mut client_config = match &config.kubeconfig {
        Some(path) => {
            info!(
                "Using out-of-cluster config with kubeconfig file: {}",
                path.display()
            );
            config_from_kubeconfig_file(path).await?
        }
        None => {
            info!("Using in-cluster config");
            KConfig::incluster().map_err(|e| {
                EcrSyncError::Kubeconfig(format!("Failed to load in-cluster config: {}", e))
            })?
        }
    };

    if let Some(master_url) = &config.kube_master_url {
        info!("Overriding API server URL with {}", master_url);
        client_config.cluster_url = master_url
            .as_str()
            .parse()
            .map_err(|e| EcrSyncError::Kubeconfig(format!("Invalid master URL: {}", e)))?;
    }

    client_config.connect_timeout = Some(config.api_timeout);
    client_config.write_timeout = Some(config.api_timeout);

    Ok(client_config)
}

async fn config_from_kubeconfig_file(path: &Path) -> Result<KConfig> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        EcrSyncError::Kubeconfig(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let kubeconfig = parse_kubeconfig(&raw)?;

    KConfig::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| EcrSyncError::Kubeconfig(format!("Failed to create config: {}", e)))
}

fn parse_kubeconfig(raw: &str) -> Result<Kubeconfig> {
    serde_yaml::from_str(raw)
        .map_err(|e| EcrSyncError::Kubeconfig(format!("Failed to parse kubeconfig: {}", e)))
}
