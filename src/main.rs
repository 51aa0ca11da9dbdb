// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use ecrsync::config::Config;
use ecrsync::kubernetes::create_client;
use ecrsync::reconcilers::{NamespaceReconciler, NamespaceWatcher};
use ecrsync::registry::EcrCredentialFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting ecrsync operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: kubeconfig={} aws_region={} aws_access_key_id={} refresh_interval={}s",
        config
            .kubeconfig
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<in-cluster>".to_string()),
        config.aws_region,
        config
            .aws_credentials
            .as_ref()
            .map(|c| c.access_key_id.as_str())
            .unwrap_or("<default chain>"),
        config.refresh_interval.as_secs()
    );

    // Without a client there is nothing to watch
    let client = create_client(&config)
        .await
        .context("Could not create Kubernetes client")?;
    info!("Kubernetes client created");

    let fetcher = EcrCredentialFetcher::from_config(&config).await;

    let reconciler = NamespaceReconciler::new(
        client.clone(),
        Arc::new(fetcher),
        config.aws_region.clone(),
        config.api_timeout,
    );
    let watcher = NamespaceWatcher::new(Arc::new(reconciler), config.refresh_interval);

    watcher.run(client).await?;

    // The watch stream only ends on shutdown
    warn!("Namespace watcher stopped unexpectedly");
    Ok(())
}
