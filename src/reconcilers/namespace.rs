// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace reconciler - converges the pull secret and the default service
//! account of one namespace.

use crate::constants::secret;
use crate::error::Result;
use crate::kubernetes::{ensure_pull_secret_reference, sync_secret};
use crate::reconcilers::watcher::NamespaceEventHandler;
use crate::registry::{docker_config, CredentialFetcher};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::{Client, ResourceExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

pub struct NamespaceReconciler {
    client: Client,
    fetcher: Arc<dyn CredentialFetcher>,
    region: String,
    /// Deadline for each cluster call
    api_timeout: Duration,
}

impl NamespaceReconciler {
    pub fn new(
        client: Client,
        fetcher: Arc<dyn CredentialFetcher>,
        region: String,
        api_timeout: Duration,
    ) -> Self {
        Self {
            client,
            fetcher,
            region,
            api_timeout,
        }
    }

    /// Reconcile one namespace. Only a service account failure is returned;
    /// credential and secret failures are logged here.
    #[instrument(skip(self, ns), fields(namespace = %ns.name_any()))]
    pub async fn reconcile(&self, ns: &Namespace) -> Result<()> {
        let name = ns.name_any();

        if ns.metadata.deletion_timestamp.is_some() {
            debug!("Namespace {} is terminating, skipping", name);
            return Ok(());
        }

        let credential = match self.fetcher.fetch(&self.region).await {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    kind = e.kind(),
                    "Failed to fetch ECR token for namespace {}, skipping: {}", name, e
                );
                return Ok(());
            }
        };

        match docker_config::encode(&credential.endpoint, credential.auth_token.expose_secret()) {
            Ok(payload) => {
                match sync_secret(
                    &self.client,
                    &name,
                    secret::NAME,
                    secret::TYPE,
                    docker_config::secret_data(payload),
                    self.api_timeout,
                )
                .await
                {
                    Ok(outcome) => info!("Secret {}/{} {:?}", name, secret::NAME, outcome),
                    Err(e) => error!("Error syncing secret in ns {}: {}", name, e),
                }
            }
            Err(e) => error!("Error encoding credential for ns {}: {}", name, e),
        }

        ensure_pull_secret_reference(&self.client, &name, secret::NAME, self.api_timeout).await?;

        Ok(())
    }
}

#[async_trait]
impl NamespaceEventHandler for NamespaceReconciler {
    async fn on_add(&self, ns: &Namespace) -> Result<()> {
        self.reconcile(ns).await
    }

    async fn on_update(&self, _old: &Namespace, new: &Namespace) -> Result<()> {
        self.reconcile(new).await
    }
}
