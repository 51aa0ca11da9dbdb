// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pull secret references on a namespace's default service account

use crate::constants::{DEFAULT_SERVICE_ACCOUNT, OPERATOR_NAME};
use crate::error::{EcrSyncError, Result};
use crate::kubernetes::within;
use k8s_openapi::api::core::v1::{LocalObjectReference, ServiceAccount};
use kube::{api::PostParams, Api, Client};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Make sure the default service account in `namespace` references
/// `secret_name` exactly once. Returns whether an update was written. Each
/// API call is bounded by `deadline`.
#[instrument(skip(client))]
pub async fn ensure_pull_secret_reference(
    client: &Client,
    namespace: &str,
    secret_name: &str,
    deadline: Duration,
) -> Result<bool> {
    let service_accounts: Api<ServiceAccount> = Api::namespaced(client.clone(), namespace);

    let mut service_account = within(deadline, service_accounts.get(DEFAULT_SERVICE_ACCOUNT))
        .await
        .map_err(|e| {
            EcrSyncError::ServiceAccount(format!(
                "Could not get service account {}/{}: {}",
                namespace, DEFAULT_SERVICE_ACCOUNT, e
            ))
        })?;

    if !add_pull_secret_reference(&mut service_account, secret_name) {
        debug!(
            "Service account {}/{} already references {}",
            namespace, DEFAULT_SERVICE_ACCOUNT, secret_name
        );
        return Ok(false);
    }

    info!(
        "Adding {} to image pull secrets of service account {}/{}",
        secret_name, namespace, DEFAULT_SERVICE_ACCOUNT
    );

    let pp = PostParams {
        field_manager: Some(OPERATOR_NAME.to_string()),
        ..Default::default()
    };
    within(
        deadline,
        service_accounts.replace(DEFAULT_SERVICE_ACCOUNT, &pp, &service_account),
    )
    .await
    .map_err(|e| {
        EcrSyncError::ServiceAccount(format!(
            "Could not update service account {}/{}: {}",
            namespace, DEFAULT_SERVICE_ACCOUNT, e
        ))
    })?;

    Ok(true)
}

/// Append a reference to `secret_name` unless one is already present
pub fn add_pull_secret_reference(service_account: &mut ServiceAccount, secret_name: &str) -> bool {
    let refs = service_account.image_pull_secrets.get_or_insert_with(Vec::new);

    if refs.iter().any(|r| r.name == secret_name) {
        return false;
    }

    refs.push(LocalObjectReference {
        name: secret_name.to_string(),
    });
    true
}
