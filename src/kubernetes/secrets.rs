// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-or-update of the registry pull secret

use crate::constants::OPERATOR_NAME;
use crate::error::{EcrSyncError, Result};
use crate::kubernetes::within;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, instrument};

/// What a secret sync did to the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
}

/// Write `data` and `type_` to the secret `name` in `namespace`, creating it
/// when it does not exist. Read errors other than not-found are returned
/// without attempting a create. Each API call is bounded by `deadline`.
#[instrument(skip(client, data))]
pub async fn sync_secret(
    client: &Client,
    namespace: &str,
    name: &str,
    type_: &str,
    data: BTreeMap<String, ByteString>,
    deadline: Duration,
) -> Result<SyncOutcome> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let pp = PostParams {
        field_manager: Some(OPERATOR_NAME.to_string()),
        ..Default::default()
    };

    match within(deadline, secrets.get(name)).await {
        Ok(mut existing) => {
            info!("Found existing secret in ns: {}, updating...", namespace);
            existing.data = Some(data);
            existing.type_ = Some(type_.to_string());
            within(deadline, secrets.replace(name, &pp, &existing))
                .await
                .map_err(|e| {
                    EcrSyncError::Secret(format!(
                        "Failed to update secret {}/{}: {}",
                        namespace, name, e
                    ))
                })?;
            Ok(SyncOutcome::Updated)
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            info!("Secret does not exist in ns: {}, creating...", namespace);
            let secret = Secret {
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    namespace: Some(namespace.to_string()),
                    ..Default::default()
                },
                data: Some(data),
                type_: Some(type_.to_string()),
                ..Default::default()
            };
            within(deadline, secrets.create(&pp, &secret))
                .await
                .map_err(|e| {
                    EcrSyncError::Secret(format!(
                        "Failed to create secret {}/{}: {}",
                        namespace, name, e
                    ))
                })?;
            Ok(SyncOutcome::Created)
        }
        Err(e) => Err(EcrSyncError::Secret(format!(
            "Failed to read secret {}/{}: {}",
            namespace, name, e
        ))),
    }
}
