// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client bootstrap and the objects the operator writes.

pub mod client;
pub mod secrets;
pub mod service_accounts;

pub use client::{create_client, install_crypto_provider};
pub use secrets::{sync_secret, SyncOutcome};
pub use service_accounts::ensure_pull_secret_reference;

use std::future::Future;
use std::time::Duration;

/// Bound a single API call by `deadline`. Expiry surfaces as a service error.
async fn within<T>(
    deadline: Duration,
    call: impl Future<Output = kube::Result<T>>,
) -> kube::Result<T> {
    tokio::time::timeout(deadline, call)
        .await
        .unwrap_or_else(|elapsed| Err(kube::Error::Service(Box::new(elapsed))))
}
