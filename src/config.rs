// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use crate::secret_string::SecretString;
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Static AWS credentials, used instead of the default provider chain
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
}

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit kubeconfig file, in-cluster configuration when unset
    pub kubeconfig: Option<PathBuf>,
    /// Overrides the API server URL of the selected kubeconfig
    pub kube_master_url: Option<Url>,
    /// Region of the registry to fetch pull credentials from
    pub aws_region: String,
    pub aws_credentials: Option<StaticCredentials>,
    /// Period at which every known namespace is reconciled again
    pub refresh_interval: Duration,
    /// Deadline applied to each cluster and registry call
    pub api_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let aws_region =
            non_empty("AWS_REGION").context("AWS_REGION environment variable not set")?;

        let kube_master_url = non_empty("KUBE_MASTER_URL")
            .map(|raw| Url::parse(&raw).with_context(|| format!("Invalid KUBE_MASTER_URL: {}", raw)))
            .transpose()?;

        let aws_credentials = match (
            non_empty("AWS_ACCESS_KEY_ID"),
            non_empty("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key: SecretString::new(secret_access_key),
            }),
            (None, None) => None,
            _ => bail!("AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together"),
        };

        Ok(Config {
            kubeconfig: non_empty("KUBECONFIG_PATH").map(PathBuf::from),
            kube_master_url,
            aws_region,
            aws_credentials,
            refresh_interval: seconds(
                "REFRESH_INTERVAL_SECS",
                non_empty("REFRESH_INTERVAL_SECS"),
                defaults::REFRESH_INTERVAL_SECS,
            )?,
            api_timeout: seconds(
                "API_TIMEOUT_SECS",
                non_empty("API_TIMEOUT_SECS"),
                defaults::API_TIMEOUT_SECS,
            )?,
        })
    }
}

fn seconds(key: &str, raw: Option<String>, default: u64) -> Result<Duration> {
    let secs = match raw {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{} must be a whole number of seconds, got {}", key, raw))?,
        None => default,
    };
    if secs == 0 {
        bail!("{} must be greater than zero", key);
    }
    Ok(Duration::from_secs(secs))
}
