// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The operator name used as field manager on writes
pub const OPERATOR_NAME: &str = "ecrsync";

/// Pull secret written into every namespace
pub mod secret {
    /// Name of the pull secret, identical in every namespace
    pub const NAME: &str = "ecrsecret";
    /// Secret type understood by the kubelet image puller
    pub const TYPE: &str = "kubernetes.io/dockerconfigjson";
    /// Data key holding the registry credential file
    pub const DATA_KEY: &str = ".dockerconfigjson";
    /// Email recorded in the credential file
    pub const EMAIL: &str = "none";
}

/// Service account that gets the pull secret reference
pub const DEFAULT_SERVICE_ACCOUNT: &str = "default";

/// Configuration defaults
pub mod defaults {
    /// Resync period in seconds
    pub const REFRESH_INTERVAL_SECS: u64 = 60;
    /// Deadline for a single cluster or registry call, in seconds
    pub const API_TIMEOUT_SECS: u64 = 5;
}
