// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry credential retrieval and encoding.

pub mod docker_config;
pub mod ecr;

pub use ecr::{Credential, CredentialFetcher, EcrCredentialFetcher};
