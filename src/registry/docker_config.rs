// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry credential file (`.dockerconfigjson`) encoding

use crate::constants::secret;
use crate::error::Result;
use k8s_openapi::ByteString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DockerConfigJson {
    pub auths: BTreeMap<String, DockerAuth>,
}

/// Field order is part of the stored format
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DockerAuth {
    pub auth: String,
    pub email: String,
}

/// Encode a registry endpoint and token as a credential file
pub fn encode(endpoint: &str, auth_token: &str) -> Result<Vec<u8>> {
    let config = DockerConfigJson {
        auths: BTreeMap::from([(
            endpoint.to_string(),
            DockerAuth {
                auth: auth_token.to_string(),
                email: secret::EMAIL.to_string(),
            },
        )]),
    };
    Ok(serde_json::to_vec(&config)?)
}

pub fn decode(payload: &[u8]) -> Result<DockerConfigJson> {
    Ok(serde_json::from_slice(payload)?)
}

/// Secret data map holding the encoded credential file under its fixed key
pub fn secret_data(payload: Vec<u8>) -> BTreeMap<String, ByteString> {
    BTreeMap::from([(secret::DATA_KEY.to_string(), ByteString(payload))])
}
