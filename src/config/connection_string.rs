use std::collections::HashMap;

use crate::error::{AppError, Result};

/// How requests to the storage account are authorized.
#[derive(Clone, PartialEq, Eq)]
pub enum BlobCredentials {
    /// Account key, base64 as it appears in the connection string.
    SharedKey { account_name: String, account_key: String },
    /// Query string of a shared access signature, without the leading `?`.
    SharedAccessSignature(String),
}

impl std::fmt::Debug for BlobCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlobCredentials::SharedKey { account_name, .. } => f
                .debug_struct("SharedKey")
                .field("account_name", account_name)
                .field("account_key", &"[REDACTED]")
                .finish(),
            BlobCredentials::SharedAccessSignature(_) => {
                f.write_str("SharedAccessSignature([REDACTED])")
            }
        }
    }
}

/// Parsed Azure storage connection string.
///
/// Accepts the `Key=Value;Key=Value` form produced by the Azure portal, e.g.
/// `DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net`,
/// as well as SAS strings with an explicit `BlobEndpoint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConnectionString {
    pub blob_endpoint: String,
    pub credentials: BlobCredentials,
}

impl StorageConnectionString {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut fields: HashMap<&str, &str> = HashMap::new();

        for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            // Values (account keys, SAS tokens) may themselves contain '='.
            let (key, value) = part.split_once('=').ok_or_else(|| {
                AppError::ConfigError(format!("Malformed connection string segment '{}'", part))
            })?;
            fields.insert(key.trim(), value.trim());
        }

        let account_name = fields.get("AccountName").copied();

        let blob_endpoint = match fields.get("BlobEndpoint") {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let account = account_name.ok_or_else(|| {
                    AppError::ConfigError(
                        "Connection string has neither BlobEndpoint nor AccountName".to_string(),
                    )
                })?;
                let protocol = fields
                    .get("DefaultEndpointsProtocol")
                    .copied()
                    .unwrap_or("https");
                let suffix = fields
                    .get("EndpointSuffix")
                    .copied()
                    .unwrap_or("core.windows.net");
                format!("{}://{}.blob.{}", protocol, account, suffix)
            }
        };

        let credentials = if let Some(sas) = fields.get("SharedAccessSignature") {
            BlobCredentials::SharedAccessSignature(sas.trim_start_matches('?').to_string())
        } else {
            match (account_name, fields.get("AccountKey")) {
                (Some(name), Some(key)) => BlobCredentials::SharedKey {
                    account_name: name.to_string(),
                    account_key: key.to_string(),
                },
                _ => {
                    return Err(AppError::ConfigError(
                        "Connection string needs AccountName and AccountKey or SharedAccessSignature"
                            .to_string(),
                    ));
                }
            }
        };

        Ok(Self {
            blob_endpoint,
            credentials,
        })
    }
}
