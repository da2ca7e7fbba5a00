use async_trait::async_trait;
use documentdb_core::{Context, ProvideCredential, Result};
use log::debug;

use crate::constants::DOCUMENTDB_MASTER_KEY;
use crate::MasterKey;

/// EnvCredentialProvider loads the master key from `DOCUMENTDB_MASTER_KEY`.
#[derive(Clone, Debug, Default)]
pub struct EnvCredentialProvider {}

impl EnvCredentialProvider {
    /// Create a new env credential provider.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = MasterKey;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        match ctx.env_var(DOCUMENTDB_MASTER_KEY) {
            Some(key) if !key.is_empty() => Ok(Some(MasterKey::new(key))),
            _ => {
                debug!("{DOCUMENTDB_MASTER_KEY} is not set, no master key loaded");
                Ok(None)
            }
        }
    }
}
