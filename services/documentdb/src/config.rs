use crate::constants::*;
use documentdb_core::Context;

/// Config carries all the configuration for a documentdb client.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `DOCUMENTDB_ENDPOINT`
    pub endpoint: Option<String>,
    /// `master_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `DOCUMENTDB_MASTER_KEY`
    pub master_key: Option<String>,
    /// `user_agent` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `DOCUMENTDB_USER_AGENT`
    pub user_agent: Option<String>,
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(DOCUMENTDB_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(DOCUMENTDB_MASTER_KEY) {
            self.master_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(DOCUMENTDB_USER_AGENT) {
            self.user_agent.get_or_insert(v);
        }

        self
    }

    /// Set the endpoint, for example `https://myaccount.documents.azure.com`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the base64 encoded master key.
    pub fn with_master_key(mut self, master_key: impl Into<String>) -> Self {
        self.master_key = Some(master_key.into());
        self
    }

    /// Set the user agent sent with every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
