use super::endpoints::SupabaseEndpoints;
use crate::config::{Config, ServiceRoleKey};
use crate::error::FixerError;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Capability to run a SQL script on the remote database.
pub trait SqlExecutor {
    /// Submit `sql` as one unit. The remote side decides transactionality.
    fn exec_sql(&self, sql: &str) -> impl Future<Output = Result<(), FixerError>> + Send;

    /// Check that `table` is reachable without reading any rows.
    fn probe_table(&self, table: &str) -> impl Future<Output = Result<(), FixerError>> + Send;
}

/// HTTP client bound to one Supabase project and its service-role key.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base: Url,
    key: ServiceRoleKey,
}

impl SupabaseClient {
    pub fn new(cfg: &Config) -> Result<Self, FixerError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("status-fixer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5).min(cfg.request_timeout))
            .timeout(cfg.request_timeout);
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(FixerError::HttpClient)?;
            builder = builder.proxy(proxy);
        }
        let http = builder.build().map_err(FixerError::HttpClient)?;

        Ok(Self {
            http,
            base: cfg.supabase_url.clone(),
            key: cfg.service_role_key.clone(),
        })
    }
}

impl SqlExecutor for SupabaseClient {
    async fn exec_sql(&self, sql: &str) -> Result<(), FixerError> {
        SupabaseEndpoints::exec_sql(&self.http, &self.base, &self.key, sql).await
    }

    async fn probe_table(&self, table: &str) -> Result<(), FixerError> {
        SupabaseEndpoints::probe_table(&self.http, &self.base, &self.key, table).await
    }
}
