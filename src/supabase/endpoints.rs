use crate::config::ServiceRoleKey;
use crate::error::{FixerError, PostgrestError};

use reqwest::Response;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

const EXEC_SQL_RPC: &str = "rest/v1/rpc/exec_sql";
const REST_PREFIX: &str = "rest/v1/";

#[derive(Serialize)]
struct ExecSqlParams<'a> {
    sql: &'a str,
}

/// Stateless Supabase REST endpoints.
pub(super) struct SupabaseEndpoints;

impl SupabaseEndpoints {
    /// Call the `exec_sql` database function with the whole script as its
    /// single `sql` argument.
    pub(super) async fn exec_sql(
        http_client: &reqwest::Client,
        base: &Url,
        key: &ServiceRoleKey,
        sql: &str,
    ) -> Result<(), FixerError> {
        let url = base.join(EXEC_SQL_RPC)?;
        debug!(url = %url, bytes = sql.len(), "submitting exec_sql");

        let resp = http_client
            .post(url)
            .header("apikey", key.expose())
            .bearer_auth(key.expose())
            .header("Accept", "application/json")
            .json(&ExecSqlParams { sql })
            .send()
            .await?;

        check_response(resp).await?;
        info!("exec_sql accepted by remote");
        Ok(())
    }

    /// Zero-row select against `table`; succeeds when the table is
    /// reachable with the given key.
    pub(super) async fn probe_table(
        http_client: &reqwest::Client,
        base: &Url,
        key: &ServiceRoleKey,
        table: &str,
    ) -> Result<(), FixerError> {
        let mut url = base.join(REST_PREFIX)?.join(table)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("limit", "0");

        let resp = http_client
            .get(url)
            .header("apikey", key.expose())
            .bearer_auth(key.expose())
            .header("Accept", "application/json")
            .send()
            .await?;

        check_response(resp).await
    }
}

/// Map a non-2xx response to a structured error, preferring the PostgREST
/// error body when the server sent one.
async fn check_response(resp: Response) -> Result<(), FixerError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }

    let body = resp.bytes().await?;
    match serde_json::from_slice::<PostgrestError>(&body) {
        Ok(error) => Err(FixerError::Rpc { status, error }),
        Err(_) => {
            debug!(%status, body = %String::from_utf8_lossy(&body), "non-PostgREST error body");
            Err(FixerError::UpstreamStatus(status))
        }
    }
}
