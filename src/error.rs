use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum FixerError {
    #[error("SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY environment variables are required")]
    MissingCredentials,

    #[error("REQUEST_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,

    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("{error} (HTTP {status})")]
    Rpc {
        status: StatusCode,
        error: PostgrestError,
    },
}

impl From<figment::Error> for FixerError {
    fn from(e: figment::Error) -> Self {
        FixerError::Figment(Box::new(e))
    }
}

/// Coarse classification used to pick the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing local configuration; nothing was sent.
    Config,
    /// The remote call failed; the manual fallback applies.
    Remote,
}

impl ErrorKind {
    /// Remote failures are informational: the operator gets the SQL to run
    /// by hand and the process still exits 0.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config => 1,
            ErrorKind::Remote => 0,
        }
    }
}

impl FixerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FixerError::MissingCredentials
            | FixerError::ZeroTimeout
            | FixerError::Figment(_)
            | FixerError::UrlParse(_)
            | FixerError::HttpClient(_) => ErrorKind::Config,
            FixerError::Reqwest(_)
            | FixerError::Json(_)
            | FixerError::UpstreamStatus(_)
            | FixerError::Rpc { .. } => ErrorKind::Remote,
        }
    }
}

/// PostgREST error body, e.g. returned when `exec_sql` is not installed.
#[derive(Deserialize, Debug, Clone)]
pub struct PostgrestError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl fmt::Display for PostgrestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "; hint: {hint}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_message_carries_postgrest_fields() {
        let body = r#"{
            "code": "PGRST202",
            "details": "Searched for the function public.exec_sql with parameter sql",
            "hint": null,
            "message": "Could not find the function public.exec_sql(sql) in the schema cache"
        }"#;
        let error: PostgrestError = serde_json::from_str(body).unwrap();
        let err = FixerError::Rpc {
            status: StatusCode::NOT_FOUND,
            error,
        };

        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(
            err.to_string(),
            "Could not find the function public.exec_sql(sql) in the schema cache [PGRST202] (HTTP 404 Not Found)"
        );
    }

    #[test]
    fn exit_codes_by_kind() {
        assert_eq!(FixerError::MissingCredentials.kind().exit_code(), 1);
        assert_eq!(
            FixerError::UpstreamStatus(StatusCode::FORBIDDEN)
                .kind()
                .exit_code(),
            0
        );
    }
}
