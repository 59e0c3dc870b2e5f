//! HttpQueryRunner: runs queries through the Neo4j HTTP transactional API
//!
//! Each query is a single auto-commit transaction:
//! `POST {url}/db/{database}/tx/commit`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{Params, QueryResult, QueryRunner, Row};
use crate::config::ClientConfig;
use crate::error::{GdsError, GdsResult};

#[derive(Serialize)]
struct Statement<'a> {
    statement: &'a str,
    parameters: &'a Params,
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    statements: Vec<Statement<'a>>,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<ServerError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    columns: Vec<String>,
    data: Vec<DataRow>,
}

#[derive(Debug, Deserialize)]
struct DataRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    code: String,
    message: String,
}

/// Network runner that talks to a Neo4j server over HTTP.
pub struct HttpQueryRunner {
    commit_url: String,
    user: Option<String>,
    password: Option<String>,
    http_client: Client,
}

impl HttpQueryRunner {
    /// Create a runner from a validated configuration.
    ///
    /// # Example
    /// ```no_run
    /// # use graphdatascience::{ClientConfig, HttpQueryRunner};
    /// let runner = HttpQueryRunner::new(&ClientConfig::default()).unwrap();
    /// ```
    pub fn new(config: &ClientConfig) -> GdsResult<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GdsError::ConfigError(e.to_string()))?;

        Ok(Self {
            commit_url: format!(
                "{}/db/{}/tx/commit",
                config.url.trim_end_matches('/'),
                config.database
            ),
            user: config.user.clone(),
            password: config.password.clone(),
            http_client,
        })
    }

    pub fn commit_url(&self) -> &str {
        &self.commit_url
    }
}

/// Turn the transactional API's column/row layout into keyed rows.
fn into_query_result(response: CommitResponse) -> GdsResult<QueryResult> {
    if let Some(error) = response.errors.into_iter().next() {
        return Err(GdsError::QueryError(format!("{}: {}", error.code, error.message)));
    }

    let Some(statement) = response.results.into_iter().next() else {
        return Ok(QueryResult::default());
    };

    let rows = statement
        .data
        .into_iter()
        .map(|data| {
            statement
                .columns
                .iter()
                .cloned()
                .zip(data.row)
                .collect::<Row>()
        })
        .collect();

    Ok(QueryResult {
        columns: statement.columns,
        rows,
    })
}

#[async_trait]
impl QueryRunner for HttpQueryRunner {
    async fn run_query(&self, query: &str, params: Option<Params>) -> GdsResult<QueryResult> {
        let params = params.unwrap_or_default();
        let params_json = Value::Object(params.clone());
        debug!(query = query.trim(), params = %params_json, "running query");

        let body = CommitRequest {
            statements: vec![Statement {
                statement: query,
                parameters: &params,
            }],
        };

        let mut request = self.http_client.post(&self.commit_url).json(&body);
        if let Some(user) = &self.user {
            request = request.basic_auth(user, self.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            let response: CommitResponse = response.json().await?;
            return into_query_result(response);
        }

        // Neo4j reports auth and routing failures in the same `errors` layout
        let body = response.bytes().await?;
        match serde_json::from_slice::<CommitResponse>(&body) {
            Ok(decoded) if !decoded.errors.is_empty() => into_query_result(decoded),
            _ => Err(GdsError::ConnectionError(format!(
                "{} returned {}",
                self.commit_url, status
            ))),
        }
    }
}
