//! Order source backed by the BigQuery REST API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use ticketdesk_core::OrderRecord;
use tracing::{debug, info, instrument};

use super::config::BigQueryConfig;
use super::credentials::TokenProvider;
use super::rows::{ColumnLayout, JobReference, QueryResponse};
use crate::error::OrderSourceError;
use crate::source::OrderSource;

/// Longest wait BigQuery is asked to hold a single request open.
const MAX_SERVER_WAIT: Duration = Duration::from_secs(10);

/// Response bodies attached to errors are cut to this many bytes.
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    use_legacy_sql: bool,
    max_results: u32,
    timeout_ms: u64,
}

/// Runs the order query through `jobs.query`, then polls and pages through
/// `jobs.getQueryResults` until the job is complete and the row cap is hit.
pub struct BigQueryOrderSource {
    config: BigQueryConfig,
    http: reqwest::Client,
    tokens: TokenProvider,
}

impl BigQueryOrderSource {
    /// Creates a source from its configuration, resolving credentials.
    pub fn new(config: BigQueryConfig) -> Result<Self, OrderSourceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| OrderSourceError::InvalidConfig(format!("http client: {e}")))?;

        let tokens =
            TokenProvider::from_source(config.credentials(), http.clone(), config.metadata_url())?;

        info!(
            table = %config.table_ref(),
            credentials = config.credentials().kind(),
            row_limit = config.row_limit(),
            "BigQuery order source configured"
        );

        Ok(Self {
            config,
            http,
            tokens,
        })
    }

    /// Returns the source configuration.
    pub fn config(&self) -> &BigQueryConfig {
        &self.config
    }

    fn server_wait_ms(&self) -> u64 {
        self.config.timeout().min(MAX_SERVER_WAIT).as_millis() as u64
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<QueryResponse, OrderSourceError> {
        let token = self.tokens.access_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LIMIT {
                let cut = (0..=ERROR_BODY_LIMIT)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(OrderSourceError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| OrderSourceError::decode(format!("query response: {e}")))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> OrderSourceError {
        if err.is_timeout() {
            OrderSourceError::Timeout {
                seconds: self.config.timeout().as_secs(),
            }
        } else {
            OrderSourceError::from(err)
        }
    }

    async fn start_query(&self) -> Result<QueryResponse, OrderSourceError> {
        let sql = self.config.query();
        let url = format!(
            "{}/projects/{}/queries",
            self.config.api_base_url(),
            self.config.project_id()
        );
        let body = QueryRequest {
            query: &sql,
            use_legacy_sql: false,
            max_results: self.config.row_limit(),
            timeout_ms: self.server_wait_ms(),
        };

        self.send(self.http.post(url).json(&body)).await
    }

    async fn query_results(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<QueryResponse, OrderSourceError> {
        let url = format!(
            "{}/projects/{}/queries/{}",
            self.config.api_base_url(),
            job.project_id,
            job.job_id
        );

        let mut params: Vec<(&str, String)> = vec![
            ("timeoutMs", self.server_wait_ms().to_string()),
            ("maxResults", self.config.row_limit().to_string()),
        ];
        if let Some(location) = &job.location {
            params.push(("location", location.clone()));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        self.send(self.http.get(url).query(&params)).await
    }

    #[instrument(skip(self), fields(table = %self.config.table_ref()))]
    async fn run_query(&self) -> Result<Vec<OrderRecord>, OrderSourceError> {
        let started = Instant::now();
        let deadline = started + self.config.timeout();

        let mut page = self.start_query().await?;
        let job = page
            .job_reference
            .clone()
            .ok_or_else(|| OrderSourceError::decode("query response has no jobReference"))?;

        while !page.job_complete {
            if Instant::now() >= deadline {
                return Err(OrderSourceError::Timeout {
                    seconds: self.config.timeout().as_secs(),
                });
            }
            debug!(job_id = %job.job_id, "Query still running, polling");
            page = self.query_results(&job, None).await?;
        }

        let layout = ColumnLayout::from_schema(page.schema.as_ref())?;
        let limit = self.config.row_limit() as usize;
        let mut records = layout.decode_all(&page.rows)?;

        while records.len() < limit {
            let Some(token) = page.page_token.take() else {
                break;
            };
            debug!(job_id = %job.job_id, fetched = records.len(), "Fetching next result page");
            page = self.query_results(&job, Some(&token)).await?;
            records.extend(layout.decode_all(&page.rows)?);
        }

        records.truncate(limit);

        debug!(
            count = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Order query finished"
        );
        Ok(records)
    }
}

#[async_trait]
impl OrderSource for BigQueryOrderSource {
    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, OrderSourceError> {
        self.run_query().await
    }

    async fn health_check(&self) -> Result<(), OrderSourceError> {
        self.tokens.access_token().await.map(|_| ())
    }

    fn name(&self) -> &str {
        "bigquery"
    }
}
