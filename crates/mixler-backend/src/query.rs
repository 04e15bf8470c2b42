//! Builder for table reads and updates over the REST API.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::client::{read_error, BackendClient, ErrorScope};
use crate::error::BackendError;

const REST_PATH: &str = "/rest/v1";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Query against one table. Built with [`BackendClient::from`].
#[derive(Debug)]
pub struct TableQuery<'a> {
    client: &'a BackendClient,
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<usize>,
}

impl<'a> TableQuery<'a> {
    pub(crate) fn new(client: &'a BackendClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    /// Keep rows whose `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{}.{}", column, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn url(&self, with_select: bool) -> Result<url::Url, BackendError> {
        let raw = format!("{}{}/{}", self.client.base_url(), REST_PATH, self.table);
        let mut url = url::Url::parse(&raw)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", raw, e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            if with_select {
                pairs.append_pair("select", &self.columns);
            }
            for (column, filter) in &self.filters {
                pairs.append_pair(column, filter);
            }
            if let Some(order) = &self.order {
                pairs.append_pair("order", order);
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }

        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: url::Url) -> reqwest::RequestBuilder {
        self.client
            .http()
            .request(method, url)
            .header("apikey", self.client.anon_key())
            .bearer_auth(self.client.bearer_token())
    }

    /// Fetch all matching rows.
    #[instrument(skip(self), fields(table = %self.table), level = "debug")]
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>, BackendError> {
        let url = self.url(true)?;
        let response = self.request(reqwest::Method::GET, url).send().await?;
        self.client.handle_response(response, ErrorScope::Table).await
    }

    /// Fetch exactly one row. Zero or several matches yield
    /// [`BackendError::NotFound`].
    #[instrument(skip(self), fields(table = %self.table), level = "debug")]
    pub async fn single<T: DeserializeOwned>(self) -> Result<T, BackendError> {
        let url = self.url(true)?;
        let response = self
            .request(reqwest::Method::GET, url)
            .header("Accept", SINGLE_OBJECT)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(format!("table '{}'", self.table)));
        }
        self.client.handle_response(response, ErrorScope::Table).await
    }

    /// Like [`single`](Self::single) but a missing row is `None`.
    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>, BackendError> {
        match self.single().await {
            Ok(row) => Ok(Some(row)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Apply `values` to every matching row. Refuses to run unfiltered.
    #[instrument(skip(self, values), fields(table = %self.table), level = "debug")]
    pub async fn update<B: Serialize + ?Sized>(self, values: &B) -> Result<(), BackendError> {
        if self.filters.is_empty() {
            return Err(BackendError::InvalidRequest(format!(
                "update on '{}' without a filter",
                self.table
            )));
        }

        let url = self.url(false)?;
        let response = self
            .request(reqwest::Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(values)
            .send()
            .await?;

        if response.status().is_success() {
            tracing::debug!("Updated rows in {}", self.table);
            Ok(())
        } else {
            Err(read_error(response, ErrorScope::Table).await)
        }
    }
}
