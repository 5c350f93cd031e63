use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::models::{
    error::AppError,
    metrics::{DailySales, MetricsResult, SalesSlice, Site, SiteDetail, StatusRecord},
    selection::{Dimensions, Selection},
};
use crate::services::aggregate::{SiteSummary, aggregate_results, summarize};
use crate::services::query::{QueryParams, shape};

// ENDPOINTS
const SITES_PATH: &str = "/sites";
const METRICS_PATH: &str = "/dashboard/metrics";
const SALES_DISTRIBUTION_PATH: &str = "/dashboard/charts/sales-distribution";
const DATE_WISE_PATH: &str = "/dashboard/charts/date-wise";
const STATUS_PATH: &str = "/dashboard/status";

// API CONFIGURATION
/// Configuration for the metrics API client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    split_years: bool,
}

impl ApiConfig {
    /// Creates a builder for constructing an `ApiConfig`.
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether multi-year metrics are fetched one year at a time.
    pub fn split_years(&self) -> bool {
        self.split_years
    }

    pub fn sites_url(&self) -> String {
        format!("{}{SITES_PATH}", self.base_url)
    }

    pub fn site_url(&self, id: &str) -> String {
        format!("{}{SITES_PATH}/{}", self.base_url, urlencoding::encode(id.trim()))
    }

    pub fn metrics_url(&self, params: &QueryParams) -> String {
        self.with_query(METRICS_PATH, params)
    }

    pub fn sales_distribution_url(&self, params: &QueryParams) -> String {
        self.with_query(SALES_DISTRIBUTION_PATH, params)
    }

    pub fn date_wise_url(&self, params: &QueryParams) -> String {
        self.with_query(DATE_WISE_PATH, params)
    }

    pub fn status_url(&self, params: &QueryParams) -> String {
        self.with_query(STATUS_PATH, params)
    }

    fn with_query(&self, path: &str, params: &QueryParams) -> String {
        if params.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{}", self.base_url, params.to_query_string())
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfigBuilder::default().build()
    }
}

// API CONFIGURATION BUILDER
/// Builder for constructing an `ApiConfig` with custom settings.
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    base_url: Option<String>,
    split_years: Option<bool>,
}

impl ApiConfigBuilder {
    /// Sets a custom base URL (primarily for testing).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Fetch metrics per year and aggregate, for single-year backends.
    pub fn split_years(mut self, split: bool) -> Self {
        self.split_years = Some(split);
        self
    }

    /// Builds the `ApiConfig`.
    pub fn build(self) -> ApiConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| Config::api_base_url().to_string());

        ApiConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            split_years: self.split_years.unwrap_or(false),
        }
    }
}

// API RESPONSE TYPES
/// Uniform `{ success, data }` envelope returned by every endpoint.
#[derive(Deserialize, Debug)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    pub(crate) fn into_data(self) -> Result<T, AppError> {
        if !self.success {
            return Err(AppError::DataError(
                self.message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| AppError::DataError("Response contained no data".to_string()))
    }
}

// METRICS CLIENT
/// HTTP client for the dashboard metrics API.
pub struct MetricsClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl MetricsClient {
    /// Creates a new client with default configuration.
    pub fn new() -> Result<Self, AppError> {
        Self::with_config(ApiConfig::default())
    }

    /// Creates a new client with the specified configuration.
    pub fn with_config(config: ApiConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Returns a reference to the client's configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn fetch_sites(&self) -> Result<Vec<Site>, AppError> {
        self.fetch(&self.config.sites_url()).await
    }

    pub async fn fetch_site(&self, id: &str) -> Result<SiteDetail, AppError> {
        self.fetch(&self.config.site_url(id)).await
    }

    pub async fn fetch_metrics(&self, params: &QueryParams) -> Result<MetricsResult, AppError> {
        self.fetch(&self.config.metrics_url(params)).await
    }

    /// Metrics for a whole selection, one call per year when configured to
    /// split years.
    pub async fn fetch_metrics_for(&self, selection: &Selection) -> Result<MetricsResult, AppError> {
        if !self.config.split_years || selection.years().len() < 2 {
            return self
                .fetch_metrics(&shape(selection, Dimensions::MONTH_AND_YEAR))
                .await;
        }

        let mut results = Vec::with_capacity(selection.years().len());
        for scoped in selection.per_year() {
            results.push(
                self.fetch_metrics(&shape(&scoped, Dimensions::MONTH_AND_YEAR))
                    .await,
            );
        }
        aggregate_results(results)
    }

    /// Site metadata plus metrics; one failing half does not hide the other.
    pub async fn fetch_site_summary(&self, selection: &Selection) -> Result<SiteSummary, AppError> {
        let id = selection
            .site()
            .id()
            .ok_or_else(|| AppError::DataError("No site selected".to_string()))?;

        summarize(self.fetch_site(id), self.fetch_metrics_for(selection)).await
    }

    pub async fn fetch_sales_distribution(
        &self,
        params: &QueryParams,
    ) -> Result<Vec<SalesSlice>, AppError> {
        self.fetch(&self.config.sales_distribution_url(params)).await
    }

    pub async fn fetch_date_wise(&self, params: &QueryParams) -> Result<Vec<DailySales>, AppError> {
        self.fetch(&self.config.date_wise_url(params)).await
    }

    pub async fn fetch_status(&self, params: &QueryParams) -> Result<StatusRecord, AppError> {
        self.fetch(&self.config.status_url(params)).await
    }

    /// Executes a single GET and unwraps the envelope.
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.error_for_status(status, &body));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::DataError(format!("Failed to parse response: {e}")))?;

        envelope.into_data()
    }

    /// Converts a reqwest error into an appropriate AppError.
    fn classify_error(&self, error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::Transport(format!("Request timeout: {error}"))
        } else if error.is_request() {
            AppError::Transport(format!("Request error: {error}"))
        } else {
            AppError::Transport(format!("Network error: {error}"))
        }
    }

    /// Creates an error based on HTTP status code.
    fn error_for_status(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        error_for_status(status.as_u16(), body)
    }
}

/// Maps a non-2xx status to an error, whatever the body says.
pub(crate) fn error_for_status(status: u16, body: &str) -> AppError {
    match status {
        429 => AppError::RateLimited,
        401 | 403 => AppError::AuthError(format!("Authentication failed: {status}")),
        404 => AppError::NotFound(format!("Resource not found: {body}")),
        400..=499 => AppError::Transport(format!("Client error {status}: {body}")),
        500..=599 => AppError::Transport(format!("Server error {status}: {body}")),
        _ => AppError::Transport(format!("Unexpected status {status}: {body}")),
    }
}

// CONVENIENCE FUNCTIONS
/// Fetches the site list using default configuration.
pub async fn fetch_sites() -> Result<Vec<Site>, AppError> {
    MetricsClient::new()?.fetch_sites().await
}

/// Fetches site metadata and metrics for a selection.
pub async fn fetch_site_summary(selection: Selection) -> Result<SiteSummary, AppError> {
    MetricsClient::new()?.fetch_site_summary(&selection).await
}

pub async fn fetch_sales_distribution(params: QueryParams) -> Result<Vec<SalesSlice>, AppError> {
    MetricsClient::new()?.fetch_sales_distribution(&params).await
}

pub async fn fetch_date_wise(params: QueryParams) -> Result<Vec<DailySales>, AppError> {
    MetricsClient::new()?.fetch_date_wise(&params).await
}

pub async fn fetch_status(params: QueryParams) -> Result<StatusRecord, AppError> {
    MetricsClient::new()?.fetch_status(&params).await
}
