use std::time::Duration;

use dashboard_core::{DatasetRequest, GraphRequest, ResultsPayload};
use dashboard_logging::{dash_debug, dash_warn};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Where dataset and graph responses come from.
#[async_trait::async_trait]
pub trait ResultsSource: Send + Sync {
    async fn fetch_dataset(&self, request: &DatasetRequest) -> Result<ResultsPayload, FetchError>;

    async fn fetch_graph(&self, request: &GraphRequest) -> Result<serde_json::Value, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestResultsSource {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestResultsSource {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        dash_debug!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            dash_warn!("GET {url} returned {status}");
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        dash_debug!("GET {url} read {} bytes", bytes.len());

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ResultsSource for ReqwestResultsSource {
    async fn fetch_dataset(&self, request: &DatasetRequest) -> Result<ResultsPayload, FetchError> {
        let url = dataset_url(&self.settings.base_url, request)?;
        self.get_json(url).await
    }

    async fn fetch_graph(&self, request: &GraphRequest) -> Result<serde_json::Value, FetchError> {
        let url = graph_url(&self.settings.base_url, request)?;
        self.get_json(url).await
    }
}

/// `{base_url}/{endpoint}?start_date&end_date&offset&size&filter`, leaving
/// out the parameters the request does not carry.
pub fn dataset_url(base_url: &str, request: &DatasetRequest) -> Result<Url, FetchError> {
    let mut url = endpoint_url(base_url, &request.endpoint)?;
    {
        let mut query = url.query_pairs_mut();
        if let Some(start) = &request.start_date {
            query.append_pair("start_date", start);
        }
        if let Some(end) = &request.end_date {
            query.append_pair("end_date", end);
        }
        query.append_pair("offset", &request.offset.to_string());
        if let Some(size) = request.size {
            query.append_pair("size", &size.to_string());
        }
        if let Some(filter) = &request.filter {
            query.append_pair("filter", filter);
        }
    }
    Ok(url)
}

/// `{base_url}/{graph_endpoint}/{item_key}` with the key as one path segment.
pub fn graph_url(base_url: &str, request: &GraphRequest) -> Result<Url, FetchError> {
    let mut url = endpoint_url(base_url, &request.endpoint)?;
    url.path_segments_mut()
        .map_err(|()| FetchError::new(FailureKind::InvalidUrl, "base url cannot hold a path"))?
        .pop_if_empty()
        .push(&request.item_key);
    Ok(url)
}

fn endpoint_url(base_url: &str, endpoint: &str) -> Result<Url, FetchError> {
    let invalid = |err: url::ParseError| FetchError::new(FailureKind::InvalidUrl, err.to_string());
    let mut base = Url::parse(base_url).map_err(invalid)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(endpoint.trim_start_matches('/')).map_err(invalid)
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
