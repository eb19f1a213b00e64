//! Normalized-feed HTTP adapter
//!
//! Each provider is fronted by a feed endpoint that already speaks the
//! normalized record shape. The adapter only does transport, envelope
//! decoding and provenance checks.

use async_trait::async_trait;
use feed_core::{
    verify_provenance, AdapterError, DataType, FetchOutcome, LeagueScope, NormalizedRecord,
    SourceAdapter, SourceId,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{FeedConfigError, FeedEndpoint, FeedsConfig};

/// Envelope status sent by the feed endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedStatus {
    Ok,
    /// Provider has nothing for this key right now (off-season, no live games)
    NoData,
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    status: FeedStatus,
    #[serde(default)]
    records: Vec<NormalizedRecord>,
}

/// Decode a feed body and check that every record belongs to `source`
pub fn decode_feed(source: SourceId, body: &str) -> Result<FetchOutcome, AdapterError> {
    let envelope: FeedEnvelope =
        serde_json::from_str(body).map_err(|e| AdapterError::Decode(e.to_string()))?;

    match envelope.status {
        FeedStatus::NoData => Ok(FetchOutcome::NoData),
        FeedStatus::Ok => {
            verify_provenance(source, &envelope.records)?;
            Ok(FetchOutcome::Records(envelope.records))
        }
    }
}

/// Source adapter backed by `GET {base_url}/{data_type}/{league}`
pub struct HttpFeedAdapter {
    source: SourceId,
    client: Client,
    base_url: String,
}

impl HttpFeedAdapter {
    pub fn new(
        source: SourceId,
        endpoint: &FeedEndpoint,
        feeds: &FeedsConfig,
    ) -> Result<Self, FeedConfigError> {
        let mut headers = HeaderMap::new();
        if let (Some(name), Some(value)) = (&endpoint.auth_header, &endpoint.auth_value) {
            let invalid =
                |message: String| FeedConfigError::InvalidHeader { source_id: source, message };
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let mut value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(feeds.http_timeout())
            .user_agent(feeds.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| FeedConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            source,
            client,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// One adapter per provider, all sharing the same client settings
    pub fn all_from_config(feeds: &FeedsConfig) -> Result<Vec<Self>, FeedConfigError> {
        SourceId::ALL
            .into_iter()
            .map(|source| Self::new(source, feeds.endpoint(source), feeds))
            .collect()
    }

    pub fn url_for(&self, data_type: DataType, scope: LeagueScope) -> String {
        format!("{}/{}/{}", self.base_url, data_type, scope)
    }
}

#[async_trait]
impl SourceAdapter for HttpFeedAdapter {
    fn source(&self) -> SourceId {
        self.source
    }

    async fn fetch(
        &self,
        data_type: DataType,
        scope: LeagueScope,
    ) -> Result<FetchOutcome, AdapterError> {
        if !self.source.serves(data_type) {
            return Err(AdapterError::Unsupported { source_id: self.source, data_type });
        }

        let url = self.url_for(data_type, scope);
        debug!("Fetching {} from: {}", data_type, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AdapterError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Status { status: status.as_u16(), url });
        }

        let body = response.text().await.map_err(|e| AdapterError::Network(e.to_string()))?;
        let outcome = decode_feed(self.source, &body)?;
        info!("Fetched {} {} records for {} from {}", outcome.len(), data_type, scope, self.source);
        Ok(outcome)
    }
}
