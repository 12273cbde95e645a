use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::gateway::{
    DeleteOutcome, GatewayResult, RequestGateway, SearchCriteria, SearchOutcome,
};
use super::notice::BidNotice;
use crate::config::ApiConfig;
use crate::error::GatewayFailure;
use crate::globals;

/// Gateway talking JSON to the bid notice web API
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    agencies_url: String,
    search_url: String,
    delete_url: String,
    export_url: String,
}

impl HttpGateway {
    /// Use the shared client from `globals`
    pub fn new(api: &ApiConfig) -> Self {
        Self::with_client(api, globals::http_client().clone())
    }

    pub fn with_client(api: &ApiConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            agencies_url: api.url(&api.paths.agencies),
            search_url: api.url(&api.paths.search),
            delete_url: api.url(&api.paths.delete),
            export_url: api.url(&api.paths.export),
        }
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayFailure::transport(format!("HTTP request failed: {}", e)))?;

        read_envelope(response).await
    }
}

#[derive(Serialize)]
struct SelectedIds<'a> {
    selected_ids: &'a [String],
}

/// `{success, error}` wrapper shared by every JSON endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    payload: T,
}

#[derive(Debug, Deserialize)]
struct AgenciesPayload {
    #[serde(default)]
    agencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    data: Vec<BidNotice>,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct DeletePayload {
    #[serde(default)]
    remaining_count: Option<usize>,
    #[serde(default)]
    message: Option<String>,
}

async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> GatewayResult<T> {
    let status = response.status();
    let text = response.text().await.map_err(|e| {
        GatewayFailure::transport(format!("Failed to read response body: {}", e))
    })?;

    decode_envelope(status, &text)
}

/// Interpret a JSON body. An explicit `success: false` is a rejection even
/// on error statuses, since the server reports its failures that way.
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, text: &str) -> GatewayResult<T> {
    match serde_json::from_str::<Envelope<T>>(text) {
        Ok(envelope) if !envelope.success => Err(GatewayFailure::RemoteRejection(envelope.error)),
        Ok(_) if !status.is_success() => Err(GatewayFailure::transport(format!(
            "HTTP request failed with status: {}",
            status
        ))),
        Ok(envelope) => Ok(envelope.payload),
        Err(_) if !status.is_success() => Err(GatewayFailure::transport(format!(
            "HTTP request failed with status: {}",
            status
        ))),
        Err(e) => Err(GatewayFailure::transport(format!(
            "Failed to parse response as JSON: {}",
            e
        ))),
    }
}

#[async_trait]
impl RequestGateway for HttpGateway {
    async fn agencies(&self) -> GatewayResult<Vec<String>> {
        tracing::debug!(url = %self.agencies_url, "GET");
        let response = self
            .client
            .get(&self.agencies_url)
            .send()
            .await
            .map_err(|e| GatewayFailure::transport(format!("HTTP request failed: {}", e)))?;

        let payload: AgenciesPayload = read_envelope(response).await?;
        Ok(payload.agencies)
    }

    async fn search(&self, criteria: &SearchCriteria) -> GatewayResult<SearchOutcome> {
        let payload: SearchPayload = self.post_json(&self.search_url, criteria).await?;
        let count = payload.count.unwrap_or(payload.data.len());

        Ok(SearchOutcome {
            rows: payload.data,
            count,
        })
    }

    async fn delete(&self, ids: &[String]) -> GatewayResult<DeleteOutcome> {
        let payload: DeletePayload = self
            .post_json(&self.delete_url, &SelectedIds { selected_ids: ids })
            .await?;

        let remaining_count = payload.remaining_count.ok_or_else(|| {
            GatewayFailure::transport("Delete response is missing remaining_count")
        })?;

        Ok(DeleteOutcome {
            remaining_count,
            message: payload
                .message
                .unwrap_or_else(|| format!("{}개 항목이 삭제되었습니다.", ids.len())),
        })
    }

    async fn export_spreadsheet(&self, ids: &[String]) -> GatewayResult<Vec<u8>> {
        tracing::debug!(url = %self.export_url, count = ids.len(), "POST");
        let response = self
            .client
            .post(&self.export_url)
            .json(&SelectedIds { selected_ids: ids })
            .send()
            .await
            .map_err(|e| GatewayFailure::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(decode_envelope::<serde_json::Value>(status, &text)
                .err()
                .unwrap_or_else(|| {
                    GatewayFailure::transport(format!(
                        "HTTP request failed with status: {}",
                        status
                    ))
                }));
        }

        let bytes = response.bytes().await.map_err(|e| {
            GatewayFailure::transport(format!("Failed to read response body: {}", e))
        })?;

        Ok(bytes.to_vec())
    }
}
