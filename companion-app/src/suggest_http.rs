use async_trait::async_trait;
use companion_core::{CoreError, SuggestRequest, SuggestResponse, SuggestionService};
use reqwest::Client;
use tracing::debug;

/// Posts the request as JSON to a configured endpoint.
pub struct HttpSuggestionService {
    client: Client,
    endpoint: String,
}

impl HttpSuggestionService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SuggestionService for HttpSuggestionService {
    async fn suggest(&self, request: &SuggestRequest) -> Result<SuggestResponse, CoreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|error| CoreError::Integration(format!("network error: {error}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| CoreError::Integration(format!("failed reading response: {error}")))?;
        debug!(%status, bytes = body.len(), "suggestion response");

        if !status.is_success() {
            return Err(CoreError::Integration(format!("service returned {status}")));
        }
        serde_json::from_str(&body)
            .map_err(|error| CoreError::Integration(format!("invalid suggestion payload: {error}")))
    }
}
