#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatResponse;
use crate::domain::models::DeskError;
use crate::domain::models::DeskResult;
use crate::domain::models::Filing;
use crate::domain::models::FilingsBackend;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DocumentResponse {
    content: String,
}

/// REST client for the filings API.
pub struct HttpBackend {
    url: String,
    token: String,
    timeout: String,
    client: reqwest::Client,
}

impl Default for HttpBackend {
    fn default() -> HttpBackend {
        return HttpBackend::new(
            &Config::get(ConfigKey::ApiUrl),
            &Config::get(ConfigKey::ApiToken),
            &Config::get(ConfigKey::BackendHealthCheckTimeout),
        );
    }
}

impl HttpBackend {
    pub fn new(url: &str, token: &str, timeout: &str) -> HttpBackend {
        return HttpBackend {
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout: timeout.to_string(),
            client: reqwest::Client::new(),
        };
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.is_empty() {
            return req;
        }
        return req.bearer_auth(&self.token);
    }

    async fn decode<T: DeserializeOwned>(&self, context: &str, res: reqwest::Response) -> DeskResult<T> {
        let status = res.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DeskError::NotFound(context.to_string()));
        }
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), context, "Filings API request failed");
            return Err(DeskError::TransientNetwork(format!(
                "{context} returned status {}",
                status.as_u16()
            )));
        }

        let body = res.text().await?;
        tracing::debug!(context, body = %body, "Filings API response");

        return serde_json::from_str(&body).map_err(|err| return DeskError::serialization(context, err));
    }
}

#[async_trait]
impl FilingsBackend for HttpBackend {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> DeskResult<()> {
        let timeout = self
            .timeout
            .parse::<u64>()
            .map_err(|err| return DeskError::Validation(format!("health check timeout: {err}")))?;

        let res = self
            .client
            .get(format!("{url}/health", url = self.url))
            .timeout(Duration::from_millis(timeout))
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Filings API is not reachable");
                return Err(DeskError::TransientNetwork(format!(
                    "Filings API at {} is not reachable",
                    self.url
                )));
            }
        };

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Filings API health check failed");
            return Err(DeskError::TransientNetwork(
                "Filings API health check failed".to_string(),
            ));
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn chat(&self, request: &ChatRequest) -> DeskResult<ChatResponse> {
        tracing::debug!(ticker = %request.ticker, turns = request.chat_history.len(), "Sending chat request");

        let res = self
            .authorize(self.client.post(format!("{url}/api/chat", url = self.url)))
            .json(request)
            .send()
            .await?;

        return self.decode("chat response", res).await;
    }

    #[allow(clippy::implicit_return)]
    async fn list_filings(&self, ticker: &str) -> DeskResult<Vec<Filing>> {
        let res = self
            .authorize(self.client.get(format!(
                "{url}/api/filings/{ticker}",
                url = self.url,
                ticker = ticker.trim().to_uppercase()
            )))
            .send()
            .await?;

        return self.decode(&format!("filings for {ticker}"), res).await;
    }

    #[allow(clippy::implicit_return)]
    async fn fetch_document(&self, ticker: &str, accession_number: &str) -> DeskResult<String> {
        let res = self
            .authorize(self.client.get(format!(
                "{url}/api/filings/{ticker}/{accession_number}",
                url = self.url,
                ticker = ticker.trim().to_uppercase()
            )))
            .send()
            .await?;

        let document: DocumentResponse = self
            .decode(&format!("filing {accession_number}"), res)
            .await?;

        return Ok(document.content);
    }
}
