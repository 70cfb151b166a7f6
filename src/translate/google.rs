//! Google Cloud Translation (v2, basic) provider.

use std::{collections::HashSet, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::provider::{ProviderError, TranslationProvider};

const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    format: &'static str,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translations {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Deserialize)]
struct Languages {
    languages: Vec<Language>,
}

#[derive(Deserialize)]
struct Language {
    language: String,
}

pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    api_key: String,
    source_language: Option<String>,
}

impl GoogleTranslator {
    /// Build a translator against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        source_language: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key, source_language, request_timeout)
    }

    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        source_language: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            source_language,
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        match response.status() {
            StatusCode::OK => Ok(response),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::Status {
                    status: status.as_u16(),
                    body: body.trim().to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, ProviderError> {
        let request = TranslateRequest {
            q: text,
            target,
            source: self.source_language.as_deref(),
            format: "text",
        };
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        let envelope: Envelope<Translations> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;

        envelope
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| ProviderError::MalformedResponse("no translations returned".to_string()))
    }

    async fn supported_languages(&self) -> Result<HashSet<String>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/languages", self.endpoint))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        let envelope: Envelope<Languages> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;

        Ok(envelope
            .data
            .languages
            .into_iter()
            .map(|l| l.language.to_lowercase())
            .collect())
    }
}
