//! HTTP access to the analysis service.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::analysis::types::{
    AnalysisResponse, AnalyzeRequest, ParaphraseRequest, ParaphraseResponse,
};

pub const API_KEY_HEADER: &str = "x-api-key";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Server error, please try again later.")]
    Server { status: u16 },

    #[error("API error: Status {status}")]
    Api { status: u16 },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from analysis service: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Map a non-success status to the error shown to the user
    pub fn from_status(status: u16) -> Self {
        if (500..600).contains(&status) {
            AnalysisError::Server { status }
        } else {
            AnalysisError::Api { status }
        }
    }
}

/// The remote side of the analysis pipeline
pub trait AnalysisService {
    fn analyze(&self, text: &str) -> Result<AnalysisResponse, AnalysisError>;

    fn paraphrase(&self, text: &str) -> Result<String, AnalysisError>;
}

/// Blocking client for `POST /analyze/` and `POST /paraphrase/`
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpAnalysisService {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AnalysisError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, AnalysisError> {
        let url = format!("{}/{path}/", self.base_url);
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{url} returned {status}");
            return Err(AnalysisError::from_status(status.as_u16()));
        }
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl AnalysisService for HttpAnalysisService {
    fn analyze(&self, text: &str) -> Result<AnalysisResponse, AnalysisError> {
        self.post(
            "analyze",
            &AnalyzeRequest {
                text: text.to_string(),
            },
        )
    }

    fn paraphrase(&self, text: &str) -> Result<String, AnalysisError> {
        let response: ParaphraseResponse = self.post(
            "paraphrase",
            &ParaphraseRequest {
                text: text.to_string(),
            },
        )?;
        Ok(response.paraphrased_text)
    }
}
