//! HTTP client for a running buildcost server.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::api::ErrorResponse;
use crate::calculator::RateCard;
use crate::models::*;

/// Default URL for local development.
pub const DEFAULT_URL: &str = "http://127.0.0.1:5000/api";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input; carries the server message and offending fields.
    #[error("Bad request: {message}")]
    BadRequest { message: String, fields: Vec<String> },

    #[error("Server error: {0}")]
    Server(String),
}

#[derive(Debug, Clone)]
pub struct EstimatorClient {
    base_url: String,
    client: Client,
}

impl EstimatorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<ErrorResponse> = serde_json::from_str(&body).ok();
        let message = parsed
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| body.clone());

        match status {
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(ClientError::BadRequest {
                    message,
                    fields: parsed.map(|e| e.fields).unwrap_or_default(),
                })
            }
            _ => Err(ClientError::Server(format!("{}: {}", status, message))),
        }
    }

    // ============================================================
    // Project Operations
    // ============================================================

    /// List all projects, newest first.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, "/projects")
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project, ClientError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/projects/{}", id))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn create_project(&self, input: &CreateProjectInput) -> Result<Project, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/projects")
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    // ============================================================
    // Estimation Operations
    // ============================================================

    pub async fn calculate_cost(
        &self,
        input: &CalculateCostInput,
    ) -> Result<CostBreakdown, ClientError> {
        let response = self
            .request(reqwest::Method::POST, "/calculate-cost")
            .json(input)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn rates(&self) -> Result<RateCard, ClientError> {
        let response = self.request(reqwest::Method::GET, "/rates").send().await?;
        self.handle_response(response).await
    }
}
