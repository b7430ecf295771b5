//! JSON client for the placement backend (`/api/...`).
//!
//! Errors come back as a non-2xx status with a `{"message": ...}` body.
//! Drafts are validated locally first so obviously incomplete forms never
//! leave the process.

mod types;

use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    Application, ApplicationRequest, Company, CompanyDraft, EvaluationRequest, News, NewsDraft,
    Position, PositionDraft, User, UserDraft, ValidationError,
};

pub use types::PositionQuery;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} ({status})")]
    Status { status: StatusCode, message: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` on every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        };
        warn!("Backend returned {}: {}", status, message);
        Err(ApiError::Status { status, message })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn write<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(method, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::DELETE, path)).await
    }

    // ---- positions ----

    pub async fn list_positions(&self, query: &PositionQuery) -> Result<Vec<Position>, ApiError> {
        let builder = self.request(Method::GET, "/positions").query(&query.to_pairs());
        let positions: Vec<Position> = self.send(builder).await?;
        debug!("Fetched {} positions", positions.len());
        Ok(positions)
    }

    pub async fn get_position(&self, id: &str) -> Result<Position, ApiError> {
        self.get(&format!("/positions/{id}")).await
    }

    pub async fn create_position(&self, draft: &PositionDraft) -> Result<Position, ApiError> {
        draft.validate()?;
        self.write(Method::POST, "/positions", draft).await
    }

    pub async fn update_position(&self, id: &str, draft: &PositionDraft) -> Result<Position, ApiError> {
        draft.validate()?;
        self.write(Method::PUT, &format!("/positions/{id}"), draft).await
    }

    pub async fn delete_position(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/positions/{id}")).await
    }

    // ---- applications ----

    pub async fn submit_application(&self, request: &ApplicationRequest) -> Result<Application, ApiError> {
        request.validate()?;
        self.write(Method::POST, "/applications", request).await
    }

    /// Company accepts or rejects an application
    pub async fn evaluate_application(
        &self,
        id: &str,
        request: &EvaluationRequest,
    ) -> Result<Application, ApiError> {
        request.validate()?;
        self.write(Method::PATCH, &format!("/applications/{id}"), request).await
    }

    /// Student withdraws their own application
    pub async fn retract_application(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/applications/{id}")).await
    }

    pub async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        self.get("/applications/me").await
    }

    pub async fn position_applications(&self, position_id: &str) -> Result<Vec<Application>, ApiError> {
        self.get(&format!("/positions/{position_id}/applications")).await
    }

    // ---- companies ----

    pub async fn list_companies(&self) -> Result<Vec<Company>, ApiError> {
        self.get("/companies").await
    }

    pub async fn get_company(&self, id: &str) -> Result<Company, ApiError> {
        self.get(&format!("/companies/{id}")).await
    }

    pub async fn create_company(&self, draft: &CompanyDraft) -> Result<Company, ApiError> {
        draft.validate()?;
        self.write(Method::POST, "/companies", draft).await
    }

    pub async fn update_company(&self, id: &str, draft: &CompanyDraft) -> Result<Company, ApiError> {
        draft.validate()?;
        self.write(Method::PUT, &format!("/companies/{id}"), draft).await
    }

    pub async fn delete_company(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/companies/{id}")).await
    }

    // ---- users ----

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/users").await
    }

    pub async fn create_user(&self, draft: &UserDraft) -> Result<User, ApiError> {
        draft.validate()?;
        self.write(Method::POST, "/users", draft).await
    }

    pub async fn update_user(&self, id: &str, draft: &UserDraft) -> Result<User, ApiError> {
        draft.validate()?;
        self.write(Method::PUT, &format!("/users/{id}"), draft).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/users/{id}")).await
    }

    // ---- news ----

    pub async fn list_news(&self) -> Result<Vec<News>, ApiError> {
        self.get("/news").await
    }

    pub async fn create_news(&self, draft: &NewsDraft) -> Result<News, ApiError> {
        draft.validate()?;
        self.write(Method::POST, "/news", draft).await
    }

    pub async fn update_news(&self, id: &str, draft: &NewsDraft) -> Result<News, ApiError> {
        draft.validate()?;
        self.write(Method::PUT, &format!("/news/{id}"), draft).await
    }

    pub async fn delete_news(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/news/{id}")).await
    }
}
