use crate::domain::entities::page::Page;
use crate::domain::error::DomainError;
use crate::domain::ports::recommendation_api::{
    Credentials, Mutation, PageRequest, RecommendationApi, Registration,
};
use crate::domain::values::resource_kind::ResourceKind;
use crate::infrastructure::http::error_body::extract_message;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// reqwest-backed client for the recommendations REST API.
pub struct HttpRecommendationApi {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
struct MutationResponse {
    #[serde(default)]
    status: bool,
}

impl HttpRecommendationApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(DomainError::Config("api_base_url must not be empty".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(concat!("recsync/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::Transport(format!("request timed out: {e}"))
    } else {
        DomainError::Transport(e.to_string())
    }
}

async fn ensure_success(resp: Response) -> Result<Response, DomainError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(DomainError::Server {
        status: status.as_u16(),
        message: extract_message(&body),
    })
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, DomainError> {
    ensure_success(resp)
        .await?
        .json()
        .await
        .map_err(|e| DomainError::Parse(e.to_string()))
}

#[async_trait::async_trait]
impl RecommendationApi for HttpRecommendationApi {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        request: &PageRequest,
        token: &str,
    ) -> Result<Page, DomainError> {
        let resp = self
            .client
            .get(self.url(kind.path()))
            .query(&request.query_pairs())
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        read_json(resp).await
    }

    async fn mutate(&self, id: &str, mutation: Mutation, token: &str) -> Result<bool, DomainError> {
        let resp = self
            .client
            .post(self.url(&mutation.path(id)))
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport)?;
        let body: MutationResponse = read_json(resp).await?;
        Ok(body.status)
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, DomainError> {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(credentials)
            .send()
            .await
            .map_err(transport)?;
        let body: LoginResponse = read_json(resp).await?;
        body.token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::Parse("login response carried no token".into()))
    }

    async fn register(&self, registration: &Registration) -> Result<(), DomainError> {
        let resp = self
            .client
            .post(self.url("/register"))
            .json(registration)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(resp).await?;
        Ok(())
    }
}
