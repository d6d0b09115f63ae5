// Shared REST plumbing for the two resource services.
//
// Both speak the same envelope: every request and response wraps the
// entity as {"data": ...}. Fetching a missing resource yields Ok(None);
// any other non-success response surfaces as a remote error carrying
// the status and body.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiEndpoint;
use crate::error::{AppError, AppResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wire envelope shared by both services.
#[derive(Debug, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestClient {
    pub fn new(endpoint: &ApiEndpoint) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: format!(
                "{}/api/{}",
                endpoint.host.trim_end_matches('/'),
                endpoint.version
            ),
            token: endpoint.token.clone(),
        })
    }

    fn resource_url(&self, resource: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, resource, id)
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> AppResult<Option<T>> {
        let url = self.resource_url(resource, id);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Remote(format!(
                "GET {} returned {}: {}",
                url, status, error_text
            )));
        }

        let body: Data<T> = response.json().await?;
        Ok(Some(body.data))
    }

    pub async fn patch<T, P>(&self, resource: &str, id: &str, payload: &P) -> AppResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + Sync,
    {
        let url = self.resource_url(resource, id);
        let response = self
            .client
            .patch(&url)
            .basic_auth(&self.token, Some(""))
            .json(&Data { data: payload })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "{}/{} disappeared before the patch landed",
                resource, id
            )));
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Remote(format!(
                "PATCH {} returned {}: {}",
                url, status, error_text
            )));
        }

        let body: Data<T> = response.json().await?;
        Ok(body.data)
    }
}
