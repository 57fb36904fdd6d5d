use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::PlatformConfig;
use crate::error::ClientError;
use crate::interactions::{InteractionKind, ToggleBackend, ToggleOutput};
use crate::session::Session;
use crate::USER_AGENT;

/// Filter pairs in the query layer's syntax (`col=eq.v`, `order=...`, `limit=N`).
pub type Query<'a> = &'a [(&'a str, String)];

/// Client for one hosted-platform project: the relational query layer under
/// `/rest/v1`, stored procedures under `/rest/v1/rpc`, and file storage under
/// `/storage/v1`. Holds no per-viewer state; the viewer rides on each call.
pub struct Platform {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl Platform {
    pub fn new(config: &PlatformConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap();

        Self {
            base_url: config.url.clone(),
            anon_key: config.anon_key.clone(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public download URL for a storage object.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    fn storage_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }

    /// Every request carries the project key; the bearer token is the
    /// session's when present, the anon key otherwise.
    fn request(
        &self,
        method: Method,
        url: String,
        viewer: Option<&Session>,
    ) -> reqwest::RequestBuilder {
        let token = match viewer {
            Some(session) => session.access_token.as_str(),
            None => self.anon_key.as_str(),
        };
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", token))
    }

    async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ClientError> {
        let status = res.status().as_u16();
        let body = res.text().await?;
        if !(200..300).contains(&status) {
            return Err(ClientError::Http(status, body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query<'_>,
        viewer: Option<&Session>,
    ) -> Result<Vec<T>, ClientError> {
        let res = self
            .request(Method::GET, self.rest_url(table), viewer)
            .query(query)
            .send()
            .await?;
        Self::read_json(res).await
    }

    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query<'_>,
        viewer: Option<&Session>,
    ) -> Result<T, ClientError> {
        let mut limited = query.to_vec();
        limited.push(("limit", "1".to_string()));
        let mut rows: Vec<T> = self.select(table, &limited, viewer).await?;
        if rows.is_empty() {
            return Err(ClientError::NotFound);
        }
        Ok(rows.remove(0))
    }

    pub async fn insert<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        body: &B,
        viewer: Option<&Session>,
    ) -> Result<Vec<T>, ClientError> {
        let res = self
            .request(Method::POST, self.rest_url(table), viewer)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        Self::read_json(res).await
    }

    pub async fn upsert<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        body: &B,
        viewer: Option<&Session>,
    ) -> Result<Vec<T>, ClientError> {
        let res = self
            .request(Method::POST, self.rest_url(table), viewer)
            .header(
                "Prefer",
                "resolution=merge-duplicates,return=representation",
            )
            .json(body)
            .send()
            .await?;
        Self::read_json(res).await
    }

    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        query: Query<'_>,
        body: &B,
        viewer: Option<&Session>,
    ) -> Result<Vec<T>, ClientError> {
        let res = self
            .request(Method::PATCH, self.rest_url(table), viewer)
            .header("Prefer", "return=representation")
            .query(query)
            .json(body)
            .send()
            .await?;
        Self::read_json(res).await
    }

    /// Invoke a stored procedure and decode its JSON result.
    pub async fn rpc<T: DeserializeOwned, B: Serialize>(
        &self,
        function: &str,
        body: &B,
        viewer: Option<&Session>,
    ) -> Result<T, ClientError> {
        let res = self
            .request(Method::POST, self.rpc_url(function), viewer)
            .json(body)
            .send()
            .await?;
        Self::read_json(res).await
    }

    /// Write a storage object and return its public URL.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        viewer: &Session,
    ) -> Result<String, ClientError> {
        let res = self
            .request(Method::POST, self.storage_url(bucket, path), Some(viewer))
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        let status = res.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(ClientError::Http(status, res.text().await?));
        }
        Ok(self.public_url(bucket, path))
    }
}

#[async_trait]
impl ToggleBackend for Platform {
    async fn toggle(
        &self,
        kind: InteractionKind,
        entity_id: &str,
        viewer: Option<&Session>,
    ) -> Result<ToggleOutput, ClientError> {
        self.rpc(
            kind.rpc_function(),
            &serde_json::json!({ "post_id": entity_id }),
            viewer,
        )
        .await
    }
}
