//! RestTaskStore - PostgREST 互換 REST API 上のタスクストア
//!
//! マネージドなバックエンド（PostgREST を前段に持つ行ストア）の
//! `/rest/v1/{table}` エンドポイントを直接叩きます。
//!
//! # リクエスト
//! - `GET    ?select=*&owner=eq.{owner}&order=date.asc`
//! - `POST   Prefer: return=representation`（採番済みの行を返してもらう）
//! - `PATCH  ?id=eq.{id}&owner=eq.{owner}` body `{"completed": bool}`
//! - `DELETE ?id=eq.{id}&owner=eq.{owner}`
//!
//! すべてのリクエストに `apikey` と `Authorization: Bearer` を付けます。
//! 行レベルの所有権はバックエンドがトークンのクレームで強制します。

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;

use crate::config::StoreConfig;
use crate::domain::{
    Category, Credential, NewTask, OwnerId, Priority, StoreError, Subject, Task, TaskDate, TaskId,
};
use crate::ports::TaskStore;

/// 挿入時の行（id はストアが採番）
#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    owner: &'a OwnerId,
    title: &'a str,
    date: Option<&'a TaskDate>,
    category: Category,
    priority: Priority,
    subject: &'a Subject,
    completed: bool,
}

#[derive(Debug, Serialize)]
struct CompletedPatch {
    completed: bool,
}

pub struct RestTaskStore {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl fmt::Debug for RestTaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestTaskStore")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl RestTaskStore {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        table: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url, api_key, table)
    }

    /// Use a preconfigured client (proxy, TLS, timeouts are the caller's).
    pub fn with_client(
        client: Client,
        base_url: &str,
        api_key: impl Into<String>,
        table: &str,
    ) -> Result<Self, StoreError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(StoreError::Misconfigured("store url is empty".into()));
        }
        if table.trim().is_empty() {
            return Err(StoreError::Misconfigured("table name is empty".into()));
        }
        Ok(Self {
            client,
            endpoint: table_endpoint(base_url, table.trim()),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::new(
            &config.url,
            config.api_key.clone(),
            &config.table,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(credential.expose())
    }
}

fn table_endpoint(base_url: &str, table: &str) -> String {
    format!("{base_url}/rest/v1/{table}")
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// Query for the owner's rows, ascending by date.
fn list_query(owner: &OwnerId) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_string()),
        ("owner", eq(owner.as_str())),
        ("order", "date.asc".to_string()),
    ]
}

/// Filter matching a single row only when both id and owner match.
fn row_filter(id: &TaskId, owner: &OwnerId) -> Vec<(&'static str, String)> {
    vec![("id", eq(id.as_str())), ("owner", eq(owner.as_str()))]
}

/// Turn a non-2xx response into `StoreError::Rejected`.
async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TaskStore for RestTaskStore {
    async fn fetch_all(
        &self,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<Vec<Task>, StoreError> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&list_query(owner));
        let response = ensure_success(self.authorized(request, credential).send().await?).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn insert(
        &self,
        task: &NewTask,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<Task, StoreError> {
        let row = InsertRow {
            owner,
            title: task.title.trim(),
            date: task.date.as_ref(),
            category: task.category,
            priority: task.priority,
            subject: &task.subject,
            completed: false,
        };
        let request = self
            .client
            .post(&self.endpoint)
            .header("Prefer", "return=representation")
            .json(&row);
        let response = ensure_success(self.authorized(request, credential).send().await?).await?;
        let body = response.bytes().await?;
        let mut rows: Vec<Task> = serde_json::from_slice(&body)?;
        if rows.is_empty() {
            return Err(StoreError::EmptyInsert);
        }
        Ok(rows.swap_remove(0))
    }

    async fn set_completed(
        &self,
        id: &TaskId,
        completed: bool,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<(), StoreError> {
        let request = self
            .client
            .patch(&self.endpoint)
            .query(&row_filter(id, owner))
            .header("Prefer", "return=minimal")
            .json(&CompletedPatch { completed });
        ensure_success(self.authorized(request, credential).send().await?).await?;
        Ok(())
    }

    async fn delete(
        &self,
        id: &TaskId,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<(), StoreError> {
        let request = self
            .client
            .delete(&self.endpoint)
            .query(&row_filter(id, owner));
        ensure_success(self.authorized(request, credential).send().await?).await?;
        Ok(())
    }
}
