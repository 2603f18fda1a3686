//! InMemoryTaskStore - テスト・オフライン用のタスクストア
//!
//! # 実装詳細
//! - 挿入順の Vec<Task> を tokio の Mutex で保護
//! - fetch_all は owner で絞り込み、date 昇順（同日は挿入順）で返す
//! - id は IdGenerator で採番
//! - credential は空でないことだけを確認する（署名検証はしない）

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Credential, NewTask, OwnerId, StoreError, Task, TaskId};
use crate::engine::sort_by_date;
use crate::ports::{IdGenerator, TaskStore};

/// InMemoryTaskStore は owner スコープ付きの行ストア
///
/// # 使用例
/// ```ignore
/// let store = InMemoryTaskStore::new(UlidGenerator::new(SystemClock));
/// let task = store.insert(&new_task, &owner, &token).await?;
/// ```
pub struct InMemoryTaskStore<G> {
    rows: Arc<Mutex<Vec<Task>>>,
    id_gen: G,
}

impl<G: IdGenerator> InMemoryTaskStore<G> {
    pub fn new(id_gen: G) -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            id_gen,
        }
    }

    /// 全 owner の行数（テスト・診断用）
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

fn check_credential(credential: &Credential) -> Result<(), StoreError> {
    if credential.is_blank() {
        return Err(StoreError::Rejected {
            status: 401,
            message: "missing bearer token".into(),
        });
    }
    Ok(())
}

#[async_trait]
impl<G: IdGenerator> TaskStore for InMemoryTaskStore<G> {
    async fn fetch_all(
        &self,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<Vec<Task>, StoreError> {
        check_credential(credential)?;
        let rows = self.rows.lock().await;
        let mut owned: Vec<Task> = rows.iter().filter(|t| &t.owner == owner).cloned().collect();
        sort_by_date(&mut owned);
        Ok(owned)
    }

    async fn insert(
        &self,
        task: &NewTask,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<Task, StoreError> {
        check_credential(credential)?;
        let row = Task {
            id: self.id_gen.generate_task_id(),
            owner: owner.clone(),
            title: task.title.trim().to_string(),
            date: task.date.clone(),
            category: task.category,
            priority: task.priority,
            subject: task.subject.clone(),
            completed: false,
        };
        self.rows.lock().await.push(row.clone());
        Ok(row)
    }

    async fn set_completed(
        &self,
        id: &TaskId,
        completed: bool,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<(), StoreError> {
        check_credential(credential)?;
        let mut rows = self.rows.lock().await;
        if let Some(row) = rows.iter_mut().find(|t| &t.id == id && &t.owner == owner) {
            row.completed = completed;
        }
        Ok(())
    }

    async fn delete(
        &self,
        id: &TaskId,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<(), StoreError> {
        check_credential(credential)?;
        self.rows
            .lock()
            .await
            .retain(|t| !(&t.id == id && &t.owner == owner));
        Ok(())
    }
}
