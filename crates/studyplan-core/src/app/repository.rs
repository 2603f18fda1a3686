//! TaskRepository - ストアへの薄いアダプタ
//!
//! すべての呼び出しに owner と credential を付けて TaskStore に委譲します。
//!
//! # エラーの扱い
//! - owner / credential が無い（または空）: 例外にせず安全側へ倒す。
//!   fetch は空リスト、書き込みは `Skipped(Unauthenticated)`
//! - 入力不正（空タイトル・日付なし）: ストアを呼ばずに `Skipped(Invalid)`
//! - ストア障害: ログに残した上で `Err(StoreError)` を返す。リトライしない

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    Credential, NewTask, OwnerId, StoreError, Task, TaskId, ValidationError,
};
use crate::ports::TaskStore;

/// Why a write never reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unauthenticated,
    Invalid(ValidationError),
    /// The task is not in the caller's current list.
    UnknownTask(TaskId),
}

/// Result of a write that did not fail at the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    Applied(T),
    Skipped(SkipReason),
}

impl<T> WriteOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            WriteOutcome::Applied(v) => Some(v),
            WriteOutcome::Skipped(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WriteOutcome<U> {
        match self {
            WriteOutcome::Applied(v) => WriteOutcome::Applied(f(v)),
            WriteOutcome::Skipped(reason) => WriteOutcome::Skipped(reason),
        }
    }
}

/// Both halves of the identity, non-empty.
fn authorize<'a>(
    owner: Option<&'a OwnerId>,
    credential: Option<&'a Credential>,
) -> Option<(&'a OwnerId, &'a Credential)> {
    match (owner, credential) {
        (Some(o), Some(c)) if !o.is_blank() && !c.is_blank() => Some((o, c)),
        _ => None,
    }
}

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn TaskStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// All of the owner's tasks, ascending by date. Empty when signed out.
    pub async fn fetch_all(
        &self,
        owner: Option<&OwnerId>,
        credential: Option<&Credential>,
    ) -> Result<Vec<Task>, StoreError> {
        let Some((owner, credential)) = authorize(owner, credential) else {
            debug!("fetch skipped: no authenticated owner");
            return Ok(Vec::new());
        };
        match self.store.fetch_all(owner, credential).await {
            Ok(tasks) => {
                debug!(owner = %owner, count = tasks.len(), "fetched tasks");
                Ok(tasks)
            }
            Err(error) => {
                warn!(owner = %owner, kind = ?error.kind(), error = %error, "fetch failed");
                Err(error)
            }
        }
    }

    pub async fn create(
        &self,
        task: &NewTask,
        owner: Option<&OwnerId>,
        credential: Option<&Credential>,
    ) -> Result<WriteOutcome<Task>, StoreError> {
        let Some((owner, credential)) = authorize(owner, credential) else {
            debug!("create skipped: no authenticated owner");
            return Ok(WriteOutcome::Skipped(SkipReason::Unauthenticated));
        };
        if let Err(invalid) = task.validate() {
            debug!(reason = %invalid, "create rejected before reaching the store");
            return Ok(WriteOutcome::Skipped(SkipReason::Invalid(invalid)));
        }
        match self.store.insert(task, owner, credential).await {
            Ok(created) => {
                debug!(owner = %owner, task_id = %created.id, "task created");
                Ok(WriteOutcome::Applied(created))
            }
            Err(error) => {
                warn!(owner = %owner, kind = ?error.kind(), error = %error, "create failed");
                Err(error)
            }
        }
    }

    /// No-op at the store when `id` belongs to someone else.
    pub async fn set_completed(
        &self,
        id: &TaskId,
        completed: bool,
        owner: Option<&OwnerId>,
        credential: Option<&Credential>,
    ) -> Result<WriteOutcome<()>, StoreError> {
        let Some((owner, credential)) = authorize(owner, credential) else {
            debug!(task_id = %id, "toggle skipped: no authenticated owner");
            return Ok(WriteOutcome::Skipped(SkipReason::Unauthenticated));
        };
        match self.store.set_completed(id, completed, owner, credential).await {
            Ok(()) => {
                debug!(owner = %owner, task_id = %id, completed, "completion updated");
                Ok(WriteOutcome::Applied(()))
            }
            Err(error) => {
                warn!(owner = %owner, task_id = %id, kind = ?error.kind(), error = %error, "toggle failed");
                Err(error)
            }
        }
    }

    /// Same ownership guard as `set_completed`.
    pub async fn delete(
        &self,
        id: &TaskId,
        owner: Option<&OwnerId>,
        credential: Option<&Credential>,
    ) -> Result<WriteOutcome<()>, StoreError> {
        let Some((owner, credential)) = authorize(owner, credential) else {
            debug!(task_id = %id, "delete skipped: no authenticated owner");
            return Ok(WriteOutcome::Skipped(SkipReason::Unauthenticated));
        };
        match self.store.delete(id, owner, credential).await {
            Ok(()) => {
                debug!(owner = %owner, task_id = %id, "task deleted");
                Ok(WriteOutcome::Applied(()))
            }
            Err(error) => {
                warn!(owner = %owner, task_id = %id, kind = ?error.kind(), error = %error, "delete failed");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDate;
    use crate::impls::InMemoryTaskStore;
    use crate::ports::{SystemClock, UlidGenerator};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts calls and always fails.
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    impl BrokenStore {
        fn fail(&self) -> StoreError {
            self.calls.fetch_add(1, Ordering::SeqCst);
            StoreError::Rejected {
                status: 503,
                message: "unavailable".into(),
            }
        }
    }

    #[async_trait]
    impl TaskStore for BrokenStore {
        async fn fetch_all(&self, _: &OwnerId, _: &Credential) -> Result<Vec<Task>, StoreError> {
            Err(self.fail())
        }
        async fn insert(&self, _: &NewTask, _: &OwnerId, _: &Credential) -> Result<Task, StoreError> {
            Err(self.fail())
        }
        async fn set_completed(
            &self,
            _: &TaskId,
            _: bool,
            _: &OwnerId,
            _: &Credential,
        ) -> Result<(), StoreError> {
            Err(self.fail())
        }
        async fn delete(&self, _: &TaskId, _: &OwnerId, _: &Credential) -> Result<(), StoreError> {
            Err(self.fail())
        }
    }

    fn memory_repo() -> TaskRepository {
        TaskRepository::new(Arc::new(InMemoryTaskStore::new(UlidGenerator::new(SystemClock))))
    }

    fn creds() -> (OwnerId, Credential) {
        (OwnerId::new("alice"), Credential::new("tok"))
    }

    #[tokio::test]
    async fn signed_out_fetch_is_empty_not_an_error() {
        let broken = Arc::new(BrokenStore::default());
        let repo = TaskRepository::new(broken.clone());
        let (owner, token) = creds();

        assert!(repo.fetch_all(None, Some(&token)).await.unwrap().is_empty());
        assert!(repo.fetch_all(Some(&owner), None).await.unwrap().is_empty());
        assert!(
            repo.fetch_all(Some(&OwnerId::new("")), Some(&token))
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(broken.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn signed_out_writes_are_skipped() {
        let broken = Arc::new(BrokenStore::default());
        let repo = TaskRepository::new(broken.clone());
        let (owner, _) = creds();
        let id = TaskId::new("1");
        let blank = Credential::new(" ");

        let created = repo
            .create(&NewTask::new("t", TaskDate::raw("2024-03-05")), Some(&owner), None)
            .await
            .unwrap();
        assert_eq!(created, WriteOutcome::Skipped(SkipReason::Unauthenticated));

        let toggled = repo.set_completed(&id, true, Some(&owner), Some(&blank)).await.unwrap();
        assert_eq!(toggled, WriteOutcome::Skipped(SkipReason::Unauthenticated));

        let deleted = repo.delete(&id, None, Some(&blank)).await.unwrap();
        assert_eq!(deleted, WriteOutcome::Skipped(SkipReason::Unauthenticated));

        assert_eq!(broken.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_creates_never_reach_the_store() {
        let broken = Arc::new(BrokenStore::default());
        let repo = TaskRepository::new(broken.clone());
        let (owner, token) = creds();

        let outcome = repo
            .create(&NewTask::new("", TaskDate::raw("2024-03-05")), Some(&owner), Some(&token))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            WriteOutcome::Skipped(SkipReason::Invalid(ValidationError::EmptyTitle))
        );
        assert_eq!(broken.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_failures_are_typed_errors() {
        let repo = TaskRepository::new(Arc::new(BrokenStore::default()));
        let (owner, token) = creds();

        let err = repo.fetch_all(Some(&owner), Some(&token)).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected { status: 503, .. }));

        let err = repo
            .create(&NewTask::new("t", TaskDate::raw("2024-03-05")), Some(&owner), Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected { .. }));

        assert!(repo.delete(&TaskId::new("1"), Some(&owner), Some(&token)).await.is_err());
    }

    #[tokio::test]
    async fn crud_round_trip_through_the_adapter() {
        let repo = memory_repo();
        let (owner, token) = creds();

        let created = repo
            .create(&NewTask::new("Limits", TaskDate::raw("2024-03-05")), Some(&owner), Some(&token))
            .await
            .unwrap()
            .applied()
            .unwrap();

        let outcome = repo
            .set_completed(&created.id, true, Some(&owner), Some(&token))
            .await
            .unwrap();
        assert!(outcome.is_applied());
        let tasks = repo.fetch_all(Some(&owner), Some(&token)).await.unwrap();
        assert!(tasks[0].completed);

        repo.delete(&created.id, Some(&owner), Some(&token)).await.unwrap();
        assert!(repo.fetch_all(Some(&owner), Some(&token)).await.unwrap().is_empty());
    }
}
