//! Planner - タスク一覧の状態コンテナ
//!
//! 画面側が持っていた「ユーザー・タスク一覧・読み込み中フラグ」を
//! 明示的な値として一箇所にまとめたものです。
//!
//! # 世代番号
//! - fetch 開始時に世代番号を 1 つ進め、その番号を控えておく
//! - 書き込み成功・`invalidate()`・`detach()` でも世代番号が進む
//! - fetch 結果を反映する直前に番号を比べ、進んでいれば結果を捨てる
//!
//! これにより、遅れて届いた古い一覧が新しい状態を上書きしない。
//!
//! # 書き込み
//! - create: 成功後に再取得（失敗時はローカルに追加して日付順に並べ直す）
//! - toggle / delete: ストアの成功を確認してからローカルを更新（楽観的更新はしない）

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::repository::{SkipReason, TaskRepository, WriteOutcome};
use super::session::Session;
use super::snapshot::TaskSnapshot;
use crate::domain::legacy::LegacyImport;
use crate::domain::{NewTask, OwnerId, StoreError, Task, TaskId};
use crate::engine::sort_by_date;
use crate::ports::Clock;

/// Result of `Planner::refresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The fetched list replaced local state; carries its length.
    Applied(usize),
    /// A newer fetch, a write, or a detach happened meanwhile; result dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    /// Created tasks then marked completed, as they were in the snapshot.
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Planner {
    repo: TaskRepository,
    session: Session,
    clock: Arc<dyn Clock>,
    tasks: RwLock<Vec<Task>>,
    generation: AtomicU64,
    detached: AtomicBool,
}

impl Planner {
    pub fn new(repo: TaskRepository, session: Session, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            session,
            clock,
            tasks: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
            detached: AtomicBool::new(false),
        }
    }

    pub fn owner(&self) -> Option<&OwnerId> {
        self.session.owner()
    }

    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Drop whatever fetch is in flight.
    pub fn invalidate(&self) {
        self.bump();
    }

    /// Stop touching local state: fetch results (including ones already in
    /// flight) and confirmed writes are no longer applied.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
        self.bump();
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Re-fetch the owner's tasks and replace local state, unless superseded.
    pub async fn refresh(&self) -> Result<Refresh, StoreError> {
        if self.is_detached() {
            return Ok(Refresh::Superseded);
        }
        let ticket = self.bump();
        let credential = self.session.credential().await;
        let fetched = self
            .repo
            .fetch_all(self.session.owner(), credential.as_ref())
            .await?;

        let mut tasks = self.tasks.write().await;
        let current = self.generation.load(Ordering::SeqCst);
        if current != ticket || self.is_detached() {
            debug!(ticket, current, "discarding superseded fetch");
            return Ok(Refresh::Superseded);
        }
        let count = fetched.len();
        *tasks = fetched;
        Ok(Refresh::Applied(count))
    }

    pub async fn create(&self, task: NewTask) -> Result<WriteOutcome<Task>, StoreError> {
        let credential = self.session.credential().await;
        let outcome = self
            .repo
            .create(&task, self.session.owner(), credential.as_ref())
            .await?;

        match &outcome {
            WriteOutcome::Applied(created) if !self.is_detached() => {
                self.bump();
                {
                    let mut tasks = self.tasks.write().await;
                    tasks.push(created.clone());
                    sort_by_date(tasks.as_mut_slice());
                }
                if let Err(error) = self.refresh().await {
                    warn!(task_id = %created.id, error = %error, "re-fetch after create failed, keeping local copy");
                }
            }
            _ => {}
        }
        Ok(outcome)
    }

    /// Flip a task's completion. Applied carries the new state.
    pub async fn toggle(&self, id: &TaskId) -> Result<WriteOutcome<bool>, StoreError> {
        let current = self
            .tasks
            .read()
            .await
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.completed);
        let Some(current) = current else {
            return Ok(WriteOutcome::Skipped(SkipReason::UnknownTask(id.clone())));
        };

        let target = !current;
        let credential = self.session.credential().await;
        let outcome = self
            .repo
            .set_completed(id, target, self.session.owner(), credential.as_ref())
            .await?;

        if outcome.is_applied() && !self.is_detached() {
            self.bump();
            let mut tasks = self.tasks.write().await;
            if let Some(task) = tasks.iter_mut().find(|t| &t.id == id) {
                task.completed = target;
            }
        }
        Ok(outcome.map(|()| target))
    }

    pub async fn delete(&self, id: &TaskId) -> Result<WriteOutcome<()>, StoreError> {
        let credential = self.session.credential().await;
        let outcome = self
            .repo
            .delete(id, self.session.owner(), credential.as_ref())
            .await?;

        if outcome.is_applied() && !self.is_detached() {
            self.bump();
            self.tasks.write().await.retain(|t| &t.id != id);
        }
        Ok(outcome)
    }

    /// Create every valid snapshot record, then re-fetch.
    ///
    /// Store failures on individual records are counted and logged, not
    /// propagated; only the final re-fetch can fail the whole call.
    pub async fn import_legacy(&self, import: LegacyImport) -> Result<ImportReport, StoreError> {
        let mut report = ImportReport {
            skipped: import.rejected.len(),
            ..ImportReport::default()
        };
        let owner = self.session.owner();

        for entry in import.entries {
            let credential = self.session.credential().await;
            let created = match self.repo.create(&entry.task, owner, credential.as_ref()).await {
                Ok(WriteOutcome::Applied(task)) => task,
                Ok(WriteOutcome::Skipped(_)) => {
                    report.skipped += 1;
                    continue;
                }
                Err(_) => {
                    report.failed += 1;
                    continue;
                }
            };
            report.created += 1;

            if entry.completed {
                let credential = self.session.credential().await;
                match self
                    .repo
                    .set_completed(&created.id, true, owner, credential.as_ref())
                    .await
                {
                    Ok(outcome) if outcome.is_applied() => report.completed += 1,
                    Ok(_) => {}
                    Err(_) => report.failed += 1,
                }
            }
        }

        info!(
            created = report.created,
            completed = report.completed,
            skipped = report.skipped,
            failed = report.failed,
            "legacy snapshot imported"
        );
        self.refresh().await?;
        Ok(report)
    }

    /// Owned copy of the current list, stamped with the clock's today.
    pub async fn snapshot(&self) -> TaskSnapshot {
        let tasks = self.tasks.read().await.clone();
        TaskSnapshot::new(tasks, self.clock.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::legacy::parse_snapshot;
    use crate::domain::{Category, Credential, Priority, TaskDate};
    use crate::impls::InMemoryTaskStore;
    use crate::ports::{FixedClock, SystemClock, TaskStore, UlidGenerator};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tokio::sync::Notify;

    type MemStore = InMemoryTaskStore<UlidGenerator<SystemClock>>;

    /// Delegating store whose next fetch, once armed, reads the rows and then
    /// waits for the test to release it.
    struct GatedStore {
        inner: MemStore,
        armed: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    impl GatedStore {
        fn new() -> Self {
            Self {
                inner: InMemoryTaskStore::new(UlidGenerator::new(SystemClock)),
                armed: AtomicBool::new(false),
                entered: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl TaskStore for GatedStore {
        async fn fetch_all(&self, owner: &OwnerId, credential: &Credential) -> Result<Vec<Task>, StoreError> {
            let rows = self.inner.fetch_all(owner, credential).await?;
            if self.armed.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(rows)
        }
        async fn insert(&self, task: &NewTask, owner: &OwnerId, credential: &Credential) -> Result<Task, StoreError> {
            self.inner.insert(task, owner, credential).await
        }
        async fn set_completed(
            &self,
            id: &TaskId,
            completed: bool,
            owner: &OwnerId,
            credential: &Credential,
        ) -> Result<(), StoreError> {
            self.inner.set_completed(id, completed, owner, credential).await
        }
        async fn delete(&self, id: &TaskId, owner: &OwnerId, credential: &Credential) -> Result<(), StoreError> {
            self.inner.delete(id, owner, credential).await
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn planner_over(store: Arc<dyn TaskStore>) -> Planner {
        Planner::new(
            TaskRepository::new(store),
            Session::with_static_token("alice", "tok"),
            Arc::new(FixedClock::on(today())),
        )
    }

    fn new_task(title: &str, date: &str) -> NewTask {
        NewTask::new(title, TaskDate::raw(date))
    }

    #[tokio::test]
    async fn create_then_snapshot_shows_sorted_tasks() {
        let planner = planner_over(Arc::new(GatedStore::new()));

        planner.create(new_task("later", "2024-03-09")).await.unwrap();
        planner
            .create(new_task("today", "2024-03-05").priority(Priority::High))
            .await
            .unwrap();

        let snap = planner.snapshot().await;
        let titles: Vec<&str> = snap.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["today", "later"]);
        assert_eq!(snap.dashboard().focus.map(|t| t.title.as_str()), Some("today"));
    }

    #[tokio::test]
    async fn invalid_create_leaves_state_alone() {
        let planner = planner_over(Arc::new(GatedStore::new()));
        let outcome = planner.create(new_task("   ", "2024-03-05")).await.unwrap();
        assert!(matches!(outcome, WriteOutcome::Skipped(SkipReason::Invalid(_))));
        assert!(planner.snapshot().await.tasks().is_empty());
    }

    #[tokio::test]
    async fn toggle_and_delete_patch_after_confirmation() {
        let planner = planner_over(Arc::new(GatedStore::new()));
        let created = planner
            .create(new_task("limits", "2024-03-05"))
            .await
            .unwrap()
            .applied()
            .unwrap();

        assert_eq!(planner.toggle(&created.id).await.unwrap(), WriteOutcome::Applied(true));
        assert!(planner.snapshot().await.find(&created.id).unwrap().completed);
        assert_eq!(planner.toggle(&created.id).await.unwrap(), WriteOutcome::Applied(false));

        planner.delete(&created.id).await.unwrap();
        assert!(planner.snapshot().await.tasks().is_empty());
    }

    #[tokio::test]
    async fn toggle_of_unknown_task_is_skipped() {
        let planner = planner_over(Arc::new(GatedStore::new()));
        let id = TaskId::new("nope");
        assert_eq!(
            planner.toggle(&id).await.unwrap(),
            WriteOutcome::Skipped(SkipReason::UnknownTask(id))
        );
    }

    #[tokio::test]
    async fn signed_out_planner_is_empty_and_skips_writes() {
        let planner = Planner::new(
            TaskRepository::new(Arc::new(GatedStore::new())),
            Session::signed_out(),
            Arc::new(FixedClock::on(today())),
        );
        assert_eq!(planner.refresh().await.unwrap(), Refresh::Applied(0));
        let outcome = planner.create(new_task("x", "2024-03-05")).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped(SkipReason::Unauthenticated));
    }

    #[tokio::test]
    async fn stale_fetch_does_not_overwrite_a_confirmed_toggle() {
        let store = Arc::new(GatedStore::new());
        let planner = Arc::new(planner_over(store.clone()));
        let created = planner
            .create(new_task("limits", "2024-03-05"))
            .await
            .unwrap()
            .applied()
            .unwrap();

        store.armed.store(true, Ordering::SeqCst);
        let background = {
            let planner = planner.clone();
            tokio::spawn(async move { planner.refresh().await })
        };
        // the fetch has read the rows (completed = false) and is parked
        store.entered.notified().await;

        assert_eq!(planner.toggle(&created.id).await.unwrap(), WriteOutcome::Applied(true));
        store.release.notify_one();

        assert_eq!(background.await.unwrap().unwrap(), Refresh::Superseded);
        assert!(planner.snapshot().await.find(&created.id).unwrap().completed);
    }

    #[tokio::test]
    async fn detach_discards_fetch_in_flight() {
        let store = Arc::new(GatedStore::new());
        let planner = Arc::new(planner_over(store.clone()));
        planner.create(new_task("limits", "2024-03-05")).await.unwrap();

        store.armed.store(true, Ordering::SeqCst);
        let background = {
            let planner = planner.clone();
            tokio::spawn(async move { planner.refresh().await })
        };
        store.entered.notified().await;
        planner.detach();
        store.release.notify_one();

        assert_eq!(background.await.unwrap().unwrap(), Refresh::Superseded);
        assert_eq!(planner.refresh().await.unwrap(), Refresh::Superseded);
    }

    #[tokio::test]
    async fn writes_after_detach_reach_the_store_but_not_local_state() {
        let store = Arc::new(GatedStore::new());
        let planner = planner_over(store.clone());
        let kept = planner
            .create(new_task("kept", "2024-03-05"))
            .await
            .unwrap()
            .applied()
            .unwrap();
        planner.detach();

        let late = planner.create(new_task("late", "2024-03-06")).await.unwrap();
        assert!(late.is_applied());
        assert_eq!(planner.toggle(&kept.id).await.unwrap(), WriteOutcome::Applied(true));
        assert!(planner.delete(&kept.id).await.unwrap().is_applied());

        let snap = planner.snapshot().await;
        assert_eq!(snap.tasks().len(), 1);
        assert_eq!(snap.tasks()[0].title, "kept");
        assert!(!snap.tasks()[0].completed);
        assert_eq!(store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn import_legacy_creates_valid_records_and_restores_completion() {
        let planner = planner_over(Arc::new(GatedStore::new()));
        let import = parse_snapshot(
            r#"[
                {"id": 1, "titulo": "Limites", "data": "2024-03-05", "tipo": "exercicio", "prioridade": "alta", "concluida": true},
                {"id": 2, "titulo": "Derivadas", "data": "2024-03-06"},
                {"id": 3, "titulo": "", "data": "2024-03-07"},
                {"id": 4, "titulo": "Sem data"}
            ]"#,
        )
        .unwrap();

        let report = planner.import_legacy(import).await.unwrap();
        assert_eq!(
            report,
            ImportReport {
                created: 2,
                completed: 1,
                skipped: 2,
                failed: 0
            }
        );

        let snap = planner.snapshot().await;
        assert_eq!(snap.tasks().len(), 2);
        let limites = &snap.tasks()[0];
        assert_eq!(limites.title, "Limites");
        assert_eq!(limites.category, Category::Exercise);
        assert!(limites.completed);
    }
}
