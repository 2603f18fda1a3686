//! TaskStore port - リモート行ストアが実装する正本（source of truth）
//!
//! 論理テーブルは `tasks` ひとつ。`owner` 列が行の所有者を表します。
//!
//! # 実装
//! - **RestTaskStore**: PostgREST 互換の REST API（本番用）
//! - **InMemoryTaskStore**: テスト・オフライン用

use async_trait::async_trait;

use crate::domain::{Credential, NewTask, OwnerId, StoreError, Task, TaskId};

/// TaskStore は owner 単位でスコープされた CRUD を提供
///
/// # 設計原則
/// - 呼び出し側は owner と credential が空でないことを保証する
/// - 行レベルの所有権チェックはストア側の責務
/// - `set_completed` / `delete` は id と owner の両方が一致した行だけに作用する。
///   他人の行を指定しても何も起きない（エラーにもならない）
/// - リトライしない
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// owner の全タスクを date 昇順で返す
    async fn fetch_all(&self, owner: &OwnerId, credential: &Credential)
    -> Result<Vec<Task>, StoreError>;

    /// 新しい行を追加し、ストアが採番した id 付きの行を返す
    async fn insert(
        &self,
        task: &NewTask,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<Task, StoreError>;

    /// `completed` 列だけを更新する
    async fn set_completed(
        &self,
        id: &TaskId,
        completed: bool,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<(), StoreError>;

    async fn delete(
        &self,
        id: &TaskId,
        owner: &OwnerId,
        credential: &Credential,
    ) -> Result<(), StoreError>;
}
