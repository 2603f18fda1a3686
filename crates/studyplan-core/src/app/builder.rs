//! PlannerBuilder - Planner の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - ストアは必須。未設定なら build() が BuildError を返す
//! - 設定からの構築では REST ストアの URL・テーブル名をこの時点で検証する
//! - clock は SystemClock、session はサインアウト状態が既定値

use std::sync::Arc;

use super::planner::Planner;
use super::repository::TaskRepository;
use super::session::Session;
use crate::config::{Backend, Config};
use crate::domain::{OwnerId, StoreError};
use crate::impls::{InMemoryTaskStore, RestTaskStore};
use crate::ports::{Clock, StaticToken, SystemClock, TaskStore, UlidGenerator};

/// BuildError は Planner 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no task store configured")]
    MissingStore,

    #[error("task store could not be set up: {0}")]
    Store(#[from] StoreError),
}

/// PlannerBuilder は Planner を構築
///
/// # 使用例
/// ```ignore
/// let planner = PlannerBuilder::new()
///     .store(Arc::new(store))
///     .session(Session::with_static_token("user_1", token))
///     .build()?;
/// ```
#[derive(Default)]
pub struct PlannerBuilder {
    store: Option<Arc<dyn TaskStore>>,
    clock: Option<Arc<dyn Clock>>,
    session: Option<Session>,
}

impl PlannerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定ファイル（＋環境変数）から backend と session を決める
    pub fn from_config(config: &Config) -> Result<Self, BuildError> {
        let store: Arc<dyn TaskStore> = match config.store.backend {
            Backend::Rest => Arc::new(RestTaskStore::from_config(&config.store)?),
            Backend::Memory => Arc::new(InMemoryTaskStore::new(UlidGenerator::new(SystemClock))),
        };
        let owner = config.session.owner.clone().map(OwnerId::new);
        let tokens = match &config.session.token {
            Some(token) => StaticToken::new(token.clone()),
            None => StaticToken::signed_out(),
        };
        Ok(Self::new()
            .store(store)
            .session(Session::new(owner, Arc::new(tokens))))
    }

    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> Result<Planner, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let session = self.session.unwrap_or_else(Session::signed_out);
        Ok(Planner::new(TaskRepository::new(store), session, clock))
    }
}
