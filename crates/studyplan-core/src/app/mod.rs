//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **TaskRepository**: owner / credential を付けて TaskStore を呼ぶアダプタ
//! - **Session**: owner とトークンプロバイダの組
//! - **Planner**: タスク一覧の状態コンテナ（世代番号で古い fetch を破棄）
//! - **TaskSnapshot**: 画面用ビューモデルの材料
//! - **PlannerBuilder**: Planner の構築とワイヤリング

pub mod builder;
pub mod planner;
pub mod repository;
pub mod session;
pub mod snapshot;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, PlannerBuilder};
pub use self::planner::{ImportReport, Planner, Refresh};
pub use self::repository::{SkipReason, TaskRepository, WriteOutcome};
pub use self::session::Session;
pub use self::snapshot::TaskSnapshot;
