//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（行ストア, ID プロバイダ, 時計）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - リモートの行ストアが正本（source of truth）
//! - 集計エンジン（engine）はどのポートにも依存しない

pub mod clock;
pub mod id_generator;
pub mod identity;
pub mod task_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::identity::{StaticToken, TokenProvider};
pub use self::task_store::TaskStore;
