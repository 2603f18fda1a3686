//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **RestTaskStore**: 本番用。PostgREST 互換のリモート行ストア
//! - **InMemoryTaskStore**: テスト・オフライン用

pub mod inmem_store;
pub mod rest_store;

// 主要な型を再エクスポート
pub use self::inmem_store::InMemoryTaskStore;
pub use self::rest_store::RestTaskStore;
