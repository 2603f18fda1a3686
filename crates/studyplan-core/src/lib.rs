//! studyplan-core
//!
//! Core building blocks for the study planner.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, date, task, errors, legacy）
//! - **engine**: 集計エンジン（分類・進捗率・フォーカス・日付順・カレンダー・ビュー）
//! - **ports**: 抽象化レイヤー（TaskStore, Clock, IdGenerator, TokenProvider）
//! - **impls**: 実装（RestTaskStore, InMemoryTaskStore）
//! - **app**: アプリケーション層（TaskRepository, Planner, PlannerBuilder）
//! - **config**: TOML 設定と環境変数による上書き

pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod impls;
pub mod ports;
