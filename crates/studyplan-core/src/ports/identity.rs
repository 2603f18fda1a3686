//! Identity port - セッショントークンの取得
//!
//! ID プロバイダ（外部）はユーザー ID とセッショントークンを発行します。
//! トークンは呼び出しごとに取得し直す。キャッシュはしない。

use async_trait::async_trait;

use crate::domain::Credential;

/// TokenProvider はストア呼び出し用の credential を返す
///
/// `None` はサインアウト状態（認証なし）を意味する。
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Option<Credential>;
}

/// 固定トークン（CLI・テスト用）
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<Credential>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(Credential::new(token)))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Option<Credential> {
        self.0.clone()
    }
}
