//! Session - 認証済みユーザーとトークン取得元の組

use std::fmt;
use std::sync::Arc;

use crate::domain::{Credential, OwnerId};
use crate::ports::{StaticToken, TokenProvider};

/// Session は owner とトークンプロバイダを保持する
///
/// トークンは `credential()` のたびにプロバイダから取り直す。
#[derive(Clone)]
pub struct Session {
    owner: Option<OwnerId>,
    tokens: Arc<dyn TokenProvider>,
}

impl Session {
    pub fn new(owner: Option<OwnerId>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { owner, tokens }
    }

    /// 固定トークンのセッション
    pub fn with_static_token(owner: impl Into<OwnerId>, token: impl Into<String>) -> Self {
        Self::new(Some(owner.into()), Arc::new(StaticToken::new(token)))
    }

    pub fn signed_out() -> Self {
        Self::new(None, Arc::new(StaticToken::signed_out()))
    }

    pub fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }

    pub async fn credential(&self) -> Option<Credential> {
        self.tokens.token().await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_session_yields_owner_and_token() {
        let session = Session::with_static_token("user_1", "tok");
        assert_eq!(session.owner().map(OwnerId::as_str), Some("user_1"));
        assert_eq!(session.credential().await, Some(Credential::new("tok")));
    }

    #[tokio::test]
    async fn signed_out_session_has_nothing() {
        let session = Session::signed_out();
        assert_eq!(session.owner(), None);
        assert_eq!(session.credential().await, None);
    }
}
