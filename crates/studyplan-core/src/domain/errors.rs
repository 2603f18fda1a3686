//! Errors - ストア障害の型と分類
//!
//! 認証なし・入力不正は error ではなく `WriteOutcome::Skipped` として返す
//! （app::repository を参照）。ここにあるのはストアとの通信結果のみ。

use thiserror::Error;

/// ErrorKind はストア障害の運用分類
///
/// - Transient: 一時的なエラー（ネットワーク、タイムアウト）
/// - Permanent: 恒久的なエラー（権限、不正なレスポンス）
/// - Infrastructure: バックエンド側の障害（5xx）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
    Infrastructure,
}

/// Failure reported by a task store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("store returned an unreadable payload: {0}")]
    Decode(String),

    #[error("store returned no row for the insert")]
    EmptyInsert,

    #[error("store is not configured: {0}")]
    Misconfigured(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Transport(e) if e.is_decode() => ErrorKind::Permanent,
            StoreError::Transport(_) => ErrorKind::Transient,
            StoreError::Rejected { status, .. } if *status >= 500 => ErrorKind::Infrastructure,
            StoreError::Rejected { .. } => ErrorKind::Permanent,
            StoreError::Decode(_) | StoreError::EmptyInsert | StoreError::Misconfigured(_) => {
                ErrorKind::Permanent
            }
        }
    }

    /// 401/403 from the row-level security layer.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::Rejected { status: 401 | 403, .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        StoreError::Decode(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(401, ErrorKind::Permanent, true)]
    #[case(403, ErrorKind::Permanent, true)]
    #[case(404, ErrorKind::Permanent, false)]
    #[case(503, ErrorKind::Infrastructure, false)]
    fn rejected_statuses_are_classified(
        #[case] status: u16,
        #[case] kind: ErrorKind,
        #[case] denied: bool,
    ) {
        let err = StoreError::Rejected {
            status,
            message: "nope".into(),
        };
        assert_eq!(err.kind(), kind);
        assert_eq!(err.is_permission_denied(), denied);
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let json_err = serde_json::from_str::<u8>("x").unwrap_err();
        let err = StoreError::from(json_err);
        assert!(matches!(err, StoreError::Decode(_)));
        assert_eq!(err.kind(), ErrorKind::Permanent);
    }
}
