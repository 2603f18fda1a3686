//! Clock port - 時刻の抽象化
//!
//! 「今日」の判定（due today / overdue）と ULID のタイムスタンプに使います。

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::domain::TaskDate;

/// Clock は現在時刻を提供
///
/// # テスト容易性
/// - trait により時刻を差し替え可能
/// - テストでは FixedClock を使用
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// 利用者にとっての「今日」
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// 集計エンジンに渡す基準日（canonical 形式）
    fn reference_date(&self) -> TaskDate {
        TaskDate::from_naive(self.today())
    }
}

/// SystemClock は本番用。「今日」はローカルタイムゾーンで判定する。
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// FixedClock はテスト用。常に同じ時刻を返す。
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    /// 指定日の 00:00 UTC に固定
    pub fn on(date: NaiveDate) -> Self {
        Self::new(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}
