//! 報表期間

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{ReplenError, Result};

/// 近期銷售視窗長度（天，含結束日）
pub const TRAILING_WINDOW_DAYS: i64 = 30;

/// 報表期間（含開始日與結束日）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// 建立報表期間，結束日早於開始日時拒絕
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ReplenError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// 期間長度（天），最少為 1
    pub fn length_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }

    /// 是否落在報表期間內
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 近 30 天視窗的開始日（以結束日為錨點）
    pub fn trailing_window_start(&self) -> NaiveDate {
        self.end - Duration::days(TRAILING_WINDOW_DAYS - 1)
    }

    /// 是否落在近 30 天視窗內
    pub fn in_trailing_window(&self, date: NaiveDate) -> bool {
        self.trailing_window_start() <= date && date <= self.end
    }

    /// 銷售資料需要涵蓋的最早日期（報表期間與近 30 天視窗的聯集）
    pub fn sales_fetch_start(&self) -> NaiveDate {
        self.start.min(self.trailing_window_start())
    }
}
