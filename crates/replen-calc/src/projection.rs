//! 月需求預測

use replen_core::ReportPeriod;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 預測期間（天）
pub const PROJECTION_HORIZON_DAYS: i64 = 30;

/// 最低庫存覆蓋天數
const MIN_STOCK_DAYS: i64 = 15;

/// 理想庫存覆蓋天數
const IDEAL_STOCK_DAYS: i64 = 25;

/// 最低庫存下限
const MIN_STOCK_FLOOR: i64 = 15;

/// 理想庫存下限
const IDEAL_STOCK_FLOOR: i64 = 20;

/// 庫存目標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTargets {
    /// 日銷售量
    pub daily_rate: Decimal,
    /// 最低庫存 = max(15, 日銷售 × 15)
    pub min_stock: Decimal,
    /// 理想庫存 = max(20, 日銷售 × 25)
    pub ideal_stock: Decimal,
}

/// 月需求預測器
///
/// 將任意長度期間的銷售量換算為 30 天的預測量。
/// 比例一律以 `銷售 × k ÷ 天數` 計算，整除時結果為精確值。
#[derive(Debug, Clone, Copy)]
pub struct DemandProjector {
    period_days: i64,
}

impl DemandProjector {
    /// 創建預測器（期間最少 1 天）
    pub fn new(period_days: i64) -> Self {
        Self {
            period_days: period_days.max(1),
        }
    }

    /// 依報表期間創建預測器
    pub fn for_period(period: &ReportPeriod) -> Self {
        Self::new(period.length_days())
    }

    /// 期間天數
    pub fn period_days(&self) -> i64 {
        self.period_days
    }

    /// 月預測銷售 = 期間銷售 ÷ 天數 × 30
    pub fn projected_monthly(&self, sales_in_period: i64) -> Decimal {
        self.ratio(sales_in_period * PROJECTION_HORIZON_DAYS)
    }

    /// 日銷售量
    pub fn daily_rate(&self, sales_in_period: i64) -> Decimal {
        self.ratio(sales_in_period)
    }

    /// 依期間銷售計算庫存目標
    pub fn targets(&self, sales_in_period: i64) -> StockTargets {
        let min_stock = self
            .ratio(sales_in_period * MIN_STOCK_DAYS)
            .max(Decimal::from(MIN_STOCK_FLOOR));
        let ideal_stock = self
            .ratio(sales_in_period * IDEAL_STOCK_DAYS)
            .max(Decimal::from(IDEAL_STOCK_FLOOR));

        StockTargets {
            daily_rate: self.daily_rate(sales_in_period),
            min_stock,
            ideal_stock,
        }
    }

    fn ratio(&self, numerator: i64) -> Decimal {
        (Decimal::from(numerator) / Decimal::from(self.period_days)).normalize()
    }
}

/// 無條件進位為整數件數
pub(crate) fn ceil_units(quantity: Decimal) -> i64 {
    quantity.ceil().to_i64().unwrap_or(i64::MAX)
}
