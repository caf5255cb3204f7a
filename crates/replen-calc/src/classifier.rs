//! 商品行動判定

use replen_core::{ActionVerdict, ItemAggregate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::projection::{ceil_units, DemandProjector, StockTargets};

/// 庫存水位判定（與調撥判斷彼此獨立）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum StockLevel {
    /// 月底預估庫存低於最低庫存
    Purchase { quantity: i64 },
    /// 介於最低與理想庫存之間
    Monitor,
    /// 達到理想庫存
    Normal,
}

/// 單一商品的判定結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAssessment {
    /// 最終判定（依規則順序，第一個符合者）
    pub verdict: ActionVerdict,

    /// 月預測銷售
    pub projected_monthly_sales: Decimal,

    /// 調撥觸發條件是否成立
    pub transfer_triggered: bool,

    /// 庫存目標（無銷售時為 None）
    pub targets: Option<StockTargets>,

    /// 月底預估庫存 = 總庫存 − 月預測銷售
    pub end_of_month_stock: Option<Decimal>,

    /// 庫存水位（無銷售時為 None）
    pub stock_level: Option<StockLevel>,
}

/// 行動判定器
///
/// 規則依序判斷，第一個符合者決定判定結果：
/// 1. 無銷售或預測為 0 → 等待
/// 2. 總庫存 ≥ 一般分店數 × 2 且有銷售分店庫存不足一件 → 調撥
/// 3. 月底預估庫存 < 最低庫存 → 採購
/// 4. 月底預估庫存 < 理想庫存 → 觀察
/// 5. 其餘 → 正常
///
/// 只有規則 1 會短路；調撥觸發與庫存水位各自獨立計算。
#[derive(Debug, Clone, Copy)]
pub struct ActionClassifier {
    ordinary_count: usize,
    projector: DemandProjector,
}

impl ActionClassifier {
    /// 創建判定器
    pub fn new(ordinary_count: usize, projector: DemandProjector) -> Self {
        Self {
            ordinary_count,
            projector,
        }
    }

    /// 調撥觸發門檻（一般分店數 × 2）
    pub fn transfer_threshold(&self) -> i64 {
        self.ordinary_count as i64 * 2
    }

    /// 調撥觸發條件：全鏈有餘量，但有銷售分店缺貨
    pub fn transfer_triggered(&self, item: &ItemAggregate) -> bool {
        item.total_stock >= self.transfer_threshold() && item.has_starved_branch()
    }

    /// 判定單一商品
    pub fn classify(&self, item: &ItemAggregate) -> StockAssessment {
        let projected = self.projector.projected_monthly(item.total_sales_in_period);

        if item.total_sales_in_period == 0 || projected.is_zero() {
            return StockAssessment {
                verdict: ActionVerdict::NoActionAwaiting,
                projected_monthly_sales: projected,
                transfer_triggered: false,
                targets: None,
                end_of_month_stock: None,
                stock_level: None,
            };
        }

        let transfer_triggered = self.transfer_triggered(item);
        let targets = self.projector.targets(item.total_sales_in_period);
        let end_of_month = Decimal::from(item.total_stock) - projected;
        let stock_level = Self::stock_level(&targets, end_of_month);

        let verdict = if transfer_triggered {
            ActionVerdict::Transfer
        } else {
            match stock_level {
                StockLevel::Purchase { quantity } => ActionVerdict::Purchase { quantity },
                StockLevel::Monitor => ActionVerdict::Monitor,
                StockLevel::Normal => ActionVerdict::Normal,
            }
        };

        tracing::debug!(
            item = %item.key,
            projected = %projected,
            end_of_month = %end_of_month,
            transfer_triggered,
            "判定結果: {}",
            verdict.code()
        );

        StockAssessment {
            verdict,
            projected_monthly_sales: projected,
            transfer_triggered,
            targets: Some(targets),
            end_of_month_stock: Some(end_of_month),
            stock_level: Some(stock_level),
        }
    }

    fn stock_level(targets: &StockTargets, end_of_month: Decimal) -> StockLevel {
        if end_of_month < targets.min_stock {
            StockLevel::Purchase {
                quantity: ceil_units(targets.ideal_stock - end_of_month),
            }
        } else if end_of_month < targets.ideal_stock {
            StockLevel::Monitor
        } else {
            StockLevel::Normal
        }
    }
}
