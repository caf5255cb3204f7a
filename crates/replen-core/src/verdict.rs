//! 行動判定與分店狀態

use serde::{Deserialize, Serialize};

/// 商品行動判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionVerdict {
    /// 無銷售，等待
    NoActionAwaiting,
    /// 調撥
    Transfer,
    /// 採購
    Purchase { quantity: i64 },
    /// 觀察
    Monitor,
    /// 正常
    Normal,
}

impl ActionVerdict {
    /// 報表欄位用的簡短代碼
    pub fn code(&self) -> &'static str {
        match self {
            ActionVerdict::NoActionAwaiting => "no_action_awaiting",
            ActionVerdict::Transfer => "transfer",
            ActionVerdict::Purchase { .. } => "purchase",
            ActionVerdict::Monitor => "monitor",
            ActionVerdict::Normal => "normal",
        }
    }

    /// 建議採購數量
    pub fn purchase_quantity(&self) -> Option<i64> {
        match self {
            ActionVerdict::Purchase { quantity } => Some(*quantity),
            _ => None,
        }
    }
}

/// 分店儲存格狀態（僅供視覺診斷）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// 無庫存且從未進貨
    NoStockNeverReceived,
    /// 庫存偏低但有銷售
    LowStockWithSales,
    /// 有庫存但無銷售
    ExcessNoSales,
    /// 正常
    Normal,
}
