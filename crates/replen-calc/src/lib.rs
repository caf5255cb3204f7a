//! # Replen Calculation Engine
//!
//! 分店庫存補貨計算引擎

pub mod allocator;
pub mod cell_status;
pub mod classifier;
pub mod engine;
pub mod facts;
pub mod projection;
pub mod purchase;
pub mod sales;
pub mod stock;

// Re-export 主要類型
pub use allocator::{AllocationOutcome, TransferAllocator};
pub use cell_status::classify_cell;
pub use classifier::{ActionClassifier, StockAssessment, StockLevel};
pub use engine::{ReplenishmentEngine, RowSet};
pub use facts::FactAssembler;
pub use projection::{DemandProjector, StockTargets, PROJECTION_HORIZON_DAYS};
pub use purchase::PurchasePlanner;
pub use sales::{SalesAggregator, SalesTotals};
pub use stock::{StockAggregator, StockReconciliation, StockTotals};

use replen_core::{
    ActionVerdict, BranchId, BranchTopology, CellStatus, ItemAggregate, PurchaseProposal,
    ReportPeriod, TransferProposal,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 補貨計算結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishmentReport {
    /// 公司識別碼
    pub company: String,

    /// 報表期間
    pub period: ReportPeriod,

    /// 期間天數（最少 1）
    pub period_days: i64,

    /// 分店拓撲
    pub topology: BranchTopology,

    /// 分析後的商品（依期間銷售遞減排序）
    pub items: Vec<AnalyzedItem>,

    /// 調撥建議
    pub transfers: Vec<TransferProposal>,

    /// 採購建議
    pub purchases: Vec<PurchaseProposal>,

    /// 摘要
    pub summary: ReportSummary,

    /// 警告信息
    pub warnings: Vec<ReplenWarning>,

    /// 計算耗時（毫秒），不輸出以保持報表可重現
    #[serde(skip)]
    pub calculation_time_ms: Option<u128>,
}

impl ReplenishmentReport {
    /// 創建空的計算結果
    pub fn empty(company: impl Into<String>, period: ReportPeriod, topology: BranchTopology) -> Self {
        Self {
            company: company.into(),
            period,
            period_days: period.length_days(),
            topology,
            items: Vec::new(),
            transfers: Vec::new(),
            purchases: Vec::new(),
            summary: ReportSummary::default(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ReplenWarning) {
        self.warnings.push(warning);
    }

    /// 查詢商品
    pub fn item(&self, product_id: &str, color: &str) -> Option<&AnalyzedItem> {
        let key = replen_core::ItemKey::new(product_id, color);
        self.items.iter().find(|i| i.aggregate.key == key)
    }
}

/// 分析後的商品
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedItem {
    /// 商品彙總
    pub aggregate: ItemAggregate,

    /// 判定結果
    pub assessment: StockAssessment,

    /// 各分店儲存格狀態（與彙總的分店順序相同）
    pub cells: Vec<BranchCell>,
}

impl AnalyzedItem {
    pub fn verdict(&self) -> ActionVerdict {
        self.assessment.verdict
    }
}

/// 分店儲存格
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCell {
    pub branch: BranchId,
    pub display_name: String,
    pub status: CellStatus,
}

/// 報表摘要
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// 商品數量
    pub item_count: usize,

    /// 正庫存 KPI（排除沒有任何正數批次的商品）
    pub positive_stock_total: i64,

    /// 期間總銷售
    pub total_sales_in_period: i64,

    /// 各判定的商品數量
    pub verdict_counts: BTreeMap<String, usize>,

    /// 調撥建議數量
    pub transfer_count: usize,

    /// 採購建議數量
    pub purchase_count: usize,
}

/// 補貨警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenWarning {
    pub item: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl ReplenWarning {
    pub fn new(item: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            item,
            message,
            severity,
        }
    }

    pub fn info(item: String, message: String) -> Self {
        Self::new(item, message, WarningSeverity::Info)
    }

    pub fn warning(item: String, message: String) -> Self {
        Self::new(item, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
