//! 分店事實與商品彙總

use serde::{Deserialize, Serialize};

use crate::branch::BranchId;
use crate::item::ItemKey;

/// 單一分店的商品事實（建構後不再修改）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchFact {
    /// 分店
    pub branch: BranchId,

    /// 對帳後庫存（可為負）
    pub stock: i64,

    /// 報表期間銷售
    pub sales_in_period: i64,

    /// 近 30 天銷售
    pub sales_last_30_days: i64,

    /// 是否曾經進貨
    pub ever_received_entry: bool,
}

impl BranchFact {
    pub fn new(branch: BranchId) -> Self {
        Self {
            branch,
            stock: 0,
            sales_in_period: 0,
            sales_last_30_days: 0,
            ever_received_entry: false,
        }
    }

    /// 建構器模式：設置庫存
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// 建構器模式：設置期間銷售
    pub fn with_sales(mut self, sales_in_period: i64) -> Self {
        self.sales_in_period = sales_in_period;
        self
    }

    /// 建構器模式：設置近 30 天銷售
    pub fn with_sales_last_30_days(mut self, sales: i64) -> Self {
        self.sales_last_30_days = sales;
        self
    }

    /// 建構器模式：設置進貨紀錄
    pub fn with_entry(mut self, received: bool) -> Self {
        self.ever_received_entry = received;
        self
    }

    /// 有銷售但庫存不足一件
    pub fn is_starved(&self) -> bool {
        self.sales_in_period > 0 && self.stock < 1
    }

    /// 有銷售
    pub fn has_sales(&self) -> bool {
        self.sales_in_period > 0
    }
}

/// 尺寸銷售明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSales {
    pub grade: String,
    pub quantity: i64,
}

/// 商品彙總
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAggregate {
    /// 商品鍵
    pub key: ItemKey,

    /// 商品層級對帳後總庫存（不是各分店庫存的加總）
    pub total_stock: i64,

    /// 是否有任何正庫存紀錄（正庫存 KPI 使用）
    pub has_positive_stock: bool,

    /// 期間總銷售
    pub total_sales_in_period: i64,

    /// 各分店事實（有庫存或有銷售的分店）
    pub branches: Vec<BranchFact>,

    /// 期間銷售的尺寸明細（依尺寸排序）
    pub sales_by_grade: Vec<GradeSales>,
}

impl ItemAggregate {
    pub fn new(key: ItemKey) -> Self {
        Self {
            key,
            total_stock: 0,
            has_positive_stock: false,
            total_sales_in_period: 0,
            branches: Vec::new(),
            sales_by_grade: Vec::new(),
        }
    }

    /// 建構器模式：設置總庫存
    pub fn with_total_stock(mut self, total_stock: i64) -> Self {
        self.total_stock = total_stock;
        self.has_positive_stock = total_stock > 0;
        self
    }

    /// 建構器模式：設置分店事實（總銷售由分店銷售加總）
    pub fn with_branches(mut self, branches: Vec<BranchFact>) -> Self {
        self.total_sales_in_period = branches.iter().map(|b| b.sales_in_period).sum();
        self.branches = branches;
        self
    }

    /// 查詢分店事實
    pub fn branch(&self, branch: &BranchId) -> Option<&BranchFact> {
        self.branches.iter().find(|b| &b.branch == branch)
    }

    /// 有銷售的分店
    pub fn selling_branches(&self) -> impl Iterator<Item = &BranchFact> {
        self.branches.iter().filter(|b| b.has_sales())
    }

    /// 是否有分店缺貨（有銷售但庫存不足一件）
    pub fn has_starved_branch(&self) -> bool {
        self.branches.iter().any(BranchFact::is_starved)
    }
}
