//! 資料來源原始資料列

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::branch::BranchId;

/// 庫存批次資料列（數量可為負，代表庫存修正）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRow {
    pub product_id: String,
    pub color_id: String,
    #[serde(default)]
    pub color_description: Option<String>,
    pub branch_id: BranchId,
    pub quantity: i64,
}

impl StockRow {
    pub fn new(
        product_id: impl Into<String>,
        color_id: impl Into<String>,
        branch_id: impl AsRef<str>,
        quantity: i64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            color_id: color_id.into(),
            color_description: None,
            branch_id: BranchId::new(branch_id),
            quantity,
        }
    }

    /// 建構器模式：設置顏色描述
    pub fn with_color_description(mut self, description: impl Into<String>) -> Self {
        self.color_description = Some(description.into());
        self
    }
}

/// 銷售明細資料列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRow {
    pub product_id: String,
    pub color_id: String,
    #[serde(default)]
    pub color_description: Option<String>,
    pub branch_id: BranchId,
    pub quantity: i64,
    #[serde(default)]
    pub cancelled_quantity: i64,
    pub sale_date: NaiveDate,
    /// 尺寸
    #[serde(default)]
    pub grade: Option<String>,
}

impl SaleRow {
    pub fn new(
        product_id: impl Into<String>,
        color_id: impl Into<String>,
        branch_id: impl AsRef<str>,
        quantity: i64,
        sale_date: NaiveDate,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            color_id: color_id.into(),
            color_description: None,
            branch_id: BranchId::new(branch_id),
            quantity,
            cancelled_quantity: 0,
            sale_date,
            grade: None,
        }
    }

    /// 建構器模式：設置取消數量
    pub fn with_cancelled_quantity(mut self, cancelled: i64) -> Self {
        self.cancelled_quantity = cancelled;
        self
    }

    /// 建構器模式：設置尺寸
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    /// 建構器模式：設置顏色描述
    pub fn with_color_description(mut self, description: impl Into<String>) -> Self {
        self.color_description = Some(description.into());
        self
    }

    /// 有效銷售數量
    ///
    /// 有取消數量的明細計為 0（不做負向調整），非正數量也計為 0。
    pub fn effective_quantity(&self) -> i64 {
        if self.cancelled_quantity > 0 || self.quantity <= 0 {
            0
        } else {
            self.quantity
        }
    }
}

/// 進貨歷史存在紀錄（出現即代表該分店曾經進貨）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRow {
    pub product_id: String,
    pub color_id: String,
    #[serde(default)]
    pub color_description: Option<String>,
    pub branch_id: BranchId,
}

impl EntryRow {
    pub fn new(
        product_id: impl Into<String>,
        color_id: impl Into<String>,
        branch_id: impl AsRef<str>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            color_id: color_id.into(),
            color_description: None,
            branch_id: BranchId::new(branch_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
    }

    #[test]
    fn test_cancelled_line_counts_zero() {
        let sale = SaleRow::new("P1", "01", "NERD", 3, date()).with_cancelled_quantity(1);
        assert_eq!(sale.effective_quantity(), 0);

        let sale = SaleRow::new("P1", "01", "NERD", 3, date());
        assert_eq!(sale.effective_quantity(), 3);

        let sale = SaleRow::new("P1", "01", "NERD", -2, date());
        assert_eq!(sale.effective_quantity(), 0);
    }

    #[test]
    fn test_deserialize_rows_with_defaults() {
        let json = r#"{
            "product_id": "P1",
            "color_id": "01",
            "branch_id": " nerd leblon ",
            "quantity": 2,
            "sale_date": "2025-11-03"
        }"#;
        let sale: SaleRow = serde_json::from_str(json).unwrap();

        assert_eq!(sale.branch_id, BranchId::new("NERD LEBLON"));
        assert_eq!(sale.cancelled_quantity, 0);
        assert_eq!(sale.grade, None);
        assert_eq!(sale.sale_date, date());
    }
}
