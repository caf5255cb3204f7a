//! 資料來源介面
//!
//! 引擎本身不做 I/O，三組資料列由實作此介面的協作者提供。
//! 來源的錯誤原樣向上傳遞，引擎不做重試。

use chrono::NaiveDate;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::rows::{EntryRow, SaleRow, StockRow};

/// 資料來源錯誤
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// 原始資料列來源（三組資料列彼此獨立，可並行讀取）
pub trait RowSource: Sync {
    /// 庫存批次資料列
    fn stock_rows(&self, company: &str) -> Result<Vec<StockRow>, SourceError>;

    /// 銷售資料列（`from` 與 `to` 皆包含）
    fn sales_rows(
        &self,
        company: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SaleRow>, SourceError>;

    /// 進貨歷史（不限期間）
    fn entry_rows(&self, company: &str) -> Result<Vec<EntryRow>, SourceError>;
}

/// 記憶體內資料來源
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub stock: Vec<StockRow>,
    pub sales: Vec<SaleRow>,
    pub entries: Vec<EntryRow>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置庫存資料列
    pub fn with_stock(mut self, stock: Vec<StockRow>) -> Self {
        self.stock = stock;
        self
    }

    /// 建構器模式：設置銷售資料列
    pub fn with_sales(mut self, sales: Vec<SaleRow>) -> Self {
        self.sales = sales;
        self
    }

    /// 建構器模式：設置進貨歷史
    pub fn with_entries(mut self, entries: Vec<EntryRow>) -> Self {
        self.entries = entries;
        self
    }
}

impl RowSource for InMemorySource {
    fn stock_rows(&self, _company: &str) -> Result<Vec<StockRow>, SourceError> {
        Ok(self.stock.clone())
    }

    fn sales_rows(
        &self,
        _company: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SaleRow>, SourceError> {
        Ok(filter_sales(self.sales.iter().cloned(), from, to))
    }

    fn entry_rows(&self, _company: &str) -> Result<Vec<EntryRow>, SourceError> {
        Ok(self.entries.clone())
    }
}

/// JSON 檔案資料來源（每組資料列一個 JSON 陣列檔）
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    stock_path: PathBuf,
    sales_path: PathBuf,
    entries_path: Option<PathBuf>,
}

impl JsonFileSource {
    pub fn new(stock_path: impl Into<PathBuf>, sales_path: impl Into<PathBuf>) -> Self {
        Self {
            stock_path: stock_path.into(),
            sales_path: sales_path.into(),
            entries_path: None,
        }
    }

    /// 建構器模式：設置進貨歷史檔（未設置時視為沒有任何進貨紀錄）
    pub fn with_entries_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries_path = Some(path.into());
        self
    }

    fn read<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
        let file = File::open(path)
            .map_err(|e| format!("無法開啟 {}: {}", path.display(), e))?;
        let rows = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| format!("無法解析 {}: {}", path.display(), e))?;
        Ok(rows)
    }
}

impl RowSource for JsonFileSource {
    fn stock_rows(&self, _company: &str) -> Result<Vec<StockRow>, SourceError> {
        Self::read(&self.stock_path)
    }

    fn sales_rows(
        &self,
        _company: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SaleRow>, SourceError> {
        let rows: Vec<SaleRow> = Self::read(&self.sales_path)?;
        Ok(filter_sales(rows.into_iter(), from, to))
    }

    fn entry_rows(&self, _company: &str) -> Result<Vec<EntryRow>, SourceError> {
        match &self.entries_path {
            Some(path) => Self::read(path),
            None => Ok(Vec::new()),
        }
    }
}

fn filter_sales(
    rows: impl Iterator<Item = SaleRow>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<SaleRow> {
    rows.filter(|row| from <= row.sale_date && row.sale_date <= to)
        .collect()
}
