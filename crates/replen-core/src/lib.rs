//! # Replen Core
//!
//! 分店庫存補貨引擎的核心資料模型與類型定義

pub mod branch;
pub mod company;
pub mod fact;
pub mod item;
pub mod period;
pub mod proposal;
pub mod rows;
pub mod source;
pub mod verdict;

// Re-export 主要類型
pub use branch::{BranchId, BranchRole};
pub use company::{BranchScope, BranchTopology, CompanyConfig, CompanyRegistry, ReportOptions};
pub use fact::{BranchFact, GradeSales, ItemAggregate};
pub use item::{ColorMap, ItemKey};
pub use period::ReportPeriod;
pub use proposal::{PurchaseProposal, TransferProposal};
pub use rows::{EntryRow, SaleRow, StockRow};
pub use source::{InMemorySource, JsonFileSource, RowSource, SourceError};
pub use verdict::{ActionVerdict, CellStatus};

/// 補貨引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum ReplenError {
    #[error("未知的公司: {0}")]
    UnknownCompany(String),

    #[error("無效的報表期間: 結束日 {end} 早於開始日 {start}")]
    InvalidPeriod {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("無效的公司配置: {0}")]
    InvalidConfig(String),

    /// 資料來源錯誤，原樣向上傳遞
    #[error(transparent)]
    DataSource(SourceError),
}

pub type Result<T> = std::result::Result<T, ReplenError>;
