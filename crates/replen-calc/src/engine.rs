//! 補貨主計算器

use replen_core::{
    CompanyConfig, CompanyRegistry, EntryRow, ItemAggregate, ReplenError, ReportOptions,
    ReportPeriod, RowSource, SaleRow, StockRow,
};
use std::collections::BTreeMap;

use crate::allocator::TransferAllocator;
use crate::cell_status::classify_cell;
use crate::classifier::{ActionClassifier, StockLevel};
use crate::facts::FactAssembler;
use crate::projection::DemandProjector;
use crate::purchase::PurchasePlanner;
use crate::sales::SalesAggregator;
use crate::stock::StockAggregator;
use crate::{AnalyzedItem, BranchCell, ReplenWarning, ReplenishmentReport, ReportSummary};

/// 一次計算所需的三組資料列
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub stock: Vec<StockRow>,
    pub sales: Vec<SaleRow>,
    pub entries: Vec<EntryRow>,
}

impl RowSet {
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

/// 補貨計算器
#[derive(Debug, Clone, Default)]
pub struct ReplenishmentEngine {
    /// 公司配置
    registry: CompanyRegistry,

    /// 報表選項
    options: ReportOptions,
}

impl ReplenishmentEngine {
    /// 創建新的補貨計算器
    pub fn new(registry: CompanyRegistry) -> Self {
        Self {
            registry,
            options: ReportOptions::default(),
        }
    }

    /// 建構器模式：設置報表選項
    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &CompanyRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// 從資料來源讀取資料列並計算
    ///
    /// 三組資料列並行讀取；任何一組失敗即回傳該錯誤，不做部分計算。
    pub fn run<S>(
        &self,
        source: &S,
        company: &str,
        period: ReportPeriod,
    ) -> replen_core::Result<ReplenishmentReport>
    where
        S: RowSource + ?Sized,
    {
        // 未知公司或無效範圍不應觸發任何讀取
        let config = self.registry.get(company)?;
        config.validate_scope(&self.options.scope)?;
        let key = config.key.as_str();

        tracing::info!(
            "讀取資料列：公司 {}，銷售 {} ~ {}",
            key,
            period.sales_fetch_start(),
            period.end
        );

        let (stock, (sales, entries)) = rayon::join(
            || source.stock_rows(key),
            || {
                rayon::join(
                    || source.sales_rows(key, period.sales_fetch_start(), period.end),
                    || source.entry_rows(key),
                )
            },
        );

        let rows = RowSet::new()
            .with_stock(stock.map_err(ReplenError::DataSource)?)
            .with_sales(sales.map_err(ReplenError::DataSource)?)
            .with_entries(entries.map_err(ReplenError::DataSource)?);

        self.calculate(company, period, &rows)
    }

    /// 主計算入口
    pub fn calculate(
        &self,
        company: &str,
        period: ReportPeriod,
        rows: &RowSet,
    ) -> replen_core::Result<ReplenishmentReport> {
        let config = self.registry.get(company)?;
        config.validate_scope(&self.options.scope)?;

        tracing::info!(
            "開始補貨計算：公司 {}，庫存 {} 筆，銷售 {} 筆，進貨 {} 筆",
            config.key,
            rows.stock.len(),
            rows.sales.len(),
            rows.entries.len()
        );

        let start_time = std::time::Instant::now();
        let topology = config.topology();
        let scope = &self.options.scope;

        // Step 1: 庫存對帳
        tracing::debug!("Step 1: 庫存對帳");
        let stock = StockAggregator::new(&config.colors).aggregate(
            rows.stock
                .iter()
                .filter(|row| config.in_scope(&row.branch_id, scope)),
        );

        // Step 2: 銷售彙總
        tracing::debug!("Step 2: 銷售彙總");
        let sales = SalesAggregator::new(&config.colors, period).aggregate(
            rows.sales
                .iter()
                .filter(|row| config.in_scope(&row.branch_id, scope)),
        );

        // Step 3: 組裝商品彙總
        tracing::debug!("Step 3: 組裝商品彙總");
        let mut items = FactAssembler::new()
            .with_entries(
                &config.colors,
                rows.entries
                    .iter()
                    .filter(|row| config.in_scope(&row.branch_id, scope)),
            )
            .assemble(&stock, &sales);

        if !self.options.include_items_without_sales {
            items.retain(|item| item.total_sales_in_period > 0);
        }
        items.sort_by(|a, b| b.total_sales_in_period.cmp(&a.total_sales_in_period));
        tracing::debug!("商品數量: {}", items.len());

        // Step 4: 逐商品判定
        tracing::debug!("Step 4: 逐商品判定");
        let mut report = ReplenishmentReport::empty(config.key.clone(), period, topology.clone());
        let projector = DemandProjector::for_period(&period);
        let classifier = ActionClassifier::new(topology.ordinary_count(), projector);
        let allocator = TransferAllocator::new(&topology, projector);
        let planner = PurchasePlanner::new(&topology, projector);

        for item in items {
            let assessment = classifier.classify(&item);

            if assessment.transfer_triggered {
                let outcome = allocator.allocate(&item);
                report.transfers.extend(outcome.proposals);
                for warning in outcome.warnings {
                    report.add_warning(warning);
                }
            }

            if let Some(StockLevel::Purchase { quantity }) = assessment.stock_level {
                match planner.plan(&item, quantity) {
                    Some(proposal) => report.purchases.push(proposal),
                    None => report.add_warning(ReplenWarning::info(
                        item.key.to_string(),
                        format!("建議採購 {} 件，但沒有可指派的分店", quantity),
                    )),
                }
            }

            let cells = Self::cells(config, &item);
            report.items.push(AnalyzedItem {
                aggregate: item,
                assessment,
                cells,
            });
        }

        // Step 5: 摘要
        tracing::debug!("Step 5: 摘要");
        report.summary = Self::summarize(&report, stock.positive_stock_total());
        report.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("補貨計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "商品 {} 個，調撥建議 {} 筆，採購建議 {} 筆",
            report.items.len(),
            report.transfers.len(),
            report.purchases.len()
        );

        Ok(report)
    }

    fn cells(config: &CompanyConfig, item: &ItemAggregate) -> Vec<BranchCell> {
        item.branches
            .iter()
            .map(|fact| BranchCell {
                branch: fact.branch.clone(),
                display_name: config.display_name(&fact.branch).to_string(),
                status: classify_cell(fact),
            })
            .collect()
    }

    fn summarize(report: &ReplenishmentReport, positive_stock_total: i64) -> ReportSummary {
        let mut verdict_counts: BTreeMap<String, usize> = BTreeMap::new();
        for item in &report.items {
            *verdict_counts
                .entry(item.verdict().code().to_string())
                .or_insert(0) += 1;
        }

        ReportSummary {
            item_count: report.items.len(),
            positive_stock_total,
            total_sales_in_period: report
                .items
                .iter()
                .map(|i| i.aggregate.total_sales_in_period)
                .sum(),
            verdict_counts,
            transfer_count: report.transfers.len(),
            purchase_count: report.purchases.len(),
        }
    }
}
