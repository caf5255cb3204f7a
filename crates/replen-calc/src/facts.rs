//! 商品彙總組裝
//!
//! 將庫存、銷售與進貨歷史合併為每個商品的 [`ItemAggregate`]。

use replen_core::{BranchFact, BranchId, ColorMap, EntryRow, ItemAggregate, ItemKey};
use std::collections::HashSet;

use crate::sales::SalesTotals;
use crate::stock::StockTotals;

/// 商品彙總組裝器
#[derive(Debug, Default)]
pub struct FactAssembler {
    entries: HashSet<(ItemKey, BranchId)>,
}

impl FactAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：載入進貨歷史
    pub fn with_entries<'r>(
        mut self,
        colors: &ColorMap,
        rows: impl IntoIterator<Item = &'r EntryRow>,
    ) -> Self {
        for row in rows {
            let key = colors.item_key(
                &row.product_id,
                &row.color_id,
                row.color_description.as_deref(),
            );
            self.entries.insert((key, row.branch_id.clone()));
        }
        self
    }

    /// 進貨歷史中是否有此商品與分店
    pub fn has_entry(&self, key: &ItemKey, branch: &BranchId) -> bool {
        self.entries.contains(&(key.clone(), branch.clone()))
    }

    /// 組裝商品彙總
    ///
    /// 商品順序：先依庫存首次出現順序，再接上只有銷售的商品。
    /// 分店順序同理：先庫存分店，再只有期間銷售的分店。
    pub fn assemble(&self, stock: &StockTotals, sales: &SalesTotals) -> Vec<ItemAggregate> {
        let stock_keys = stock.iter().map(|item| &item.key);
        let sales_only_keys = sales
            .iter()
            .map(|item| &item.key)
            .filter(|key| stock.get(key).is_none());

        stock_keys
            .chain(sales_only_keys)
            .map(|key| self.assemble_item(key, stock, sales))
            .collect()
    }

    fn assemble_item(&self, key: &ItemKey, stock: &StockTotals, sales: &SalesTotals) -> ItemAggregate {
        let item_stock = stock.get(key);
        let item_sales = sales.get(key);

        let mut branch_ids: Vec<&BranchId> = item_stock
            .map(|s| s.branches.iter().map(|(id, _)| id).collect())
            .unwrap_or_default();
        if let Some(item_sales) = item_sales {
            // 只有近 30 天銷售的分店不建立分店事實
            for branch in item_sales.branches.iter().filter(|b| b.in_period > 0) {
                if !branch_ids.contains(&&branch.branch) {
                    branch_ids.push(&branch.branch);
                }
            }
        }

        let branches = branch_ids
            .into_iter()
            .map(|branch| {
                let stock = item_stock.and_then(|s| s.branch_stock(branch)).unwrap_or(0);
                let sold = item_sales.and_then(|s| s.branch(branch));
                let in_period = sold.map(|b| b.in_period).unwrap_or(0);
                let last_30_days = sold.map(|b| b.last_30_days).unwrap_or(0);

                // 有庫存或有期間銷售即代表曾經進貨
                let received = self.has_entry(key, branch) || stock != 0 || in_period > 0;

                BranchFact::new(branch.clone())
                    .with_stock(stock)
                    .with_sales(in_period)
                    .with_sales_last_30_days(last_30_days)
                    .with_entry(received)
            })
            .collect();

        let mut aggregate = ItemAggregate::new(key.clone())
            .with_total_stock(item_stock.map(|s| s.total_stock()).unwrap_or(0))
            .with_branches(branches);
        aggregate.has_positive_stock = item_stock.map(|s| s.item.has_positive()).unwrap_or(false);
        aggregate.sales_by_grade = item_sales.map(|s| s.sales_by_grade()).unwrap_or_default();
        aggregate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::SalesAggregator;
    use crate::stock::StockAggregator;
    use chrono::NaiveDate;
    use replen_core::{ReportPeriod, SaleRow, StockRow};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn assemble(
        stock_rows: &[StockRow],
        sale_rows: &[SaleRow],
        entry_rows: &[EntryRow],
    ) -> Vec<ItemAggregate> {
        let colors = ColorMap::new();
        let period = ReportPeriod::new(date(1), date(30)).unwrap();
        let stock = StockAggregator::new(&colors).aggregate(stock_rows);
        let sales = SalesAggregator::new(&colors, period).aggregate(sale_rows);
        FactAssembler::new()
            .with_entries(&colors, entry_rows)
            .assemble(&stock, &sales)
    }

    #[test]
    fn test_union_of_stock_and_sales_branches() {
        let items = assemble(
            &[StockRow::new("P1", "PRETO", "NERD", 9)],
            &[
                SaleRow::new("P1", "PRETO", "NERD LEBLON", 3, date(10)),
                SaleRow::new("P2", "AZUL", "NERD", 1, date(11)),
            ],
            &[],
        );

        assert_eq!(items.len(), 2);
        let p1 = &items[0];
        assert_eq!(p1.total_stock, 9);
        assert_eq!(p1.total_sales_in_period, 3);
        let branches: Vec<_> = p1.branches.iter().map(|b| b.branch.as_str()).collect();
        assert_eq!(branches, vec!["NERD", "NERD LEBLON"]);

        let p2 = &items[1];
        assert_eq!(p2.key, ItemKey::new("P2", "AZUL"));
        assert_eq!(p2.total_stock, 0);
        assert!(!p2.has_positive_stock);
    }

    #[test]
    fn test_trailing_window_sales_do_not_add_branch() {
        let colors = ColorMap::new();
        let period = ReportPeriod::new(date(25), date(30)).unwrap();
        let stock = StockAggregator::new(&colors).aggregate(&[StockRow::new("P1", "PRETO", "L1", 5)]);
        let sales = SalesAggregator::new(&colors, period).aggregate(&[
            SaleRow::new("P1", "PRETO", "L1", 2, date(26)),
            SaleRow::new("P1", "PRETO", "L2", 3, date(5)),
        ]);
        let items = FactAssembler::new().assemble(&stock, &sales);

        let item = &items[0];
        assert_eq!(item.branches.len(), 1);
        assert!(item.branch(&BranchId::new("L2")).is_none());
        assert_eq!(item.branches[0].sales_last_30_days, 2);
    }

    #[test]
    fn test_entry_history_and_inference() {
        let items = assemble(
            &[
                StockRow::new("P1", "PRETO", "A", 0),
                StockRow::new("P1", "PRETO", "B", 0),
                StockRow::new("P1", "PRETO", "C", 2),
            ],
            &[],
            &[EntryRow::new("P1", "PRETO", "b")],
        );
        let item = &items[0];

        let received = |id: &str| item.branch(&BranchId::new(id)).unwrap().ever_received_entry;
        assert!(!received("A"));
        assert!(received("B"));
        assert!(received("C"));
    }
}
