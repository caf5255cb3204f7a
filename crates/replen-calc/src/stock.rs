//! 庫存對帳
//!
//! 同一分店的庫存批次可能同時有正數與負數（庫存修正）。
//! 只要有任何正數批次，就只採信正數加總；全部非正時才採用正負合計。

use replen_core::{BranchId, ColorMap, ItemKey, StockRow};
use std::collections::HashMap;

/// 單一分組的對帳累加器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockReconciliation {
    /// 正數批次加總
    pub positive_sum: i64,
    /// 負數批次加總
    pub negative_sum: i64,
    /// 正數批次筆數
    pub positive_count: usize,
}

impl StockReconciliation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一筆批次數量
    pub fn add(&mut self, quantity: i64) {
        if quantity > 0 {
            self.positive_sum += quantity;
            self.positive_count += 1;
        } else if quantity < 0 {
            self.negative_sum += quantity;
        }
    }

    /// 對帳後庫存
    pub fn value(&self) -> i64 {
        if self.positive_count > 0 {
            self.positive_sum
        } else {
            self.positive_sum + self.negative_sum
        }
    }

    /// 是否有任何正數批次
    pub fn has_positive(&self) -> bool {
        self.positive_count > 0
    }
}

impl FromIterator<i64> for StockReconciliation {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut reconciliation = Self::new();
        for quantity in iter {
            reconciliation.add(quantity);
        }
        reconciliation
    }
}

/// 單一商品的庫存對帳結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStock {
    pub key: ItemKey,

    /// 商品層級對帳（所有分店的批次一起套用同一規則）
    pub item: StockReconciliation,

    /// 分店層級對帳（依首次出現順序）
    pub branches: Vec<(BranchId, StockReconciliation)>,
}

impl ItemStock {
    fn new(key: ItemKey) -> Self {
        Self {
            key,
            item: StockReconciliation::new(),
            branches: Vec::new(),
        }
    }

    /// 商品總庫存
    pub fn total_stock(&self) -> i64 {
        self.item.value()
    }

    /// 分店對帳後庫存
    pub fn branch_stock(&self, branch: &BranchId) -> Option<i64> {
        self.branches
            .iter()
            .find(|(id, _)| id == branch)
            .map(|(_, r)| r.value())
    }

    fn add(&mut self, branch: &BranchId, quantity: i64) {
        self.item.add(quantity);

        match self.branches.iter_mut().find(|(id, _)| id == branch) {
            Some((_, reconciliation)) => reconciliation.add(quantity),
            None => {
                let mut reconciliation = StockReconciliation::new();
                reconciliation.add(quantity);
                self.branches.push((branch.clone(), reconciliation));
            }
        }
    }
}

/// 庫存彙總結果（商品依首次出現順序）
#[derive(Debug, Clone, Default)]
pub struct StockTotals {
    items: Vec<ItemStock>,
    index: HashMap<ItemKey, usize>,
}

impl StockTotals {
    /// 查詢商品
    pub fn get(&self, key: &ItemKey) -> Option<&ItemStock> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemStock> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 正庫存 KPI：排除沒有任何正數批次的商品
    ///
    /// 與對帳規則不同，這裡完全不計入全負商品。
    pub fn positive_stock_total(&self) -> i64 {
        self.items
            .iter()
            .filter(|item| item.item.has_positive())
            .map(ItemStock::total_stock)
            .sum()
    }
}

/// 庫存彙總器
#[derive(Debug, Clone, Copy)]
pub struct StockAggregator<'a> {
    colors: &'a ColorMap,
}

impl<'a> StockAggregator<'a> {
    pub fn new(colors: &'a ColorMap) -> Self {
        Self { colors }
    }

    /// 將庫存批次彙總為商品與分店兩個層級
    pub fn aggregate<'r>(&self, rows: impl IntoIterator<Item = &'r StockRow>) -> StockTotals {
        let mut totals = StockTotals::default();

        for row in rows {
            let key = self.colors.item_key(
                &row.product_id,
                &row.color_id,
                row.color_description.as_deref(),
            );

            let slot = match totals.index.get(&key) {
                Some(&i) => i,
                None => {
                    totals.items.push(ItemStock::new(key.clone()));
                    totals.index.insert(key, totals.items.len() - 1);
                    totals.items.len() - 1
                }
            };

            totals.items[slot].add(&row.branch_id, row.quantity);
        }

        tracing::debug!("庫存彙總完成，商品數量: {}", totals.len());

        totals
    }
}
