//! 銷售彙總

use replen_core::{BranchId, ColorMap, GradeSales, ItemKey, ReportPeriod, SaleRow};
use std::collections::{BTreeMap, HashMap};

/// 單一分店的銷售
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSales {
    pub branch: BranchId,
    /// 報表期間銷售
    pub in_period: i64,
    /// 近 30 天銷售（以報表結束日為錨點）
    pub last_30_days: i64,
}

/// 單一商品的銷售
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSales {
    pub key: ItemKey,

    /// 各分店銷售（依首次出現順序）
    pub branches: Vec<BranchSales>,

    by_grade: BTreeMap<String, i64>,
}

impl ItemSales {
    fn new(key: ItemKey) -> Self {
        Self {
            key,
            branches: Vec::new(),
            by_grade: BTreeMap::new(),
        }
    }

    /// 期間總銷售
    pub fn total_in_period(&self) -> i64 {
        self.branches.iter().map(|b| b.in_period).sum()
    }

    /// 查詢分店銷售
    pub fn branch(&self, branch: &BranchId) -> Option<&BranchSales> {
        self.branches.iter().find(|b| &b.branch == branch)
    }

    /// 期間銷售的尺寸明細（依尺寸排序，略過 0）
    pub fn sales_by_grade(&self) -> Vec<GradeSales> {
        self.by_grade
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(grade, &quantity)| GradeSales {
                grade: grade.clone(),
                quantity,
            })
            .collect()
    }

    fn branch_mut(&mut self, branch: &BranchId) -> &mut BranchSales {
        let slot = match self.branches.iter().position(|b| &b.branch == branch) {
            Some(i) => i,
            None => {
                self.branches.push(BranchSales {
                    branch: branch.clone(),
                    in_period: 0,
                    last_30_days: 0,
                });
                self.branches.len() - 1
            }
        };
        &mut self.branches[slot]
    }
}

/// 銷售彙總結果（商品依首次出現順序）
#[derive(Debug, Clone, Default)]
pub struct SalesTotals {
    items: Vec<ItemSales>,
    index: HashMap<ItemKey, usize>,
}

impl SalesTotals {
    pub fn get(&self, key: &ItemKey) -> Option<&ItemSales> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemSales> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 銷售彙總器
///
/// 期間銷售與近 30 天銷售各自依日期判斷，一筆銷售可能同時計入兩者。
/// 兩個範圍都不涵蓋的資料列直接略過。
#[derive(Debug, Clone, Copy)]
pub struct SalesAggregator<'a> {
    colors: &'a ColorMap,
    period: ReportPeriod,
}

impl<'a> SalesAggregator<'a> {
    pub fn new(colors: &'a ColorMap, period: ReportPeriod) -> Self {
        Self { colors, period }
    }

    /// 彙總銷售資料列
    pub fn aggregate<'r>(&self, rows: impl IntoIterator<Item = &'r SaleRow>) -> SalesTotals {
        let mut totals = SalesTotals::default();
        let mut skipped = 0usize;

        for row in rows {
            let in_period = self.period.contains(row.sale_date);
            let in_window = self.period.in_trailing_window(row.sale_date);
            if !in_period && !in_window {
                skipped += 1;
                continue;
            }

            let key = self.colors.item_key(
                &row.product_id,
                &row.color_id,
                row.color_description.as_deref(),
            );
            let slot = match totals.index.get(&key) {
                Some(&i) => i,
                None => {
                    totals.items.push(ItemSales::new(key.clone()));
                    totals.index.insert(key, totals.items.len() - 1);
                    totals.items.len() - 1
                }
            };

            let quantity = row.effective_quantity();
            let item = &mut totals.items[slot];
            let branch = item.branch_mut(&row.branch_id);
            if in_period {
                branch.in_period += quantity;
            }
            if in_window {
                branch.last_30_days += quantity;
            }

            if in_period {
                if let Some(grade) = row.grade.as_deref().map(str::trim) {
                    if !grade.is_empty() {
                        *item.by_grade.entry(grade.to_uppercase()).or_insert(0) += quantity;
                    }
                }
            }
        }

        tracing::debug!(
            "銷售彙總完成，商品數量: {}，略過範圍外資料列: {}",
            totals.len(),
            skipped
        );

        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn period() -> ReportPeriod {
        // 期間 11/01 ~ 11/10；近 30 天視窗 10/12 ~ 11/10
        ReportPeriod::new(date(11, 1), date(11, 10)).unwrap()
    }

    #[test]
    fn test_period_and_trailing_window() {
        let rows = vec![
            SaleRow::new("P1", "PRETO", "A", 2, date(11, 5)),
            SaleRow::new("P1", "PRETO", "A", 3, date(10, 20)),
            SaleRow::new("P1", "PRETO", "A", 7, date(10, 1)),
            SaleRow::new("P1", "PRETO", "A", 1, date(11, 11)),
        ];
        let colors = ColorMap::new();
        let totals = SalesAggregator::new(&colors, period()).aggregate(&rows);
        let item = totals.get(&ItemKey::new("P1", "PRETO")).unwrap();
        let branch = item.branch(&BranchId::new("A")).unwrap();

        assert_eq!(branch.in_period, 2);
        assert_eq!(branch.last_30_days, 5);
        assert_eq!(item.total_in_period(), 2);
    }

    #[test]
    fn test_window_boundaries_are_inclusive() {
        let rows = vec![
            SaleRow::new("P1", "PRETO", "A", 1, date(10, 12)),
            SaleRow::new("P1", "PRETO", "A", 1, date(10, 11)),
            SaleRow::new("P1", "PRETO", "A", 1, date(11, 1)),
            SaleRow::new("P1", "PRETO", "A", 1, date(11, 10)),
        ];
        let colors = ColorMap::new();
        let totals = SalesAggregator::new(&colors, period()).aggregate(&rows);
        let branch = totals.iter().next().unwrap().branches[0].clone();

        assert_eq!(branch.in_period, 2);
        assert_eq!(branch.last_30_days, 3);
    }

    #[test]
    fn test_cancelled_lines_contribute_zero() {
        let rows = vec![
            SaleRow::new("P1", "PRETO", "A", 4, date(11, 2)),
            SaleRow::new("P1", "PRETO", "A", 4, date(11, 2)).with_cancelled_quantity(4),
        ];
        let colors = ColorMap::new();
        let totals = SalesAggregator::new(&colors, period()).aggregate(&rows);

        assert_eq!(totals.iter().next().unwrap().total_in_period(), 4);
    }

    #[test]
    fn test_sales_by_grade_sorted() {
        let rows = vec![
            SaleRow::new("P1", "PRETO", "A", 2, date(11, 2)).with_grade("m"),
            SaleRow::new("P1", "PRETO", "B", 1, date(11, 3)).with_grade("G"),
            SaleRow::new("P1", "PRETO", "A", 1, date(11, 4)).with_grade("M"),
            SaleRow::new("P1", "PRETO", "A", 5, date(10, 20)).with_grade("P"),
        ];
        let colors = ColorMap::new();
        let totals = SalesAggregator::new(&colors, period()).aggregate(&rows);
        let grades = totals.iter().next().unwrap().sales_by_grade();

        assert_eq!(
            grades,
            vec![
                GradeSales { grade: "G".to_string(), quantity: 1 },
                GradeSales { grade: "M".to_string(), quantity: 3 },
            ]
        );
    }
}
