//! 分店儲存格狀態

use replen_core::{BranchFact, CellStatus};

/// 判定分店儲存格狀態
///
/// 只看單一分店的事實，與商品層級的行動判定無關。
pub fn classify_cell(fact: &BranchFact) -> CellStatus {
    let exists = fact.stock != 0;

    if !exists && !fact.ever_received_entry {
        CellStatus::NoStockNeverReceived
    } else if !exists {
        CellStatus::Normal
    } else if fact.stock <= 1 && fact.sales_in_period > 0 {
        CellStatus::LowStockWithSales
    } else if fact.stock > 1 && fact.sales_in_period == 0 && fact.sales_last_30_days == 0 {
        CellStatus::ExcessNoSales
    } else {
        CellStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use replen_core::BranchId;
    use rstest::rstest;

    fn fact(stock: i64, sales: i64, last_30: i64, entry: bool) -> BranchFact {
        BranchFact::new(BranchId::new("NERD LEBLON"))
            .with_stock(stock)
            .with_sales(sales)
            .with_sales_last_30_days(last_30)
            .with_entry(entry)
    }

    #[rstest]
    #[case(0, 0, 0, false, CellStatus::NoStockNeverReceived)]
    #[case(0, 0, 0, true, CellStatus::Normal)]
    #[case(0, 3, 3, true, CellStatus::Normal)]
    #[case(1, 2, 2, true, CellStatus::LowStockWithSales)]
    #[case(-2, 1, 1, true, CellStatus::LowStockWithSales)]
    #[case(5, 0, 0, true, CellStatus::ExcessNoSales)]
    #[case(5, 0, 4, true, CellStatus::Normal)]
    #[case(1, 0, 0, true, CellStatus::Normal)]
    #[case(8, 2, 2, true, CellStatus::Normal)]
    fn test_classify_cell(
        #[case] stock: i64,
        #[case] sales: i64,
        #[case] last_30: i64,
        #[case] entry: bool,
        #[case] expected: CellStatus,
    ) {
        assert_eq!(classify_cell(&fact(stock, sales, last_30, entry)), expected);
    }

    proptest! {
        #[test]
        fn test_never_received_requires_no_entry(
            stock in -5i64..50,
            sales in 0i64..20,
            last_30 in 0i64..20,
        ) {
            let status = classify_cell(&fact(stock, sales, last_30, true));
            prop_assert_ne!(status, CellStatus::NoStockNeverReceived);
        }

        #[test]
        fn test_low_and_excess_are_exclusive(
            stock in -5i64..50,
            sales in 0i64..20,
            last_30 in 0i64..20,
            entry in any::<bool>(),
        ) {
            let fact = fact(stock, sales, last_30, entry);
            let status = classify_cell(&fact);
            if status == CellStatus::LowStockWithSales {
                prop_assert!(fact.sales_in_period > 0);
            }
            if status == CellStatus::ExcessNoSales {
                prop_assert!(fact.stock > 1 && fact.sales_in_period == 0);
            }
        }
    }
}
