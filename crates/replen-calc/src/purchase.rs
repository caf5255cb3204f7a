//! 採購建議

use replen_core::{BranchFact, BranchId, BranchTopology, ItemAggregate, PurchaseProposal};
use rust_decimal::Decimal;

use crate::projection::DemandProjector;

/// 分店補貨門檻的下限
const BRANCH_THRESHOLD_FLOOR: i64 = 15;

/// 分店補貨門檻的倍數（乘上分店月預測）
const BRANCH_THRESHOLD_FACTOR: i64 = 15;

/// 採購建議規劃器
#[derive(Debug, Clone, Copy)]
pub struct PurchasePlanner<'a> {
    topology: &'a BranchTopology,
    projector: DemandProjector,
}

impl<'a> PurchasePlanner<'a> {
    pub fn new(topology: &'a BranchTopology, projector: DemandProjector) -> Self {
        Self {
            topology,
            projector,
        }
    }

    /// 建立採購建議
    ///
    /// 數量為 0 或找不到任何需要補貨的分店時不建立。
    pub fn plan(&self, item: &ItemAggregate, quantity: i64) -> Option<PurchaseProposal> {
        if quantity <= 0 {
            return None;
        }

        let branches = self.branches_needing(item);
        if branches.is_empty() {
            tracing::debug!(item = %item.key, "沒有需要補貨的分店，略過採購建議");
            return None;
        }

        Some(PurchaseProposal::new(item.key.clone(), quantity).with_branches(branches))
    }

    /// 需要補貨的分店
    ///
    /// 依序嘗試：庫存低於門檻的銷售分店 → 所有銷售分店 → 中央倉庫 → 第一個一般分店。
    pub fn branches_needing(&self, item: &ItemAggregate) -> Vec<BranchId> {
        let below_threshold: Vec<BranchId> = item
            .selling_branches()
            .filter(|b| Decimal::from(b.stock) < self.threshold(b))
            .map(|b| b.branch.clone())
            .collect();
        if !below_threshold.is_empty() {
            return below_threshold;
        }

        let selling: Vec<BranchId> = item.selling_branches().map(|b| b.branch.clone()).collect();
        if !selling.is_empty() {
            return selling;
        }

        self.topology
            .central_warehouse
            .as_ref()
            .or_else(|| self.topology.ordinary_branches.first())
            .cloned()
            .into_iter()
            .collect()
    }

    fn threshold(&self, branch: &BranchFact) -> Decimal {
        let projected = self.projector.projected_monthly(branch.sales_in_period);
        (projected * Decimal::from(BRANCH_THRESHOLD_FACTOR)).max(Decimal::from(BRANCH_THRESHOLD_FLOOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replen_core::ItemKey;

    fn topology(central: Option<&str>, ordinary: &[&str]) -> BranchTopology {
        BranchTopology {
            central_warehouse: central.map(BranchId::new),
            online_channel: None,
            ordinary_branches: ordinary.iter().map(BranchId::new).collect(),
        }
    }

    fn item(branches: Vec<BranchFact>) -> ItemAggregate {
        ItemAggregate::new(ItemKey::new("P1", "PRETO"))
            .with_total_stock(branches.iter().map(|b| b.stock).sum())
            .with_branches(branches)
    }

    fn fact(branch: &str, stock: i64, sales: i64) -> BranchFact {
        BranchFact::new(BranchId::new(branch))
            .with_stock(stock)
            .with_sales(sales)
    }

    #[test]
    fn test_selling_branches_below_threshold() {
        let topology = topology(Some("CD"), &["L1", "L2"]);
        let planner = PurchasePlanner::new(&topology, DemandProjector::new(30));
        // L1 月預測 1 → 門檻 15；L2 月預測 2 → 門檻 30
        let item = item(vec![fact("CD", 50, 0), fact("L1", 20, 1), fact("L2", 20, 2)]);

        assert_eq!(planner.branches_needing(&item), vec![BranchId::new("L2")]);
    }

    #[test]
    fn test_fallback_to_all_selling_branches() {
        let topology = topology(Some("CD"), &["L1", "L2"]);
        let planner = PurchasePlanner::new(&topology, DemandProjector::new(30));
        let item = item(vec![fact("L1", 100, 1), fact("L2", 100, 1)]);

        assert_eq!(
            planner.branches_needing(&item),
            vec![BranchId::new("L1"), BranchId::new("L2")]
        );
    }

    #[test]
    fn test_fallback_to_central_then_first_ordinary() {
        let item = item(vec![fact("L1", 3, 0)]);

        let with_central = topology(Some("CD"), &["L1", "L2"]);
        let planner = PurchasePlanner::new(&with_central, DemandProjector::new(30));
        assert_eq!(planner.branches_needing(&item), vec![BranchId::new("CD")]);

        let without_central = topology(None, &["L1", "L2"]);
        let planner = PurchasePlanner::new(&without_central, DemandProjector::new(30));
        assert_eq!(planner.branches_needing(&item), vec![BranchId::new("L1")]);

        let empty = topology(None, &[]);
        let planner = PurchasePlanner::new(&empty, DemandProjector::new(30));
        assert!(planner.plan(&item, 10).is_none());
    }

    #[test]
    fn test_zero_quantity_yields_no_proposal() {
        let topology = topology(Some("CD"), &["L1"]);
        let planner = PurchasePlanner::new(&topology, DemandProjector::new(30));
        let item = item(vec![fact("L1", 0, 5)]);

        assert!(planner.plan(&item, 0).is_none());
        let proposal = planner.plan(&item, 40).unwrap();
        assert_eq!(proposal.quantity, 40);
        assert_eq!(proposal.branches, vec![BranchId::new("L1")]);
    }
}
