//! 分店間調撥分配

use replen_core::{BranchId, BranchTopology, ItemAggregate, TransferProposal};
use rust_decimal::Decimal;

use crate::projection::{ceil_units, DemandProjector};
use crate::ReplenWarning;

/// 可作為調出來源的最低庫存
const SURPLUS_MIN_STOCK: i64 = 2;

/// 調撥的最低數量
const MIN_TRANSFER_QUANTITY: i64 = 2;

/// 調撥分配結果
#[derive(Debug, Clone, Default)]
pub struct AllocationOutcome {
    pub proposals: Vec<TransferProposal>,
    pub warnings: Vec<ReplenWarning>,
}

/// 調撥分配器
///
/// 依缺貨分店的出現順序逐一分配來源：中央倉庫 → 線上通路 → 庫存最多的分店。
/// 每次建議後扣減來源的剩餘庫存，已被使用的餘量不會再提供給下一個分店。
#[derive(Debug, Clone, Copy)]
pub struct TransferAllocator<'a> {
    topology: &'a BranchTopology,
    projector: DemandProjector,
}

impl<'a> TransferAllocator<'a> {
    pub fn new(topology: &'a BranchTopology, projector: DemandProjector) -> Self {
        Self {
            topology,
            projector,
        }
    }

    /// 為單一商品分配調撥
    ///
    /// 只應對調撥觸發條件成立的商品呼叫。
    pub fn allocate(&self, item: &ItemAggregate) -> AllocationOutcome {
        let mut outcome = AllocationOutcome::default();
        let mut remaining: Vec<(BranchId, i64)> = item
            .branches
            .iter()
            .map(|b| (b.branch.clone(), b.stock))
            .collect();

        for destination in item.branches.iter().filter(|b| b.is_starved()) {
            if outcome
                .proposals
                .iter()
                .any(|p| p.destination == destination.branch)
            {
                continue;
            }

            let Some(source_slot) = self.pick_source(&remaining, &destination.branch) else {
                tracing::warn!(
                    item = %item.key,
                    destination = %destination.branch,
                    "沒有可調出的來源分店"
                );
                outcome.warnings.push(ReplenWarning::warning(
                    item.key.to_string(),
                    format!("分店 {} 缺貨但沒有可調出的來源", destination.branch),
                ));
                continue;
            };

            let min_stock = self.projector.targets(destination.sales_in_period).min_stock;
            let needed = (min_stock - Decimal::from(destination.stock))
                .max(Decimal::from(MIN_TRANSFER_QUANTITY));
            let available = Decimal::from(remaining[source_slot].1 - 1);
            let quantity = ceil_units(needed.min(available));

            if quantity <= 0 {
                continue;
            }

            let source = remaining[source_slot].0.clone();
            remaining[source_slot].1 -= quantity;

            tracing::debug!(
                item = %item.key,
                source = %source,
                destination = %destination.branch,
                quantity,
                "調撥建議"
            );

            outcome.proposals.push(TransferProposal::new(
                item.key.clone(),
                source,
                destination.branch.clone(),
                quantity,
            ));
        }

        outcome
    }

    /// 選擇來源：中央倉庫 → 線上通路 → 庫存最多的分店（同數量取先出現者）
    fn pick_source(&self, remaining: &[(BranchId, i64)], destination: &BranchId) -> Option<usize> {
        let is_surplus =
            |(id, stock): &(BranchId, i64)| id != destination && *stock >= SURPLUS_MIN_STOCK;

        let preferred = [
            self.topology.central_warehouse.as_ref(),
            self.topology.online_channel.as_ref(),
        ];
        for branch in preferred.into_iter().flatten() {
            if let Some(slot) = remaining
                .iter()
                .position(|entry| &entry.0 == branch && is_surplus(entry))
            {
                return Some(slot);
            }
        }

        remaining
            .iter()
            .enumerate()
            .filter(|(_, entry)| is_surplus(*entry))
            .fold(None, |best: Option<(usize, i64)>, (slot, (_, stock))| match best {
                Some((_, best_stock)) if best_stock >= *stock => best,
                _ => Some((slot, *stock)),
            })
            .map(|(slot, _)| slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replen_core::{BranchFact, ItemKey};

    fn topology(central: Option<&str>, online: Option<&str>, ordinary: &[&str]) -> BranchTopology {
        BranchTopology {
            central_warehouse: central.map(BranchId::new),
            online_channel: online.map(BranchId::new),
            ordinary_branches: ordinary.iter().map(BranchId::new).collect(),
        }
    }

    fn fact(branch: &str, stock: i64, sales: i64) -> BranchFact {
        BranchFact::new(BranchId::new(branch))
            .with_stock(stock)
            .with_sales(sales)
    }

    fn item(branches: Vec<BranchFact>) -> ItemAggregate {
        let total = branches.iter().map(|b| b.stock).sum();
        ItemAggregate::new(ItemKey::new("P1", "PRETO"))
            .with_total_stock(total)
            .with_branches(branches)
    }

    #[test]
    fn test_central_warehouse_bounded_by_available() {
        let topology = topology(Some("CD"), None, &["L1", "L2", "L3", "L4"]);
        let allocator = TransferAllocator::new(&topology, DemandProjector::new(30));
        let outcome = allocator.allocate(&item(vec![fact("CD", 9, 0), fact("L1", 0, 3)]));

        // 最低庫存 15，需要 15，可調出 9 − 1 = 8
        assert_eq!(outcome.proposals.len(), 1);
        let proposal = &outcome.proposals[0];
        assert_eq!(proposal.source, BranchId::new("CD"));
        assert_eq!(proposal.destination, BranchId::new("L1"));
        assert_eq!(proposal.quantity, 8);
    }

    #[test]
    fn test_consumed_surplus_not_reoffered() {
        let topology = topology(Some("CD"), None, &["L1", "L2"]);
        let allocator = TransferAllocator::new(&topology, DemandProjector::new(30));
        let outcome = allocator.allocate(&item(vec![
            fact("CD", 3, 0),
            fact("L1", 0, 2),
            fact("L2", 0, 1),
        ]));

        assert_eq!(outcome.proposals.len(), 1);
        assert_eq!(outcome.proposals[0].quantity, 2);
        assert_eq!(outcome.proposals[0].destination, BranchId::new("L1"));
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_source_preference_order() {
        let topology = topology(Some("CD"), Some("WEB"), &["L1", "L2", "L3"]);
        let allocator = TransferAllocator::new(&topology, DemandProjector::new(30));

        // 中央倉庫不足 2 件 → 線上通路
        let outcome = allocator.allocate(&item(vec![
            fact("CD", 1, 0),
            fact("L2", 30, 0),
            fact("WEB", 4, 0),
            fact("L1", 0, 1),
        ]));
        assert_eq!(outcome.proposals[0].source, BranchId::new("WEB"));
        assert_eq!(outcome.proposals[0].quantity, 3);

        // 都沒有 → 庫存最多者，同數量取先出現者
        let outcome = allocator.allocate(&item(vec![
            fact("L2", 20, 0),
            fact("L3", 20, 0),
            fact("L1", -1, 1),
        ]));
        assert_eq!(outcome.proposals[0].source, BranchId::new("L2"));
        assert_eq!(outcome.proposals[0].quantity, 16);
    }

    #[test]
    fn test_destination_min_stock_uses_branch_rate() {
        let topology = topology(Some("CD"), None, &["L1"]);
        // 期間 10 天：分店銷售 20 → 日銷售 2 → 最低 30
        let allocator = TransferAllocator::new(&topology, DemandProjector::new(10));
        let outcome = allocator.allocate(&item(vec![fact("CD", 100, 0), fact("L1", 0, 20)]));

        assert_eq!(outcome.proposals[0].quantity, 30);
    }

    #[test]
    fn test_no_source_records_warning() {
        let topology = topology(Some("CD"), None, &["L1"]);
        let allocator = TransferAllocator::new(&topology, DemandProjector::new(30));
        let outcome = allocator.allocate(&item(vec![fact("CD", 1, 0), fact("L1", 0, 2)]));

        assert!(outcome.proposals.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }
}
