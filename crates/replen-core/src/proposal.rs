//! 補貨建議模型

use serde::{Deserialize, Serialize};

use crate::branch::BranchId;
use crate::item::ItemKey;

/// 調撥建議
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferProposal {
    /// 商品
    pub item: ItemKey,

    /// 調出分店
    pub source: BranchId,

    /// 調入分店
    pub destination: BranchId,

    /// 調撥數量（> 0）
    pub quantity: i64,
}

impl TransferProposal {
    pub fn new(item: ItemKey, source: BranchId, destination: BranchId, quantity: i64) -> Self {
        Self {
            item,
            source,
            destination,
            quantity,
        }
    }
}

/// 採購建議
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseProposal {
    /// 商品
    pub item: ItemKey,

    /// 建議採購數量（> 0）
    pub quantity: i64,

    /// 需要補貨的分店
    pub branches: Vec<BranchId>,
}

impl PurchaseProposal {
    pub fn new(item: ItemKey, quantity: i64) -> Self {
        Self {
            item,
            quantity,
            branches: Vec::new(),
        }
    }

    /// 建構器模式：設置需要補貨的分店
    pub fn with_branches(mut self, branches: Vec<BranchId>) -> Self {
        self.branches = branches;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_proposal_builder() {
        let proposal = PurchaseProposal::new(ItemKey::new("P1", "PRETO"), 40)
            .with_branches(vec![BranchId::new("NERD LEBLON")]);

        assert_eq!(proposal.quantity, 40);
        assert_eq!(proposal.branches, vec![BranchId::new("nerd leblon")]);
    }
}
