//! 分店模型

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 分店代碼
///
/// 比較時不分大小寫、忽略前後空白。所有建構路徑都經過 [`BranchId::new`]，
/// 因此引擎內部拿到的永遠是已正規化的代碼。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BranchId(String);

impl BranchId {
    /// 建立分店代碼（去除前後空白並轉為大寫）
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(normalize_code(code.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否為空代碼
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for BranchId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BranchId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// 分店角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchRole {
    /// 中央倉庫（主要調撥來源，不計入一般分店數）
    CentralWarehouse,
    /// 線上通路（電商出貨）
    OnlineChannel,
    /// 一般分店
    Ordinary,
}

/// 代碼正規化：去除前後空白並轉為大寫
pub(crate) fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("nerd leblon", "NERD LEBLON")]
    #[case("  NERD LEBLON ", "NERD LEBLON")]
    #[case("\tNerd Leblon\n", "NERD LEBLON")]
    fn test_branch_id_normalization(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(BranchId::new(raw).as_str(), expected);
        assert_eq!(BranchId::new(raw), BranchId::new(expected));
    }

    #[test]
    fn test_branch_id_deserialize_normalizes() {
        let id: BranchId = serde_json::from_str("\" scarfme iguatemi \"").unwrap();
        assert_eq!(id, BranchId::new("SCARFME IGUATEMI"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"SCARFME IGUATEMI\"");
    }

    #[test]
    fn test_empty_branch_id() {
        assert!(BranchId::new("   ").is_empty());
        assert!(!BranchId::new("NERD").is_empty());
    }
}
