//! 商品鍵與顏色對照

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::branch::normalize_code;

/// 商品鍵（商品 + 顏色）
///
/// 庫存以顏色為單位存放，不區分尺寸（grade）；尺寸只出現在銷售明細。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    /// 商品代碼（已正規化）
    pub product_id: String,

    /// 顏色（已解析並正規化）
    pub color: String,
}

impl ItemKey {
    /// 建立商品鍵
    pub fn new(product_id: impl AsRef<str>, color: impl AsRef<str>) -> Self {
        Self {
            product_id: normalize_code(product_id.as_ref()),
            color: normalize_code(color.as_ref()),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product_id, self.color)
    }
}

/// 顏色對照表（顏色代碼 → 顏色描述）
///
/// 解析順序：固定對照表 → 資料列上的顏色描述 → 顏色代碼本身。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ColorMap {
    entries: BTreeMap<String, String>,
}

impl From<BTreeMap<String, String>> for ColorMap {
    fn from(raw: BTreeMap<String, String>) -> Self {
        let mut colors = Self::new();
        for (code, description) in raw {
            colors.insert(code, description);
        }
        colors
    }
}

impl From<ColorMap> for BTreeMap<String, String> {
    fn from(colors: ColorMap) -> Self {
        colors.entries
    }
}

impl ColorMap {
    /// 建立空的對照表
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：加入一筆對照
    pub fn with_entry(mut self, code: impl AsRef<str>, description: impl AsRef<str>) -> Self {
        self.insert(code, description);
        self
    }

    /// 加入一筆對照（代碼與描述皆正規化）
    pub fn insert(&mut self, code: impl AsRef<str>, description: impl AsRef<str>) {
        self.entries
            .insert(normalize_code(code.as_ref()), normalize_code(description.as_ref()));
    }

    /// 解析顏色
    pub fn resolve(&self, color_id: &str, description: Option<&str>) -> String {
        let code = normalize_code(color_id);

        if let Some(mapped) = self.entries.get(&code) {
            if !mapped.is_empty() {
                return mapped.clone();
            }
        }

        match description.map(normalize_code) {
            Some(desc) if !desc.is_empty() => desc,
            _ => code,
        }
    }

    /// 解析商品鍵
    pub fn item_key(&self, product_id: &str, color_id: &str, description: Option<&str>) -> ItemKey {
        ItemKey::new(product_id, self.resolve(color_id, description))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_key_normalization() {
        let key = ItemKey::new(" 3710045 ", "preto");
        assert_eq!(key.product_id, "3710045");
        assert_eq!(key.color, "PRETO");
        assert_eq!(key.to_string(), "3710045/PRETO");
    }

    #[test]
    fn test_color_map_priority() {
        let colors = ColorMap::new().with_entry("01", "preto");

        // 對照表優先
        assert_eq!(colors.resolve(" 01 ", Some("black")), "PRETO");
        // 對照表沒有時使用描述
        assert_eq!(colors.resolve("02", Some(" branco ")), "BRANCO");
        // 描述為空時退回代碼
        assert_eq!(colors.resolve("02", Some("  ")), "02");
        assert_eq!(colors.resolve("02", None), "02");
    }

    #[test]
    fn test_item_key_through_color_map() {
        let colors = ColorMap::new().with_entry("01", "PRETO");
        assert_eq!(
            colors.item_key("abc", "01", None),
            ItemKey::new("ABC", "PRETO")
        );
    }
}
