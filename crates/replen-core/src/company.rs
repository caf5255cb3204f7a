//! 公司與分店拓撲配置

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use crate::branch::{BranchId, BranchRole};
use crate::item::ColorMap;
use crate::{ReplenError, Result};

/// 公司配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    /// 公司識別碼（小寫）
    pub key: String,

    /// 顯示名稱
    pub name: String,

    /// 中央倉庫
    #[serde(default)]
    pub central_warehouse: Option<BranchId>,

    /// 線上通路
    #[serde(default)]
    pub online_channel: Option<BranchId>,

    /// 納入庫存分析的分店（可包含中央倉庫與線上通路）
    #[serde(default)]
    pub branches: Vec<BranchId>,

    /// 分店顯示名稱
    #[serde(default)]
    pub display_names: BTreeMap<BranchId, String>,

    /// 顏色對照表
    #[serde(default)]
    pub colors: ColorMap,
}

impl CompanyConfig {
    /// 創建新的公司配置
    pub fn new(key: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            key: normalize_company_key(key.as_ref()),
            name: name.into(),
            central_warehouse: None,
            online_channel: None,
            branches: Vec::new(),
            display_names: BTreeMap::new(),
            colors: ColorMap::new(),
        }
    }

    /// 建構器模式：設置中央倉庫
    pub fn with_central_warehouse(mut self, branch: impl AsRef<str>) -> Self {
        self.central_warehouse = Some(BranchId::new(branch));
        self
    }

    /// 建構器模式：設置線上通路
    pub fn with_online_channel(mut self, branch: impl AsRef<str>) -> Self {
        self.online_channel = Some(BranchId::new(branch));
        self
    }

    /// 建構器模式：設置分店清單
    pub fn with_branches<I, S>(mut self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.branches = branches.into_iter().map(BranchId::new).collect();
        self
    }

    /// 建構器模式：設置分店顯示名稱
    pub fn with_display_name(mut self, branch: impl AsRef<str>, name: impl Into<String>) -> Self {
        self.display_names.insert(BranchId::new(branch), name.into());
        self
    }

    /// 建構器模式：設置顏色對照表
    pub fn with_colors(mut self, colors: ColorMap) -> Self {
        self.colors = colors;
        self
    }

    /// 解析分店拓撲
    pub fn topology(&self) -> BranchTopology {
        let ordinary: BTreeSet<BranchId> = self
            .branches
            .iter()
            .filter(|b| Some(*b) != self.central_warehouse.as_ref())
            .filter(|b| Some(*b) != self.online_channel.as_ref())
            .cloned()
            .collect();

        BranchTopology {
            central_warehouse: self.central_warehouse.clone(),
            online_channel: self.online_channel.clone(),
            ordinary_branches: ordinary.into_iter().collect(),
        }
    }

    /// 分店顯示名稱（未設定時使用代碼）
    pub fn display_name<'a>(&'a self, branch: &'a BranchId) -> &'a str {
        self.display_names
            .get(branch)
            .map(String::as_str)
            .unwrap_or(branch.as_str())
    }

    /// 檢查分店是否在篩選範圍內
    ///
    /// 沒有配置任何分店的公司接受所有分店。
    pub fn in_scope(&self, branch: &BranchId, scope: &BranchScope) -> bool {
        let is_online = self.online_channel.as_ref() == Some(branch);

        match scope {
            BranchScope::Single(target) => target == branch,
            BranchScope::Retail if is_online => false,
            BranchScope::All | BranchScope::Retail => {
                if self.branches.is_empty()
                    && self.central_warehouse.is_none()
                    && self.online_channel.is_none()
                {
                    return true;
                }
                self.branches.contains(branch)
                    || self.central_warehouse.as_ref() == Some(branch)
                    || is_online
            }
        }
    }

    /// 驗證篩選範圍：單一分店必須是公司已配置的分店
    pub fn validate_scope(&self, scope: &BranchScope) -> Result<()> {
        match scope {
            BranchScope::Single(target) if !self.in_scope(target, &BranchScope::All) => {
                Err(ReplenError::InvalidConfig(format!(
                    "分店 {} 不屬於公司 {}",
                    target, self.key
                )))
            }
            _ => Ok(()),
        }
    }

    /// 驗證配置
    fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(ReplenError::InvalidConfig("公司識別碼不可為空".to_string()));
        }

        if let (Some(central), Some(online)) = (&self.central_warehouse, &self.online_channel) {
            if central == online {
                return Err(ReplenError::InvalidConfig(format!(
                    "公司 {} 的中央倉庫與線上通路不可為同一分店: {}",
                    self.key, central
                )));
            }
        }

        let has_blank = self
            .branches
            .iter()
            .chain(self.central_warehouse.iter())
            .chain(self.online_channel.iter())
            .any(BranchId::is_empty);
        if has_blank {
            return Err(ReplenError::InvalidConfig(format!(
                "公司 {} 含有空白分店代碼",
                self.key
            )));
        }

        let listed: BTreeSet<&BranchId> = self.branches.iter().collect();
        if listed.len() != self.branches.len() {
            return Err(ReplenError::InvalidConfig(format!(
                "公司 {} 的分店清單有重複代碼",
                self.key
            )));
        }

        Ok(())
    }
}

/// 分店拓撲
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTopology {
    pub central_warehouse: Option<BranchId>,
    pub online_channel: Option<BranchId>,
    /// 一般分店（已排序，不含中央倉庫與線上通路）
    pub ordinary_branches: Vec<BranchId>,
}

impl BranchTopology {
    /// 一般分店數量
    pub fn ordinary_count(&self) -> usize {
        self.ordinary_branches.len()
    }

    /// 分店角色
    pub fn role_of(&self, branch: &BranchId) -> BranchRole {
        if self.central_warehouse.as_ref() == Some(branch) {
            BranchRole::CentralWarehouse
        } else if self.online_channel.as_ref() == Some(branch) {
            BranchRole::OnlineChannel
        } else {
            BranchRole::Ordinary
        }
    }
}

/// 分店篩選範圍
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BranchScope {
    /// 所有分店（含線上通路）
    #[default]
    All,
    /// 實體零售（排除線上通路）
    Retail,
    /// 單一分店
    Single(BranchId),
}

impl FromStr for BranchScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "" | "all" => BranchScope::All,
            "retail" | "varejo" => BranchScope::Retail,
            _ => BranchScope::Single(BranchId::new(s)),
        })
    }
}

/// 報表選項
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportOptions {
    /// 分店篩選範圍
    pub scope: BranchScope,

    /// 是否保留期間內無銷售的商品
    pub include_items_without_sales: bool,
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置分店篩選範圍
    pub fn with_scope(mut self, scope: BranchScope) -> Self {
        self.scope = scope;
        self
    }

    /// 建構器模式：設置是否保留無銷售商品
    pub fn with_items_without_sales(mut self, include: bool) -> Self {
        self.include_items_without_sales = include;
        self
    }
}

/// 公司配置登錄表（建立後不可變）
#[derive(Debug, Clone)]
pub struct CompanyRegistry {
    companies: BTreeMap<String, CompanyConfig>,
}

impl CompanyRegistry {
    /// 由配置清單建立並驗證
    pub fn from_configs(configs: Vec<CompanyConfig>) -> Result<Self> {
        let mut companies = BTreeMap::new();

        for mut config in configs {
            config.key = normalize_company_key(&config.key);
            config.validate()?;

            if companies.contains_key(&config.key) {
                return Err(ReplenError::InvalidConfig(format!(
                    "公司識別碼重複: {}",
                    config.key
                )));
            }
            companies.insert(config.key.clone(), config);
        }

        Ok(Self { companies })
    }

    /// 由 JSON 陣列建立
    pub fn from_json_str(json: &str) -> Result<Self> {
        let configs: Vec<CompanyConfig> = serde_json::from_str(json)
            .map_err(|e| ReplenError::InvalidConfig(format!("JSON 解析失敗: {}", e)))?;
        Self::from_configs(configs)
    }

    /// 內建的公司配置
    pub fn builtin() -> Self {
        let nerd = CompanyConfig::new("nerd", "NERD")
            .with_central_warehouse("NERD")
            .with_branches([
                "NERD",
                "NERD CENTER NORTE",
                "NERD HIGIENOPOLIS",
                "NERD LEBLON",
                "NERD MORUMBI RDRRRJ",
                "NERD VILLA LOBOS",
            ]);

        let scarfme = CompanyConfig::new("scarfme", "Scarf Me")
            .with_central_warehouse("SCARF ME - MATRIZ")
            .with_online_channel("SCARFME MATRIZ CMS")
            .with_branches([
                "SCARF ME - MATRIZ",
                "SCARFME MATRIZ CMS",
                "SCARF ME - HIGIENOPOLIS 2",
                "SCARFME - IBIRAPUERA LLL",
                "SCARFME BH SHOPPING",
                "SCARFME IGUATEMI",
                "SCARFME ME - PAULISTA FFF",
                "SCARFME MORUMBI RDRRRJ",
                "SCARFME VILLA LOBOS FRS",
            ])
            .with_display_name("SCARF ME - MATRIZ", "MATRIZ")
            .with_display_name("SCARFME MATRIZ CMS", "E-COMMERCE");

        let mut companies = BTreeMap::new();
        companies.insert(nerd.key.clone(), nerd);
        companies.insert(scarfme.key.clone(), scarfme);
        Self { companies }
    }

    /// 取得公司配置
    pub fn get(&self, company: &str) -> Result<&CompanyConfig> {
        self.companies
            .get(&normalize_company_key(company))
            .ok_or_else(|| ReplenError::UnknownCompany(company.to_string()))
    }

    /// 解析公司的分店拓撲
    pub fn resolve_topology(&self, company: &str) -> Result<BranchTopology> {
        self.get(company).map(CompanyConfig::topology)
    }

    /// 所有公司配置（依識別碼排序）
    pub fn companies(&self) -> impl Iterator<Item = &CompanyConfig> {
        self.companies.values()
    }
}

impl Default for CompanyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_company_key(key: &str) -> String {
    key.trim().to_lowercase()
}
