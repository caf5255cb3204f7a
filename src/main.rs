//! 分店庫存補貨命令列工具

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use replen_calc::ReplenishmentEngine;
use replen_core::{BranchScope, CompanyRegistry, JsonFileSource, ReportOptions, ReportPeriod};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "replen")]
#[command(about = "分店庫存補貨建議", version)]
struct Cli {
    /// 以 JSON 格式輸出日誌
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// 公司配置檔（JSON 陣列，未指定時使用內建配置）
    #[arg(long, global = true)]
    companies: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 計算補貨建議並輸出 JSON 報表
    Analyze {
        #[arg(long)]
        company: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// 庫存資料列檔
        #[arg(long)]
        stock: PathBuf,
        /// 銷售資料列檔
        #[arg(long)]
        sales: PathBuf,
        /// 進貨歷史檔
        #[arg(long)]
        entries: Option<PathBuf>,
        /// all、retail 或分店代碼
        #[arg(long, default_value = "all")]
        scope: BranchScope,
        /// 保留期間內無銷售的商品
        #[arg(long, default_value_t = false)]
        include_without_sales: bool,
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// 列出各公司的分店拓撲
    Companies,
}

#[derive(Serialize)]
struct CompanyView<'a> {
    key: &'a str,
    name: &'a str,
    #[serde(flatten)]
    topology: replen_core::BranchTopology,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs)?;

    let registry = load_registry(cli.companies.as_deref())?;

    match cli.command {
        Commands::Analyze {
            company,
            start,
            end,
            stock,
            sales,
            entries,
            scope,
            include_without_sales,
            pretty,
        } => {
            let period = ReportPeriod::new(start, end)?;
            let mut source = JsonFileSource::new(stock, sales);
            if let Some(entries) = entries {
                source = source.with_entries_path(entries);
            }

            let options = ReportOptions::new()
                .with_scope(scope)
                .with_items_without_sales(include_without_sales);
            let engine = ReplenishmentEngine::new(registry).with_options(options);
            let report = engine
                .run(&source, &company, period)
                .with_context(|| format!("公司 {} 的補貨計算失敗", company))?;

            print_json(&report, pretty)?;
        }
        Commands::Companies => {
            let views: Vec<CompanyView<'_>> = registry
                .companies()
                .map(|config| CompanyView {
                    key: &config.key,
                    name: &config.name,
                    topology: config.topology(),
                })
                .collect();

            print_json(&views, true)?;
        }
    }

    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // 報表輸出到 stdout，日誌一律寫到 stderr
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("無法初始化日誌: {}", e))
}

fn load_registry(path: Option<&Path>) -> Result<CompanyRegistry> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("無法讀取公司配置檔 {}", path.display()))?;
            let registry = CompanyRegistry::from_json_str(&json)?;
            tracing::info!("已載入公司配置: {}", path.display());
            Ok(registry)
        }
        None => Ok(CompanyRegistry::builtin()),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_tracing_init_is_reported() {
        let _ = init_tracing(false);
        assert!(init_tracing(true).is_err());
    }
}
