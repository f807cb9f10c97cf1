// ==========================================
// 施工现场工时进度引擎 - 命令行入口
// ==========================================
// 用法:
//   site-ops-labour <request.json> [config.json] [--lenient]
//   site-ops-labour --job <id> --target <date> --products <file> [--daily <file>]
//                   [--config <config.json>] [--lenient]
//
// 第二种形式从 CSV/JSON 导入产品进度与每日进度后组装请求
// 未指定配置文件时: 用户配置目录下的 site-ops-labour/config.json (若存在)
// 之后叠加 SITE_OPS_LABOUR_* 环境变量
// 报告以 JSON 输出到 stdout, 日志输出到 stderr
// ==========================================

use anyhow::{bail, Context};
use chrono::Utc;
use site_ops_labour::api::{LabourApi, ValidationMode};
use site_ops_labour::config::ConfigManager;
use site_ops_labour::logging;
use std::path::PathBuf;

const USAGE: &str = "\
用法:
  site-ops-labour <request.json> [config.json] [--lenient]
  site-ops-labour --job <id> --target <date> --products <file> [--daily <file>] [--config <config.json>] [--lenient]";

/// 命令行参数
#[derive(Debug, Default)]
struct CliArgs {
    lenient: bool,
    config: Option<PathBuf>,
    job_id: Option<String>,
    target: Option<String>,
    products: Option<PathBuf>,
    daily: Option<PathBuf>,
    positional: Vec<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<CliArgs>> {
    let mut cli = CliArgs::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| -> anyhow::Result<String> {
            match args.next() {
                Some(v) => Ok(v),
                None => bail!("{flag} 缺少参数值\n{USAGE}"),
            }
        };
        match arg.as_str() {
            "--lenient" => cli.lenient = true,
            "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
            "--job" => cli.job_id = Some(value("--job")?),
            "--target" => cli.target = Some(value("--target")?),
            "--products" => cli.products = Some(PathBuf::from(value("--products")?)),
            "--daily" => cli.daily = Some(PathBuf::from(value("--daily")?)),
            "-h" | "--help" => return Ok(None),
            flag if flag.starts_with("--") => bail!("未知参数 {flag}\n{USAGE}"),
            _ => cli.positional.push(PathBuf::from(arg)),
        }
    }
    Ok(Some(cli))
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let Some(mut cli) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    tracing::info!("{} v{}", site_ops_labour::APP_NAME, site_ops_labour::VERSION);

    let mode = if cli.lenient {
        ValidationMode::Lenient
    } else {
        ValidationMode::Strict
    };

    // 请求来源: 导入文件 或 请求 JSON
    let request_path = match cli.products {
        Some(_) => None,
        None => {
            let mut positional = std::mem::take(&mut cli.positional).into_iter();
            let Some(request_path) = positional.next() else {
                bail!("缺少请求文件\n{USAGE}");
            };
            if cli.config.is_none() {
                cli.config = positional.next();
            }
            cli.positional = positional.collect();
            Some(request_path)
        }
    };
    if !cli.positional.is_empty() {
        bail!("参数过多\n{USAGE}");
    }

    // 加载配置
    let mut manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => ConfigManager::load_default().context("无法加载默认配置")?,
    };
    if cli.config.is_some() {
        manager.apply_env_overrides();
    }
    let api = LabourApi::from_config(&manager, mode)?;

    let report = match (request_path, &cli.products) {
        (Some(request_path), _) => {
            let raw = std::fs::read_to_string(&request_path)
                .with_context(|| format!("无法读取请求文件 {}", request_path.display()))?;
            let payload: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("请求文件不是合法 JSON: {}", request_path.display()))?;
            api.generate_report_from_json(payload)
                .context("工时报告生成失败")?
        }
        (None, Some(products)) => {
            let (Some(job_id), Some(target)) = (&cli.job_id, &cli.target) else {
                bail!("导入模式需要 --job 与 --target\n{USAGE}");
            };
            let request = LabourApi::request_from_files(
                job_id,
                target,
                products,
                cli.daily.as_deref(),
                Utc::now(),
            )?;
            api.generate_report(request).context("工时报告生成失败")?
        }
        (None, None) => bail!("缺少请求文件\n{USAGE}"),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
