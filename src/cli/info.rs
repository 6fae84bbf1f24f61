//! # info 子命令 CLI 定义
//!
//! 解析 DFT 输出文件，打印摘要与每原子磁矩表，可选导出 CSV/JSON。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`

use super::common::InputArgs;
use clap::Args;
use std::path::PathBuf;

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Export the per-atom table to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Export the parsed record to a JSON file
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Do not print the per-atom table
    #[arg(long, default_value_t = false)]
    pub summary_only: bool,
}
