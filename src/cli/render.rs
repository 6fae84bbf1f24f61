//! # render 子命令 CLI 定义
//!
//! 生成结构与磁矩箭头的可视化场景。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/render.rs`

use super::common::{DisplayArgs, InputArgs};
use crate::scene::SceneFormat;
use clap::Args;
use std::path::PathBuf;

/// render 子命令参数
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub display: DisplayArgs,

    /// Output file
    #[arg(short, long, default_value = "magview.html")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<SceneFormat>,
}
