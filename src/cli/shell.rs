//! # shell 子命令 CLI 定义
//!
//! 交互式会话：读取一次输出文件，反复调整显示参数并渲染。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/shell.rs`

use super::common::{DisplayArgs, InputArgs};
use clap::Args;
use std::path::PathBuf;

/// shell 子命令参数
#[derive(Args, Debug)]
pub struct ShellArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Initial display options
    #[command(flatten)]
    pub display: DisplayArgs,

    /// Default output file for `render`
    #[arg(short, long, default_value = "magview.html")]
    pub output: PathBuf,
}
