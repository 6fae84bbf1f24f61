//! # magview - DFT 磁矩可视化工具
//!
//! 解析 VASP / SIESTA 输出文件，提取结构与每原子磁矩向量，
//! 生成可交互的 3D 场景 (3Dmol.js)。
//!
//! ## 子命令
//! - `info`   - 结构与磁矩摘要，可导出 CSV/JSON
//! - `render` - 生成 HTML/JSON/XYZ 场景
//! - `shell`  - 交互式调整显示参数
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (VASP / SIESTA 输出解析器)
//!   │     ├── models/    (数据模型)
//!   │     └── scene/     (场景构建与导出)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod scene;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        if e.is_missing_input() {
            utils::output::print_info(
                "Currently only VASP and SIESTA output files are supported (e.g. OUTCAR, siesta.out). \
                 The calculation should be spin-polarized or non-collinear.",
            );
        } else if e.is_parse_failure() {
            utils::output::print_info(
                "Please make sure the file is a complete output of the selected DFT code.",
            );
        }
        std::process::exit(1);
    }
}
