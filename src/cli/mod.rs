//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `info`: 解析输出文件并打印结构与磁矩摘要
//! - `render`: 生成可视化场景 (HTML/JSON/XYZ)
//! - `shell`: 交互式调整显示参数并渲染
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, info, render, shell

pub mod common;
pub mod info;
pub mod render;
pub mod shell;

use clap::{Parser, Subcommand};

/// magview - DFT 磁矩可视化工具
#[derive(Parser)]
#[command(name = "magview")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Visualize atomic magnetic moments from VASP and SIESTA output files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Summarize structure and magnetic moments of a DFT output file
    Info(info::InfoArgs),

    /// Render the structure and moment arrows to an HTML/JSON/XYZ scene
    Render(render::RenderArgs),

    /// Interactive session: adjust display options and render repeatedly
    Shell(shell::ShellArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::try_parse_from([
            "magview",
            "render",
            "OUTCAR",
            "--code",
            "vasp",
            "--species",
            "Fe,O",
            "--bonds",
            "on",
            "--rot-x",
            "-30",
            "--arrow-color",
            "red",
        ])
        .unwrap();

        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.input.code, Some(crate::models::DftCode::Vasp));
        let overrides = args.display.to_overrides();
        assert_eq!(
            overrides.species,
            Some(vec!["Fe".to_string(), "O".to_string()])
        );
        assert_eq!(overrides.show_bonds, Some(true));
        assert_eq!(overrides.rot_x, Some(-30.0));
        assert_eq!(
            overrides.arrow_color,
            Some(crate::models::ArrowColor::Red)
        );
        assert_eq!(overrides.atom_size, None);
    }
}
