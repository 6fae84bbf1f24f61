//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，以及它们共用的"读取输入 -> 确定显示状态 -> 渲染"流程。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `scene/`, `utils/`
//! - 子模块: info, render, shell

pub mod info;
pub mod render;
pub mod shell;

use crate::cli::common::{DisplayArgs, InputArgs};
use crate::cli::Commands;
use crate::error::{MagviewError, Result};
use crate::models::structure::assemble;
use crate::models::{DisplayOverrides, DisplayState, ParsedOutput};
use crate::parsers;
use crate::scene::{build_scene, write_scene, Scene, SceneFormat};
use crate::utils::{output, progress};

use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Info(args) => info::execute(args),
        Commands::Render(args) => render::execute(args),
        Commands::Shell(args) => shell::execute(args),
    }
}

/// 检查输入并解析输出文件
pub fn load_output(input: &InputArgs) -> Result<ParsedOutput> {
    let path = input.file.as_deref().ok_or(MagviewError::NoInputFile)?;
    let code = input.code.ok_or(MagviewError::NoCodeSelected)?;

    let spinner = progress::parse_spinner(code, path);
    let result = parsers::parse_file(path, code);
    spinner.finish_and_clear();

    let parsed = result?;
    output::print_info(&format!(
        "Read {} atoms of {} species from '{}' ({})",
        parsed.natoms(),
        parsed.unique_species().len(),
        path.display(),
        if parsed.noncollinear {
            "non-collinear"
        } else {
            "collinear"
        }
    ));
    Ok(parsed)
}

/// 初始显示状态：默认值 < 选项文件 < 命令行参数
pub fn initial_state(parsed: &ParsedOutput, display: &DisplayArgs) -> Result<DisplayState> {
    let mut state = DisplayState::with_species(parsed.unique_species());
    if let Some(ref path) = display.options {
        state.apply(&DisplayOverrides::from_file(path)?);
    }
    state.apply(&display.to_overrides());
    state.validate()?;
    Ok(state)
}

/// 组装、构建并写出场景
pub fn render_scene(
    parsed: &ParsedOutput,
    state: &DisplayState,
    output_path: &Path,
    format: SceneFormat,
) -> Result<Scene> {
    state.validate()?;
    let structure = assemble(parsed, &state.species)?;
    let scene = build_scene(&structure, state);
    write_scene(&scene, output_path, format)?;
    Ok(scene)
}

/// 解析输出格式：显式指定 > 扩展名 > HTML
pub fn resolve_format(output_path: &Path, format: Option<SceneFormat>) -> SceneFormat {
    format
        .or_else(|| SceneFormat::from_path(output_path))
        .unwrap_or(SceneFormat::Html)
}
