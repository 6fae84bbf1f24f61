//! # render 命令实现
//!
//! 解析输出文件，按显示参数筛选物种、构建场景并写出。
//!
//! ## 依赖关系
//! - 使用 `cli/render.rs` 定义的参数
//! - 使用 `commands/mod.rs` 的公共流程
//! - 使用 `utils/output.rs`

use crate::cli::render::RenderArgs;
use crate::error::Result;
use crate::utils::output;

/// 执行 render 命令
pub fn execute(args: RenderArgs) -> Result<()> {
    output::print_header("Rendering Magnetic Structure");

    let parsed = super::load_output(&args.input)?;
    let state = super::initial_state(&parsed, &args.display)?;
    let format = super::resolve_format(&args.output, args.format);

    let scene = super::render_scene(&parsed, &state, &args.output, format)?;

    if state.show_moments && scene.arrows.is_empty() {
        output::print_warning(&format!(
            "No moment lies inside ({}, {}) μB; no arrows drawn",
            state.min_magmom, state.max_magmom
        ));
    }

    output::print_success(&format!(
        "Scene ({}, {} arrows) saved to '{}' as {}",
        scene.title,
        scene.arrows.len(),
        args.output.display(),
        format
    ));

    Ok(())
}
