//! # 公共参数
//!
//! 输入文件与 DFT 代码选择、显示参数覆盖，被多个子命令复用。
//!
//! ## 依赖关系
//! - 被 `cli/info.rs`, `cli/render.rs`, `cli/shell.rs` 使用
//! - 转换为 `models/display.rs` 的 `DisplayOverrides`

use crate::models::{ArrowColor, DftCode, DisplayOverrides};
use clap::builder::BoolishValueParser;
use clap::Args;
use std::path::PathBuf;

/// 输入文件与 DFT 代码
#[derive(Args, Debug)]
pub struct InputArgs {
    /// DFT output file (e.g. OUTCAR, siesta.out)
    pub file: Option<PathBuf>,

    /// DFT code that produced the file
    #[arg(short, long, value_enum, env = "MAGVIEW_CODE")]
    pub code: Option<DftCode>,
}

/// 显示参数覆盖（未给出的参数保持默认值或选项文件中的值）
#[derive(Args, Debug, Default)]
pub struct DisplayArgs {
    /// JSON file with display options (same field names as the flags, snake_case)
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Species to show, comma separated (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub species: Option<Vec<String>>,

    /// Draw the unit cell (on/off)
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub cell: Option<bool>,

    /// Draw bonds (on/off)
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub bonds: Option<bool>,

    /// Draw magnetic moment arrows (on/off)
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub moments: Option<bool>,

    /// Minimum moment magnitude for an arrow (exclusive)
    #[arg(long)]
    pub min_magmom: Option<f64>,

    /// Maximum moment magnitude for an arrow (exclusive)
    #[arg(long)]
    pub max_magmom: Option<f64>,

    /// Zoom factor
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Atom sphere radius
    #[arg(long)]
    pub atom_size: Option<f64>,

    /// Unit cell line thickness
    #[arg(long)]
    pub cell_thickness: Option<f64>,

    /// Rotation about x in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub rot_x: Option<f64>,

    /// Rotation about y in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub rot_y: Option<f64>,

    /// Rotation about z in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub rot_z: Option<f64>,

    /// Arrow length per Bohr magneton
    #[arg(long)]
    pub arrow_scale: Option<f64>,

    /// Arrow radius
    #[arg(long)]
    pub arrow_radius: Option<f64>,

    /// Arrow color
    #[arg(long, value_enum)]
    pub arrow_color: Option<ArrowColor>,
}

impl DisplayArgs {
    /// 命令行给出的覆盖值（不含选项文件）
    pub fn to_overrides(&self) -> DisplayOverrides {
        DisplayOverrides {
            species: self.species.clone(),
            show_cell: self.cell,
            show_bonds: self.bonds,
            show_moments: self.moments,
            min_magmom: self.min_magmom,
            max_magmom: self.max_magmom,
            zoom_factor: self.zoom,
            atom_size: self.atom_size,
            cell_thickness: self.cell_thickness,
            rot_x: self.rot_x,
            rot_y: self.rot_y,
            rot_z: self.rot_z,
            arrow_scale_factor: self.arrow_scale,
            arrow_radius: self.arrow_radius,
            arrow_color: self.arrow_color,
        }
    }
}
