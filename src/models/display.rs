//! # 显示参数数据模型
//!
//! 用户可调节的可视化参数：物种筛选、晶胞/化学键/磁矩开关、磁矩大小范围、
//! 缩放与旋转、原子与箭头尺寸、箭头颜色。
//!
//! 参数来源分层：内置默认值 < 选项文件 (JSON) < 命令行参数。
//!
//! ## 依赖关系
//! - 被 `cli/`, `commands/`, `scene/` 使用
//! - 使用 `serde` / `serde_json` 读取选项文件

use crate::error::{MagviewError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// 磁矩箭头颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowColor {
    Red,
    Green,
    Blue,
    Black,
}

impl ArrowColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowColor::Red => "red",
            ArrowColor::Green => "green",
            ArrowColor::Blue => "blue",
            ArrowColor::Black => "black",
        }
    }
}

impl std::fmt::Display for ArrowColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArrowColor {
    type Err = MagviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "red" => Ok(ArrowColor::Red),
            "green" => Ok(ArrowColor::Green),
            "blue" => Ok(ArrowColor::Blue),
            "black" => Ok(ArrowColor::Black),
            _ => Err(MagviewError::InvalidOption(format!(
                "unknown arrow color '{}' (red, green, blue, black)",
                s
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 默认值与取值范围
// ─────────────────────────────────────────────────────────────

pub const DEFAULT_MIN_MAGMOM: f64 = 0.001;
pub const DEFAULT_MAX_MAGMOM: f64 = 1.0;
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.0;
pub const DEFAULT_ATOM_SIZE: f64 = 0.7;
pub const DEFAULT_CELL_THICKNESS: f64 = 0.06;
pub const DEFAULT_ROTATION: [f64; 3] = [-85.0, 0.0, 15.0];
pub const DEFAULT_ARROW_SCALE: f64 = 10.0;
pub const DEFAULT_ARROW_RADIUS: f64 = 0.3;

const MAGMOM_RANGE: (f64, f64) = (0.0, 10.0);
const ZOOM_RANGE: (f64, f64) = (0.0, 10.0);
const ATOM_SIZE_RANGE: (f64, f64) = (0.1, 2.0);
const CELL_THICKNESS_RANGE: (f64, f64) = (0.0, 0.5);
const ROTATION_RANGE: (f64, f64) = (-180.0, 180.0);
const ARROW_SCALE_RANGE: (f64, f64) = (1.0, 50.0);
const ARROW_RADIUS_RANGE: (f64, f64) = (0.05, 0.5);

/// 当前显示状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    /// 要显示的物种
    pub species: Vec<String>,
    pub show_cell: bool,
    pub show_bonds: bool,
    pub show_moments: bool,
    /// 磁矩大小下限（不含）
    pub min_magmom: f64,
    /// 磁矩大小上限（不含）
    pub max_magmom: f64,
    pub zoom_factor: f64,
    pub atom_size: f64,
    pub cell_thickness: f64,
    /// 绕 x, y, z 轴的旋转角（度），按此顺序应用
    pub rotation: [f64; 3],
    pub arrow_scale_factor: f64,
    pub arrow_radius: f64,
    pub arrow_color: ArrowColor,
}

impl DisplayState {
    /// 给定可选物种的默认状态（显示全部物种）
    pub fn with_species(species: Vec<String>) -> Self {
        DisplayState {
            species,
            show_cell: true,
            show_bonds: false,
            show_moments: true,
            min_magmom: DEFAULT_MIN_MAGMOM,
            max_magmom: DEFAULT_MAX_MAGMOM,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            atom_size: DEFAULT_ATOM_SIZE,
            cell_thickness: DEFAULT_CELL_THICKNESS,
            rotation: DEFAULT_ROTATION,
            arrow_scale_factor: DEFAULT_ARROW_SCALE,
            arrow_radius: DEFAULT_ARROW_RADIUS,
            arrow_color: ArrowColor::Blue,
        }
    }

    /// 恢复默认值
    pub fn reset(&mut self, species: Vec<String>) {
        *self = DisplayState::with_species(species);
    }

    /// 检查所有数值是否在允许范围内
    pub fn validate(&self) -> Result<()> {
        check_range("min_magmom", self.min_magmom, MAGMOM_RANGE)?;
        check_range("max_magmom", self.max_magmom, MAGMOM_RANGE)?;
        check_range("zoom_factor", self.zoom_factor, ZOOM_RANGE)?;
        check_range("atom_size", self.atom_size, ATOM_SIZE_RANGE)?;
        check_range("cell_thickness", self.cell_thickness, CELL_THICKNESS_RANGE)?;
        check_range("rot_x", self.rotation[0], ROTATION_RANGE)?;
        check_range("rot_y", self.rotation[1], ROTATION_RANGE)?;
        check_range("rot_z", self.rotation[2], ROTATION_RANGE)?;
        check_range(
            "arrow_scale_factor",
            self.arrow_scale_factor,
            ARROW_SCALE_RANGE,
        )?;
        check_range("arrow_radius", self.arrow_radius, ARROW_RADIUS_RANGE)?;
        Ok(())
    }

    /// 按字段名修改单个参数（交互式 shell 的 `set` 命令）
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        let mut next = self.clone();
        match field {
            "cell" | "show_cell" => next.show_cell = parse_bool(field, value)?,
            "bonds" | "show_bonds" => next.show_bonds = parse_bool(field, value)?,
            "moments" | "show_moments" => next.show_moments = parse_bool(field, value)?,
            "min_magmom" => next.min_magmom = parse_number(field, value)?,
            "max_magmom" => next.max_magmom = parse_number(field, value)?,
            "zoom" | "zoom_factor" => next.zoom_factor = parse_number(field, value)?,
            "atom_size" => next.atom_size = parse_number(field, value)?,
            "cell_thickness" => next.cell_thickness = parse_number(field, value)?,
            "rot_x" => next.rotation[0] = parse_number(field, value)?,
            "rot_y" => next.rotation[1] = parse_number(field, value)?,
            "rot_z" => next.rotation[2] = parse_number(field, value)?,
            "arrow_scale" | "arrow_scale_factor" => {
                next.arrow_scale_factor = parse_number(field, value)?
            }
            "arrow_radius" => next.arrow_radius = parse_number(field, value)?,
            "arrow_color" => next.arrow_color = value.parse()?,
            _ => {
                return Err(MagviewError::InvalidOption(format!(
                    "unknown field '{}'",
                    field
                )))
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// 应用一组覆盖值
    pub fn apply(&mut self, overrides: &DisplayOverrides) {
        if let Some(ref species) = overrides.species {
            self.species = species.clone();
        }
        if let Some(v) = overrides.show_cell {
            self.show_cell = v;
        }
        if let Some(v) = overrides.show_bonds {
            self.show_bonds = v;
        }
        if let Some(v) = overrides.show_moments {
            self.show_moments = v;
        }
        if let Some(v) = overrides.min_magmom {
            self.min_magmom = v;
        }
        if let Some(v) = overrides.max_magmom {
            self.max_magmom = v;
        }
        if let Some(v) = overrides.zoom_factor {
            self.zoom_factor = v;
        }
        if let Some(v) = overrides.atom_size {
            self.atom_size = v;
        }
        if let Some(v) = overrides.cell_thickness {
            self.cell_thickness = v;
        }
        if let Some(v) = overrides.rot_x {
            self.rotation[0] = v;
        }
        if let Some(v) = overrides.rot_y {
            self.rotation[1] = v;
        }
        if let Some(v) = overrides.rot_z {
            self.rotation[2] = v;
        }
        if let Some(v) = overrides.arrow_scale_factor {
            self.arrow_scale_factor = v;
        }
        if let Some(v) = overrides.arrow_radius {
            self.arrow_radius = v;
        }
        if let Some(v) = overrides.arrow_color {
            self.arrow_color = v;
        }
    }
}

/// 可选的参数覆盖（选项文件与命令行共用）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayOverrides {
    pub species: Option<Vec<String>>,
    pub show_cell: Option<bool>,
    pub show_bonds: Option<bool>,
    pub show_moments: Option<bool>,
    pub min_magmom: Option<f64>,
    pub max_magmom: Option<f64>,
    pub zoom_factor: Option<f64>,
    pub atom_size: Option<f64>,
    pub cell_thickness: Option<f64>,
    pub rot_x: Option<f64>,
    pub rot_y: Option<f64>,
    pub rot_z: Option<f64>,
    pub arrow_scale_factor: Option<f64>,
    pub arrow_radius: Option<f64>,
    pub arrow_color: Option<ArrowColor>,
}

impl DisplayOverrides {
    /// 从 JSON 选项文件读取
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MagviewError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn check_range(name: &str, value: f64, (lo, hi): (f64, f64)) -> Result<()> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(())
    } else {
        Err(MagviewError::InvalidOption(format!(
            "{} = {} is outside [{}, {}]",
            name, value, lo, hi
        )))
    }
}

fn parse_number(name: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| MagviewError::InvalidOption(format!("{} expects a number, got '{}'", name, value)))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(MagviewError::InvalidOption(format!(
            "{} expects on/off, got '{}'",
            name, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn species() -> Vec<String> {
        vec!["Fe".to_string(), "O".to_string()]
    }

    #[test]
    fn test_defaults() {
        let state = DisplayState::with_species(species());
        assert_eq!(state.species, species());
        assert!(state.show_cell);
        assert!(!state.show_bonds);
        assert!(state.show_moments);
        assert_eq!(state.rotation, [-85.0, 0.0, 15.0]);
        assert_eq!(state.arrow_color, ArrowColor::Blue);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = DisplayState::with_species(species());
        state.set_field("atom_size", "1.5").unwrap();
        state.set_field("bonds", "on").unwrap();
        state.set_field("arrow_color", "Red").unwrap();
        state.species = vec!["O".to_string()];

        state.reset(species());
        assert_eq!(state, DisplayState::with_species(species()));
    }

    #[test]
    fn test_set_field_rejects_out_of_range() {
        let mut state = DisplayState::with_species(species());
        let err = state.set_field("atom_size", "3.0").unwrap_err();
        assert!(err.to_string().contains("atom_size"));
        // 失败时状态不变
        assert_eq!(state.atom_size, DEFAULT_ATOM_SIZE);
    }

    #[test]
    fn test_set_field_unknown() {
        let mut state = DisplayState::with_species(species());
        assert!(state.set_field("opacity", "0.5").is_err());
        assert!(state.set_field("zoom", "fast").is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut state = DisplayState::with_species(species());
        let overrides = DisplayOverrides {
            show_cell: Some(false),
            rot_y: Some(30.0),
            arrow_color: Some(ArrowColor::Black),
            ..Default::default()
        };
        state.apply(&overrides);
        assert!(!state.show_cell);
        assert_eq!(state.rotation, [-85.0, 30.0, 15.0]);
        assert_eq!(state.arrow_color, ArrowColor::Black);
        assert_eq!(state.atom_size, DEFAULT_ATOM_SIZE);
    }

    #[test]
    fn test_overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{ "atom_size": 0.5, "arrow_color": "red", "species": ["Fe"] }}"#
        )
        .unwrap();

        let overrides = DisplayOverrides::from_file(file.path()).unwrap();
        assert_eq!(overrides.atom_size, Some(0.5));
        assert_eq!(overrides.arrow_color, Some(ArrowColor::Red));
        assert_eq!(overrides.species, Some(vec!["Fe".to_string()]));
        assert_eq!(overrides.zoom_factor, None);
    }

    #[test]
    fn test_overrides_file_rejects_unknown_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "atom_radius": 0.5 }}"#).unwrap();
        assert!(matches!(
            DisplayOverrides::from_file(file.path()),
            Err(MagviewError::JsonError(_))
        ));
    }
}
