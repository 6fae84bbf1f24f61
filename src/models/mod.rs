//! # 数据模型模块
//!
//! 定义解析结果、晶体结构和显示参数数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `scene/` 和 `commands/` 使用
//! - 子模块: output, structure, display

pub mod display;
pub mod output;
pub mod structure;

pub use display::{ArrowColor, DisplayOverrides, DisplayState};
pub use output::{DftCode, ParsedOutput, RawOutput};
pub use structure::{Atom, Lattice, Structure};
