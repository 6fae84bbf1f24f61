//! # 场景描述模块
//!
//! 将筛选后的结构与显示参数映射为可渲染的场景描述，并导出为
//! HTML (3Dmol.js)、JSON 或 XYZ。
//!
//! 字段命名与 3Dmol.js 的参数对象保持一致，JSON 可以直接传给
//! `addCylinder` / `addArrow`。
//!
//! ## 依赖关系
//! - 被 `commands/render.rs`, `commands/shell.rs` 使用
//! - 使用 `models/`
//! - 子模块: builder, cell, export

pub mod builder;
pub mod cell;
pub mod export;

pub use builder::build_scene;
pub use export::{write_scene, SceneFormat};

use serde::{Deserialize, Serialize};

/// 3D 坐标点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<[f64; 3]> for Point {
    fn from(v: [f64; 3]) -> Self {
        Point {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

/// 原子显示样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomStyle {
    /// 球半径
    pub sphere_radius: f64,
    /// 化学键棍半径（关闭化学键时为 None）
    pub stick_radius: Option<f64>,
}

/// 晶胞棱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    pub color: String,
    pub dashed: bool,
}

/// 磁矩箭头
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    pub color: String,
    pub alpha: f64,
}

/// 旋转轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// 相机指令：先 zoomTo 适配，再缩放，再依次绕 x, y, z 旋转
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub zoom: f64,
    pub rotations: Vec<(Axis, f64)>,
}

/// 完整场景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// 标题（通常为化学式）
    pub title: String,
    /// XYZ 格式的原子模型
    pub model_xyz: String,
    pub style: AtomStyle,
    pub cell: Vec<Cylinder>,
    pub arrows: Vec<Arrow>,
    pub camera: Camera,
}
