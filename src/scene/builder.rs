//! # 场景构建
//!
//! 纯函数：(筛选后的结构, 显示参数) -> `Scene`。
//!
//! ## 依赖关系
//! - 被 `scene/mod.rs` 导出
//! - 使用 `scene/cell.rs`, `models/`

use crate::models::{Atom, DisplayState, Structure};
use crate::scene::cell::cell_cylinders;
use crate::scene::{Arrow, AtomStyle, Axis, Camera, Point, Scene};

/// 化学键棍半径与原子球半径之比
const STICK_RATIO: f64 = 0.25;

/// 磁矩大小是否落在 (min, max) 开区间内
pub fn moment_in_band(magnitude: f64, min: f64, max: f64) -> bool {
    min < magnitude && magnitude < max
}

/// 构建场景
pub fn build_scene(structure: &Structure, state: &DisplayState) -> Scene {
    let style = AtomStyle {
        sphere_radius: state.atom_size,
        stick_radius: state.show_bonds.then(|| state.atom_size * STICK_RATIO),
    };

    let cell = if state.show_cell {
        cell_cylinders(&structure.lattice, state.cell_thickness)
    } else {
        Vec::new()
    };

    let arrows = if state.show_moments {
        structure
            .atoms
            .iter()
            .filter(|atom| moment_in_band(atom.moment_magnitude(), state.min_magmom, state.max_magmom))
            .map(|atom| moment_arrow(atom, state))
            .collect()
    } else {
        Vec::new()
    };

    let [rx, ry, rz] = state.rotation;
    let camera = Camera {
        zoom: state.zoom_factor,
        rotations: vec![(Axis::X, rx), (Axis::Y, ry), (Axis::Z, rz)],
    };

    Scene {
        title: structure.formula(),
        model_xyz: to_xyz_string(structure),
        style,
        cell,
        arrows,
        camera,
    }
}

fn moment_arrow(atom: &Atom, state: &DisplayState) -> Arrow {
    let p = atom.position;
    let m = atom.magmom;
    let k = state.arrow_scale_factor;
    Arrow {
        start: p.into(),
        end: Point::from([p[0] + m[0] * k, p[1] + m[1] * k, p[2] + m[2] * k]),
        radius: state.arrow_radius,
        color: state.arrow_color.as_str().to_string(),
        alpha: 1.0,
    }
}

/// 转换为 XYZ 格式
pub fn to_xyz_string(structure: &Structure) -> String {
    let mut result = String::new();
    result.push_str(&format!("{}\n", structure.atoms.len()));
    result.push_str(&format!("{}\n", structure.formula()));

    for atom in &structure.atoms {
        let [x, y, z] = atom.position;
        result.push_str(&format!(
            "{} {:16.10} {:16.10} {:16.10}\n",
            atom.element, x, y, z
        ));
    }

    result
}
