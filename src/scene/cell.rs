//! # 晶胞线框
//!
//! 由三个晶格向量生成 8 个顶点、12 条棱。从原点出发的三条棱分别为
//! 红、绿、蓝，其余九条为黑色。
//!
//! ## 依赖关系
//! - 被 `scene/builder.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::Lattice;
use crate::scene::Cylinder;

/// 棱的顶点索引（顶点顺序见 `Lattice::vertices`）
pub const CELL_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (0, 2),
    (0, 3), // 原点出发
    (1, 4),
    (1, 5), // a 出发
    (2, 4),
    (2, 6), // b 出发
    (3, 5),
    (3, 6), // c 出发
    (4, 7),
    (5, 7),
    (6, 7), // 顶面
];

const AXIS_COLORS: [&str; 3] = ["red", "green", "blue"];
const EDGE_COLOR: &str = "black";

/// 第 `index` 条棱的颜色
pub fn edge_color(index: usize) -> &'static str {
    AXIS_COLORS.get(index).copied().unwrap_or(EDGE_COLOR)
}

/// 生成晶胞线框
pub fn cell_cylinders(lattice: &Lattice, thickness: f64) -> Vec<Cylinder> {
    let vertices = lattice.vertices();
    CELL_EDGES
        .iter()
        .enumerate()
        .map(|(i, &(from, to))| Cylinder {
            start: vertices[from].into(),
            end: vertices[to].into(),
            radius: thickness,
            color: edge_color(i).to_string(),
            dashed: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Point;

    #[test]
    fn test_cell_has_twelve_edges() {
        let lattice = Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 4.0]]);
        let edges = cell_cylinders(&lattice, 0.06);

        assert_eq!(edges.len(), 12);
        assert_eq!(edges[0].color, "red");
        assert_eq!(edges[1].color, "green");
        assert_eq!(edges[2].color, "blue");
        assert!(edges[3..].iter().all(|e| e.color == "black"));
        assert!(edges.iter().all(|e| e.radius == 0.06 && !e.dashed));
    }

    #[test]
    fn test_origin_edges_follow_lattice_vectors() {
        let lattice = Lattice::from_vectors([[2.0, 0.0, 0.0], [1.0, 3.0, 0.0], [0.0, 0.5, 4.0]]);
        let edges = cell_cylinders(&lattice, 0.1);
        let origin = Point {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        };

        for (edge, vector) in edges.iter().zip(lattice.matrix.iter()) {
            assert_eq!(edge.start, origin);
            assert_eq!(edge.end, Point::from(*vector));
        }
        // 最后一条棱终止于 a+b+c
        assert_eq!(edges[11].end, Point::from([3.0, 3.5, 4.0]));
    }

    #[test]
    fn test_each_vertex_has_three_edges() {
        let mut degree = [0usize; 8];
        for (a, b) in CELL_EDGES {
            degree[a] += 1;
            degree[b] += 1;
        }
        assert!(degree.iter().all(|&d| d == 3));
    }
}
