//! # 晶体结构数据模型
//!
//! 由解析结果组装的周期性结构：笛卡尔坐标、晶格、周期性边界标志，
//! 每个原子携带自己的磁矩向量，因此按物种筛选时坐标与磁矩始终对齐。
//!
//! ## 依赖关系
//! - 被 `models/output.rs` 和 `scene/` 使用
//! - 无外部模块依赖

use crate::error::{MagviewError, Result};
use crate::models::output::{norm, ParsedOutput};
use serde::{Deserialize, Serialize};

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;

        let a = norm(&a_vec);
        let b = norm(&b_vec);
        let c = norm(&c_vec);

        let alpha = (dot(&b_vec, &c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(&a_vec, &c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(&a_vec, &b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;

        // 行列式计算
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 晶胞的 8 个顶点
    ///
    /// 顺序: 0, a, b, c, a+b, a+c, b+c, a+b+c
    pub fn vertices(&self) -> [[f64; 3]; 8] {
        let [a, b, c] = self.matrix;
        [
            [0.0; 3],
            a,
            b,
            c,
            add(&a, &b),
            add(&a, &c),
            add(&b, &c),
            add(&add(&a, &b), &c),
        ]
    }
}

fn dot(u: &[f64; 3], v: &[f64; 3]) -> f64 {
    u.iter().zip(v.iter()).map(|(x, y)| x * y).sum()
}

fn add(u: &[f64; 3], v: &[f64; 3]) -> [f64; 3] {
    [u[0] + v[0], u[1] + v[1], u[2] + v[2]]
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 笛卡尔坐标 (Å)
    pub position: [f64; 3],

    /// 磁矩向量 (μB)
    pub magmom: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3], magmom: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
            magmom,
        }
    }

    /// 磁矩大小
    pub fn moment_magnitude(&self) -> f64 {
        norm(&self.magmom)
    }
}

/// 周期性原子结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    /// 晶格（周期性边界盒）
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,

    /// 三个方向的周期性边界标志
    pub pbc: [bool; 3],
}

impl Structure {
    /// 由解析结果组装完整结构
    pub fn from_output(output: &ParsedOutput) -> Result<Self> {
        let symbols = output.symbols();
        if symbols.len() != output.pos_cart.len() {
            return Err(MagviewError::InconsistentRecord {
                code: output.code.to_string(),
                reason: format!(
                    "{} symbols expanded from species but {} positions",
                    symbols.len(),
                    output.pos_cart.len()
                ),
            });
        }

        let atoms = symbols
            .into_iter()
            .zip(&output.pos_cart)
            .zip(&output.magmom)
            .map(|((sym, pos), m)| Atom::new(sym, *pos, *m))
            .collect();

        Ok(Structure {
            lattice: output.lattice.clone(),
            atoms,
            pbc: [true; 3],
        })
    }

    /// 按物种筛选，保持原子的相对顺序
    pub fn select_species(&self, selection: &[String]) -> Result<Self> {
        if selection.is_empty() {
            return Err(MagviewError::EmptySpeciesSelection);
        }

        let atoms = self
            .atoms
            .iter()
            .filter(|atom| selection.iter().any(|s| *s == atom.element))
            .cloned()
            .collect();

        Ok(Structure {
            lattice: self.lattice.clone(),
            atoms,
            pbc: self.pbc,
        })
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// 组装并按物种筛选（结构组装器入口）
///
/// 选择中出现解析结果不包含的物种时报错。
pub fn assemble(output: &ParsedOutput, selection: &[String]) -> Result<Structure> {
    let available = output.unique_species();
    if let Some(unknown) = selection.iter().find(|&s| !available.contains(s)) {
        return Err(MagviewError::UnknownSpecies {
            symbol: unknown.clone(),
            available: available.join(", "),
        });
    }

    Structure::from_output(output)?.select_species(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DftCode;

    fn fe2o() -> ParsedOutput {
        ParsedOutput {
            code: DftCode::Vasp,
            species: vec!["Fe".to_string(), "O".to_string()],
            nions: vec![2, 1],
            lattice: Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]),
            pos_cart: vec![[0.0; 3], [2.0, 2.0, 0.0], [2.0, 0.0, 2.0]],
            magmom: vec![[0.0, 0.0, 2.1], [0.0, 0.0, -2.1], [0.0, 0.0, 0.05]],
            noncollinear: false,
        }
    }

    #[test]
    fn test_lattice_volume_cubic() {
        let lattice = Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        assert!((lattice.volume().abs() - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_parameters_hexagonal() {
        let lattice = Lattice::from_vectors([
            [3.0, 0.0, 0.0],
            [-1.5, 3.0 * 3f64.sqrt() / 2.0, 0.0],
            [0.0, 0.0, 5.0],
        ]);
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 3.0).abs() < 1e-6);
        assert!((b - 3.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_vertices() {
        let lattice = Lattice::from_vectors([[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]]);
        let v = lattice.vertices();
        assert_eq!(v[0], [0.0, 0.0, 0.0]);
        assert_eq!(v[4], [1.0, 2.0, 0.0]);
        assert_eq!(v[6], [0.0, 2.0, 3.0]);
        assert_eq!(v[7], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_structure_from_output() {
        let structure = Structure::from_output(&fe2o()).unwrap();
        assert_eq!(structure.atoms.len(), 3);
        assert_eq!(structure.pbc, [true, true, true]);
        assert_eq!(structure.atoms[2].element, "O");
        assert_eq!(structure.atoms[1].magmom, [0.0, 0.0, -2.1]);
        assert_eq!(structure.formula(), "Fe2O");
    }

    #[test]
    fn test_select_species_keeps_order_and_counts() {
        let output = fe2o();
        let selection = vec!["Fe".to_string()];
        let structure = assemble(&output, &selection).unwrap();

        assert_eq!(structure.atoms.len(), 2);
        assert!(structure.atoms.iter().all(|a| selection.contains(&a.element)));
        assert_eq!(structure.atoms[0].position, [0.0; 3]);
        assert_eq!(structure.atoms[1].magmom, [0.0, 0.0, -2.1]);
    }

    #[test]
    fn test_select_all_species() {
        let output = fe2o();
        let selection = vec!["O".to_string(), "Fe".to_string()];
        let structure = assemble(&output, &selection).unwrap();
        assert_eq!(structure.atoms.len(), 3);
        assert_eq!(structure.atoms[0].element, "Fe");
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        assert!(matches!(
            assemble(&fe2o(), &[]),
            Err(MagviewError::EmptySpeciesSelection)
        ));
    }

    #[test]
    fn test_unknown_species_is_rejected() {
        let err = assemble(&fe2o(), &["Ni".to_string()]).unwrap_err();
        assert!(matches!(err, MagviewError::UnknownSpecies { .. }));
        assert!(err.to_string().contains("Fe, O"));
    }

    #[test]
    fn test_atom_moment_magnitude() {
        let atom = Atom::new("Fe", [0.0; 3], [3.0, 4.0, 0.0]);
        assert!((atom.moment_magnitude() - 5.0).abs() < 1e-12);
    }
}
